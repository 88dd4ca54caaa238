//! Rule-based emotional chat responder.
//!
//! A [`Responder`] matches each line of user input against an ordered [`RuleTable`],
//! answers from the winning rule's reply pool, and follows up on a detected emotion
//! for a couple of turns before returning to plain matching.

pub mod api;
pub mod config;
pub mod error;
pub mod file_logger;
pub mod models;
pub mod responder;
pub mod rules;
pub mod script;
pub mod selector;
pub mod service;

pub use error::{ConfigError, RuleError, SessionError};
pub use responder::{Responder, Session};
pub use rules::{Category, FollowUpScript, Rule, RuleTable};
