use thiserror::Error;

/// Defects in a rule table, reported when the table is built.
#[derive(Error, Debug)]
pub enum RuleError {
    #[error("Rule '{rule}' has an invalid pattern: {source}")]
    InvalidPattern {
        rule: String,
        #[source]
        source: regex_lite::Error,
    },
    #[error("Rule '{rule}' has an empty {pool} pool")]
    EmptyPool { rule: String, pool: &'static str },
    #[error("Rule name '{0}' is declared more than once")]
    DuplicateName(String),
    #[error("Rule '{rule}' uses a placeholder its pattern never captures: {template}")]
    UnfilledPlaceholder { rule: String, template: String },
    #[error("Rule '{0}' tracks a feeling word but its pattern has no capture group")]
    MissingCapture(String),
    #[error("Rule '{0}' arms a follow-up but carries no follow-up script")]
    MissingFollowUp(String),
    #[error("Rule table must end with a fallback rule that has no pattern")]
    MissingFallback,
    #[error("Fallback rule '{0}' must be the last rule in the table")]
    FallbackNotLast(String),
    #[error("Fallback rule '{0}' must use the general category")]
    InvalidFallback(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{var} is not a valid {expected}: {value}")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session limit of {0} reached")]
    Full(usize),
}
