use crate::error::SessionError;
use crate::file_logger::FileLogger;
use crate::responder::Responder;
use crate::rules::RuleTable;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tracing::{info, warn};

pub const DEFAULT_MAX_SESSIONS: usize = 1000;
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

struct Entry {
    responder: Responder,
    last_used: Instant,
}

/// Open conversations, one Responder each, all sharing a rule table.
///
/// Sessions idle for longer than the idle timeout are dropped whenever a new one
/// opens, and no more than `max_sessions` are held at once.
pub struct SessionStore {
    table: Arc<RuleTable>,
    entries: Mutex<HashMap<String, Entry>>,
    seed: Option<u64>,
    opened: AtomicU64,
    transcript: Option<Arc<FileLogger>>,
    max_sessions: usize,
    idle_timeout: Duration,
}

impl SessionStore {
    pub fn new(table: Arc<RuleTable>) -> Self {
        Self {
            table,
            entries: Mutex::new(HashMap::new()),
            seed: None,
            opened: AtomicU64::new(0),
            transcript: None,
            max_sessions: DEFAULT_MAX_SESSIONS,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
        }
    }

    /// Session `n` draws replies from `seed + n`.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_transcript(mut self, transcript: Arc<FileLogger>) -> Self {
        self.transcript = Some(transcript);
        self
    }

    pub fn with_max_sessions(mut self, max_sessions: usize) -> Self {
        self.max_sessions = max_sessions;
        self
    }

    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    pub fn open(&self) -> Result<String, SessionError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        let expired: Vec<String> = entries
            .iter()
            .filter(|(_, entry)| entry.last_used.elapsed() >= self.idle_timeout)
            .map(|(id, _)| id.clone())
            .collect();
        for id in &expired {
            entries.remove(id);
            info!("Evicted idle session {}", id);
        }

        if entries.len() >= self.max_sessions {
            warn!("Session limit of {} reached", self.max_sessions);
            return Err(SessionError::Full(self.max_sessions));
        }

        let ordinal = self.opened.fetch_add(1, Ordering::Relaxed);
        let mut responder = Responder::from_table(Arc::clone(&self.table));
        if let Some(seed) = self.seed {
            responder = responder.with_seed(seed.wrapping_add(ordinal));
        }

        let session_id = loop {
            let candidate = format!("{:016x}", rand::random::<u64>());
            if !entries.contains_key(&candidate) {
                break candidate;
            }
        };
        entries.insert(
            session_id.clone(),
            Entry {
                responder,
                last_used: Instant::now(),
            },
        );
        drop(entries);

        info!("Opened session {}", session_id);
        if let Some(transcript) = &self.transcript {
            for id in &expired {
                transcript.log_session_closed(id);
            }
            transcript.log_session_opened(&session_id);
        }
        Ok(session_id)
    }

    /// Reply to `message` within a session; `None` when the session is unknown.
    pub fn respond(&self, session_id: &str, message: &str) -> Option<String> {
        let reply = {
            let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
            let entry = entries.get_mut(session_id)?;
            entry.last_used = Instant::now();
            entry.responder.respond(message)
        };

        if let Some(transcript) = &self.transcript {
            transcript.log_user(session_id, message);
            transcript.log_reply(session_id, &reply);
        }
        Some(reply)
    }

    pub fn close(&self, session_id: &str) -> bool {
        let removed = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(session_id)
            .is_some();

        if removed {
            info!("Closed session {}", session_id);
            if let Some(transcript) = &self.transcript {
                transcript.log_session_closed(session_id);
            }
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
