use crate::error::ConfigError;
use crate::service::{DEFAULT_IDLE_TIMEOUT, DEFAULT_MAX_SESSIONS};
use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

pub struct Config {
    pub bind_addr: SocketAddr,
    pub reply_delay: Duration,
    pub transcript_path: Option<String>,
    pub seed: Option<u64>,
    pub max_sessions: usize,
    pub session_idle: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_addr = parse_var("ELIZA_BIND_ADDR", "socket address")?
            .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 3000)));
        let reply_delay_ms: u64 =
            parse_var("ELIZA_REPLY_DELAY_MS", "millisecond count")?.unwrap_or(1000);
        let transcript_path = env::var("ELIZA_TRANSCRIPT_PATH")
            .ok()
            .filter(|path| !path.trim().is_empty());
        let seed = parse_var("ELIZA_SEED", "u64 seed")?;
        let max_sessions =
            parse_var("ELIZA_MAX_SESSIONS", "session count")?.unwrap_or(DEFAULT_MAX_SESSIONS);
        let session_idle = parse_var("ELIZA_SESSION_IDLE_SECS", "second count")?
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_IDLE_TIMEOUT);

        Ok(Self {
            bind_addr,
            reply_delay: Duration::from_millis(reply_delay_ms),
            transcript_path,
            seed,
            max_sessions,
            session_idle,
        })
    }
}

fn parse_var<T: FromStr>(
    var: &'static str,
    expected: &'static str,
) -> Result<Option<T>, ConfigError> {
    match env::var(var) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid {
                var,
                expected,
                value,
            }),
        _ => Ok(None),
    }
}
