use kickoff_shared::{ConfigError, Team};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("policy returned no action: {0}")]
    Unavailable(String),
    #[error("bad model: {0}")]
    BadModel(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum MatchError {
    /// The controller for `side` could not produce an action; the match stops.
    #[error("{side} controller failed at tick {tick}: {source}")]
    PolicyUnavailable {
        side: Team,
        tick: u32,
        #[source]
        source: PolicyError,
    },
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}
