use mes_client::ClientError;
use thiserror::Error;

/// Console failure surfaced as a non-zero exit.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// Configuration is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// A client call failed before producing a notice.
    #[error("{}", .0.display_message())]
    Client(#[from] ClientError),

    /// No persisted session was found.
    #[error("not signed in; run `mes-console login <subject>` first")]
    NotSignedIn,

    /// A destructive command was not confirmed.
    #[error("refusing to delete {0} without --yes")]
    Unconfirmed(String),

    /// The command ran but reported failures.
    #[error("{0} operation(s) failed")]
    Failed(usize),

    /// Output could not be written.
    #[error("output error: {0}")]
    Output(String),
}

pub type ConsoleResult<T> = Result<T, ConsoleError>;
