use std::io;

#[derive(Debug, thiserror::Error)]
pub enum DuplicateError {
    #[error("invalid target '{0}': expected Type:id[,id...][/Type...]")]
    InvalidTarget(String),

    #[error("missing session: use --session, set OMERO_SESSION_KEY, or run `omero-duplicate config set --session <key>`")]
    MissingSession,

    #[error("{0}")]
    ConflictingFlags(String),

    #[error("nothing to update: provide --server/--session")]
    NothingToUpdate,

    #[error("server failed: '{name}' {message}")]
    Server { name: String, message: String },

    #[error("server sent an unreadable {0} reply")]
    UnreadableReply(String),

    #[error("--timeout must be a finite number of seconds greater than 0")]
    InvalidTimeout,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("config I/O error: {0}")]
    ConfigIo(#[from] io::Error),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DuplicateError>;
