use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A persisted document exists but no longer parses. Fatal to startup;
    /// the only way forward is an explicit reseed.
    #[error("stored data under '{key}' is corrupt: {source}")]
    PersistenceCorrupt {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("storage backend failure: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("serialization failure: {0}")]
    Serialize(serde_json::Error),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("notice title must not be empty")]
    EmptyTitle,
}
