pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("no sequence named '{name}' found")]
    NotFound { name: String },

    #[error("{count} sequences named '{name}' found, expected exactly one")]
    Ambiguity { name: String, count: usize },

    #[error("failed to connect to the database: {0}")]
    Connection(String),

    #[error("database query failed: {0}")]
    Query(#[from] sqlx::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}
