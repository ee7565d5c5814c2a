use thiserror::Error;

/// Failure while reading the catalog. Any of these discards the snapshot being built.
#[derive(Error, Debug)]
pub enum IntrospectError {
    /// The catalog connection could not be established.
    #[error("Connection error: {0}")]
    Connection(String),
    /// A catalog query was rejected or failed mid-pipeline.
    #[error("Query error: {0}")]
    Query(String),
}

/// Crate-level error for the CLI and viewer entry points.
#[derive(Error, Debug)]
pub enum ErdError {
    #[error("Introspection failed: {0}")]
    Introspect(#[from] IntrospectError),
    /// Configuration error (e.g., invalid database URL or port).
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("No tables found matching the specified filters")]
    NoTables,
}
