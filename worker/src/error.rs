/// Errors produced by cache storage, the network, and the install step.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkerError {
    #[error("cache storage error: {0}")]
    Storage(String),
    #[error("network error: {0}")]
    Network(String),
    /// One manifest asset could not be seeded; the whole install fails.
    #[error("failed to seed {url}: {reason}")]
    Install { url: String, reason: String },
    #[error("failed to clone response: {0}")]
    Clone(String),
    #[error("invalid request: {0}")]
    Request(String),
}
