use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SteinerError {
    #[error("failed to allocate heap storage for {points} points")]
    AllocationFailed { points: usize },

    #[error("tree has no source node")]
    MissingSource,

    #[error("net has no sink pins")]
    EmptyNet,
}
