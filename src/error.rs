use thiserror::Error;

use crate::bitpool::BitPoolError;
use crate::lock::LockError;
use crate::store::StoreError;

/// Error type for resource lifecycle and allocation operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceError {
    /// The config or operational record is absent.
    #[error("resource state not found: {key}")]
    NotFound { key: String },
    /// The store failed for any reason other than a missing key.
    #[error(transparent)]
    Store(StoreError),
    /// Every id in the named pool is allocated. Expected under load, not a bug.
    #[error("no {pool} available")]
    Exhausted { pool: &'static str },
    /// Malformed input to resource creation or deallocation.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// A per-resource lock could not be taken or released.
    #[error(transparent)]
    Lock(#[from] LockError),
}

impl ResourceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ResourceError::NotFound { .. })
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, ResourceError::Exhausted { .. })
    }
}

impl From<StoreError> for ResourceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { key } => ResourceError::NotFound { key },
            other => ResourceError::Store(other),
        }
    }
}

impl From<BitPoolError> for ResourceError {
    fn from(err: BitPoolError) -> Self {
        ResourceError::InvalidArgument(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_not_found_is_lifted() {
        let err: ResourceError = StoreError::NotFound { key: "k".into() }.into();
        assert!(err.is_not_found());
    }

    #[test]
    fn other_store_errors_are_wrapped() {
        let err: ResourceError = StoreError::Backend("down".into()).into();
        assert_eq!(err, ResourceError::Store(StoreError::Backend("down".into())));
        assert_eq!(err.to_string(), "state backend error: down");
    }

    #[test]
    fn exhausted_message_names_pool() {
        let err = ResourceError::Exhausted { pool: "vxlans" };
        assert!(err.is_exhausted());
        assert_eq!(err.to_string(), "no vxlans available");
    }
}
