use crate::PrototypeId;
use thiserror::Error;

/// Errors returned by [`PoolManager`](crate::PoolManager) operations.
///
/// Every operation checks its preconditions before touching the registry, so
/// an error never leaves a partially applied change behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    /// `fill` would grow the registry entry past the configured capacity.
    #[error("filling {requested} instances of prototype {prototype} exceeds capacity: {len} of {max} already created")]
    CapacityExceeded {
        /// Prototype being filled.
        prototype: PrototypeId,
        /// Instances already registered.
        len: usize,
        /// Instances asked for.
        requested: usize,
        /// Configured capacity.
        max: usize,
    },

    /// No inactive instance is left and the entry is at capacity.
    #[error("prototype {prototype} is exhausted: all {max} instances are active")]
    Exhausted {
        /// Prototype being acquired.
        prototype: PrototypeId,
        /// Configured capacity.
        max: usize,
    },

    /// The instance is borrowed elsewhere, its lifecycle state cannot change.
    #[error("instance of prototype {prototype} is borrowed and cannot be released")]
    InstanceBorrowed {
        /// Prototype the instance was released for.
        prototype: PrototypeId,
    },
}
