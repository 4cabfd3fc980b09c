use crate::Poolable;

/// A trait defining the interface for a pool allocator.
///
/// The allocator is the collaborator that knows how to turn a prototype into
/// a concrete instance and where idle instances are kept. The pool manager
/// only decides *when* to call it.
pub trait PoolAllocator<P: ?Sized> {
    /// Holding context instances are attached to.
    type Scope: Clone;

    /// The pooled object created from a prototype.
    type Instance: Poolable<Self::Scope>;

    /// Creates a new instance of `prototype`, already placed in `scope`.
    ///
    /// Construction is synchronous and either succeeds or panics, the pool
    /// never retries it.
    fn allocate(&self, prototype: &P, scope: &Self::Scope) -> Self::Instance;

    /// Creates the default scope used when a caller does not supply one.
    ///
    /// Called at most once per manager, and only if the manager was not
    /// configured with a default scope.
    fn default_scope(&self) -> Self::Scope;

    /// Creates a fresh scope dedicated to `prototype`.
    ///
    /// Used when an instance is released for a prototype that has no scope on
    /// record.
    fn create_scope(&self, prototype: &P) -> Self::Scope;
}
