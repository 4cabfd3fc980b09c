/// A trait for objects that can be recycled by a [`PoolManager`].
///
/// The pool never inspects an instance beyond this trait: an instance whose
/// [`Poolable::is_active`] returns `false` is considered free and may be
/// handed out again by [`PoolManager::acquire`].
///
/// [`PoolManager`]: crate::PoolManager
/// [`PoolManager::acquire`]: crate::PoolManager::acquire
pub trait Poolable<S = ()> {
    /// Returns `true` while the instance is in use by a consumer.
    ///
    /// Must reflect the most recent [`Self::activate`] or
    /// [`Self::deactivate`] call and nothing else.
    fn is_active(&self) -> bool;

    /// Prepares the instance for use when it leaves the pool.
    fn activate(&mut self);

    /// Tears the instance down when it goes back to the pool.
    ///
    /// [`Self::is_active`] must report `false` afterwards.
    fn deactivate(&mut self);

    /// Moves the instance into the given scope.
    ///
    /// By default, this method does nothing. Override it when instances are
    /// organized under some holding container.
    #[inline(always)]
    fn set_scope(&mut self, _scope: &S) {}
}
