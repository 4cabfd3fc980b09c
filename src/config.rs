/// When a reused instance is moved into a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScopePolicy {
    /// A reused instance is attached to the requested scope (or the default
    /// one) right before it is activated, and to its prototype's scope when
    /// released.
    #[default]
    AttachOnAcquire,
    /// Instances are only moved when released. An acquired instance stays
    /// wherever it was left.
    AttachOnRelease,
}

/// Settings of a [`PoolManager`](crate::PoolManager).
#[derive(Debug, Clone)]
pub struct PoolConfig<S> {
    /// Scope used when a caller does not pass one. When `None`, the
    /// allocator creates it on first use.
    pub default_scope: Option<S>,
    /// Upper bound of instances per prototype. `None` means unbounded.
    pub max_instances: Option<usize>,
    /// Scope handling of acquired instances.
    pub scope_policy: ScopePolicy,
}

impl<S> Default for PoolConfig<S> {
    fn default() -> Self {
        PoolConfig {
            default_scope: None,
            max_instances: None,
            scope_policy: ScopePolicy::default(),
        }
    }
}

impl<S> PoolConfig<S> {
    /// Uses `scope` instead of asking the allocator for a default one.
    pub fn with_default_scope(mut self, scope: S) -> Self {
        self.default_scope = Some(scope);
        self
    }

    /// Limits every prototype to at most `max` instances.
    pub fn with_max_instances(mut self, max: usize) -> Self {
        self.max_instances = Some(max);
        self
    }

    /// Sets the scope policy.
    pub fn with_scope_policy(mut self, policy: ScopePolicy) -> Self {
        self.scope_policy = policy;
        self
    }
}
