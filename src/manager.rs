use crate::{PoolAllocator, PoolConfig, PoolError, Poolable, Prototype, PrototypeId, ScopePolicy};
use alloc::{collections::BTreeMap, fmt, rc::Rc, vec::Vec};
use core::cell::RefCell;

/// A pooled object, shared between the pool and the caller that acquired it.
pub type Instance<T> = Rc<RefCell<T>>;

// Every instance ever created for one prototype, in creation order.
struct Registry<P: ?Sized, T> {
    // keeps the prototype alive so its id is never reused
    prototype: Prototype<P>,
    instances: Vec<Instance<T>>,
}

/// A struct representing a prototype-keyed object pool for the local thread,
/// it cannot be moved between threads.
///
/// For every [`Prototype`] the manager keeps the list of instances it created
/// from it. Instances are never dropped by the pool: releasing one only
/// deactivates it, which makes it the candidate of a later
/// [`Self::acquire`]. The first inactive instance in creation order is always
/// the one reused, so reuse is deterministic.
///
/// Construction of instances and scopes is delegated to a [`PoolAllocator`].
pub struct PoolManager<P: ?Sized, A: PoolAllocator<P>> {
    allocator: A,
    config: PoolConfig<A::Scope>,
    registry: BTreeMap<PrototypeId, Registry<P, A::Instance>>,
    // scope each prototype's instances are returned to, the prototype is
    // held so its id stays unique
    scopes: BTreeMap<PrototypeId, (Prototype<P>, A::Scope)>,
    default_scope: Option<A::Scope>,
}

impl<P: ?Sized, A: PoolAllocator<P>> PoolManager<P, A> {
    /// Creates an empty manager with the default configuration.
    ///
    /// The default scope is created by the allocator on first use.
    pub fn new(allocator: A) -> Self {
        Self::with_config(allocator, PoolConfig::default())
    }

    /// Creates an empty manager with the given configuration.
    pub fn with_config(allocator: A, config: PoolConfig<A::Scope>) -> Self {
        PoolManager {
            allocator,
            default_scope: config.default_scope.clone(),
            config,
            registry: BTreeMap::new(),
            scopes: BTreeMap::new(),
        }
    }

    /// Pre-populates the pool of `prototype` with `count` new, inactive
    /// instances placed in `scope`, or in the default scope if `None`.
    ///
    /// The registry entry of `prototype` grows by exactly `count`. When a
    /// capacity is configured and would be exceeded, nothing is created and
    /// [`PoolError::CapacityExceeded`] is returned.
    pub fn fill(
        &mut self,
        prototype: &Prototype<P>,
        count: usize,
        scope: Option<&A::Scope>,
    ) -> Result<(), PoolError> {
        let len = self.len(prototype);
        if let Some(max) = self.config.max_instances {
            if len.saturating_add(count) > max {
                return Err(PoolError::CapacityExceeded {
                    prototype: prototype.id(),
                    len,
                    requested: count,
                    max,
                });
            }
        }
        let registry = self.entry(prototype);
        if count == 0 {
            return Ok(());
        }
        registry.instances.reserve(count);

        let scope = self.resolve_scope(scope);
        for _ in 0..count {
            self.create(prototype, &scope);
        }
        Ok(())
    }

    /// Gets an active instance of `prototype`.
    ///
    /// The first inactive instance is reused. Under
    /// [`ScopePolicy::AttachOnAcquire`] it is moved into `scope` (or the
    /// default scope) before being activated. If no instance can be reused a
    /// new one is created by the allocator.
    ///
    /// Fails with [`PoolError::Exhausted`] only if a capacity is configured
    /// and every instance of `prototype` is in use.
    pub fn acquire(
        &mut self,
        prototype: &Prototype<P>,
        scope: Option<&A::Scope>,
    ) -> Result<Instance<A::Instance>, PoolError> {
        if let Some(instance) = self.try_acquire(prototype, scope) {
            return Ok(instance);
        }

        let len = self.len(prototype);
        if let Some(max) = self.config.max_instances {
            if len >= max {
                return Err(PoolError::Exhausted {
                    prototype: prototype.id(),
                    max,
                });
            }
        }

        let scope = self.resolve_scope(scope);
        let instance = self.create(prototype, &scope);
        instance.borrow_mut().activate();
        Ok(instance)
    }

    /// Attempts to get an active instance of `prototype` without creating
    /// one.
    ///
    /// If no inactive instance is available, None is returned.
    pub fn try_acquire(
        &mut self,
        prototype: &Prototype<P>,
        scope: Option<&A::Scope>,
    ) -> Option<Instance<A::Instance>> {
        // an instance borrowed elsewhere is in use whatever its flag says
        let instance = self
            .registry
            .get(&prototype.id())?
            .instances
            .iter()
            .find(|instance| {
                instance
                    .try_borrow_mut()
                    .map_or(false, |instance| !instance.is_active())
            })?
            .clone();

        let scope = match self.config.scope_policy {
            ScopePolicy::AttachOnAcquire => Some(self.resolve_scope(scope)),
            ScopePolicy::AttachOnRelease => None,
        };
        {
            let mut guard = instance.borrow_mut();
            if let Some(scope) = &scope {
                guard.set_scope(scope);
            }
            guard.activate();
        }
        log::trace!("reusing instance of prototype {}", prototype.id());
        Some(instance)
    }

    /// Returns `instance` to the pool of `prototype`.
    ///
    /// The instance is deactivated and moved into the scope recorded for
    /// `prototype`. It stays registered and becomes available to
    /// [`Self::acquire`].
    ///
    /// Releasing for a prototype this pool never created instances of is
    /// tolerated: a warning is logged, a fresh scope is created and recorded
    /// for `prototype`, and the instance is released into it.
    pub fn release(
        &mut self,
        prototype: &Prototype<P>,
        instance: &Instance<A::Instance>,
    ) -> Result<(), PoolError> {
        let id = prototype.id();
        let mut guard = instance
            .try_borrow_mut()
            .map_err(|_| PoolError::InstanceBorrowed { prototype: id })?;

        let allocator = &self.allocator;
        let (_, scope) = self.scopes.entry(id).or_insert_with(|| {
            log::warn!("release of an instance of prototype {id} that has no scope, creating one");
            (prototype.clone(), allocator.create_scope(&**prototype))
        });

        guard.deactivate();
        guard.set_scope(scope);
        log::trace!("released instance of prototype {id}");
        Ok(())
    }

    /// Releases every active instance of `prototype`.
    ///
    /// Instances that are borrowed elsewhere are skipped. Returns the number
    /// of released instances.
    pub fn release_all(&mut self, prototype: &Prototype<P>) -> usize {
        let instances = match self.registry.get(&prototype.id()) {
            Some(registry) => registry.instances.clone(),
            None => return 0,
        };

        let mut released = 0;
        for instance in &instances {
            let active = match instance.try_borrow() {
                Ok(instance) => instance.is_active(),
                Err(_) => true,
            };
            if !active {
                continue;
            }
            match self.release(prototype, instance) {
                Ok(()) => released += 1,
                Err(e) => log::warn!("skipping instance: {e}"),
            }
        }
        released
    }

    /// Returns the default scope, creating it with the allocator if it was
    /// neither configured nor used yet.
    pub fn default_scope(&mut self) -> &A::Scope {
        let allocator = &self.allocator;
        self.default_scope.get_or_insert_with(|| {
            log::debug!("creating default pool scope");
            allocator.default_scope()
        })
    }

    /// Gets the number of instances ever created for `prototype`.
    pub fn len(&self, prototype: &Prototype<P>) -> usize {
        self.instances(prototype).len()
    }

    /// Gets the number of instances of `prototype` currently in use.
    ///
    /// Instances mutably borrowed at the time of the call count as in use.
    pub fn active_count(&self, prototype: &Prototype<P>) -> usize {
        self.instances(prototype)
            .iter()
            .filter(|instance| {
                instance
                    .try_borrow()
                    .map_or(true, |instance| instance.is_active())
            })
            .count()
    }

    /// Gets the number of instances of `prototype` ready to be reused.
    pub fn inactive_count(&self, prototype: &Prototype<P>) -> usize {
        self.len(prototype) - self.active_count(prototype)
    }

    /// Checks if `prototype` has a registry entry.
    pub fn contains(&self, prototype: &Prototype<P>) -> bool {
        self.registry.contains_key(&prototype.id())
    }

    /// Borrows every instance of `prototype`, in creation order.
    pub fn instances(&self, prototype: &Prototype<P>) -> &[Instance<A::Instance>] {
        self.registry
            .get(&prototype.id())
            .map(|registry| registry.instances.as_slice())
            .unwrap_or(&[])
    }

    /// Iterates over the registered prototypes.
    pub fn prototypes(&self) -> impl Iterator<Item = &Prototype<P>> + '_ {
        self.registry.values().map(|registry| &registry.prototype)
    }

    /// Gets the number of registered prototypes.
    pub fn prototype_count(&self) -> usize {
        self.registry.len()
    }

    /// Gets the number of instances across all prototypes.
    pub fn total_instances(&self) -> usize {
        self.registry
            .values()
            .map(|registry| registry.instances.len())
            .sum()
    }

    /// Returns the scope released instances of `prototype` are moved into.
    pub fn scope_of(&self, prototype: &Prototype<P>) -> Option<&A::Scope> {
        self.scopes.get(&prototype.id()).map(|(_, scope)| &*scope)
    }

    /// Borrows the allocator.
    pub fn allocator(&self) -> &A {
        &self.allocator
    }

    /// Borrows the configuration.
    pub fn config(&self) -> &PoolConfig<A::Scope> {
        &self.config
    }

    fn entry(&mut self, prototype: &Prototype<P>) -> &mut Registry<P, A::Instance> {
        self.registry.entry(prototype.id()).or_insert_with(|| {
            log::debug!("registering prototype {}", prototype.id());
            Registry {
                prototype: prototype.clone(),
                instances: Vec::new(),
            }
        })
    }

    fn resolve_scope(&mut self, scope: Option<&A::Scope>) -> A::Scope {
        match scope {
            Some(scope) => scope.clone(),
            None => self.default_scope().clone(),
        }
    }

    // Constructs an inactive instance and registers it. The first scope a
    // prototype is created in becomes its release scope.
    fn create(&mut self, prototype: &Prototype<P>, scope: &A::Scope) -> Instance<A::Instance> {
        let mut obj = self.allocator.allocate(&**prototype, scope);
        obj.deactivate();
        let instance = Rc::new(RefCell::new(obj));

        let id = prototype.id();
        self.scopes
            .entry(id)
            .or_insert_with(|| (prototype.clone(), scope.clone()));
        let registry = self.entry(prototype);
        registry.instances.push(instance.clone());
        log::debug!(
            "created instance {} of prototype {id}",
            registry.instances.len()
        );
        instance
    }
}

impl<P: ?Sized, A: PoolAllocator<P>> fmt::Debug for PoolManager<P, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolManager")
            .field("prototypes", &self.prototype_count())
            .field("instances", &self.total_instances())
            .field("scope_policy", &self.config.scope_policy)
            .field("max_instances", &self.config.max_instances)
            .finish_non_exhaustive()
    }
}
