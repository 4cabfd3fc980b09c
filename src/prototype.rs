use alloc::{fmt, rc::Rc};
use core::{
    hash::{Hash, Hasher},
    ops::Deref,
};

/// Identity of a [`Prototype`], derived from the address of its shared
/// allocation.
///
/// Two ids are equal only if they were taken from clones of the same
/// prototype handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PrototypeId(usize);

impl fmt::Display for PrototypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:x}", self.0)
    }
}

/// A shared, immutable description of a pooled resource kind.
///
/// Prototypes are compared by identity, not by value: two prototypes built
/// from equal values are distinct pool keys, while clones of one prototype
/// all refer to the same key.
pub struct Prototype<P: ?Sized>(Rc<P>);

impl<P> Prototype<P> {
    /// Wraps `value` into a new prototype with a fresh identity.
    pub fn new(value: P) -> Self {
        Prototype(Rc::new(value))
    }
}

impl<P: ?Sized> Prototype<P> {
    /// Returns the identity used as registry key.
    #[inline]
    pub fn id(&self) -> PrototypeId {
        PrototypeId(Rc::as_ptr(&self.0) as *const () as usize)
    }

    /// Returns `true` if both handles point to the same prototype.
    #[inline]
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Rc::ptr_eq(&this.0, &other.0)
    }
}

impl<P: ?Sized> From<Rc<P>> for Prototype<P> {
    fn from(rc: Rc<P>) -> Self {
        Prototype(rc)
    }
}

impl<P: ?Sized> Clone for Prototype<P> {
    fn clone(&self) -> Self {
        Prototype(self.0.clone())
    }
}

impl<P: ?Sized> Deref for Prototype<P> {
    type Target = P;
    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<P: ?Sized> AsRef<P> for Prototype<P> {
    #[inline(always)]
    fn as_ref(&self) -> &P {
        self
    }
}

impl<P: ?Sized> Hash for Prototype<P> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}
impl<P: ?Sized> PartialEq for Prototype<P> {
    #[inline]
    fn eq(&self, other: &Prototype<P>) -> bool {
        Prototype::ptr_eq(self, other)
    }
}
impl<P: ?Sized> Eq for Prototype<P> {}
impl<P: ?Sized> PartialOrd for Prototype<P> {
    #[inline]
    fn partial_cmp(&self, other: &Prototype<P>) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl<P: ?Sized> Ord for Prototype<P> {
    #[inline]
    fn cmp(&self, other: &Prototype<P>) -> core::cmp::Ordering {
        self.id().cmp(&other.id())
    }
}
impl<P: ?Sized + fmt::Debug> fmt::Debug for Prototype<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Prototype")
            .field(&self.id())
            .field(&&*self.0)
            .finish()
    }
}
impl<P: ?Sized> fmt::Pointer for Prototype<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Pointer::fmt(&self.0, f)
    }
}
