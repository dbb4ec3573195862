//! Wrapper-aware type identity and entity equality.
//!
//! Records are sometimes handled through wrappers (boxes, shared pointers,
//! change-tracking adapters). Two handles denote the same entity when their
//! *canonical* types match and their identifiers are equal, regardless of how
//! either one is wrapped.
//!
//! A wrapper declares itself through [`Canonical::underlying`]; the
//! [`IdentityResolver`] unwraps through that capability and caches the result
//! per concrete type, so repeated comparisons cost one concurrent map lookup.

mod equality;
mod resolver;

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

pub use equality::{Entity, EntityRef, entity_hash};
pub use resolver::{IdentityResolver, ResolverStats};

/// A concrete Rust type, compared by [`TypeId`] and labelled with its name.
#[derive(Debug, Clone, Copy)]
pub struct CanonicalType {
    id: TypeId,
    name: &'static str,
}

impl CanonicalType {
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub const fn type_id(&self) -> TypeId {
        self.id
    }
}

impl PartialEq for CanonicalType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for CanonicalType {}

impl Hash for CanonicalType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for CanonicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Capability for participating in canonical type resolution.
///
/// Plain records implement this with an empty body. Wrappers override
/// [`underlying`](Self::underlying) to expose the instance they wrap; every
/// instance of a given wrapper type must expose the same underlying type, as
/// the resolver caches per concrete type.
pub trait Canonical: 'static {
    /// The concrete type of `self`. Not meant to be overridden.
    fn concrete_type(&self) -> CanonicalType {
        CanonicalType::of::<Self>()
    }

    /// The wrapped instance, or `None` if `self` is not a wrapper.
    fn underlying(&self) -> Option<&dyn Canonical> {
        None
    }
}

impl<T: Canonical> Canonical for Box<T> {
    fn underlying(&self) -> Option<&dyn Canonical> {
        Some(&**self)
    }
}

impl<T: Canonical> Canonical for Arc<T> {
    fn underlying(&self) -> Option<&dyn Canonical> {
        Some(&**self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plain;
    impl Canonical for Plain {}

    #[test]
    fn canonical_type_compares_by_type_id() {
        assert_eq!(CanonicalType::of::<Plain>(), CanonicalType::of::<Plain>());
        assert_ne!(CanonicalType::of::<Plain>(), CanonicalType::of::<Box<Plain>>());
        assert!(CanonicalType::of::<Plain>().name().ends_with("Plain"));
    }

    #[test]
    fn concrete_type_dispatches_through_trait_objects() {
        let boxed = Box::new(Plain);
        let as_dyn: &dyn Canonical = &boxed;
        assert_eq!(as_dyn.concrete_type(), CanonicalType::of::<Box<Plain>>());
        let inner = as_dyn.underlying().unwrap();
        assert_eq!(inner.concrete_type(), CanonicalType::of::<Plain>());
        assert!(inner.underlying().is_none());
    }
}
