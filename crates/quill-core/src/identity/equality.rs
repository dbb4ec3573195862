use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::Arc;

use super::{Canonical, IdentityResolver};

/// A record identified by a typed identifier.
///
/// A record whose identifier still equals `Id::default()` is *transient*: it
/// has not been assigned a persisted identity yet.
pub trait Entity: Canonical {
    type Id: PartialEq + Hash + Default;

    fn id(&self) -> &Self::Id;

    fn is_transient(&self) -> bool {
        *self.id() == Self::Id::default()
    }
}

impl<T: Entity> Entity for Box<T> {
    type Id = T::Id;

    fn id(&self) -> &Self::Id {
        (**self).id()
    }
}

impl<T: Entity> Entity for Arc<T> {
    type Id = T::Id;

    fn id(&self) -> &Self::Id {
        (**self).id()
    }
}

/// Hash consistent with [`IdentityResolver::equals`].
///
/// Persisted entities hash their identifier. A transient entity is equal only
/// to itself, so it hashes its address and distinct unsaved instances spread
/// across buckets.
#[must_use]
pub fn entity_hash<E: Entity>(entity: &E) -> u64 {
    let mut hasher = DefaultHasher::new();
    if entity.is_transient() {
        std::ptr::from_ref(entity).addr().hash(&mut hasher);
    } else {
        entity.id().hash(&mut hasher);
    }
    hasher.finish()
}

impl IdentityResolver {
    /// Entity equality over optional handles.
    ///
    /// Two `None`s are equal; `None` never equals an entity. Otherwise see
    /// [`same_entity`](Self::same_entity).
    pub fn equals<A, B>(&self, a: Option<&A>, b: Option<&B>) -> bool
    where
        A: Entity,
        B: Entity<Id = A::Id>,
    {
        match (a, b) {
            (None, None) => true,
            (Some(a), Some(b)) => self.same_entity(a, b),
            _ => false,
        }
    }

    /// Whether `a` and `b` denote the same entity.
    ///
    /// True for the same reference. Otherwise both must be persisted, resolve
    /// to the same canonical type, and carry equal identifiers. A transient
    /// entity is only ever equal to itself.
    pub fn same_entity<A, B>(&self, a: &A, b: &B) -> bool
    where
        A: Entity,
        B: Entity<Id = A::Id>,
    {
        // A shared address alone is not identity: a struct and its first
        // field, or merged constants, can live at the same address.
        if a.concrete_type() == b.concrete_type() && std::ptr::addr_eq(a, b) {
            return true;
        }
        if a.is_transient() || b.is_transient() {
            return false;
        }
        self.resolve(a) == self.resolve(b) && a.id() == b.id()
    }

    /// Wrap an optional entity for use with `==`, `!=`, and hashed collections.
    #[must_use]
    pub const fn entity_ref<'a, E: Entity>(&'a self, entity: Option<&'a E>) -> EntityRef<'a, E> {
        EntityRef {
            resolver: self,
            entity,
        }
    }
}

/// An optional entity handle whose `==` and `Hash` follow entity identity.
///
/// Comparison uses the left-hand side's resolver.
pub struct EntityRef<'a, E> {
    resolver: &'a IdentityResolver,
    entity: Option<&'a E>,
}

impl<E> Clone for EntityRef<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for EntityRef<'_, E> {}

impl<'a, E> EntityRef<'a, E> {
    #[must_use]
    pub const fn get(&self) -> Option<&'a E> {
        self.entity
    }
}

impl<E, F> PartialEq<EntityRef<'_, F>> for EntityRef<'_, E>
where
    E: Entity,
    F: Entity<Id = E::Id>,
{
    fn eq(&self, other: &EntityRef<'_, F>) -> bool {
        self.resolver.equals(self.entity, other.entity)
    }
}

impl<E: Entity> Eq for EntityRef<'_, E> {}

impl<E: Entity> Hash for EntityRef<'_, E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.entity.map(entity_hash).hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[derive(Debug, Default)]
    struct Ticket {
        id: u64,
    }

    impl Canonical for Ticket {}

    impl Entity for Ticket {
        type Id = u64;

        fn id(&self) -> &u64 {
            &self.id
        }
    }

    #[derive(Debug)]
    struct Invoice {
        id: u64,
    }

    impl Canonical for Invoice {}

    impl Entity for Invoice {
        type Id = u64;

        fn id(&self) -> &u64 {
            &self.id
        }
    }

    /// Change-tracking adapter around a ticket.
    struct TrackedTicket {
        inner: Ticket,
        dirty: Vec<&'static str>,
    }

    impl Canonical for TrackedTicket {
        fn underlying(&self) -> Option<&dyn Canonical> {
            Some(&self.inner)
        }
    }

    impl Entity for TrackedTicket {
        type Id = u64;

        fn id(&self) -> &u64 {
            self.inner.id()
        }
    }

    #[test]
    fn entity_equals_itself() {
        let resolver = IdentityResolver::new();
        let ticket = Ticket { id: 7 };
        assert!(resolver.same_entity(&ticket, &ticket));

        let transient = Ticket::default();
        assert!(resolver.same_entity(&transient, &transient));
    }

    #[test]
    fn equal_type_and_id_are_equal_with_equal_hashes() {
        let resolver = IdentityResolver::new();
        let a = Ticket { id: 7 };
        let b = Ticket { id: 7 };
        assert!(resolver.equals(Some(&a), Some(&b)));
        assert_eq!(entity_hash(&a), entity_hash(&b));
    }

    #[test]
    fn different_ids_are_not_equal() {
        let resolver = IdentityResolver::new();
        assert!(!resolver.same_entity(&Ticket { id: 1 }, &Ticket { id: 2 }));
    }

    #[test]
    fn different_canonical_types_are_not_equal() {
        let resolver = IdentityResolver::new();
        assert!(!resolver.same_entity(&Ticket { id: 1 }, &Invoice { id: 1 }));
    }

    /// Holds a ticket as its first field, so both share one address.
    #[repr(C)]
    struct Escalation {
        ticket: Ticket,
        id: u64,
    }

    impl Canonical for Escalation {}

    impl Entity for Escalation {
        type Id = u64;

        fn id(&self) -> &u64 {
            &self.id
        }
    }

    #[test]
    fn shared_address_across_types_is_not_identity() {
        let resolver = IdentityResolver::new();
        let escalation = Escalation {
            ticket: Ticket { id: 5 },
            id: 9,
        };
        assert!(std::ptr::addr_eq(&escalation, &escalation.ticket));
        assert!(!resolver.same_entity(&escalation, &escalation.ticket));
        assert!(!resolver.equals(Some(&escalation.ticket), Some(&escalation)));

        let unsaved = Escalation {
            ticket: Ticket::default(),
            id: 0,
        };
        assert!(!resolver.same_entity(&unsaved, &unsaved.ticket));
        assert!(resolver.same_entity(&unsaved, &unsaved));
    }

    #[test]
    fn never_equal_to_none() {
        let resolver = IdentityResolver::new();
        let ticket = Ticket { id: 1 };
        assert!(!resolver.equals(Some(&ticket), None::<&Ticket>));
        assert!(!resolver.equals(None::<&Ticket>, Some(&ticket)));
        assert!(resolver.equals(None::<&Ticket>, None::<&Ticket>));
    }

    #[test]
    fn wrapping_does_not_affect_identity() {
        let resolver = IdentityResolver::new();
        let plain = Ticket { id: 9 };
        let tracked = TrackedTicket {
            inner: Ticket { id: 9 },
            dirty: vec!["status"],
        };
        let boxed = Box::new(Ticket { id: 9 });
        assert_eq!(tracked.dirty, ["status"]);

        assert!(resolver.same_entity(&plain, &tracked));
        assert!(resolver.same_entity(&tracked, &boxed));
        assert_eq!(entity_hash(&plain), entity_hash(&tracked));
    }

    #[test]
    fn distinct_transient_instances_are_not_equal() {
        let resolver = IdentityResolver::new();
        let a = Ticket::default();
        let b = Ticket::default();
        assert!(a.is_transient());
        assert!(!resolver.same_entity(&a, &b));
    }

    #[test]
    fn entity_ref_operators_match_equals() {
        let resolver = IdentityResolver::new();
        let a = Ticket { id: 3 };
        let b = Ticket { id: 3 };
        let c = Ticket { id: 4 };

        assert!(resolver.entity_ref(Some(&a)) == resolver.entity_ref(Some(&b)));
        assert!(resolver.entity_ref(Some(&a)) != resolver.entity_ref(Some(&c)));
        assert!(resolver.entity_ref(Some(&a)) != resolver.entity_ref(None::<&Ticket>));
        assert!(resolver.entity_ref(None::<&Ticket>) != resolver.entity_ref(Some(&a)));
        assert!(resolver.entity_ref(None::<&Ticket>) == resolver.entity_ref(None::<&Ticket>));
    }

    #[test]
    fn entity_refs_deduplicate_in_hash_sets() {
        let resolver = IdentityResolver::new();
        let tickets = [Ticket { id: 1 }, Ticket { id: 1 }, Ticket { id: 2 }];
        let unsaved = [Ticket::default(), Ticket::default()];

        let set: HashSet<_> = tickets
            .iter()
            .chain(&unsaved)
            .map(|t| resolver.entity_ref(Some(t)))
            .collect();
        assert_eq!(set.len(), 4);
    }
}
