//! Entity trait: records that keep their identity while their state changes.

/// A record identified by its id rather than by its field values.
///
/// Two snapshots of the same wallet taken before and after a transfer differ
/// in balance but are still the same entity.
pub trait Entity {
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> &Self::Id;

    /// True when both values describe the same entity, whatever their state.
    fn same_identity_as(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}
