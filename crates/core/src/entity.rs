//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Items, locations and alerts are compared by identity; their other fields
/// (quantity, read flag) change over their lifetime.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
