//! Entity trait: identity + continuity across edits.

/// Records persisted by the remote backend (suppliers, ingredients, ...).
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug + core::fmt::Display;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
