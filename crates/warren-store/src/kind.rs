//! Kind registration traits.
//!
//! A store's kind set is closed at compile time: the [`registry!`] macro
//! turns one declaration into a holder enum, a zero-sized registry type,
//! and a [`Member`] impl per kind carrying its lane position. Nothing here
//! is inspected at runtime: lane selection is an associated const and
//! visitor dispatch is monomorphized per operation.
//!
//! [`registry!`]: crate::registry

use crate::{Identity, Store};

/// A concrete entity type that can live in a store.
///
/// A kind is constructible from a fresh identity plus kind-specific
/// arguments. The identity is assigned exactly once, at construction;
/// there is deliberately no way to set it afterwards.
pub trait Kind: Sized + 'static {
    /// Kind-specific constructor arguments passed through spawn.
    type Args;

    /// Build the entity. Called once per spawn with a fresh identity.
    fn create(identity: Identity, args: Self::Args) -> Self;

    /// The identity assigned at spawn time.
    fn identity(&self) -> Identity;
}

/// The closed, compile-time list of kinds a store supports.
///
/// Implemented by the zero-sized type generated by [`registry!`]. Adding
/// or removing a kind is a build-time change to that declaration.
///
/// [`registry!`]: crate::registry
pub trait Registry: Sized + 'static {
    /// Tagged union able to hold exactly one value of any registered kind.
    type Holder: 'static;

    /// Number of registered kinds; the store keeps one lane per kind.
    const KINDS: usize;
}

/// Membership of a kind in a registry.
///
/// Carries the kind's lane position and its holder embedding. Generated
/// by [`registry!`]; registering the same kind twice produces conflicting
/// impls of this trait and fails to compile, which is what keeps registry
/// entries pairwise distinct.
///
/// [`registry!`]: crate::registry
pub trait Member<R: Registry>: Kind {
    /// Position of this kind's lane, fixed by declaration order.
    const LANE: usize;

    /// Wrap the entity in a holder tagged with this kind.
    fn wrap(self) -> R::Holder;

    /// Unwrap a holder known to sit in this kind's lane.
    ///
    /// # Panics
    ///
    /// Panics if the holder carries a different kind. Holders in a lane
    /// always match the lane's kind unless the invariant was broken
    /// through [`Store::access`](crate::Store::access).
    fn unwrap_ref(holder: &R::Holder) -> &Self;

    /// Mutable counterpart of [`Member::unwrap_ref`].
    fn unwrap_mut(holder: &mut R::Holder) -> &mut Self;
}

/// Registry-order application of a visitor op across a whole store.
///
/// Implemented for the registry type by [`registry!`], bounded on the
/// generated visitor trait. [`Store::visit`] is a thin wrapper over this.
///
/// [`registry!`]: crate::registry
pub trait Dispatch<V>: Registry {
    /// Apply `op` to every element of every lane it has a hook for, in
    /// registry declaration order, storage order within a lane.
    fn dispatch(store: &mut Store<Self>, op: &mut V);
}

/// Cold path for a broken lane invariant.
///
/// Only reachable when a holder with a foreign tag was pushed into a lane
/// through [`Store::access`](crate::Store::access).
#[cold]
#[inline(never)]
#[track_caller]
#[doc(hidden)]
pub fn holder_mismatch(kind: &'static str) -> ! {
    panic!("holder tag does not match lane kind `{kind}`")
}
