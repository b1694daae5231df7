//! The [`registry!`] declaration macro.
//!
//! One invocation closes the kind set: it generates the holder enum, the
//! zero-sized registry type, a [`Member`] impl per kind with its lane
//! position fixed by declaration order, the visitor hook trait, and the
//! [`Dispatch`] impl that applies an op across the store in declaration
//! order.
//!
//! [`registry!`]: crate::registry
//! [`Member`]: crate::Member
//! [`Dispatch`]: crate::Dispatch

/// Declare a closed kind registry.
///
/// ```ignore
/// use warren_store::{Identity, Kind, Store};
///
/// struct Npc { /* ... */ }
/// struct Projectile { /* ... */ }
/// // impl Kind for Npc, Projectile ...
///
/// warren_store::registry! {
///     /// Every kind the world can hold.
///     pub WorldKinds {
///         holder: WorldHolder,
///         visitor: WorldVisitor,
///         kinds: {
///             Npc => visit_npc,
///             Projectile => visit_projectile,
///         },
///     }
/// }
///
/// let mut store = Store::<WorldKinds>::new();
/// store.spawn::<Npc>(/* args */);
/// ```
///
/// Generates:
///
/// - the holder enum (`WorldHolder`), one variant per kind, variant name
///   equal to the kind name;
/// - the registry type (`WorldKinds`), a zero-sized [`Registry`] impl
///   carrying the holder type and kind count;
/// - one [`Member`] impl per kind, with `LANE` set to its position in the
///   declaration. Listing a kind twice produces two conflicting `Member`
///   impls and fails to compile;
/// - the visitor trait (`WorldVisitor`), one hook per kind with a default
///   empty body, and the [`Dispatch`] impl [`Store::visit`] goes through.
///   An op overrides exactly the hooks for the kinds it understands;
///   every other kind resolves to the default hook at compile time.
///
/// [`Registry`]: crate::Registry
/// [`Member`]: crate::Member
/// [`Dispatch`]: crate::Dispatch
/// [`Store::visit`]: crate::Store::visit
#[macro_export]
macro_rules! registry {
    (
        $(#[$meta:meta])*
        $vis:vis $registry:ident {
            holder: $holder:ident,
            visitor: $visitor:ident,
            kinds: {
                $( $kind:ident => $hook:ident ),+ $(,)?
            } $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy)]
        $vis struct $registry;

        #[doc = concat!("Tagged holder over the kinds registered in [`", stringify!($registry), "`].")]
        $vis enum $holder {
            $(
                #[doc = concat!("A stored [`", stringify!($kind), "`].")]
                $kind($kind),
            )+
        }

        impl $crate::Registry for $registry {
            type Holder = $holder;

            const KINDS: usize = $crate::__registry_count!($($kind)+);
        }

        $crate::__registry_members!($registry, $holder, (), $($kind)+);

        #[doc = concat!("Per-kind visitor hooks for [`", stringify!($registry), "`].")]
        ///
        /// Override the hooks for the kinds the op understands; the rest
        /// default to an empty body and their lanes are skipped.
        $vis trait $visitor {
            $(
                #[doc = concat!("Called with every stored [`", stringify!($kind), "`], in spawn order.")]
                #[inline]
                fn $hook(&mut self, _entity: &mut $kind) {}
            )+
        }

        impl<V: $visitor> $crate::Dispatch<V> for $registry {
            fn dispatch(store: &mut $crate::Store<Self>, op: &mut V) {
                $(
                    for entity in store.view_mut::<$kind>() {
                        op.$hook(entity);
                    }
                )+
            }
        }
    };
}

/// Number of idents passed. Expansion detail of [`registry!`].
#[doc(hidden)]
#[macro_export]
macro_rules! __registry_count {
    () => { 0 };
    ($head:ident $($tail:ident)*) => { 1 + $crate::__registry_count!($($tail)*) };
}

/// Emits one [`Member`](crate::Member) impl per kind, threading the list
/// of already-emitted kinds through so each lane index is the count of
/// its predecessors. Expansion detail of [`registry!`].
#[doc(hidden)]
#[macro_export]
macro_rules! __registry_members {
    ($registry:ident, $holder:ident, ($($before:ident)*),) => {};
    ($registry:ident, $holder:ident, ($($before:ident)*), $kind:ident $($rest:ident)*) => {
        impl $crate::Member<$registry> for $kind {
            const LANE: usize = $crate::__registry_count!($($before)*);

            #[inline]
            fn wrap(self) -> $holder {
                $holder::$kind(self)
            }

            #[inline]
            #[allow(unreachable_patterns)]
            fn unwrap_ref(holder: &$holder) -> &Self {
                match holder {
                    $holder::$kind(entity) => entity,
                    _ => $crate::holder_mismatch(stringify!($kind)),
                }
            }

            #[inline]
            #[allow(unreachable_patterns)]
            fn unwrap_mut(holder: &mut $holder) -> &mut Self {
                match holder {
                    $holder::$kind(entity) => entity,
                    _ => $crate::holder_mismatch(stringify!($kind)),
                }
            }
        }

        $crate::__registry_members!($registry, $holder, ($($before)* $kind), $($rest)*);
    };
}
