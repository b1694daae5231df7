//! Store - the container owning every lane and the identity counter.
//!
//! A store holds one contiguous lane of tagged holders per registered
//! kind plus the shared identity allocator. Spawning appends to exactly
//! one lane; the other lanes and any views over them are untouched.
//! There is no per-entity removal: entities live until the store is
//! dropped or bulk-cleared, and [`Store::access`] is the escape hatch
//! for bulk operations the store does not provide itself.

use std::fmt;

use crate::{
    identity::{Identity, IdentityAllocator},
    kind::{Dispatch, Member, Registry},
    view::{View, ViewMut},
};

/// Entity container for one closed kind registry.
///
/// Every operation is synchronous and single-threaded; the `&mut`
/// receivers make a spawn while a view is live a borrow error rather
/// than a dangling view.
pub struct Store<R: Registry> {
    /// One lane per registered kind, indexed by [`Member::LANE`].
    ///
    /// Invariant: every holder in lane `i` carries the kind whose lane
    /// index is `i`. Holders are constructed in place in the matching
    /// lane and never move between lanes.
    lanes: Vec<Vec<R::Holder>>,
    /// Identity counter shared across all kinds.
    identities: IdentityAllocator,
}

impl<R: Registry> Default for Store<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Registry> Store<R> {
    /// Create an empty store with one empty lane per registered kind.
    #[must_use]
    pub fn new() -> Self {
        Self {
            lanes: (0..R::KINDS).map(|_| Vec::new()).collect(),
            identities: IdentityAllocator::new(),
        }
    }

    /// Create a store with every lane pre-sized to `per_lane` holders.
    ///
    /// Spawns up to `per_lane` entities per kind reuse the initial
    /// allocation, so views taken before those spawns stay within the
    /// lane's reserved block.
    #[must_use]
    pub fn with_capacity(per_lane: usize) -> Self {
        Self {
            lanes: (0..R::KINDS).map(|_| Vec::with_capacity(per_lane)).collect(),
            identities: IdentityAllocator::new(),
        }
    }

    // ==================== Spawning ====================

    /// Spawn a new entity of kind `K`.
    ///
    /// Allocates the next identity, constructs the entity via
    /// [`Kind::create`](crate::Kind::create), and appends it to `K`'s
    /// lane. Returns the assigned identity; callers that do not track
    /// entities may ignore it.
    ///
    /// Lane growth follows `Vec` amortized doubling. Allocation failure
    /// aborts the process through the global allocation handler; it is
    /// never surfaced as a recoverable error.
    pub fn spawn<K: Member<R>>(&mut self, args: K::Args) -> Identity {
        let identity = self.identities.allocate();
        self.lanes[K::LANE].push(K::create(identity, args).wrap());
        tracing::trace!(identity, lane = K::LANE, "spawned entity");
        identity
    }

    /// Pre-grow `K`'s lane for at least `additional` more spawns.
    ///
    /// Spawns covered by the reservation do not reallocate the lane.
    pub fn reserve<K: Member<R>>(&mut self, additional: usize) {
        self.lanes[K::LANE].reserve(additional);
    }

    // ==================== Views ====================

    /// Typed random-access view over every entity of kind `K`.
    #[must_use]
    pub fn view<K: Member<R>>(&self) -> View<'_, K, R> {
        View::new(&self.lanes[K::LANE])
    }

    /// Mutable counterpart of [`Store::view`].
    #[must_use]
    pub fn view_mut<K: Member<R>>(&mut self) -> ViewMut<'_, K, R> {
        ViewMut::new(&mut self.lanes[K::LANE])
    }

    /// Raw access to `K`'s lane of holders.
    ///
    /// Escape hatch for bulk operations the store does not provide,
    /// such as externally implemented removal or sorting. The caller
    /// must keep the lane invariant: every holder pushed here has to
    /// carry kind `K`, or the next unwrap through a view panics.
    #[must_use]
    pub fn access<K: Member<R>>(&mut self) -> &mut Vec<R::Holder> {
        &mut self.lanes[K::LANE]
    }

    // ==================== Sizes ====================

    /// Number of entities of kind `K`.
    #[must_use]
    pub fn len<K: Member<R>>(&self) -> usize {
        self.lanes[K::LANE].len()
    }

    /// Returns `true` if no entity of kind `K` has been spawned.
    #[must_use]
    pub fn is_empty<K: Member<R>>(&self) -> bool {
        self.lanes[K::LANE].is_empty()
    }

    /// Number of entities currently stored, across all kinds.
    #[must_use]
    pub fn total(&self) -> usize {
        self.lanes.iter().map(Vec::len).sum()
    }

    /// Number of identities handed out over the store's lifetime.
    ///
    /// Differs from [`Store::total`] once the store has been cleared:
    /// cleared entities stay counted here, since their identities are
    /// never reused.
    #[must_use]
    pub fn spawned(&self) -> u64 {
        self.identities.issued()
    }

    // ==================== Bulk operations ====================

    /// Drop every entity in every lane, keeping lane capacity.
    ///
    /// The identity counter is not reset: entities spawned afterwards
    /// continue the store-wide sequence.
    pub fn clear(&mut self) {
        let cleared = self.total();
        for lane in &mut self.lanes {
            lane.clear();
        }
        tracing::debug!(cleared, "cleared all lanes");
    }

    /// Apply `op` across the store.
    ///
    /// Kinds are visited in registry declaration order; within a kind,
    /// elements in storage (spawn) order. `op` reaches exactly the
    /// kinds whose visitor hooks it overrides; every other kind
    /// resolves to the default empty hook at compile time and costs
    /// nothing at runtime.
    pub fn visit<V>(&mut self, op: &mut V)
    where
        R: Dispatch<V>,
    {
        R::dispatch(self, op);
    }
}

impl<R: Registry> fmt::Debug for Store<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("kinds", &R::KINDS)
            .field("lanes", &self.lanes.iter().map(Vec::len).collect::<Vec<_>>())
            .field("spawned", &self.identities.issued())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::{Identity, Kind, Member, Store};

    #[derive(Debug, Clone, PartialEq)]
    struct Npc {
        identity: Identity,
        name: &'static str,
        hp: i32,
    }

    impl Kind for Npc {
        type Args = (&'static str, i32);

        fn create(identity: Identity, (name, hp): Self::Args) -> Self {
            Self { identity, name, hp }
        }

        fn identity(&self) -> Identity {
            self.identity
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Pickup {
        identity: Identity,
        heal: i32,
    }

    impl Kind for Pickup {
        type Args = i32;

        fn create(identity: Identity, heal: i32) -> Self {
            Self { identity, heal }
        }

        fn identity(&self) -> Identity {
            self.identity
        }
    }

    crate::registry! {
        DungeonKinds {
            holder: DungeonHolder,
            visitor: DungeonVisitor,
            kinds: {
                Npc => visit_npc,
                Pickup => visit_pickup,
            },
        }
    }

    #[test]
    fn test_spawn_appends_one_element() {
        let mut store = Store::<DungeonKinds>::new();

        let before = store.spawned();
        let identity = store.spawn::<Npc>(("Guard", 10));

        assert_eq!(identity, before);
        assert_eq!(store.len::<Npc>(), 1);
        assert_eq!(
            store.view::<Npc>().last(),
            Some(&Npc {
                identity,
                name: "Guard",
                hp: 10
            })
        );
    }

    #[test]
    fn test_identities_increase_across_kinds() {
        let mut store = Store::<DungeonKinds>::new();

        let ids = [
            store.spawn::<Npc>(("a", 1)),
            store.spawn::<Pickup>(3),
            store.spawn::<Npc>(("b", 2)),
            store.spawn::<Pickup>(4),
        ];

        assert_eq!(ids, [0, 1, 2, 3]);
        // Identities are not contiguous within a lane, only store-wide.
        let npc_ids: Vec<Identity> = store.view::<Npc>().iter().map(Npc::identity).collect();
        assert_eq!(npc_ids, [0, 2]);
    }

    #[test]
    fn test_spawns_leave_other_kinds_untouched() {
        let mut store = Store::<DungeonKinds>::new();
        store.spawn::<Pickup>(7);

        let before: Vec<Pickup> = store.view::<Pickup>().iter().cloned().collect();
        for i in 0..100 {
            store.spawn::<Npc>(("filler", i));
        }
        let after: Vec<Pickup> = store.view::<Pickup>().iter().cloned().collect();

        assert_eq!(before, after);
        assert_eq!(store.len::<Npc>(), 100);
        assert_eq!(store.total(), 101);
    }

    /// Records which entities an op touched, in order.
    #[derive(Default)]
    struct NpcTracker {
        touched: Vec<Identity>,
    }

    impl DungeonVisitor for NpcTracker {
        fn visit_npc(&mut self, npc: &mut Npc) {
            self.touched.push(npc.identity);
        }
    }

    #[test]
    fn test_visit_touches_only_hooked_kinds() {
        let mut store = Store::<DungeonKinds>::new();
        store.spawn::<Npc>(("a", 1));
        store.spawn::<Pickup>(9);
        store.spawn::<Npc>(("b", 2));

        let pickups: Vec<Pickup> = store.view::<Pickup>().iter().cloned().collect();

        let mut op = NpcTracker::default();
        store.visit(&mut op);

        // Every Npc exactly once, in storage order; Pickups untouched.
        assert_eq!(op.touched, [0, 2]);
        assert_eq!(
            store.view::<Pickup>().iter().cloned().collect::<Vec<_>>(),
            pickups
        );
    }

    /// Touches both kinds, recording the interleaving.
    #[derive(Default)]
    struct OrderTracker {
        sequence: Vec<(&'static str, Identity)>,
    }

    impl DungeonVisitor for OrderTracker {
        fn visit_npc(&mut self, npc: &mut Npc) {
            self.sequence.push(("npc", npc.identity));
        }

        fn visit_pickup(&mut self, pickup: &mut Pickup) {
            self.sequence.push(("pickup", pickup.identity));
        }
    }

    #[test]
    fn test_visit_follows_registry_order() {
        let mut store = Store::<DungeonKinds>::new();
        store.spawn::<Pickup>(1);
        store.spawn::<Npc>(("a", 1));
        store.spawn::<Pickup>(2);
        store.spawn::<Npc>(("b", 2));

        let mut op = OrderTracker::default();
        store.visit(&mut op);

        // All Npcs before all Pickups (declaration order), each lane in
        // spawn order regardless of interleaved spawning.
        assert_eq!(
            op.sequence,
            [("npc", 1), ("npc", 3), ("pickup", 0), ("pickup", 2)]
        );
    }

    struct Damage(i32);

    impl DungeonVisitor for Damage {
        fn visit_npc(&mut self, npc: &mut Npc) {
            npc.hp -= self.0;
        }
    }

    #[test]
    fn test_guard_and_mage_scenario() {
        let mut store = Store::<DungeonKinds>::new();

        assert_eq!(store.spawn::<Npc>(("Guard", 10)), 0);
        assert_eq!(store.spawn::<Npc>(("Mage", 5)), 1);

        let view = store.view::<Npc>();
        assert_eq!(view.len(), 2);
        assert_eq!(view[0].identity, 0);
        assert_eq!(view[0].name, "Guard");
        assert_eq!(view[0].hp, 10);
        assert_eq!(view[1].identity, 1);
        assert_eq!(view[1].name, "Mage");
        assert_eq!(view[1].hp, 5);

        store.visit(&mut Damage(1));

        let hp: Vec<i32> = store.view::<Npc>().iter().map(|npc| npc.hp).collect();
        assert_eq!(hp, [9, 4]);
    }

    #[test]
    fn test_clear_keeps_identity_sequence() {
        let mut store = Store::<DungeonKinds>::new();
        store.spawn::<Npc>(("a", 1));
        store.spawn::<Pickup>(2);
        store.spawn::<Npc>(("b", 3));

        store.clear();

        assert_eq!(store.total(), 0);
        assert!(store.is_empty::<Npc>());
        assert!(store.is_empty::<Pickup>());
        assert_eq!(store.spawned(), 3);

        // Cleared identities never come back.
        assert_eq!(store.spawn::<Pickup>(4), 3);
    }

    #[test]
    fn test_access_supports_external_removal() {
        let mut store = Store::<DungeonKinds>::new();
        store.spawn::<Npc>(("keep", 10));
        store.spawn::<Npc>(("drop", 0));
        store.spawn::<Npc>(("keep", 7));

        // Externally implemented removal: the store itself has none.
        store
            .access::<Npc>()
            .retain(|holder| Npc::unwrap_ref(holder).hp > 0);

        let names: Vec<&str> = store.view::<Npc>().iter().map(|npc| npc.name).collect();
        assert_eq!(names, ["keep", "keep"]);
        assert_eq!(store.len::<Npc>(), 2);
    }

    #[test]
    fn test_capacity_survives_reserved_spawns() {
        let mut store = Store::<DungeonKinds>::with_capacity(8);
        assert!(store.access::<Npc>().capacity() >= 8);

        store.reserve::<Pickup>(32);
        let reserved = store.access::<Pickup>().capacity();
        assert!(reserved >= 32);

        for i in 0..32 {
            store.spawn::<Pickup>(i);
        }
        assert_eq!(store.access::<Pickup>().capacity(), reserved);
    }

    #[test]
    fn test_debug_reports_lane_counts() {
        let mut store = Store::<DungeonKinds>::new();
        store.spawn::<Npc>(("a", 1));
        store.spawn::<Npc>(("b", 2));
        store.spawn::<Pickup>(3);

        let printed = format!("{store:?}");
        assert!(printed.contains("kinds: 2"));
        assert!(printed.contains("[2, 1]"));
        assert!(printed.contains("spawned: 3"));
    }
}
