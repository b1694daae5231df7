//! Warren Store - closed-registry entity storage and iteration engine.
//!
//! Holds a fixed, compile-time set of entity kinds in per-kind contiguous
//! lanes of tagged holders, assigns every spawned entity a store-wide
//! unique identity, and offers typed random-access views plus a
//! capability-filtered visitor. No virtual dispatch, no runtime type
//! checks: lane selection is an associated const and visitor dispatch is
//! monomorphized per operation.
//!
//! # Key Concepts
//!
//! - **Kind**: A concrete entity type registered with a store
//! - **Holder**: A tagged union carrying exactly one active kind
//! - **Lane**: The contiguous growable sequence of one kind's holders
//! - **View**: A typed, restartable, random-access range over one lane
//! - **Identity**: The store-wide unique, monotonically assigned id
//!
//! # Example
//!
//! ```
//! use warren_store::{Identity, Kind, Store};
//!
//! struct Npc {
//!     identity: Identity,
//!     hp: i32,
//! }
//!
//! impl Kind for Npc {
//!     type Args = i32;
//!
//!     fn create(identity: Identity, hp: i32) -> Self {
//!         Self { identity, hp }
//!     }
//!
//!     fn identity(&self) -> Identity {
//!         self.identity
//!     }
//! }
//!
//! warren_store::registry! {
//!     pub WorldKinds {
//!         holder: WorldHolder,
//!         visitor: WorldVisitor,
//!         kinds: {
//!             Npc => visit_npc,
//!         },
//!     }
//! }
//!
//! struct Damage(i32);
//!
//! impl WorldVisitor for Damage {
//!     fn visit_npc(&mut self, npc: &mut Npc) {
//!         npc.hp -= self.0;
//!     }
//! }
//!
//! let mut store = Store::<WorldKinds>::new();
//! store.spawn::<Npc>(10);
//! store.spawn::<Npc>(5);
//!
//! store.visit(&mut Damage(1));
//!
//! let view = store.view::<Npc>();
//! assert_eq!(view.len(), 2);
//! assert_eq!(view[0].hp, 9);
//! assert_eq!(view[1].hp, 4);
//! ```

mod identity;
mod kind;
mod registry;
mod store;
mod view;

pub use identity::{Identity, IdentityAllocator};
#[doc(hidden)]
pub use kind::holder_mismatch;
pub use kind::{Dispatch, Kind, Member, Registry};
pub use store::Store;
pub use view::{Iter, IterMut, View, ViewMut};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Dispatch, Identity, Kind, Member, Registry, Store};
}
