//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or platform dependencies

pub mod clock;
pub mod collision;
pub mod mutation;
pub mod schedule;
pub mod scroller;
pub mod spawner;
pub mod state;
pub mod tick;

pub use clock::{FixedTimestep, FrameClock};
pub use collision::{Aabb, Contact, detect_contacts};
pub use mutation::{Mutation, MutationEconomy, MutationType, cost_for};
pub use schedule::Scheduler;
pub use scroller::Scroller;
pub use spawner::Spawner;
pub use state::{
    Entity, EntityKind, GameEvent, Player, Round, RoundSnapshot, RoundState,
};
pub use tick::{TickInput, tick};
