//! Deterministic simulation module
//!
//! All gameplay logic lives here:
//! - Fixed timestep only; every interval is a tick-counted [`Timer`]
//! - Seeded RNG only, handed in by the session
//! - Stable iteration order (arena slot order, sorted query results)
//! - No rendering or platform dependencies beyond emitting draw commands

pub mod arena;
pub mod collision;
pub mod entities;
pub mod input;
pub mod player;
pub mod shape;
pub mod spatial;
pub mod spawner;
pub mod stars;
pub mod store;
pub mod tags;
pub mod timer;
pub mod world;

pub use arena::{Arena, Key};
pub use entities::{Alien, AlienPattern, Bolt, Exhaust, Meteor, MeteorSize, Rock, Shield};
pub use input::TickInput;
pub use player::{LifeState, Player, Weapon};
pub use shape::Shape;
pub use spatial::{Collider, EntityKind, ObjectData, ShapeId, SpatialIndex};
pub use spawner::{Heartbeat, SpawnController};
pub use stars::{Star, Starfield};
pub use store::{Commit, EntityStore};
pub use tags::Tags;
pub use timer::Timer;
pub use world::{GameWorld, TickSignal};
