//! Room registry for Parlor.
//!
//! One [`RoomRegistry`] per game type owns every live room of that game:
//! it draws collision-free room ids, seats arriving sessions into the two
//! player slots, stores each room's game state next to it, and sweeps
//! rooms whose expiry has passed.
//!
//! # Key types
//!
//! - [`GameEngine`]: the trait each game implements (rules live there)
//! - [`RoomRegistry`]: shared, lock-guarded handle used by request tasks
//! - [`RoomTable`]: the unsynchronized table pair the registry guards
//! - [`Room`]: one room record (slots + expiry)
//! - [`GameStateStore`]: the game-state half of the table pair
//! - [`RoomConfig`]: ttl, id space, sweep throttle
//! - [`spawn_sweeper`]: optional periodic sweep task
//!
//! # Lifecycle
//!
//! ```text
//! create ──→ [Waiting] ──join──→ [Active] ──expire passes──→ swept
//!                                    │
//!                        engine reports terminal:
//!                        expire shortened to now + finished_grace
//! ```

mod config;
mod engine;
mod error;
mod registry;
mod room;
mod store;
mod sweeper;
mod table;

pub use config::RoomConfig;
pub use engine::GameEngine;
pub use error::{MoveRejected, RoomError};
pub use registry::RoomRegistry;
pub use room::Room;
pub use store::GameStateStore;
pub use sweeper::{SweeperHandle, spawn_sweeper};
pub use table::RoomTable;
