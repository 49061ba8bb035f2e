//! Domain models with validation at construction
//!
//! Records read back from the store (`House`, `Tree`) are plain data.
//! All client input is validated when creating `NewHouse` / `NewTree`.
//! Invalid input returns ValidationError, not panic.

pub mod validation;
pub mod house;
pub mod tree;

pub use validation::ValidationError;
pub use house::{AddHouseRequest, House, NewHouse};
pub use tree::{GridCoord, NewTree, PlantTreeRequest, Tree, GRID_MAX, GRID_MIN};
