//! Small real-time 2D physics core.

pub mod body;
pub mod collision;
pub mod config;
pub mod error;
pub mod force;
pub mod integrator;
pub mod prelude;
pub mod resolver;
pub mod vector;
pub mod world;

pub use crate::error::{PhysicsError, Result};
pub use crate::integrator::step;
