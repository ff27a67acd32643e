pub use nalgebra as na;

pub type Scalar = f64;

pub type Vec2 = na::Vector2<Scalar>;
pub type Point2 = na::Point2<Scalar>;

pub use crate::{
    body::{Body, BodyId},
    collision::{BruteForce, CollisionDetector, CollisionSet, Pair, UniformGrid},
    error::{PhysicsError, Result},
    force::{Attachment, ConstantField, Drag, Force, Gravity},
    integrator::{StepConfig, StepReport},
    resolver::{ContactAccumulation, ResolutionPolicy},
    vector::{almost_equal, Operand, Operator, Vector2D},
    world::{Simulation, World, WorldListener},
};
