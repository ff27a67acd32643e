use thiserror::Error;

/// Errors raised by vector arithmetic, body construction and the tick loop.
///
/// None of these are recovered locally: they abort the operation that raised
/// them and surface to whoever drives the tick.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    /// Wrong operand kind for the requested vector operation.
    #[error("operand of kind {found} is not valid for vector {op}")]
    InvalidOperandKind { op: &'static str, found: &'static str },

    /// Scalar division by zero.
    #[error("division of a vector by zero")]
    DivisionByZero,

    /// Body constructed or mutated with a mass that is not strictly positive.
    #[error("body mass must be strictly positive, got {mass}")]
    NonPositiveMass { mass: f64 },

    /// Body radius negative or not finite.
    #[error("body radius must be finite and non-negative, got {radius}")]
    InvalidRadius { radius: f64 },

    /// Tick rate negative, not finite, or too small to give a frame length.
    #[error("tick rate must be finite and positive, got {rate}")]
    InvalidTickRate { rate: f64 },

    /// `tick` called while no world is playing.
    #[error("no world is currently playing")]
    NoActiveWorld,

    /// Scene configuration could not be turned into a world.
    #[error("invalid scene configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, PhysicsError>;
