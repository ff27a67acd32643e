use std::fmt;

use crate::error::{PhysicsError, Result};
use crate::prelude::*;

/// Decimal places used by [`Vector2D::almost_eq`].
pub const EQ_DECIMALS: i32 = 4;

/// `true` when `a` and `b` agree once rounded to `dp` decimal places.
pub fn almost_equal(a: Scalar, b: Scalar, dp: i32) -> bool {
    let scale = 10f64.powi(dp);
    (a * scale).round() == (b * scale).round()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector2D {
    pub tail: Point2,
    pub direction: Vec2,
}

impl Default for Vector2D {
    fn default() -> Self {
        Vector2D::zero()
    }
}

impl Vector2D {
    pub fn new(tail: Point2, direction: Vec2) -> Self {
        Vector2D { tail, direction }
    }

    pub fn from_components(x: Scalar, y: Scalar) -> Self {
        Vector2D::new(Point2::origin(), Vec2::new(x, y))
    }

    pub fn zero() -> Self {
        Vector2D::new(Point2::origin(), Vec2::zeros())
    }

    /// Builds a vector from a magnitude and an authoring angle in degrees.
    ///
    /// 0 degrees points straight up: the stored direction is
    /// `magnitude * (cos(angle + 90°), sin(angle + 90°))`.
    pub fn from_polar(tail: Point2, magnitude: Scalar, angle_degrees: Scalar) -> Self {
        let angle = (angle_degrees + 90.0).to_radians();
        Vector2D::new(tail, Vec2::new(magnitude * angle.cos(), magnitude * angle.sin()))
    }

    pub fn x(&self) -> Scalar {
        self.direction.x
    }

    pub fn y(&self) -> Scalar {
        self.direction.y
    }

    pub fn add(&self, other: &Vector2D) -> Vector2D {
        Vector2D::new(self.tail, self.direction + other.direction)
    }

    pub fn sub(&self, other: &Vector2D) -> Vector2D {
        Vector2D::new(self.tail, self.direction - other.direction)
    }

    pub fn scale(&self, s: Scalar) -> Vector2D {
        Vector2D::new(self.tail, self.direction * s)
    }

    pub fn divide(&self, s: Scalar) -> Result<Vector2D> {
        if s == 0.0 {
            return Err(PhysicsError::DivisionByZero);
        }
        Ok(Vector2D::new(self.tail, self.direction / s))
    }

    pub fn negate(&self) -> Vector2D {
        Vector2D::new(self.tail, -self.direction)
    }

    pub fn magnitude(&self) -> Scalar {
        self.direction.norm()
    }

    /// Authoring angle of the direction, in radians.
    ///
    /// This is `atan(x / y)` with no quadrant correction: 0 when x is 0,
    /// π/2 when y is 0. Opposite vectors report the same angle. Force
    /// authoring in scene files depends on exactly this convention.
    pub fn angle(&self) -> Scalar {
        let (x, y) = (self.direction.x, self.direction.y);
        if x == 0.0 {
            0.0
        } else if y == 0.0 {
            std::f64::consts::FRAC_PI_2
        } else {
            (x / y).atan()
        }
    }

    /// Tolerant equality on the direction components.
    pub fn almost_eq(&self, other: &Vector2D) -> bool {
        almost_equal(self.direction.x, other.direction.x, EQ_DECIMALS)
            && almost_equal(self.direction.y, other.direction.y, EQ_DECIMALS)
    }

    pub fn is_zero(&self) -> bool {
        self.direction.x == 0.0 && self.direction.y == 0.0
    }

    /// Dynamically typed arithmetic, for callers holding an operand whose
    /// kind is only known at runtime.
    pub fn eval(&self, op: Operator, rhs: Operand) -> Result<Vector2D> {
        match (op, rhs) {
            (Operator::Add, Operand::Vector(v)) => Ok(self.add(&v)),
            (Operator::Sub, Operand::Vector(v)) => Ok(self.sub(&v)),
            (Operator::Scale, Operand::Scalar(s)) => Ok(self.scale(s)),
            (Operator::Divide, Operand::Scalar(s)) => self.divide(s),
            (op, rhs) => Err(PhysicsError::InvalidOperandKind {
                op: op.name(),
                found: rhs.kind(),
            }),
        }
    }
}

impl fmt::Display for Vector2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.4}, {:.4}) at {} degrees",
            self.direction.x,
            self.direction.y,
            self.angle().to_degrees() as i64
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Scale,
    Divide,
}

impl Operator {
    fn name(self) -> &'static str {
        match self {
            Operator::Add => "addition",
            Operator::Sub => "subtraction",
            Operator::Scale => "scaling",
            Operator::Divide => "division",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operand {
    Vector(Vector2D),
    Scalar(Scalar),
}

impl Operand {
    fn kind(&self) -> &'static str {
        match self {
            Operand::Vector(_) => "vector",
            Operand::Scalar(_) => "scalar",
        }
    }
}

impl From<Vector2D> for Operand {
    fn from(v: Vector2D) -> Self {
        Operand::Vector(v)
    }
}

impl From<Scalar> for Operand {
    fn from(s: Scalar) -> Self {
        Operand::Scalar(s)
    }
}
