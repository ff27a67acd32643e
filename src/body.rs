use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::error::{PhysicsError, Result};
use crate::prelude::*;

/// Identity of a body, used to key collisions. Unique within the process;
/// only `Clone` can produce two bodies sharing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BodyId(pub u32);

static NEXT_ID: AtomicU32 = AtomicU32::new(0);

impl BodyId {
    /// Fresh id, never handed out before in this process.
    pub fn next() -> Self {
        BodyId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// A circular mass. Sub-bodies in `objects` ride along with their parent.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub(crate) id: BodyId,
    pub position: Point2,
    radius: Scalar,
    mass: Scalar,
    pub density: Scalar,
    pub reference_area: Scalar,
    pub velocity: Vector2D,
    pub exerted_force: Vector2D,
    pub forces: Vec<Force>,
    pub objects: Vec<Body>,
    pub collided: Vec<BodyId>,
}

impl Body {
    pub fn new(position: Point2, radius: Scalar, mass: Scalar) -> Result<Self> {
        check_mass(mass)?;
        check_radius(radius)?;
        Ok(Body {
            id: BodyId::next(),
            position,
            radius,
            mass,
            density: 1.0,
            reference_area: 2.0 * radius,
            velocity: Vector2D::new(position, Vec2::zeros()),
            exerted_force: Vector2D::zero(),
            forces: Vec::new(),
            objects: Vec::new(),
            collided: Vec::new(),
        })
    }

    pub fn id(&self) -> BodyId {
        self.id
    }

    pub fn radius(&self) -> Scalar {
        self.radius
    }

    pub fn set_radius(&mut self, radius: Scalar) -> Result<()> {
        check_radius(radius)?;
        self.radius = radius;
        Ok(())
    }

    pub fn mass(&self) -> Scalar {
        self.mass
    }

    pub fn set_mass(&mut self, mass: Scalar) -> Result<()> {
        check_mass(mass)?;
        self.mass = mass;
        Ok(())
    }

    pub fn with_density(mut self, density: Scalar) -> Self {
        self.density = density;
        self
    }

    pub fn with_reference_area(mut self, area: Scalar) -> Self {
        self.reference_area = area;
        self
    }

    /// Launches the body, as if thrown: the previous-tick force is seeded
    /// with the momentum so drag and collisions see it on the first tick.
    pub fn with_initial_velocity(mut self, magnitude: Scalar, angle: Scalar) -> Self {
        self.velocity = Vector2D::from_polar(self.position, magnitude, angle);
        self.exerted_force = self.velocity.scale(self.mass);
        self
    }

    pub fn with_force<F: Into<Force>>(mut self, force: F) -> Self {
        self.forces.push(force.into());
        self
    }

    pub fn with_object(mut self, object: Body) -> Self {
        self.objects.push(object);
        self
    }

    pub fn dist(&self, other: &Self) -> Scalar {
        na::distance(&self.position, &other.position)
    }

    pub fn dist2(&self, other: &Self) -> Scalar {
        na::distance_squared(&self.position, &other.position)
    }

    pub fn overlaps(&self, other: &Self) -> bool {
        let reach = self.radius + other.radius;
        self.dist2(other) < reach * reach
    }

    /// Moves the body and everything it carries by `delta`.
    pub(crate) fn translate(&mut self, delta: Vec2) {
        self.position += delta;
        for object in &mut self.objects {
            object.translate(delta);
        }
    }
}

fn check_mass(mass: Scalar) -> Result<()> {
    if mass > 0.0 && mass.is_finite() {
        Ok(())
    } else {
        Err(PhysicsError::NonPositiveMass { mass })
    }
}

fn check_radius(radius: Scalar) -> Result<()> {
    if radius >= 0.0 && radius.is_finite() {
        Ok(())
    } else {
        Err(PhysicsError::InvalidRadius { radius })
    }
}
