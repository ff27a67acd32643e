use crate::prelude::*;

/// Sphere drag coefficient, used when a scene does not give one.
pub const DEFAULT_DRAG_COEFFICIENT: Scalar = 0.47;

/// Where a force is attached, which decides how it is scaled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attachment {
    /// Owned by a single body.
    Body,
    /// A global field of the world, authored as an acceleration.
    World,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Force {
    Constant(ConstantField),
    Gravity(Gravity),
    Drag(Drag),
}

impl Force {
    /// Contribution of this force to `body`'s net force for the current tick.
    pub fn apply(&self, body: &Body, attachment: Attachment) -> Vector2D {
        let contribution = match self {
            Force::Constant(field) => field.apply(body),
            Force::Gravity(gravity) => gravity.apply(body),
            Force::Drag(drag) => return drag.apply(body),
        };
        match attachment {
            Attachment::Body => contribution,
            Attachment::World => contribution.scale(body.mass()),
        }
    }

    pub fn is_drag(&self) -> bool {
        match self {
            Force::Drag(_) => true,
            _ => false,
        }
    }
}

impl From<ConstantField> for Force {
    fn from(f: ConstantField) -> Self {
        Force::Constant(f)
    }
}

impl From<Gravity> for Force {
    fn from(g: Gravity) -> Self {
        Force::Gravity(g)
    }
}

impl From<Drag> for Force {
    fn from(d: Drag) -> Self {
        Force::Drag(d)
    }
}

/// A fixed vector, e.g. a wind or world gravity field.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantField {
    pub field: Vector2D,
}

impl ConstantField {
    pub fn new(field: Vector2D) -> Self {
        ConstantField { field }
    }

    pub fn apply(&self, _body: &Body) -> Vector2D {
        self.field
    }
}

/// Gravity pulling at a fixed authoring angle.
///
/// The vector is fixed at construction as `acceleration * mass` at `angle`
/// degrees (0 = straight up). A world field is built with `mass = 1` and
/// scaled per body when applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Gravity {
    pub acceleration: Scalar,
    pub mass: Scalar,
    pub angle: Scalar,
    vector: Vector2D,
}

impl Gravity {
    pub fn new(tail: Point2, acceleration: Scalar, mass: Scalar, angle: Scalar) -> Self {
        Gravity {
            acceleration,
            mass,
            angle,
            vector: Vector2D::from_polar(tail, acceleration * mass, angle),
        }
    }

    /// Gravity attached to `body`, using its mass and position.
    pub fn on(body: &Body, acceleration: Scalar, angle: Scalar) -> Self {
        Gravity::new(body.position, acceleration, body.mass(), angle)
    }

    /// Unit-mass gravity field for the world.
    pub fn field(acceleration: Scalar, angle: Scalar) -> Self {
        Gravity::new(Point2::origin(), acceleration, 1.0, angle)
    }

    pub fn vector(&self) -> Vector2D {
        self.vector
    }

    pub fn apply(&self, _body: &Body) -> Vector2D {
        self.vector
    }
}

/// Quadratic drag opposing the body's current velocity.
#[derive(Debug, Clone, PartialEq)]
pub struct Drag {
    pub coefficient: Scalar,
}

impl Default for Drag {
    fn default() -> Self {
        Drag { coefficient: DEFAULT_DRAG_COEFFICIENT }
    }
}

impl Drag {
    pub fn new(coefficient: Scalar) -> Self {
        Drag { coefficient }
    }

    /// Per axis: `-sign(v) * c * density * v² / 2 * reference_area`.
    pub fn apply(&self, body: &Body) -> Vector2D {
        let v = body.velocity.direction;
        let k = self.coefficient * body.density / 2.0 * body.reference_area;
        let axis = |c: Scalar| if c == 0.0 { 0.0 } else { -c.signum() * k * c * c };
        Vector2D::new(body.position, Vec2::new(axis(v.x), axis(v.y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ball(mass: Scalar) -> Body {
        Body::new(Point2::new(0.0, 0.0), 1.0, mass).unwrap()
    }

    #[test]
    fn world_fields_scale_by_mass() {
        let body = ball(3.0);
        let field: Force = ConstantField::new(Vector2D::from_components(1.0, -2.0)).into();
        let on_body = field.apply(&body, Attachment::Body);
        let on_world = field.apply(&body, Attachment::World);
        assert!(on_body.almost_eq(&Vector2D::from_components(1.0, -2.0)));
        assert!(on_world.almost_eq(&Vector2D::from_components(3.0, -6.0)));
    }

    #[test]
    fn gravity_fixed_at_construction() {
        let mut body = ball(2.0);
        let gravity = Gravity::on(&body, 10.0, 0.0);
        let before = gravity.apply(&body);
        body.velocity = Vector2D::from_components(5.0, 5.0);
        body.position = Point2::new(100.0, -3.0);
        assert_eq!(before, gravity.apply(&body));
        assert!(before.almost_eq(&Vector2D::from_components(0.0, 20.0)));
    }

    #[test]
    fn drag_opposes_motion_quadratically() {
        let mut body = ball(1.0);
        body.density = 2.0;
        body.reference_area = 1.0;
        let drag = Drag::new(0.5);

        body.velocity = Vector2D::from_components(2.0, -1.0);
        let f = drag.apply(&body);
        // k = 0.5 * 2 / 2 * 1 = 0.5
        assert!(f.almost_eq(&Vector2D::from_components(-2.0, 0.5)));

        body.velocity = Vector2D::from_components(4.0, -2.0);
        let g = drag.apply(&body);
        assert!((g.magnitude() / f.magnitude() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn drag_is_not_mass_scaled_at_world_level() {
        let mut body = ball(10.0);
        body.velocity = Vector2D::from_components(1.0, 0.0);
        let drag: Force = Drag::default().into();
        assert_eq!(
            drag.apply(&body, Attachment::World),
            drag.apply(&body, Attachment::Body)
        );
    }
}
