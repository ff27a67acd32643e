use std::collections::HashMap;

use log::{debug, warn};
use serde::Deserialize;

use crate::prelude::*;

/// How a collision force combines with a body's other forces.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionPolicy {
    /// The collision force is the only force applied that tick.
    Replace,
    /// The collision force is summed with intrinsic and world forces.
    Additive,
}

impl Default for ResolutionPolicy {
    fn default() -> Self {
        ResolutionPolicy::Replace
    }
}

/// How several simultaneous collisions on one body combine.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ContactAccumulation {
    /// The last pair in detection order wins.
    LastWins,
    /// Pairwise forces are summed.
    Sum,
}

impl Default for ContactAccumulation {
    fn default() -> Self {
        ContactAccumulation::LastWins
    }
}

/// Response force of each body touched by `collisions`.
///
/// Bodies whose pairs are all separating (or degenerate) map to a zero
/// vector and are treated as free by the integrator.
pub fn resolve(
    bodies: &[Body],
    collisions: &CollisionSet,
    accumulation: ContactAccumulation,
    tick_rate: Scalar,
) -> HashMap<BodyId, Vector2D> {
    let index: HashMap<BodyId, usize> = bodies.iter().enumerate().map(|(i, b)| (b.id(), i)).collect();
    let mut forces: HashMap<BodyId, Vector2D> = HashMap::new();

    for pair in collisions.iter() {
        let (a, b) = match (index.get(&pair.a), index.get(&pair.b)) {
            (Some(&a), Some(&b)) => (&bodies[a], &bodies[b]),
            _ => {
                warn!("collision {:?} refers to a body outside the world", pair);
                continue;
            }
        };

        let (on_a, on_b) = pair_response(a, b, tick_rate);
        debug!("collision {} <-> {}: {} / {}", a.id(), b.id(), on_a, on_b);

        for (id, force) in vec![(a.id(), on_a), (b.id(), on_b)] {
            match accumulation {
                ContactAccumulation::LastWins => {
                    forces.insert(id, force);
                }
                ContactAccumulation::Sum => {
                    let total = forces.entry(id).or_insert_with(|| Vector2D::new(force.tail, Vec2::zeros()));
                    *total = total.add(&force);
                }
            }
        }
    }

    forces
}

/// Elastic impulse along the line of centers, as per-tick forces on `a`
/// and `b` (impulse times tick rate).
fn pair_response(a: &Body, b: &Body, tick_rate: Scalar) -> (Vector2D, Vector2D) {
    let zero_a = Vector2D::new(a.position, Vec2::zeros());
    let zero_b = Vector2D::new(b.position, Vec2::zeros());

    let offset = b.position - a.position;
    let dist = offset.norm();
    if dist == 0.0 {
        warn!("bodies {} and {} share a center, no contact normal", a.id(), b.id());
        return (zero_a, zero_b);
    }
    let normal = offset / dist;

    // Closing speed along the normal; positive when approaching.
    let vn = (a.velocity.direction - b.velocity.direction).dot(&normal);
    if vn <= 0.0 {
        return (zero_a, zero_b);
    }

    let j = 2.0 * vn / (1.0 / a.mass() + 1.0 / b.mass());
    let force = normal * (j * tick_rate);
    (
        Vector2D::new(a.position, -force),
        Vector2D::new(b.position, force),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(id: u32, x: Scalar, vx: Scalar, mass: Scalar) -> Body {
        let mut body = Body::new(Point2::new(x, 0.0), 5.0, mass).unwrap();
        body.id = BodyId(id);
        body.velocity = Vector2D::from_components(vx, 0.0);
        body
    }

    #[test]
    fn equal_masses_swap_velocities() {
        let bodies = vec![body(0, 0.0, 1.0, 1.0), body(1, 8.0, -1.0, 1.0)];
        let set = BruteForce.detect(&bodies);
        let forces = resolve(&bodies, &set, ContactAccumulation::LastWins, 60.0);

        let dv_a = forces[&BodyId(0)].divide(60.0).unwrap();
        let dv_b = forces[&BodyId(1)].divide(60.0).unwrap();
        assert!(bodies[0].velocity.add(&dv_a).almost_eq(&Vector2D::from_components(-1.0, 0.0)));
        assert!(bodies[1].velocity.add(&dv_b).almost_eq(&Vector2D::from_components(1.0, 0.0)));
    }

    #[test]
    fn separating_pairs_get_no_force() {
        let bodies = vec![body(0, 0.0, -1.0, 1.0), body(1, 8.0, 1.0, 1.0)];
        let set = BruteForce.detect(&bodies);
        assert_eq!(set.len(), 1);
        let forces = resolve(&bodies, &set, ContactAccumulation::LastWins, 60.0);
        assert!(forces.values().all(|f| f.is_zero()));
    }

    #[test]
    fn momentum_is_conserved() {
        let bodies = vec![body(0, 0.0, 3.0, 2.0), body(1, 6.0, -0.5, 5.0)];
        let set = BruteForce.detect(&bodies);
        let forces = resolve(&bodies, &set, ContactAccumulation::Sum, 60.0);
        let total = forces[&BodyId(0)].add(&forces[&BodyId(1)]);
        assert!(total.magnitude() < 1e-9);
    }

    #[test]
    fn accumulation_modes_differ_for_multiple_contacts() {
        // middle body hit from both sides
        let bodies = vec![
            body(0, -8.0, 1.0, 1.0),
            body(1, 0.0, 0.0, 1.0),
            body(2, 8.0, -2.0, 1.0),
        ];
        let set = BruteForce.detect(&bodies);
        assert_eq!(set.partners(BodyId(1)).len(), 2);

        let last = resolve(&bodies, &set, ContactAccumulation::LastWins, 60.0);
        let sum = resolve(&bodies, &set, ContactAccumulation::Sum, 60.0);

        // pair (1, 2) comes last in detection order
        assert!(last[&BodyId(1)].almost_eq(&Vector2D::from_components(-120.0, 0.0)));
        assert!(sum[&BodyId(1)].almost_eq(&Vector2D::from_components(-60.0, 0.0)));
    }

    #[test]
    fn coincident_centers_get_no_force() {
        let mut moving = body(0, 3.0, 2.5, 1.0);
        moving.velocity = Vector2D::from_components(2.5, -1.0);
        let bodies = vec![moving, body(1, 3.0, 0.0, 4.0)];
        let set = BruteForce.detect(&bodies);
        assert_eq!(set.len(), 1);

        for &accumulation in &[ContactAccumulation::LastWins, ContactAccumulation::Sum] {
            let forces = resolve(&bodies, &set, accumulation, 60.0);
            assert_eq!(forces.len(), 2);
            assert!(forces.values().all(|f| f.is_zero()));
        }
    }
}
