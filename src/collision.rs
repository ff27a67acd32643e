use std::collections::{BTreeSet, HashMap};

use log::{trace, warn};

use crate::prelude::*;

/// An unordered pair of colliding bodies, stored as `(low, high)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pair {
    pub a: BodyId,
    pub b: BodyId,
}

impl Pair {
    pub fn new(a: BodyId, b: BodyId) -> Self {
        if a <= b {
            Pair { a, b }
        } else {
            Pair { a: b, b: a }
        }
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.a == id || self.b == id
    }

    /// The participant that is not `id`.
    pub fn other(&self, id: BodyId) -> Option<BodyId> {
        if self.a == id {
            Some(self.b)
        } else if self.b == id {
            Some(self.a)
        } else {
            None
        }
    }
}

/// Collisions found in one tick. Iteration is in ascending pair order,
/// which is also the detection order the resolver honours.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionSet {
    pairs: BTreeSet<Pair>,
}

impl CollisionSet {
    pub fn new() -> Self {
        CollisionSet::default()
    }

    pub fn insert(&mut self, a: BodyId, b: BodyId) {
        if a != b {
            self.pairs.insert(Pair::new(a, b));
        }
    }

    pub fn contains(&self, a: BodyId, b: BodyId) -> bool {
        self.pairs.contains(&Pair::new(a, b))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pair> {
        self.pairs.iter()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Every body involved in at least one collision.
    pub fn collided_objects(&self) -> BTreeSet<BodyId> {
        self.pairs.iter().flat_map(|p| vec![p.a, p.b]).collect()
    }

    /// Bodies colliding with `id`.
    pub fn partners(&self, id: BodyId) -> Vec<BodyId> {
        self.pairs.iter().filter_map(|p| p.other(id)).collect()
    }
}

/// Narrow-phase test for one candidate pair.
fn test_pair(set: &mut CollisionSet, a: &Body, b: &Body) {
    if !a.overlaps(b) {
        return;
    }
    if a.id == b.id {
        warn!("two overlapping bodies share id {}, pair dropped", a.id);
        return;
    }
    trace!("overlap {} {}", a.id, b.id);
    set.insert(a.id, b.id);
}

pub trait CollisionDetector {
    fn detect(&self, bodies: &[Body]) -> CollisionSet;
}

/// Tests every unordered pair. O(n²), fine for scenes of a few dozen bodies.
#[derive(Debug, Clone, Copy, Default)]
pub struct BruteForce;

impl CollisionDetector for BruteForce {
    fn detect(&self, bodies: &[Body]) -> CollisionSet {
        let mut set = CollisionSet::new();
        let len = bodies.len();

        for i in 0..len {
            for j in (i + 1)..len {
                test_pair(&mut set, &bodies[i], &bodies[j]);
            }
        }

        set
    }
}

/// Widest run of cells a body may cover per axis before it is tested
/// against everything instead of being bucketed.
pub const MAX_CELL_SPAN: Scalar = 16.0;

/// Hash grid broad-phase. Bodies are bucketed by every cell their bounding
/// square touches; only bodies sharing a cell are tested. Bodies too large
/// for the grid, or off it entirely, fall back to brute force.
#[derive(Debug, Clone, Copy)]
pub struct UniformGrid {
    pub cell_size: Scalar,
}

impl UniformGrid {
    pub fn new(cell_size: Scalar) -> Self {
        UniformGrid { cell_size }
    }

    /// Cell range `(first, last)` covered along one axis, or `None` when
    /// the extent is not finite or spans too many cells.
    fn span(&self, center: Scalar, r: Scalar) -> Option<(i64, i64)> {
        let lo = ((center - r) / self.cell_size).floor();
        let hi = ((center + r) / self.cell_size).floor();
        if lo.is_finite() && hi.is_finite() && hi - lo < MAX_CELL_SPAN {
            Some((lo as i64, hi as i64))
        } else {
            None
        }
    }
}

impl CollisionDetector for UniformGrid {
    fn detect(&self, bodies: &[Body]) -> CollisionSet {
        if !(self.cell_size > 0.0 && self.cell_size.is_finite()) {
            return BruteForce.detect(bodies);
        }

        let mut cells: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
        let mut loose = Vec::new();
        for (idx, body) in bodies.iter().enumerate() {
            let r = body.radius();
            match (self.span(body.position.x, r), self.span(body.position.y, r)) {
                (Some((x0, x1)), Some((y0, y1))) => {
                    for cx in x0..=x1 {
                        for cy in y0..=y1 {
                            cells.entry((cx, cy)).or_insert_with(Vec::new).push(idx);
                        }
                    }
                }
                _ => loose.push(idx),
            }
        }

        let mut set = CollisionSet::new();
        for members in cells.values() {
            for (n, &i) in members.iter().enumerate() {
                for &j in &members[n + 1..] {
                    if !set.contains(bodies[i].id, bodies[j].id) {
                        test_pair(&mut set, &bodies[i], &bodies[j]);
                    }
                }
            }
        }

        for (n, &i) in loose.iter().enumerate() {
            for (j, other) in bodies.iter().enumerate() {
                // loose pairs are tested once, from the lower loose index
                if j == i || loose[..n].contains(&j) {
                    continue;
                }
                test_pair(&mut set, &bodies[i], other);
            }
        }

        set
    }
}
