//! YAML scene files. See `scenes/` for samples.

use std::io::Read;

use serde::Deserialize;

use crate::error::{PhysicsError, Result};
use crate::integrator::{StepConfig, DEFAULT_TICK_RATE};
use crate::prelude::*;

fn default_tick_rate() -> Scalar {
    DEFAULT_TICK_RATE
}

fn default_density() -> Scalar {
    1.0
}

fn default_drag_coefficient() -> Scalar {
    crate::force::DEFAULT_DRAG_COEFFICIENT
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BroadPhaseConfig {
    BruteForce,
    Grid { cell_size: Scalar },
}

impl Default for BroadPhaseConfig {
    fn default() -> Self {
        BroadPhaseConfig::BruteForce
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    #[serde(default = "default_tick_rate")]
    pub tick_rate: Scalar,
    #[serde(default)]
    pub resolution: ResolutionPolicy,
    #[serde(default)]
    pub contacts: ContactAccumulation,
    #[serde(default)]
    pub broad_phase: BroadPhaseConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            tick_rate: DEFAULT_TICK_RATE,
            resolution: ResolutionPolicy::default(),
            contacts: ContactAccumulation::default(),
            broad_phase: BroadPhaseConfig::default(),
        }
    }
}

/// A force declaration, on a body or on the world.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ForceConfig {
    Gravity { acceleration: Scalar, angle: Scalar },
    Constant { x: Scalar, y: Scalar },
    Drag {
        #[serde(default = "default_drag_coefficient")]
        coefficient: Scalar,
    },
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct PolarConfig {
    pub magnitude: Scalar,
    pub angle: Scalar,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct BodyConfig {
    pub position: [Scalar; 2],
    pub radius: Scalar,
    pub mass: Scalar,
    #[serde(default = "default_density")]
    pub density: Scalar,
    pub reference_area: Option<Scalar>,
    pub initial_velocity: Option<PolarConfig>,
    #[serde(default)]
    pub forces: Vec<ForceConfig>,
    #[serde(default)]
    pub objects: Vec<BodyConfig>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct WorldConfig {
    #[serde(default)]
    pub name: String,
    pub drag: Option<Scalar>,
    #[serde(default)]
    pub forces: Vec<ForceConfig>,
    #[serde(default)]
    pub bodies: Vec<BodyConfig>,
}

/// Top-level scene document.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct SceneConfig {
    #[serde(default)]
    pub simulation: SimulationConfig,
    pub world: WorldConfig,
}

/// Everything needed to start playing a scene.
pub struct Scene {
    pub step: StepConfig,
    pub detector: Box<dyn CollisionDetector>,
    pub world: World,
}

impl SceneConfig {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        serde_yaml::from_reader(reader).map_err(|e| PhysicsError::Config(e.to_string()))
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).map_err(|e| PhysicsError::Config(e.to_string()))
    }

    pub fn build(&self) -> Result<Scene> {
        let sim = &self.simulation;
        let step = StepConfig {
            tick_rate: sim.tick_rate,
            policy: sim.resolution,
            accumulation: sim.contacts,
        };
        step.check().map_err(|e| PhysicsError::Config(format!("simulation.tick_rate: {}", e)))?;

        let detector: Box<dyn CollisionDetector> = match sim.broad_phase {
            BroadPhaseConfig::BruteForce => Box::new(BruteForce),
            BroadPhaseConfig::Grid { cell_size } if cell_size > 0.0 => Box::new(UniformGrid::new(cell_size)),
            BroadPhaseConfig::Grid { cell_size } => {
                return Err(PhysicsError::Config(format!("grid cell_size must be positive, got {}", cell_size)));
            }
        };

        let mut world = World::new(self.world.name.clone());
        world.drag = self.world.drag;
        for force in &self.world.forces {
            world.add_force(force.build_field());
        }
        for body in &self.world.bodies {
            world.add_body(body.build()?);
        }

        Ok(Scene {
            step,
            detector,
            world,
        })
    }
}

impl ForceConfig {
    /// As a world field: gravity is authored per unit mass.
    fn build_field(&self) -> Force {
        match *self {
            ForceConfig::Gravity { acceleration, angle } => Gravity::field(acceleration, angle).into(),
            ForceConfig::Constant { x, y } => ConstantField::new(Vector2D::from_components(x, y)).into(),
            ForceConfig::Drag { coefficient } => Drag::new(coefficient).into(),
        }
    }

    /// As a body force: gravity uses the body's own mass.
    fn build_for(&self, body: &Body) -> Force {
        match *self {
            ForceConfig::Gravity { acceleration, angle } => Gravity::on(body, acceleration, angle).into(),
            _ => self.build_field(),
        }
    }
}

impl BodyConfig {
    fn build(&self) -> Result<Body> {
        let [x, y] = self.position;
        let mut body = Body::new(Point2::new(x, y), self.radius, self.mass)?.with_density(self.density);
        if let Some(area) = self.reference_area {
            body = body.with_reference_area(area);
        }
        if let Some(v) = &self.initial_velocity {
            body = body.with_initial_velocity(v.magnitude, v.angle);
        }

        let forces: Vec<Force> = self.forces.iter().map(|f| f.build_for(&body)).collect();
        body.forces = forces;

        for object in &self.objects {
            body.objects.push(object.build()?);
        }
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENE: &str = r#"
simulation:
  tick_rate: 30
  resolution: additive
  contacts: sum
  broad_phase:
    kind: grid
    cell_size: 16.0
world:
  name: yard
  drag: 0.47
  forces:
    - type: gravity
      acceleration: 9.8
      angle: 180
  bodies:
    - position: [0.0, 10.0]
      radius: 5.0
      mass: 2.0
      initial_velocity: { magnitude: 3.0, angle: 0 }
      forces:
        - type: gravity
          acceleration: 1.0
          angle: 0
    - position: [20.0, 10.0]
      radius: 2.0
      mass: 1.0
      density: 3.0
"#;

    #[test]
    fn parses_full_scene() {
        let cfg = SceneConfig::from_yaml(SCENE).unwrap();
        assert_eq!(cfg.simulation.tick_rate, 30.0);
        assert_eq!(cfg.simulation.resolution, ResolutionPolicy::Additive);
        assert_eq!(cfg.simulation.contacts, ContactAccumulation::Sum);
        assert_eq!(cfg.simulation.broad_phase, BroadPhaseConfig::Grid { cell_size: 16.0 });

        let scene = cfg.build().unwrap();
        assert_eq!(scene.step.tick_rate, 30.0);
        assert_eq!(scene.world.name, "yard");
        assert_eq!(scene.world.objects().len(), 2);
        assert_eq!(scene.world.forces.len(), 1);

        let first = &scene.world.objects()[0];
        // body gravity is built from the body's mass
        match &first.forces[0] {
            Force::Gravity(g) => assert!(g.vector().almost_eq(&Vector2D::from_components(0.0, 2.0))),
            other => panic!("unexpected force {:?}", other),
        }
        assert!(first.velocity.almost_eq(&Vector2D::from_components(0.0, 3.0)));
        assert_eq!(scene.world.objects()[1].density, 3.0);
    }

    #[test]
    fn defaults_apply() {
        let cfg = SceneConfig::from_yaml("world:\n  bodies: []\n").unwrap();
        assert_eq!(cfg.simulation, SimulationConfig::default());
        assert_eq!(cfg.build().unwrap().step, StepConfig::default());
    }

    #[test]
    fn rejects_bad_values() {
        let cfg = SceneConfig::from_yaml("simulation:\n  tick_rate: 0\nworld: {}\n").unwrap();
        assert!(matches!(cfg.build(), Err(PhysicsError::Config(_))));

        let massless = "world:\n  bodies:\n    - position: [0, 0]\n      radius: 1\n      mass: 0\n";
        let cfg = SceneConfig::from_yaml(massless).unwrap();
        assert!(matches!(cfg.build(), Err(PhysicsError::NonPositiveMass { .. })));

        let negative = "simulation:\n  tick_rate: -30\nworld: {}\n";
        assert!(matches!(SceneConfig::from_yaml(negative).unwrap().build(), Err(PhysicsError::Config(_))));

        let shrunk = "world:\n  bodies:\n    - position: [0, 0]\n      radius: -1\n      mass: 1\n";
        let cfg = SceneConfig::from_yaml(shrunk).unwrap();
        assert!(matches!(cfg.build(), Err(PhysicsError::InvalidRadius { .. })));

        assert!(matches!(SceneConfig::from_yaml("world: ["), Err(PhysicsError::Config(_))));
    }
}
