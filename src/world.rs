use log::{debug, info};

use crate::error::{PhysicsError, Result};
use crate::integrator::{self, StepConfig, StepReport};
use crate::prelude::*;

/// A scene: the bodies it owns and the global fields acting on all of them.
#[derive(Debug, Clone, Default)]
pub struct World {
	pub name: String,
	pub(crate) objects: Vec<Body>,
	pub forces: Vec<Force>,
	/// Drag coefficient attached to every body when the world starts playing.
	pub drag: Option<Scalar>,
	pub collisions: CollisionSet,
}

impl World {
	pub fn new<S: Into<String>>(name: S) -> Self {
		World {
			name: name.into(),
			..World::default()
		}
	}

	/// Takes ownership of `body`. A body whose id is already in the world
	/// (a clone) is given a fresh one.
	pub fn add_body(&mut self, mut body: Body) -> BodyId {
		if self.body(body.id).is_some() {
			let fresh = BodyId::next();
			debug!("body {} already in '{}', now {}", body.id, self.name, fresh);
			body.id = fresh;
		}
		let id = body.id;
		self.objects.push(body);
		id
	}

	pub fn objects(&self) -> &[Body] {
		&self.objects
	}

	pub fn objects_mut(&mut self) -> std::slice::IterMut<'_, Body> {
		self.objects.iter_mut()
	}

	pub fn add_force<F: Into<Force>>(&mut self, force: F) {
		self.forces.push(force.into());
	}

	pub fn body(&self, id: BodyId) -> Option<&Body> {
		self.objects.iter().find(|b| b.id == id)
	}

	pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
		self.objects.iter_mut().find(|b| b.id == id)
	}

	/// Current centers, for whoever draws the scene.
	pub fn positions(&self) -> Vec<(BodyId, Point2)> {
		self.objects.iter().map(|b| (b.id, b.position)).collect()
	}

	fn attach_drag(&mut self) {
		if let Some(coefficient) = self.drag {
			for body in &mut self.objects {
				if !body.forces.iter().any(Force::is_drag) {
					body.forces.push(Drag::new(coefficient).into());
				}
			}
		}
	}
}

/// Lifecycle hooks for collaborators that follow the active world
/// (music, ambience). The core never calls into them otherwise.
pub trait WorldListener {
	fn on_load(&mut self, _world: &World) {}
	fn on_unload(&mut self, _world: &World) {}
}

/// Owns the playing world and drives it one tick at a time.
pub struct Simulation {
	config: StepConfig,
	detector: Box<dyn CollisionDetector>,
	current: Option<World>,
	listeners: Vec<Box<dyn WorldListener>>,
	ticks: u64,
}

impl Simulation {
	pub fn new(config: StepConfig) -> Self {
		Simulation::with_detector(config, Box::new(BruteForce))
	}

	pub fn with_detector(config: StepConfig, detector: Box<dyn CollisionDetector>) -> Self {
		Simulation {
			config,
			detector,
			current: None,
			listeners: Vec::new(),
			ticks: 0,
		}
	}

	pub fn config(&self) -> &StepConfig {
		&self.config
	}

	pub fn add_listener<L: WorldListener + 'static>(&mut self, listener: L) {
		self.listeners.push(Box::new(listener));
	}

	/// Makes `world` the active world and hands back the one it replaces.
	/// Must be called between ticks.
	pub fn play(&mut self, mut world: World) -> Option<World> {
		world.attach_drag();

		let old = self.current.take();
		if let Some(old) = &old {
			debug!("unloading world '{}'", old.name);
			for listener in &mut self.listeners {
				listener.on_unload(old);
			}
		}

		info!("playing world '{}' with {} bodies", world.name, world.objects.len());
		for listener in &mut self.listeners {
			listener.on_load(&world);
		}

		self.current = Some(world);
		self.ticks = 0;
		old
	}

	/// Deactivates the playing world, if any.
	pub fn end(&mut self) -> Option<World> {
		let world = self.current.take()?;
		debug!("ending world '{}' after {} ticks", world.name, self.ticks);
		for listener in &mut self.listeners {
			listener.on_unload(&world);
		}
		Some(world)
	}

	pub fn tick(&mut self) -> Result<StepReport> {
		let world = self.current.as_mut().ok_or(PhysicsError::NoActiveWorld)?;
		let report = integrator::step(world, self.detector.as_ref(), &self.config)?;
		self.ticks += 1;
		if report.collisions > 0 {
			debug!("tick {}: {:?}", self.ticks, report);
		}
		Ok(report)
	}

	pub fn world(&self) -> Option<&World> {
		self.current.as_ref()
	}

	pub fn world_mut(&mut self) -> Option<&mut World> {
		self.current.as_mut()
	}

	pub fn positions(&self) -> Vec<(BodyId, Point2)> {
		self.current.as_ref().map(World::positions).unwrap_or_default()
	}

	pub fn elapsed_ticks(&self) -> u64 {
		self.ticks
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::cell::RefCell;
	use std::rc::Rc;

	struct Recorder(Rc<RefCell<Vec<String>>>);

	impl WorldListener for Recorder {
		fn on_load(&mut self, world: &World) {
			self.0.borrow_mut().push(format!("load {}", world.name));
		}

		fn on_unload(&mut self, world: &World) {
			self.0.borrow_mut().push(format!("unload {}", world.name));
		}
	}

	#[test]
	fn ids_are_kept_and_clones_restamped() {
		let mut world = World::new("ids");
		let first = Body::new(Point2::origin(), 1.0, 1.0).unwrap();
		let first_id = first.id();
		let a = world.add_body(first.clone());
		let b = world.add_body(first);
		let c = world.add_body(Body::new(Point2::new(5.0, 0.0), 1.0, 1.0).unwrap());
		assert_eq!(a, first_id);
		assert!(a != b && b != c && a != c);
		assert_eq!(world.body(c).unwrap().position, Point2::new(5.0, 0.0));

		// the clone overlaps the original and must be seen as a pair
		assert!(BruteForce.detect(world.objects()).contains(a, b));
	}

	#[test]
	fn play_swaps_worlds_and_fires_hooks() {
		let log = Rc::new(RefCell::new(Vec::new()));
		let mut sim = Simulation::new(StepConfig::default());
		sim.add_listener(Recorder(log.clone()));

		assert!(sim.play(World::new("title")).is_none());
		let old = sim.play(World::new("level"));
		assert_eq!(old.map(|w| w.name), Some("title".to_string()));
		assert_eq!(sim.end().map(|w| w.name), Some("level".to_string()));
		assert!(sim.end().is_none());

		assert_eq!(
			*log.borrow(),
			vec!["load title", "unload title", "load level", "unload level"]
		);
	}

	#[test]
	fn tick_without_world_fails() {
		let mut sim = Simulation::new(StepConfig::default());
		assert_eq!(sim.tick(), Err(PhysicsError::NoActiveWorld));
	}

	#[test]
	fn world_drag_attached_once_on_play() {
		let mut world = World::new("windy");
		world.drag = Some(0.3);
		world.add_body(Body::new(Point2::origin(), 1.0, 1.0).unwrap());
		world.add_body(Body::new(Point2::new(9.0, 0.0), 1.0, 1.0).unwrap().with_force(Drag::new(1.0)));

		let mut sim = Simulation::new(StepConfig::default());
		sim.play(world);
		let world = sim.end().unwrap();
		assert_eq!(world.objects[0].forces, vec![Force::Drag(Drag::new(0.3))]);
		assert_eq!(world.objects[1].forces, vec![Force::Drag(Drag::new(1.0))]);
	}
}
