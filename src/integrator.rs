use std::time::Duration;

use log::trace;

use crate::error::{PhysicsError, Result};
use crate::prelude::*;
use crate::resolver;

/// Steps per second of the external clock.
pub const DEFAULT_TICK_RATE: Scalar = 60.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepConfig {
	pub tick_rate: Scalar,
	pub policy: ResolutionPolicy,
	pub accumulation: ContactAccumulation,
}

impl Default for StepConfig {
	fn default() -> Self {
		StepConfig {
			tick_rate: DEFAULT_TICK_RATE,
			policy: ResolutionPolicy::default(),
			accumulation: ContactAccumulation::default(),
		}
	}
}

impl StepConfig {
	/// Rejects tick rates that would stall, reverse or poison the simulation.
	pub fn check(&self) -> Result<()> {
		if self.tick_rate == 0.0 {
			Err(PhysicsError::DivisionByZero)
		} else if !(self.tick_rate > 0.0 && self.tick_rate.is_finite()) {
			Err(PhysicsError::InvalidTickRate { rate: self.tick_rate })
		} else {
			Ok(())
		}
	}

	/// Wall-clock length of one tick.
	pub fn frame_duration(&self) -> Result<Duration> {
		self.check()?;
		Duration::try_from_secs_f64(1.0 / self.tick_rate)
			.map_err(|_| PhysicsError::InvalidTickRate { rate: self.tick_rate })
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
	/// Pairs detected this tick.
	pub collisions: usize,
	/// Bodies moved by a nonzero collision response.
	pub colliding: usize,
	/// Bodies moved by their forces alone.
	pub free: usize,
}

/// Sum of a body's own forces and the world's fields acting on it.
pub fn net_force(body: &Body, world_forces: &[Force]) -> Vector2D {
	let mut net = Vector2D::new(body.position, Vec2::zeros());
	for force in &body.forces {
		net = net.add(&force.apply(body, Attachment::Body));
	}
	for force in world_forces {
		net = net.add(&force.apply(body, Attachment::World));
	}
	net
}

/// Detect, resolve, then integrate every body in order. A colliding body
/// is driven by its collision response; a free body by its summed forces.
pub fn step(world: &mut World, detector: &dyn CollisionDetector, config: &StepConfig) -> Result<StepReport> {
	config.check()?;

	world.collisions = detector.detect(&world.objects);
	let responses = resolver::resolve(&world.objects, &world.collisions, config.accumulation, config.tick_rate);

	let mut report = StepReport {
		collisions: world.collisions.len(),
		..StepReport::default()
	};

	for i in 0..world.objects.len() {
		let body = &world.objects[i];
		let response = responses.get(&body.id()).filter(|f| !f.is_zero());

		let force = match (response, config.policy) {
			(Some(response), ResolutionPolicy::Replace) => {
				report.colliding += 1;
				*response
			}
			(Some(response), ResolutionPolicy::Additive) => {
				report.colliding += 1;
				net_force(body, &world.forces).add(response)
			}
			(None, _) => {
				report.free += 1;
				net_force(body, &world.forces)
			}
		};

		let partners = world.collisions.partners(body.id());
		let body = &mut world.objects[i];
		body.collided = partners;
		advance(body, force, config.tick_rate)?;
		trace!("{} at ({:.4}, {:.4}) v={}", body.id(), body.position.x, body.position.y, body.velocity);
	}

	Ok(report)
}

/// Applies `force` for one tick. Velocity direction is the per-tick
/// displacement, so position is not divided by the tick rate again.
fn advance(body: &mut Body, force: Vector2D, tick_rate: Scalar) -> Result<()> {
	let acceleration = force.divide(body.mass())?;
	body.velocity = body.velocity.add(&acceleration.divide(tick_rate)?);

	let delta = body.velocity.direction;
	body.translate(delta);
	body.velocity.tail = body.position;
	body.exerted_force = force;

	Ok(())
}
