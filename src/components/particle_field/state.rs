use super::config::FieldConfig;
use super::node::{self, Node, Particle, PointerNode};
use super::physics;
use super::pointer::PointerTracker;
use super::sim::Simulation;

/// Everything one viewport epoch owns: the node store, the pointer
/// tracker, the tick clock and the current dimensions. A resize throws the
/// whole store away and regenerates it; nothing carries over.
pub struct FieldState {
	pub config: FieldConfig,
	pub nodes: Vec<Node>,
	pub tracker: PointerTracker,
	pub sim: Simulation,
	pub width: f64,
	pub height: f64,
}

impl FieldState {
	pub fn new(
		config: FieldConfig,
		count: usize,
		width: f64,
		height: f64,
		rng: &mut impl FnMut() -> f64,
	) -> Self {
		let width = width.max(1.0);
		let height = height.max(1.0);
		let nodes = generate_nodes(&config, count, width, height, rng);
		let tracker = PointerTracker::new(config.drag_smoothing);
		let mut sim = Simulation::new();
		sim.start();
		log::debug!("field epoch: {count} nodes in {width}x{height}");
		Self {
			config,
			nodes,
			tracker,
			sim,
			width,
			height,
		}
	}

	/// One physics tick over the whole store, pointer node included.
	pub fn tick(&mut self) {
		physics::step(&mut self.nodes, self.width, self.height);
	}

	/// Fold the latest recorded pointer coordinates into the pointer node.
	/// Returns whether anything was applied.
	pub fn process_pointer_frame(&mut self) -> bool {
		match node::pointer_mut(&mut self.nodes) {
			Some(pointer) => self.tracker.process_frame(pointer, self.width, self.height),
			None => false,
		}
	}

	/// Window-level pointer leave: unpin unless a drag is in flight.
	pub fn pointer_leave(&mut self) {
		if let Some(pointer) = node::pointer_mut(&mut self.nodes) {
			self.tracker.leave(pointer);
		}
	}

	/// Epoch reset: regenerate the store for the new dimensions, recenter
	/// the pointer node and restart the clock. Deliberately discards all
	/// previous node state.
	pub fn reset(&mut self, count: usize, width: f64, height: f64, rng: &mut impl FnMut() -> f64) {
		self.width = width.max(1.0);
		self.height = height.max(1.0);
		self.nodes = generate_nodes(&self.config, count, self.width, self.height, rng);
		self.tracker = PointerTracker::new(self.config.drag_smoothing);
		self.sim.stop();
		self.sim.start();
		log::debug!("field epoch reset: {count} nodes in {}x{}", self.width, self.height);
	}
}

/// Build `count` particles with uniform random position, velocity and
/// radius and a weighted-random color, then append the single pointer node
/// at the viewport center, unpinned.
pub fn generate_nodes(
	config: &FieldConfig,
	count: usize,
	width: f64,
	height: f64,
	rng: &mut impl FnMut() -> f64,
) -> Vec<Node> {
	let (min_factor, max_factor) = config.radius_factors;
	let mut nodes = Vec::with_capacity(count + 1);
	for id in 0..count {
		let radius = (config.base_radius * (min_factor + rng() * (max_factor - min_factor))).max(1.0);
		nodes.push(Node::Particle(Particle {
			id,
			x: rng() * width,
			y: rng() * height,
			vx: (rng() * 2.0 - 1.0) * config.speed_factor,
			vy: (rng() * 2.0 - 1.0) * config.speed_factor,
			radius,
			color: pick_color(&config.colors, rng()).into(),
		}));
	}
	nodes.push(Node::Pointer(PointerNode {
		x: width / 2.0,
		y: height / 2.0,
		vx: 0.0,
		vy: 0.0,
		pin: None,
	}));
	nodes
}

/// Cumulative-probability draw over the weight table. A roll past the
/// weight sum (weights may total less than 1, or float error lands on the
/// boundary) falls back to the first entry.
fn pick_color(colors: &[(String, f64)], roll: f64) -> &str {
	let mut cumulative = 0.0;
	for (hex, weight) in colors {
		cumulative += weight;
		if roll < cumulative {
			return hex;
		}
	}
	colors.first().map(|(hex, _)| hex.as_str()).unwrap_or("#888888")
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::particle_field::node::pointer_position;

	/// Deterministic xorshift in [0, 1); keeps generation tests stable.
	pub(crate) fn test_rng(seed: u64) -> impl FnMut() -> f64 {
		let mut state = seed.max(1);
		move || {
			state ^= state << 13;
			state ^= state >> 7;
			state ^= state << 17;
			(state >> 11) as f64 / (1u64 << 53) as f64
		}
	}

	fn particles(nodes: &[Node]) -> impl Iterator<Item = &Particle> {
		nodes.iter().filter_map(|n| match n {
			Node::Particle(p) => Some(p),
			Node::Pointer(_) => None,
		})
	}

	#[test]
	fn generation_respects_bounds_and_config() {
		let config = FieldConfig::default();
		let mut rng = test_rng(7);
		let nodes = generate_nodes(&config, 200, 640.0, 480.0, &mut rng);
		assert_eq!(nodes.len(), 201);

		for p in particles(&nodes) {
			assert!((0.0..640.0).contains(&p.x));
			assert!((0.0..480.0).contains(&p.y));
			assert!(p.vx.abs() <= config.speed_factor);
			assert!(p.vy.abs() <= config.speed_factor);
			assert!(p.radius >= 1.0);
			assert!(p.radius <= config.base_radius * config.radius_factors.1);
			assert!(config.colors.iter().any(|(hex, _)| hex == &p.color));
		}
	}

	#[test]
	fn particle_ids_are_sequential_generation_indices() {
		let mut rng = test_rng(11);
		let nodes = generate_nodes(&FieldConfig::default(), 50, 300.0, 300.0, &mut rng);
		let ids: Vec<usize> = particles(&nodes).map(|p| p.id).collect();
		assert_eq!(ids, (0..50).collect::<Vec<_>>());
	}

	#[test]
	fn exactly_one_pointer_node_at_the_center() {
		let mut rng = test_rng(3);
		let nodes = generate_nodes(&FieldConfig::default(), 40, 800.0, 600.0, &mut rng);
		let pointers: Vec<&PointerNode> = nodes
			.iter()
			.filter_map(|n| match n {
				Node::Pointer(p) => Some(p),
				Node::Particle(_) => None,
			})
			.collect();
		assert_eq!(pointers.len(), 1);
		assert_eq!((pointers[0].x, pointers[0].y), (400.0, 300.0));
		assert!(pointers[0].pin.is_none());
	}

	#[test]
	fn weighted_draw_frequencies_converge() {
		let colors: Vec<(String, f64)> = vec![
			("#aa0000".into(), 0.5),
			("#00aa00".into(), 0.3),
			("#0000aa".into(), 0.2),
		];
		let mut rng = test_rng(99);
		let draws = 20_000;
		let mut counts = [0usize; 3];
		for _ in 0..draws {
			let hex = pick_color(&colors, rng());
			let slot = colors.iter().position(|(h, _)| h == hex).unwrap();
			counts[slot] += 1;
		}
		for (slot, (_, weight)) in colors.iter().enumerate() {
			let observed = counts[slot] as f64 / draws as f64;
			assert!(
				(observed - weight).abs() < 0.02,
				"color {slot}: observed {observed}, want {weight}"
			);
		}
	}

	#[test]
	fn out_of_range_roll_falls_back_to_first_entry() {
		let colors: Vec<(String, f64)> = vec![("#111111".into(), 0.4), ("#222222".into(), 0.4)];
		assert_eq!(pick_color(&colors, 0.95), "#111111");
		assert_eq!(pick_color(&colors, 0.5), "#222222");
		assert_eq!(pick_color(&colors, 0.0), "#111111");
	}

	#[test]
	fn reset_regenerates_the_whole_store() {
		let mut rng = test_rng(42);
		let mut state = FieldState::new(FieldConfig::default(), 60, 900.0, 600.0, &mut rng);
		let before: Vec<(f64, f64)> = state.nodes.iter().map(Node::position).collect();

		state.reset(25, 300.0, 400.0, &mut rng);
		assert_eq!(state.nodes.len(), 26);
		let ids: Vec<usize> = particles(&state.nodes).map(|p| p.id).collect();
		assert_eq!(ids, (0..25).collect::<Vec<_>>());
		for p in particles(&state.nodes) {
			assert!((0.0..300.0).contains(&p.x));
			assert!((0.0..400.0).contains(&p.y));
		}
		assert_eq!(pointer_position(&state.nodes), Some((150.0, 200.0)));
		assert!(state.sim.is_running());
		assert_eq!(state.sim.alpha(), 1.0);
		// No identity or position survives the epoch change.
		let after: Vec<(f64, f64)> = state.nodes.iter().map(Node::position).collect();
		assert_ne!(before, after);
	}

	#[test]
	fn degenerate_viewport_is_clamped() {
		let mut rng = test_rng(5);
		let state = FieldState::new(FieldConfig::default(), 10, 0.0, -3.0, &mut rng);
		assert_eq!((state.width, state.height), (1.0, 1.0));
	}

	#[test]
	fn leave_then_tick_lets_the_pointer_fly() {
		let mut rng = test_rng(13);
		let mut state = FieldState::new(FieldConfig::default(), 0, 200.0, 200.0, &mut rng);
		state.tracker.record_move(50.0, 50.0);
		assert!(state.process_pointer_frame());

		state.pointer_leave();
		if let Some(pointer) = node::pointer_mut(&mut state.nodes) {
			assert!(pointer.pin.is_none());
			pointer.vx = 2.0;
			pointer.vy = -1.0;
		}
		state.tick();
		assert_eq!(pointer_position(&state.nodes), Some((52.0, 49.0)));
	}
}
