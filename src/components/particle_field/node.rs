/// Draw radius of the pointer node, in CSS pixels.
pub const POINTER_RADIUS: f64 = 1.5;
/// Fill color of the pointer node.
pub const POINTER_COLOR: &str = "#ffffff";

/// Position override: while present, the integrator holds the node at this
/// point and suppresses its velocity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pin {
	pub x: f64,
	pub y: f64,
}

/// A generated particle drifting through the viewport.
#[derive(Clone, Debug)]
pub struct Particle {
	/// Generation index; stable for the lifetime of the epoch.
	pub id: usize,
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	pub radius: f64,
	/// RGB hex, chosen once at creation.
	pub color: String,
}

/// The synthetic node tracking the input device.
#[derive(Clone, Debug, Default)]
pub struct PointerNode {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	pub pin: Option<Pin>,
}

/// One entity in the field. The pointer node lives in the same collection
/// as the particles so edge discovery treats it uniformly.
#[derive(Clone, Debug)]
pub enum Node {
	Particle(Particle),
	Pointer(PointerNode),
}

impl Node {
	pub fn position(&self) -> (f64, f64) {
		match self {
			Node::Particle(p) => (p.x, p.y),
			Node::Pointer(p) => (p.x, p.y),
		}
	}

	/// Base draw radius before any proximity pulse.
	pub fn radius(&self) -> f64 {
		match self {
			Node::Particle(p) => p.radius,
			Node::Pointer(_) => POINTER_RADIUS,
		}
	}

	pub fn color(&self) -> &str {
		match self {
			Node::Particle(p) => &p.color,
			Node::Pointer(_) => POINTER_COLOR,
		}
	}
}

/// The single pointer node of the store, mutably.
pub fn pointer_mut(nodes: &mut [Node]) -> Option<&mut PointerNode> {
	nodes.iter_mut().find_map(|node| match node {
		Node::Pointer(p) => Some(p),
		Node::Particle(_) => None,
	})
}

/// Current pointer-node position, if the store has one.
pub fn pointer_position(nodes: &[Node]) -> Option<(f64, f64)> {
	nodes.iter().find_map(|node| match node {
		Node::Pointer(p) => Some((p.x, p.y)),
		Node::Particle(_) => None,
	})
}
