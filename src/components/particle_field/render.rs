use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::config::{Falloff, FieldConfig};
use super::node::{self, Node};
use super::state::FieldState;

const BACKGROUND: &str = "#10101c";
/// Alphas at or below this are invisible; skip the draw calls outright.
const ALPHA_EPSILON: f64 = 0.001;
/// Nodes near the pointer swell by up to this fraction of their radius.
const PULSE_SCALE: f64 = 0.35;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
	pub r: u8,
	pub g: u8,
	pub b: u8,
}

/// Neutral gray for malformed color strings.
const FALLBACK_GRAY: Rgb = Rgb {
	r: 136,
	g: 136,
	b: 136,
};

/// Parse `#rrggbb` or `#rgb` (leading `#` optional). Anything else falls
/// back to neutral gray rather than failing the frame.
pub fn hex_to_rgb(hex: &str) -> Rgb {
	fn channel(s: &str) -> Option<u8> {
		u8::from_str_radix(s, 16).ok()
	}
	fn parse(hex: &str) -> Option<Rgb> {
		let hex = hex.strip_prefix('#').unwrap_or(hex);
		if !hex.is_ascii() {
			return None;
		}
		match hex.len() {
			6 => Some(Rgb {
				r: channel(&hex[0..2])?,
				g: channel(&hex[2..4])?,
				b: channel(&hex[4..6])?,
			}),
			3 => {
				let digit = |i: usize| channel(&hex[i..=i]).map(|v| v * 17);
				Some(Rgb {
					r: digit(0)?,
					g: digit(1)?,
					b: digit(2)?,
				})
			}
			_ => None,
		}
	}
	parse(hex).unwrap_or(FALLBACK_GRAY)
}

fn rgba(color: Rgb, alpha: f64) -> String {
	format!("rgba({}, {}, {}, {})", color.r, color.g, color.b, alpha)
}

/// Proximity weight of a point at squared distance `dist_sq` from the
/// pointer node: 1 at the pointer, 0 at and beyond `radius`.
pub fn proximity(dist_sq: f64, radius: f64, falloff: Falloff) -> f64 {
	if radius <= 0.0 || dist_sq >= radius * radius {
		return 0.0;
	}
	let t = dist_sq.sqrt() / radius;
	match falloff {
		Falloff::Linear => 1.0 - t,
		Falloff::Quadratic => (1.0 - t) * (1.0 - t),
	}
}

/// Distance-based edge opacity before proximity weighting: 1 for touching
/// nodes, 0 at the link-distance threshold.
pub fn edge_base_opacity(dist: f64, link_distance: f64) -> f64 {
	(1.0 - dist / link_distance).max(0.0)
}

/// One visible edge, ready to stroke.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeSegment {
	pub x1: f64,
	pub y1: f64,
	pub x2: f64,
	pub y2: f64,
	pub alpha: f64,
}

/// Discover the visible edge set for this frame: every unordered pair
/// within the link distance, weighted by the endpoints' mean proximity to
/// the pointer node. O(N²) over the store, accepted for the target node
/// counts.
pub fn visible_edges(nodes: &[Node], pointer_at: (f64, f64), config: &FieldConfig) -> Vec<EdgeSegment> {
	let edge_prox: Vec<f64> = nodes
		.iter()
		.map(|n| {
			let (x, y) = n.position();
			let (dx, dy) = (x - pointer_at.0, y - pointer_at.1);
			proximity(dx * dx + dy * dy, config.edge_proximity_radius, config.falloff)
		})
		.collect();

	let link_sq = config.link_distance * config.link_distance;
	let mut edges = Vec::new();
	for i in 0..nodes.len() {
		for j in (i + 1)..nodes.len() {
			// Both endpoints out of the pointer halo: invisible, skip the
			// distance math entirely.
			if edge_prox[i] <= 0.0 && edge_prox[j] <= 0.0 {
				continue;
			}
			let (x1, y1) = nodes[i].position();
			let (x2, y2) = nodes[j].position();
			let (dx, dy) = (x2 - x1, y2 - y1);
			let dist_sq = dx * dx + dy * dy;
			if dist_sq > link_sq {
				continue;
			}
			let base = edge_base_opacity(dist_sq.sqrt(), config.link_distance);
			let alpha = base * (edge_prox[i] + edge_prox[j]) / 2.0;
			if alpha <= ALPHA_EPSILON {
				continue;
			}
			edges.push(EdgeSegment { x1, y1, x2, y2, alpha });
		}
	}
	edges
}

/// Fill alpha and draw radius for one node this frame, or `None` when the
/// node sits outside the pointer halo.
pub fn node_appearance(
	node: &Node,
	pointer_at: (f64, f64),
	config: &FieldConfig,
) -> Option<(f64, f64)> {
	let (x, y) = node.position();
	let (dx, dy) = (x - pointer_at.0, y - pointer_at.1);
	let prox = proximity(dx * dx + dy * dy, config.node_proximity_radius, config.falloff);
	if prox <= ALPHA_EPSILON {
		return None;
	}
	Some((prox, node.radius() * (1.0 + PULSE_SCALE * prox)))
}

/// Paint one frame. Stateless: everything derives from the current store.
pub fn render(state: &FieldState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);

	let Some(pointer_at) = node::pointer_position(&state.nodes) else {
		return;
	};
	draw_edges(state, pointer_at, ctx);
	draw_nodes(state, pointer_at, ctx);
}

fn draw_edges(state: &FieldState, pointer_at: (f64, f64), ctx: &CanvasRenderingContext2d) {
	let stroke = hex_to_rgb(&state.config.line_color);
	ctx.set_line_width(1.0);
	for edge in visible_edges(&state.nodes, pointer_at, &state.config) {
		ctx.set_stroke_style_str(&rgba(stroke, edge.alpha));
		ctx.begin_path();
		ctx.move_to(edge.x1, edge.y1);
		ctx.line_to(edge.x2, edge.y2);
		ctx.stroke();
	}
}

fn draw_nodes(state: &FieldState, pointer_at: (f64, f64), ctx: &CanvasRenderingContext2d) {
	for node in &state.nodes {
		let Some((alpha, radius)) = node_appearance(node, pointer_at, &state.config) else {
			continue;
		};
		let (x, y) = node.position();
		ctx.set_fill_style_str(&rgba(hex_to_rgb(node.color()), alpha));
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.fill();
	}
}
