/// Distance falloff applied to pointer proximity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Falloff {
	Linear,
	#[default]
	Quadratic,
}

/// Immutable tuning for one particle-field session.
///
/// Constructed once and handed to the component; a running field never
/// reconfigures itself mid-epoch.
#[derive(Clone, Debug)]
pub struct FieldConfig {
	/// Base draw radius in CSS pixels, scaled per node by `radius_factors`.
	pub base_radius: f64,
	/// `(min, max)` multiplier range for per-node radius variation.
	pub radius_factors: (f64, f64),
	/// Per-axis speed bound in pixels per tick.
	pub speed_factor: f64,
	/// Maximum Euclidean distance at which two nodes are linked.
	pub link_distance: f64,
	/// Pointer radius inside which nodes become visible.
	pub node_proximity_radius: f64,
	/// Pointer radius inside which edges become visible; smaller than the
	/// node radius so edges fade before their endpoints do.
	pub edge_proximity_radius: f64,
	pub falloff: Falloff,
	/// Drag follow lag: 0 snaps to the pointer, 1 never moves.
	pub drag_smoothing: f64,
	/// Stroke color shared by every edge.
	pub line_color: String,
	/// Weighted color table for node generation; weights sum to <= 1 and
	/// the first entry doubles as the out-of-range fallback.
	pub colors: Vec<(String, f64)>,
}

impl Default for FieldConfig {
	fn default() -> Self {
		Self {
			base_radius: 2.5,
			radius_factors: (0.6, 1.6),
			speed_factor: 0.4,
			link_distance: 110.0,
			node_proximity_radius: 200.0,
			edge_proximity_radius: 120.0,
			falloff: Falloff::Quadratic,
			drag_smoothing: 0.25,
			line_color: "#64b4ff".into(),
			colors: vec![
				("#64b4ff".into(), 0.5),
				("#a78bfa".into(), 0.2),
				("#e377c2".into(), 0.15),
				("#ffffff".into(), 0.15),
			],
		}
	}
}

/// Breakpoint density policy: how many particles a viewport of the given
/// width gets. Constant at run time; only consulted at epoch start.
pub fn node_count_for_width(width: f64) -> usize {
	match width {
		w if w < 480.0 => 30,
		w if w < 900.0 => 50,
		w if w < 1400.0 => 80,
		_ => 110,
	}
}
