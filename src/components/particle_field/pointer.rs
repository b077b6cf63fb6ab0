use super::node::{Pin, PointerNode};

fn lerp(a: f64, b: f64, t: f64) -> f64 {
	a + (b - a) * t
}

/// Where the interaction currently stands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PointerPhase {
	#[default]
	Idle,
	Hovering,
	Dragging,
}

/// Tracks raw pointer input and folds it into the pointer node once per
/// animation frame.
///
/// Raw move events only record coordinates and request a frame callback;
/// any burst of moves between frames collapses to a single processed
/// update carrying the latest coordinates. The pending callback is a lone
/// boolean, not a queue.
#[derive(Clone, Debug)]
pub struct PointerTracker {
	phase: PointerPhase,
	active_pointer: Option<i32>,
	last_move: Option<(f64, f64)>,
	frame_pending: bool,
	smoothing: f64,
}

impl PointerTracker {
	pub fn new(smoothing: f64) -> Self {
		Self {
			phase: PointerPhase::Idle,
			active_pointer: None,
			last_move: None,
			frame_pending: false,
			smoothing: smoothing.clamp(0.0, 1.0),
		}
	}

	pub fn phase(&self) -> PointerPhase {
		self.phase
	}

	pub fn is_dragging(&self) -> bool {
		self.phase == PointerPhase::Dragging
	}

	/// Record the newest canvas-local coordinates. Returns `true` exactly
	/// when the caller must schedule a processing callback for the next
	/// frame; later moves before that frame runs return `false`.
	pub fn record_move(&mut self, x: f64, y: f64) -> bool {
		self.last_move = Some((x, y));
		if self.frame_pending {
			return false;
		}
		self.frame_pending = true;
		true
	}

	/// A primary-pointer press starts a drag. Non-primary pointers are
	/// ignored; there is no multi-touch drag.
	pub fn press(&mut self, pointer_id: i32, is_primary: bool) -> bool {
		if !is_primary || self.phase == PointerPhase::Dragging {
			return false;
		}
		self.phase = PointerPhase::Dragging;
		self.active_pointer = Some(pointer_id);
		true
	}

	/// End the drag for the active pointer id. A mismatched id still ends
	/// it, so a swallowed `pointerup` can never leave the drag stuck.
	pub fn release(&mut self, pointer_id: i32) -> bool {
		if self.phase != PointerPhase::Dragging {
			return false;
		}
		if self.active_pointer.is_some_and(|id| id != pointer_id) {
			log::debug!("pointer release id mismatch, ending drag anyway");
		}
		self.phase = PointerPhase::Idle;
		self.active_pointer = None;
		true
	}

	/// The pointer left the window. Outside a drag this unpins the pointer
	/// node, letting it free-fly until the next hover re-pins it.
	pub fn leave(&mut self, pointer: &mut PointerNode) {
		if self.phase == PointerPhase::Dragging {
			return;
		}
		self.phase = PointerPhase::Idle;
		self.last_move = None;
		pointer.pin = None;
	}

	/// Apply the latest recorded coordinates to the pointer node, clamped
	/// to the canvas rect. Hover snaps; drag eases by the smoothing factor.
	/// Returns whether an update was applied (the caller keeps the tick
	/// clock excited while interaction is live).
	pub fn process_frame(&mut self, pointer: &mut PointerNode, width: f64, height: f64) -> bool {
		self.frame_pending = false;
		let Some((raw_x, raw_y)) = self.last_move else {
			return false;
		};
		let x = raw_x.clamp(0.0, width);
		let y = raw_y.clamp(0.0, height);

		match self.phase {
			PointerPhase::Dragging => {
				let follow = 1.0 - self.smoothing;
				pointer.x = lerp(pointer.x, x, follow);
				pointer.y = lerp(pointer.y, y, follow);
			}
			PointerPhase::Idle | PointerPhase::Hovering => {
				self.phase = PointerPhase::Hovering;
				pointer.x = x;
				pointer.y = y;
			}
		}
		pointer.pin = Some(Pin {
			x: pointer.x,
			y: pointer.y,
		});
		true
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn pointer_at(x: f64, y: f64) -> PointerNode {
		PointerNode {
			x,
			y,
			..PointerNode::default()
		}
	}

	#[test]
	fn moves_coalesce_to_one_frame_callback() {
		let mut tracker = PointerTracker::new(0.25);
		assert!(tracker.record_move(10.0, 10.0));
		assert!(!tracker.record_move(20.0, 20.0));
		assert!(!tracker.record_move(30.0, 30.0));

		let mut pointer = pointer_at(0.0, 0.0);
		assert!(tracker.process_frame(&mut pointer, 100.0, 100.0));
		// Only the latest coordinates survive the burst.
		assert_eq!((pointer.x, pointer.y), (30.0, 30.0));
		assert!(tracker.record_move(40.0, 40.0), "flag clears after processing");
	}

	#[test]
	fn drag_with_zero_smoothing_snaps() {
		let mut tracker = PointerTracker::new(0.0);
		let mut pointer = pointer_at(100.0, 100.0);
		assert!(tracker.press(1, true));
		tracker.record_move(150.0, 100.0);
		tracker.process_frame(&mut pointer, 300.0, 300.0);
		assert_eq!((pointer.x, pointer.y), (150.0, 100.0));
		assert_eq!(pointer.pin, Some(Pin { x: 150.0, y: 100.0 }));
	}

	#[test]
	fn drag_smoothing_eases_toward_target() {
		let mut tracker = PointerTracker::new(0.5);
		let mut pointer = pointer_at(100.0, 100.0);
		tracker.press(1, true);
		tracker.record_move(200.0, 100.0);
		tracker.process_frame(&mut pointer, 300.0, 300.0);
		assert_eq!((pointer.x, pointer.y), (150.0, 100.0));
	}

	#[test]
	fn hover_snaps_without_smoothing() {
		let mut tracker = PointerTracker::new(0.9);
		let mut pointer = pointer_at(0.0, 0.0);
		tracker.record_move(80.0, 60.0);
		tracker.process_frame(&mut pointer, 100.0, 100.0);
		assert_eq!(tracker.phase(), PointerPhase::Hovering);
		assert_eq!((pointer.x, pointer.y), (80.0, 60.0));
	}

	#[test]
	fn coordinates_clamp_to_the_canvas_rect() {
		let mut tracker = PointerTracker::new(0.0);
		let mut pointer = pointer_at(0.0, 0.0);
		tracker.record_move(-25.0, 512.0);
		tracker.process_frame(&mut pointer, 100.0, 100.0);
		assert_eq!((pointer.x, pointer.y), (0.0, 100.0));
	}

	#[test]
	fn non_primary_press_is_ignored() {
		let mut tracker = PointerTracker::new(0.0);
		assert!(!tracker.press(2, false));
		assert_eq!(tracker.phase(), PointerPhase::Idle);
	}

	#[test]
	fn mismatched_release_still_ends_the_drag() {
		let mut tracker = PointerTracker::new(0.0);
		tracker.press(1, true);
		assert!(tracker.release(9));
		assert_eq!(tracker.phase(), PointerPhase::Idle);
	}

	#[test]
	fn leave_outside_a_drag_unpins() {
		let mut tracker = PointerTracker::new(0.0);
		let mut pointer = pointer_at(10.0, 10.0);
		tracker.record_move(10.0, 10.0);
		tracker.process_frame(&mut pointer, 100.0, 100.0);
		assert!(pointer.pin.is_some());

		tracker.leave(&mut pointer);
		assert_eq!(tracker.phase(), PointerPhase::Idle);
		assert!(pointer.pin.is_none());
	}

	#[test]
	fn leave_during_a_drag_keeps_the_pin() {
		let mut tracker = PointerTracker::new(0.0);
		let mut pointer = pointer_at(10.0, 10.0);
		tracker.press(1, true);
		tracker.record_move(10.0, 10.0);
		tracker.process_frame(&mut pointer, 100.0, 100.0);

		tracker.leave(&mut pointer);
		assert!(tracker.is_dragging());
		assert!(pointer.pin.is_some());
	}

	#[test]
	fn drag_continues_across_frames() {
		let mut tracker = PointerTracker::new(0.0);
		let mut pointer = pointer_at(0.0, 0.0);
		tracker.press(1, true);
		tracker.record_move(50.0, 50.0);
		tracker.process_frame(&mut pointer, 100.0, 100.0);
		tracker.record_move(75.0, 25.0);
		tracker.process_frame(&mut pointer, 100.0, 100.0);
		assert_eq!((pointer.x, pointer.y), (75.0, 25.0));
		assert!(tracker.release(1));
		// Next processed move falls back to hover-follow.
		tracker.record_move(10.0, 10.0);
		tracker.process_frame(&mut pointer, 100.0, 100.0);
		assert_eq!(tracker.phase(), PointerPhase::Hovering);
	}
}
