/// Excitation profile of the tick clock. Inter-particle forces are
/// disabled outright, so the clock's only job is deciding whether the next
/// frame gets scheduled.
const ALPHA_START: f64 = 1.0;
const ALPHA_MIN: f64 = 0.001;
/// Zero passive decay: a running field never settles on its own.
const ALPHA_DECAY: f64 = 0.0;

/// The tick clock driving the field: a stepped simulation stripped down to
/// an excitation value and a start/stop lifecycle. Interaction nudges the
/// excitation up; teardown or an epoch change stops the clock outright.
#[derive(Clone, Debug)]
pub struct Simulation {
	alpha: f64,
	alpha_target: f64,
	alpha_decay: f64,
	running: bool,
}

impl Simulation {
	pub fn new() -> Self {
		Self {
			alpha: ALPHA_START,
			alpha_target: 0.0,
			alpha_decay: ALPHA_DECAY,
			running: false,
		}
	}

	pub fn start(&mut self) {
		self.running = true;
		self.alpha = ALPHA_START;
	}

	/// Idempotent; safe to call from teardown paths that may run twice.
	pub fn stop(&mut self) {
		self.running = false;
	}

	pub fn is_running(&self) -> bool {
		self.running
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	/// Nudge the excitation up, capped at the starting maximum.
	pub fn excite(&mut self, amount: f64) {
		self.alpha = (self.alpha + amount).min(ALPHA_START);
	}

	/// Set the level the excitation relaxes toward. A non-zero target keeps
	/// the clock alive through a drag; zero lets it settle afterwards.
	pub fn sustain(&mut self, target: f64) {
		self.alpha_target = target.clamp(0.0, ALPHA_START);
	}

	/// Advance the clock one tick. Returns whether it is still alive, i.e.
	/// whether the caller should run the tick body and schedule the next
	/// frame.
	pub fn step(&mut self) -> bool {
		if !self.running {
			return false;
		}
		self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;
		self.alpha >= ALPHA_MIN || self.alpha_target > 0.0
	}
}

impl Default for Simulation {
	fn default() -> Self {
		Self::new()
	}
}
