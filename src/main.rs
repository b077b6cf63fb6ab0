#[cfg(target_arch = "wasm32")]
fn main() {
	particle_field_canvas::init_logging();
	leptos::mount::mount_to_body(particle_field_canvas::App);
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
	// The app only runs in the browser; trunk builds the wasm32 target.
}
