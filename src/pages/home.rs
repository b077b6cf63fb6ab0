use leptos::prelude::*;

use crate::components::particle_field::ParticleField;

/// Default Home Page: the particle field filling the viewport behind a
/// small overlay.
#[component]
pub fn Home() -> impl IntoView {
	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-field">
				<ParticleField fullscreen=true />
				<div class="field-overlay">
					<h1>"Particle Field"</h1>
					<p class="subtitle">"Move the pointer to light up the field. Press and drag to pull it around."</p>
				</div>
			</div>
		</ErrorBoundary>
	}
}
