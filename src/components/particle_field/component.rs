use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, PointerEvent, ResizeObserver, Window};

use super::config::{FieldConfig, node_count_for_width};
use super::render;
use super::state::FieldState;

/// Excitation nudge per processed pointer frame.
const MOVE_EXCITATION: f64 = 0.1;
/// Excitation target held for the duration of a drag.
const DRAG_SUSTAIN: f64 = 0.3;

type SharedState = Rc<RefCell<Option<FieldState>>>;
type FrameClosure = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;
type EventClosure = Rc<RefCell<Option<Closure<dyn FnMut(PointerEvent)>>>>;
type RafHandle = Rc<Cell<Option<i32>>>;

fn measure(
	canvas: &HtmlCanvasElement,
	window: &Window,
	fullscreen: bool,
	width: Option<f64>,
	height: Option<f64>,
) -> (f64, f64) {
	let (w, h) = if fullscreen {
		(
			window.inner_width().unwrap().as_f64().unwrap(),
			window.inner_height().unwrap().as_f64().unwrap(),
		)
	} else {
		(
			width.unwrap_or_else(|| {
				canvas
					.parent_element()
					.map(|p| p.client_width() as f64)
					.unwrap_or(800.0)
			}),
			height.unwrap_or_else(|| {
				canvas
					.parent_element()
					.map(|p| p.client_height() as f64)
					.unwrap_or(600.0)
			}),
		)
	};
	(w.max(1.0), h.max(1.0))
}

/// Size the backing store for the device pixel ratio and pin the CSS size
/// to logical pixels. The transform reset must precede the scale so
/// repeated epochs never compound it.
fn configure_surface(
	canvas: &HtmlCanvasElement,
	ctx: &CanvasRenderingContext2d,
	window: &Window,
	width: f64,
	height: f64,
) {
	let dpr = window.device_pixel_ratio().max(1.0);
	canvas.set_width((width * dpr) as u32);
	canvas.set_height((height * dpr) as u32);
	let style = canvas.unchecked_ref::<web_sys::HtmlElement>().style();
	let _ = style.set_property("width", &format!("{width}px"));
	let _ = style.set_property("height", &format!("{height}px"));
	let _ = ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
	let _ = ctx.scale(dpr, dpr);
}

fn schedule(window: &Window, cb: &Closure<dyn FnMut()>) -> Option<i32> {
	window
		.request_animation_frame(cb.as_ref().unchecked_ref())
		.ok()
}

#[component]
pub fn ParticleField(
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	#[prop(optional)] config: Option<FieldConfig>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: SharedState = Rc::new(RefCell::new(None));
	let animate: FrameClosure = Rc::new(RefCell::new(None));
	let pointer_frame: FrameClosure = Rc::new(RefCell::new(None));
	let move_cb: EventClosure = Rc::new(RefCell::new(None));
	let leave_cb: EventClosure = Rc::new(RefCell::new(None));
	let resize_cb: FrameClosure = Rc::new(RefCell::new(None));
	let observer: Rc<RefCell<Option<ResizeObserver>>> = Rc::new(RefCell::new(None));
	let tick_raf: RafHandle = Rc::new(Cell::new(None));
	let pointer_raf: RafHandle = Rc::new(Cell::new(None));
	let field_config = config.unwrap_or_default();

	{
		let (state_init, animate_init, pointer_frame_init) =
			(state.clone(), animate.clone(), pointer_frame.clone());
		let (move_init, leave_init, resize_init, observer_init) = (
			move_cb.clone(),
			leave_cb.clone(),
			resize_cb.clone(),
			observer.clone(),
		);
		let (tick_raf_init, pointer_raf_init) = (tick_raf.clone(), pointer_raf.clone());

		Effect::new(move |_| {
			let Some(canvas) = canvas_ref.get() else {
				return;
			};
			let canvas: HtmlCanvasElement = canvas.into();
			let window: Window = web_sys::window().unwrap();

			let (w, h) = measure(&canvas, &window, fullscreen, width, height);
			let ctx: CanvasRenderingContext2d = canvas
				.get_context("2d")
				.unwrap()
				.unwrap()
				.dyn_into()
				.unwrap();
			configure_surface(&canvas, &ctx, &window, w, h);
			*state_init.borrow_mut() = Some(FieldState::new(
				field_config.clone(),
				node_count_for_width(w),
				w,
				h,
				&mut || js_sys::Math::random(),
			));

			// Tick loop: clock step, integrate, paint, reschedule while the
			// clock reports itself alive.
			let (state_anim, animate_inner, tick_raf_anim, ctx_anim) = (
				state_init.clone(),
				animate_init.clone(),
				tick_raf_init.clone(),
				ctx.clone(),
			);
			*animate_init.borrow_mut() = Some(Closure::new(move || {
				let mut alive = false;
				if let Some(ref mut s) = *state_anim.borrow_mut() {
					alive = s.sim.step();
					if alive {
						s.tick();
					}
					render::render(s, &ctx_anim);
				}
				if alive {
					let id = animate_inner
						.borrow()
						.as_ref()
						.and_then(|cb| schedule(&web_sys::window().unwrap(), cb));
					tick_raf_anim.set(id);
				} else {
					tick_raf_anim.set(None);
				}
			}));
			if let Some(ref cb) = *animate_init.borrow() {
				tick_raf_init.set(schedule(&window, cb));
			}

			// One-shot pointer processing, frame-aligned. Applies the latest
			// recorded coordinates, nudges the clock, and revives the tick
			// loop if it had settled.
			let (state_pf, animate_pf, tick_raf_pf, pointer_raf_pf) = (
				state_init.clone(),
				animate_init.clone(),
				tick_raf_init.clone(),
				pointer_raf_init.clone(),
			);
			*pointer_frame_init.borrow_mut() = Some(Closure::new(move || {
				pointer_raf_pf.set(None);
				if let Some(ref mut s) = *state_pf.borrow_mut() {
					if s.process_pointer_frame() {
						s.sim.excite(MOVE_EXCITATION);
					}
				}
				if tick_raf_pf.get().is_none() {
					if let Some(ref cb) = *animate_pf.borrow() {
						tick_raf_pf.set(schedule(&web_sys::window().unwrap(), cb));
					}
				}
			}));

			// Window-scope move listener so the pointer node keeps tracking
			// over surfaces outside the canvas. Raw events only record
			// coordinates; bursts coalesce to one processed frame.
			let (state_mv, pointer_frame_mv, pointer_raf_mv, canvas_mv) = (
				state_init.clone(),
				pointer_frame_init.clone(),
				pointer_raf_init.clone(),
				canvas.clone(),
			);
			*move_init.borrow_mut() = Some(Closure::new(move |ev: PointerEvent| {
				let rect = canvas_mv.get_bounding_client_rect();
				let (x, y) = (
					ev.client_x() as f64 - rect.left(),
					ev.client_y() as f64 - rect.top(),
				);
				let needs_frame = match *state_mv.borrow_mut() {
					Some(ref mut s) => s.tracker.record_move(x, y),
					None => false,
				};
				if needs_frame && pointer_raf_mv.get().is_none() {
					if let Some(ref cb) = *pointer_frame_mv.borrow() {
						pointer_raf_mv.set(schedule(&web_sys::window().unwrap(), cb));
					}
				}
			}));
			if let Some(ref cb) = *move_init.borrow() {
				let _ = window
					.add_event_listener_with_callback("pointermove", cb.as_ref().unchecked_ref());
			}

			let state_lv = state_init.clone();
			*leave_init.borrow_mut() = Some(Closure::new(move |_: PointerEvent| {
				if let Some(ref mut s) = *state_lv.borrow_mut() {
					s.pointer_leave();
				}
			}));
			if let Some(ref cb) = *leave_init.borrow() {
				let _ = window
					.add_event_listener_with_callback("pointerleave", cb.as_ref().unchecked_ref());
			}

			// Epoch change: resize the surface, regenerate the store,
			// restart the clock. Node state never survives a resize.
			let (state_rs, animate_rs, tick_raf_rs, pointer_raf_rs) = (
				state_init.clone(),
				animate_init.clone(),
				tick_raf_init.clone(),
				pointer_raf_init.clone(),
			);
			let (canvas_rs, ctx_rs) = (canvas.clone(), ctx.clone());
			*resize_init.borrow_mut() = Some(Closure::new(move || {
				let win: Window = web_sys::window().unwrap();
				let (nw, nh) = measure(&canvas_rs, &win, fullscreen, width, height);
				configure_surface(&canvas_rs, &ctx_rs, &win, nw, nh);
				if let Some(id) = pointer_raf_rs.take() {
					let _ = win.cancel_animation_frame(id);
				}
				if let Some(ref mut s) = *state_rs.borrow_mut() {
					s.reset(node_count_for_width(nw), nw, nh, &mut || {
						js_sys::Math::random()
					});
				}
				if tick_raf_rs.get().is_none() {
					if let Some(ref cb) = *animate_rs.borrow() {
						tick_raf_rs.set(schedule(&win, cb));
					}
				}
			}));
			if fullscreen {
				if let Some(ref cb) = *resize_init.borrow() {
					let _ =
						window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
				}
			} else if let Some(parent) = canvas.parent_element() {
				if let Some(ref cb) = *resize_init.borrow() {
					if let Ok(obs) = ResizeObserver::new(cb.as_ref().unchecked_ref()) {
						obs.observe(&parent);
						*observer_init.borrow_mut() = Some(obs);
					}
				}
			}
		});
	}

	let (state_pd, animate_pd, tick_raf_pd) = (state.clone(), animate.clone(), tick_raf.clone());
	let on_pointerdown = move |ev: PointerEvent| {
		if !ev.is_primary() {
			return;
		}
		// Block the default touch-scroll gesture before it starts.
		ev.prevent_default();
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		// Capture keeps move/up events arriving after the pointer leaves
		// the canvas bounds; unsupported environments are tolerated.
		let _ = canvas.set_pointer_capture(ev.pointer_id());
		if let Some(ref mut s) = *state_pd.borrow_mut() {
			if s.tracker.press(ev.pointer_id(), ev.is_primary()) {
				s.sim.sustain(DRAG_SUSTAIN);
			}
		}
		if tick_raf_pd.get().is_none() {
			if let Some(ref cb) = *animate_pd.borrow() {
				tick_raf_pd.set(schedule(&web_sys::window().unwrap(), cb));
			}
		}
	};

	let state_pu = state.clone();
	let on_pointerup = move |ev: PointerEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let _ = canvas.release_pointer_capture(ev.pointer_id());
		if let Some(ref mut s) = *state_pu.borrow_mut() {
			if s.tracker.release(ev.pointer_id()) {
				s.sim.sustain(0.0);
			}
		}
	};
	let on_pointercancel = on_pointerup.clone();

	{
		use send_wrapper::SendWrapper;
		let handles = SendWrapper::new((
			state.clone(),
			animate.clone(),
			pointer_frame.clone(),
			move_cb.clone(),
			leave_cb.clone(),
			resize_cb.clone(),
			observer.clone(),
			tick_raf.clone(),
			pointer_raf.clone(),
		));
		on_cleanup(move || {
			let (state, animate, pointer_frame, move_cb, leave_cb, resize_cb, observer, tick_raf, pointer_raf) =
				handles.take();
			let window = web_sys::window().unwrap();
			if let Some(id) = tick_raf.take() {
				let _ = window.cancel_animation_frame(id);
			}
			if let Some(id) = pointer_raf.take() {
				let _ = window.cancel_animation_frame(id);
			}
			if let Some(cb) = move_cb.borrow_mut().take() {
				let _ = window
					.remove_event_listener_with_callback("pointermove", cb.as_ref().unchecked_ref());
			}
			if let Some(cb) = leave_cb.borrow_mut().take() {
				let _ = window
					.remove_event_listener_with_callback("pointerleave", cb.as_ref().unchecked_ref());
			}
			if let Some(cb) = resize_cb.borrow_mut().take() {
				let _ = window
					.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
			if let Some(obs) = observer.borrow_mut().take() {
				obs.disconnect();
			}
			if let Some(ref mut s) = *state.borrow_mut() {
				s.sim.stop();
			}
			animate.borrow_mut().take();
			pointer_frame.borrow_mut().take();
			log::debug!("particle field torn down");
		});
	}

	view! {
		<canvas
			node_ref=canvas_ref
			class="particle-field-canvas"
			on:pointerdown=on_pointerdown
			on:pointerup=on_pointerup
			on:pointercancel=on_pointercancel
			style="display: block; touch-action: none;"
		/>
	}
}
