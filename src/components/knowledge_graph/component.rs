//! Leptos component hosting the knowledge graph canvas.
//!
//! The component owns the canvas element, forwards mouse and wheel events to
//! the mounted [`KnowledgeGraph`], performs the resulting [`GraphEffect`]s and
//! drives ticking and drawing from `requestAnimationFrame`. Disposing the
//! component stops the loop and detaches the window listener.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{error, info, warn};
use send_wrapper::SendWrapper;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::config::GraphConfig;
use super::interaction::{Effect as GraphEffect, PointerState};
use super::render::{self, Frame};
use super::state::KnowledgeGraph;
use super::tooltip::{DocumentTooltip, TooltipPanel};
use super::types::Dataset;

type Callback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Fixed animation step, in seconds.
const FRAME_DT: f64 = 0.016;

fn window_size(window: &Window) -> (f64, f64) {
	let dim = |v: Result<JsValue, JsValue>, fallback: f64| v.ok().and_then(|v| v.as_f64()).unwrap_or(fallback);
	(dim(window.inner_width(), 800.0), dim(window.inner_height(), 600.0))
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok().flatten()?.dyn_into().ok()
}

/// Cancel the frame loop, drop the resize listener and unmount the graph.
fn teardown(graph: &RefCell<Option<KnowledgeGraph>>, frame: &Cell<Option<i32>>, resize_cb: &Callback) {
	if let Some(window) = web_sys::window() {
		if let Some(id) = frame.take() {
			let _ = window.cancel_animation_frame(id);
		}
		if let Some(cb) = resize_cb.borrow_mut().take() {
			let _ = window.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}
	}
	if let Some(old) = graph.borrow_mut().take() {
		old.unmount();
	}
}

fn open_document(path: &str) {
	let Some(window) = web_sys::window() else {
		return;
	};
	match window.open_with_url_and_target(path, "_blank") {
		Ok(_) => info!("knowledge-graph: opened {path}"),
		Err(e) => warn!("knowledge-graph: could not open {path}: {e:?}"),
	}
}

fn perform(effects: Vec<GraphEffect>, tooltip: RwSignal<Option<TooltipPanel>>, offset: f64) {
	for effect in effects {
		match effect {
			GraphEffect::ShowTooltip { content, anchor } => tooltip.set(Some(TooltipPanel {
				content,
				anchor,
				offset,
			})),
			GraphEffect::HideTooltip => tooltip.set(None),
			GraphEffect::OpenDocument { path } => open_document(&path),
		}
	}
}

/// Renders the knowledge graph on a canvas, with a hover info panel.
///
/// Nothing is drawn until `data` holds a dataset. When it changes, the
/// previous graph is torn down and a new one mounted in its place. The
/// canvas sizes itself to its parent by default; `fullscreen` fills the
/// window and follows its size.
#[component]
pub fn KnowledgeGraphCanvas(
	#[prop(into)] data: Signal<Option<Dataset>>,
	#[prop(optional)] config: GraphConfig,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let graph: Rc<RefCell<Option<KnowledgeGraph>>> = Rc::new(RefCell::new(None));
	let animate: Callback = Rc::new(RefCell::new(None));
	let resize_cb: Callback = Rc::new(RefCell::new(None));
	let frame_id: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));

	let tooltip = RwSignal::new(None::<TooltipPanel>);
	let bounds = RwSignal::new((0.0, 0.0));
	let cursor = RwSignal::new("grab");
	let offset = config.tooltip_offset;

	let (graph_init, animate_init, resize_init, frame_init) =
		(graph.clone(), animate.clone(), resize_cb.clone(), frame_id.clone());

	Effect::new(move |_| {
		let dataset = data.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		teardown(&graph_init, &frame_init, &resize_init);
		tooltip.set(None);
		let Some(dataset) = dataset else {
			return;
		};

		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			error!("knowledge-graph: no window, not mounting");
			return;
		};
		let (w, h) = if fullscreen {
			window_size(&window)
		} else {
			let parent = canvas.parent_element();
			(
				width.unwrap_or_else(|| parent.as_ref().map(|p| p.client_width() as f64).unwrap_or(800.0)),
				height.unwrap_or_else(|| parent.as_ref().map(|p| p.client_height() as f64).unwrap_or(600.0)),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
		bounds.set((w, h));

		let Some(ctx) = context_2d(&canvas) else {
			error!("knowledge-graph: canvas 2d context unavailable");
			return;
		};

		*graph_init.borrow_mut() = Some(KnowledgeGraph::mount(config.clone(), &dataset, (w, h)));

		if fullscreen {
			let (graph_resize, canvas_resize) = (graph_init.clone(), canvas.clone());
			*resize_init.borrow_mut() = Some(Closure::new(move || {
				let Some(win) = web_sys::window() else {
					return;
				};
				let (nw, nh) = window_size(&win);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				bounds.set((nw, nh));
				if let Some(ref mut g) = *graph_resize.borrow_mut() {
					g.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_init.borrow() {
				let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (graph_anim, animate_inner, frame_inner) =
			(graph_init.clone(), animate_init.clone(), frame_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut g) = *graph_anim.borrow_mut() {
				g.tick(FRAME_DT);
				let frame = Frame::project(g);
				render::draw(&frame, &ctx, g.transform(), g.theme(), g.viewport());
			}
			if let (Some(cb), Some(win)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
				frame_inner.set(win.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			frame_init.set(window.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
		}
	});

	// The reactive owner may be disposed without the data changing again.
	let disposed = SendWrapper::new((graph.clone(), frame_id.clone(), resize_cb.clone(), animate.clone()));
	on_cleanup(move || {
		let (graph, frame, resize_cb, animate) = &*disposed;
		teardown(graph, frame, resize_cb);
		animate.borrow_mut().take();
	});

	let pointer = move |ev: &MouseEvent| -> Option<(f64, f64)> {
		let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
		let rect = canvas.get_bounding_client_rect();
		Some((
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		))
	};

	// Run `f` against the mounted graph, then perform its effects with the
	// graph borrow released.
	let with_graph = {
		let graph = graph.clone();
		move |f: &dyn Fn(&mut KnowledgeGraph) -> Vec<GraphEffect>| {
			let effects = {
				let mut slot = graph.borrow_mut();
				let Some(g) = slot.as_mut() else {
					return;
				};
				let effects = f(g);
				cursor.set(match g.controller().state() {
					PointerState::Dragging { .. } | PointerState::Panning { .. } => "grabbing",
					PointerState::Hovering(_) | PointerState::Pressed { .. } => "pointer",
					PointerState::Idle => "grab",
				});
				effects
			};
			perform(effects, tooltip, offset);
		}
	};

	let with_graph_md = with_graph.clone();
	let on_mousedown = move |ev: MouseEvent| {
		if let Some(p) = pointer(&ev) {
			with_graph_md(&|g: &mut KnowledgeGraph| g.pointer_down(p));
		}
	};

	let with_graph_mm = with_graph.clone();
	let on_mousemove = move |ev: MouseEvent| {
		if let Some(p) = pointer(&ev) {
			with_graph_mm(&|g: &mut KnowledgeGraph| g.pointer_move(p));
		}
	};

	let with_graph_mu = with_graph.clone();
	let on_mouseup = move |ev: MouseEvent| {
		if let Some(p) = pointer(&ev) {
			with_graph_mu(&|g: &mut KnowledgeGraph| g.pointer_up(p));
		}
	};

	let with_graph_ml = with_graph.clone();
	let on_mouseleave = move |ev: MouseEvent| {
		let p = pointer(&ev).unwrap_or_default();
		with_graph_ml(&|g: &mut KnowledgeGraph| g.pointer_cancel(p));
	};

	let with_graph_wh = with_graph;
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		if let Some(p) = pointer(&ev) {
			let delta = ev.delta_y();
			with_graph_wh(&|g: &mut KnowledgeGraph| g.wheel(p, delta));
		}
	};

	view! {
		<div class="knowledge-graph" style="position: relative; width: 100%; height: 100%;">
			<canvas
				node_ref=canvas_ref
				class="knowledge-graph-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				style:display="block"
				style:cursor=move || cursor.get()
			/>
			<DocumentTooltip panel=tooltip bounds=bounds />
		</div>
	}
}
