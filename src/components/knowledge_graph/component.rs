use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{debug, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent};

use super::redirect::{Destination, REDIRECT_DELAY, RedirectFlow, RedirectState, ResultAction};
use super::render;
use super::session::{SearchPhase, SearchSession};
use super::state::KnowledgeGraphState;
use super::types::SearchResult;
use crate::search::{SearchService, search_or_empty};

/// Page navigation capability handed in by the router.
pub type Navigate = Rc<dyn Fn(Destination)>;

/// requestAnimationFrame loop that reschedules itself until stopped or
/// dropped.
struct FrameLoop {
	callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
	request: Rc<Cell<Option<i32>>>,
}

fn request_frame(cb: &Closure<dyn FnMut(f64)>) -> Option<i32> {
	web_sys::window()?
		.request_animation_frame(cb.as_ref().unchecked_ref())
		.ok()
}

impl FrameLoop {
	fn start(mut on_frame: impl FnMut(f64) + 'static) -> Self {
		let callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
		let request = Rc::new(Cell::new(None));
		let (callback_inner, request_inner) = (callback.clone(), request.clone());

		*callback.borrow_mut() = Some(Closure::new(move |timestamp: f64| {
			on_frame(timestamp);
			if let Some(ref cb) = *callback_inner.borrow() {
				request_inner.set(request_frame(cb));
			}
		}));
		if let Some(ref cb) = *callback.borrow() {
			request.set(request_frame(cb));
		}
		Self { callback, request }
	}

	fn stop(&self) {
		if let Some(id) = self.request.take() {
			if let Some(window) = web_sys::window() {
				let _ = window.cancel_animation_frame(id);
			}
		}
		// dropping the closure breaks its self-reference
		if self.callback.borrow_mut().take().is_some() {
			debug!("graph animation loop stopped");
		}
	}
}

impl Drop for FrameLoop {
	fn drop(&mut self) {
		self.stop();
	}
}

fn container_size(canvas: &HtmlCanvasElement) -> (f64, f64) {
	canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.unwrap_or((0.0, 0.0))
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok().flatten()?.dyn_into().ok()
}

fn pointer_in(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

fn result_card(
	result: SearchResult,
	activate: impl Fn(SearchResult, ResultAction) + Copy + Send + Sync + 'static,
) -> impl IntoView {
	let (kind, relevance, title, summary) = (
		result.kind.as_str(),
		result.relevance_label.clone(),
		result.title.clone(),
		result.summary.clone(),
	);
	let buttons = ResultAction::offered_for(result.kind)
		.iter()
		.map(|&action| {
			let result = result.clone();
			view! {
				<button class="kg-result-action" on:click=move |_| activate(result.clone(), action)>
					{action.button_label()}
				</button>
			}
		})
		.collect_view();

	view! {
		<li class="kg-result">
			<div class="kg-result-meta">
				<span class="kg-result-kind">{kind}</span>
				<span class="kg-result-relevance">{relevance}</span>
			</div>
			<h3>{title}</h3>
			<p>{summary}</p>
			<div class="kg-result-actions">{buttons}</div>
		</li>
	}
}

fn redirect_overlay(overlay: RedirectState) -> impl IntoView {
	view! {
		<div class="kg-redirect-overlay" role="status">
			<div class="kg-spinner"></div>
			<h2>{overlay.action_description}</h2>
			<p>{overlay.label}</p>
		</div>
	}
}

/// Search box, animated concept graph and result list.
///
/// Clicking a graph node pivots the search to that node's label. Activating
/// a result shows a redirect overlay and navigates after [`REDIRECT_DELAY`].
#[component]
pub fn KnowledgeGraphSearch(
	service: Rc<dyn SearchService>,
	on_navigate: Navigate,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let session = RwSignal::new(SearchSession::new());
	let input = RwSignal::new(String::new());
	let redirect = RwSignal::new(RedirectFlow::new());
	let pending_redirect = StoredValue::new(None::<TimeoutHandle>);
	let service = StoredValue::new_local(service);
	let navigate = StoredValue::new_local(on_navigate);
	let frame_loop = StoredValue::new_local(None::<FrameLoop>);
	let graph = Rc::new(RefCell::new(KnowledgeGraphState::new(0.0, 0.0)));

	let submit = move |text: String| {
		let mut ticket = None;
		session.maybe_update(|s| {
			ticket = s.begin(&text);
			ticket.is_some()
		});
		let Some(ticket) = ticket else {
			return;
		};
		let query = session.with_untracked(|s| s.query().to_string());
		input.set(query.clone());
		let service = service.get_value();
		spawn_local(async move {
			let payload = search_or_empty(service.as_ref(), &query).await;
			session.update(|s| {
				s.complete(ticket, payload);
			});
		});
	};

	let activate = move |result: SearchResult, action: ResultAction| {
		let Some((token, overlay)) = redirect.try_update(|f| f.schedule(&result, action)).flatten() else {
			return;
		};
		if let Some(previous) = pending_redirect.get_value() {
			previous.clear();
		}
		info!(
			"{} for {:?}, redirecting after {:?}",
			overlay.action_description, overlay.label, REDIRECT_DELAY
		);
		let navigate = navigate.get_value();
		match set_timeout_with_handle(
			move || {
				pending_redirect.set_value(None);
				let Some(destination) = redirect.try_update_untracked(|f| f.fire(token)).flatten() else {
					return;
				};
				debug!("navigating to {}", destination.id());
				navigate(destination);
				// overlay goes away only once navigation has been requested
				redirect.notify();
			},
			REDIRECT_DELAY,
		) {
			Ok(handle) => pending_redirect.set_value(Some(handle)),
			Err(e) => {
				warn!("could not schedule redirect: {e:?}");
				redirect.update(RedirectFlow::cancel);
			}
		}
	};

	let graph_sync = graph.clone();
	Effect::new(move |_| {
		let (nodes, searching) = session.with(|s| (s.nodes().to_vec(), s.is_searching()));
		graph_sync.borrow_mut().set_nodes(nodes, searching);
	});

	let graph_anim = graph.clone();
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (graph, ctx) = (graph_anim.clone(), RefCell::new(None));
		let last_timestamp = Cell::new(None::<f64>);

		let animation = FrameLoop::start(move |timestamp| {
			let dt = last_timestamp
				.replace(Some(timestamp))
				.map_or(0.0, |prev| (timestamp - prev) / 1000.0);
			let Ok(mut s) = graph.try_borrow_mut() else {
				return;
			};
			let (w, h) = container_size(&canvas);
			if s.resize(w, h) {
				canvas.set_width(w as u32);
				canvas.set_height(h as u32);
			}
			s.tick(dt);
			if !s.is_drawable() {
				return;
			}
			let mut ctx = ctx.borrow_mut();
			if ctx.is_none() {
				*ctx = context_2d(&canvas);
			}
			if let Some(ref ctx) = *ctx {
				render::render(&s, ctx);
			}
		});
		debug!("graph animation loop started");
		frame_loop.set_value(Some(animation));
	});

	on_cleanup(move || {
		if let Some(handle) = pending_redirect.try_get_value().flatten() {
			handle.clear();
		}
		let _ = frame_loop.try_update_value(|l| l.take());
	});

	let graph_mm = graph.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (x, y) = pointer_in(&canvas, &ev);
		graph_mm.borrow_mut().set_pointer(x, y);
	};

	let graph_ml = graph.clone();
	let on_mouseleave = move |_: MouseEvent| {
		graph_ml.borrow_mut().clear_pointer();
	};

	let graph_click = graph.clone();
	let on_click = move |_: MouseEvent| {
		let query = session.with_untracked(|s| s.query().to_string());
		let target = graph_click.borrow().click_target(&query).map(str::to_string);
		if let Some(label) = target {
			debug!("pivoting search to {label:?}");
			submit(label);
		}
	};

	let on_submit = move |ev: SubmitEvent| {
		ev.prevent_default();
		submit(input.get_untracked());
	};

	let status = move || {
		session.with(|s| match s.phase() {
			SearchPhase::Idle => "Search any SAT topic to map it.".to_string(),
			SearchPhase::Searching => format!("Mapping \u{201c}{}\u{201d}\u{2026}", s.query()),
			SearchPhase::Results => {
				let n = s.results().map_or(0, <[_]>::len);
				format!("{n} results for \u{201c}{}\u{201d}", s.query())
			}
			SearchPhase::Empty => format!("No results for \u{201c}{}\u{201d}", s.query()),
		})
	};

	let results = move || {
		session
			.with(|s| s.results().map(<[_]>::to_vec))
			.map(|results| {
				if results.is_empty() {
					view! { <p class="kg-empty">"No results found. Try a broader topic."</p> }
						.into_any()
				} else {
					view! {
						<ul class="kg-results">
							{results.into_iter().map(|r| result_card(r, activate)).collect_view()}
						</ul>
					}
					.into_any()
				}
			})
	};

	view! {
		<section class="knowledge-graph-search">
			<form class="kg-search" on:submit=on_submit>
				<input
					type="search"
					placeholder="Search concepts, lessons, practice\u{2026}"
					prop:value=move || input.get()
					on:input=move |ev| input.set(event_target_value(&ev))
				/>
				<button type="submit" disabled=move || session.with(SearchSession::is_searching)>
					"Search"
				</button>
			</form>
			<p class="kg-status">{status}</p>
			<div class="kg-canvas-container">
				<canvas
					node_ref=canvas_ref
					class="knowledge-graph-canvas"
					on:mousemove=on_mousemove
					on:mouseleave=on_mouseleave
					on:click=on_click
					style="display: block; width: 100%; height: 100%; cursor: pointer;"
				/>
			</div>
			{results}
			{move || redirect.with(|f| f.overlay().cloned()).map(redirect_overlay)}
		</section>
	}
}
