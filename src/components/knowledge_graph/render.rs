use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::{KnowledgeGraphState, NodeLayout, packet_fraction};
use super::types::NodeKind;

const BACKGROUND: &str = "#0b1020";
const ANCHOR_COLOR: &str = "#6366f1";
const SUB_COLOR: &str = "#22d3ee";
const DIM_COLOR: &str = "#334155";
const PACKET_RADIUS: f64 = 3.0;

pub fn render(state: &KnowledgeGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);

	if state.nodes.is_empty() {
		if state.show_idle_rings() {
			draw_idle_rings(state, ctx);
		}
		return;
	}
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
}

fn draw_edges(state: &KnowledgeGraphState, ctx: &CanvasRenderingContext2d) {
	let layout = state.layout();
	ctx.set_line_width(1.5);
	for (a, i) in state.edges() {
		let (from, to) = (layout[a], layout[i]);
		ctx.set_stroke_style_str("rgba(99, 102, 241, 0.35)");
		ctx.begin_path();
		ctx.move_to(from.x, from.y);
		ctx.line_to(to.x, to.y);
		ctx.stroke();

		let t = packet_fraction(state.time, i);
		let (px, py) = (from.x + (to.x - from.x) * t, from.y + (to.y - from.y) * t);
		ctx.set_fill_style_str("rgba(165, 243, 252, 0.9)");
		ctx.begin_path();
		let _ = ctx.arc(px, py, PACKET_RADIUS, 0.0, 2.0 * PI);
		ctx.fill();
	}
}

fn draw_glow(ctx: &CanvasRenderingContext2d, node: &NodeLayout, rgb: &str) {
	let glow_radius = node.radius * 1.8;
	let Ok(gradient) =
		ctx.create_radial_gradient(node.x, node.y, node.radius * 0.5, node.x, node.y, glow_radius)
	else {
		return;
	};
	let stops = [
		(0.0, format!("rgba({rgb}, 0.45)")),
		(1.0, format!("rgba({rgb}, 0)")),
	];
	for (offset, color) in &stops {
		if gradient.add_color_stop(*offset, color).is_err() {
			return;
		}
	}
	ctx.begin_path();
	let _ = ctx.arc(node.x, node.y, glow_radius, 0.0, 2.0 * PI);
	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill();
}

fn draw_nodes(state: &KnowledgeGraphState, ctx: &CanvasRenderingContext2d) {
	let (anchor, hovered) = (state.anchor(), state.hovered());

	for (idx, (node, l)) in state.nodes.iter().zip(state.layout()).enumerate() {
		let is_anchor = Some(idx) == anchor;
		let is_hovered = Some(idx) == hovered;

		let color = if is_hovered {
			draw_glow(ctx, l, "255, 255, 255");
			"#ffffff"
		} else if is_anchor {
			draw_glow(ctx, l, "99, 102, 241");
			ANCHOR_COLOR
		} else if node.kind == NodeKind::Sub {
			SUB_COLOR
		} else {
			DIM_COLOR
		};

		ctx.begin_path();
		let _ = ctx.arc(l.x, l.y, l.radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(color);
		ctx.fill();

		ctx.set_fill_style_str(if is_hovered || is_anchor {
			"white"
		} else {
			"rgba(226, 232, 240, 0.75)"
		});
		ctx.set_font(if is_anchor {
			"bold 13px sans-serif"
		} else {
			"11px sans-serif"
		});
		ctx.set_text_align("center");
		let _ = ctx.fill_text(&node.label, l.x, l.y + l.radius + 16.0);
	}
}

const IDLE_RINGS: usize = 3;

/// Radius of idle ring `ring` at `time`. Never negative, so tiny canvases
/// still get a valid arc.
fn idle_ring_radius(width: f64, height: f64, time: f64, ring: usize) -> f64 {
	let r = ring as f64;
	let base = width.min(height) * 0.12;
	let pulse = (time * 2.0 - r).sin() * 4.0;
	(base * (1.0 + r * 0.6) + pulse).max(0.0)
}

fn draw_idle_rings(state: &KnowledgeGraphState, ctx: &CanvasRenderingContext2d) {
	let (cx, cy) = (state.width / 2.0, state.height / 2.0);

	ctx.set_line_width(1.0);
	let _ = ctx.set_line_dash(&js_sys::Array::of2(
		&JsValue::from_f64(6.0),
		&JsValue::from_f64(6.0),
	));
	for ring in 0..IDLE_RINGS {
		let alpha = 0.35 - ring as f64 * 0.1;
		// alternate rings rotate in opposite directions
		let direction = if ring % 2 == 0 { 1.0 } else { -1.0 };
		ctx.set_line_dash_offset(direction * state.time * 20.0);
		ctx.set_stroke_style_str(&format!("rgba(99, 102, 241, {alpha})"));
		ctx.begin_path();
		let radius = idle_ring_radius(state.width, state.height, state.time, ring);
		let _ = ctx.arc(cx, cy, radius, 0.0, 2.0 * PI);
		ctx.stroke();
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}
