//! Per-frame layout and pointer tracking for the concept graph.
//!
//! Nodes arrive in percent space. Every tick the state adds a small
//! decorative drift and a pointer parallax, clamps the result to the safe
//! band, and converts to pixels. Hover is resolved from the same layout so
//! what is drawn is exactly what is hit-tested.

use super::types::{GraphNode, NodeKind};

/// Logical coordinates are clamped to this band before pixel conversion.
pub const CLAMP_MIN: f64 = 5.0;
pub const CLAMP_MAX: f64 = 95.0;

pub const ANCHOR_RADIUS: f64 = 30.0;
pub const SUB_RADIUS: f64 = 20.0;
pub const RELATED_RADIUS: f64 = 15.0;
/// Extra slack around a node's drawn radius that still counts as a hit.
pub const HOVER_TOLERANCE: f64 = 5.0;

/// Drift amplitude, in percent of the canvas.
const JITTER: f64 = 1.0;
/// Parallax at the canvas edge, in percent of the canvas.
const PARALLAX: f64 = 3.0;

/// Animation time units per second (0.01 per frame at 60 Hz).
pub const TIME_PER_SECOND: f64 = 0.6;
/// Longer gaps (tab in background, debugger) are treated as this.
pub const MAX_FRAME_DT: f64 = 0.1;

/// Screen-space placement of one node for the current frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeLayout {
	pub x: f64,
	pub y: f64,
	pub radius: f64,
}

/// Index of the anchor node: the first `Core` node, else the first node.
pub fn anchor_index(nodes: &[GraphNode]) -> Option<usize> {
	if nodes.is_empty() {
		return None;
	}
	Some(
		nodes
			.iter()
			.position(|n| n.kind == NodeKind::Core)
			.unwrap_or(0),
	)
}

/// Fraction along an edge of the packet dot for edge `index` at `time`.
/// Always in `[0, 1)`, repeating every 2 time units.
pub fn packet_fraction(time: f64, index: usize) -> f64 {
	(time * 0.5 + index as f64 * 0.5).rem_euclid(1.0)
}

pub struct KnowledgeGraphState {
	pub nodes: Vec<GraphNode>,
	pub width: f64,
	pub height: f64,
	pub time: f64,
	/// A search is in flight; suppresses the idle rings.
	pub searching: bool,
	pointer: Option<(f64, f64)>,
	anchor: Option<usize>,
	layout: Vec<NodeLayout>,
	hovered: Option<usize>,
}

impl KnowledgeGraphState {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			nodes: Vec::new(),
			width,
			height,
			time: 0.0,
			searching: false,
			pointer: None,
			anchor: None,
			layout: Vec::new(),
			hovered: None,
		}
	}

	/// Replaces the node set. The stored nodes are never modified.
	pub fn set_nodes(&mut self, nodes: Vec<GraphNode>, searching: bool) {
		self.anchor = anchor_index(&nodes);
		self.nodes = nodes;
		self.searching = searching;
		self.relayout();
	}

	/// Returns `true` if the size actually changed.
	pub fn resize(&mut self, width: f64, height: f64) -> bool {
		if self.width == width && self.height == height {
			return false;
		}
		self.width = width;
		self.height = height;
		self.relayout();
		true
	}

	pub fn is_drawable(&self) -> bool {
		self.width >= 1.0 && self.height >= 1.0
	}

	pub fn set_pointer(&mut self, x: f64, y: f64) {
		self.pointer = Some((x, y));
	}

	pub fn clear_pointer(&mut self) {
		self.pointer = None;
		self.hovered = None;
	}

	/// Advances the animation by `dt` seconds and recomputes layout and hover.
	pub fn tick(&mut self, dt: f64) {
		self.time += dt.clamp(0.0, MAX_FRAME_DT) * TIME_PER_SECOND;
		self.relayout();
	}

	pub fn anchor(&self) -> Option<usize> {
		self.anchor
	}

	pub fn layout(&self) -> &[NodeLayout] {
		&self.layout
	}

	pub fn hovered(&self) -> Option<usize> {
		self.hovered
	}

	/// Pairs of (anchor, node) for every non-anchor node.
	pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
		let anchor = self.anchor;
		(0..self.nodes.len()).filter_map(move |i| match anchor {
			Some(a) if a != i => Some((a, i)),
			_ => None,
		})
	}

	pub fn show_idle_rings(&self) -> bool {
		self.nodes.is_empty() && !self.searching
	}

	/// The label a click should pivot the search to, if any. Labels are
	/// compared trimmed, the same way the session stores its query.
	pub fn click_target(&self, current_query: &str) -> Option<&str> {
		let label = self.nodes[self.hovered?].label.trim();
		(!label.is_empty() && label != current_query.trim()).then_some(label)
	}

	fn radius_of(&self, idx: usize) -> f64 {
		if Some(idx) == self.anchor {
			return ANCHOR_RADIUS;
		}
		match self.nodes[idx].kind {
			NodeKind::Core => ANCHOR_RADIUS,
			NodeKind::Sub => SUB_RADIUS,
			NodeKind::Related => RELATED_RADIUS,
		}
	}

	fn parallax(&self) -> (f64, f64) {
		match self.pointer {
			Some((px, py)) if self.is_drawable() => (
				(px - self.width / 2.0) / self.width * PARALLAX,
				(py - self.height / 2.0) / self.height * PARALLAX,
			),
			_ => (0.0, 0.0),
		}
	}

	fn relayout(&mut self) {
		let (par_x, par_y) = self.parallax();
		let time = self.time;
		let layout: Vec<NodeLayout> = self
			.nodes
			.iter()
			.enumerate()
			.map(|(i, node)| {
				let phase = i as f64;
				// anchor sits deeper, so it drifts with the pointer less
				let depth = if Some(i) == self.anchor { 0.5 } else { 1.0 };
				let lx = node.x + (time + phase).sin() * JITTER + par_x * depth;
				let ly = node.y + (time * 0.8 + phase * 1.3).cos() * JITTER + par_y * depth;
				NodeLayout {
					x: lx.clamp(CLAMP_MIN, CLAMP_MAX) / 100.0 * self.width,
					y: ly.clamp(CLAMP_MIN, CLAMP_MAX) / 100.0 * self.height,
					radius: self.radius_of(i),
				}
			})
			.collect();
		self.layout = layout;
		self.hovered = self.node_at_position();
	}

	/// Nearest node whose hit circle contains the pointer. Equal distances
	/// keep the earlier node.
	fn node_at_position(&self) -> Option<usize> {
		let (px, py) = self.pointer?;
		let mut found: Option<(usize, f64)> = None;
		for (i, l) in self.layout.iter().enumerate() {
			let dist = ((l.x - px).powi(2) + (l.y - py).powi(2)).sqrt();
			if dist >= l.radius + HOVER_TOLERANCE {
				continue;
			}
			if found.is_none_or(|(_, best)| dist < best) {
				found = Some((i, dist));
			}
		}
		found.map(|(i, _)| i)
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use proptest::prelude::*;

	use super::*;
	use crate::components::knowledge_graph::session::SearchSession;
	use crate::components::knowledge_graph::types::SearchPayload;

	fn node(id: u32, label: &str, kind: NodeKind, x: f64, y: f64) -> GraphNode {
		GraphNode {
			id,
			label: label.into(),
			kind,
			x,
			y,
		}
	}

	fn linear_algebra() -> Vec<GraphNode> {
		vec![
			node(1, "Linear Algebra", NodeKind::Core, 50.0, 50.0),
			node(2, "Matrices", NodeKind::Sub, 25.0, 30.0),
			node(3, "Vectors", NodeKind::Sub, 75.0, 30.0),
			node(4, "Determinants", NodeKind::Sub, 50.0, 80.0),
			node(5, "Physics", NodeKind::Related, 15.0, 75.0),
			node(6, "Computer Graphics", NodeKind::Related, 85.0, 75.0),
		]
	}

	#[test]
	fn six_nodes_draw_five_edges_to_core() {
		let mut s = KnowledgeGraphState::new(800.0, 600.0);
		s.set_nodes(linear_algebra(), false);
		assert_eq!(s.layout().len(), 6);
		let edges: Vec<_> = s.edges().collect();
		assert_eq!(edges, vec![(0, 1), (0, 2), (0, 3), (0, 4), (0, 5)]);
		assert_eq!(s.layout()[0].radius, ANCHOR_RADIUS);
		assert!(!s.show_idle_rings());
	}

	#[test]
	fn first_node_anchors_without_core() {
		let nodes = vec![
			node(1, "A", NodeKind::Sub, 10.0, 10.0),
			node(2, "B", NodeKind::Related, 90.0, 90.0),
		];
		assert_eq!(anchor_index(&nodes), Some(0));
		assert_eq!(anchor_index(&[]), None);

		let mut s = KnowledgeGraphState::new(100.0, 100.0);
		s.set_nodes(nodes, false);
		assert_eq!(s.layout()[0].radius, ANCHOR_RADIUS);
		assert_eq!(s.edges().collect::<Vec<_>>(), vec![(0, 1)]);
	}

	#[test]
	fn out_of_range_coordinates_render_clamped() {
		let mut s = KnowledgeGraphState::new(1000.0, 500.0);
		s.set_nodes(vec![node(1, "Far", NodeKind::Core, 200.0, -50.0)], false);
		s.set_pointer(0.0, 0.0);
		s.tick(0.016);

		assert_eq!(s.layout()[0].x, 950.0);
		assert_eq!(s.layout()[0].y, 25.0);
		// stored data untouched
		assert_eq!(s.nodes[0].x, 200.0);
	}

	#[test]
	fn hover_and_click_pivot() {
		let mut s = KnowledgeGraphState::new(1000.0, 1000.0);
		s.set_nodes(linear_algebra(), false);
		let target = s.layout()[1];
		s.set_pointer(target.x, target.y);
		s.tick(0.0);
		let l = s.layout()[1];
		assert!(((l.x - target.x).powi(2) + (l.y - target.y).powi(2)).sqrt() < SUB_RADIUS);
		assert_eq!(s.hovered(), Some(1));
		assert_eq!(s.click_target("Linear Algebra"), Some("Matrices"));
		assert_eq!(s.click_target("Matrices"), None);

		s.clear_pointer();
		assert_eq!(s.hovered(), None);
		assert_eq!(s.click_target("Linear Algebra"), None);
	}

	fn hover_node(s: &mut KnowledgeGraphState, idx: usize) {
		let target = s.layout()[idx];
		s.set_pointer(target.x, target.y);
		s.tick(0.0);
		assert_eq!(s.hovered(), Some(idx));
	}

	#[test]
	fn padded_label_does_not_repeat_current_search() {
		let mut s = KnowledgeGraphState::new(1000.0, 1000.0);
		let mut nodes = linear_algebra();
		nodes[1].label = "Matrices ".into();
		nodes[2].label = "   ".into();
		s.set_nodes(nodes, false);

		hover_node(&mut s, 1);
		assert_eq!(s.click_target("Matrices"), None);
		assert_eq!(s.click_target("Linear Algebra"), Some("Matrices"));

		hover_node(&mut s, 2);
		assert_eq!(s.click_target("Linear Algebra"), None);
	}

	#[test]
	fn node_click_issues_exactly_one_search() {
		let mut session = SearchSession::new();
		let ticket = session.begin("Linear Algebra").unwrap();
		session.complete(ticket, Some(SearchPayload {
			results: Vec::new(),
			graph: linear_algebra(),
		}));

		let mut s = KnowledgeGraphState::new(1000.0, 1000.0);
		s.set_nodes(session.nodes().to_vec(), session.is_searching());
		hover_node(&mut s, 1);

		let mut issued = Vec::new();
		for _ in 0..2 {
			// the view holds the same nodes while the pivot search is pending
			if let Some(label) = s.click_target(session.query()).map(str::to_string) {
				issued.extend(session.begin(&label));
			}
		}
		assert_eq!(issued.len(), 1);
		assert_eq!(session.query(), "Matrices");
		assert!(session.is_searching());
	}

	#[test]
	fn overlapping_hit_circles_pick_nearest() {
		let mut s = KnowledgeGraphState::new(1000.0, 1000.0);
		s.set_nodes(
			vec![
				node(1, "Core", NodeKind::Core, 50.0, 50.0),
				node(2, "Near", NodeKind::Sub, 52.0, 50.0),
			],
			false,
		);
		let (a, b) = (s.layout()[0], s.layout()[1]);
		// a point a quarter of the way from the core toward the sub node
		let (px, py) = (a.x + (b.x - a.x) * 0.25, a.y + (b.y - a.y) * 0.25);
		s.set_pointer(px, py);
		s.tick(0.0);
		assert_eq!(s.hovered(), Some(0));
	}

	#[test]
	fn pointer_far_away_hovers_nothing() {
		let mut s = KnowledgeGraphState::new(1000.0, 1000.0);
		s.set_nodes(linear_algebra(), false);
		s.set_pointer(999.0, 1.0);
		s.tick(0.016);
		assert_eq!(s.hovered(), None);
	}

	#[test]
	fn idle_rings_only_when_empty_and_not_searching() {
		let mut s = KnowledgeGraphState::new(100.0, 100.0);
		assert!(s.show_idle_rings());
		s.set_nodes(Vec::new(), true);
		assert!(!s.show_idle_rings());
		s.set_nodes(Vec::new(), false);
		assert!(s.show_idle_rings());
	}

	#[test]
	fn zero_size_is_not_drawable() {
		let mut s = KnowledgeGraphState::new(0.0, 300.0);
		assert!(!s.is_drawable());
		assert!(s.resize(300.0, 300.0));
		assert!(!s.resize(300.0, 300.0));
		assert!(s.is_drawable());
	}

	#[test]
	fn time_step_is_delta_scaled_and_capped() {
		let mut s = KnowledgeGraphState::new(100.0, 100.0);
		s.tick(0.5);
		assert_eq!(s.time, MAX_FRAME_DT * TIME_PER_SECOND);
		s.tick(-1.0);
		assert_eq!(s.time, MAX_FRAME_DT * TIME_PER_SECOND);
	}

	#[test]
	fn packet_cycles_every_two_time_units() {
		let step = 0.25;
		let start = packet_fraction(0.0, 0);
		assert_eq!(start, 0.0);
		let after: Vec<f64> = (1..=8).map(|k| packet_fraction(k as f64 * step, 0)).collect();
		assert_eq!(after.last().copied(), Some(0.0));
		assert!(after[..7].iter().all(|f| *f > 0.0));
	}

	proptest! {
		#[test]
		fn packet_fraction_in_unit_interval(time in 0.0f64..1.0e6, index in 0usize..64) {
			let f = packet_fraction(time, index);
			prop_assert!((0.0..1.0).contains(&f));
		}

		#[test]
		fn layout_always_inside_safe_band(
			x in -1.0e4f64..1.0e4,
			y in -1.0e4f64..1.0e4,
			time in 0.0f64..100.0,
			px in 0.0f64..800.0,
			py in 0.0f64..600.0,
		) {
			let mut s = KnowledgeGraphState::new(800.0, 600.0);
			s.time = time;
			s.set_pointer(px, py);
			s.set_nodes(vec![node(1, "n", NodeKind::Sub, x, y)], false);
			let l = s.layout()[0];
			prop_assert!(l.x >= 800.0 * 0.05 && l.x <= 800.0 * 0.95);
			prop_assert!(l.y >= 600.0 * 0.05 && l.y <= 600.0 * 0.95);
		}
	}
}
