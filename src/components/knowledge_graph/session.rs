//! Search session: query text, in-flight flag, and the current result batch.
//!
//! Every submission is stamped with a [`SearchTicket`]. Only the response for
//! the most recently issued ticket is applied; anything older is dropped, so
//! a slow early request can never overwrite a fresh one.

use log::{debug, info};

use super::types::{GraphNode, SearchPayload, SearchResult};

/// Identifies one submitted search. Tickets increase monotonically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct SearchTicket(u64);

/// Coarse view of where the session is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchPhase {
	/// Nothing submitted yet.
	Idle,
	Searching,
	/// At least one result arrived.
	Results,
	/// The last search finished with no results (or failed).
	Empty,
}

#[derive(Clone, Debug, Default)]
pub struct SearchSession {
	query: String,
	searching: bool,
	/// `None` until a search completes; `Some(vec![])` means "no results".
	results: Option<Vec<SearchResult>>,
	nodes: Vec<GraphNode>,
	issued: u64,
}

impl SearchSession {
	pub fn new() -> Self {
		Self::default()
	}

	/// Starts a new search. Returns `None` (and changes nothing) when `text`
	/// is blank.
	pub fn begin(&mut self, text: &str) -> Option<SearchTicket> {
		let text = text.trim();
		if text.is_empty() {
			return None;
		}
		self.issued += 1;
		self.query = text.to_string();
		self.searching = true;
		self.results = None;
		self.nodes.clear();
		debug!("search #{} started for {:?}", self.issued, self.query);
		Some(SearchTicket(self.issued))
	}

	/// Applies a finished search. A `None` payload is a failed or empty
	/// search and leaves an explicit empty result list.
	///
	/// Returns `false` if the ticket was superseded and the payload dropped.
	pub fn complete(&mut self, ticket: SearchTicket, payload: Option<SearchPayload>) -> bool {
		if ticket.0 != self.issued {
			info!(
				"dropping stale search #{} (latest is #{})",
				ticket.0, self.issued
			);
			return false;
		}
		match payload {
			Some(SearchPayload { results, graph }) => {
				debug!(
					"search #{} finished: {} results, {} nodes",
					ticket.0,
					results.len(),
					graph.len()
				);
				self.results = Some(results);
				self.nodes = graph;
			}
			None => {
				self.results = Some(Vec::new());
				self.nodes.clear();
			}
		}
		self.searching = false;
		true
	}

	pub fn query(&self) -> &str {
		&self.query
	}

	pub fn is_searching(&self) -> bool {
		self.searching
	}

	pub fn results(&self) -> Option<&[SearchResult]> {
		self.results.as_deref()
	}

	pub fn nodes(&self) -> &[GraphNode] {
		&self.nodes
	}

	pub fn phase(&self) -> SearchPhase {
		if self.searching {
			return SearchPhase::Searching;
		}
		match &self.results {
			None => SearchPhase::Idle,
			Some(r) if r.is_empty() => SearchPhase::Empty,
			Some(_) => SearchPhase::Results,
		}
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::components::knowledge_graph::types::{NodeKind, ResultKind};

	fn payload(results: usize, nodes: usize) -> SearchPayload {
		SearchPayload {
			results: (0..results)
				.map(|i| SearchResult {
					title: format!("Result {i}"),
					kind: ResultKind::Article,
					relevance_label: "90% Match".into(),
					summary: String::new(),
				})
				.collect(),
			graph: (0..nodes)
				.map(|i| GraphNode {
					id: i as u32,
					label: format!("Node {i}"),
					kind: if i == 0 { NodeKind::Core } else { NodeKind::Sub },
					x: 50.0,
					y: 50.0,
				})
				.collect(),
		}
	}

	#[test]
	fn blank_query_is_ignored() {
		let mut s = SearchSession::new();
		assert_eq!(s.begin("   \t"), None);
		assert_eq!(s.phase(), SearchPhase::Idle);
		assert!(!s.is_searching());
	}

	#[test]
	fn begin_clears_previous_batch_before_response() {
		let mut s = SearchSession::new();
		let t = s.begin("Linear Algebra").unwrap();
		assert!(s.complete(t, Some(payload(5, 6))));
		assert_eq!(s.results().map(<[_]>::len), Some(5));
		assert_eq!(s.nodes().len(), 6);

		s.begin("  Geometry ").unwrap();
		assert_eq!(s.query(), "Geometry");
		assert_eq!(s.phase(), SearchPhase::Searching);
		assert_eq!(s.results(), None);
		assert!(s.nodes().is_empty());
	}

	#[test]
	fn null_payload_leaves_explicit_empty_list() {
		let mut s = SearchSession::new();
		let t = s.begin("quantum gravity").unwrap();
		assert!(s.complete(t, None));
		assert_eq!(s.results(), Some(&[][..]));
		assert_eq!(s.phase(), SearchPhase::Empty);
		assert!(!s.is_searching());
	}

	#[test]
	fn stale_response_is_dropped() {
		let mut s = SearchSession::new();
		let first = s.begin("first").unwrap();
		let second = s.begin("second").unwrap();
		assert!(second > first);

		assert!(s.complete(second, Some(payload(2, 3))));
		// the older request resolves last and must not overwrite
		assert!(!s.complete(first, Some(payload(7, 1))));
		assert_eq!(s.results().map(<[_]>::len), Some(2));
		assert_eq!(s.nodes().len(), 3);
		assert_eq!(s.query(), "second");
	}

	#[test]
	fn stale_response_does_not_end_pending_search() {
		let mut s = SearchSession::new();
		let first = s.begin("first").unwrap();
		s.begin("second").unwrap();
		assert!(!s.complete(first, None));
		assert_eq!(s.phase(), SearchPhase::Searching);
	}
}
