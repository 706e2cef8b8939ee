//! Credential-free search that fabricates a plausible result set.

use async_trait::async_trait;

use super::SearchService;
use super::error::ServiceResult;
use crate::components::knowledge_graph::{
	GraphNode, NodeKind, ResultKind, SearchPayload, SearchResult,
};

const SUB_TOPICS: &[&str] = &["Foundations", "Worked Examples", "Common Traps"];
const RELATED_TOPICS: &[&str] = &["Problem Solving", "Data Analysis"];

/// Deterministic pseudo-random number in `[0, 1)` (same LCG the demo data uses).
fn rand_simple(seed: usize) -> f64 {
	let x = ((seed + 1) * 9301 + 49297) % 233280;
	(x as f64) / 233280.0
}

fn seed_for(query: &str) -> usize {
	query.bytes().fold(0usize, |acc, b| acc.wrapping_mul(31).wrapping_add(b as usize)) % 10_000
}

/// Results and concept graph derived only from the query text.
pub fn sample_payload(query: &str) -> SearchPayload {
	let seed = seed_for(query);
	let kinds = [
		(ResultKind::Video, format!("{query}: Visual Walkthrough")),
		(ResultKind::Podcast, format!("Talking Through {query}")),
		(ResultKind::Article, format!("{query} Study Guide")),
		(ResultKind::Practice, format!("{query} Practice Set")),
		(ResultKind::Concept, format!("Core Ideas of {query}")),
	];
	let results = kinds
		.into_iter()
		.enumerate()
		.map(|(i, (kind, title))| SearchResult {
			title,
			kind,
			relevance_label: format!("{}% Match", 98 - i * 3 - (rand_simple(seed + i) * 3.0) as usize),
			summary: format!("A {} resource covering {query}.", kind.as_str().to_lowercase()),
		})
		.collect();

	let mut graph = vec![GraphNode {
		id: 1,
		label: query.to_string(),
		kind: NodeKind::Core,
		x: 50.0,
		y: 50.0,
	}];
	let ring = SUB_TOPICS
		.iter()
		.map(|t| (NodeKind::Sub, format!("{query} {t}"), 28.0))
		.chain(RELATED_TOPICS.iter().map(|t| (NodeKind::Related, t.to_string(), 38.0)));
	let count = SUB_TOPICS.len() + RELATED_TOPICS.len();
	for (i, (kind, label, distance)) in ring.enumerate() {
		let angle = (i as f64 + rand_simple(seed + 10 + i) * 0.4) * std::f64::consts::TAU / count as f64;
		graph.push(GraphNode {
			id: i as u32 + 2,
			label,
			kind,
			x: 50.0 + distance * angle.cos(),
			y: 50.0 + distance * angle.sin(),
		});
	}

	SearchPayload { results, graph }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct OfflineSearch;

#[async_trait(?Send)]
impl SearchService for OfflineSearch {
	fn name(&self) -> &str {
		"offline"
	}

	async fn search(&self, query: &str) -> ServiceResult<SearchPayload> {
		Ok(sample_payload(query))
	}
}
