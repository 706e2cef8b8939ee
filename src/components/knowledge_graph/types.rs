//! Data returned by the semantic search service.

use serde::{Deserialize, Serialize};

/// Category of a study resource returned by a search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultKind {
	Video,
	Podcast,
	Article,
	Practice,
	Concept,
	/// Any type the provider invents outside the known set.
	#[serde(other)]
	Other,
}

impl ResultKind {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Video => "Video",
			Self::Podcast => "Podcast",
			Self::Article => "Article",
			Self::Practice => "Practice",
			Self::Concept => "Concept",
			Self::Other => "Resource",
		}
	}
}

/// A single search hit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
	pub title: String,
	#[serde(rename = "type")]
	pub kind: ResultKind,
	/// Short human-readable relevance, e.g. "98% Match".
	#[serde(rename = "relevance", default)]
	pub relevance_label: String,
	#[serde(default)]
	pub summary: String,
}

/// Role of a node in the concept graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
	/// The anchor concept; every edge connects to it.
	Core,
	Sub,
	#[serde(other)]
	Related,
}

/// A concept node positioned in percent space (0..100 on both axes).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
	pub id: u32,
	pub label: String,
	#[serde(rename = "type")]
	pub kind: NodeKind,
	pub x: f64,
	pub y: f64,
}

/// One complete search response. Results and graph always travel together.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchPayload {
	#[serde(default)]
	pub results: Vec<SearchResult>,
	#[serde(default)]
	pub graph: Vec<GraphNode>,
}
