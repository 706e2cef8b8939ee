//! Semantic search capability behind the knowledge graph view.

mod config;
mod error;
mod gemini;
mod offline;

use std::rc::Rc;

use async_trait::async_trait;
use log::warn;

use crate::components::knowledge_graph::SearchPayload;

pub use config::SearchConfig;
pub use error::ServiceResult;
use gemini::GeminiSearch;
use offline::OfflineSearch;

/// Something that can answer a free-text query with results and a concept
/// graph. Futures are not `Send`; everything runs on the browser thread.
#[async_trait(?Send)]
pub trait SearchService {
	fn name(&self) -> &str;

	async fn search(&self, query: &str) -> ServiceResult<SearchPayload>;
}

/// Runs one search and folds every failure into `None`.
pub async fn search_or_empty(service: &dyn SearchService, query: &str) -> Option<SearchPayload> {
	match service.search(query).await {
		Ok(payload) => Some(payload),
		Err(e) => {
			warn!("{} search for {:?} failed: {}", service.name(), query, e);
			None
		}
	}
}

/// Picks the remote provider when a credential is present.
pub fn backend_for(config: SearchConfig) -> Rc<dyn SearchService> {
	if config.api_key.is_some() {
		Rc::new(GeminiSearch::new(config))
	} else {
		Rc::new(OfflineSearch)
	}
}
