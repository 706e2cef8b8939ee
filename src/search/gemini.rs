//! Remote search through the generative-language `generateContent` endpoint.
//!
//! The response shape is pinned with a JSON response schema, so decoding is
//! a plain serde pass over the first candidate's text.

use async_trait::async_trait;
use gloo_net::http::Request;
use log::debug;
use serde::Deserialize;
use serde_json::{Value, json};

use super::config::SearchConfig;
use super::error::{SearchError, ServiceResult};
use super::SearchService;
use crate::components::knowledge_graph::SearchPayload;

pub struct GeminiSearch {
	config: SearchConfig,
}

impl std::fmt::Debug for GeminiSearch {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("GeminiSearch")
			.field("model", &self.config.model)
			.field("base_url", &self.config.base_url)
			.field("api_key", &"[REDACTED]")
			.finish()
	}
}

#[derive(Deserialize)]
struct GenerateResponse {
	#[serde(default)]
	candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
	content: Option<Content>,
}

#[derive(Deserialize)]
struct Content {
	#[serde(default)]
	parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
	text: Option<String>,
}

impl GeminiSearch {
	pub fn new(config: SearchConfig) -> Self {
		Self { config }
	}

	fn endpoint(&self, api_key: &str) -> String {
		format!(
			"{}/models/{}:generateContent?key={}",
			self.config.base_url.trim_end_matches('/'),
			self.config.model,
			api_key
		)
	}
}

fn prompt(query: &str) -> String {
	format!(
		"Act as a semantic search engine for an SAT preparation platform. \
		 The student searched for: \"{query}\".\n\
		 Return 5 study resources (type is one of Video, Podcast, Article, Practice, Concept) \
		 with a short relevance label such as \"96% Match\" and a one-sentence summary.\n\
		 Also return a concept graph of 6 nodes: exactly one Core node for the query itself, \
		 3 Sub nodes for its sub-topics and 2 Related nodes for neighbouring topics. \
		 Give each node x and y coordinates between 10 and 90, with the Core node near 50,50."
	)
}

/// Request body with the response schema that fixes the payload shape.
fn request_body(query: &str) -> Value {
	json!({
		"contents": [{ "parts": [{ "text": prompt(query) }] }],
		"generationConfig": {
			"responseMimeType": "application/json",
			"responseSchema": {
				"type": "OBJECT",
				"properties": {
					"results": {
						"type": "ARRAY",
						"items": {
							"type": "OBJECT",
							"properties": {
								"title": { "type": "STRING" },
								"type": {
									"type": "STRING",
									"enum": ["Video", "Podcast", "Article", "Practice", "Concept"]
								},
								"relevance": { "type": "STRING" },
								"summary": { "type": "STRING" }
							},
							"required": ["title", "type", "relevance", "summary"]
						}
					},
					"graph": {
						"type": "ARRAY",
						"items": {
							"type": "OBJECT",
							"properties": {
								"id": { "type": "INTEGER" },
								"label": { "type": "STRING" },
								"type": { "type": "STRING", "enum": ["Core", "Sub", "Related"] },
								"x": { "type": "NUMBER" },
								"y": { "type": "NUMBER" }
							},
							"required": ["id", "label", "type", "x", "y"]
						}
					}
				},
				"required": ["results", "graph"]
			}
		}
	})
}

/// Pulls the payload out of a raw `generateContent` response body.
fn decode_response(body: &str) -> ServiceResult<SearchPayload> {
	let response: GenerateResponse = serde_json::from_str(body)?;
	let text: String = response
		.candidates
		.into_iter()
		.next()
		.and_then(|c| c.content)
		.map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
		.unwrap_or_default();
	let text = strip_code_fence(text.trim());
	if text.is_empty() {
		return Err(SearchError::EmptyResponse);
	}
	Ok(serde_json::from_str(text)?)
}

fn strip_code_fence(text: &str) -> &str {
	let Some(inner) = text.strip_prefix("```") else {
		return text;
	};
	let inner = inner.strip_prefix("json").unwrap_or(inner);
	inner.strip_suffix("```").unwrap_or(inner).trim()
}

#[async_trait(?Send)]
impl SearchService for GeminiSearch {
	fn name(&self) -> &str {
		"gemini"
	}

	async fn search(&self, query: &str) -> ServiceResult<SearchPayload> {
		let api_key = self.config.api_key.as_deref().ok_or(SearchError::NotConfigured)?;
		debug!("gemini search via {}", self.config.model);

		let response = Request::post(&self.endpoint(api_key))
			.json(&request_body(query))?
			.send()
			.await?;
		if !response.ok() {
			return Err(SearchError::Status(response.status()));
		}
		let body = response.text().await?;
		decode_response(&body)
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::components::knowledge_graph::{NodeKind, ResultKind};

	fn wrap(text: &str) -> String {
		json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] }).to_string()
	}

	#[test]
	fn request_pins_json_schema() {
		let body = request_body("Quadratic Equations");
		assert_eq!(
			body["generationConfig"]["responseMimeType"],
			"application/json"
		);
		assert_eq!(
			body["generationConfig"]["responseSchema"]["required"],
			json!(["results", "graph"])
		);
		let text = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
		assert!(text.contains("\"Quadratic Equations\""));
	}

	#[test]
	fn endpoint_includes_model_and_key() {
		let search = GeminiSearch::new(SearchConfig {
			api_key: Some("secret".into()),
			model: "gemini-test".into(),
			base_url: "https://example.test/v1beta/".into(),
		});
		assert_eq!(
			search.endpoint("secret"),
			"https://example.test/v1beta/models/gemini-test:generateContent?key=secret"
		);
		assert!(!format!("{search:?}").contains("secret"));
	}

	#[test]
	fn decodes_candidate_text() {
		let inner = r#"{"results":[{"title":"Slope","type":"Concept","relevance":"91% Match","summary":"Rise over run."}],
			"graph":[{"id":1,"label":"Slope","type":"Core","x":50,"y":50}]}"#;
		let payload = decode_response(&wrap(inner)).unwrap();
		assert_eq!(payload.results[0].kind, ResultKind::Concept);
		assert_eq!(payload.graph[0].kind, NodeKind::Core);
	}

	#[test]
	fn fenced_text_is_accepted() {
		let payload = decode_response(&wrap("```json\n{\"results\":[],\"graph\":[]}\n```")).unwrap();
		assert_eq!(payload, SearchPayload::default());
	}

	#[test]
	fn no_candidates_is_empty_response() {
		assert!(matches!(
			decode_response(r#"{"candidates":[]}"#),
			Err(SearchError::EmptyResponse)
		));
	}

	#[test]
	fn non_json_text_is_decode_error() {
		assert!(matches!(
			decode_response(&wrap("Sorry, I can't help with that.")),
			Err(SearchError::Decode(_))
		));
		assert!(matches!(decode_response("<html>"), Err(SearchError::Decode(_))));
	}
}
