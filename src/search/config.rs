//! Search provider configuration.
//!
//! The host page may embed
//! `<script id="search-config" type="application/json">{...}</script>`;
//! otherwise the key baked in at build time via `SEARCH_API_KEY` is used.

use log::{info, warn};
use serde::Deserialize;
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const CONFIG_ELEMENT_ID: &str = "search-config";

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SearchConfig {
	#[serde(default)]
	pub api_key: Option<String>,
	#[serde(default = "default_model")]
	pub model: String,
	#[serde(default = "default_base_url")]
	pub base_url: String,
}

fn default_model() -> String {
	DEFAULT_MODEL.to_string()
}

fn default_base_url() -> String {
	DEFAULT_BASE_URL.to_string()
}

impl Default for SearchConfig {
	fn default() -> Self {
		Self {
			api_key: None,
			model: default_model(),
			base_url: default_base_url(),
		}
	}
}

impl SearchConfig {
	/// Parses the embedded JSON form. Blank keys count as absent.
	pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
		let mut config: Self = serde_json::from_str(text)?;
		if config.api_key.as_deref().is_some_and(|k| k.trim().is_empty()) {
			config.api_key = None;
		}
		Ok(config)
	}

	/// Reads the page config, falling back to defaults and the build-time key.
	pub fn load() -> Self {
		let mut config = load_from_dom().unwrap_or_default();
		if config.api_key.is_none() {
			config.api_key = option_env!("SEARCH_API_KEY")
				.filter(|k| !k.trim().is_empty())
				.map(str::to_string);
		}
		if config.api_key.is_none() {
			info!("no search credential configured; using offline search");
		}
		config
	}
}

fn load_from_dom() -> Option<SearchConfig> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id(CONFIG_ELEMENT_ID)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match SearchConfig::from_json(&json_text) {
		Ok(config) => Some(config),
		Err(e) => {
			warn!("ignoring malformed #{CONFIG_ELEMENT_ID}: {e}");
			None
		}
	}
}
