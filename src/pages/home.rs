use std::rc::Rc;

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::components::knowledge_graph::{Destination, KnowledgeGraphSearch, Navigate};
use crate::search::{SearchConfig, backend_for};

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let service = backend_for(SearchConfig::load());
	let navigate = use_navigate();
	let on_navigate: Navigate = Rc::new(move |destination: Destination| {
		navigate(&destination.path(), Default::default());
	});

	view! {
		<div class="knowledge-page">
			<div class="graph-overlay">
				<h1>"Knowledge Graph"</h1>
				<p class="subtitle">"Search a topic. Click a concept to explore it. Open a result to study."</p>
			</div>
			<KnowledgeGraphSearch service=service on_navigate=on_navigate />
		</div>
	}
}
