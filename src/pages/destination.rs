use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_params_map;

use crate::components::knowledge_graph::Destination;

/// Landing view for a navigation destination (`/go/:id`).
#[component]
pub fn DestinationPage() -> impl IntoView {
	let params = use_params_map();
	let destination = move || params.with(|p| p.get("id").as_deref().and_then(Destination::from_id));

	view! {
		<div class="destination-page">
			{move || match destination() {
				Some(d) => view! { <h1>{d.title()}</h1> }.into_any(),
				None => view! { <h1>"Unknown destination"</h1> }.into_any(),
			}}
			<A href="/">"Back to search"</A>
		</div>
	}
}
