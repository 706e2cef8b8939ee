mod component;
mod redirect;
mod render;
mod session;
mod state;
mod types;

pub use component::{KnowledgeGraphSearch, Navigate};
pub use redirect::Destination;
pub use types::{GraphNode, NodeKind, ResultKind, SearchPayload, SearchResult};
