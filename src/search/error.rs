/// Failure talking to the search provider.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
	/// No credential was configured for the remote provider.
	#[error("search provider not configured")]
	NotConfigured,

	/// Request never produced a response.
	#[error("network error: {0}")]
	Network(String),

	/// Provider answered with a non-success status.
	#[error("provider returned status {0}")]
	Status(u16),

	/// Response carried no candidate text.
	#[error("provider returned no content")]
	EmptyResponse,

	/// Candidate text was not the expected JSON shape.
	#[error("malformed search payload: {0}")]
	Decode(#[from] serde_json::Error),
}

impl From<gloo_net::Error> for SearchError {
	fn from(e: gloo_net::Error) -> Self {
		Self::Network(e.to_string())
	}
}

pub type ServiceResult<T> = Result<T, SearchError>;
