//! Result activation: which actions a result offers, what the overlay says,
//! and where the app goes after the delay.

use std::time::Duration;

use super::types::{ResultKind, SearchResult};

/// How long the overlay stays up before navigating.
pub const REDIRECT_DELAY: Duration = Duration::from_millis(1500);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResultAction {
	View,
	/// Only offered for media results.
	Generate,
}

impl ResultAction {
	pub fn offered_for(kind: ResultKind) -> &'static [ResultAction] {
		match kind {
			ResultKind::Video | ResultKind::Podcast => &[Self::View, Self::Generate],
			_ => &[Self::View],
		}
	}

	pub fn button_label(self) -> &'static str {
		match self {
			Self::View => "View",
			Self::Generate => "Generate",
		}
	}
}

/// Overlay content while a navigation is pending.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RedirectState {
	pub label: String,
	pub action_description: String,
}

/// Places in the app a result can lead to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Destination {
	VideoLesson,
	VoiceCoach,
	Practice,
	Library,
	ConceptExploration,
	Hub,
}

impl Destination {
	pub const ALL: [Destination; 6] = [
		Self::VideoLesson,
		Self::VoiceCoach,
		Self::Practice,
		Self::Library,
		Self::ConceptExploration,
		Self::Hub,
	];

	pub fn for_kind(kind: ResultKind) -> Self {
		match kind {
			ResultKind::Video => Self::VideoLesson,
			ResultKind::Podcast => Self::VoiceCoach,
			ResultKind::Practice => Self::Practice,
			ResultKind::Article => Self::Library,
			ResultKind::Concept => Self::ConceptExploration,
			ResultKind::Other => Self::Hub,
		}
	}

	pub fn id(self) -> &'static str {
		match self {
			Self::VideoLesson => "video-lesson",
			Self::VoiceCoach => "voice-coach",
			Self::Practice => "practice",
			Self::Library => "library",
			Self::ConceptExploration => "concept",
			Self::Hub => "hub",
		}
	}

	pub fn from_id(id: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|d| d.id() == id)
	}

	pub fn title(self) -> &'static str {
		match self {
			Self::VideoLesson => "Video Lesson",
			Self::VoiceCoach => "Voice Coach",
			Self::Practice => "Practice",
			Self::Library => "Library",
			Self::ConceptExploration => "Concept Explorer",
			Self::Hub => "Study Hub",
		}
	}

	pub fn path(self) -> String {
		format!("/go/{}", self.id())
	}
}

/// Builds the overlay and destination for activating `result` with
/// `action`. `None` if the action is not offered for this kind.
pub fn plan_redirect(result: &SearchResult, action: ResultAction) -> Option<(RedirectState, Destination)> {
	if !ResultAction::offered_for(result.kind).contains(&action) {
		return None;
	}
	let action_description = match action {
		ResultAction::View => format!("Opening {} module", result.kind.as_str()),
		ResultAction::Generate => match result.kind {
			ResultKind::Podcast => "Generating AI podcast episode".to_string(),
			_ => "Generating AI video lesson".to_string(),
		},
	};
	Some((
		RedirectState {
			label: result.title.clone(),
			action_description,
		},
		Destination::for_kind(result.kind),
	))
}

/// Identifies one scheduled redirect. Tokens increase monotonically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct RedirectToken(u64);

/// `Idle -> Pending(overlay) -> Idle`. At most one redirect is pending;
/// scheduling another supersedes it.
#[derive(Clone, Debug, Default)]
pub struct RedirectFlow {
	pending: Option<(RedirectToken, RedirectState, Destination)>,
	issued: u64,
}

impl RedirectFlow {
	pub fn new() -> Self {
		Self::default()
	}

	/// Enters the pending state for `result`. Returns `None` (and leaves any
	/// pending redirect alone) when `action` is not offered for the result.
	pub fn schedule(&mut self, result: &SearchResult, action: ResultAction) -> Option<(RedirectToken, RedirectState)> {
		let (overlay, destination) = plan_redirect(result, action)?;
		self.issued += 1;
		let token = RedirectToken(self.issued);
		self.pending = Some((token, overlay.clone(), destination));
		Some((token, overlay))
	}

	/// Completes the redirect for `token`, returning where to go. Superseded
	/// or already-fired tokens yield `None` and change nothing.
	pub fn fire(&mut self, token: RedirectToken) -> Option<Destination> {
		match self.pending {
			Some((current, _, destination)) if current == token => {
				self.pending = None;
				Some(destination)
			}
			_ => None,
		}
	}

	pub fn cancel(&mut self) {
		self.pending = None;
	}

	pub fn overlay(&self) -> Option<&RedirectState> {
		self.pending.as_ref().map(|(_, overlay, _)| overlay)
	}
}
