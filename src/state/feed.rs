/// The feed state machine
///
/// All transitions of the visible page state go through `FeedState::apply`,
/// so the loading/error/content lifecycle can be exercised in tests without
/// a rendering environment. The struct holds no UI-toolkit types.

use super::data::ImageRecord;

/// Events produced by the page-fetch lifecycle
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    /// A page request was issued
    FetchStarted,
    /// The request resolved with a page of records
    FetchSucceeded(Vec<ImageRecord>),
    /// The request failed; the payload is the stringified failure
    FetchFailed(String),
}

/// What the view should render right now
///
/// Exactly one mode applies at a time: loading wins over a stored error,
/// which wins over the content grid.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayMode<'a> {
    Loading,
    Error(&'a str),
    Content(&'a [ImageRecord]),
}

/// State owned by the gallery view
#[derive(Debug, Clone, PartialEq)]
pub struct FeedState {
    /// A page fetch is in flight
    pub loading: bool,
    /// Records of the most recently loaded page
    pub records: Vec<ImageRecord>,
    /// Stringified failure of the last fetch, if it failed
    pub error: Option<String>,
}

impl FeedState {
    /// Initial state: the first page request is issued immediately on
    /// startup, so the app is born loading
    pub fn new() -> Self {
        FeedState {
            loading: true,
            records: Vec::new(),
            error: None,
        }
    }

    /// New page requests are gated on the previous one settling
    pub fn fetch_allowed(&self) -> bool {
        !self.loading
    }

    /// Apply one lifecycle event
    pub fn apply(&mut self, event: FeedEvent) {
        match event {
            FeedEvent::FetchStarted => {
                self.loading = true;
            }
            FeedEvent::FetchSucceeded(records) => {
                self.loading = false;
                self.records = records;
                self.error = None;
            }
            FeedEvent::FetchFailed(message) => {
                // Records keep the prior page; only the banner changes
                self.loading = false;
                self.error = Some(message);
            }
        }
    }

    /// Resolve the display precedence: loading, then error, then content
    pub fn display(&self) -> DisplayMode<'_> {
        if self.loading {
            DisplayMode::Loading
        } else if let Some(message) = &self.error {
            DisplayMode::Error(message)
        } else {
            DisplayMode::Content(&self.records)
        }
    }
}

impl Default for FeedState {
    fn default() -> Self {
        Self::new()
    }
}
