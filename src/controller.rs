//! View state and its transitions
//!
//! The controller owns everything the user sees: the active tab, the search
//! term, the listed shows, the open detail view and the favorites. It never
//! performs I/O. Each `Message` updates the state and may return an `Action`
//! asking the caller to fetch from the catalog or to persist the favorites;
//! fetch outcomes come back as `Message::FetchCompleted`.

use crate::catalog::{FetchError, ShowDetail, ShowId, ShowSummary};
use crate::favorites;

/// Mutually exclusive view mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Search,
    Favorites,
}

/// Tag pairing a fetch outcome with the request that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

/// A catalog request the caller should run.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchRequest {
    Search { id: RequestId, term: String },
    ListPage { id: RequestId, page: u32 },
    Detail { id: RequestId, show_id: ShowId },
}

impl FetchRequest {
    pub fn id(&self) -> RequestId {
        match self {
            FetchRequest::Search { id, .. }
            | FetchRequest::ListPage { id, .. }
            | FetchRequest::Detail { id, .. } => *id,
        }
    }
}

/// Outcome of a `FetchRequest`.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// Outcome of a search or page listing
    Shows {
        id: RequestId,
        outcome: Result<Vec<ShowSummary>, FetchError>,
    },
    /// Outcome of a detail request
    Detail {
        id: RequestId,
        outcome: Result<ShowDetail, FetchError>,
    },
}

/// Events handled by the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    TabSelected(Tab),
    SearchSubmitted(String),
    /// Load the next catalog page (browse mode only)
    MoreShows,
    /// Re-run the current query; page 0 when browsing
    Refresh,
    DetailRequested(ShowId),
    DetailClosed,
    FavoriteToggled(ShowSummary),
    /// Writing the favorites failed
    PersistFailed(String),
    FetchCompleted(Completion),
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    None,
    Fetch(FetchRequest),
    /// The favorites changed and should be written to storage
    PersistFavorites,
}

/// Snapshot of everything the presentation layer renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub active_tab: Tab,
    pub search_term: String,
    /// Last catalog page merged into `shows` while browsing
    pub page: u32,
    /// True while a search or page listing is in flight
    pub loading: bool,
    pub error: Option<String>,
    pub selected_detail: Option<ShowDetail>,
    /// Shows listed in the Search tab
    pub shows: Vec<ShowSummary>,
}

/// The in-flight search or listing. `page` is None for a search.
#[derive(Debug, Clone, Copy)]
struct PendingList {
    id: RequestId,
    page: Option<u32>,
}

pub struct ViewController {
    state: ViewState,
    favorites: Vec<ShowSummary>,
    next_request: u64,
    /// Last page merged into the list; None until page 0 has loaded
    loaded_page: Option<u32>,
    pending_list: Option<PendingList>,
    pending_detail: Option<RequestId>,
}

impl ViewController {
    /// Creates a controller in the initial state with already loaded favorites.
    pub fn new(favorites: Vec<ShowSummary>) -> Self {
        Self {
            state: ViewState::default(),
            favorites,
            next_request: 0,
            loaded_page: None,
            pending_list: None,
            pending_detail: None,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn favorites(&self) -> &[ShowSummary] {
        &self.favorites
    }

    pub fn is_favorite(&self, id: ShowId) -> bool {
        favorites::is_favorite(&self.favorites, id)
    }

    /// Shows of the active tab.
    pub fn displayed_shows(&self) -> &[ShowSummary] {
        match self.state.active_tab {
            Tab::Search => &self.state.shows,
            Tab::Favorites => &self.favorites,
        }
    }

    /// Whether another catalog page can be requested.
    pub fn can_load_more(&self) -> bool {
        self.state.active_tab == Tab::Search && self.state.search_term.is_empty()
    }

    pub fn update(&mut self, message: Message) -> Action {
        match message {
            Message::TabSelected(tab) => {
                self.state.active_tab = tab;
                Action::None
            }
            Message::SearchSubmitted(term) => self.submit_search(term.trim()),
            Message::MoreShows => {
                if !self.can_load_more() {
                    tracing::debug!("more shows ignored outside browse mode");
                    return Action::None;
                }
                let next = self.loaded_page.map_or(0, |page| page.saturating_add(1));
                self.request_page(next)
            }
            Message::Refresh => {
                if self.state.active_tab != Tab::Search {
                    return Action::None;
                }
                if self.state.search_term.is_empty() {
                    self.request_page(0)
                } else {
                    self.request_search()
                }
            }
            Message::DetailRequested(show_id) => {
                let id = self.next_id();
                self.state.error = None;
                self.pending_detail = Some(id);
                Action::Fetch(FetchRequest::Detail { id, show_id })
            }
            Message::DetailClosed => {
                self.state.selected_detail = None;
                self.pending_detail = None;
                Action::None
            }
            Message::FavoriteToggled(show) => {
                self.favorites = favorites::toggle(&self.favorites, &show);
                Action::PersistFavorites
            }
            Message::PersistFailed(reason) => {
                self.state.error = Some(reason);
                Action::None
            }
            Message::FetchCompleted(completion) => {
                self.complete(completion);
                Action::None
            }
        }
    }

    fn submit_search(&mut self, term: &str) -> Action {
        if self.state.active_tab != Tab::Search {
            return Action::None;
        }
        // An unchanged term is only re-run after a failure
        if term == self.state.search_term && self.state.error.is_none() {
            return Action::None;
        }

        self.state.search_term = term.to_string();
        if term.is_empty() {
            self.request_page(0)
        } else {
            self.request_search()
        }
    }

    fn request_search(&mut self) -> Action {
        let id = self.begin_list(None);
        Action::Fetch(FetchRequest::Search {
            id,
            term: self.state.search_term.clone(),
        })
    }

    fn request_page(&mut self, page: u32) -> Action {
        let id = self.begin_list(Some(page));
        Action::Fetch(FetchRequest::ListPage { id, page })
    }

    /// Starts a list request, superseding any list request still in flight.
    fn begin_list(&mut self, page: Option<u32>) -> RequestId {
        let id = self.next_id();
        if let Some(stale) = self.pending_list.replace(PendingList { id, page }) {
            tracing::debug!(stale = stale.id.0, "superseding in-flight list request");
        }
        self.state.loading = true;
        self.state.error = None;
        id
    }

    fn next_id(&mut self) -> RequestId {
        self.next_request += 1;
        RequestId(self.next_request)
    }

    fn complete(&mut self, completion: Completion) {
        match completion {
            Completion::Shows { id, outcome } => {
                let pending = match self.pending_list {
                    Some(pending) if pending.id == id => pending,
                    _ => {
                        tracing::debug!(request = id.0, "discarding stale list response");
                        return;
                    }
                };
                self.pending_list = None;
                self.state.loading = false;

                match (outcome, pending.page) {
                    (Ok(shows), Some(page)) => {
                        if page > 0 {
                            self.state.shows.extend(shows);
                        } else {
                            self.state.shows = shows;
                        }
                        self.state.page = page;
                        self.loaded_page = Some(page);
                    }
                    (Ok(shows), None) => {
                        self.state.shows = shows;
                        self.loaded_page = None;
                    }
                    (Err(e), _) => self.state.error = Some(e.to_string()),
                }
            }
            Completion::Detail { id, outcome } => {
                if self.pending_detail != Some(id) {
                    tracing::debug!(request = id.0, "discarding stale detail response");
                    return;
                }
                self.pending_detail = None;

                match outcome {
                    Ok(detail) => self.state.selected_detail = Some(detail),
                    Err(e) => self.state.error = Some(e.to_string()),
                }
            }
        }
    }
}
