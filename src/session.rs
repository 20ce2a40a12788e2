//! Application session
//!
//! The session wires the view controller to its collaborators: it loads the
//! favorites before anything else happens, runs the catalog requests the
//! controller asks for, and writes the favorites whenever they change.

use crate::catalog::{CatalogProvider, ShowId, ShowSummary};
use crate::controller::{Action, Completion, FetchRequest, Message, ViewController, ViewState};
use crate::favorites::FavoritesStore;
use crate::storage::Storage;

pub struct Session<P, S> {
    controller: ViewController,
    catalog: P,
    favorites: FavoritesStore<S>,
}

impl<P, S> Session<P, S>
where
    P: CatalogProvider,
    S: Storage,
{
    /// Creates a session, loading the stored favorites.
    ///
    /// No catalog request is made; dispatch `Message::Refresh` for the
    /// initial listing.
    pub fn new(catalog: P, mut favorites: FavoritesStore<S>) -> Self {
        let loaded = favorites.load();
        tracing::debug!(count = loaded.len(), "favorites loaded");

        Self {
            controller: ViewController::new(loaded),
            catalog,
            favorites,
        }
    }

    /// Handles a message and runs every action it leads to.
    pub fn dispatch(&mut self, message: Message) {
        let mut action = self.controller.update(message);

        loop {
            action = match action {
                Action::None => return,
                Action::Fetch(request) => {
                    let completion = self.execute(request);
                    self.controller.update(Message::FetchCompleted(completion))
                }
                Action::PersistFavorites => {
                    match self.favorites.persist(self.controller.favorites()) {
                        Ok(()) => Action::None,
                        Err(e) => {
                            tracing::warn!(error = %e, "failed to save favorites");
                            let reason = format!("Could not save favorites: {e}");
                            self.controller.update(Message::PersistFailed(reason))
                        }
                    }
                }
            };
        }
    }

    /// Runs a catalog request to completion.
    fn execute(&self, request: FetchRequest) -> Completion {
        match request {
            FetchRequest::Search { id, term } => Completion::Shows {
                id,
                outcome: self.catalog.search_by_term(&term),
            },
            FetchRequest::ListPage { id, page } => Completion::Shows {
                id,
                outcome: self.catalog.list_by_page(page),
            },
            FetchRequest::Detail { id, show_id } => Completion::Detail {
                id,
                outcome: self.catalog.fetch_detail(show_id),
            },
        }
    }

    pub fn state(&self) -> &ViewState {
        self.controller.state()
    }

    pub fn favorites(&self) -> &[ShowSummary] {
        self.controller.favorites()
    }

    pub fn is_favorite(&self, id: ShowId) -> bool {
        self.controller.is_favorite(id)
    }

    /// Shows of the active tab.
    pub fn displayed_shows(&self) -> &[ShowSummary] {
        self.controller.displayed_shows()
    }

    pub fn can_load_more(&self) -> bool {
        self.controller.can_load_more()
    }

    /// The catalog this session fetches from.
    pub fn catalog(&self) -> &P {
        &self.catalog
    }
}
