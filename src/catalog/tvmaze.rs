/// TVMaze catalog provider implementation.
use super::tvmaze_types::{TvMazeSchedule, TvMazeSearchHit, TvMazeShow};
use super::{CatalogProvider, FetchError, NOT_AVAILABLE, ShowDetail, ShowId, ShowSummary};
use crate::config::CatalogConfig;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Catalog provider for the TVMaze API.
///
/// This provider fetches show information from https://api.tvmaze.com
/// (or the configured base URL) using the search, paged index and
/// single-show endpoints.
pub struct TvMazeCatalog {
    client: reqwest::blocking::Client,
    base_url: String,
    timeout_secs: u64,
    placeholder_image: String,
}

impl TvMazeCatalog {
    /// Creates a new TVMaze catalog from the given configuration.
    pub fn new(config: &CatalogConfig) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("show-spotter/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Request(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout_secs: config.timeout_secs,
            placeholder_image: config.placeholder_image.clone(),
        })
    }

    /// Issues a GET request and deserializes the JSON body.
    fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, ?query, "catalog request");

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), "catalog request failed");
            return Err(FetchError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response.text().map_err(|e| self.request_error(e))?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::warn!(%url, error = %e, "catalog response did not parse");
            FetchError::Parse(e.to_string())
        })
    }

    fn request_error(&self, error: reqwest::Error) -> FetchError {
        tracing::warn!(error = %error, "catalog transport error");
        if error.is_timeout() {
            FetchError::Timeout(self.timeout_secs)
        } else {
            FetchError::Request(error.to_string())
        }
    }

    /// Converts a TVMaze show to the listing record.
    fn convert_summary(&self, show: TvMazeShow) -> ShowSummary {
        let image_url = show
            .image
            .and_then(|image| image.medium)
            .unwrap_or_else(|| self.placeholder_image.clone());

        ShowSummary {
            id: show.id,
            title: show.name,
            image_url,
            rating: show.rating.and_then(|r| r.average).into(),
            genres: join_genres(&show.genres, ", "),
            summary: show.summary.unwrap_or_default(),
        }
    }

    /// Converts a TVMaze show to the detail record.
    ///
    /// Uses the full-size poster and a `" | "` genre separator.
    fn convert_detail(&self, show: TvMazeShow) -> ShowDetail {
        let image_url = show
            .image
            .and_then(|image| image.original)
            .unwrap_or_else(|| self.placeholder_image.clone());

        ShowDetail {
            show: ShowSummary {
                id: show.id,
                title: show.name,
                image_url,
                rating: show.rating.and_then(|r| r.average).into(),
                genres: join_genres(&show.genres, " | "),
                summary: show.summary.unwrap_or_default(),
            },
            schedule: format_schedule(show.schedule.as_ref()),
            network_info: show
                .network
                .map(|network| network.name)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        }
    }
}

impl CatalogProvider for TvMazeCatalog {
    fn search_by_term(&self, term: &str) -> Result<Vec<ShowSummary>, FetchError> {
        let hits: Vec<TvMazeSearchHit> = self.get_json("/search/shows", &[("q", term)])?;

        Ok(hits
            .into_iter()
            .map(|hit| self.convert_summary(hit.show))
            .collect())
    }

    fn list_by_page(&self, page: u32) -> Result<Vec<ShowSummary>, FetchError> {
        let page = page.to_string();
        let shows: Vec<TvMazeShow> = self.get_json("/shows", &[("page", page.as_str())])?;

        Ok(shows
            .into_iter()
            .map(|show| self.convert_summary(show))
            .collect())
    }

    fn fetch_detail(&self, id: ShowId) -> Result<ShowDetail, FetchError> {
        let show: TvMazeShow = self
            .get_json(&format!("/shows/{id}"), &[])
            .map_err(|e| match e {
                FetchError::Status { status: 404, .. } => FetchError::ShowNotFound(id),
                other => other,
            })?;

        Ok(self.convert_detail(show))
    }
}

/// Joins genres for display, `"N/A"` when the list is empty.
fn join_genres(genres: &[String], separator: &str) -> String {
    if genres.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        genres.join(separator)
    }
}

/// Formats a schedule as `"<days> at <time>"`, days separated by spaces.
///
/// A missing schedule, or one with neither days nor time, is `"N/A"`.
fn format_schedule(schedule: Option<&TvMazeSchedule>) -> String {
    match schedule {
        Some(schedule) if !schedule.days.is_empty() || !schedule.time.is_empty() => {
            format!("{} at {}", schedule.days.join(" "), schedule.time)
        }
        _ => NOT_AVAILABLE.to_string(),
    }
}
