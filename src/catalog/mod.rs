//! Show catalog retrieval
//!
//! This module provides the display records for TV shows (summaries for
//! listings, details for the single-show view) and the trait implemented by
//! catalog providers.
mod tvmaze;
mod tvmaze_types;

pub use tvmaze::TvMazeCatalog;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Server-assigned show identifier.
pub type ShowId = u32;

/// Text shown in place of any missing field.
pub const NOT_AVAILABLE: &str = "N/A";

/// Errors that can occur while talking to the show catalog.
///
/// The `Display` output is the message shown to the user when a fetch fails.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    /// The request could not be sent or the connection failed
    #[error("Request failed: {0}")]
    Request(String),

    /// The catalog did not answer within the configured timeout
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// The catalog answered with a non-success status
    #[error("Catalog returned HTTP {status} {reason}")]
    Status { status: u16, reason: String },

    /// The requested show does not exist
    #[error("Show not found: {0}")]
    ShowNotFound(ShowId),

    /// The response body did not have the expected shape
    #[error("Failed to parse catalog response: {0}")]
    Parse(String),
}

/// Average audience rating of a show.
///
/// Stored as a JSON number, or as the string `"N/A"` when the catalog has
/// no rating for the show. Any stored string or null reads back as
/// `NotAvailable`, including numeric strings such as `"8.5"`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Rating {
    Score(f64),
    #[default]
    NotAvailable,
}

impl From<Option<f64>> for Rating {
    fn from(average: Option<f64>) -> Self {
        average.map_or(Rating::NotAvailable, Rating::Score)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rating::Score(score) => write!(f, "{score}"),
            Rating::NotAvailable => f.write_str(NOT_AVAILABLE),
        }
    }
}

impl Serialize for Rating {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Rating::Score(score) => serializer.serialize_f64(*score),
            Rating::NotAvailable => serializer.serialize_str(NOT_AVAILABLE),
        }
    }
}

impl<'de> Deserialize<'de> for Rating {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Score(f64),
            Text(serde::de::IgnoredAny),
            Null(()),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Score(score) => Rating::Score(score),
            Raw::Text(_) | Raw::Null(()) => Rating::NotAvailable,
        })
    }
}

/// Lightweight display record for a catalog listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowSummary {
    /// Unique, server-assigned identifier
    pub id: ShowId,
    /// The show's name
    pub title: String,
    /// Poster URL, or the placeholder image when the catalog has none
    #[serde(alias = "image")]
    pub image_url: String,
    pub rating: Rating,
    /// Genres joined for display, `"N/A"` when there are none
    pub genres: String,
    /// Summary as an HTML fragment
    #[serde(default)]
    pub summary: String,
}

/// Extended display record for the single-show view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowDetail {
    /// The summary fields (poster in full size, genres joined with `" | "`)
    #[serde(flatten)]
    pub show: ShowSummary,
    /// Air days and time, e.g. `"Monday at 20:00"`
    pub schedule: String,
    /// Name of the broadcasting network
    pub network_info: String,
}

/// Trait for catalogs that can look up TV shows.
///
/// All operations are single-shot: no caching and no retry. A failure is
/// returned to the caller immediately.
pub trait CatalogProvider {
    /// Searches shows whose name matches `term`.
    fn search_by_term(&self, term: &str) -> Result<Vec<ShowSummary>, FetchError>;

    /// Lists one page of the full catalog. Pages start at 0.
    fn list_by_page(&self, page: u32) -> Result<Vec<ShowSummary>, FetchError>;

    /// Fetches the detail record for a single show.
    fn fetch_detail(&self, id: ShowId) -> Result<ShowDetail, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_serializes_as_number_or_not_available() {
        assert_eq!(serde_json::to_string(&Rating::Score(8.5)).unwrap(), "8.5");
        assert_eq!(
            serde_json::to_string(&Rating::NotAvailable).unwrap(),
            "\"N/A\""
        );
    }

    #[test]
    fn test_rating_deserializes_stored_forms() {
        let score: Rating = serde_json::from_str("7").unwrap();
        assert_eq!(score, Rating::Score(7.0));

        let missing: Rating = serde_json::from_str("\"N/A\"").unwrap();
        assert_eq!(missing, Rating::NotAvailable);

        let null: Rating = serde_json::from_str("null").unwrap();
        assert_eq!(null, Rating::NotAvailable);

        let numeric_text: Rating = serde_json::from_str("\"8.5\"").unwrap();
        assert_eq!(numeric_text, Rating::NotAvailable);
    }

    #[test]
    fn test_rating_display() {
        assert_eq!(Rating::Score(6.5).to_string(), "6.5");
        assert_eq!(Rating::NotAvailable.to_string(), "N/A");
    }

    #[test]
    fn test_detail_serializes_flat() {
        let detail = ShowDetail {
            show: ShowSummary {
                id: 1,
                title: "Under the Dome".to_string(),
                image_url: "https://example.org/1.jpg".to_string(),
                rating: Rating::Score(6.5),
                genres: "Drama | Science-Fiction".to_string(),
                summary: "<p>Dome.</p>".to_string(),
            },
            schedule: "Thursday at 22:00".to_string(),
            network_info: "CBS".to_string(),
        };

        let value = serde_json::to_value(&detail).unwrap();
        assert_eq!(value["id"], 1);
        assert_eq!(value["imageUrl"], "https://example.org/1.jpg");
        assert_eq!(value["networkInfo"], "CBS");
        assert_eq!(value["schedule"], "Thursday at 22:00");
    }
}
