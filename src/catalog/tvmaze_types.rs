/// TVMaze API response types for deserialization.
///
/// These structures mirror the JSON response format from the TVMaze API.
/// Only the fields the application displays are modelled.
use serde::Deserialize;

/// One hit from the `/search/shows` endpoint.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeSearchHit {
    pub show: TvMazeShow,
}

/// A show as returned by `/shows`, `/shows/:id` and inside search hits.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeShow {
    pub id: u32,
    pub name: String,
    /// Poster URLs (null when the show has no poster)
    pub image: Option<TvMazeImage>,
    pub rating: Option<TvMazeRating>,
    #[serde(default)]
    pub genres: Vec<String>,
    /// Summary in HTML format (may be null)
    pub summary: Option<String>,
    pub schedule: Option<TvMazeSchedule>,
    pub network: Option<TvMazeNetwork>,
}

#[derive(Debug, Deserialize)]
pub(super) struct TvMazeImage {
    pub medium: Option<String>,
    pub original: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct TvMazeRating {
    pub average: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(super) struct TvMazeSchedule {
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub days: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct TvMazeNetwork {
    pub name: String,
}
