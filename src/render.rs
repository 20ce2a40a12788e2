//! Plain-text rendering of the view state
//!
//! Every function here is a pure mapping from records to display text; the
//! binary decides where the text goes.

use crate::catalog::{ShowDetail, ShowSummary};
use crate::controller::Tab;
use crate::favorites::is_favorite;

const FAVORITE_MARK: &str = "★";
const NOT_FAVORITE_MARK: &str = "☆";

/// Converts an HTML summary fragment to plain text.
pub fn summary_text(html: &str) -> String {
    nanohtml2text::html2text(html).trim().to_string()
}

/// Tab header, e.g. `"[Search] | Favorites (2)"`.
pub fn tab_bar(active: Tab, favorites_count: usize) -> String {
    let favorites = format!("Favorites ({favorites_count})");
    match active {
        Tab::Search => format!("[Search] | {favorites}"),
        Tab::Favorites => format!("Search | [{favorites}]"),
    }
}

/// One-line card for a show.
pub fn show_card(show: &ShowSummary, favorite: bool) -> String {
    let mark = if favorite { FAVORITE_MARK } else { NOT_FAVORITE_MARK };
    format!(
        "{mark} {} (rating: {}) - {}",
        show.title, show.rating, show.genres
    )
}

/// Numbered list of cards, or the empty-state hint for the tab.
pub fn show_list(shows: &[ShowSummary], favorites: &[ShowSummary], tab: Tab) -> String {
    if shows.is_empty() {
        return match tab {
            Tab::Search => "No shows found. Try a different search".to_string(),
            Tab::Favorites => "No shows found. Add some to your favorites".to_string(),
        };
    }

    let width = shows.len().to_string().len();
    shows
        .iter()
        .enumerate()
        .map(|(index, show)| {
            format!(
                "{:>width$}. {}",
                index + 1,
                show_card(show, is_favorite(favorites, show.id)),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Full detail view.
pub fn show_detail(detail: &ShowDetail, favorite: bool) -> String {
    let show = &detail.show;
    let mark = if favorite { FAVORITE_MARK } else { NOT_FAVORITE_MARK };
    let summary = summary_text(&show.summary);

    let mut text = String::new();
    text.push_str(&format!("{mark} {}\n", show.title));
    text.push_str(&format!("Rating:   {}\n", show.rating));
    text.push_str(&format!("Genres:   {}\n", show.genres));
    text.push_str(&format!("Schedule: {}\n", detail.schedule));
    text.push_str(&format!("Network:  {}\n", detail.network_info));
    text.push_str(&format!("Image:    {}\n", show.image_url));
    if !summary.is_empty() {
        text.push('\n');
        text.push_str(&summary);
        text.push('\n');
    }
    text
}

/// Error line shown above the list.
pub fn error_line(message: &str) -> String {
    format!("Error: {message}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Rating;

    fn show(id: u32, title: &str) -> ShowSummary {
        ShowSummary {
            id,
            title: title.to_string(),
            image_url: "assets/no-img-portrait-text.webp".to_string(),
            rating: Rating::Score(8.8),
            genres: "Drama, Crime".to_string(),
            summary: "<p>A chemistry lesson.</p>".to_string(),
        }
    }

    #[test]
    fn test_summary_text_strips_markup() {
        assert_eq!(summary_text("<p>A chemistry lesson.</p>"), "A chemistry lesson.");
        assert!(!summary_text("<p>Two <b>words</b></p>").contains('<'));
        assert_eq!(summary_text(""), "");
    }

    #[test]
    fn test_tab_bar() {
        assert_eq!(tab_bar(Tab::Search, 2), "[Search] | Favorites (2)");
        assert_eq!(tab_bar(Tab::Favorites, 0), "Search | [Favorites (0)]");
    }

    #[test]
    fn test_show_card() {
        assert_eq!(
            show_card(&show(1, "Breaking Bad"), true),
            "★ Breaking Bad (rating: 8.8) - Drama, Crime"
        );
    }

    #[test]
    fn test_show_list_marks_favorites() {
        let shows = vec![show(1, "Breaking Bad"), show(2, "Better Call Saul")];
        let favorites = vec![show(2, "Better Call Saul")];

        let text = show_list(&shows, &favorites, Tab::Search);
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("1. ☆ Breaking Bad"));
        assert!(lines[1].starts_with("2. ★ Better Call Saul"));
    }

    #[test]
    fn test_show_list_empty_states() {
        assert_eq!(
            show_list(&[], &[], Tab::Search),
            "No shows found. Try a different search"
        );
        assert_eq!(
            show_list(&[], &[], Tab::Favorites),
            "No shows found. Add some to your favorites"
        );
    }

    #[test]
    fn test_show_detail() {
        let detail = ShowDetail {
            show: show(1, "Breaking Bad"),
            schedule: "Sunday at 22:00".to_string(),
            network_info: "AMC".to_string(),
        };

        let text = show_detail(&detail, false);

        assert!(text.starts_with("☆ Breaking Bad\n"));
        assert!(text.contains("Schedule: Sunday at 22:00"));
        assert!(text.contains("Network:  AMC"));
        assert!(text.contains("A chemistry lesson."));
    }
}
