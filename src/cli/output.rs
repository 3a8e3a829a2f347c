//! CLI output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use crate::store::Review;

/// Longest review text shown in a table cell
const PREVIEW_CHARS: usize = 60;

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Print a warning message
pub fn warn(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

/// Shorten review text for table display
pub fn preview(text: &str) -> String {
    if text.chars().count() <= PREVIEW_CHARS {
        return text.to_string();
    }
    let truncated: String = text.chars().take(PREVIEW_CHARS - 1).collect();
    format!("{}…", truncated)
}

/// Build a table of reviews
pub fn review_table(reviews: &[Review]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").fg(Color::Cyan),
            Cell::new("User").fg(Color::Cyan),
            Cell::new("Song").fg(Color::Cyan),
            Cell::new("Artist").fg(Color::Cyan),
            Cell::new("Review").fg(Color::Cyan),
            Cell::new("Created").fg(Color::Cyan),
        ]);

    for review in reviews {
        table.add_row(vec![
            Cell::new(review.id),
            Cell::new(&review.username),
            Cell::new(&review.song_name).fg(Color::Green),
            Cell::new(&review.artist_name),
            Cell::new(preview(&review.review_text)),
            Cell::new(review.date_time.format("%Y-%m-%d %H:%M").to_string()),
        ]);
    }

    table
}

/// Print a table of reviews
pub fn print_review_table(reviews: &[Review]) {
    if reviews.is_empty() {
        info("No reviews found");
        return;
    }

    println!("{}", review_table(reviews));
}
