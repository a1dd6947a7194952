use anyhow::Context;
use clap::{Parser, Subcommand};

use libris_app::modules::books::catalog::{GoogleBooksClient, VolumeSource};
use libris_app::modules::books::models::BookCard;
use libris_app::modules::reviews::ranking::star_glyphs;
use libris_app::utils::pagination::{compute_page_window, PageEntry, PageWindow, PaginationState};
use libris_kernel::settings::Settings;

#[derive(Debug, Parser)]
#[command(name = "libris", version, about = "Book search and review service")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve,

    /// Search the book catalog and print one page of results
    Search {
        /// Free-text query
        query: String,

        /// Page to show (1-indexed)
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },

    /// Print the page controls for a result set
    Pages {
        /// Total number of items
        #[arg(long, allow_negative_numbers = true)]
        total: i64,

        /// Items shown per page
        #[arg(long, default_value_t = 20, allow_negative_numbers = true)]
        per_page: i64,

        /// Current page (1-indexed)
        #[arg(long, default_value_t = 1)]
        page: u32,
    },

    /// Print the star glyphs for a rating
    Stars {
        /// Rating between 0 and 5
        #[arg(value_parser = clap::value_parser!(u8).range(0..=5))]
        rating: u8,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => {
            let settings = load_settings()?;
            libris_telemetry::init(&settings.telemetry)?;
            tracing::info!(env = ?settings.environment, "libris serve starting");
            libris_app::serve(settings).await
        }
        Command::Search { query, page } => {
            let settings = load_settings()?;
            libris_telemetry::init(&settings.telemetry)?;
            search(&settings, &query, page).await
        }
        Command::Pages {
            total,
            per_page,
            page,
        } => {
            println!("{}", render_window(compute_page_window(page, total, per_page)));
            Ok(())
        }
        Command::Stars { rating } => {
            println!("{}", star_glyphs(rating));
            Ok(())
        }
    }
}

fn load_settings() -> anyhow::Result<Settings> {
    Settings::load().with_context(|| "failed to load LIBRIS settings")
}

async fn search(settings: &Settings, query: &str, page: u32) -> anyhow::Result<()> {
    let client = GoogleBooksClient::new(&settings.catalog).context("failed to build catalog client")?;
    let per_page = settings.catalog.page_size();
    let state = PaginationState::new(page.max(1), 0, i64::from(per_page));

    let results = client
        .search(query, state.start_index(), per_page)
        .await
        .with_context(|| format!("search for '{}' failed", query))?;

    if results.books.is_empty() {
        println!("No books found for '{}'", query);
        return Ok(());
    }

    for book in &results.books {
        let card = BookCard::from(book);
        let year = card
            .published_year
            .map(|year| format!(" ({})", year))
            .unwrap_or_default();
        println!("{:<14} {}{}", card.id, card.title, year);
        if !card.authors_line.is_empty() {
            println!("{:<14} by {}", "", card.authors_line);
        }
    }

    let total_items = i64::try_from(results.total_items).unwrap_or(i64::MAX);
    let served = PaginationState::new(state.current_page, total_items, i64::from(per_page));
    println!();
    println!("{}", render_window(served.window()));
    Ok(())
}

/// One-line rendering of the page controls, e.g. `< 1 … 3 4 [5] 6 7 … 25 >`.
/// Disabled arrows are replaced with `-`.
fn render_window(window: Option<PageWindow>) -> String {
    let Some(window) = window else {
        return "single page".to_string();
    };

    let mut parts = Vec::with_capacity(window.entries.len() + 2);
    parts.push(if window.has_previous { "<" } else { "-" }.to_string());
    for entry in &window.entries {
        parts.push(match entry {
            PageEntry::Page(page) if *page == window.current_page => format!("[{}]", page),
            PageEntry::Page(page) => page.to_string(),
            PageEntry::Ellipsis => "…".to_string(),
        });
    }
    parts.push(if window.has_next { ">" } else { "-" }.to_string());
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn renders_both_ellipses() {
        assert_eq!(
            render_window(compute_page_window(12, 500, 20)),
            "< 1 … 10 11 [12] 13 14 … 25 >"
        );
    }

    #[test]
    fn renders_disabled_boundaries() {
        assert_eq!(render_window(compute_page_window(1, 100, 20)), "- [1] 2 3 4 5 >");
        assert_eq!(render_window(compute_page_window(5, 100, 20)), "< 1 2 3 4 [5] -");
    }

    #[test]
    fn renders_single_page() {
        assert_eq!(render_window(compute_page_window(1, 10, 20)), "single page");
    }
}
