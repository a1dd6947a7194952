use serde::{Deserialize, Serialize};
use time::{macros::format_description, Date};

use crate::utils::pagination::PageWindow;

/// Descriptions longer than this are cut for display.
pub const DESCRIPTION_EXCERPT_CHARS: usize = 300;
/// Categories shown on a result card.
pub const HEADLINE_CATEGORIES: usize = 3;

/// A book built from one catalog search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Catalog identifier of the book
    pub id: String,
    /// Title of the book
    pub title: String,
    /// Authors in catalog order
    pub authors: Vec<String>,
    /// Publication date as reported by the catalog; may be empty
    pub published_date: String,
    /// Description; may be empty
    pub description: String,
    /// Cover thumbnail URL
    pub image_url: Option<String>,
    pub isbn: Option<String>,
    pub page_count: Option<u32>,
    /// Category labels in catalog order
    pub categories: Vec<String>,
}

impl Book {
    /// Authors joined for display, e.g. `Author Two, Author Three`.
    pub fn authors_line(&self) -> String {
        self.authors.join(", ")
    }

    /// Year of publication taken from the leading `YYYY` of the date.
    pub fn published_year(&self) -> Option<i32> {
        let year = self.published_date.get(..4)?;
        if !year.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        year.parse().ok()
    }

    /// Full publication date as `DD/MM/YYYY`; `None` unless the catalog
    /// reports a complete `YYYY-MM-DD` date.
    pub fn published_on(&self) -> Option<String> {
        let date = self.published_date.get(..10)?;
        let date = Date::parse(date, format_description!("[year]-[month]-[day]")).ok()?;
        date.format(format_description!("[day]/[month]/[year]")).ok()
    }

    /// The first few categories, for compact listings.
    pub fn headline_categories(&self) -> &[String] {
        let shown = self.categories.len().min(HEADLINE_CATEGORIES);
        &self.categories[..shown]
    }

    /// Description cut to [`DESCRIPTION_EXCERPT_CHARS`] characters plus `...`.
    pub fn description_excerpt(&self) -> String {
        match self.description.char_indices().nth(DESCRIPTION_EXCERPT_CHARS) {
            Some((cut, _)) => format!("{}...", &self.description[..cut]),
            None => self.description.clone(),
        }
    }
}

/// A book as listed in search results.
#[derive(Debug, Clone, Serialize)]
pub struct BookCard {
    pub id: String,
    pub title: String,
    pub authors_line: String,
    pub published_year: Option<i32>,
    pub categories: Vec<String>,
    pub image_url: Option<String>,
}

impl From<&Book> for BookCard {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id.clone(),
            title: book.title.clone(),
            authors_line: book.authors_line(),
            published_year: book.published_year(),
            categories: book.headline_categories().to_vec(),
            image_url: book.image_url.clone(),
        }
    }
}

/// Full details of one book.
#[derive(Debug, Clone, Serialize)]
pub struct BookDetail {
    #[serde(flatten)]
    pub book: Book,
    pub authors_line: String,
    pub published_year: Option<i32>,
    pub published_on: Option<String>,
    pub description_excerpt: String,
}

impl From<Book> for BookDetail {
    fn from(book: Book) -> Self {
        Self {
            authors_line: book.authors_line(),
            published_year: book.published_year(),
            published_on: book.published_on(),
            description_excerpt: book.description_excerpt(),
            book,
        }
    }
}

/// One page of search results.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResults {
    pub query: String,
    pub page: u32,
    pub total_items: u64,
    pub books: Vec<BookCard>,
    /// Page controls; absent when everything fits on one page
    pub pagination: Option<PageWindow>,
}

/// Books returned by the catalog for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogPage {
    pub total_items: u64,
    pub books: Vec<Book>,
}

/// Volume list response of the catalog API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumesResponse {
    #[serde(default)]
    pub total_items: u64,
    #[serde(default)]
    pub items: Option<Vec<Volume>>,
}

impl From<VolumesResponse> for CatalogPage {
    fn from(response: VolumesResponse) -> Self {
        Self {
            total_items: response.total_items,
            books: response
                .items
                .unwrap_or_default()
                .into_iter()
                .map(Book::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    pub id: String,
    pub volume_info: VolumeInfo,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInfo {
    #[serde(default)]
    pub title: String,
    pub authors: Option<Vec<String>>,
    pub published_date: Option<String>,
    pub description: Option<String>,
    pub image_links: Option<ImageLinks>,
    pub industry_identifiers: Option<Vec<IndustryIdentifier>>,
    pub page_count: Option<u32>,
    pub categories: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLinks {
    pub thumbnail: Option<String>,
    pub small_thumbnail: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IndustryIdentifier {
    #[serde(rename = "type", default)]
    pub kind: String,
    pub identifier: String,
}

/// ISBN-13 if present, then ISBN-10, then whatever identifier comes first.
fn pick_isbn(identifiers: &[IndustryIdentifier]) -> Option<String> {
    ["ISBN_13", "ISBN_10"]
        .iter()
        .find_map(|kind| identifiers.iter().find(|id| id.kind == *kind))
        .or_else(|| identifiers.first())
        .map(|id| id.identifier.clone())
}

impl From<Volume> for Book {
    fn from(volume: Volume) -> Self {
        let info = volume.volume_info;
        let image_url = info
            .image_links
            .and_then(|links| links.thumbnail.or(links.small_thumbnail));

        Self {
            id: volume.id,
            title: info.title,
            authors: info.authors.unwrap_or_default(),
            published_date: info.published_date.unwrap_or_default(),
            description: info.description.unwrap_or_default(),
            image_url,
            isbn: info.industry_identifiers.as_deref().and_then(pick_isbn),
            page_count: info.page_count,
            categories: info.categories.unwrap_or_default(),
        }
    }
}
