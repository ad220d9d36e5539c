//! HTML field extraction
//!
//! Converts a fetched page body into [`PageContent`]. Parsing is permissive:
//! missing fields yield empty values, never errors. No network access
//! happens here, and there is no shared state, so any number of workers can
//! parse concurrently.

use crate::model::{Headings, PageContent};
use scraper::{Html, Selector};
use thiserror::Error;

/// Errors from the parser's own failure domain
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid selector '{0}'")]
    Selector(String),
}

/// Extracts the structured fields from one page.
///
/// * title - text of the first `<title>` element, trimmed
/// * description - `content` attribute of `<meta name="description">`
/// * headings - H1 and H2 text in document order
/// * link count - total number of `<a>` elements
pub fn parse_page(url: &str, html: &str) -> Result<PageContent, ParseError> {
    let document = Html::parse_document(html);

    let title_selector = create_selector("title")?;
    let title = document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .unwrap_or_default();

    let meta_selector = create_selector(r#"meta[name="description"]"#)?;
    let description = document
        .select(&meta_selector)
        .next()
        .and_then(|element| element.value().attr("content"))
        .unwrap_or_default()
        .to_string();

    let headings = Headings {
        h1: collect_heading_text(&document, "h1")?,
        h2: collect_heading_text(&document, "h2")?,
    };

    let anchor_selector = create_selector("a")?;
    let link_count = document.select(&anchor_selector).count();

    tracing::trace!(url, links = link_count, "parsed page");

    Ok(PageContent {
        title,
        description,
        headings,
        link_count,
    })
}

/// Collects the text of every matching heading in document order
fn collect_heading_text(document: &Html, tag: &str) -> Result<Vec<String>, ParseError> {
    let selector = create_selector(tag)?;
    Ok(document
        .select(&selector)
        .map(|element| element.text().collect::<String>().trim().to_string())
        .collect())
}

#[inline]
fn create_selector(raw: &str) -> Result<Selector, ParseError> {
    Selector::parse(raw).map_err(|_| ParseError::Selector(raw.to_string()))
}
