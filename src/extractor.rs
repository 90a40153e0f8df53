//! Extraction of structured results from search page markup.
//!
//! One strategy per search type: repository pages carry owner and
//! language information, issue and wiki pages only result-title links.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::query::{SearchType, GITHUB_HOST};
use crate::{CrawlError, Result, SearchResult};

/// Result-title anchors on issue and wiki search pages.
const TITLE_LINK_SELECTOR: &str = ".f4.text-normal a";
/// One list item per repository on repository search pages.
const REPO_ITEM_SELECTOR: &str = ".repo-list-item";
/// The owner/name anchor inside a repository list item.
const REPO_LINK_SELECTOR: &str = "a.v-align-middle";
/// The primary-language label inside a repository list item.
const LANGUAGE_SELECTOR: &str = r#"span[itemprop="programmingLanguage"]"#;

/// Extracts search results from a results page.
///
/// Results come back in document order, without deduplication. Elements
/// missing required sub-parts (an href, or the owner/name anchor of a
/// repository item) are skipped rather than reported as errors.
pub fn extract_results(html: &str, search_type: SearchType) -> Result<Vec<SearchResult>> {
    let document = Html::parse_document(html);

    match search_type {
        SearchType::Repositories => parse_repositories(&document),
        SearchType::Issues | SearchType::Wikis => parse_title_links(&document),
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| CrawlError::Parse(format!("failed to parse selector {css:?}: {e:?}")))
}

/// Issues and wikis share the result-title anchor layout.
fn parse_title_links(document: &Html) -> Result<Vec<SearchResult>> {
    let anchor_selector = selector(TITLE_LINK_SELECTOR)?;

    let mut results = Vec::new();
    for anchor in document.select(&anchor_selector) {
        if let Some(href) = anchor.value().attr("href") {
            results.push(SearchResult::new(format!("{GITHUB_HOST}{href}")));
        }
    }

    Ok(results)
}

fn parse_repositories(document: &Html) -> Result<Vec<SearchResult>> {
    let item_selector = selector(REPO_ITEM_SELECTOR)?;
    let link_selector = selector(REPO_LINK_SELECTOR)?;
    let language_selector = selector(LANGUAGE_SELECTOR)?;

    let mut results = Vec::new();
    for item in document.select(&item_selector) {
        let Some(anchor) = item.select(&link_selector).next() else {
            continue;
        };
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Some(owner) = owner_from_href(href) else {
            debug!("skipping repository item with unexpected href {href:?}");
            continue;
        };

        let language = item.select(&language_selector).next().map(element_text);

        results.push(
            SearchResult::new(format!("{GITHUB_HOST}{href}"))
                .with_owner(owner)
                .with_language(language),
        );
    }

    Ok(results)
}

/// Returns the owner segment of an `/owner/repo` href.
///
/// Hrefs without that shape (no leading slash, empty owner, or missing
/// repository segment) yield `None` and the item is skipped.
fn owner_from_href(href: &str) -> Option<&str> {
    let mut segments = href.strip_prefix('/')?.split('/');
    let owner = segments.next().filter(|segment| !segment.is_empty())?;
    segments.next().filter(|segment| !segment.is_empty())?;
    Some(owner)
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
