//! Site search over the precomputed JSON index.
//!
//! The index is a JSON array of `{title, url, content}` records produced when
//! the portal is published. Matching is a case-insensitive substring test on
//! the title or the content.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::render::push_line;

/// Characters of content shown under each hit.
const SNIPPET_CHARS: usize = 150;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchEntry {
    pub title: String,
    /// Site-relative page path, e.g. `index.html` or `pages/betha.html`.
    pub url: String,
    pub content: String,
}

#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    entries: Vec<SearchEntry>,
}

impl SearchIndex {
    pub fn new(entries: Vec<SearchEntry>) -> Self {
        Self { entries }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read search index: {}", path.display()))?;

        let index = Self::from_json(&contents)
            .with_context(|| format!("Failed to parse search index: {}", path.display()))?;

        debug!(path = %path.display(), entries = index.len(), "search index loaded");
        Ok(index)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<SearchEntry> = serde_json::from_str(json)?;
        Ok(Self::new(entries))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries whose title or content contains `term`, in index order.
    ///
    /// `None` when the trimmed term is empty, i.e. no search was asked for.
    pub fn search(&self, term: &str) -> Option<Vec<&SearchEntry>> {
        let query = term.trim().to_lowercase();
        if query.is_empty() {
            return None;
        }

        let hits = self
            .entries
            .iter()
            .filter(|entry| {
                entry.title.to_lowercase().contains(&query)
                    || entry.content.to_lowercase().contains(&query)
            })
            .collect();

        Some(hits)
    }
}

/// A result ready to display from the results page under `pages/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub title: String,
    pub href: String,
    pub snippet: String,
}

impl SearchHit {
    pub fn from_entry(entry: &SearchEntry) -> Self {
        Self {
            title: entry.title.clone(),
            href: results_page_href(&entry.url),
            snippet: snippet(&entry.content),
        }
    }
}

/// Rewrites a site-relative url so it resolves from inside `pages/`.
pub fn results_page_href(url: &str) -> String {
    if url == "index.html" {
        format!("../{url}")
    } else if let Some(rest) = url.strip_prefix("pages/") {
        rest.to_string()
    } else {
        url.to_string()
    }
}

fn snippet(content: &str) -> String {
    let head: String = content.chars().take(SNIPPET_CHARS).collect();
    format!("{head}...")
}

pub fn render_results(term: &str, hits: &[SearchHit]) -> String {
    let mut out = String::new();
    push_line(&mut out, format!("Results for: \"{}\"", term.trim()));
    push_line(&mut out, "");

    if hits.is_empty() {
        push_line(&mut out, "No results found. Try different terms.");
        return out;
    }

    for hit in hits {
        push_line(&mut out, &hit.title);
        push_line(&mut out, format!("  {}", hit.href));
        push_line(&mut out, format!("  {}", hit.snippet));
        push_line(&mut out, "");
    }

    out
}

pub fn render_no_term() -> String {
    "No search term provided.\n".to_string()
}
