//! Search result envelope returned by the `bsky_search` tool

use crate::bluesky::records::PostView;
use serde::Serialize;
use std::fmt;

/// A single post reduced to author handle and text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    pub handle: String,
    pub text: String,
}

impl From<PostView> for Post {
    fn from(view: PostView) -> Self {
        Self {
            handle: view.handle,
            text: view.text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStatus {
    Success,
    Error,
}

/// Outcome of one search call
///
/// Built only through [`SearchResult::success`] and [`SearchResult::failure`]:
/// a success always has `total_results == results.len()`, a failure always has
/// no results, a zero total and a non-empty error message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    status: SearchStatus,
    query: String,
    results: Vec<Post>,
    total_results: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl SearchResult {
    pub fn success(query: impl Into<String>, results: Vec<Post>) -> Self {
        Self {
            status: SearchStatus::Success,
            query: query.into(),
            total_results: results.len(),
            results,
            error: None,
        }
    }

    pub fn failure(query: impl Into<String>, message: impl Into<String>) -> Self {
        let mut message = message.into();
        if message.trim().is_empty() {
            message = "unknown error".to_string();
        }
        Self {
            status: SearchStatus::Error,
            query: query.into(),
            results: Vec::new(),
            total_results: 0,
            error: Some(message),
        }
    }

    pub fn status(&self) -> SearchStatus {
        self.status
    }

    pub fn is_error(&self) -> bool {
        self.status == SearchStatus::Error
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[Post] {
        &self.results
    }

    pub fn total_results(&self) -> usize {
        self.total_results
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(error) = &self.error {
            return write!(f, "Error: {}", error);
        }

        write!(f, "BlueSky search results for '{}':", self.query)?;
        for (i, post) in self.results.iter().enumerate() {
            write!(f, "\n\n{}. @{}: {}", i + 1, post.handle, post.text)?;
        }
        write!(f, "\n\nTotal results: {}", self.total_results)
    }
}
