use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel filter value meaning "every category"
pub const ALL_CATEGORIES: &str = "all";

/// A single quote. No id: two quotes with the same text and category are
/// simply two entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quote {
    pub text: String,
    pub category: String,
}

impl Quote {
    pub fn new(text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: category.into(),
        }
    }

    /// Both fields non-empty after trimming
    pub fn is_complete(&self) -> bool {
        !self.text.trim().is_empty() && !self.category.trim().is_empty()
    }
}

impl std::fmt::Display for Quote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\" ({})", self.text, self.category)
    }
}

/// Which quotes the user wants to see
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Category(String),
}

impl CategoryFilter {
    /// `"all"` (or an empty string) means no filter; anything else is a category
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value == ALL_CATEGORIES {
            CategoryFilter::All
        } else {
            CategoryFilter::Category(value.to_string())
        }
    }

    /// Value written to storage
    pub fn as_str(&self) -> &str {
        match self {
            CategoryFilter::All => ALL_CATEGORIES,
            CategoryFilter::Category(c) => c,
        }
    }

    pub fn matches(&self, quote: &Quote) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Category(c) => quote.category == *c,
        }
    }
}

impl std::fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the display surface should show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteView {
    Quote(Quote),
    /// The collection is empty
    NoQuotes,
    /// The collection has quotes, just none in this category
    NoMatches(String),
}

/// Result of merging a remote batch into the collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub fetched: usize,
    pub added: usize,
    pub synced_at: DateTime<Utc>,
}

impl SyncReport {
    pub fn message(&self) -> String {
        if self.added == 0 {
            "Quotes synced with server! Already up to date.".to_string()
        } else {
            format!("Quotes synced with server! {} new quote(s) added.", self.added)
        }
    }
}

/// Result of importing a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    /// Records with a blank text or category
    pub skipped: usize,
}
