// The quote collection and everything that reads or mutates it
use crate::{
    collection,
    export::Exporter,
    models::{CategoryFilter, ImportSummary, Quote, QuoteView, SyncReport},
    sync::RemoteSource,
    Error, Result,
};
use chrono::Utc;
use quotebox_cache::{KeyValueStore, SqliteStore};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, warn};

pub const QUOTES_KEY: &str = "quotes";
pub const LAST_CATEGORY_KEY: &str = "lastCategory";
pub const LAST_QUOTE_KEY: &str = "lastQuote";

/// File name of the durable store inside the data directory
pub const DATABASE_FILE: &str = "quotebox.db";

/// Owns the quote collection and mirrors it to durable storage
///
/// Every mutation rewrites the whole collection under `quotes`. If that
/// write fails the mutation is rolled back, so memory and storage never
/// disagree after an error.
pub struct QuoteStore {
    quotes: Vec<Quote>,
    durable: Box<dyn KeyValueStore>,
    session: Box<dyn KeyValueStore>,
}

impl QuoteStore {
    /// Load the collection from `durable`, falling back to the seed quotes
    /// when nothing usable is stored
    pub fn load(durable: Box<dyn KeyValueStore>, session: Box<dyn KeyValueStore>) -> Self {
        let quotes = match durable.get(QUOTES_KEY) {
            Ok(Some(payload)) => match serde_json::from_str::<Vec<Quote>>(&payload) {
                Ok(quotes) => {
                    debug!("Loaded {} quotes from storage", quotes.len());
                    quotes
                }
                Err(e) => {
                    warn!("Stored quotes are corrupt ({}), using seed quotes", e);
                    collection::seed_quotes()
                }
            },
            Ok(None) => {
                debug!("No stored quotes, using seed quotes");
                collection::seed_quotes()
            }
            Err(e) => {
                warn!("Could not read stored quotes ({}), using seed quotes", e);
                collection::seed_quotes()
            }
        };

        Self {
            quotes,
            durable,
            session,
        }
    }

    /// Open the on-disk store in `data_dir` with a fresh session store
    pub fn open<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        let data_dir = data_dir.as_ref();
        std::fs::create_dir_all(data_dir)?;

        let durable = SqliteStore::open(data_dir.join(DATABASE_FILE))?;
        let session = SqliteStore::in_memory()?;
        Ok(Self::load(Box::new(durable), Box::new(session)))
    }

    /// Fully in-memory store, nothing survives the process
    pub fn in_memory() -> Result<Self> {
        Ok(Self::load(
            Box::new(SqliteStore::in_memory()?),
            Box::new(SqliteStore::in_memory()?),
        ))
    }

    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Write the whole collection to durable storage
    pub fn save(&self) -> Result<()> {
        let payload = serde_json::to_string(&self.quotes)?;
        self.durable.set(QUOTES_KEY, &payload)?;
        Ok(())
    }

    /// Re-read the collection from durable storage, picking up writes made
    /// through another handle on the same database. Nothing stored, or a
    /// corrupt payload, keeps what is in memory.
    pub fn reload(&mut self) -> Result<()> {
        let payload = match self.durable.get(QUOTES_KEY)? {
            Some(payload) => payload,
            None => return Ok(()),
        };

        match serde_json::from_str::<Vec<Quote>>(&payload) {
            Ok(quotes) => {
                if quotes.len() != self.quotes.len() {
                    debug!("Reloaded {} quotes (had {})", quotes.len(), self.quotes.len());
                }
                self.quotes = quotes;
            }
            Err(e) => warn!("Stored quotes are corrupt ({}), keeping current collection", e),
        }
        Ok(())
    }

    fn save_or_truncate(&mut self, previous_len: usize) -> Result<()> {
        if let Err(e) = self.save() {
            self.quotes.truncate(previous_len);
            return Err(e);
        }
        Ok(())
    }

    pub fn pick_random(&self) -> Option<&Quote> {
        collection::pick_random(&self.quotes).map(|idx| &self.quotes[idx])
    }

    pub fn filter(&self, filter: &CategoryFilter) -> Vec<&Quote> {
        collection::filter(&self.quotes, filter)
    }

    pub fn categories(&self) -> Vec<&str> {
        collection::categories(&self.quotes)
    }

    /// Trim and validate, then append and persist
    pub fn add(&mut self, text: &str, category: &str) -> Result<&Quote> {
        let text = text.trim();
        let category = category.trim();
        if text.is_empty() || category.is_empty() {
            return Err(Error::Validation(
                "Please enter both a quote and a category.".to_string(),
            ));
        }

        let previous_len = self.quotes.len();
        self.quotes.push(Quote::new(text, category));
        self.save_or_truncate(previous_len)?;

        info!("Added quote in category {}", category);
        Ok(&self.quotes[previous_len])
    }

    /// Pick a random quote among those matching `filter` and remember it
    /// as the last viewed one
    pub fn show_random(&self, filter: &CategoryFilter) -> QuoteView {
        if self.quotes.is_empty() {
            return QuoteView::NoQuotes;
        }

        let candidates = collection::filter(&self.quotes, filter);
        let picked = match collection::pick_random(&candidates) {
            Some(idx) => candidates[idx].clone(),
            None => return QuoteView::NoMatches(filter.as_str().to_string()),
        };

        self.remember_viewed(&picked);
        QuoteView::Quote(picked)
    }

    fn remember_viewed(&self, quote: &Quote) {
        let result = serde_json::to_string(quote)
            .map_err(Error::from)
            .and_then(|json| self.session.set(LAST_QUOTE_KEY, &json).map_err(Error::from));
        if let Err(e) = result {
            warn!("Could not remember last viewed quote: {}", e);
        }
    }

    /// Most recently shown quote in this session
    pub fn last_viewed(&self) -> Option<Quote> {
        let payload = self.session.get(LAST_QUOTE_KEY).ok().flatten()?;
        if payload.is_empty() {
            return None;
        }
        serde_json::from_str(&payload).ok()
    }

    pub fn select_category(&self, filter: &CategoryFilter) -> Result<()> {
        self.durable.set(LAST_CATEGORY_KEY, filter.as_str())?;
        debug!("Selected category {}", filter);
        Ok(())
    }

    /// Persisted filter, or `All` if none is stored or the category no
    /// longer exists in the collection
    pub fn last_category(&self) -> CategoryFilter {
        let stored = match self.durable.get(LAST_CATEGORY_KEY) {
            Ok(Some(value)) => CategoryFilter::parse(&value),
            Ok(None) => return CategoryFilter::All,
            Err(e) => {
                warn!("Could not read last category: {}", e);
                return CategoryFilter::All;
            }
        };

        if let CategoryFilter::Category(c) = &stored {
            if !self.categories().contains(&c.as_str()) {
                debug!("Stored category {} no longer exists, showing all", c);
                return CategoryFilter::All;
            }
        }
        stored
    }

    /// Import a JSON document produced by `export_quotes` (or by hand)
    ///
    /// A malformed document changes nothing. Text and category are trimmed
    /// the same way `add` trims them; records left blank are skipped.
    pub fn import_quotes(&mut self, content: &str) -> Result<ImportSummary> {
        let records = Exporter::from_json(content)?;
        self.import_records(records)
    }

    pub fn import_records(&mut self, records: Vec<Quote>) -> Result<ImportSummary> {
        let total = records.len();
        let previous_len = self.quotes.len();

        self.quotes.extend(
            records
                .into_iter()
                .map(|q| Quote::new(q.text.trim(), q.category.trim()))
                .filter(Quote::is_complete),
        );
        let imported = self.quotes.len() - previous_len;
        let summary = ImportSummary {
            imported,
            skipped: total - imported,
        };

        self.save_or_truncate(previous_len)?;

        if summary.skipped > 0 {
            warn!("Skipped {} incomplete records during import", summary.skipped);
        }
        info!("Imported {} quotes", summary.imported);
        Ok(summary)
    }

    pub fn export_quotes(&self) -> Result<String> {
        Exporter::to_json(&self.quotes)
    }

    pub fn export_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        Exporter::export_to_file(&self.quotes, path)
    }

    /// Append every incoming quote whose text isn't already present
    ///
    /// Strictly additive: local quotes are never removed or changed. The
    /// collection is reloaded first so quotes added by another process
    /// since this store was opened are merged against, not overwritten.
    /// Nothing is written when every incoming text is already known.
    pub fn merge_remote(&mut self, incoming: Vec<Quote>) -> Result<SyncReport> {
        self.reload()?;

        let fetched = incoming.len();
        let previous_len = self.quotes.len();

        let mut known: HashSet<String> = self.quotes.iter().map(|q| q.text.clone()).collect();
        for quote in incoming {
            if known.insert(quote.text.clone()) {
                self.quotes.push(quote);
            }
        }

        let added = self.quotes.len() - previous_len;
        if added > 0 {
            self.save_or_truncate(previous_len)?;
        }

        let report = SyncReport {
            fetched,
            added,
            synced_at: Utc::now(),
        };
        info!(
            "Merged remote batch: {} fetched, {} new",
            report.fetched, report.added
        );
        Ok(report)
    }

    /// Fetch from `source` and merge. A failed fetch leaves the collection
    /// untouched.
    pub async fn sync_with_remote(&mut self, source: &dyn RemoteSource) -> Result<SyncReport> {
        let incoming = source.fetch_quotes().await?;
        self.merge_remote(incoming)
    }
}
