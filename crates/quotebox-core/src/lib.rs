// Quote collection, persistence, import/export and remote sync
pub mod collection;
pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod providers;
pub mod render;
pub mod store;
pub mod sync;

pub use config::Config;
pub use error::Error;
pub use export::{Exporter, EXPORT_FILE_NAME};
pub use models::{CategoryFilter, ImportSummary, Quote, QuoteView, SyncReport, ALL_CATEGORIES};
pub use providers::FeedSource;
pub use render::{QuoteSurface, TextSurface};
pub use store::QuoteStore;
pub use sync::{RemoteSource, SyncHandle, SyncOutcome, SyncService};

pub type Result<T> = std::result::Result<T, Error>;
