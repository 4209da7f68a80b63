pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{FileViewStore, InMemoryViewStore};
pub use config::ListingSettings;
pub use crate::core::{
    arguments::ArgumentBuilder, executor::ListingExecutor, listing::ContentListingService,
};
pub use domain::model::{
    FilterArguments, ListingConfig, ListingMode, ListingRequest, ListingResult, RenderedFragment,
    Row,
};
pub use utils::error::{ListingError, Result};
