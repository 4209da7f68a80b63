pub mod arguments;
pub mod executor;
pub mod listing;

pub use crate::domain::model::{
    FilterArguments, ListingConfig, ListingMode, ListingRequest, ListingResult, RenderedFragment,
    Row,
};
pub use crate::domain::ports::{QueryDefinitionStore, QueryExecutable};
pub use crate::utils::error::Result;
