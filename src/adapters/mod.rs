// Adapters layer: concrete view stores and the fixture view engine behind them.

pub mod definition;
pub mod file_store;
pub mod fixture_view;
pub mod memory_store;

pub use definition::{ArgumentDefinition, DisplayDefinition, SortOrder, ViewDefinition};
pub use file_store::FileViewStore;
pub use fixture_view::FixtureView;
pub use memory_store::InMemoryViewStore;
