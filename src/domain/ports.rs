use crate::domain::model::{RenderedFragment, Row};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Resolves a named view definition into an executable instance.
///
/// `load` reports `QueryNotFound` / `MalformedQuery` for definitions that
/// cannot be resolved. Every call hands out a fresh executable.
#[async_trait]
pub trait QueryDefinitionStore: Send + Sync {
    async fn load(&self, name: &str) -> Result<Box<dyn QueryExecutable>>;
}

#[async_trait]
impl<T: QueryDefinitionStore + ?Sized> QueryDefinitionStore for Arc<T> {
    async fn load(&self, name: &str) -> Result<Box<dyn QueryExecutable>> {
        (**self).load(name).await
    }
}

/// A loaded view, configured step by step and then executed once.
#[async_trait]
pub trait QueryExecutable: Send + Sync {
    /// Fails with `DisplayNotFound` when the view has no such display.
    fn set_display(&mut self, display_id: &str) -> Result<()>;

    fn set_arguments(&mut self, arguments: Vec<String>);

    fn set_current_page(&mut self, page: usize);

    async fn execute(&mut self) -> Result<()>;

    fn result(&self) -> &[Row];

    fn total_rows(&self) -> usize;

    fn items_per_page(&self) -> usize;

    async fn build_renderable(&self, display_id: &str) -> Result<RenderedFragment>;
}
