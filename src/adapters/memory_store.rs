use crate::adapters::definition::ViewDefinition;
use crate::adapters::fixture_view::FixtureView;
use crate::domain::ports::{QueryDefinitionStore, QueryExecutable};
use crate::utils::error::{ListingError, Result};
use async_trait::async_trait;
use std::collections::HashMap;

/// View definitions registered in process, keyed by view id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryViewStore {
    views: HashMap<String, ViewDefinition>,
}

impl InMemoryViewStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, definition: ViewDefinition) {
        self.views.insert(definition.id.clone(), definition);
    }

    pub fn with_view(mut self, definition: ViewDefinition) -> Self {
        self.insert(definition);
        self
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

#[async_trait]
impl QueryDefinitionStore for InMemoryViewStore {
    async fn load(&self, name: &str) -> Result<Box<dyn QueryExecutable>> {
        let definition = self
            .views
            .get(name)
            .cloned()
            .ok_or_else(|| ListingError::QueryNotFound {
                name: name.to_string(),
            })?;
        definition.validate()?;

        let view = FixtureView::new(definition);
        tracing::debug!("Loaded in-memory view '{}'", view.id());
        Ok(Box::new(view))
    }
}
