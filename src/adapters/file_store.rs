use crate::adapters::definition::ViewDefinition;
use crate::adapters::fixture_view::FixtureView;
use crate::domain::ports::{QueryDefinitionStore, QueryExecutable};
use crate::utils::error::{ListingError, Result};
use async_trait::async_trait;
use std::path::PathBuf;

/// Reads view definitions from `<root>/<name>.toml`.
#[derive(Debug, Clone)]
pub struct FileViewStore {
    root: PathBuf,
}

impl FileViewStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn definition_path(&self, name: &str) -> Option<PathBuf> {
        // 視圖名稱只能是單一檔名
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        valid.then(|| self.root.join(format!("{}.toml", name)))
    }
}

#[async_trait]
impl QueryDefinitionStore for FileViewStore {
    async fn load(&self, name: &str) -> Result<Box<dyn QueryExecutable>> {
        let not_found = || ListingError::QueryNotFound {
            name: name.to_string(),
        };
        let path = self.definition_path(name).ok_or_else(not_found)?;

        tracing::debug!("Loading view definition from {}", path.display());
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(not_found()),
            Err(e) => return Err(ListingError::IoError(e)),
        };

        let mut definition: ViewDefinition =
            toml::from_str(&content).map_err(|e| ListingError::MalformedQuery {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
        if definition.id.is_empty() {
            definition.id = name.to_string();
        }
        definition.validate()?;

        let view = FixtureView::new(definition).with_base_dir(self.root.clone());
        Ok(Box::new(view))
    }
}
