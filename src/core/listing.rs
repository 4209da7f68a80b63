use crate::config::toml_config::ListingSettings;
use crate::core::arguments::ArgumentBuilder;
use crate::core::executor::ListingExecutor;
use crate::domain::model::{ListingConfig, ListingRequest, ListingResult};
use crate::domain::ports::QueryDefinitionStore;
use crate::utils::error::Result;

pub const VIEW_NAME: &str = "article_content_listing";
pub const DISPLAY_ID: &str = "block_1";

/// Content listing for one configured view display.
pub struct ContentListingService<S: QueryDefinitionStore> {
    executor: ListingExecutor<S>,
    view_name: String,
    display_id: String,
}

impl<S: QueryDefinitionStore> ContentListingService<S> {
    pub fn new(store: S, view_name: impl Into<String>, display_id: impl Into<String>) -> Self {
        Self {
            executor: ListingExecutor::new(store),
            view_name: view_name.into(),
            display_id: display_id.into(),
        }
    }

    pub fn with_defaults(store: S) -> Self {
        Self::new(store, VIEW_NAME, DISPLAY_ID)
    }

    pub fn from_settings(store: S, settings: &ListingSettings) -> Self {
        Self::new(store, settings.view_name(), settings.display_id())
    }

    pub fn view_name(&self) -> &str {
        &self.view_name
    }

    pub fn display_id(&self) -> &str {
        &self.display_id
    }

    pub async fn get_content_listing(
        &self,
        config: &ListingConfig,
        request: &ListingRequest,
    ) -> Result<ListingResult> {
        let arguments = ArgumentBuilder::build(config);

        self.executor
            .execute(&self.view_name, &self.display_id, &arguments, request)
            .await
    }
}
