use crate::domain::model::{FilterArguments, ListingMode, ListingRequest, ListingResult};
use crate::domain::ports::QueryDefinitionStore;
use crate::utils::error::{ListingError, Result};

pub struct ListingExecutor<S: QueryDefinitionStore> {
    store: S,
}

impl<S: QueryDefinitionStore> ListingExecutor<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Runs `query_name`/`display_id` with the filter arguments bound positionally.
    ///
    /// A view or display that cannot be resolved yields `ListingResult::Empty`.
    /// Failures raised while the view executes or renders are returned as errors.
    pub async fn execute(
        &self,
        query_name: &str,
        display_id: &str,
        args: &FilterArguments,
        request: &ListingRequest,
    ) -> Result<ListingResult> {
        tracing::debug!("Loading view '{}' (display '{}')", query_name, display_id);

        let mut view = match self.store.load(query_name).await {
            Ok(view) => view,
            Err(e) if e.is_resolution_fault() => return Ok(Self::degrade(e)),
            Err(e) => return Err(e),
        };

        if let Err(e) = view.set_display(display_id) {
            if e.is_resolution_fault() {
                return Ok(Self::degrade(e));
            }
            return Err(e);
        }

        view.set_arguments(args.to_positional());
        tracing::debug!(
            "Bound arguments tag='{}' author='{}'",
            args.tag_argument,
            args.author_argument
        );

        match request.mode {
            ListingMode::Result => {
                view.set_current_page(request.page);
                view.execute().await?;

                tracing::debug!(
                    "View '{}' returned {} of {} rows (page {})",
                    query_name,
                    view.result().len(),
                    view.total_rows(),
                    request.page
                );

                Ok(ListingResult::Page {
                    rows: view.result().to_vec(),
                    total_rows: view.total_rows(),
                    items_per_page: view.items_per_page(),
                })
            }
            ListingMode::Render => {
                view.execute().await?;
                let fragment = view.build_renderable(display_id).await?;

                Ok(ListingResult::Rendered { fragment })
            }
        }
    }

    fn degrade(error: ListingError) -> ListingResult {
        tracing::warn!("Listing degraded to empty result: {}", error);
        ListingResult::Empty
    }
}
