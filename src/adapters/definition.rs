use crate::domain::model::Row;
use crate::utils::error::{ListingError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_positive_number};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViewDefinition {
    #[serde(default)]
    pub id: String,
    pub label: Option<String>,
    /// Dataset file, relative to the definition file.
    pub csv: Option<String>,
    /// CSV columns whose cells hold `|`-separated values.
    #[serde(default)]
    pub multi_value_fields: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Row>,
    #[serde(default)]
    pub displays: HashMap<String, DisplayDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayDefinition {
    pub title: Option<String>,
    #[serde(default = "default_items_per_page")]
    pub items_per_page: usize,
    /// Contextual filters, bound positionally.
    #[serde(default)]
    pub arguments: Vec<ArgumentDefinition>,
    pub sort: Option<SortDefinition>,
    #[serde(default)]
    pub fields: Vec<String>,
    pub empty_text: Option<String>,
}

fn default_items_per_page() -> usize {
    10
}

impl Default for DisplayDefinition {
    fn default() -> Self {
        Self {
            title: None,
            items_per_page: default_items_per_page(),
            arguments: Vec::new(),
            sort: None,
            fields: Vec::new(),
            empty_text: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArgumentDefinition {
    pub field: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortDefinition {
    pub field: String,
    #[serde(default)]
    pub order: SortOrder,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl ViewDefinition {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_rows(mut self, rows: Vec<Row>) -> Self {
        self.rows = rows;
        self
    }

    pub fn with_display(mut self, id: impl Into<String>, display: DisplayDefinition) -> Self {
        self.displays.insert(id.into(), display);
        self
    }

    /// Rejects definitions the fixture engine cannot run.
    pub fn validate(&self) -> Result<()> {
        self.check().map_err(|e| ListingError::MalformedQuery {
            name: self.id.clone(),
            reason: e.to_string(),
        })
    }

    fn check(&self) -> Result<()> {
        validate_non_empty_string("id", &self.id)?;

        if self.displays.is_empty() {
            return Err(ListingError::ConfigError {
                message: "view declares no displays".to_string(),
            });
        }

        for (display_id, display) in &self.displays {
            validate_positive_number(
                &format!("displays.{}.items_per_page", display_id),
                display.items_per_page,
                1,
            )?;
            for argument in &display.arguments {
                validate_non_empty_string(
                    &format!("displays.{}.arguments.field", display_id),
                    &argument.field,
                )?;
            }
        }

        Ok(())
    }
}

impl DisplayDefinition {
    pub fn new(items_per_page: usize) -> Self {
        Self {
            items_per_page,
            ..Default::default()
        }
    }

    pub fn with_arguments(mut self, fields: &[&str]) -> Self {
        self.arguments = fields
            .iter()
            .map(|field| ArgumentDefinition {
                field: field.to_string(),
            })
            .collect();
        self
    }

    pub fn with_sort(mut self, field: &str, order: SortOrder) -> Self {
        self.sort = Some(SortDefinition {
            field: field.to_string(),
            order,
        });
        self
    }

    pub fn with_fields(mut self, fields: &[&str]) -> Self {
        self.fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }
}
