use serde::ser::{SerializeSeq, SerializeStruct};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Filter values supplied by the caller for one listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingConfig {
    #[serde(default, alias = "field_tags")]
    pub tags: Option<Vec<String>>,
    #[serde(default, alias = "field_author")]
    pub authors: Option<Vec<String>>,
}

impl ListingConfig {
    pub fn new(tags: Option<Vec<String>>, authors: Option<Vec<String>>) -> Self {
        Self { tags, authors }
    }
}

/// Positional contextual filter tokens, always bound as (tag, author).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterArguments {
    pub tag_argument: String,
    pub author_argument: String,
}

impl FilterArguments {
    pub fn to_positional(&self) -> Vec<String> {
        vec![self.tag_argument.clone(), self.author_argument.clone()]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListingMode {
    Result,
    #[default]
    Render,
}

impl From<&str> for ListingMode {
    /// Only the exact string `"result"` selects paged rows.
    fn from(value: &str) -> Self {
        if value == "result" {
            ListingMode::Result
        } else {
            ListingMode::Render
        }
    }
}

/// `page` is zero-indexed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListingRequest {
    pub mode: ListingMode,
    pub page: usize,
}

impl ListingRequest {
    pub fn result(page: usize) -> Self {
        Self {
            mode: ListingMode::Result,
            page,
        }
    }

    pub fn render() -> Self {
        Self {
            mode: ListingMode::Render,
            page: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    pub data: HashMap<String, serde_json::Value>,
}

impl Row {
    pub fn get(&self, field: &str) -> Option<&serde_json::Value> {
        self.data.get(field)
    }
}

impl From<HashMap<String, serde_json::Value>> for Row {
    fn from(data: HashMap<String, serde_json::Value>) -> Self {
        Self { data }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RenderedFragment(String);

impl RenderedFragment {
    pub fn new(markup: impl Into<String>) -> Self {
        Self(markup.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RenderedFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListingResult {
    Page {
        rows: Vec<Row>,
        total_rows: usize,
        items_per_page: usize,
    },
    Rendered {
        fragment: RenderedFragment,
    },
    /// The view or display could not be resolved.
    Empty,
}

impl ListingResult {
    pub fn rows(&self) -> &[Row] {
        match self {
            ListingResult::Page { rows, .. } => rows,
            _ => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ListingResult::Page { rows, .. } => rows.is_empty(),
            ListingResult::Rendered { .. } => false,
            ListingResult::Empty => true,
        }
    }

    pub fn fragment(&self) -> Option<&RenderedFragment> {
        match self {
            ListingResult::Rendered { fragment } => Some(fragment),
            _ => None,
        }
    }
}

impl Serialize for ListingResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ListingResult::Page {
                rows,
                total_rows,
                items_per_page,
            } => {
                let mut state = serializer.serialize_struct("ListingResult", 3)?;
                state.serialize_field("rows", rows)?;
                state.serialize_field("total_rows", total_rows)?;
                state.serialize_field("item_per_page", items_per_page)?;
                state.end()
            }
            ListingResult::Rendered { fragment } => {
                let mut state = serializer.serialize_struct("ListingResult", 1)?;
                state.serialize_field("rows", fragment)?;
                state.end()
            }
            ListingResult::Empty => serializer.serialize_seq(Some(0))?.end(),
        }
    }
}
