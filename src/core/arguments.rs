use crate::domain::model::{FilterArguments, ListingConfig};

/// Token that tells a contextual filter to match every row.
pub const DEFAULT_ARGUMENT: &str = "all";

const INPUT_SEPARATOR: &str = ", ";
const ARGUMENT_SEPARATOR: &str = "+";

pub struct ArgumentBuilder;

impl ArgumentBuilder {
    pub fn build(config: &ListingConfig) -> FilterArguments {
        FilterArguments {
            tag_argument: Self::argument(config.tags.as_deref()),
            author_argument: Self::argument(config.authors.as_deref()),
        }
    }

    fn argument(values: Option<&[String]>) -> String {
        let values: Vec<&str> = values
            .unwrap_or_default()
            .iter()
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .collect();

        // 空集合與缺少欄位同樣使用預設值
        if values.is_empty() {
            return DEFAULT_ARGUMENT.to_string();
        }

        values
            .join(INPUT_SEPARATOR)
            .replace(INPUT_SEPARATOR, ARGUMENT_SEPARATOR)
    }
}

impl From<&ListingConfig> for FilterArguments {
    fn from(config: &ListingConfig) -> Self {
        ArgumentBuilder::build(config)
    }
}

impl FilterArguments {
    pub fn from_config(config: &ListingConfig) -> Self {
        ArgumentBuilder::build(config)
    }
}
