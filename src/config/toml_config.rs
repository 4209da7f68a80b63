use crate::core::listing::{DISPLAY_ID, VIEW_NAME};
use crate::domain::model::ListingConfig;
use crate::utils::error::{ListingError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_path, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingSettings {
    #[serde(default)]
    pub listing: ListingSection,
    #[serde(default)]
    pub store: StoreSection,
    pub block: Option<ListingConfig>,
    pub logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingSection {
    pub view: Option<String>,
    pub display: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSection {
    #[serde(default = "default_views_dir")]
    pub views_dir: String,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            views_dir: default_views_dir(),
        }
    }
}

fn default_views_dir() -> String {
    "./views".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingSection {
    pub verbose: Option<bool>,
    pub json: Option<bool>,
}

impl ListingSettings {
    /// 從 TOML 檔案載入設定
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ListingError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析設定
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ListingError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${VIEWS_DIR})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ListingError::ConfigError {
            message: format!("Invalid placeholder pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn view_name(&self) -> &str {
        self.listing.view.as_deref().unwrap_or(VIEW_NAME)
    }

    pub fn display_id(&self) -> &str {
        self.listing.display.as_deref().unwrap_or(DISPLAY_ID)
    }

    pub fn views_dir(&self) -> &str {
        &self.store.views_dir
    }

    pub fn block(&self) -> ListingConfig {
        self.block.clone().unwrap_or_default()
    }

    pub fn verbose(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.verbose)
            .unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

impl Validate for ListingSettings {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("listing.view", self.view_name())?;
        validate_non_empty_string("listing.display", self.display_id())?;
        validate_path("store.views_dir", self.views_dir())?;
        Ok(())
    }
}
