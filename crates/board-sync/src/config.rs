//! Board Configuration
//!
//! API location and column paging. Defaults are baked in at compile time;
//! the front-end may override the API URL at startup.

use serde::{Deserialize, Serialize};

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const DEFAULT_PAGE_SIZE: usize = 4;
pub const DEFAULT_PAGE_STEP: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BoardConfig {
    /// Base URL of the task API, without trailing slash
    pub api_url: String,
    /// Tasks initially visible per column
    pub page_size: usize,
    /// Tasks revealed by each "load more"
    pub page_step: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            api_url: option_env!("TASK_BOARD_API_URL").unwrap_or(DEFAULT_API_URL).to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            page_step: DEFAULT_PAGE_STEP,
        }
    }
}

impl BoardConfig {
    /// Parse partial JSON; missing keys keep their defaults
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let config: Self = serde_json::from_str(raw)?;
        Ok(config.normalized())
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self.normalized()
    }

    fn normalized(mut self) -> Self {
        let trimmed = self.api_url.trim().trim_end_matches('/');
        self.api_url = trimmed.to_string();
        self.page_step = self.page_step.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = BoardConfig::from_json(r#"{"apiUrl": "https://tasks.example.com/api/"}"#).unwrap();
        assert_eq!(config.api_url, "https://tasks.example.com/api");
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.page_step, DEFAULT_PAGE_STEP);
    }

    #[test]
    fn test_zero_step_is_clamped() {
        let config = BoardConfig::from_json(r#"{"pageSize": 10, "pageStep": 0}"#).unwrap();
        assert_eq!(config.page_size, 10);
        assert_eq!(config.page_step, 1);
    }

    #[test]
    fn test_with_api_url() {
        let config = BoardConfig::default().with_api_url(" http://10.0.0.2:8080/ ");
        assert_eq!(config.api_url, "http://10.0.0.2:8080");
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(BoardConfig::from_json("{apiUrl:").is_err());
    }
}
