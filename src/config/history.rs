//! Search history configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Search history log configuration
///
/// Without a database URL the log lives in memory.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryConfig {
    /// PostgreSQL connection URL
    pub database_url: Option<String>,

    /// Maximum pool connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl HistoryConfig {
    pub fn is_persistent(&self) -> bool {
        self.database_url.as_deref().is_some_and(|u| !u.is_empty())
    }

    /// Validate history configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(url) = self.database_url.as_deref().filter(|u| !u.is_empty()) {
            if !url.starts_with("postgres://") && !url.starts_with("postgresql://") {
                return Err(ValidationError::InvalidDatabaseUrl);
            }
        }
        if self.max_connections == 0 || self.max_connections > 100 {
            return Err(ValidationError::InvalidPoolSize);
        }
        Ok(())
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            max_connections: default_max_connections(),
        }
    }
}

fn default_max_connections() -> u32 {
    5
}
