use crate::config::DevConfig;
use crate::error::{ConfigError, Result};

impl DevConfig {
    /// Validate configuration for logical consistency.
    pub fn validate(&self) -> Result<()> {
        if !self.web_root.is_dir() {
            return Err(ConfigError::InvalidValue {
                field: "web_root".to_string(),
                value: self.web_root.display().to_string(),
                hint: "Content root must be an existing directory (pass --root <DIR>)"
                    .to_string(),
            }
            .into());
        }

        if self.port == self.ws_port {
            return Err(ConfigError::InvalidValue {
                field: "ws_port".to_string(),
                value: self.ws_port.to_string(),
                hint: "WebSocket port must differ from the HTTP port".to_string(),
            }
            .into());
        }

        for (field, value) in [
            ("build_dir", &self.build_dir),
            ("metadata", &self.metadata),
            ("import_map", &self.import_map),
        ] {
            if value.trim().is_empty() || value.split('/').any(|seg| seg == "..") {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: value.clone(),
                    hint: "Must be a path inside the content root".to_string(),
                }
                .into());
            }
        }

        Ok(())
    }
}
