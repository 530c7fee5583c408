use crate::cli::{ConfigArgs, ServeArgs};
use crate::config::{DevConfig, CONFIG_FILE_NAME};
use crate::error::{ConfigError, Result};
use figment::{
    providers::{Env, Format as _, Json, Serialized},
    Figment,
};
use serde::Serialize;
use std::net::IpAddr;
use std::path::{Path, PathBuf};

/// `DevConfig` fields that may be set through `ESMBIT_*` variables.
const ENV_KEYS: [&str; 8] = [
    "web_root",
    "host",
    "port",
    "ws_port",
    "build_dir",
    "metadata",
    "import_map",
    "watch",
];

/// Values given on the command line. Unset fields are skipped so they never
/// shadow the file or environment.
#[derive(Debug, Default, Serialize)]
struct CliOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    web_root: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    host: Option<IpAddr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ws_port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    watch: Option<bool>,
}

impl CliOverrides {
    fn from_config_args(args: &ConfigArgs) -> Self {
        Self {
            web_root: args.root.clone(),
            ..Self::default()
        }
    }

    fn from_serve_args(args: &ServeArgs) -> Self {
        Self {
            host: args.host,
            port: args.port,
            ws_port: args.ws_port,
            // --no-watch can only switch watching off
            watch: args.no_watch.then_some(false),
            ..Self::from_config_args(&args.config)
        }
    }
}

impl DevConfig {
    /// Load configuration for `serve`.
    /// Priority: CLI args > environment variables > config file > defaults
    pub fn load(args: &ServeArgs) -> Result<Self> {
        Self::load_with(
            args.config.config.as_deref(),
            CliOverrides::from_serve_args(args),
        )
    }

    /// Load configuration for commands that only take the shared options.
    pub fn load_shared(args: &ConfigArgs) -> Result<Self> {
        Self::load_with(args.config.as_deref(), CliOverrides::from_config_args(args))
    }

    fn load_with(config_path: Option<&Path>, overrides: CliOverrides) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        // An explicit --config must exist; the default file is optional
        let config_file = match config_path {
            Some(path) if !path.exists() => {
                return Err(ConfigError::NotFound(path.to_path_buf()).into());
            }
            Some(path) => Some(path.to_path_buf()),
            None => {
                let default_path = Path::new(CONFIG_FILE_NAME);
                default_path.exists().then(|| default_path.to_path_buf())
            }
        };

        if let Some(path) = config_file {
            tracing::debug!("Loading config from {}", path.display());
            figment = figment.merge(Json::file(path));
        }

        // ESMBIT_PORT, ESMBIT_WS_PORT, ESMBIT_WEB_ROOT, ...
        // Other ESMBIT_* variables are not config keys and must not trip
        // the unknown-field check.
        figment = figment.merge(Env::prefixed("ESMBIT_").only(&ENV_KEYS));

        figment = figment.merge(Serialized::defaults(overrides));

        figment.extract().map_err(|e| {
            ConfigError::InvalidValue {
                field: "configuration".to_string(),
                value: e.to_string(),
                hint: format!("Check {} syntax and field types", CONFIG_FILE_NAME),
            }
            .into()
        })
    }
}
