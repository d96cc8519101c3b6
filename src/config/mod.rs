use std::{env, path::PathBuf, str::FromStr};

use config::{Config as config_config, File as config_file};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::logging;

const CONFIG_PATH: &str = "app.json";

#[derive(Serialize, Deserialize, Default, Debug, Clone)]
pub struct App {
    #[serde(default)]
    pub feed: Feed,
    #[serde(default)]
    pub system: System,
}

const FEED_ENDPOINT: &str = "FEED_ENDPOINT";
const FEED_INTERVAL_SECS: &str = "FEED_INTERVAL_SECS";
const FEED_REQUEST_TIMEOUT_SECS: &str = "FEED_REQUEST_TIMEOUT_SECS";

const DEFAULT_ENDPOINT: &str = "http://localhost:4000/api/api/stocks";
const DEFAULT_INTERVAL_SECS: u64 = 15;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

/// Where and how often the quote collection is polled.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Feed {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for Feed {
    fn default() -> Self {
        Feed {
            endpoint: default_endpoint(),
            interval_secs: DEFAULT_INTERVAL_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_interval_secs() -> u64 {
    DEFAULT_INTERVAL_SECS
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

const SYSTEM_HTTP_PORT: &str = "SYSTEM_HTTP_PORT";
const DEFAULT_HTTP_PORT: u16 = 8080;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct System {
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

impl Default for System {
    fn default() -> Self {
        System {
            http_port: DEFAULT_HTTP_PORT,
        }
    }
}

fn default_http_port() -> u16 {
    DEFAULT_HTTP_PORT
}

pub static SETTINGS: Lazy<App> = Lazy::new(App::load);

impl App {
    /// Reads `app.json` when present, then lets the environment win.
    ///
    /// A malformed file is logged and replaced by defaults rather than
    /// aborting startup.
    pub fn load() -> Self {
        match App::get() {
            Ok(app) => app,
            Err(why) => {
                logging::error_file_async(format!(
                    "I can't read the config context because {:?}",
                    why
                ));
                App::default().override_with_env()
            }
        }
    }

    fn get() -> Result<Self, config::ConfigError> {
        let config_path = config_path();
        if config_path.exists() {
            let config: App = config_config::builder()
                .add_source(config_file::from(config_path))
                .build()?
                .try_deserialize()?;
            return Ok(config.override_with_env());
        }

        Ok(App::default().override_with_env())
    }

    /// Overrides file values with whatever is set in the environment.
    fn override_with_env(mut self) -> Self {
        if let Ok(endpoint) = env::var(FEED_ENDPOINT) {
            self.feed.endpoint = endpoint;
        }

        if let Ok(secs) = env::var(FEED_INTERVAL_SECS) {
            self.feed.interval_secs = u64::from_str(&secs).unwrap_or(DEFAULT_INTERVAL_SECS);
        }

        if let Ok(secs) = env::var(FEED_REQUEST_TIMEOUT_SECS) {
            self.feed.request_timeout_secs =
                u64::from_str(&secs).unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
        }

        if let Ok(port) = env::var(SYSTEM_HTTP_PORT) {
            self.system.http_port = u16::from_str(&port).unwrap_or(DEFAULT_HTTP_PORT);
        }

        self
    }
}

/// Path of the default config file.
fn config_path() -> PathBuf {
    PathBuf::from(CONFIG_PATH)
}
