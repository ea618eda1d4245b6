// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub timeout: Duration,
    /// Explicit snapshot database path; `None` means the platform data dir.
    pub database_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            database_path: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            api_base_url: env::var("SPENDWISE_API_URL")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(|v| normalize_base_url(&v))
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            timeout: env::var("SPENDWISE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            database_path: env::var("SPENDWISE_DB")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
        }
    }

    pub fn with_api_url(mut self, url: Option<&String>) -> Self {
        if let Some(url) = url {
            self.api_base_url = normalize_base_url(url);
        }
        self
    }
}

pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
