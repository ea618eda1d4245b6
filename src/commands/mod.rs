// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod auth;
pub mod dashboard;
pub mod exporter;
pub mod ledger;
pub mod sync;

use anyhow::{Result, bail};
use rusqlite::Connection;

use crate::api::ApiClient;
use crate::config::Config;
use crate::db;

/// API client carrying the stored session, if any.
pub fn client(conn: &Connection, config: &Config) -> Result<ApiClient> {
    let session = db::load_session(conn)?;
    Ok(ApiClient::new(config, session.as_ref())?)
}

/// Like [`client`] but fails early when nobody is logged in.
pub fn authed_client(conn: &Connection, config: &Config) -> Result<ApiClient> {
    let c = client(conn, config)?;
    if !c.is_authenticated() {
        bail!("Not logged in; run `spendwise login --email <EMAIL>` first");
    }
    Ok(c)
}
