// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Blocking client for the finance API. The bearer token is passed in
//! explicitly at construction; nothing here reads global state.

use chrono::{NaiveDate, NaiveTime};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Method, StatusCode, Url};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::config::Config;
use crate::models::{Session, SummaryReport, Transaction, TransactionKind, UserProfile};
use crate::validation::NewTransaction;

const UA: &str = concat!("spendwise/", env!("CARGO_PKG_VERSION"));
const AVATAR_URL: &str = "https://ui-avatars.com/api/";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not logged in or session expired; run `spendwise login`")]
    Unauthorized,
    #[error("Server returned {status}: {message}")]
    Status { status: StatusCode, message: String },
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Invalid URL: {0}")]
    Url(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterBody<'a> {
    full_name: &'a str,
    email: &'a str,
    password: &'a str,
    profile_image_url: String,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    token: String,
    user: UserProfile,
}

/// JSON body for `POST /expense/add` and `POST /income/add`.
#[derive(Debug, Serialize, PartialEq)]
pub struct AddBody {
    pub icon: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub date: String,
}

impl AddBody {
    pub fn from_new(t: &NewTransaction) -> Self {
        let (category, source) = match t.kind {
            TransactionKind::Expense => (Some(t.label.clone()), None),
            TransactionKind::Income => (None, Some(t.label.clone())),
        };
        AddBody {
            icon: t.icon.to_string(),
            category,
            source,
            amount: t.amount,
            date: midnight_utc(t.date),
        }
    }
}

/// `2025-03-04` -> `2025-03-04T00:00:00.000Z`.
pub fn midnight_utc(d: NaiveDate) -> String {
    d.and_time(NaiveTime::MIN)
        .and_utc()
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
}

/// Avatar URL used when registration does not supply one.
pub fn default_avatar_url(full_name: &str) -> ApiResult<String> {
    Url::parse_with_params(AVATAR_URL, &[("name", full_name)])
        .map(|u| u.to_string())
        .map_err(|e| ApiError::Url(e.to_string()))
}

fn resource(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Expense => "expense",
        TransactionKind::Income => "income",
    }
}

pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &Config, session: Option<&Session>) -> ApiResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(UA)
            .build()?;
        Ok(ApiClient {
            http,
            base_url: config.api_base_url.clone(),
            token: session.map(|s| s.token.clone()),
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        tracing::debug!(%method, %url, "api request");
        let mut req = self
            .http
            .request(method, url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        req
    }

    fn send(&self, req: RequestBuilder) -> ApiResult<Response> {
        let resp = req.send()?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        let body = resp.text().unwrap_or_default();
        let message = error_message(&body)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());
        tracing::warn!(%status, %message, "api error");
        Err(ApiError::Status { status, message })
    }

    fn get_json(&self, path: &str) -> ApiResult<Value> {
        let resp = self.send(self.request(Method::GET, path))?;
        Ok(resp.json()?)
    }

    pub fn login(&self, email: &str, password: &str) -> ApiResult<Session> {
        let req = self
            .request(Method::POST, "auth/login")
            .json(&LoginBody { email, password });
        let auth: AuthResponse = self.send(req)?.json()?;
        Ok(Session {
            token: auth.token,
            user: auth.user,
        })
    }

    pub fn register(
        &self,
        full_name: &str,
        email: &str,
        password: &str,
        profile_image_url: Option<&str>,
    ) -> ApiResult<Value> {
        let profile_image_url = match profile_image_url.filter(|u| !u.trim().is_empty()) {
            Some(u) => u.trim().to_string(),
            None => default_avatar_url(full_name)?,
        };
        let req = self.request(Method::POST, "auth/register").json(&RegisterBody {
            full_name,
            email,
            password,
            profile_image_url,
        });
        Ok(self.send(req)?.json()?)
    }

    /// All records of `kind`. Entries the server sends malformed are skipped.
    pub fn list(&self, kind: TransactionKind) -> ApiResult<Vec<Transaction>> {
        let v = self.get_json(&format!("{}/get", resource(kind)))?;
        let items = v.as_array().cloned().unwrap_or_default();
        let mut out = Vec::with_capacity(items.len());
        for item in &items {
            match Transaction::from_wire(item) {
                Some(t) => out.push(t),
                None => {
                    tracing::warn!(kind = kind.as_str(), entry = %item, "skipping malformed record")
                }
            }
        }
        Ok(out)
    }

    pub fn add(&self, new: &NewTransaction) -> ApiResult<Value> {
        let req = self
            .request(Method::POST, &format!("{}/add", resource(new.kind)))
            .json(&AddBody::from_new(new));
        Ok(self.send(req)?.json()?)
    }

    pub fn delete(&self, kind: TransactionKind, id: &str) -> ApiResult<()> {
        self.send(self.request(Method::DELETE, &format!("{}/{}", resource(kind), id.trim())))?;
        Ok(())
    }

    /// Raw spreadsheet bytes for every record of `kind`.
    pub fn download_excel(&self, kind: TransactionKind) -> ApiResult<Vec<u8>> {
        let req = self
            .request(Method::POST, &format!("{}/download-excel", resource(kind)))
            .json(&serde_json::json!({}));
        Ok(self.send(req)?.bytes()?.to_vec())
    }

    /// The raw `/dashboard` document; decode with [`SummaryReport::from_value`].
    pub fn summary_raw(&self) -> ApiResult<Value> {
        self.get_json("dashboard")
    }

    pub fn summary(&self) -> ApiResult<SummaryReport> {
        Ok(SummaryReport::from_value(&self.summary_raw()?))
    }
}

fn error_message(body: &str) -> Option<String> {
    let v: Value = serde_json::from_str(body).ok()?;
    v.get("message")
        .or_else(|| v.get("error"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn urls_join_with_single_slash() {
        let cfg = Config {
            api_base_url: "http://localhost:8000/api/v1".into(),
            ..Default::default()
        };
        let c = ApiClient::new(&cfg, None).unwrap();
        assert_eq!(c.url("/dashboard"), "http://localhost:8000/api/v1/dashboard");
        assert_eq!(c.url("expense/get"), "http://localhost:8000/api/v1/expense/get");
        assert!(!c.is_authenticated());
    }

    #[test]
    fn avatar_url_encodes_name() {
        assert_eq!(
            default_avatar_url("Ada Lovelace").unwrap(),
            "https://ui-avatars.com/api/?name=Ada+Lovelace"
        );
    }

    #[test]
    fn add_body_uses_kind_specific_field() {
        let new = NewTransaction {
            kind: TransactionKind::Income,
            icon: "Salary",
            label: "Acme".into(),
            amount: Decimal::new(250050, 2),
            date: NaiveDate::from_ymd_opt(2025, 3, 4).unwrap(),
        };
        let v = serde_json::to_value(AddBody::from_new(&new)).unwrap();
        assert_eq!(
            v,
            json!({
                "icon": "Salary",
                "source": "Acme",
                "amount": 2500.5,
                "date": "2025-03-04T00:00:00.000Z"
            })
        );
    }

    #[test]
    fn server_message_is_extracted() {
        assert_eq!(
            error_message(r#"{"message":"Invalid credentials"}"#).as_deref(),
            Some("Invalid credentials")
        );
        assert_eq!(error_message("<html>"), None);
    }
}
