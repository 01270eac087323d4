//! # HTTP Data Service
//!
//! [`RestService`] talks to a hosted PostgREST endpoint (`{base}/rest/v1/{table}`), the
//! request/response API exposed by the backend-as-a-service the dashboard runs against.
//!
//! | Contract | HTTP |
//! |----------|------|
//! | `select` | `GET ?select=*,embed(col)&col=op.value&order=col.asc` |
//! | `insert` | `POST` with `Prefer: return=representation` |
//! | `update` | `PATCH ?id=eq.{id}` with `Prefer: return=representation` |
//! | `delete` | `DELETE ?id=eq.{id}` with `Prefer: return=representation` |
//! | `count`  | `HEAD` with `Prefer: count=exact`, read from `Content-Range` |

use crate::framework::error::RemoteError;
use crate::framework::query::Query;
use crate::framework::service::DataService;
use async_trait::async_trait;
use reqwest::{header, Method, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

const REPRESENTATION: &str = "return=representation";
const EXACT_COUNT: &str = "count=exact";

/// Error body returned by PostgREST.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// [`DataService`] over HTTP.
pub struct RestService {
    http: reqwest::Client,
    base_url: String,
    api_key: SecretString,
}

impl RestService {
    pub fn new(base_url: impl Into<String>, api_key: SecretString) -> Result<Self, RemoteError> {
        let http = reqwest::Client::builder().build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            http,
            base_url,
            api_key,
        })
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        let key = self.api_key.expose_secret();
        self.http
            .request(method, format!("{}/rest/v1/{}", self.base_url, table))
            .header("apikey", key)
            .bearer_auth(key)
    }

    async fn rows(&self, builder: RequestBuilder) -> Result<Vec<Value>, RemoteError> {
        let response = check(builder.send().await?).await?;
        Ok(response.json().await?)
    }
}

/// Query string pairs for a select/count request.
fn params(query: &Query) -> Vec<(String, String)> {
    let select = std::iter::once("*")
        .chain(query.embeds.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(",");
    let mut params = vec![("select".to_string(), select)];
    for condition in &query.conditions {
        params.push((
            condition.column.clone(),
            format!("{}.{}", condition.comparison.operator(), literal(&condition.value)),
        ));
    }
    if let Some(order) = &query.order {
        let direction = if order.ascending { "asc" } else { "desc" };
        params.push(("order".to_string(), format!("{}.{}", order.column, direction)));
    }
    params
}

fn id_filter(id: &Value) -> [(String, String); 1] {
    [("id".to_string(), format!("eq.{}", literal(id)))]
}

fn literal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

async fn check(response: Response) -> Result<Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or(if body.is_empty() {
            status.canonical_reason().unwrap_or("request failed").to_string()
        } else {
            body
        });
    warn!(status = status.as_u16(), %message, "Request rejected");
    Err(RemoteError::Status {
        status: status.as_u16(),
        message,
    })
}

/// Parses the total out of `Content-Range: 0-24/3573` or `*/0`.
fn total_from_range(range: &str) -> Option<u64> {
    range.rsplit_once('/')?.1.parse().ok()
}

#[async_trait]
impl DataService for RestService {
    #[instrument(skip(self, query))]
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Value>, RemoteError> {
        let rows = self
            .rows(self.request(Method::GET, table).query(&params(query)))
            .await?;
        debug!(count = rows.len(), "Selected");
        Ok(rows)
    }

    #[instrument(skip(self, row))]
    async fn insert(&self, table: &str, row: Value) -> Result<Value, RemoteError> {
        let rows = self
            .rows(
                self.request(Method::POST, table)
                    .header("Prefer", REPRESENTATION)
                    .json(&row),
            )
            .await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| RemoteError::Decode(format!("insert into {table} returned no row")))
    }

    #[instrument(skip(self, patch))]
    async fn update(&self, table: &str, id: &Value, patch: Value) -> Result<Value, RemoteError> {
        let rows = self
            .rows(
                self.request(Method::PATCH, table)
                    .query(&id_filter(id))
                    .header("Prefer", REPRESENTATION)
                    .json(&patch),
            )
            .await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| RemoteError::not_found(table, literal(id)))
    }

    #[instrument(skip(self))]
    async fn delete(&self, table: &str, id: &Value) -> Result<(), RemoteError> {
        let rows = self
            .rows(
                self.request(Method::DELETE, table)
                    .query(&id_filter(id))
                    .header("Prefer", REPRESENTATION),
            )
            .await?;
        if rows.is_empty() {
            return Err(RemoteError::not_found(table, literal(id)));
        }
        Ok(())
    }

    #[instrument(skip(self, query))]
    async fn count(&self, table: &str, query: &Query) -> Result<u64, RemoteError> {
        let response = self
            .request(Method::HEAD, table)
            .query(&params(query))
            .header("Prefer", EXACT_COUNT)
            .send()
            .await?;
        let response = check(response).await?;
        response
            .headers()
            .get(header::CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .and_then(total_from_range)
            .ok_or_else(|| RemoteError::Decode("missing Content-Range total".to_string()))
    }
}
