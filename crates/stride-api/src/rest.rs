// REST client for the stride server API.
//
// Every entity collection follows one convention under /api/:
//   GET    /api/<resource>          list (paged, total in x-total-count)
//   GET    /api/<resource>/:id      fetch one
//   POST   /api/<resource>          create
//   PUT    /api/<resource>/:id      update
//   DELETE /api/<resource>/:id      delete
//
// Auth is a bearer token injected as a default header; issuing the token
// is the identity service's business, not ours.

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::Error;
use crate::transport::TransportConfig;

/// Response header carrying the total record count for paged lists.
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

// ── Paging ───────────────────────────────────────────────────────────

/// Query parameters for paged list endpoints (`?page=&size=&sort=`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    /// Zero-based page index.
    pub page: u32,
    /// Records per page.
    pub size: u32,
    /// Sort expression, e.g. `id,asc` or `recordDate,desc`.
    pub sort: Option<String>,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: 0,
            size: 20,
            sort: Some("id,asc".into()),
        }
    }
}

impl PageQuery {
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size,
            sort: None,
        }
    }

    /// Replace the sort expression.
    #[must_use]
    pub fn sorted(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.to_string()),
            ("size", self.size.to_string()),
        ];
        if let Some(ref sort) = self.sort {
            params.push(("sort", sort.clone()));
        }
        params
    }
}

/// One page of a list response: the records plus the server-reported total.
///
/// `total_items` comes from the `x-total-count` header and is usually
/// larger than `items.len()`.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_items: u64,
}

// ── Error response shape ─────────────────────────────────────────────

/// RFC 7807 problem body, as far as we care about it.
#[derive(serde::Deserialize)]
struct ProblemBody {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the stride server's JSON REST API.
///
/// Cheap to clone is not a goal here; `stride-core` wraps one instance in
/// an `Arc` and shares it across all entity services.
pub struct RestClient {
    http: reqwest::Client,
    base_url: Url,
}

impl RestClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a server URL, an optional bearer token, and transport
    /// settings. The token is injected as a default `Authorization`
    /// header on every request and marked sensitive so it never shows up
    /// in debug output.
    pub fn new(
        base_url: &str,
        token: Option<&SecretString>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        if let Some(token) = token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|_| Error::InvalidToken)?;
            value.set_sensitive(true);
            headers.insert(reqwest::header::AUTHORIZATION, value);
        }

        let http = transport.build_client_with_headers(headers)?;
        let base_url = Self::normalize_base_url(base_url)?;

        Ok(Self { http, base_url })
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Parse and normalize so the stored URL always ends with `/`.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    // ── URL helpers ──────────────────────────────────────────────────

    /// Collection path for a resource, e.g. `api/user-infos`.
    pub fn collection_path(resource: &str) -> String {
        format!("api/{resource}")
    }

    /// Single-record path, e.g. `api/user-infos/42`.
    pub fn entity_path(resource: &str, id: i64) -> String {
        format!("api/{resource}/{id}")
    }

    /// Join a relative path (e.g. `api/user-infos`) onto the base URL.
    fn url(&self, path: &str) -> Url {
        // base_url always ends with `/`, so joining relative paths works.
        self.base_url
            .join(path)
            .expect("path should be valid relative URL")
    }

    // ── Entity collection verbs ──────────────────────────────────────

    /// Fetch one page of a collection, reading the total record count
    /// from the `x-total-count` header. A missing or unparseable header
    /// falls back to the page length.
    pub async fn get_list<T: DeserializeOwned>(
        &self,
        resource: &str,
        query: &PageQuery,
    ) -> Result<Page<T>, Error> {
        let url = self.url(&Self::collection_path(resource));
        debug!("GET {url} page={} size={}", query.page, query.size);

        let resp = self.http.get(url).query(&query.params()).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(self.parse_error(status, resp).await);
        }

        let header_total = resp
            .headers()
            .get(TOTAL_COUNT_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());

        let body = resp.text().await?;
        let items: Vec<T> = serde_json::from_str(&body).map_err(|e| {
            let preview = &body[..body.len().min(200)];
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })?;

        let total_items = match header_total {
            Some(total) => total,
            None => {
                warn!("{TOTAL_COUNT_HEADER} header missing on {resource} list; using page length");
                u64::try_from(items.len()).unwrap_or(u64::MAX)
            }
        };

        Ok(Page { items, total_items })
    }

    /// Fetch a single record by id.
    pub async fn get_one<T: DeserializeOwned>(&self, resource: &str, id: i64) -> Result<T, Error> {
        self.get(&Self::entity_path(resource, id)).await
    }

    /// Create a record; returns the server's copy (with assigned id).
    pub async fn create<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        resource: &str,
        body: &B,
    ) -> Result<T, Error> {
        self.post(&Self::collection_path(resource), body).await
    }

    /// Replace a record; returns the server's updated copy.
    pub async fn update<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        resource: &str,
        id: i64,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(&Self::entity_path(resource, id));
        debug!("PUT {url}");

        let resp = self.http.put(url).json(body).send().await?;
        self.handle_response(resp).await
    }

    /// Delete a record. The response body, if any, is discarded.
    pub async fn remove(&self, resource: &str, id: i64) -> Result<(), Error> {
        let url = self.url(&Self::entity_path(resource, id));
        debug!("DELETE {url}");

        let resp = self.http.delete(url).send().await?;
        self.handle_empty(resp).await
    }

    // ── Plain-path verbs (account and friends) ───────────────────────

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path);
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        self.handle_response(resp).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path);
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        self.handle_response(resp).await
    }

    /// POST where the server answers with an empty body (e.g. saving the
    /// signed-in account).
    pub async fn post_empty<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<(), Error> {
        let url = self.url(path);
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        self.handle_empty(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview = &body[..body.len().min(200)];
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn handle_empty(&self, resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn parse_error(&self, status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Error::InvalidToken;
        }

        let raw = resp.text().await.unwrap_or_default();

        let message = serde_json::from_str::<ProblemBody>(&raw)
            .ok()
            .and_then(|p| p.detail.or(p.title))
            .unwrap_or_else(|| {
                if raw.is_empty() {
                    status.to_string()
                } else {
                    raw.clone()
                }
            });

        if status == reqwest::StatusCode::FORBIDDEN {
            return Error::Forbidden { message };
        }

        Error::Api {
            status: status.as_u16(),
            message,
        }
    }
}
