//! Upstream IPO data client.
//!
//! One logical request per run. Transport failures (connection errors,
//! timeouts, non-2xx statuses) are retried with exponential backoff; a body
//! that is not the expected JSON fails immediately since asking again would
//! return the same thing.

use std::future::Future;

use reqwest::header::{ACCEPT, COOKIE, HeaderMap, HeaderValue, REFERER};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::config::SourceConfig;
use crate::error::{HkIpoError, HkIpoResult};
use crate::record::RawIpoRecord;

/// A failed attempt that is worth retrying.
#[derive(Error, Debug, Clone)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Performs a single GET and returns the response body.
pub trait Transport {
    fn get(&self, url: &Url) -> impl Future<Output = Result<String, TransportError>> + Send;
}

/// reqwest-backed transport with the per-attempt timeout and browser-like headers
/// the endpoint expects.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: &SourceConfig) -> HkIpoResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/json, text/javascript, */*; q=0.01"),
        );
        headers.insert("x-requested-with", HeaderValue::from_static("XMLHttpRequest"));
        headers.insert(REFERER, header_value("referer", &config.referer)?);
        if let Some(cookie) = &config.cookie {
            headers.insert(COOKIE, header_value("cookie", cookie)?);
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .build()
            .map_err(|e| HkIpoError::Config(format!("Could not build HTTP client: {e}")))?;

        Ok(HttpTransport { client })
    }
}

fn header_value(name: &str, value: &str) -> HkIpoResult<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| HkIpoError::Config(format!("Invalid {name} header: {e}")))
}

impl Transport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<String, TransportError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| TransportError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError(format!("HTTP {status}")));
        }

        response
            .text()
            .await
            .map_err(|e| TransportError(format!("Failed to read body: {e}")))
    }
}

pub struct IpoClient<T = HttpTransport> {
    transport: T,
    config: SourceConfig,
}

impl IpoClient<HttpTransport> {
    pub fn new(config: &SourceConfig) -> HkIpoResult<Self> {
        Ok(IpoClient {
            transport: HttpTransport::new(config)?,
            config: config.clone(),
        })
    }
}

impl<T: Transport> IpoClient<T> {
    pub fn with_transport(transport: T, config: SourceConfig) -> Self {
        IpoClient { transport, config }
    }

    /// Endpoint URL with a cache-busting timestamp, as the site's own frontend sends it.
    pub fn endpoint_url(&self) -> HkIpoResult<Url> {
        let mut url = Url::parse(&self.config.base_url)
            .and_then(|base| base.join(&self.config.endpoint))
            .map_err(|e| HkIpoError::Config(format!("Invalid endpoint URL: {e}")))?;

        let millis = chrono::Utc::now().timestamp_millis();
        url.set_query(Some(&format!(
            "___jsl=LST___t={millis}&rp={}&page=1",
            self.config.page_size
        )));

        Ok(url)
    }

    /// Fetch the raw response body, retrying transport failures.
    pub async fn fetch_body(&self) -> HkIpoResult<String> {
        let url = self.endpoint_url()?;
        let attempts = self.config.max_retries.max(1);
        let mut last_error = TransportError("no attempt made".into());

        for attempt in 1..=attempts {
            log::debug!("Requesting {url} (attempt {attempt}/{attempts})");

            match self.transport.get(&url).await {
                Ok(body) => {
                    log::debug!("Received {} bytes", body.len());
                    return Ok(body);
                }
                Err(e) => {
                    log::warn!("Request failed: {e}");
                    last_error = e;

                    if attempt < attempts {
                        let delay = self.config.retry_delay(attempt);
                        log::debug!("Retrying in {}ms", delay.as_millis());
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        log::error!("Giving up after {attempts} attempt(s): {last_error}");
        Err(HkIpoError::Fetch {
            attempts,
            cause: last_error.to_string(),
        })
    }

    /// Fetch and decode the IPO rows.
    pub async fn fetch(&self) -> HkIpoResult<Vec<RawIpoRecord>> {
        let body = self.fetch_body().await?;
        parse_response(&body)
    }
}

#[derive(Deserialize)]
struct Envelope {
    rows: Vec<Row>,
}

#[derive(Deserialize)]
struct Row {
    #[serde(default)]
    cell: RawIpoRecord,
}

/// Decode an upstream body into its rows' `cell` objects.
pub fn parse_response(body: &str) -> HkIpoResult<Vec<RawIpoRecord>> {
    let envelope: Envelope = serde_json::from_str(body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        log::error!("Failed to parse response: {e}. Body starts with: {preview}");
        HkIpoError::Parse(e.to_string())
    })?;

    log::info!("Found {} IPO entries", envelope.rows.len());
    Ok(envelope.rows.into_iter().map(|row| row.cell).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    const BODY: &str = r#"{
        "page": 1,
        "rows": [
            {"id": "07001", "cell": {"stock_cd": "07001", "stock_nm": "Alpha", "list_dt2": "2024-12-15"}},
            {"id": "07002", "cell": {"stock_cd": "07002", "stock_nm": "Beta", "extra": [1, 2, 3]}}
        ],
        "total": 2
    }"#;

    struct ScriptedTransport {
        script: Mutex<VecDeque<Result<String, TransportError>>>,
        calls: AtomicU32,
    }

    impl ScriptedTransport {
        fn new(script: Vec<Result<String, TransportError>>) -> Self {
            ScriptedTransport {
                script: Mutex::new(script.into()),
                calls: AtomicU32::new(0),
            }
        }
    }

    impl Transport for ScriptedTransport {
        async fn get(&self, _url: &Url) -> Result<String, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError("script exhausted".into())))
        }
    }

    fn config(max_retries: u32) -> SourceConfig {
        SourceConfig {
            max_retries,
            retry_base_delay_ms: 0,
            ..Default::default()
        }
    }

    fn timeout() -> Result<String, TransportError> {
        Err(TransportError("operation timed out".into()))
    }

    #[tokio::test]
    async fn test_succeeds_on_third_attempt() {
        let transport = ScriptedTransport::new(vec![
            timeout(),
            Err(TransportError("HTTP 502 Bad Gateway".into())),
            Ok(BODY.to_string()),
        ]);
        let client = IpoClient::with_transport(transport, config(3));

        let rows = client.fetch().await.unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(client.transport.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let transport = ScriptedTransport::new(vec![timeout(), timeout(), timeout(), Ok(BODY.into())]);
        let client = IpoClient::with_transport(transport, config(3));

        let err = client.fetch().await.unwrap_err();

        match err {
            HkIpoError::Fetch { attempts, cause } => {
                assert_eq!(attempts, 3);
                assert!(cause.contains("timed out"), "cause: {cause}");
            }
            other => panic!("expected Fetch error, got {other:?}"),
        }
        assert_eq!(client.transport.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_malformed_body_is_not_retried() {
        let transport = ScriptedTransport::new(vec![
            Ok("<html>please log in</html>".into()),
            Ok(BODY.into()),
        ]);
        let client = IpoClient::with_transport(transport, config(3));

        let err = client.fetch().await.unwrap_err();

        assert!(matches!(err, HkIpoError::Parse(_)), "got {err:?}");
        assert_eq!(client.transport.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_zero_retries_still_attempts_once() {
        let transport = ScriptedTransport::new(vec![Ok(BODY.into())]);
        let client = IpoClient::with_transport(transport, config(0));

        assert_eq!(client.fetch().await.unwrap().len(), 2);
    }

    #[test]
    fn test_parse_response_keeps_cells() {
        let rows = parse_response(BODY).unwrap();
        assert_eq!(rows[0]["stock_nm"], "Alpha");
        assert_eq!(rows[1]["extra"][2], 3);
    }

    #[test]
    fn test_parse_response_requires_rows() {
        assert!(matches!(parse_response(r#"{"page": 1}"#), Err(HkIpoError::Parse(_))));
        assert!(matches!(parse_response(""), Err(HkIpoError::Parse(_))));
        assert!(parse_response(r#"{"rows": []}"#).unwrap().is_empty());
    }

    #[test]
    fn test_endpoint_url() {
        let transport = ScriptedTransport::new(vec![]);
        let client = IpoClient::with_transport(transport, SourceConfig::default());

        let url = client.endpoint_url().unwrap();

        assert_eq!(url.host_str(), Some("www.jisilu.cn"));
        assert_eq!(url.path(), "/data/new_stock/hkipo/");
        let query = url.query().unwrap();
        assert!(query.starts_with("___jsl=LST___t="), "query: {query}");
        assert!(query.ends_with("&rp=50&page=1"), "query: {query}");
    }
}
