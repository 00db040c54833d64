// Census API HTTP client.
// Handles the optional API key, request accounting, and response status mapping.

use std::sync::atomic::{AtomicU64, Ordering};

use reqwest::{
    Client, Response, StatusCode,
    header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT},
};
use tracing::debug;

use crate::error::{CensusError, Result};

const CENSUS_API_BASE: &str = "https://api.census.gov/data";

/// Census data API client for one dataset vintage.
pub struct CensusClient {
    client: Client,
    base_url: String,
    dataset: String,
    year: u16,
    api_key: Option<String>,
    requests: AtomicU64,
}

impl CensusClient {
    /// Create a client for the given dataset (e.g. "acs5") and year.
    pub fn new(dataset: &str, year: u16, api_key: Option<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("censusview"));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(CensusError::Api)?;

        Ok(Self {
            client,
            base_url: CENSUS_API_BASE.to_string(),
            dataset: dataset.to_string(),
            year,
            api_key,
            requests: AtomicU64::new(0),
        })
    }

    /// Point the client at a different API host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Number of requests sent by this client.
    pub fn request_count(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    /// Dataset endpoint, e.g. https://api.census.gov/data/2019/acs/acs5.
    pub fn endpoint(&self) -> String {
        format!("{}/{}/acs/{}", self.base_url, self.year, self.dataset)
    }

    /// Make a GET request to the dataset endpoint with query parameters.
    pub async fn get_with_params(&self, params: &[(&str, String)]) -> Result<Response> {
        let url = self.endpoint();
        let mut request = self.client.get(&url).query(params);
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key.as_str())]);
        }

        debug!(url = %url, "census request");
        let response = request.send().await.map_err(CensusError::Api)?;
        self.requests.fetch_add(1, Ordering::Relaxed);

        check_response(response).await
    }
}

/// Check response status and convert errors.
async fn check_response(response: Response) -> Result<Response> {
    match response.status() {
        StatusCode::OK | StatusCode::NO_CONTENT => Ok(response),
        StatusCode::NOT_FOUND => {
            let url = response.url().to_string();
            Err(CensusError::NotFound(url))
        }
        status => Err(CensusError::Other(format!(
            "HTTP {}: {}",
            status,
            response.text().await.unwrap_or_default().trim()
        ))),
    }
}

/// Single-shot local HTTP server for exercising the client without the network.
#[cfg(test)]
pub(crate) mod test_server {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Answer one request with `status` and `body`. Returns the base URL and a
    /// handle resolving to the request target (path and query).
    pub async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let response = if status.starts_with("204") {
                format!("HTTP/1.1 {status}\r\nconnection: close\r\n\r\n")
            } else {
                format!(
                    "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                )
            };
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();

            let request = String::from_utf8_lossy(&request);
            request
                .lines()
                .next()
                .and_then(|line| line.split(' ').nth(1))
                .unwrap_or_default()
                .to_string()
        });

        (base_url, handle)
    }

    /// Decoded query pairs of a request target.
    pub fn query_pairs(target: &str) -> Vec<(String, String)> {
        reqwest::Url::parse(&format!("http://localhost{target}"))
            .unwrap()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }
}
