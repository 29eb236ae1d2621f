use std::time::Duration;

use futures_util::future::BoxFuture;
use rand::Rng;
use reqwest::StatusCode;
use tokio::time::sleep;
use tracing::debug;
use url::Url;

use super::TemplateSource;
use crate::error::TemplateError;

/// Transient failures are retried up to three times, backing off from 250ms.
const DEFAULT_RETRY_BASE: Duration = Duration::from_millis(250);
const MAX_RETRIES: u32 = 3;

fn is_transient(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::REQUEST_TIMEOUT
            | StatusCode::TOO_MANY_REQUESTS
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    )
}

/// Doubling delay for `retry` (0-based) plus up to a quarter of jitter.
fn backoff(base: Duration, retry: u32) -> Duration {
    let delay = base.saturating_mul(1u32.checked_shl(retry).unwrap_or(u32::MAX));
    let max_jitter = delay.as_millis() as u64 / 4;
    if max_jitter == 0 {
        return delay;
    }
    delay + Duration::from_millis(rand::thread_rng().gen_range(0..=max_jitter))
}

/// Fragments fetched relative to an HTTP base URL.
#[derive(Debug, Clone)]
pub struct HttpTemplates {
    client: reqwest::Client,
    base: Url,
    timeout: Duration,
    retry_base: Duration,
}

impl HttpTemplates {
    /// `base` should end with `/` when fragments live below a path.
    pub fn new(base: Url, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            base,
            timeout,
            retry_base: DEFAULT_RETRY_BASE,
        }
    }

    #[cfg(test)]
    fn with_retry_base(mut self, retry_base: Duration) -> Self {
        self.retry_base = retry_base;
        self
    }

    pub fn fragment_url(&self, name: &str) -> Result<Url, TemplateError> {
        self.base
            .join(name)
            .map_err(|source| TemplateError::InvalidUrl {
                name: name.to_string(),
                source,
            })
    }

    /// GET `url`, retrying connect errors, timeouts and transient statuses.
    /// The last response is returned whatever its status.
    async fn get(&self, name: &str, url: &Url) -> Result<reqwest::Response, reqwest::Error> {
        let mut retry = 0;
        loop {
            let reason = match self.client.get(url.clone()).timeout(self.timeout).send().await {
                Ok(response) if retry < MAX_RETRIES && is_transient(response.status()) => {
                    response.status().to_string()
                }
                Err(e) if retry < MAX_RETRIES && (e.is_timeout() || e.is_connect()) => e.to_string(),
                result => return result,
            };

            let delay = backoff(self.retry_base, retry);
            retry += 1;
            debug!(
                "Template '{}': {}; retry {}/{} in {:?}",
                name, reason, retry, MAX_RETRIES, delay
            );
            sleep(delay).await;
        }
    }
}

impl TemplateSource for HttpTemplates {
    fn describe(&self) -> String {
        format!("http {}", self.base)
    }

    fn fetch<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<String, TemplateError>> {
        Box::pin(async move {
            let url = self.fragment_url(name)?;
            let request_error = |e: reqwest::Error| TemplateError::Request {
                name: name.to_string(),
                message: e.to_string(),
            };

            let response = self.get(name, &url).await.map_err(request_error)?;

            let status = response.status();
            if status == StatusCode::NOT_FOUND {
                return Err(TemplateError::NotFound(name.to_string()));
            }
            if !status.is_success() {
                return Err(TemplateError::Status {
                    name: name.to_string(),
                    status: status.as_u16(),
                });
            }

            response.text().await.map_err(request_error)
        })
    }
}
