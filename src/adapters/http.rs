use crate::adapters::retry::RetryPolicy;
use crate::config::Settings;
use crate::core::normalize::extract_product_list;
use crate::domain::ports::ProductSource;
use crate::utils::error::{GeneratorError, Result};
use crate::utils::validation::validate_required_field;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, RETRY_AFTER};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Guards against APIs that never report their last page.
const PAGE_CEILING: usize = 10_000;
const ERROR_BODY_EXCERPT: usize = 200;

/// Pagination hints from a response body.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub total_pages: Option<usize>,
    pub has_next: Option<bool>,
}

impl PageInfo {
    pub fn from_body(body: &Value) -> Self {
        let scopes = [body.get("pagination"), body.get("meta"), Some(body)];
        let mut info = PageInfo::default();

        for scope in scopes.into_iter().flatten() {
            if info.total_pages.is_none() {
                info.total_pages = ["totalPages", "total_pages", "pages", "lastPage"]
                    .iter()
                    .find_map(|key| scope.get(*key).and_then(Value::as_u64))
                    .map(|n| n as usize);
            }
            if info.has_next.is_none() {
                info.has_next = ["hasNextPage", "hasNext", "has_next"]
                    .iter()
                    .find_map(|key| scope.get(*key).and_then(Value::as_bool));
            }
        }
        info
    }
}

/// Paginated `GET` against the landing pages API, one request at a time.
pub struct ApiSource {
    client: Client,
    url: String,
    token: String,
    page_size: usize,
    max_pages: Option<usize>,
    policy: RetryPolicy,
}

impl ApiSource {
    pub fn new(
        url: String,
        token: String,
        page_size: usize,
        max_pages: Option<usize>,
        policy: RetryPolicy,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("product-pages/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            url,
            token,
            page_size,
            max_pages,
            policy,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let url = validate_required_field("api_base_url", &settings.api_url())?.clone();
        let token = validate_required_field("api_token", &settings.api.token)?.clone();

        Self::new(
            url,
            token,
            settings.page_size(),
            settings.api.max_pages,
            RetryPolicy::new(settings.api.retries, settings.api.retry_delay_ms),
            Duration::from_secs(settings.api.timeout_secs),
        )
    }

    /// One page, retrying transient statuses per the policy.
    pub async fn fetch_page(&self, page: usize) -> Result<Value> {
        let page_url = format!("{}?page={}&limit={}", self.url, page, self.page_size);
        let mut attempt = 0;

        loop {
            attempt += 1;
            tracing::debug!("GET {} (attempt {})", page_url, attempt);

            let response = self
                .client
                .get(&self.url)
                .bearer_auth(&self.token)
                .header(ACCEPT, "application/json")
                .query(&[
                    ("page", page.to_string()),
                    ("limit", self.page_size.to_string()),
                ])
                .send()
                .await?;

            let status = response.status();
            if status.is_success() {
                let text = response.text().await?;
                return serde_json::from_str(&text).map_err(|e| GeneratorError::InvalidResponse {
                    message: format!("page {} is not valid JSON: {}", page, e),
                });
            }

            if RetryPolicy::is_retryable(status) {
                if attempt >= self.policy.max_attempts() {
                    return Err(GeneratorError::RetriesExhausted {
                        status: status.as_u16(),
                        url: page_url,
                        attempts: attempt,
                    });
                }

                let retry_after = response
                    .headers()
                    .get(RETRY_AFTER)
                    .and_then(|v| v.to_str().ok());
                let delay = self.policy.delay_for(attempt, retry_after);
                tracing::warn!(
                    "HTTP {} on page {} (attempt {}/{}), retrying in {}ms",
                    status.as_u16(),
                    page,
                    attempt,
                    self.policy.max_attempts(),
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
                continue;
            }

            let body = response.text().await.unwrap_or_default();
            return Err(GeneratorError::ApiStatusError {
                status: status.as_u16(),
                url: page_url,
                body: body.chars().take(ERROR_BODY_EXCERPT).collect(),
            });
        }
    }
}

#[async_trait]
impl ProductSource for ApiSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn fetch(&self) -> Result<Vec<Value>> {
        let mut records = Vec::new();
        let mut page = 1;

        loop {
            let body = self.fetch_page(page).await?;
            if !body.is_object() && !body.is_array() {
                return Err(GeneratorError::InvalidResponse {
                    message: format!("page {} is neither an object nor an array", page),
                });
            }

            let info = PageInfo::from_body(&body);
            let items = extract_product_list(body);
            let count = items.len();
            records.extend(items);

            match info.total_pages {
                Some(total) => tracing::info!("Fetched page {}/{} ({} products)", page, total, count),
                None => tracing::info!("Fetched page {} ({} products)", page, count),
            }

            if count == 0 {
                break;
            }
            if self.max_pages.is_some_and(|max| page >= max) {
                tracing::info!("Stopping at --max-pages {}", page);
                break;
            }
            match (info.total_pages, info.has_next) {
                (_, Some(false)) => break,
                (Some(total), _) if page >= total => break,
                (None, None) if count < self.page_size => break,
                _ => {}
            }
            if page >= PAGE_CEILING {
                tracing::warn!("Stopping after {} pages without an end marker", PAGE_CEILING);
                break;
            }

            page += 1;
        }

        Ok(records)
    }
}
