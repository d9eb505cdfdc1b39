//! IBGE 地理数据 API 客户端
//!
//! 只读两个端点：州列表、某州的城市列表

use std::future::Future;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::config::{Config, RetryPolicy};
use crate::error::{AppError, Result};
use crate::models::{Region, SubRegion};

/// 远程地理数据源
#[async_trait]
pub trait GeoApi: Send + Sync {
    async fn list_regions(&self) -> Result<Vec<Region>>;
    async fn list_sub_regions(&self, region_code: &str) -> Result<Vec<SubRegion>>;
}

pub struct IbgeClient {
    client: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
}

impl IbgeClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("ecoleta/", env!("CARGO_PKG_VERSION")))
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            retry: config.retry_policy(),
        })
    }

    pub fn regions_url(&self) -> String {
        format!("{}/estados", self.base_url)
    }

    pub fn sub_regions_url(&self, region_code: &str) -> String {
        format!("{}/estados/{}/municipios", self.base_url, region_code)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let request_id = Uuid::new_v4();
        tracing::debug!(%request_id, url, "GET");

        let result =
            with_retry(self.retry, move |attempt| self.get_once(url, request_id, attempt)).await;
        match &result {
            Ok(_) => tracing::info!(%request_id, url, "request succeeded"),
            Err(e) => tracing::error!(%request_id, url, error = %e, "request failed"),
        }
        result
    }

    async fn get_once<T: DeserializeOwned>(
        &self,
        url: &str,
        request_id: Uuid,
        attempt: u32,
    ) -> Result<T> {
        tracing::debug!(%request_id, attempt, "sending");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await.map_err(|e| classify(url, e))?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl GeoApi for IbgeClient {
    async fn list_regions(&self) -> Result<Vec<Region>> {
        self.get_json(&self.regions_url()).await
    }

    async fn list_sub_regions(&self, region_code: &str) -> Result<Vec<SubRegion>> {
        self.get_json(&self.sub_regions_url(region_code)).await
    }
}

fn classify(url: &str, e: reqwest::Error) -> AppError {
    if e.is_timeout() {
        AppError::Timeout(url.to_string())
    } else {
        AppError::Http(e)
    }
}

/// 按策略重试瞬时错误，非瞬时错误立即返回
pub async fn with_retry<T, F, Fut>(policy: RetryPolicy, mut op: F) -> Result<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 1;
    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < policy.attempts && e.is_transient() => {
                tracing::warn!(attempt, error = %e, "transient failure, retrying");
                tokio::time::sleep(policy.delay_after(attempt)).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
