//! Quota service gateway
//!
//! Fetches a fresh limit/usage pair per enforcement decision. Nothing is cached.

use async_trait::async_trait;
use log::debug;
use serde::Deserialize;
use std::time::Duration;

use crate::error::QuotaError;
use crate::identity::NumericIdentity;

/// Limit and usage of one identity, both in KiB
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuotaSnapshot {
    pub limit: f64,
    pub current_usage: f64,
}

impl QuotaSnapshot {
    /// KiB still free; negative when the account is already over its limit
    pub fn remaining(&self) -> f64 {
        self.limit - self.current_usage
    }
}

#[async_trait]
pub trait QuotaService: Send + Sync {
    async fn fetch_quota(&self, identity: NumericIdentity) -> Result<QuotaSnapshot, QuotaError>;
}

/// Wire format of the quota service
#[derive(Debug, Deserialize)]
struct QuotaResponse {
    quota_limit: f64,
    current_usage: f64,
}

/// HTTP client for `GET {base_url}/quota/{uid}`
#[derive(Debug, Clone)]
pub struct HttpQuotaService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpQuotaService {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, QuotaError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| QuotaError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl QuotaService for HttpQuotaService {
    async fn fetch_quota(&self, identity: NumericIdentity) -> Result<QuotaSnapshot, QuotaError> {
        let url = format!("{}/quota/{}", self.base_url, identity);
        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                QuotaError::Timeout
            } else {
                QuotaError::Transport(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            return Err(QuotaError::Status(response.status().as_u16()));
        }

        let body: QuotaResponse = response
            .json()
            .await
            .map_err(|e| QuotaError::Malformed(e.to_string()))?;

        if !body.quota_limit.is_finite()
            || !body.current_usage.is_finite()
            || body.quota_limit < 0.0
            || body.current_usage < 0.0
        {
            return Err(QuotaError::Malformed(format!("{body:?}")));
        }

        debug!(
            "Quota for uid {}: {} KiB used of {} KiB",
            identity, body.current_usage, body.quota_limit
        );

        Ok(QuotaSnapshot {
            limit: body.quota_limit,
            current_usage: body.current_usage,
        })
    }
}
