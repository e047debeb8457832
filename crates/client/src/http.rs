//! HTTP allocation strategy.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use pennyplan_core::allocation::{
    AllocationRequest, AllocationStrategy, ProposedBucket, StrategyError,
};
use pennyplan_shared::config::AllocationConfig;
use reqwest::Url;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use crate::error::ClientError;

/// Request body sent to the allocation service.
#[derive(Debug, Serialize)]
struct AllocateBody<'a> {
    budget: i64,
    plan_type: &'a str,
    extra_config: Value,
}

/// Strategy that POSTs the remainder to a remote service.
#[derive(Debug, Clone)]
pub struct HttpAllocationStrategy {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpAllocationStrategy {
    /// Creates a strategy calling `endpoint` with a per-request `timeout`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidEndpoint` if `endpoint` is not an
    /// absolute http(s) URL, or `ClientError::Http` if the client cannot be
    /// built.
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, ClientError> {
        let invalid = |reason: String| ClientError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason,
        };
        let url = Url::parse(endpoint).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
        }

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        tracing::info!(endpoint = %url, timeout_ms = timeout.as_millis(), "HTTP allocation strategy initialized");
        Ok(Self {
            client,
            endpoint: url,
        })
    }

    /// Builds the strategy from configuration, or `None` when no endpoint
    /// is configured.
    ///
    /// # Errors
    ///
    /// Same as [`HttpAllocationStrategy::new`].
    pub fn from_config(config: &AllocationConfig) -> Result<Option<Self>, ClientError> {
        config
            .endpoint
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .map(|endpoint| Self::new(endpoint, Duration::from_secs(config.timeout_secs)))
            .transpose()
    }

    /// The endpoint requests are sent to.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl AllocationStrategy for HttpAllocationStrategy {
    fn name(&self) -> &str {
        "http"
    }

    async fn allocate(
        &self,
        request: &AllocationRequest,
    ) -> Result<Vec<ProposedBucket>, StrategyError> {
        let body = AllocateBody {
            budget: request.remainder.minor(),
            plan_type: request.plan.plan_type().as_str(),
            extra_config: request.plan.extra_config(),
        };

        tracing::debug!(endpoint = %self.endpoint, remainder = %request.remainder, "requesting allocation");

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(StrategyError::Malformed(format!(
                "allocation service answered {status}"
            )));
        }

        let value: Value = response.json().await.map_err(|e| {
            if e.is_timeout() {
                StrategyError::Timeout
            } else {
                StrategyError::Malformed(format!("response is not JSON: {e}"))
            }
        })?;

        parse_buckets(&value)
    }
}

fn transport_error(err: reqwest::Error) -> StrategyError {
    if err.is_timeout() {
        StrategyError::Timeout
    } else {
        StrategyError::Unreachable(err.to_string())
    }
}

/// Reads a service response: a JSON object of bucket name to number.
///
/// Buckets come back in the object's key order. Numbers may be fractional;
/// numeric strings are not accepted.
///
/// # Errors
///
/// Returns `StrategyError::Malformed` if the value is not an object or any
/// value is not a number.
pub fn parse_buckets(value: &Value) -> Result<Vec<ProposedBucket>, StrategyError> {
    let Value::Object(map) = value else {
        return Err(StrategyError::Malformed(format!(
            "expected an object of bucket amounts, got {value}"
        )));
    };

    map.iter()
        .map(|(name, amount)| {
            let Value::Number(number) = amount else {
                return Err(StrategyError::Malformed(format!(
                    "bucket '{name}' is not a number: {amount}"
                )));
            };
            let text = number.to_string();
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .map(|value| ProposedBucket::new(name.clone(), value))
                .map_err(|e| StrategyError::Malformed(format!("bucket '{name}': {e}")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_parse_numbers() {
        let buckets = parse_buckets(&json!({"reserve": 300, "growth": 200.5})).unwrap();
        assert_eq!(
            buckets,
            vec![
                ProposedBucket::new("growth", dec!(200.5)),
                ProposedBucket::new("reserve", dec!(300)),
            ]
        );
    }

    #[rstest]
    #[case(json!([300, 200]))]
    #[case(json!("300"))]
    #[case(json!(null))]
    #[case(json!({"reserve": "300"}))]
    #[case(json!({"reserve": null}))]
    #[case(json!({"reserve": {"value": 300}}))]
    fn test_parse_rejects_malformed(#[case] value: Value) {
        assert!(matches!(
            parse_buckets(&value),
            Err(StrategyError::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_empty_object_is_left_to_allocator() {
        assert_eq!(parse_buckets(&json!({})).unwrap(), vec![]);
    }

    #[rstest]
    #[case("not a url")]
    #[case("ftp://example.com/allocate")]
    fn test_new_rejects_bad_endpoints(#[case] endpoint: &str) {
        assert!(matches!(
            HttpAllocationStrategy::new(endpoint, Duration::from_secs(1)),
            Err(ClientError::InvalidEndpoint { .. })
        ));
    }

    #[test]
    fn test_from_config_without_endpoint() {
        let config = AllocationConfig::default();
        assert!(HttpAllocationStrategy::from_config(&config).unwrap().is_none());

        let config = AllocationConfig {
            endpoint: Some("http://localhost:9000/allocate".into()),
            timeout_secs: 3,
        };
        let strategy = HttpAllocationStrategy::from_config(&config).unwrap().unwrap();
        assert_eq!(strategy.endpoint().as_str(), "http://localhost:9000/allocate");
    }
}
