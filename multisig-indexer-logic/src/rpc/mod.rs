use std::{
    future::Future,
    num::{NonZeroU32, NonZeroUsize},
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use alloy::primitives::Address;
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use lru::LruCache;
use serde::{Deserialize, Serialize};
use serde_json::json;
use serde_with::serde_as;
use tokio::sync::Mutex;

pub mod types;

pub use types::{LogFilter, RawLog, RpcError};

use types::JsonRpcResponse;

type Limiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

#[serde_as]
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RpcSettings {
    pub url: String,

    #[serde(default = "default_method_namespace")]
    pub method_namespace: String,

    #[serde(default = "default_max_requests")]
    pub max_requests: u32,

    #[serde(default = "default_window")]
    #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
    pub window: Duration,

    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_retry_backoff")]
    #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
    pub retry_backoff: Duration,

    #[serde(default = "default_retry_backoff_ceiling")]
    #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
    pub retry_backoff_ceiling: Duration,

    #[serde(default = "default_timestamp_cache_size")]
    pub timestamp_cache_size: usize,
}

fn default_method_namespace() -> String {
    "quai".to_string()
}

fn default_max_requests() -> u32 {
    50
}

fn default_window() -> Duration {
    Duration::from_millis(1000)
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_backoff() -> Duration {
    Duration::from_millis(1000)
}

fn default_retry_backoff_ceiling() -> Duration {
    Duration::from_secs(30)
}

fn default_timestamp_cache_size() -> usize {
    1000
}

impl Default for RpcSettings {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:8545".to_string(),
            method_namespace: default_method_namespace(),
            max_requests: default_max_requests(),
            window: default_window(),
            max_attempts: default_max_attempts(),
            retry_backoff: default_retry_backoff(),
            retry_backoff_ceiling: default_retry_backoff_ceiling(),
            timestamp_cache_size: default_timestamp_cache_size(),
        }
    }
}

pub(crate) struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
    pub backoff_ceiling: Duration,
}

/// Runs `op` up to `max_attempts` times with exponential backoff between
/// attempts. All error kinds are retried uniformly; the last error is
/// surfaced once the budget is spent.
pub(crate) async fn with_retries<T, F, Fut>(
    policy: &RetryPolicy,
    method: &str,
    mut op: F,
) -> Result<T, RpcError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, RpcError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut backoff = policy.backoff;
    let mut attempt = 0;
    loop {
        attempt += 1;
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < max_attempts => {
                tracing::warn!(
                    method,
                    attempt,
                    max_attempts,
                    delay = ?backoff,
                    error = %err,
                    "rpc request failed, retrying"
                );
                tokio::time::sleep(backoff).await;
                backoff = backoff.saturating_mul(2).min(policy.backoff_ceiling);
            }
            Err(err) => return Err(err),
        }
    }
}

/// JSON-RPC client for the chain's prefixed method namespace.
pub struct RpcClient {
    settings: RpcSettings,
    http: reqwest::Client,
    limiter: Arc<Limiter>,
    next_id: AtomicU64,
    timestamps: Mutex<LruCache<u64, u64>>,
}

impl RpcClient {
    pub fn new(settings: RpcSettings) -> Self {
        let burst = NonZeroU32::new(settings.max_requests.max(1)).expect("burst is non-zero");
        let period = settings
            .window
            .checked_div(burst.get())
            .filter(|p| !p.is_zero())
            .unwrap_or(Duration::from_millis(1));
        let quota = Quota::with_period(period)
            .expect("rate limiter period is non-zero")
            .allow_burst(burst);
        let cache_size =
            NonZeroUsize::new(settings.timestamp_cache_size.max(1)).expect("cache size is non-zero");

        Self {
            settings,
            http: reqwest::Client::new(),
            limiter: Arc::new(RateLimiter::direct(quota)),
            next_id: AtomicU64::new(0),
            timestamps: Mutex::new(LruCache::new(cache_size)),
        }
    }

    fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.settings.max_attempts,
            backoff: self.settings.retry_backoff,
            backoff_ceiling: self.settings.retry_backoff_ceiling,
        }
    }

    pub async fn block_number(&self) -> Result<u64, RpcError> {
        with_retries(&self.retry_policy(), "blockNumber", || {
            self.try_block_number()
        })
        .await
    }

    pub async fn get_logs(&self, filter: &LogFilter) -> Result<Vec<RawLog>, RpcError> {
        with_retries(&self.retry_policy(), "getLogs", || self.try_get_logs(filter)).await
    }

    /// Raw `<ns>_call` at the latest block; `data` is the ABI-encoded
    /// calldata (usually just a selector for the read-backs we issue).
    pub async fn call(&self, to: Address, data: &[u8]) -> Result<String, RpcError> {
        with_retries(&self.retry_policy(), "call", || self.try_call(to, data)).await
    }

    pub async fn block_timestamp(&self, block: u64) -> Result<u64, RpcError> {
        if let Some(timestamp) = self.timestamps.lock().await.get(&block).copied() {
            return Ok(timestamp);
        }
        let timestamp = with_retries(&self.retry_policy(), "getBlockByNumber", || {
            self.try_block_timestamp(block)
        })
        .await?;
        self.timestamps.lock().await.put(block, timestamp);
        Ok(timestamp)
    }

    async fn try_block_number(&self) -> Result<u64, RpcError> {
        let result = self.request("blockNumber", json!([])).await?;
        parse_quantity(&result).ok_or_else(|| {
            RpcError::MalformedResponse(format!("expected hex block number, got {result}"))
        })
    }

    async fn try_get_logs(&self, filter: &LogFilter) -> Result<Vec<RawLog>, RpcError> {
        let result = self.request("getLogs", json!([filter])).await?;
        if result.is_null() {
            return Ok(vec![]);
        }
        if !result.is_array() {
            return Err(RpcError::MalformedResponse(format!(
                "expected log array, got {result}"
            )));
        }
        serde_json::from_value(result)
            .map_err(|err| RpcError::MalformedResponse(format!("bad log entry: {err}")))
    }

    async fn try_call(&self, to: Address, data: &[u8]) -> Result<String, RpcError> {
        let params = json!([
            {"to": format!("{to:#x}"), "data": format!("0x{}", alloy::hex::encode(data))},
            "latest",
        ]);
        let result = self.request("call", params).await?;
        result
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| RpcError::MalformedResponse(format!("expected hex call result, got {result}")))
    }

    async fn try_block_timestamp(&self, block: u64) -> Result<u64, RpcError> {
        let result = self
            .request("getBlockByNumber", json!([format!("{block:#x}"), false]))
            .await?;
        // work-object chains nest the header; fall back to the flat field
        result
            .get("woHeader")
            .and_then(|header| header.get("timestamp"))
            .or_else(|| result.get("timestamp"))
            .and_then(parse_quantity)
            .ok_or(RpcError::BlockNotFound(block))
    }

    async fn request(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, RpcError> {
        self.limiter.until_ready().await;
        let payload = json!({
            "jsonrpc": "2.0",
            "id": self.next_id.fetch_add(1, Ordering::Relaxed),
            "method": format!("{}_{method}", self.settings.method_namespace),
            "params": params,
        });
        let response = self
            .http
            .post(&self.settings.url)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;
        let body: JsonRpcResponse = response.json().await?;
        if let Some(err) = body.error {
            return Err(RpcError::Rpc {
                code: err.code,
                message: err.message,
            });
        }
        Ok(body.result.unwrap_or(serde_json::Value::Null))
    }
}

fn parse_quantity(value: &serde_json::Value) -> Option<u64> {
    match value {
        serde_json::Value::String(s) => {
            u64::from_str_radix(s.trim_start_matches("0x"), 16).ok()
        }
        serde_json::Value::Number(n) => n.as_u64(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{sync::atomic::AtomicU32, time::Instant};

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            backoff: Duration::from_millis(1),
            backoff_ceiling: Duration::from_millis(8),
        }
    }

    #[tokio::test]
    async fn retries_until_success() {
        let calls = AtomicU32::new(0);
        let result = with_retries(&fast_policy(3), "test", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(RpcError::MalformedResponse("boom".to_string()))
                } else {
                    Ok(7u64)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn surfaces_last_error_after_budget() {
        let calls = AtomicU32::new(0);
        let result: Result<u64, _> = with_retries(&fast_policy(3), "test", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(RpcError::MalformedResponse("always".to_string())) }
        })
        .await;
        assert!(matches!(result, Err(RpcError::MalformedResponse(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn rate_limiter_delays_second_call() {
        let client = RpcClient::new(RpcSettings {
            max_requests: 1,
            window: Duration::from_millis(1000),
            ..Default::default()
        });
        let started = Instant::now();
        client.limiter.until_ready().await;
        client.limiter.until_ready().await;
        assert!(started.elapsed() >= Duration::from_millis(900));
    }

    #[tokio::test]
    async fn timestamp_cache_refreshes_recency_on_hit() {
        let client = RpcClient::new(RpcSettings {
            timestamp_cache_size: 2,
            ..Default::default()
        });
        let mut cache = client.timestamps.lock().await;
        cache.put(1, 100);
        cache.put(2, 200);
        // reading 1 makes it most-recently-used, so inserting 3 evicts 2
        assert_eq!(cache.get(&1).copied(), Some(100));
        cache.put(3, 300);
        assert!(cache.peek(&2).is_none());
        assert_eq!(cache.peek(&1).copied(), Some(100));
        assert_eq!(cache.peek(&3).copied(), Some(300));
    }

    #[test]
    fn quantities_parse_from_hex_and_numbers() {
        assert_eq!(parse_quantity(&json!("0x64")), Some(100));
        assert_eq!(parse_quantity(&json!(100)), Some(100));
        assert_eq!(parse_quantity(&json!(null)), None);
        assert_eq!(parse_quantity(&json!("not-hex")), None);
    }
}
