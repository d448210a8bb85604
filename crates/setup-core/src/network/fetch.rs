//! Retry-aware release metadata fetching.
//!
//! Every response is classified once into a closed set of outcomes, and the
//! loop dispatches on that classification. The rate-limit precedence rule
//! (`retry-after` strictly before an exhausted quota) is therefore a single
//! ordered match instead of scattered header checks.

use crate::config::NetworkConfig;
use crate::error::{Result, SetupError};
use crate::models::Release;
use crate::network::transport::{Transport, WireResponse};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{info, warn};

/// Classification of one release-index response.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ResponseClass {
    /// 200 with the release payload.
    Success(String),
    /// 403 carrying a `retry-after` wait, in seconds.
    RetryAfter(u64),
    /// 403 with the request quota spent; carries the reset time in epoch seconds.
    QuotaExhausted(u64),
    /// Any other status; never retried.
    Unknown(u16, String),
}

fn classify(response: WireResponse) -> ResponseClass {
    if response.status == 200 {
        return ResponseClass::Success(response.body);
    }

    if response.status == 403 {
        if let Some(seconds) = response
            .retry_after
            .as_deref()
            .and_then(|value| value.parse::<u64>().ok())
        {
            return ResponseClass::RetryAfter(seconds);
        }

        if response.ratelimit_remaining.as_deref() == Some("0") {
            let reset = response
                .ratelimit_reset
                .as_deref()
                .and_then(|value| value.parse::<u64>().ok())
                .unwrap_or(0);
            return ResponseClass::QuotaExhausted(reset);
        }
    }

    ResponseClass::Unknown(response.status, response.status_text)
}

/// Resolve the retry budget from the raw `retry-count` input.
///
/// An explicit positive integer wins verbatim; anything else (absent, empty,
/// non-numeric, non-positive) falls back to the default without failing the
/// run.
pub fn resolve_retry_budget(raw: Option<&str>) -> u32 {
    let Some(raw) = raw else {
        return NetworkConfig::DEFAULT_RETRY_BUDGET;
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return NetworkConfig::DEFAULT_RETRY_BUDGET;
    }

    match trimmed.parse::<u32>() {
        Ok(value) if value > 0 => {
            info!("Setting retry count to {value}");
            value
        }
        Ok(_) => {
            warn!(
                "An invalid retry-count was passed, the value has to be greater than 0, defaulting to {}",
                NetworkConfig::DEFAULT_RETRY_BUDGET
            );
            NetworkConfig::DEFAULT_RETRY_BUDGET
        }
        Err(_) => {
            warn!(
                "An invalid retry-count was passed, defaulting to {}",
                NetworkConfig::DEFAULT_RETRY_BUDGET
            );
            NetworkConfig::DEFAULT_RETRY_BUDGET
        }
    }
}

/// Fetch release metadata, tolerating upstream rate limiting.
///
/// `max_attempts` bounds the number of rate-limit waits, so the index is
/// queried at most `max_attempts + 1` times. Transport failures and
/// unrecognized status codes are fatal on the spot, regardless of the budget
/// remaining.
pub async fn fetch_release<T: Transport + ?Sized>(
    transport: &T,
    url: &str,
    max_attempts: u32,
) -> Result<Release> {
    let mut attempt: u32 = 0;

    loop {
        let response = transport.get(url).await?;

        match classify(response) {
            ResponseClass::Success(body) => {
                return serde_json::from_str(&body).map_err(|e| SetupError::ReleaseParse {
                    message: e.to_string(),
                });
            }
            failure => {
                // Exhaustion is checked before any retry condition, so a zero
                // budget fails on the first non-200 response of any kind.
                if attempt == max_attempts {
                    return Err(SetupError::RetriesExhausted {
                        url: url.to_string(),
                    });
                }

                match failure {
                    ResponseClass::RetryAfter(seconds) => {
                        warn!("You have exceeded your rate limit. Retrying in {seconds} seconds.");
                        sleep_for(seconds.saturating_add(NetworkConfig::RATE_LIMIT_PADDING_SECS))
                            .await;
                    }
                    ResponseClass::QuotaExhausted(reset_epoch) => {
                        let seconds = seconds_until_reset(reset_epoch);
                        warn!("You have exceeded your rate limit. Retrying in {seconds} seconds.");
                        sleep_for(seconds).await;
                    }
                    ResponseClass::Unknown(code, text) => {
                        return Err(SetupError::UnknownStatus {
                            url: url.to_string(),
                            code,
                            text,
                        });
                    }
                    ResponseClass::Success(_) => unreachable!("handled above"),
                }

                attempt += 1;
            }
        }
    }
}

/// Padded wait until the quota reset time, clamped to zero when the reset has
/// already passed.
fn seconds_until_reset(reset_epoch: u64) -> u64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    (reset_epoch as i64 - now as i64 + NetworkConfig::RATE_LIMIT_PADDING_SECS as i64).max(0) as u64
}

async fn sleep_for(seconds: u64) {
    if seconds > 0 {
        tokio::time::sleep(Duration::from_secs(seconds)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::{SystemTime, UNIX_EPOCH};

    const URL: &str = "https://api.github.com/repos/surrealdb/surrealdb/releases/latest";
    const RELEASE_BODY: &str = r#"{ "tag_name": "v2.3.3", "assets": [] }"#;

    struct ScriptedTransport {
        responses: Mutex<Vec<Result<WireResponse>>>,
        calls: AtomicUsize,
    }

    impl ScriptedTransport {
        fn new(responses: Vec<Result<WireResponse>>) -> Self {
            Self {
                responses: Mutex::new(responses),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn get(&self, _url: &str) -> Result<WireResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses.lock().unwrap().remove(0)
        }
    }

    fn response(status: u16) -> WireResponse {
        WireResponse {
            status,
            status_text: "test".into(),
            retry_after: None,
            ratelimit_remaining: None,
            ratelimit_reset: None,
            body: String::new(),
        }
    }

    fn ok_response() -> WireResponse {
        WireResponse {
            body: RELEASE_BODY.into(),
            ..response(200)
        }
    }

    fn rate_limited(retry_after: &str) -> WireResponse {
        WireResponse {
            retry_after: Some(retry_after.into()),
            ..response(403)
        }
    }

    fn quota_exhausted(reset_epoch: u64) -> WireResponse {
        WireResponse {
            ratelimit_remaining: Some("0".into()),
            ratelimit_reset: Some(reset_epoch.to_string()),
            ..response(403)
        }
    }

    fn now_epoch() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs()
    }

    #[test]
    fn test_retry_budget_resolution_table() {
        let rows = [
            (Some("3"), 3),
            (Some("0"), 3),
            (Some("2"), 2),
            (Some("A"), 3),
            (Some("-11"), 3),
            (Some(""), 3),
            (None, 3),
        ];

        for (input, expected) in rows {
            assert_eq!(resolve_retry_budget(input), expected, "input: {input:?}");
        }
    }

    #[test]
    fn test_classification_precedence() {
        assert!(matches!(
            classify(ok_response()),
            ResponseClass::Success(_)
        ));
        assert_eq!(classify(rate_limited("2")), ResponseClass::RetryAfter(2));
        assert_eq!(
            classify(quota_exhausted(1700000000)),
            ResponseClass::QuotaExhausted(1700000000)
        );
        assert_eq!(
            classify(response(403)),
            ResponseClass::Unknown(403, "test".into())
        );
        assert_eq!(
            classify(response(500)),
            ResponseClass::Unknown(500, "test".into())
        );

        // A response carrying both rate-limit signals follows retry-after.
        let both = WireResponse {
            ratelimit_remaining: Some("0".into()),
            ratelimit_reset: Some("1700000000".into()),
            ..rate_limited("1")
        };
        assert_eq!(classify(both), ResponseClass::RetryAfter(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_rate_limit_waits() {
        let transport = ScriptedTransport::new(vec![
            Ok(rate_limited("2")),
            Ok(rate_limited("2")),
            Ok(ok_response()),
        ]);

        let started = tokio::time::Instant::now();
        let release = fetch_release(&transport, URL, 3).await.unwrap();

        assert_eq!(release.tag_name, "v2.3.3");
        assert_eq!(transport.calls(), 3);
        // Two waits of retry-after plus padding each.
        assert_eq!(started.elapsed(), Duration::from_secs(2 * (2 + 5)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausts_retry_budget() {
        let transport = ScriptedTransport::new(vec![
            Ok(rate_limited("1")),
            Ok(rate_limited("1")),
            Ok(rate_limited("1")),
            Ok(rate_limited("1")),
        ]);

        let err = fetch_release(&transport, URL, 3).await.unwrap_err();

        assert!(matches!(err, SetupError::RetriesExhausted { .. }));
        // Budget of three permits three waits, so four requests in total.
        assert_eq!(transport.calls(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_budget_exhausts_on_first_rate_limit() {
        let transport = ScriptedTransport::new(vec![Ok(rate_limited("1"))]);

        let started = tokio::time::Instant::now();
        let err = fetch_release(&transport, URL, 0).await.unwrap_err();

        assert!(matches!(err, SetupError::RetriesExhausted { .. }));
        assert_eq!(transport.calls(), 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_status_fails_without_retry() {
        let transport = ScriptedTransport::new(vec![Ok(response(500))]);

        let err = fetch_release(&transport, URL, 3).await.unwrap_err();

        match err {
            SetupError::UnknownStatus { code, .. } => assert_eq!(code, 500),
            other => panic!("expected UnknownStatus, got {other:?}"),
        }
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_error_is_fatal() {
        let transport = ScriptedTransport::new(vec![Err(SetupError::Transport {
            url: URL.into(),
            message: "connection refused".into(),
        })]);

        let err = fetch_release(&transport, URL, 3).await.unwrap_err();

        assert!(matches!(err, SetupError::Transport { .. }));
        assert!(err.to_string().contains("connection refused"));
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_quota_reset_in_the_past_is_a_no_op_wait() {
        let transport =
            ScriptedTransport::new(vec![Ok(quota_exhausted(0)), Ok(ok_response())]);

        let started = tokio::time::Instant::now();
        let release = fetch_release(&transport, URL, 3).await.unwrap();

        assert_eq!(release.tag_name, "v2.3.3");
        assert_eq!(transport.calls(), 2);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_quota_wait_is_padded_reset_delta() {
        let transport = ScriptedTransport::new(vec![
            Ok(quota_exhausted(now_epoch() + 10)),
            Ok(ok_response()),
        ]);

        let started = tokio::time::Instant::now();
        fetch_release(&transport, URL, 3).await.unwrap();

        // The reset delta is measured against the wall clock, so allow a
        // second of skew around the padded ten-second wait.
        let elapsed = started.elapsed();
        assert!(
            elapsed >= Duration::from_secs(14) && elapsed <= Duration::from_secs(16),
            "elapsed: {elapsed:?}"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_after_takes_precedence_over_quota() {
        let mut both = rate_limited("1");
        both.ratelimit_remaining = Some("0".into());
        both.ratelimit_reset = Some((now_epoch() + 1000).to_string());

        let transport = ScriptedTransport::new(vec![Ok(both), Ok(ok_response())]);

        let started = tokio::time::Instant::now();
        fetch_release(&transport, URL, 3).await.unwrap();

        assert_eq!(started.elapsed(), Duration::from_secs(1 + 5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_body_that_fails_to_parse_is_fatal() {
        let mut broken = ok_response();
        broken.body = "not json".into();
        let transport = ScriptedTransport::new(vec![Ok(broken)]);

        let err = fetch_release(&transport, URL, 3).await.unwrap_err();

        assert!(matches!(err, SetupError::ReleaseParse { .. }));
        assert_eq!(transport.calls(), 1);
    }
}
