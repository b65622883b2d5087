//! RxNav drug classification client.
//!
//! Implements the classification collaborator for rx2gantt against the
//! National Library of Medicine's RxNav REST API: a generic drug name is
//! resolved to an rxcui via approximate term search, then the rxcui's drug
//! classes are grouped by class type into the MOA / EPC / PE fields.
//!
//! The collaborator is entirely optional. Every failure path — network,
//! HTTP status, malformed body, no candidate found — degrades to the
//! all-empty [`Classification`]; a lookup never blocks record processing.
//!
//! Transient server errors retry under an explicit [`RetryPolicy`] rather
//! than implicit session configuration, so the schedule is testable
//! without a live endpoint.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

use rx2gantt_core::{Classification, Classify};

/// Default RxNav API root.
pub const RXNAV_BASE_URL: &str = "https://rxnav.nlm.nih.gov/REST";

/// Per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for the connectivity probe.
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors from a single classification lookup.
///
/// These never escape [`Classify::classify`]; they exist so the fallible
/// internals can propagate with `?` before the trait impl degrades them
/// to an empty classification.
#[derive(Debug, Error)]
pub enum RxNavError {
    /// Transport-level failure (DNS, connect, timeout, TLS).
    #[error("rxnav request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Server kept answering with a retryable status until attempts ran out,
    /// or answered with a non-retryable error status.
    #[error("rxnav responded with status {0}")]
    Status(u16),
}

/// Bounded-retry schedule for transient server errors.
///
/// Attempt `n` (1-based) that fails with a status in `retryable_statuses`
/// sleeps `base_delay * 2^(n-1)` before the next try. Client errors and
/// malformed responses are never retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles each retry.
    pub base_delay: Duration,
    /// HTTP statuses considered transient.
    pub retryable_statuses: Vec<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_secs(1),
            retryable_statuses: vec![500, 502, 503, 504],
        }
    }
}

impl RetryPolicy {
    /// Whether a response status warrants another attempt.
    #[must_use]
    pub fn is_retryable(&self, status: u16) -> bool {
        self.retryable_statuses.contains(&status)
    }

    /// Backoff delay after the given failed attempt (1-based).
    #[must_use]
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt.saturating_sub(1))
    }
}

/// Blocking RxNav REST client.
///
/// Stateless per request, so one client may serve concurrent document
/// pipelines.
pub struct RxNavClient {
    http: reqwest::blocking::Client,
    base_url: String,
    retry: RetryPolicy,
}

impl RxNavClient {
    /// Client against the public RxNav endpoint with the default retry
    /// policy.
    ///
    /// # Errors
    ///
    /// Returns [`RxNavError::Transport`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn new() -> Result<Self, RxNavError> {
        Self::with_base_url(RXNAV_BASE_URL)
    }

    /// Client against an alternate endpoint (primarily for tests).
    ///
    /// # Errors
    ///
    /// Returns [`RxNavError::Transport`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn with_base_url(base_url: &str) -> Result<Self, RxNavError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            retry: RetryPolicy::default(),
        })
    }

    /// Replace the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Whether the classification endpoint is reachable.
    ///
    /// Consulted once per batch run to decide whether classification is
    /// attempted at all; any answer from the server counts as reachable.
    #[must_use]
    pub fn is_online(&self) -> bool {
        let probe = reqwest::blocking::Client::builder()
            .timeout(PROBE_TIMEOUT)
            .build();
        match probe {
            Ok(client) => client.get(&self.base_url).send().is_ok(),
            Err(_) => false,
        }
    }

    /// GET a JSON document, retrying transient server errors per policy.
    fn get_json(&self, url: &str, query: &[(&str, &str)]) -> Result<Value, RxNavError> {
        let mut attempt = 1;
        loop {
            let response = self.http.get(url).query(query).send()?;
            let status = response.status().as_u16();

            if response.status().is_success() {
                return Ok(response.json()?);
            }
            if self.retry.is_retryable(status) && attempt < self.retry.max_attempts {
                let delay = self.retry.delay_after(attempt);
                log::debug!("rxnav {url} returned {status}, retrying in {delay:?}");
                std::thread::sleep(delay);
                attempt += 1;
                continue;
            }
            return Err(RxNavError::Status(status));
        }
    }

    /// Resolve a generic drug name to its rxcui, if RxNav knows one.
    ///
    /// # Errors
    ///
    /// Returns [`RxNavError`] on transport failure or an error status after
    /// retries are exhausted. An unknown name is `Ok(None)`, not an error.
    pub fn resolve_rxcui(&self, generic_name: &str) -> Result<Option<String>, RxNavError> {
        let url = format!("{}/approximateTerm.json", self.base_url);
        let body = self.get_json(&url, &[("term", generic_name)])?;
        Ok(parse_rxcui(&body))
    }

    /// Fetch the grouped classifications for an rxcui.
    ///
    /// # Errors
    ///
    /// Returns [`RxNavError`] on transport failure or an error status after
    /// retries are exhausted.
    pub fn fetch_classes(&self, rxcui: &str) -> Result<Classification, RxNavError> {
        let url = format!("{}/rxclass/class/byRxcui.json", self.base_url);
        let body = self.get_json(&url, &[("rxcui", rxcui)])?;
        Ok(parse_classes(&body))
    }
}

impl Classify for RxNavClient {
    /// Classify one generic drug name, degrading every failure to the
    /// all-empty classification.
    fn classify(&self, generic_name: &str) -> Classification {
        let rxcui = match self.resolve_rxcui(generic_name) {
            Ok(Some(rxcui)) => rxcui,
            Ok(None) => {
                log::warn!("no rxcui found for drug: {generic_name}");
                return Classification::default();
            }
            Err(e) => {
                log::warn!("rxcui lookup failed for {generic_name}: {e}");
                return Classification::default();
            }
        };
        match self.fetch_classes(&rxcui) {
            Ok(classification) => classification,
            Err(e) => {
                log::warn!("classification fetch failed for {generic_name}: {e}");
                Classification::default()
            }
        }
    }
}

/// First candidate rxcui from an `approximateTerm.json` response body.
#[must_use]
fn parse_rxcui(body: &Value) -> Option<String> {
    body.pointer("/approximateGroup/candidate")?
        .as_array()?
        .first()?
        .get("rxcui")?
        .as_str()
        .map(str::to_string)
}

/// Group a `rxclass/class/byRxcui.json` response body by class type.
///
/// Class names collect into per-type sorted sets, so each output field is
/// deduplicated, lexicographically sorted, and newline-joined. Unrecognized
/// class types are ignored.
#[must_use]
fn parse_classes(body: &Value) -> Classification {
    let mut grouped: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();

    let infos = body
        .pointer("/rxclassDrugInfoList/rxclassDrugInfo")
        .and_then(Value::as_array);
    for info in infos.into_iter().flatten() {
        let concept = info.get("rxclassMinConceptItem");
        let class_type = concept.and_then(|c| c.get("classType")).and_then(Value::as_str);
        let class_name = concept.and_then(|c| c.get("className")).and_then(Value::as_str);
        if let (Some(class_type), Some(class_name)) = (class_type, class_name) {
            grouped.entry(class_type).or_default().insert(class_name);
        }
    }

    let join = |class_type: &str| -> String {
        grouped
            .get(class_type)
            .map(|names| names.iter().copied().collect::<Vec<_>>().join("\n"))
            .unwrap_or_default()
    };

    Classification {
        moa: join("MOA"),
        epc: join("EPC"),
        pe: join("PE"),
    }
}
