//! Reward status/claim endpoints and the claimability math.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use gf_core::{EngineError, RewardToken};

/// Identifier of the daily boost reward in the service's reward listing.
pub const DAILY_BOOST_ID: &str = "2";

const REFERER: &str = "https://app.sogni.ai/";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Daily-boost state for one account, derived from the reward listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RewardStatus {
    pub can_claim: bool,
    /// Unix seconds of the last successful claim, when reported.
    pub last_claim_timestamp: Option<i64>,
    /// Reset cadence in seconds, when reported.
    pub reset_frequency_secs: Option<i64>,
}

impl RewardStatus {
    /// Unix timestamp at which the reward next becomes claimable.
    pub fn next_available_at(&self) -> Option<i64> {
        match (self.last_claim_timestamp, self.reset_frequency_secs) {
            (Some(last), Some(frequency)) => Some(last + frequency),
            _ => None,
        }
    }

    /// Remaining wait from `now` (unix seconds).
    ///
    /// `None` when the reward is already claimable, the wait has elapsed,
    /// or the server response carried no timing fields.
    pub fn remaining_wait(&self, now: i64) -> Option<Duration> {
        if self.can_claim {
            return None;
        }
        let available_at = self.next_available_at()?;
        if available_at <= now {
            return None;
        }
        Some(Duration::from_secs((available_at - now) as u64))
    }
}

/// Reward operations, one token per claim-eligible account.
#[async_trait]
pub trait RewardApi: Send + Sync {
    async fn status(&self, token: &RewardToken) -> Result<RewardStatus, EngineError>;

    /// Issue the claim; returns whether the service accepted it.
    async fn claim(&self, token: &RewardToken) -> Result<bool, EngineError>;
}

/// Reqwest-backed reward client.
#[derive(Debug, Clone)]
pub struct HttpRewardApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRewardApi {
    pub fn new(base_url: impl Into<String>) -> Result<Self, EngineError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| EngineError::Transport(format!("client build failed: {err}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl RewardApi for HttpRewardApi {
    async fn status(&self, token: &RewardToken) -> Result<RewardStatus, EngineError> {
        let response = self
            .client
            .get(format!("{}/v2/account/rewards", self.base_url))
            .header("authorization", token.as_str())
            .header("Referer", REFERER)
            .send()
            .await
            .map_err(|err| EngineError::Transport(format!("reward status query failed: {err}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| EngineError::Transport(format!("reward status unreadable: {err}")))?;

        if !status.is_success() {
            return Err(EngineError::Transport(format!(
                "reward status rejected: status {status}"
            )));
        }

        parse_reward_status(&body)
            .ok_or_else(|| EngineError::Transport("malformed reward listing".to_string()))
    }

    async fn claim(&self, token: &RewardToken) -> Result<bool, EngineError> {
        let response = self
            .client
            .post(format!("{}/v2/account/reward/claim", self.base_url))
            .header("authorization", token.as_str())
            .header("Referer", REFERER)
            .json(&json!({ "claims": [DAILY_BOOST_ID] }))
            .send()
            .await
            .map_err(|err| EngineError::Transport(format!("claim request failed: {err}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| EngineError::Transport(format!("claim response unreadable: {err}")))?;

        if !status.is_success() {
            return Err(EngineError::Transport(format!(
                "claim rejected: status {status}"
            )));
        }

        Ok(parse_claim_accepted(&body))
    }
}

/// Extract the daily-boost entry from the reward listing.
///
/// A listing without the daily boost maps to "not claimable, no timing".
fn parse_reward_status(body: &str) -> Option<RewardStatus> {
    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct RewardEntry {
        id: String,
        #[serde(default)]
        can_claim: i64,
        #[serde(default)]
        last_claim_timestamp: Option<i64>,
        #[serde(default)]
        claim_reset_frequency_sec: Option<i64>,
    }
    #[derive(Deserialize)]
    struct Data {
        rewards: Vec<RewardEntry>,
    }
    #[derive(Deserialize)]
    struct Envelope {
        status: String,
        data: Option<Data>,
    }

    let envelope: Envelope = serde_json::from_str(body).ok()?;
    if envelope.status != "success" {
        return None;
    }
    let rewards = envelope.data?.rewards;

    let status = rewards
        .into_iter()
        .find(|entry| entry.id == DAILY_BOOST_ID)
        .map(|entry| RewardStatus {
            can_claim: entry.can_claim == 1,
            last_claim_timestamp: entry.last_claim_timestamp,
            reset_frequency_secs: entry.claim_reset_frequency_sec,
        })
        .unwrap_or_default();

    Some(status)
}

fn parse_claim_accepted(body: &str) -> bool {
    #[derive(Deserialize)]
    struct Envelope {
        status: String,
    }

    serde_json::from_str::<Envelope>(body)
        .map(|envelope| envelope.status == "success")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remaining_wait_halfway_through_reset() {
        let status = RewardStatus {
            can_claim: false,
            last_claim_timestamp: Some(1_700_000_000),
            reset_frequency_secs: Some(3600),
        };
        let now = 1_700_000_000 + 1800;
        assert_eq!(
            status.remaining_wait(now),
            Some(Duration::from_secs(1800))
        );
    }

    #[test]
    fn test_remaining_wait_none_when_claimable() {
        let status = RewardStatus {
            can_claim: true,
            last_claim_timestamp: Some(1_700_000_000),
            reset_frequency_secs: Some(3600),
        };
        assert_eq!(status.remaining_wait(1_700_000_000), None);
    }

    #[test]
    fn test_remaining_wait_none_when_elapsed() {
        let status = RewardStatus {
            can_claim: false,
            last_claim_timestamp: Some(1_700_000_000),
            reset_frequency_secs: Some(3600),
        };
        assert_eq!(status.remaining_wait(1_700_000_000 + 7200), None);
    }

    #[test]
    fn test_remaining_wait_none_without_timing_fields() {
        let status = RewardStatus {
            can_claim: false,
            last_claim_timestamp: None,
            reset_frequency_secs: Some(3600),
        };
        assert_eq!(status.remaining_wait(0), None);
        assert_eq!(status.next_available_at(), None);
    }

    #[test]
    fn test_parse_reward_status_claimable() {
        let body = r#"{"status":"success","data":{"rewards":[
            {"id":"1","canClaim":0},
            {"id":"2","canClaim":1,"lastClaimTimestamp":1700000000,"claimResetFrequencySec":86400}
        ]}}"#;
        let status = parse_reward_status(body).unwrap();
        assert!(status.can_claim);
        assert_eq!(status.last_claim_timestamp, Some(1_700_000_000));
        assert_eq!(status.reset_frequency_secs, Some(86_400));
    }

    #[test]
    fn test_parse_reward_status_missing_daily_boost() {
        let body = r#"{"status":"success","data":{"rewards":[{"id":"9","canClaim":1}]}}"#;
        let status = parse_reward_status(body).unwrap();
        assert!(!status.can_claim);
        assert_eq!(status.next_available_at(), None);
    }

    #[test]
    fn test_parse_reward_status_failure_envelope() {
        let body = r#"{"status":"error"}"#;
        assert_eq!(parse_reward_status(body), None);
    }

    #[test]
    fn test_parse_claim_accepted() {
        assert!(parse_claim_accepted(r#"{"status":"success"}"#));
        assert!(!parse_claim_accepted(r#"{"status":"error"}"#));
        assert!(!parse_claim_accepted("not json"));
    }
}
