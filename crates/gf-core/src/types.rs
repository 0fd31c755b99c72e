use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::MalformedCredential;

/// One account record from the credential store.
///
/// Loaded from a `username|password|appId` line; the line's 1-based position
/// in the store is the account index used in logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountCredential {
    pub username: String,
    pub password: String,
    pub app_id: String,
}

impl AccountCredential {
    /// Parse a `username|password|appId` line.
    ///
    /// Fields are trimmed; all three must be non-empty.
    pub fn parse(line: &str) -> Result<Self, MalformedCredential> {
        let mut parts = line.trim().splitn(3, '|');
        let username = parts.next().unwrap_or("").trim();
        let password = parts.next().unwrap_or("").trim();
        let app_id = parts.next().unwrap_or("").trim();

        if username.is_empty() {
            return Err(MalformedCredential {
                missing: "username",
            });
        }
        if password.is_empty() {
            return Err(MalformedCredential {
                missing: "password",
            });
        }
        if app_id.is_empty() {
            return Err(MalformedCredential { missing: "appId" });
        }

        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
            app_id: app_id.to_string(),
        })
    }
}

/// Opaque claim token for the reward endpoints.
///
/// `Display` masks everything but the last six characters so full tokens
/// never reach logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardToken(String);

impl RewardToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RewardToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let skip = self.0.chars().count().saturating_sub(6);
        let tail: String = self.0.chars().skip(skip).collect();
        write!(f, "****{tail}")
    }
}

/// A generation backend advertised by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capability {
    pub id: String,
    /// Number of workers currently serving this backend.
    pub concurrency_hint: u32,
}

/// Pick the capability with the highest concurrency hint.
///
/// Ties break toward the first entry encountered.
pub fn select_capability(catalog: &[Capability]) -> Option<&Capability> {
    catalog.iter().fold(None, |best, candidate| match best {
        Some(current) if current.concurrency_hint >= candidate.concurrency_hint => Some(current),
        _ => Some(candidate),
    })
}

/// Parameters for one generation job.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRequest {
    pub model_id: String,
    pub positive_prompt: String,
    pub negative_prompt: String,
    pub style_prompt: String,
    pub steps: u32,
    pub guidance: f64,
    pub number_of_images: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_credential() {
        let credential = AccountCredential::parse("user@example.com|hunter2|abc-123").unwrap();
        assert_eq!(credential.username, "user@example.com");
        assert_eq!(credential.password, "hunter2");
        assert_eq!(credential.app_id, "abc-123");
    }

    #[test]
    fn test_parse_credential_trims_whitespace() {
        let credential = AccountCredential::parse("  user | pass | id \r").unwrap();
        assert_eq!(credential.username, "user");
        assert_eq!(credential.password, "pass");
        assert_eq!(credential.app_id, "id");
    }

    #[test]
    fn test_parse_credential_missing_app_id() {
        let err = AccountCredential::parse("user|pass").unwrap_err();
        assert_eq!(err.missing, "appId");

        let err = AccountCredential::parse("user|pass|").unwrap_err();
        assert_eq!(err.missing, "appId");
    }

    #[test]
    fn test_parse_credential_missing_password() {
        let err = AccountCredential::parse("user||id").unwrap_err();
        assert_eq!(err.missing, "password");
    }

    #[test]
    fn test_parse_credential_empty_line() {
        let err = AccountCredential::parse("").unwrap_err();
        assert_eq!(err.missing, "username");
    }

    #[test]
    fn test_reward_token_display_masks_all_but_tail() {
        let token = RewardToken::new("abcdefghij123456");
        assert_eq!(token.to_string(), "****123456");
    }

    #[test]
    fn test_reward_token_display_short_token() {
        let token = RewardToken::new("abc");
        assert_eq!(token.to_string(), "****abc");
    }

    #[test]
    fn test_select_capability_max_concurrency() {
        let catalog = vec![
            Capability {
                id: "a".into(),
                concurrency_hint: 3,
            },
            Capability {
                id: "b".into(),
                concurrency_hint: 9,
            },
            Capability {
                id: "c".into(),
                concurrency_hint: 5,
            },
        ];
        assert_eq!(select_capability(&catalog).unwrap().id, "b");
    }

    #[test]
    fn test_select_capability_tie_prefers_first() {
        let catalog = vec![
            Capability {
                id: "first".into(),
                concurrency_hint: 7,
            },
            Capability {
                id: "second".into(),
                concurrency_hint: 7,
            },
        ];
        assert_eq!(select_capability(&catalog).unwrap().id, "first");
    }

    #[test]
    fn test_select_capability_empty_catalog() {
        assert!(select_capability(&[]).is_none());
    }

    #[test]
    fn test_job_request_serializes_camel_case() {
        let request = JobRequest {
            model_id: "flux".into(),
            positive_prompt: "a dragon".into(),
            negative_prompt: "low quality".into(),
            style_prompt: "anime".into(),
            steps: 20,
            guidance: 7.5,
            number_of_images: 1,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["modelId"], "flux");
        assert_eq!(value["positivePrompt"], "a dragon");
        assert_eq!(value["numberOfImages"], 1);
    }
}
