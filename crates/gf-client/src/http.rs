use std::time::Duration;

use async_trait::async_trait;
use reqwest::Proxy;
use serde::Deserialize;
use serde_json::json;
use tokio::time::{sleep, Instant};
use tracing::debug;

use gf_core::{AccountCredential, Capability, EngineError, JobRequest};

use crate::api::{Connector, JobHandle, RemoteSession};

/// Production API host.
pub const DEFAULT_BASE_URL: &str = "https://api.sogni.ai";
const REFERER: &str = "https://app.sogni.ai/";

/// How long to wait for a non-empty capability catalog before giving up.
const CAPABILITY_WAIT: Duration = Duration::from_secs(60);
/// Poll interval while the catalog is empty.
const CAPABILITY_POLL: Duration = Duration::from_secs(2);
/// Poll interval while a job is in flight.
const JOB_POLL: Duration = Duration::from_secs(5);
/// Per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Builds authenticated sessions with one `reqwest::Client` per account, so
/// proxy routing stays session-local.
#[derive(Debug, Clone)]
pub struct HttpConnector {
    base_url: String,
}

impl HttpConnector {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl Connector for HttpConnector {
    async fn connect(
        &self,
        credential: &AccountCredential,
        proxy: Option<&str>,
    ) -> Result<Box<dyn RemoteSession>, EngineError> {
        let mut builder = reqwest::Client::builder().timeout(REQUEST_TIMEOUT);
        if let Some(url) = proxy {
            let proxy = Proxy::all(url)
                .map_err(|err| EngineError::Transport(format!("invalid proxy url '{url}': {err}")))?;
            builder = builder.proxy(proxy);
        }
        let client = builder
            .build()
            .map_err(|err| EngineError::Transport(format!("client build failed: {err}")))?;

        let response = client
            .post(format!("{}/v2/account/login", self.base_url))
            .header("Referer", REFERER)
            .json(&json!({
                "username": credential.username,
                "password": credential.password,
                "appId": credential.app_id,
            }))
            .send()
            .await
            .map_err(|err| EngineError::Transport(format!("login request failed: {err}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| EngineError::Transport(format!("login response unreadable: {err}")))?;

        if !status.is_success() {
            return Err(EngineError::Auth {
                username: credential.username.clone(),
                reason: format!("status {status}"),
            });
        }

        let token = parse_login_token(&body).ok_or_else(|| EngineError::Auth {
            username: credential.username.clone(),
            reason: "missing session token in login response".to_string(),
        })?;

        Ok(Box::new(HttpSession {
            client,
            base_url: self.base_url.clone(),
            token,
        }))
    }
}

struct HttpSession {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl HttpSession {
    async fn fetch_capabilities(&self) -> Result<Vec<Capability>, EngineError> {
        let response = self
            .client
            .get(format!("{}/v2/models", self.base_url))
            .header("authorization", &self.token)
            .header("Referer", REFERER)
            .send()
            .await
            .map_err(|err| EngineError::Transport(format!("model listing failed: {err}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| EngineError::Transport(format!("model listing unreadable: {err}")))?;

        if !status.is_success() {
            return Err(EngineError::Transport(format!(
                "model listing rejected: status {status}"
            )));
        }

        parse_capabilities(&body)
            .ok_or_else(|| EngineError::Transport("malformed model listing".to_string()))
    }
}

#[async_trait]
impl RemoteSession for HttpSession {
    async fn await_capabilities(&self) -> Result<Vec<Capability>, EngineError> {
        let deadline = Instant::now() + CAPABILITY_WAIT;
        loop {
            let catalog = self.fetch_capabilities().await?;
            if !catalog.is_empty() {
                return Ok(catalog);
            }
            if Instant::now() + CAPABILITY_POLL > deadline {
                return Err(EngineError::ReadinessTimeout);
            }
            sleep(CAPABILITY_POLL).await;
        }
    }

    async fn submit_job(&self, request: &JobRequest) -> Result<Box<dyn JobHandle>, EngineError> {
        let response = self
            .client
            .post(format!("{}/v2/projects", self.base_url))
            .header("authorization", &self.token)
            .header("Referer", REFERER)
            .json(request)
            .send()
            .await
            .map_err(|err| EngineError::Transport(format!("job submission failed: {err}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| EngineError::Transport(format!("job submission unreadable: {err}")))?;

        if !status.is_success() {
            return Err(EngineError::Job(format!(
                "submission rejected: status {status}"
            )));
        }

        let project_id = parse_project_id(&body)
            .ok_or_else(|| EngineError::Job("missing project id in submission response".to_string()))?;

        Ok(Box::new(HttpJob {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: self.token.clone(),
            project_id,
        }))
    }
}

struct HttpJob {
    client: reqwest::Client,
    base_url: String,
    token: String,
    project_id: String,
}

impl HttpJob {
    async fn fetch_snapshot(&self) -> Result<JobSnapshot, EngineError> {
        let response = self
            .client
            .get(format!("{}/v2/projects/{}", self.base_url, self.project_id))
            .header("authorization", &self.token)
            .header("Referer", REFERER)
            .send()
            .await
            .map_err(|err| EngineError::Transport(format!("job status query failed: {err}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| EngineError::Transport(format!("job status unreadable: {err}")))?;

        if !status.is_success() {
            return Err(EngineError::Transport(format!(
                "job status rejected: status {status}"
            )));
        }

        parse_job_snapshot(&body)
            .ok_or_else(|| EngineError::Job("malformed job status response".to_string()))
    }
}

#[async_trait]
impl JobHandle for HttpJob {
    async fn await_completion(self: Box<Self>) -> Result<Vec<String>, EngineError> {
        loop {
            let snapshot = self.fetch_snapshot().await?;
            match snapshot.status.as_str() {
                "completed" => return Ok(snapshot.image_urls),
                "failed" | "errored" => {
                    return Err(EngineError::Job(
                        snapshot
                            .error
                            .unwrap_or_else(|| "job failed without detail".to_string()),
                    ));
                }
                _ => {
                    if let Some(progress) = snapshot.progress {
                        debug!(project = %self.project_id, progress, "job in progress");
                    }
                    sleep(JOB_POLL).await;
                }
            }
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobSnapshot {
    status: String,
    #[serde(default)]
    progress: Option<f64>,
    #[serde(default)]
    image_urls: Vec<String>,
    #[serde(default)]
    error: Option<String>,
}

fn parse_login_token(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct Data {
        token: String,
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
    Some(envelope.data?.token)
}

fn parse_capabilities(body: &str) -> Option<Vec<Capability>> {
    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct ModelEntry {
        id: String,
        #[serde(default)]
        worker_count: u32,
    }
    #[derive(Deserialize)]
    struct Data {
        models: Vec<ModelEntry>,
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
    let models = envelope.data?.models;
    Some(
        models
            .into_iter()
            .map(|entry| Capability {
                id: entry.id,
                concurrency_hint: entry.worker_count,
            })
            .collect(),
    )
}

fn parse_project_id(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Data {
        project_id: String,
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
    Some(envelope.data?.project_id)
}

fn parse_job_snapshot(body: &str) -> Option<JobSnapshot> {
    #[derive(Deserialize)]
    struct Envelope {
        status: String,
        data: Option<JobSnapshot>,
    }

    let envelope: Envelope = serde_json::from_str(body).ok()?;
    if envelope.status != "success" {
        return None;
    }
    envelope.data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_login_token() {
        let body = r#"{"status":"success","data":{"token":"tok-abc"}}"#;
        assert_eq!(parse_login_token(body), Some("tok-abc".to_string()));
    }

    #[test]
    fn test_parse_login_token_rejects_failure_status() {
        let body = r#"{"status":"error","data":{"token":"tok-abc"}}"#;
        assert_eq!(parse_login_token(body), None);
    }

    #[test]
    fn test_parse_login_token_malformed_body() {
        assert_eq!(parse_login_token("<html>nope</html>"), None);
    }

    #[test]
    fn test_parse_capabilities() {
        let body = r#"{"status":"success","data":{"models":[
            {"id":"flux","workerCount":12},
            {"id":"sdxl","workerCount":4}
        ]}}"#;
        let catalog = parse_capabilities(body).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog[0].id, "flux");
        assert_eq!(catalog[0].concurrency_hint, 12);
    }

    #[test]
    fn test_parse_capabilities_empty_catalog() {
        let body = r#"{"status":"success","data":{"models":[]}}"#;
        assert_eq!(parse_capabilities(body), Some(vec![]));
    }

    #[test]
    fn test_parse_project_id() {
        let body = r#"{"status":"success","data":{"projectId":"proj-1"}}"#;
        assert_eq!(parse_project_id(body), Some("proj-1".to_string()));
    }

    #[test]
    fn test_parse_job_snapshot_completed() {
        let body = r#"{"status":"success","data":{
            "status":"completed",
            "imageUrls":["https://cdn.example/one.png"]
        }}"#;
        let snapshot = parse_job_snapshot(body).unwrap();
        assert_eq!(snapshot.status, "completed");
        assert_eq!(snapshot.image_urls.len(), 1);
    }

    #[test]
    fn test_parse_job_snapshot_in_progress() {
        let body = r#"{"status":"success","data":{"status":"processing","progress":0.4}}"#;
        let snapshot = parse_job_snapshot(body).unwrap();
        assert_eq!(snapshot.status, "processing");
        assert_eq!(snapshot.progress, Some(0.4));
        assert!(snapshot.image_urls.is_empty());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let connector = HttpConnector::new("https://api.example.com/");
        assert_eq!(connector.base_url, "https://api.example.com");
    }
}
