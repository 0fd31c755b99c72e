use std::path::Path;

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::error;

use gf_client::{HttpRewardApi, DEFAULT_BASE_URL};
use gf_config::{load_lines, LoadOutcome, TOKENS_FILE};
use gf_core::RewardToken;
use gf_engine::ClaimScheduler;

/// Handle the claim command: load the token store and run hourly claim
/// passes until shutdown.
///
/// A missing or unusable token store stops this component with a logged
/// error; it never takes the process down.
pub(crate) async fn handle_claim(
    data_dir: &Path,
    base_url: Option<&str>,
    cancel: CancellationToken,
) -> Result<()> {
    let tokens_path = data_dir.join(TOKENS_FILE);
    let tokens: Vec<RewardToken> = match load_lines(&tokens_path) {
        LoadOutcome::Loaded(lines) if !lines.is_empty() => {
            lines.into_iter().map(RewardToken::new).collect()
        }
        LoadOutcome::Loaded(_) => {
            error!(path = %tokens_path.display(), "token store is empty; nothing to claim");
            return Ok(());
        }
        LoadOutcome::Missing => {
            error!(path = %tokens_path.display(), "token store not found; nothing to claim");
            return Ok(());
        }
        LoadOutcome::Invalid(reason) => {
            error!(path = %tokens_path.display(), %reason, "token store unreadable");
            return Ok(());
        }
    };

    let api = HttpRewardApi::new(base_url.unwrap_or(DEFAULT_BASE_URL))
        .map_err(|err| anyhow::anyhow!("failed to build reward client: {err}"))?;

    ClaimScheduler::new(cancel).run(&tokens, &api).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_token_store_stops_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let result = handle_claim(dir.path(), None, CancellationToken::new()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_empty_token_store_stops_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(TOKENS_FILE), "\n\n").unwrap();

        let result = handle_claim(dir.path(), None, CancellationToken::new()).await;
        assert!(result.is_ok());
    }
}
