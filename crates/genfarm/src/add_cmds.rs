use std::path::Path;

use anyhow::Result;

use gf_config::{append_lines, ACCOUNTS_FILE, PROMPTS_FILE, PROXIES_FILE, TOKENS_FILE};
use gf_core::AccountCredential;

use crate::cli::AddCommands;

/// Handle the add subcommands: append records to the local stores.
pub(crate) fn handle_add(data_dir: &Path, cmd: AddCommands) -> Result<()> {
    match cmd {
        AddCommands::Account {
            username,
            password,
            app_id,
        } => {
            let line = format!(
                "{}|{}|{}",
                username.trim(),
                password.trim(),
                app_id.trim()
            );
            // The store format is pipe-separated; reject fields that would
            // shift the record boundaries.
            if AccountCredential::parse(&line).is_err()
                || [&username, &password, &app_id]
                    .iter()
                    .any(|field| field.contains('|'))
            {
                anyhow::bail!("Invalid account record: fields must be non-empty and free of '|'");
            }
            append_lines(&data_dir.join(ACCOUNTS_FILE), &[line])?;
            println!("Account record added.");
        }
        AddCommands::Tokens { tokens } => {
            let entries = split_comma_list(&tokens);
            if entries.is_empty() {
                anyhow::bail!("No tokens provided");
            }
            let written = append_lines(&data_dir.join(TOKENS_FILE), &entries)?;
            println!("{written} token(s) added.");
        }
        AddCommands::Proxies { proxies } => {
            let entries = split_comma_list(&proxies);
            if entries.is_empty() {
                anyhow::bail!("No proxies provided");
            }
            let written = append_lines(&data_dir.join(PROXIES_FILE), &entries)?;
            println!("{written} proxy(ies) added.");
        }
        AddCommands::Prompt { text } => {
            if text.trim().is_empty() {
                anyhow::bail!("Prompt text is empty");
            }
            append_lines(&data_dir.join(PROMPTS_FILE), &[text])?;
            println!("Prompt added.");
        }
    }
    Ok(())
}

fn split_comma_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gf_config::{load_lines, LoadOutcome};

    #[test]
    fn test_add_account_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        handle_add(
            dir.path(),
            AddCommands::Account {
                username: "alice".into(),
                password: "pw".into(),
                app_id: "app-1".into(),
            },
        )
        .unwrap();

        let lines = load_lines(&dir.path().join(ACCOUNTS_FILE));
        assert_eq!(lines, LoadOutcome::Loaded(vec!["alice|pw|app-1".to_string()]));
        let credential = AccountCredential::parse("alice|pw|app-1").unwrap();
        assert_eq!(credential.username, "alice");
    }

    #[test]
    fn test_add_account_rejects_pipe_in_field() {
        let dir = tempfile::tempdir().unwrap();
        let result = handle_add(
            dir.path(),
            AddCommands::Account {
                username: "alice".into(),
                password: "p|w".into(),
                app_id: "app-1".into(),
            },
        );
        assert!(result.is_err());
        assert!(!dir.path().join(ACCOUNTS_FILE).exists());
    }

    #[test]
    fn test_add_tokens_splits_commas() {
        let dir = tempfile::tempdir().unwrap();
        handle_add(
            dir.path(),
            AddCommands::Tokens {
                tokens: "tok-1, tok-2,,tok-3".into(),
            },
        )
        .unwrap();

        let lines = load_lines(&dir.path().join(TOKENS_FILE));
        assert_eq!(
            lines,
            LoadOutcome::Loaded(vec![
                "tok-1".to_string(),
                "tok-2".to_string(),
                "tok-3".to_string(),
            ])
        );
    }

    #[test]
    fn test_add_proxies_appends_to_existing_store() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(PROXIES_FILE), "http://proxy-1:8080\n").unwrap();

        handle_add(
            dir.path(),
            AddCommands::Proxies {
                proxies: "http://proxy-2:8080".into(),
            },
        )
        .unwrap();

        let lines = load_lines(&dir.path().join(PROXIES_FILE));
        assert_eq!(
            lines,
            LoadOutcome::Loaded(vec![
                "http://proxy-1:8080".to_string(),
                "http://proxy-2:8080".to_string(),
            ])
        );
    }

    #[test]
    fn test_add_empty_prompt_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let result = handle_add(dir.path(), AddCommands::Prompt { text: "  ".into() });
        assert!(result.is_err());
    }
}
