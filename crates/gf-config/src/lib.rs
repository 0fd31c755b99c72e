//! Delay configuration and the newline-delimited local stores
//! (accounts, proxies, claim tokens, custom prompts).

pub mod delays;
pub mod store;

pub use delays::{load_delay_config, store_delay_config, DelayConfig, LoadOutcome};
pub use store::{
    append_lines, load_lines, ACCOUNTS_FILE, DELAYS_FILE, PROMPTS_FILE, PROXIES_FILE, TOKENS_FILE,
};
