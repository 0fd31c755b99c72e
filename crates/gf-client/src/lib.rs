//! Client seam for the remote generation/reward service: trait definitions
//! plus the reqwest-backed implementation.

pub mod api;
pub mod http;
pub mod rewards;

pub use api::{Connector, JobHandle, RemoteSession};
pub use http::{HttpConnector, DEFAULT_BASE_URL};
pub use rewards::{HttpRewardApi, RewardApi, RewardStatus, DAILY_BOOST_ID};
