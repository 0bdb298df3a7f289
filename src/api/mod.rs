pub mod client;
pub mod models;
pub mod provider;

pub use client::OpenDotaClient;
pub use provider::{DataProvider, MatchQuery};
