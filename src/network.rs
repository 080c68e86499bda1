//! Network-wide statistics endpoints.
//!
//! Boosters, player counts, leaderboards, and punishment statistics.

use crate::client::{HypixelClient, Response};
use crate::error::Result;

impl HypixelClient {
    /// Active network boosters.
    pub async fn boosters(&self) -> Result<Response> {
        self.get("boosters", &[]).await
    }

    /// Current player counts per game.
    pub async fn counts(&self) -> Result<Response> {
        self.get("counts", &[]).await
    }

    /// Current leaderboards.
    pub async fn leaderboards(&self) -> Result<Response> {
        self.get("leaderboards", &[]).await
    }

    /// Staff and watchdog ban counts.
    pub async fn punishment_stats(&self) -> Result<Response> {
        self.get("punishmentstats", &[]).await
    }
}
