//! Player data endpoints.
//!
//! Covers: player, recentgames, status, guild. All need an API key.

use crate::client::{HypixelClient, Response};
use crate::error::Result;
use crate::types::GuildQuery;

impl HypixelClient {
    /// Data of a specific player, including game stats.
    pub async fn player(&self, uuid: &str) -> Result<Response> {
        self.get("player", &[("uuid", uuid)]).await
    }

    /// The recently played games of a specific player.
    pub async fn recent_games(&self, uuid: &str) -> Result<Response> {
        self.get("recentgames", &[("uuid", uuid)]).await
    }

    /// The current online status of a specific player.
    pub async fn status(&self, uuid: &str) -> Result<Response> {
        self.get("status", &[("uuid", uuid)]).await
    }

    /// Retrieve a guild by ID, member UUID, or name.
    pub async fn guild(&self, query: GuildQuery<'_>) -> Result<Response> {
        let (key, value) = query.as_param();
        self.get("guild", &[(key, value)]).await
    }
}
