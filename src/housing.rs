//! Housing endpoints.

use crate::client::{HypixelClient, Response};
use crate::error::Result;

impl HypixelClient {
    /// Currently active public houses.
    pub async fn housing_active(&self) -> Result<Response> {
        self.get("housing/active", &[]).await
    }

    /// Information about a specific house.
    pub async fn housing_house(&self, house: &str) -> Result<Response> {
        self.get("housing/house", &[("house", house)]).await
    }

    /// Public houses owned by a player.
    pub async fn housing_houses(&self, player: &str) -> Result<Response> {
        self.get("housing/houses", &[("player", player)]).await
    }
}
