//! SkyBlock endpoints.
//!
//! Auction listings, bazaar, and fire sales are public; profile-level data
//! needs an API key.

use crate::client::{HypixelClient, Response};
use crate::error::Result;
use crate::types::AuctionQuery;

impl HypixelClient {
    /// SkyBlock news.
    pub async fn skyblock_news(&self) -> Result<Response> {
        self.get("skyblock/news", &[]).await
    }

    /// Auctions matching an auction UUID, player, or profile.
    pub async fn skyblock_auction(&self, query: AuctionQuery<'_>) -> Result<Response> {
        let (key, value) = query.as_param();
        self.get("skyblock/auction", &[(key, value)]).await
    }

    /// One page of currently active auctions. Pages start at 0.
    pub async fn skyblock_auctions(&self, page: u32) -> Result<Response> {
        let page = page.to_string();
        self.get_public("skyblock/auctions", &[("page", page.as_str())])
            .await
    }

    /// Auctions that ended in the last 60 seconds.
    pub async fn skyblock_auctions_ended(&self) -> Result<Response> {
        self.get_public("skyblock/auctions_ended", &[]).await
    }

    /// Bazaar products and their current orders.
    pub async fn skyblock_bazaar(&self) -> Result<Response> {
        self.get_public("skyblock/bazaar", &[]).await
    }

    /// A SkyBlock profile by its profile ID.
    pub async fn skyblock_profile(&self, profile: &str) -> Result<Response> {
        self.get("skyblock/profile", &[("profile", profile)]).await
    }

    /// All SkyBlock profiles of a player.
    pub async fn skyblock_profiles(&self, uuid: &str) -> Result<Response> {
        self.get("skyblock/profiles", &[("uuid", uuid)]).await
    }

    pub async fn skyblock_museum(&self, profile: &str) -> Result<Response> {
        self.get("skyblock/museum", &[("profile", profile)]).await
    }

    pub async fn skyblock_garden(&self, profile: &str) -> Result<Response> {
        self.get("skyblock/garden", &[("profile", profile)]).await
    }

    /// Bingo data for a player.
    pub async fn skyblock_bingo(&self, uuid: &str) -> Result<Response> {
        self.get("skyblock/bingo", &[("uuid", uuid)]).await
    }

    /// Active or upcoming fire sales.
    pub async fn skyblock_firesales(&self) -> Result<Response> {
        self.get_public("skyblock/firesales", &[]).await
    }
}
