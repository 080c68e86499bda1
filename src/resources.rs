//! Static resource endpoints.
//!
//! These return slowly changing game data and do not need an API key.

use crate::client::{HypixelClient, Response};
use crate::error::Result;
use crate::types::ResourceKind;

impl HypixelClient {
    /// Fetch any resource collection.
    pub async fn resource(&self, kind: ResourceKind) -> Result<Response> {
        self.get_public(kind.as_api_path(), &[]).await
    }

    /// Information about Hypixel games.
    pub async fn resources_games(&self) -> Result<Response> {
        self.resource(ResourceKind::Games).await
    }

    pub async fn resources_achievements(&self) -> Result<Response> {
        self.resource(ResourceKind::Achievements).await
    }

    pub async fn resources_challenges(&self) -> Result<Response> {
        self.resource(ResourceKind::Challenges).await
    }

    pub async fn resources_quests(&self) -> Result<Response> {
        self.resource(ResourceKind::Quests).await
    }

    pub async fn resources_guild_achievements(&self) -> Result<Response> {
        self.resource(ResourceKind::GuildAchievements).await
    }

    pub async fn resources_vanity_pets(&self) -> Result<Response> {
        self.resource(ResourceKind::VanityPets).await
    }

    pub async fn resources_vanity_companions(&self) -> Result<Response> {
        self.resource(ResourceKind::VanityCompanions).await
    }

    pub async fn resources_skyblock_collections(&self) -> Result<Response> {
        self.resource(ResourceKind::SkyblockCollections).await
    }

    pub async fn resources_skyblock_skills(&self) -> Result<Response> {
        self.resource(ResourceKind::SkyblockSkills).await
    }

    /// All SkyBlock items, including stats and crafting data.
    pub async fn resources_skyblock_items(&self) -> Result<Response> {
        self.resource(ResourceKind::SkyblockItems).await
    }

    /// Current mayor, candidates, and election state.
    pub async fn resources_skyblock_election(&self) -> Result<Response> {
        self.resource(ResourceKind::SkyblockElection).await
    }

    /// The current bingo event and its goals.
    pub async fn resources_skyblock_bingo(&self) -> Result<Response> {
        self.resource(ResourceKind::SkyblockBingo).await
    }
}
