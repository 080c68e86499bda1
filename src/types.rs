//! Public request types for the Hypixel client.
//!
//! Responses are returned as raw [`Response`](crate::Response) bodies; these
//! types only describe what to ask for.

use serde::{Deserialize, Serialize};

/// Static resource collections served under `/resources`.
///
/// These endpoints need no API key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum ResourceKind {
    Games,
    Achievements,
    Challenges,
    Quests,
    GuildAchievements,
    VanityPets,
    VanityCompanions,
    SkyblockCollections,
    SkyblockSkills,
    SkyblockItems,
    SkyblockElection,
    SkyblockBingo,
}

impl ResourceKind {
    /// Path relative to the API base URL.
    pub fn as_api_path(&self) -> &'static str {
        match self {
            Self::Games => "resources/games",
            Self::Achievements => "resources/achievements",
            Self::Challenges => "resources/challenges",
            Self::Quests => "resources/quests",
            Self::GuildAchievements => "resources/guilds/achievements",
            Self::VanityPets => "resources/vanity/pets",
            Self::VanityCompanions => "resources/vanity/companions",
            Self::SkyblockCollections => "resources/skyblock/collections",
            Self::SkyblockSkills => "resources/skyblock/skills",
            Self::SkyblockItems => "resources/skyblock/items",
            Self::SkyblockElection => "resources/skyblock/election",
            Self::SkyblockBingo => "resources/skyblock/bingo",
        }
    }

    /// Parse from a path such as `"skyblock/items"` or `"resources/games"`.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        let s = s.trim().trim_matches('/').to_lowercase();
        let s = s.strip_prefix("resources/").unwrap_or(&s);
        match s {
            "games" => Some(Self::Games),
            "achievements" => Some(Self::Achievements),
            "challenges" => Some(Self::Challenges),
            "quests" => Some(Self::Quests),
            "guilds/achievements" => Some(Self::GuildAchievements),
            "vanity/pets" => Some(Self::VanityPets),
            "vanity/companions" => Some(Self::VanityCompanions),
            "skyblock/collections" => Some(Self::SkyblockCollections),
            "skyblock/skills" => Some(Self::SkyblockSkills),
            "skyblock/items" => Some(Self::SkyblockItems),
            "skyblock/election" => Some(Self::SkyblockElection),
            "skyblock/bingo" => Some(Self::SkyblockBingo),
            _ => None,
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_api_path())
    }
}

/// How to look up a guild. The API accepts exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuildQuery<'a> {
    /// Guild ID.
    Id(&'a str),
    /// UUID of a member.
    Player(&'a str),
    /// Guild name.
    Name(&'a str),
}

impl<'a> GuildQuery<'a> {
    pub(crate) fn as_param(&self) -> (&'static str, &'a str) {
        match *self {
            Self::Id(v) => ("id", v),
            Self::Player(v) => ("player", v),
            Self::Name(v) => ("name", v),
        }
    }
}

/// How to look up SkyBlock auctions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuctionQuery<'a> {
    /// A single auction by its UUID.
    Uuid(&'a str),
    /// All auctions created by a player.
    Player(&'a str),
    /// All auctions created by a profile.
    Profile(&'a str),
}

impl<'a> AuctionQuery<'a> {
    pub(crate) fn as_param(&self) -> (&'static str, &'a str) {
        match *self {
            Self::Uuid(v) => ("uuid", v),
            Self::Player(v) => ("player", v),
            Self::Profile(v) => ("profile", v),
        }
    }
}
