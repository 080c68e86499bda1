//! # hypixel-client
//!
//! A Rust client for the Hypixel public API.
//!
//! Provides:
//! - **Library**: Async client for player, guild, SkyBlock, housing, and resource endpoints
//! - **Quota coordination**: [`RateGate`] follows the `RateLimit-*` headers the server
//!   sends and holds requests back while the quota is exhausted
//! - **CLI**: `hypixel` binary for terminal use (`cli` feature)
//!
//! ## Quick Start
//!
//! ```no_run
//! # async fn example() -> hypixel_client::error::Result<()> {
//! use hypixel_client::HypixelClient;
//!
//! // Create client from the HYPIXEL_API_KEY environment variable
//! let client = HypixelClient::from_env()?;
//!
//! let response = client.skyblock_bazaar().await?.error_for_status()?;
//! println!("{}", response.text());
//!
//! if let Some(gate) = client.rate_gate() {
//!     println!("{}", gate.status());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Sharing a quota
//!
//! Each client gets its own gate. Clients that use the same API key should share one:
//!
//! ```
//! use hypixel_client::{HypixelClient, RateGate};
//!
//! let gate = RateGate::new();
//! let a = HypixelClient::new("key").with_rate_gate(gate.clone());
//! let b = HypixelClient::new("key").with_rate_gate(gate);
//! # let _ = (a, b);
//! ```

pub mod client;
pub mod error;
pub mod hooks;
pub mod housing;
pub mod interpret;
pub mod network;
pub mod params;
pub mod player;
pub mod quota;
pub mod rate_limit;
pub mod resources;
pub mod skyblock;
pub mod types;

// Re-export key types at the crate root.
pub use client::{HypixelClient, Request, Response};
pub use error::HypixelError;
pub use hooks::RequestHooks;
pub use interpret::RequestOutcome;
pub use params::Params;
pub use quota::{Quota, QuotaState, QuotaStatus};
pub use rate_limit::RateGate;
pub use types::*;
