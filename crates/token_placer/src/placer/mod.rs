//! Placement on a map of named regions.
//!
//! [`Placer`] resolves area and sub-region names through a [`RegionMap`], sizes tokens with
//! [`TokenSizes`], avoids tokens already recorded in the caller's [`TokenStore`] and writes the
//! new positions back into it.
pub mod group;
pub mod regions;
pub mod report;
pub mod runner;
pub mod store;
pub mod tokens;

pub use group::{seed_for_group, PendingTokens, TokenRequest, WHOLE_REGION};
pub use regions::RegionMap;
pub use report::{PlacementOutcome, PlacementReport, PlacementWarning};
pub use runner::{place_multiple, place_single, PlacementConfig, Placer, PreparedTarget};
pub use store::{TokenRecord, TokenStore};
pub use tokens::{TokenKind, TokenSizes};
