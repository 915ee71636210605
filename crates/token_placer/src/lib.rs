#![forbid(unsafe_code)]
//! token_placer: Region-constrained placement of circular tokens on a map.
//!
//! Modules:
//! - geometry: polygons, bounds and disk approximation with polygon clipping
//! - sampling: bounded rejection sampling of interior points
//! - search: search problems, strategies (genetic, annealing, beam, hill climbing), budgets, events
//! - placement: single and multi disk placement problems, feasibility assessment
//! - placer: named regions, token sizes, token store and the placer that fills it
//!
//! For examples and docs, see README and docs.rs.
pub mod error;
pub mod geometry;
pub mod placement;
pub mod placer;
pub mod sampling;
pub mod search;

/// Convenient re-exports for common types. Import with `use token_placer::prelude::*;`.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::geometry::{Bounds, Disk, Polygon};
    pub use crate::placement::{assess, Feasibility, MultiPlacement, SinglePlacement};
    pub use crate::placer::{
        place_multiple, place_single, seed_for_group, PendingTokens, PlacementConfig,
        PlacementOutcome, PlacementReport, PlacementWarning, Placer, RegionMap, TokenKind,
        TokenRecord, TokenRequest, TokenSizes, TokenStore, WHOLE_REGION,
    };
    pub use crate::sampling::RejectionSampler;
    pub use crate::search::{
        search, search_with_events, AnnealingConfig, BeamConfig, CancellationToken, EventSink,
        FnSink, GeneticConfig, HillClimbingConfig, MultiSink, SearchBudget, SearchEvent,
        SearchEventKind, SearchProblem, SearchStrategy, Solution, StopReason, VecSink,
    };
}
