//! # dl-rules — Game rule model for number-draw RTP validation
//!
//! Immutable descriptions of number-draw games: the number pool, selection
//! count, ticket price, prize tiers, and the progressive-jackpot funding
//! policy, plus the run parameters of a simulation. Everything is validated
//! here, before a simulation engine is built; the engine assumes a valid
//! rule set and has no configuration failure paths of its own.
//!
//! ## Architecture
//!
//! ```text
//! GameRules ──validate──▶ PayoutSchedule (PrizeKind per tier)
//!     │                          │
//!     └── SimulationConfig ──────┴──▶ dl-engine
//! ```
//!
//! Prize kinds are resolved once at load time: each tier becomes `Fixed`,
//! `Pooled` (optionally the jackpot tier), or `NoPayout`, so round-time
//! settlement dispatches on a variant instead of inspecting level numbers.

pub mod config;
pub mod payout;
pub mod presets;
pub mod probability;
pub mod rules;

pub use config::*;
pub use payout::*;
pub use presets::*;
pub use probability::*;
pub use rules::*;
