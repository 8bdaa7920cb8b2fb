pub mod buckets;
pub mod config;
pub mod error;
pub mod evaluate;
pub mod http_client;
pub mod matrix;
pub mod report;
pub mod roster;
pub mod roster_fetch;
pub mod sampler;
pub mod score;
pub mod search;
pub mod sheets;

pub use error::{BalanceError, BalanceResult, RosterError, Stage};
pub use search::{ScoredAssignment, SearchConfig, compute_assignments};
