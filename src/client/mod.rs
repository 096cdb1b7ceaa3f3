//! Client side of the remote move service.
//!
//! The service owns move computation; this crate only asks it for build
//! status, triggers builds, and fetches moves and chances, all keyed by
//! the board snapshot string.

mod error;
mod rest;
mod types;

pub use error::ServiceError;
pub use rest::RestMoveService;
pub use types::{BuildStatus, ChancePercentages, Chances, Envelope, NextMove};

/// The four calls the controller makes against the move service.
#[async_trait::async_trait]
pub trait MoveService: Send + Sync {
    /// Build progress of the move map for `game`.
    async fn build_status(&self, game: &str) -> Result<BuildStatus, ServiceError>;

    /// Starts building the move map for `game`.
    async fn build(&self, game: &str) -> Result<(), ServiceError>;

    /// The service's reply move for `game`.
    async fn next_move(&self, game: &str) -> Result<NextMove, ServiceError>;

    /// Outcome weights for the local player in `game`.
    async fn chances(&self, game: &str) -> Result<Chances, ServiceError>;
}
