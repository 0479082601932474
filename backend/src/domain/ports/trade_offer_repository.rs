//! Port for trade offer persistence and atomic acceptance.

use async_trait::async_trait;

use crate::domain::trade::{AcceptanceError, AcceptedTrade, NewTradeOffer, OfferTransition, TradeOffer};
use crate::domain::{OfferId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by trade offer repository adapters.
    pub enum TradeOfferRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "trade offer repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "trade offer repository query failed: {message}",
        /// Settlement refused the acceptance.
        Acceptance { reason: AcceptanceError } =>
            "trade offer acceptance failed: {reason}",
    }
}

/// Port for storing offers and applying their status changes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TradeOfferRepository: Send + Sync {
    /// Persist an admitted offer as `pending`.
    async fn insert(&self, offer: &NewTradeOffer) -> Result<TradeOffer, TradeOfferRepositoryError>;

    /// Find an offer by id.
    async fn find_by_id(&self, id: OfferId)
    -> Result<Option<TradeOffer>, TradeOfferRepositoryError>;

    /// Offers made by `requester`, ordered by id.
    async fn list_by_requester(
        &self,
        requester: UserId,
    ) -> Result<Vec<TradeOffer>, TradeOfferRepositoryError>;

    /// Offers whose recorded owner is `owner`, ordered by id.
    async fn list_by_owner(&self, owner: UserId)
    -> Result<Vec<TradeOffer>, TradeOfferRepositoryError>;

    /// Move a still-pending offer to a rejected or cancelled status.
    ///
    /// Returns `Ok(false)` when the offer had already left `pending`.
    async fn close_pending(
        &self,
        transition: OfferTransition,
    ) -> Result<bool, TradeOfferRepositoryError>;

    /// Accept an offer as one atomic unit.
    ///
    /// Locks both games and the offer, verifies the offer with
    /// [`crate::domain::trade::settle`], swaps ownership, marks the offer
    /// accepted and cancels every other pending offer touching either game.
    /// Nothing is written when any step fails.
    async fn accept(&self, id: OfferId) -> Result<AcceptedTrade, TradeOfferRepositoryError>;
}
