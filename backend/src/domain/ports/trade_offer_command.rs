//! Driving port for creating and resolving trade offers.

use async_trait::async_trait;

use crate::domain::trade::{OfferRequest, OfferResponse, OfferStatus, TradeOffer};
use crate::domain::{Error, OfferId, UserId};

/// A decision submitted against an existing offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RespondToOfferRequest {
    /// Offer being resolved.
    pub offer_id: OfferId,
    /// User submitting the decision; must be the offer's owner. `None` when
    /// the claimed id is not a valid user id.
    pub actor: Option<UserId>,
    /// Requested outcome.
    pub response: OfferResponse,
}

/// Outcome of a successful response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferResolution {
    /// Offer that was resolved.
    pub offer_id: OfferId,
    /// Final status.
    pub status: OfferStatus,
    /// Pending offers cancelled as a side effect of an acceptance.
    pub cancelled_offers: Vec<OfferId>,
}

/// Domain use-case port for offer mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TradeOfferCommand: Send + Sync {
    /// Validate and store a new pending offer.
    async fn create_offer(&self, request: OfferRequest) -> Result<TradeOffer, Error>;

    /// Accept, reject or cancel a pending offer.
    async fn respond_to_offer(
        &self,
        request: RespondToOfferRequest,
    ) -> Result<OfferResolution, Error>;
}
