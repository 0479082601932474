//! Driving port for reading trade offers.

use async_trait::async_trait;

use crate::domain::trade::{OfferDirection, TradeOffer};
use crate::domain::{Error, OfferId, UserId};

/// Domain use-case port for offer reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TradeOfferQuery: Send + Sync {
    /// Fetch one offer.
    async fn get_offer(&self, offer_id: OfferId) -> Result<TradeOffer, Error>;

    /// List a user's incoming or outgoing offers, in every status.
    async fn list_offers(
        &self,
        user_id: UserId,
        direction: OfferDirection,
    ) -> Result<Vec<TradeOffer>, Error>;
}
