//! Authorisation of status changes on an existing offer.
//!
//! An offer leaves `pending` exactly once. The pending check runs before the
//! owner check, so a stranger touching a settled offer sees that it is no
//! longer pending rather than a permissions error.

use crate::domain::{OfferId, UserId};

use super::{OfferResponse, OfferStatus, TradeOffer};

/// Why a status change was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    /// The offer already reached a terminal status.
    #[error("offer is {current}, only pending offers can change status")]
    NotPending {
        /// Status found on the offer.
        current: OfferStatus,
    },
    /// The actor is not the owner recorded on the offer.
    #[error("only the owner of the requested game can respond to this offer")]
    NotOwner,
}

impl TransitionError {
    /// Stable machine-readable sub-code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotPending { .. } => "offer_not_pending",
            Self::NotOwner => "not_owner",
        }
    }
}

/// A permitted status change awaiting application by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OfferTransition {
    /// Offer being changed.
    pub offer_id: OfferId,
    /// Status the offer moves to.
    pub to: OfferStatus,
}

/// Decide whether `actor` may apply `response` to `offer`.
///
/// Only the owner recorded on the offer may respond, whichever response it
/// is. The requester cannot withdraw their own offer. An `actor` of `None`
/// stands for a claimed id that can name no user; it owns nothing.
pub fn authorize(
    offer: &TradeOffer,
    actor: Option<UserId>,
    response: OfferResponse,
) -> Result<OfferTransition, TransitionError> {
    let to = response.target_status();
    if !offer.status().can_transition_to(to) {
        return Err(TransitionError::NotPending {
            current: offer.status(),
        });
    }
    if actor != Some(offer.owner()) {
        return Err(TransitionError::NotOwner);
    }
    Ok(OfferTransition {
        offer_id: offer.id(),
        to,
    })
}
