//! Ownership swap performed when an offer is accepted.
//!
//! Stores call [`settle`] inside the same atomic unit that locks both games
//! and the offer. The returned [`Settlement`] lists the two ownership
//! transfers; the store applies them, marks the offer accepted and cancels
//! every other pending offer that touches either game.

use crate::domain::{GameId, GameOwnership, OfferId, UserId};

use super::{OfferStatus, TradeOffer};

/// Why an acceptance could not be settled.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AcceptanceError {
    /// The offer does not exist.
    #[error("offer {offer_id} not found")]
    OfferNotFound {
        /// Offer that was looked up.
        offer_id: OfferId,
    },
    /// The offer left `pending` before the acceptance could be applied.
    #[error("offer is {status}, only pending offers can be accepted")]
    OfferNotPending {
        /// Status found under lock.
        status: OfferStatus,
    },
    /// Ownership of either game changed since the offer was made.
    #[error("ownership of the traded games changed since the offer was made")]
    OfferStale,
    /// The store aborted the unit of work because of a concurrent update.
    #[error("concurrent update prevented acceptance: {message}")]
    Conflict {
        /// Store-provided detail, never shown to clients.
        message: String,
    },
}

impl AcceptanceError {
    /// Stable machine-readable sub-code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::OfferNotFound { .. } => "offer_not_found",
            Self::OfferNotPending { .. } => "offer_not_pending",
            Self::OfferStale => "offer_stale",
            Self::Conflict { .. } => "conflict",
        }
    }
}

/// One game changing hands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnershipTransfer {
    /// Game changing hands.
    pub game_id: GameId,
    /// Owner before the trade.
    pub from: UserId,
    /// Owner after the trade.
    pub to: UserId,
}

/// Verified plan for accepting one offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    offer_id: OfferId,
    transfers: [OwnershipTransfer; 2],
}

impl Settlement {
    /// Offer being accepted.
    #[must_use]
    pub fn offer_id(&self) -> OfferId {
        self.offer_id
    }

    /// Transfers to apply: requested game first, then offered game.
    #[must_use]
    pub fn transfers(&self) -> &[OwnershipTransfer; 2] {
        &self.transfers
    }

    /// Both games involved, in ascending id order.
    #[must_use]
    pub fn touched_games(&self) -> [GameId; 2] {
        let [first, second] = self.transfers;
        if first.game_id <= second.game_id {
            [first.game_id, second.game_id]
        } else {
            [second.game_id, first.game_id]
        }
    }
}

/// Result of a committed acceptance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedTrade {
    /// The offer, now `accepted`.
    pub offer: TradeOffer,
    /// Transfers that were applied.
    pub transfers: [OwnershipTransfer; 2],
    /// Other pending offers cancelled because they referenced either game.
    pub cancelled_offers: Vec<OfferId>,
}

/// Verify an offer can be accepted against the locked owners of its games.
///
/// The status is checked first so a retried acceptance reports
/// [`AcceptanceError::OfferNotPending`]. Ownership must still match what
/// the offer recorded: the requester owns the offered game and the owner
/// owns the requested game.
pub fn settle(
    offer: &TradeOffer,
    requested: GameOwnership,
    offered: GameOwnership,
) -> Result<Settlement, AcceptanceError> {
    if !offer.status().can_transition_to(OfferStatus::Accepted) {
        return Err(AcceptanceError::OfferNotPending {
            status: offer.status(),
        });
    }
    let same_games =
        requested.game_id == offer.game_requested() && offered.game_id == offer.game_offered();
    let same_owners = requested.owner == offer.owner() && offered.owner == offer.requester();
    if !same_games || !same_owners {
        return Err(AcceptanceError::OfferStale);
    }
    Ok(Settlement {
        offer_id: offer.id(),
        transfers: [
            OwnershipTransfer {
                game_id: requested.game_id,
                from: offer.owner(),
                to: offer.requester(),
            },
            OwnershipTransfer {
                game_id: offered.game_id,
                from: offer.requester(),
                to: offer.owner(),
            },
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::trade::NewTradeOffer;
    use chrono::Utc;
    use rstest::{fixture, rstest};

    fn user(raw: i64) -> UserId {
        UserId::new(raw).expect("valid user id")
    }

    fn game(raw: i64) -> GameId {
        GameId::new(raw).expect("valid game id")
    }

    fn owned(game_id: i64, owner: i64) -> GameOwnership {
        GameOwnership {
            game_id: game(game_id),
            owner: user(owner),
        }
    }

    #[fixture]
    fn offer() -> TradeOffer {
        TradeOffer::pending(
            OfferId::new(7).expect("valid offer id"),
            NewTradeOffer {
                requester: user(1),
                owner: user(2),
                game_requested: game(20),
                game_offered: game(10),
            },
            Utc::now(),
        )
    }

    #[rstest]
    fn swaps_owners_of_both_games(offer: TradeOffer) {
        let settlement = settle(&offer, owned(20, 2), owned(10, 1)).expect("settled");
        assert_eq!(
            settlement.transfers(),
            &[
                OwnershipTransfer {
                    game_id: game(20),
                    from: user(2),
                    to: user(1),
                },
                OwnershipTransfer {
                    game_id: game(10),
                    from: user(1),
                    to: user(2),
                },
            ]
        );
        assert_eq!(settlement.touched_games(), [game(10), game(20)]);
    }

    #[rstest]
    #[case(owned(20, 3), owned(10, 1))]
    #[case(owned(20, 2), owned(10, 3))]
    #[case(owned(20, 1), owned(10, 2))]
    fn changed_ownership_makes_offer_stale(
        offer: TradeOffer,
        #[case] requested: GameOwnership,
        #[case] offered: GameOwnership,
    ) {
        assert_eq!(
            settle(&offer, requested, offered),
            Err(AcceptanceError::OfferStale)
        );
    }

    #[rstest]
    fn settled_offer_reports_not_pending_before_staleness(offer: TradeOffer) {
        let accepted = offer.with_status(OfferStatus::Accepted, Utc::now());
        // Owners already swapped by the earlier acceptance.
        let err = settle(&accepted, owned(20, 1), owned(10, 2)).expect_err("not pending");
        assert_eq!(
            err,
            AcceptanceError::OfferNotPending {
                status: OfferStatus::Accepted
            }
        );
    }
}
