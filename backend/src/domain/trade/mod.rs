//! Trade-offer negotiation engine.
//!
//! - [`offer`]: the offer entity, its status lattice and request vocabulary.
//! - [`validation`]: admission rules for new offers.
//! - [`state_machine`]: who may move an offer out of `pending`, and when.
//! - [`settlement`]: the ownership swap performed when an offer is accepted.
//!
//! Everything here is pure. Adapters fetch the records, call these rules,
//! and apply the outcome atomically.

pub mod offer;
pub mod settlement;
pub mod state_machine;
pub mod validation;

pub use self::offer::{
    NewTradeOffer, OfferDirection, OfferResponse, OfferStatus, ParseOfferStatusError,
    TradeOffer, TradeOfferDraft, TradeOfferInvariantError, UnknownOfferResponse,
};
pub use self::settlement::{AcceptanceError, AcceptedTrade, OwnershipTransfer, Settlement, settle};
pub use self::state_machine::{OfferTransition, TransitionError, authorize};
pub use self::validation::{CheckedOfferRequest, OfferRejection, OfferRequest};
