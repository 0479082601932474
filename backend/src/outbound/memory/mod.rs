//! In-process adapter implementing the repository ports.
//!
//! Used when no database URL is configured and by tests. All three
//! repositories share one [`InMemoryStore`], and every operation runs under
//! a single mutex, so an acceptance observes and mutates games and offers as
//! one atomic unit just as the PostgreSQL transaction does. The lock is
//! never held across an `.await`.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::ports::{
    GameRepository, GameRepositoryError, TradeOfferRepository, TradeOfferRepositoryError,
    UserRepository, UserRepositoryError,
};
use crate::domain::trade::{
    AcceptanceError, AcceptedTrade, NewTradeOffer, OfferStatus, OfferTransition, TradeOffer,
    settle,
};
use crate::domain::{
    Game, GameDetails, GameDetailsPatch, GameId, GameOwnership, NewGame, NewUser, OfferId, User,
    UserId, UserProfile, UserProfilePatch,
};

#[derive(Debug, Default)]
struct StoreState {
    users: BTreeMap<UserId, User>,
    games: BTreeMap<GameId, Game>,
    offers: BTreeMap<OfferId, TradeOffer>,
    last_user_id: i64,
    last_game_id: i64,
    last_offer_id: i64,
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

impl StoreState {
    fn user_in_use(&self, id: UserId) -> bool {
        self.games.values().any(|game| game.owner() == id)
            || self
                .offers
                .values()
                .any(|offer| offer.requester() == id || offer.owner() == id)
    }

    fn game_in_use(&self, id: GameId) -> bool {
        self.offers.values().any(|offer| offer.involves(id))
    }

    fn ownership(&self, id: GameId) -> Result<GameOwnership, AcceptanceError> {
        self.games
            .get(&id)
            .map(Game::ownership)
            .ok_or(AcceptanceError::OfferStale)
    }

    fn accept(&mut self, id: OfferId) -> Result<AcceptedTrade, AcceptanceError> {
        let offer = self
            .offers
            .get(&id)
            .cloned()
            .ok_or(AcceptanceError::OfferNotFound { offer_id: id })?;
        let requested = self.ownership(offer.game_requested())?;
        let offered = self.ownership(offer.game_offered())?;
        let settlement = settle(&offer, requested, offered)?;

        let now = Utc::now();
        for transfer in settlement.transfers() {
            if let Some(game) = self.games.remove(&transfer.game_id) {
                self.games
                    .insert(transfer.game_id, game.with_owner(transfer.to));
            }
        }

        let accepted = offer.with_status(OfferStatus::Accepted, now);
        self.offers.insert(id, accepted.clone());

        let [first, second] = settlement.touched_games();
        let mut cancelled_offers = Vec::new();
        for (other_id, other) in &mut self.offers {
            let conflicting = *other_id != id
                && other.status() == OfferStatus::Pending
                && (other.involves(first) || other.involves(second));
            if conflicting {
                *other = other.clone().with_status(OfferStatus::Cancelled, now);
                cancelled_offers.push(*other_id);
            }
        }

        Ok(AcceptedTrade {
            offer: accepted,
            transfers: *settlement.transfers(),
            cancelled_offers,
        })
    }
}

/// Shared backing state for the in-memory repositories.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// User repository backed by this store.
    #[must_use]
    pub fn users(&self) -> InMemoryUserRepository {
        InMemoryUserRepository {
            store: self.clone(),
        }
    }

    /// Game repository backed by this store.
    #[must_use]
    pub fn games(&self) -> InMemoryGameRepository {
        InMemoryGameRepository {
            store: self.clone(),
        }
    }

    /// Trade offer repository backed by this store.
    #[must_use]
    pub fn offers(&self) -> InMemoryTradeOfferRepository {
        InMemoryTradeOfferRepository {
            store: self.clone(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// [`UserRepository`] over an [`InMemoryStore`].
#[derive(Debug, Clone)]
pub struct InMemoryUserRepository {
    store: InMemoryStore,
}

/// [`GameRepository`] over an [`InMemoryStore`].
#[derive(Debug, Clone)]
pub struct InMemoryGameRepository {
    store: InMemoryStore,
}

/// [`TradeOfferRepository`] over an [`InMemoryStore`].
#[derive(Debug, Clone)]
pub struct InMemoryTradeOfferRepository {
    store: InMemoryStore,
}

fn invalid_id(err: impl std::fmt::Display) -> String {
    format!("identifier space exhausted: {err}")
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &NewUser) -> Result<User, UserRepositoryError> {
        let mut state = self.store.lock();
        let id = UserId::new(next_id(&mut state.last_user_id))
            .map_err(|err| UserRepositoryError::query(invalid_id(err)))?;
        let created = User::new(
            id,
            user.username.clone(),
            user.email.clone(),
            user.street_address.clone(),
        );
        state.users.insert(id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(self.store.lock().users.get(&id).cloned())
    }

    async fn update_profile(
        &self,
        id: UserId,
        profile: &UserProfile,
    ) -> Result<bool, UserRepositoryError> {
        let mut state = self.store.lock();
        let Some(stored) = state.users.get_mut(&id) else {
            return Ok(false);
        };
        *stored = stored.clone().with_profile(profile);
        Ok(true)
    }

    async fn patch_profile(
        &self,
        id: UserId,
        patch: &UserProfilePatch,
    ) -> Result<bool, UserRepositoryError> {
        let mut state = self.store.lock();
        let Some(stored) = state.users.get_mut(&id) else {
            return Ok(false);
        };
        *stored = stored.clone().with_patch(patch);
        Ok(true)
    }

    async fn delete(&self, id: UserId) -> Result<bool, UserRepositoryError> {
        let mut state = self.store.lock();
        if state.user_in_use(id) {
            return Err(UserRepositoryError::in_use(id.get()));
        }
        Ok(state.users.remove(&id).is_some())
    }
}

#[async_trait]
impl GameRepository for InMemoryGameRepository {
    async fn insert(&self, game: &NewGame) -> Result<Game, GameRepositoryError> {
        let mut state = self.store.lock();
        if !state.users.contains_key(&game.owner) {
            return Err(GameRepositoryError::owner_not_found(game.owner.get()));
        }
        let id = GameId::new(next_id(&mut state.last_game_id))
            .map_err(|err| GameRepositoryError::query(invalid_id(err)))?;
        let created = Game::new(id, game.owner, game.details.clone());
        state.games.insert(id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: GameId) -> Result<Option<Game>, GameRepositoryError> {
        Ok(self.store.lock().games.get(&id).cloned())
    }

    async fn list_not_owned_by(&self, owner: UserId) -> Result<Vec<Game>, GameRepositoryError> {
        Ok(self
            .store
            .lock()
            .games
            .values()
            .filter(|game| game.owner() != owner)
            .cloned()
            .collect())
    }

    async fn update_details(
        &self,
        id: GameId,
        details: &GameDetails,
    ) -> Result<bool, GameRepositoryError> {
        let mut state = self.store.lock();
        let Some(game) = state.games.get_mut(&id) else {
            return Ok(false);
        };
        *game = game.clone().with_details(details.clone());
        Ok(true)
    }

    async fn patch_details(
        &self,
        id: GameId,
        patch: &GameDetailsPatch,
    ) -> Result<bool, GameRepositoryError> {
        let mut state = self.store.lock();
        let Some(game) = state.games.get_mut(&id) else {
            return Ok(false);
        };
        let details = game.details().clone().with_patch(patch);
        *game = game.clone().with_details(details);
        Ok(true)
    }

    async fn delete(&self, id: GameId) -> Result<bool, GameRepositoryError> {
        let mut state = self.store.lock();
        if state.game_in_use(id) {
            return Err(GameRepositoryError::in_use(id.get()));
        }
        Ok(state.games.remove(&id).is_some())
    }
}

#[async_trait]
impl TradeOfferRepository for InMemoryTradeOfferRepository {
    async fn insert(&self, offer: &NewTradeOffer) -> Result<TradeOffer, TradeOfferRepositoryError> {
        let mut state = self.store.lock();
        let id = OfferId::new(next_id(&mut state.last_offer_id))
            .map_err(|err| TradeOfferRepositoryError::query(invalid_id(err)))?;
        let created = TradeOffer::pending(id, *offer, Utc::now());
        state.offers.insert(id, created.clone());
        Ok(created)
    }

    async fn find_by_id(
        &self,
        id: OfferId,
    ) -> Result<Option<TradeOffer>, TradeOfferRepositoryError> {
        Ok(self.store.lock().offers.get(&id).cloned())
    }

    async fn list_by_requester(
        &self,
        requester: UserId,
    ) -> Result<Vec<TradeOffer>, TradeOfferRepositoryError> {
        Ok(self
            .store
            .lock()
            .offers
            .values()
            .filter(|offer| offer.requester() == requester)
            .cloned()
            .collect())
    }

    async fn list_by_owner(
        &self,
        owner: UserId,
    ) -> Result<Vec<TradeOffer>, TradeOfferRepositoryError> {
        Ok(self
            .store
            .lock()
            .offers
            .values()
            .filter(|offer| offer.owner() == owner)
            .cloned()
            .collect())
    }

    async fn close_pending(
        &self,
        transition: OfferTransition,
    ) -> Result<bool, TradeOfferRepositoryError> {
        let mut state = self.store.lock();
        let Some(offer) = state.offers.get_mut(&transition.offer_id) else {
            return Ok(false);
        };
        if offer.status() != OfferStatus::Pending {
            return Ok(false);
        }
        *offer = offer.clone().with_status(transition.to, Utc::now());
        Ok(true)
    }

    async fn accept(&self, id: OfferId) -> Result<AcceptedTrade, TradeOfferRepositoryError> {
        self.store
            .lock()
            .accept(id)
            .map_err(TradeOfferRepositoryError::acceptance)
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
