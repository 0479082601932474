//! PostgreSQL-backed [`TradeOfferRepository`].
//!
//! Acceptance runs in one transaction under row locks. Locks are always
//! taken in the same order (both games by ascending id, then the offer) so
//! two acceptances touching overlapping games serialise instead of
//! deadlocking. Whatever slips through as a serialization failure or
//! deadlock abort is reported as [`AcceptanceError::Conflict`].

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{TradeOfferRepository, TradeOfferRepositoryError};
use crate::domain::trade::{
    AcceptanceError, AcceptedTrade, NewTradeOffer, OfferStatus, OfferTransition, TradeOffer,
    TradeOfferDraft, settle,
};
use crate::domain::{GameId, GameOwnership, OfferId, UserId};

use super::diesel_error_mapping::{concurrency_abort, map_basic_diesel_error, map_pool_error};
use super::models::{NewTradeOfferRow, TradeOfferRow};
use super::pool::{DbPool, PoolError};
use super::schema::{games, trade_offers};

/// Diesel-backed implementation of the trade offer repository port.
#[derive(Clone)]
pub struct DieselTradeOfferRepository {
    pool: DbPool,
}

impl DieselTradeOfferRepository {
    /// Create a repository over the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn list_where<F>(&self, filter: F) -> Result<Vec<TradeOffer>, TradeOfferRepositoryError>
    where
        F: FnOnce(
            trade_offers::BoxedQuery<'static, diesel::pg::Pg>,
        ) -> trade_offers::BoxedQuery<'static, diesel::pg::Pg>,
    {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows = filter(trade_offers::table.into_boxed())
            .order(trade_offers::id.asc())
            .select(TradeOfferRow::as_select())
            .load::<TradeOfferRow>(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter()
            .map(|row| row_to_offer(row).map_err(TradeOfferRepositoryError::query))
            .collect()
    }
}

fn pool_error(error: PoolError) -> TradeOfferRepositoryError {
    map_pool_error(error, TradeOfferRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> TradeOfferRepositoryError {
    map_basic_diesel_error(
        error,
        TradeOfferRepositoryError::query,
        TradeOfferRepositoryError::connection,
    )
}

/// Convert a stored row, describing the first inconsistency found.
fn row_to_offer(row: TradeOfferRow) -> Result<TradeOffer, String> {
    let corrupt = |detail: String| format!("corrupt trade offer row {}: {detail}", row.id);
    let draft = TradeOfferDraft {
        id: OfferId::new(row.id).map_err(|err| corrupt(err.to_string()))?,
        requester: UserId::new(row.requester_id).map_err(|err| corrupt(err.to_string()))?,
        owner: UserId::new(row.owner_user_id).map_err(|err| corrupt(err.to_string()))?,
        game_requested: GameId::new(row.game_requested_id)
            .map_err(|err| corrupt(err.to_string()))?,
        game_offered: GameId::new(row.game_offered_id).map_err(|err| corrupt(err.to_string()))?,
        status: row
            .current_status
            .parse::<OfferStatus>()
            .map_err(|err| corrupt(err.to_string()))?,
        created_at: row.created_at,
        updated_at: row.updated_at,
    };
    TradeOffer::new(draft).map_err(|err| corrupt(err.to_string()))
}

/// Failure inside the acceptance transaction.
#[derive(Debug)]
enum AcceptanceTxError {
    Diesel(diesel::result::Error),
    Rejected(AcceptanceError),
    Corrupt(String),
}

impl From<diesel::result::Error> for AcceptanceTxError {
    fn from(value: diesel::result::Error) -> Self {
        Self::Diesel(value)
    }
}

impl From<AcceptanceTxError> for TradeOfferRepositoryError {
    fn from(value: AcceptanceTxError) -> Self {
        match value {
            AcceptanceTxError::Rejected(reason) => Self::acceptance(reason),
            AcceptanceTxError::Corrupt(message) => Self::query(message),
            AcceptanceTxError::Diesel(err) => match concurrency_abort(&err) {
                Some(message) => {
                    debug!(%message, "acceptance aborted by concurrent update");
                    Self::acceptance(AcceptanceError::Conflict { message })
                }
                None => diesel_error(err),
            },
        }
    }
}

async fn load_offer(
    conn: &mut AsyncPgConnection,
    id: OfferId,
    lock: bool,
) -> Result<TradeOffer, AcceptanceTxError> {
    let query = trade_offers::table
        .find(id.get())
        .select(TradeOfferRow::as_select());
    let result = if lock {
        query.for_update().first::<TradeOfferRow>(conn).await
    } else {
        query.first::<TradeOfferRow>(conn).await
    };
    let row = result.optional()?.ok_or(AcceptanceTxError::Rejected(AcceptanceError::OfferNotFound {
        offer_id: id,
    }))?;
    row_to_offer(row).map_err(AcceptanceTxError::Corrupt)
}

/// Lock both games in ascending id order and report their owners.
async fn lock_games(
    conn: &mut AsyncPgConnection,
    offer: &TradeOffer,
) -> Result<(GameOwnership, GameOwnership), AcceptanceTxError> {
    let rows: Vec<(i64, i64)> = games::table
        .filter(games::id.eq_any([offer.game_requested().get(), offer.game_offered().get()]))
        .order(games::id.asc())
        .select((games::id, games::owner_user_id))
        .for_update()
        .load(conn)
        .await?;

    let ownership_of = |game: GameId| -> Result<GameOwnership, AcceptanceTxError> {
        let (_, owner_id) = rows
            .iter()
            .find(|(id, _)| *id == game.get())
            .ok_or(AcceptanceTxError::Rejected(AcceptanceError::OfferStale))?;
        let owner = UserId::new(*owner_id)
            .map_err(|err| AcceptanceTxError::Corrupt(format!("corrupt game row {game}: {err}")))?;
        Ok(GameOwnership {
            game_id: game,
            owner,
        })
    };
    Ok((
        ownership_of(offer.game_requested())?,
        ownership_of(offer.game_offered())?,
    ))
}

async fn accept_in_transaction(
    conn: &mut AsyncPgConnection,
    id: OfferId,
) -> Result<AcceptedTrade, AcceptanceTxError> {
    let snapshot = load_offer(conn, id, false).await?;
    let (requested, offered) = lock_games(conn, &snapshot).await?;
    let offer = load_offer(conn, id, true).await?;
    let settlement =
        settle(&offer, requested, offered).map_err(AcceptanceTxError::Rejected)?;

    let now = Utc::now();
    for transfer in settlement.transfers() {
        diesel::update(games::table.find(transfer.game_id.get()))
            .set((
                games::owner_user_id.eq(transfer.to.get()),
                games::updated_at.eq(now),
            ))
            .execute(conn)
            .await?;
    }

    let accepted_row = diesel::update(trade_offers::table.find(id.get()))
        .set((
            trade_offers::current_status.eq(OfferStatus::Accepted.as_str()),
            trade_offers::updated_at.eq(now),
        ))
        .returning(TradeOfferRow::as_returning())
        .get_result::<TradeOfferRow>(conn)
        .await?;

    let touched = settlement.touched_games().map(GameId::get);
    let cancelled: Vec<i64> = diesel::update(
        trade_offers::table
            .filter(trade_offers::current_status.eq(OfferStatus::Pending.as_str()))
            .filter(trade_offers::id.ne(id.get()))
            .filter(
                trade_offers::game_requested_id
                    .eq_any(touched)
                    .or(trade_offers::game_offered_id.eq_any(touched)),
            ),
    )
    .set((
        trade_offers::current_status.eq(OfferStatus::Cancelled.as_str()),
        trade_offers::updated_at.eq(now),
    ))
    .returning(trade_offers::id)
    .get_results(conn)
    .await?;

    let mut cancelled_offers = cancelled
        .into_iter()
        .map(|raw| {
            OfferId::new(raw).map_err(|err| {
                AcceptanceTxError::Corrupt(format!("corrupt trade offer id {raw}: {err}"))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    cancelled_offers.sort_unstable();

    Ok(AcceptedTrade {
        offer: row_to_offer(accepted_row).map_err(AcceptanceTxError::Corrupt)?,
        transfers: *settlement.transfers(),
        cancelled_offers,
    })
}

#[async_trait]
impl TradeOfferRepository for DieselTradeOfferRepository {
    async fn insert(&self, offer: &NewTradeOffer) -> Result<TradeOffer, TradeOfferRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = NewTradeOfferRow {
            requester_id: offer.requester.get(),
            owner_user_id: offer.owner.get(),
            game_requested_id: offer.game_requested.get(),
            game_offered_id: offer.game_offered.get(),
        };
        let inserted = diesel::insert_into(trade_offers::table)
            .values(&row)
            .returning(TradeOfferRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;
        row_to_offer(inserted).map_err(TradeOfferRepositoryError::query)
    }

    async fn find_by_id(
        &self,
        id: OfferId,
    ) -> Result<Option<TradeOffer>, TradeOfferRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = trade_offers::table
            .find(id.get())
            .select(TradeOfferRow::as_select())
            .first::<TradeOfferRow>(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(|row| row_to_offer(row).map_err(TradeOfferRepositoryError::query))
            .transpose()
    }

    async fn list_by_requester(
        &self,
        requester: UserId,
    ) -> Result<Vec<TradeOffer>, TradeOfferRepositoryError> {
        self.list_where(|query| query.filter(trade_offers::requester_id.eq(requester.get())))
            .await
    }

    async fn list_by_owner(
        &self,
        owner: UserId,
    ) -> Result<Vec<TradeOffer>, TradeOfferRepositoryError> {
        self.list_where(|query| query.filter(trade_offers::owner_user_id.eq(owner.get())))
            .await
    }

    async fn close_pending(
        &self,
        transition: OfferTransition,
    ) -> Result<bool, TradeOfferRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let updated = diesel::update(
            trade_offers::table
                .find(transition.offer_id.get())
                .filter(trade_offers::current_status.eq(OfferStatus::Pending.as_str())),
        )
        .set((
            trade_offers::current_status.eq(transition.to.as_str()),
            trade_offers::updated_at.eq(Utc::now()),
        ))
        .execute(&mut conn)
        .await
        .map_err(diesel_error)?;
        Ok(updated == 1)
    }

    async fn accept(&self, id: OfferId) -> Result<AcceptedTrade, TradeOfferRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let accepted = conn
            .transaction(|conn| async move { accept_in_transaction(conn, id).await }.scope_boxed())
            .await?;
        debug!(
            offer_id = %id,
            cancelled = accepted.cancelled_offers.len(),
            "trade offer accepted"
        );
        Ok(accepted)
    }
}
