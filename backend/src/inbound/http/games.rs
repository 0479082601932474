//! Game catalogue HTTP handlers.
//!
//! ```text
//! POST   /games
//! GET    /games?excludeOwnerId=<id>
//! GET    /games/{id}
//! PUT    /games/{id}
//! PATCH  /games/{id}
//! DELETE /games/{id}
//! ```
//!
//! Ownership is read-only here; only an accepted trade moves a game.

use actix_web::http::header;
use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::PatchGameRequest;
use crate::domain::{Error, Game, GameDetailsDraft, GameId, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::links::Links;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, id_from_number, parse_id, require};

const GAME_ID: FieldName = FieldName::new("gameId");
const OWNER_USER_ID: FieldName = FieldName::new("ownerUserId");
const EXCLUDE_OWNER_ID: FieldName = FieldName::new("excludeOwnerId");

/// Descriptive fields shared by create and replace.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GameDetailsRequest {
    #[schema(example = "Catan")]
    pub title: Option<String>,
    #[schema(example = "Kosmos")]
    pub publisher: Option<String>,
    #[schema(example = "Trade, build and settle")]
    pub description: Option<String>,
    #[schema(example = 1995)]
    pub year: Option<i32>,
    #[schema(example = "good")]
    pub condition: Option<String>,
}

/// Request payload for listing a game.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateGameRequest {
    /// Initial owner.
    #[schema(example = 1)]
    pub owner_user_id: Option<i64>,
    pub title: Option<String>,
    pub publisher: Option<String>,
    pub description: Option<String>,
    pub year: Option<i32>,
    pub condition: Option<String>,
}

impl CreateGameRequest {
    fn into_parts(self) -> (Option<i64>, GameDetailsRequest) {
        let details = GameDetailsRequest {
            title: self.title,
            publisher: self.publisher,
            description: self.description,
            year: self.year,
            condition: self.condition,
        };
        (self.owner_user_id, details)
    }
}

/// Request payload for a partial descriptive update.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PatchGameBody {
    pub title: Option<String>,
    pub description: Option<String>,
    pub condition: Option<String>,
}

/// Query parameters for browsing tradeable games.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct BrowseGamesQuery {
    /// Games owned by this user are left out.
    pub exclude_owner_id: Option<String>,
}

/// Game representation.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GameResponse {
    pub id: i64,
    pub owner_user_id: i64,
    pub title: String,
    pub publisher: String,
    pub description: String,
    pub year: i32,
    pub condition: String,
    #[serde(rename = "_links")]
    pub links: Links,
}

impl From<Game> for GameResponse {
    fn from(game: Game) -> Self {
        let details = game.details();
        Self {
            id: game.id().get(),
            owner_user_id: game.owner().get(),
            title: details.title().to_owned(),
            publisher: details.publisher().to_owned(),
            description: details.description().to_owned(),
            year: details.year(),
            condition: details.condition().to_owned(),
            links: Links::deletable("games", game.id()),
        }
    }
}

fn parse_details(payload: GameDetailsRequest) -> Result<GameDetailsDraft, Error> {
    Ok(GameDetailsDraft {
        title: require(payload.title, FieldName::new("title"))?,
        publisher: require(payload.publisher, FieldName::new("publisher"))?,
        description: require(payload.description, FieldName::new("description"))?,
        year: require(payload.year, FieldName::new("year"))?,
        condition: require(payload.condition, FieldName::new("condition"))?,
    })
}

/// List a game for trading.
#[utoipa::path(
    post,
    path = "/games",
    request_body = CreateGameRequest,
    responses(
        (status = 201, description = "Game listed", body = GameResponse),
        (status = 400, description = "Missing or invalid fields", body = ErrorSchema),
        (status = 404, description = "Owner does not exist", body = ErrorSchema)
    ),
    tags = ["games"],
    operation_id = "createGame"
)]
#[post("/games")]
pub async fn list_game(
    state: web::Data<HttpState>,
    payload: web::Json<CreateGameRequest>,
) -> ApiResult<HttpResponse> {
    let (owner_user_id, details) = payload.into_inner().into_parts();
    let owner: UserId = id_from_number(require(owner_user_id, OWNER_USER_ID)?, OWNER_USER_ID)?;
    let game = state.games.list_game(owner, parse_details(details)?).await?;
    let body = GameResponse::from(game);
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, body.links.self_link.href.clone()))
        .json(body))
}

/// Browse games owned by anyone except the given user.
#[utoipa::path(
    get,
    path = "/games",
    params(BrowseGamesQuery),
    responses(
        (status = 200, description = "Tradeable games", body = [GameResponse]),
        (status = 400, description = "Missing or malformed excludeOwnerId", body = ErrorSchema)
    ),
    tags = ["games"],
    operation_id = "browseGames"
)]
#[get("/games")]
pub async fn browse_games(
    state: web::Data<HttpState>,
    query: web::Query<BrowseGamesQuery>,
) -> ApiResult<web::Json<Vec<GameResponse>>> {
    let raw = require(query.into_inner().exclude_owner_id, EXCLUDE_OWNER_ID)?;
    let viewer: UserId = parse_id(&raw, EXCLUDE_OWNER_ID)?;
    let games = state.games.browse(viewer).await?;
    Ok(web::Json(games.into_iter().map(GameResponse::from).collect()))
}

/// Fetch one game.
#[utoipa::path(
    get,
    path = "/games/{id}",
    params(("id" = i64, Path, description = "Game identifier")),
    responses(
        (status = 200, description = "The game", body = GameResponse),
        (status = 404, description = "No such game", body = ErrorSchema)
    ),
    tags = ["games"],
    operation_id = "getGame"
)]
#[get("/games/{id}")]
pub async fn get_game(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<GameResponse>> {
    let id: GameId = parse_id(&path.into_inner(), GAME_ID)?;
    Ok(web::Json(GameResponse::from(state.games.get_game(id).await?)))
}

/// Replace every descriptive field of a game.
#[utoipa::path(
    put,
    path = "/games/{id}",
    params(("id" = i64, Path, description = "Game identifier")),
    request_body = GameDetailsRequest,
    responses(
        (status = 204, description = "Game updated"),
        (status = 400, description = "Missing or invalid fields", body = ErrorSchema),
        (status = 404, description = "No such game", body = ErrorSchema)
    ),
    tags = ["games"],
    operation_id = "replaceGame"
)]
#[put("/games/{id}")]
pub async fn replace_game(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<GameDetailsRequest>,
) -> ApiResult<HttpResponse> {
    let id: GameId = parse_id(&path.into_inner(), GAME_ID)?;
    let draft = parse_details(payload.into_inner())?;
    state.games.replace_details(id, draft).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Change some descriptive fields of a game.
#[utoipa::path(
    patch,
    path = "/games/{id}",
    params(("id" = i64, Path, description = "Game identifier")),
    request_body = PatchGameBody,
    responses(
        (status = 204, description = "Game updated"),
        (status = 400, description = "Empty or invalid patch", body = ErrorSchema),
        (status = 404, description = "No such game", body = ErrorSchema)
    ),
    tags = ["games"],
    operation_id = "patchGame"
)]
#[patch("/games/{id}")]
pub async fn patch_game(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<PatchGameBody>,
) -> ApiResult<HttpResponse> {
    let id: GameId = parse_id(&path.into_inner(), GAME_ID)?;
    let PatchGameBody {
        title,
        description,
        condition,
    } = payload.into_inner();
    state
        .games
        .patch_details(
            id,
            PatchGameRequest {
                title,
                description,
                condition,
            },
        )
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Remove a game that no offer references.
#[utoipa::path(
    delete,
    path = "/games/{id}",
    params(("id" = i64, Path, description = "Game identifier")),
    responses(
        (status = 204, description = "Game removed"),
        (status = 404, description = "No such game", body = ErrorSchema),
        (status = 409, description = "Game is referenced by offers", body = ErrorSchema)
    ),
    tags = ["games"],
    operation_id = "deleteGame"
)]
#[delete("/games/{id}")]
pub async fn delete_game(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id: GameId = parse_id(&path.into_inner(), GAME_ID)?;
    state.games.delete_game(id).await?;
    Ok(HttpResponse::NoContent().finish())
}
