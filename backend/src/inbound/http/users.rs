//! User account HTTP handlers.
//!
//! ```text
//! POST   /users
//! GET    /users/{id}
//! PUT    /users/{id}
//! PATCH  /users/{id}
//! DELETE /users/{id}
//! ```

use actix_web::http::header;
use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{PatchProfileRequest, RegisterUserRequest, ReplaceProfileRequest};
use crate::domain::{User, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::links::Links;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id, require};

const USER_ID: FieldName = FieldName::new("userId");
const USERNAME: FieldName = FieldName::new("username");
const STREET_ADDRESS: FieldName = FieldName::new("streetAddress");

/// Registration payload.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegisterUserBody {
    #[schema(example = "ada")]
    pub username: Option<String>,
    /// Stored only as a salted hash.
    #[schema(example = "correct horse battery staple", format = Password)]
    pub password: Option<String>,
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
    #[schema(example = "12 Analytical Row")]
    pub street_address: Option<String>,
}

/// Full profile replacement payload.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ReplaceUserBody {
    pub username: Option<String>,
    pub street_address: Option<String>,
}

/// Partial profile update payload.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PatchUserBody {
    pub username: Option<String>,
    pub street_address: Option<String>,
}

/// User representation. The password hash never leaves the server.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub street_address: String,
    #[serde(rename = "_links")]
    pub links: Links,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id().get(),
            username: user.username().as_str().to_owned(),
            email: user.email().as_str().to_owned(),
            street_address: user.street_address().as_str().to_owned(),
            links: Links::deletable("users", user.id()),
        }
    }
}

/// Register a new user.
#[utoipa::path(
    post,
    path = "/users",
    request_body = RegisterUserBody,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, description = "Missing or invalid fields", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "registerUser"
)]
#[post("/users")]
pub async fn register_user(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterUserBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let request = RegisterUserRequest {
        username: require(body.username, USERNAME)?,
        password: require(body.password, FieldName::new("password"))?,
        email: require(body.email, FieldName::new("email"))?,
        street_address: require(body.street_address, STREET_ADDRESS)?,
    };
    let user = UserResponse::from(state.users.register(request).await?);
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, user.links.self_link.href.clone()))
        .json(user))
}

/// Fetch a user.
#[utoipa::path(
    get,
    path = "/users/{id}",
    params(("id" = i64, Path, description = "User identifier")),
    responses(
        (status = 200, description = "The user", body = UserResponse),
        (status = 400, description = "Malformed identifier", body = ErrorSchema),
        (status = 404, description = "No such user", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserResponse>> {
    let id: UserId = parse_id(&path.into_inner(), USER_ID)?;
    Ok(web::Json(UserResponse::from(state.users.get_user(id).await?)))
}

/// Replace a user's profile.
#[utoipa::path(
    put,
    path = "/users/{id}",
    params(("id" = i64, Path, description = "User identifier")),
    request_body = ReplaceUserBody,
    responses(
        (status = 204, description = "Profile replaced"),
        (status = 400, description = "Missing or invalid fields", body = ErrorSchema),
        (status = 404, description = "No such user", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "replaceUser"
)]
#[put("/users/{id}")]
pub async fn replace_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<ReplaceUserBody>,
) -> ApiResult<HttpResponse> {
    let id: UserId = parse_id(&path.into_inner(), USER_ID)?;
    let body = payload.into_inner();
    let request = ReplaceProfileRequest {
        username: require(body.username, USERNAME)?,
        street_address: require(body.street_address, STREET_ADDRESS)?,
    };
    state.users.replace_profile(id, request).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Update some profile fields.
#[utoipa::path(
    patch,
    path = "/users/{id}",
    params(("id" = i64, Path, description = "User identifier")),
    request_body = PatchUserBody,
    responses(
        (status = 204, description = "Profile updated"),
        (status = 400, description = "Empty or invalid patch", body = ErrorSchema),
        (status = 404, description = "No such user", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "patchUser"
)]
#[patch("/users/{id}")]
pub async fn patch_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<PatchUserBody>,
) -> ApiResult<HttpResponse> {
    let id: UserId = parse_id(&path.into_inner(), USER_ID)?;
    let PatchUserBody {
        username,
        street_address,
    } = payload.into_inner();
    state
        .users
        .patch_profile(
            id,
            PatchProfileRequest {
                username,
                street_address,
            },
        )
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Delete a user that owns nothing and is party to no offers.
#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(("id" = i64, Path, description = "User identifier")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "No such user", body = ErrorSchema),
        (status = 409, description = "User still owns games or offers", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id: UserId = parse_id(&path.into_inner(), USER_ID)?;
    state.users.delete_user(id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use actix_web::http::{StatusCode, header};
    use actix_web::test::{self, TestRequest};
    use rstest::rstest;
    use serde_json::{Value, json};

    use crate::inbound::http::test_utils::{in_memory_state, init_app, send_json};
    use crate::outbound::memory::InMemoryStore;

    fn ada() -> Value {
        json!({
            "username": "ada",
            "password": "correct horse battery staple",
            "email": "ada@example.com",
            "streetAddress": "12 Analytical Row"
        })
    }

    #[rstest]
    #[actix_web::test]
    async fn registration_sets_location_and_hides_password() {
        let app = init_app(in_memory_state(&InMemoryStore::new())).await;

        let res = test::call_service(
            &app,
            TestRequest::post().uri("/users").set_json(ada()).to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::CREATED);
        let location = res
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        assert_eq!(location.as_deref(), Some("/users/1"));
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["streetAddress"], "12 Analytical Row");
        assert!(body.get("password").is_none());
        assert!(body.get("passwordHash").is_none());
        assert_eq!(body["_links"]["self"]["href"], "/users/1");
    }

    #[rstest]
    #[case::missing_password(json!({"username": "ada", "email": "ada@example.com", "streetAddress": "x"}), "missing_field")]
    #[case::unknown_field(json!({"username": "ada", "password": "p", "email": "ada@example.com", "streetAddress": "x", "admin": true}), "invalid_input")]
    #[case::bad_email(json!({"username": "ada", "password": "p", "email": "nope", "streetAddress": "x"}), "invalid_field")]
    #[actix_web::test]
    async fn invalid_registrations_are_bad_requests(
        #[case] payload: Value,
        #[case] expected_detail: &str,
    ) {
        let app = init_app(in_memory_state(&InMemoryStore::new())).await;

        let (status, body) =
            send_json(&app, TestRequest::post().uri("/users").set_json(payload)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let detail = body["details"]["reason"]
            .as_str()
            .or_else(|| body["details"]["code"].as_str());
        assert_eq!(detail, Some(expected_detail));
    }

    #[rstest]
    #[actix_web::test]
    async fn profile_updates_are_applied() {
        let app = init_app(in_memory_state(&InMemoryStore::new())).await;
        send_json(&app, TestRequest::post().uri("/users").set_json(ada())).await;

        let (put, _) = send_json(
            &app,
            TestRequest::put().uri("/users/1").set_json(json!({
                "username": "countess",
                "streetAddress": "1 Engine Lane"
            })),
        )
        .await;
        let (patch, _) = send_json(
            &app,
            TestRequest::patch()
                .uri("/users/1")
                .set_json(json!({"username": "lovelace"})),
        )
        .await;
        let (empty, _) =
            send_json(&app, TestRequest::patch().uri("/users/1").set_json(json!({}))).await;
        let (_, user) = send_json(&app, TestRequest::get().uri("/users/1")).await;

        assert_eq!(put, StatusCode::NO_CONTENT);
        assert_eq!(patch, StatusCode::NO_CONTENT);
        assert_eq!(empty, StatusCode::BAD_REQUEST);
        assert_eq!(user["username"], "lovelace");
        assert_eq!(user["streetAddress"], "1 Engine Lane");
        assert_eq!(user["email"], "ada@example.com");
    }

    #[rstest]
    #[case::get(TestRequest::get().uri("/users/5"), StatusCode::NOT_FOUND)]
    #[case::delete(TestRequest::delete().uri("/users/5"), StatusCode::NOT_FOUND)]
    #[case::malformed(TestRequest::get().uri("/users/abc"), StatusCode::BAD_REQUEST)]
    #[case::zero(TestRequest::get().uri("/users/0"), StatusCode::BAD_REQUEST)]
    #[actix_web::test]
    async fn unknown_or_malformed_users(#[case] request: TestRequest, #[case] expected: StatusCode) {
        let app = init_app(in_memory_state(&InMemoryStore::new())).await;

        let (status, _) = send_json(&app, request).await;

        assert_eq!(status, expected);
    }

    #[rstest]
    #[actix_web::test]
    async fn owners_cannot_be_deleted_until_their_games_are_gone() {
        let app = init_app(in_memory_state(&InMemoryStore::new())).await;
        send_json(&app, TestRequest::post().uri("/users").set_json(ada())).await;
        send_json(
            &app,
            TestRequest::post().uri("/games").set_json(json!({
                "ownerUserId": 1,
                "title": "Catan",
                "publisher": "Kosmos",
                "description": "Trade, build and settle",
                "year": 1995,
                "condition": "good"
            })),
        )
        .await;

        let (blocked, body) = send_json(&app, TestRequest::delete().uri("/users/1")).await;
        send_json(&app, TestRequest::delete().uri("/games/1")).await;
        let (deleted, _) = send_json(&app, TestRequest::delete().uri("/users/1")).await;

        assert_eq!(blocked, StatusCode::CONFLICT);
        assert_eq!(body["details"]["code"], "user_in_use");
        assert_eq!(deleted, StatusCode::NO_CONTENT);
    }
}
