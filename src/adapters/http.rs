use crate::core::auth::AuthService;
use crate::core::catalog::CatalogService;
use crate::domain::model::{
    ApiItem, FilteredCatalog, ItemDraft, LoginResponse, Principal, SelectionRequest,
};
use crate::utils::error::GroceryError;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequestParts, Path, Query, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;

type ApiResult<T> = std::result::Result<T, GroceryError>;

#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogService,
    pub auth: AuthService,
}

impl IntoResponse for GroceryError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let message = match status {
            StatusCode::SERVICE_UNAVAILABLE => {
                tracing::error!("Store unavailable: {}", self);
                "Service unavailable.".to_string()
            }
            s if s.is_server_error() => {
                tracing::error!(category = ?self.category(), "Request failed: {}", self);
                "Internal server error.".to_string()
            }
            _ => self.to_string(),
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

fn bad_body(rejection: JsonRejection) -> GroceryError {
    GroceryError::validation(format!("Invalid request body: {}", rejection.body_text()))
}

/// Admin session taken from an `Authorization: Bearer <token>` header.
/// Missing or malformed headers are 401, bad tokens are 403.
pub struct AdminPrincipal(pub Principal);

impl FromRequestParts<AppState> for AdminPrincipal {
    type Rejection = GroceryError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> std::result::Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| GroceryError::Unauthorized {
                message: "Missing or malformed token.".to_string(),
            })?;

        state.auth.authorize_admin(token).map(AdminPrincipal)
    }
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    username: Option<String>,
    email: Option<String>,
    password: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FilterParams {
    section: Option<String>,
    subsection: Option<String>,
}

async fn login(
    State(state): State<AppState>,
    body: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<LoginResponse>> {
    let Json(request) = body.map_err(bad_body)?;
    let login_id = request.username.or(request.email).unwrap_or_default();
    let password = request.password.unwrap_or_default();

    if login_id.is_empty() || password.is_empty() {
        return Err(GroceryError::validation(
            "Login id and password are required.",
        ));
    }

    Ok(Json(state.auth.login(&login_id, &password).await?))
}

async fn list_items(State(state): State<AppState>) -> ApiResult<Json<Vec<ApiItem>>> {
    Ok(Json(state.catalog.list_all().await?))
}

async fn filtered_items(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> ApiResult<Json<FilteredCatalog>> {
    let filtered = state
        .catalog
        .list_filtered(params.section.as_deref(), params.subsection.as_deref())
        .await?;
    Ok(Json(filtered))
}

async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiItem>> {
    Ok(Json(state.catalog.get(&id).await?))
}

async fn create_item(
    State(state): State<AppState>,
    AdminPrincipal(admin): AdminPrincipal,
    body: std::result::Result<Json<ItemDraft>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ApiItem>)> {
    let Json(draft) = body.map_err(bad_body)?;
    tracing::debug!(admin = %admin.username, "Create item request");
    let item = state.catalog.create(draft).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

async fn update_item(
    State(state): State<AppState>,
    AdminPrincipal(admin): AdminPrincipal,
    Path(id): Path<String>,
    body: std::result::Result<Json<ItemDraft>, JsonRejection>,
) -> ApiResult<Json<ApiItem>> {
    let Json(draft) = body.map_err(bad_body)?;
    tracing::debug!(admin = %admin.username, id = %id, "Update item request");
    Ok(Json(state.catalog.update(&id, draft).await?))
}

async fn delete_item(
    State(state): State<AppState>,
    AdminPrincipal(_admin): AdminPrincipal,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    state.catalog.delete(&id).await?;
    Ok(Json(json!({ "message": "Item deleted." })))
}

/// Accepts `{"itemIds": [...]}`. Anything other than an array is a client
/// error; non-string entries cannot match an id and are dropped.
async fn optimize_route(
    State(state): State<AppState>,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Vec<ApiItem>>> {
    let Json(body) = body.map_err(bad_body)?;
    let Some(ids) = body.get("itemIds").and_then(Value::as_array) else {
        return Err(GroceryError::validation("itemIds must be an array."));
    };

    let request = SelectionRequest::new(ids.iter().filter_map(Value::as_str));
    tracing::debug!("Optimizing route for {} ids", request.item_ids.len());
    Ok(Json(state.catalog.optimize_route(&request).await?))
}

async fn health(State(state): State<AppState>) -> Response {
    let backend = state.catalog.backend_name();
    match state.catalog.health().await {
        Ok(()) => Json(json!({ "status": "ok", "backend": backend })).into_response(),
        Err(e) => {
            tracing::warn!(backend, "Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable", "backend": backend })),
            )
                .into_response()
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/auth/login", post(login))
        .route("/api/items", get(list_items).post(create_item))
        .route("/api/items/all", get(list_items))
        .route("/api/items/filtered", get(filtered_items))
        .route("/api/items/optimize-route", post(optimize_route))
        .route(
            "/api/items/{id}",
            get(get_item).put(update_item).delete(delete_item),
        )
        // the storefront is served from its own origin
        .layer(CorsLayer::permissive())
        .with_state(state)
}
