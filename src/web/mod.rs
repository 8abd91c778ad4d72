use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::{header::SET_COOKIE, HeaderMap, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use log::error;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::net::TcpListener;
use uuid::Uuid;

use crate::{
    analytics::{self, Event},
    config::Config,
    db,
    geo::Geocoder,
    models::{
        external_construction::ExternalConstruction,
        listing::Listing,
        property::Property,
        property_image::PropertyImage,
    },
    services::{
        auth::{Session, Sessions},
        contacts::{self, ContactRequest},
        listings::{self, CreatedListing, ListingForm, UploadedImage},
        map, ValidationError,
    },
    storage::Storage,
};

const SESSION_COOKIE: &str = "session";

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub storage: Storage,
    /// Present when the deployment carries its own Mapbox key; otherwise the
    /// map is gated behind a per-session visitor token.
    pub geocoder: Option<Geocoder>,
    pub sessions: Arc<Sessions>,
    pub events: async_channel::Sender<Event>,
}

impl AppState {
    pub fn new(config: Arc<Config>, events: async_channel::Sender<Event>) -> AppState {
        let storage = Storage::new(&config);
        let geocoder = config.mapbox_token.clone().map(Geocoder::new);
        let sessions = Arc::new(Sessions::new(config.session_ttl_seconds));
        AppState {
            config,
            storage,
            geocoder,
            sessions,
            events,
        }
    }
}

#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

#[derive(Serialize)]
pub struct PropertySummary {
    #[serde(flatten)]
    pub property: Property,
    pub image_url: String,
}

#[derive(Serialize)]
pub struct HomeResponse {
    pub properties: Vec<PropertySummary>,
    pub constructions: Vec<ExternalConstruction>,
}

#[derive(Serialize)]
pub struct PropertyDetail {
    pub property: Property,
    pub images: Vec<PropertyImage>,
}

#[derive(Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct ResetRequest {
    pub email: String,
}

#[derive(Deserialize)]
pub struct ResetCompletion {
    pub token: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct MapTokenRequest {
    pub token: String,
}

#[derive(Deserialize)]
pub struct MarkerClickRequest {
    pub property_id: Uuid,
    pub title: String,
}

pub fn router(state: AppState) -> Router {
    let admin = Router::new()
        .route("/api/admin/properties", get(admin_list_properties))
        .route("/api/admin/listings", post(admin_create_listing))
        .route("/api/admin/listings/:id", put(admin_update_listing))
        .route("/api/admin/listings/:id", delete(admin_delete_listing))
        .layer(middleware::from_fn_with_state(state.clone(), admin_gate));

    Router::new()
        .route("/api/home", get(home))
        .route("/api/listings", get(list_listings))
        .route("/api/listings/:id", get(listing_detail))
        .route("/api/cantieri", get(cantieri))
        .route("/api/investimenti", get(investimenti))
        .route("/api/services", get(services_page))
        .route("/api/contact", post(submit_contact))
        .route("/api/map", get(map_view))
        .route("/api/map/token", post(submit_map_token))
        .route("/api/map/marker-click", post(marker_click))
        .route("/api/auth/signup", post(sign_up))
        .route("/api/auth/login", post(sign_in))
        .route("/api/auth/logout", post(sign_out))
        .route("/api/auth/reset", post(request_reset))
        .route("/api/auth/reset/complete", post(complete_reset))
        .merge(admin)
        .fallback(not_found)
        .layer(middleware::from_fn(cors_layer))
        .with_state(state)
}

pub async fn start_http_server(
    state: AppState,
    mut shutdown_rx: tokio::sync::broadcast::Receiver<()>,
) {
    let bind_addr = state
        .config
        .http_bind_address
        .clone()
        .unwrap_or_else(|| "0.0.0.0:8080".to_string());

    let listener = TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|err| panic!("failed to bind http listener on {}: {}", bind_addr, err));
    let app = router(state);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.recv().await;
        })
        .await
        .expect("HTTP server crashed");
}

async fn cors_layer(req: axum::http::Request<axum::body::Body>, next: Next) -> Response {
    if req.method() == Method::OPTIONS {
        let mut response = Response::new(axum::body::Body::empty());
        apply_cors_headers(response.headers_mut());
        *response.status_mut() = StatusCode::NO_CONTENT;
        response
    } else {
        let mut response = next.run(req).await;
        apply_cors_headers(response.headers_mut());
        response
    }
}

fn apply_cors_headers(headers: &mut axum::http::HeaderMap) {
    headers.insert(
        axum::http::header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        axum::http::header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("content-type, x-session-token"),
    );
    headers.insert(
        axum::http::header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, PUT, DELETE, OPTIONS"),
    );
}

/// Session token from the cookie or, for non-browser clients, a header.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(header) = headers.get("x-session-token") {
        if let Ok(value) = header.to_str() {
            return Some(value.to_string());
        }
    }
    let cookies = headers.get(axum::http::header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name == SESSION_COOKIE {
            Some(value.to_string())
        } else {
            None
        }
    })
}

fn current_session(state: &AppState, headers: &HeaderMap) -> Option<Session> {
    let token = session_token(headers)?;
    state.sessions.get(&token)
}

/// Route guard for the dashboard: no session or a non-admin role claim is
/// redirected to the login page. Sessions are re-read per request, so a
/// sign-out anywhere takes effect immediately.
async fn admin_gate(
    State(state): State<AppState>,
    req: axum::extract::Request,
    next: Next,
) -> Response {
    match current_session(&state, req.headers()) {
        Some(session) if session.is_admin() => next.run(req).await,
        _ => Redirect::to("/login").into_response(),
    }
}

fn error_status(err: &anyhow::Error) -> StatusCode {
    if err.downcast_ref::<ValidationError>().is_some() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

fn track_page(state: &AppState, path: &str) {
    analytics::track(
        &state.events,
        Event::PageView {
            path: path.to_string(),
        },
    );
}

fn summarize(state: &AppState, properties: Vec<Property>) -> Vec<PropertySummary> {
    properties
        .into_iter()
        .map(|property| {
            let images =
                db::property_image::get_for_property(&state.config, property.id).unwrap_or_default();
            let image_url =
                listings::representative_image(&images, &state.config.placeholder_image_url);
            PropertySummary {
                property,
                image_url,
            }
        })
        .collect()
}

async fn home(State(state): State<AppState>) -> Result<Json<ApiResponse<HomeResponse>>, StatusCode> {
    track_page(&state, "/");

    let properties = db::property::get_active(&state.config).map_err(internal)?;
    let constructions = db::external_construction::get_active(
        &state.config,
        Some(state.config.featured_construction_limit),
    )
    .map_err(internal)?;

    Ok(Json(ApiResponse {
        data: HomeResponse {
            properties: summarize(&state, properties),
            constructions,
        },
    }))
}

async fn list_listings(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<PropertySummary>>>, StatusCode> {
    track_page(&state, "/proprieta");

    let properties = db::property::get_active(&state.config).map_err(internal)?;
    Ok(Json(ApiResponse {
        data: summarize(&state, properties),
    }))
}

async fn listing_detail(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<PropertyDetail>>, StatusCode> {
    track_page(&state, &format!("/proprieta/{}", id));

    let property = db::property::get_by_id(&state.config, id)
        .map_err(internal)?
        .ok_or(StatusCode::NOT_FOUND)?;
    let images = db::property_image::get_for_property(&state.config, id).map_err(internal)?;

    Ok(Json(ApiResponse {
        data: PropertyDetail { property, images },
    }))
}

async fn cantieri(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Listing>>>, StatusCode> {
    track_page(&state, "/cantieri");
    listing_category(&state, |listing| listing.is_construction()).map(Json)
}

async fn investimenti(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Listing>>>, StatusCode> {
    track_page(&state, "/investimenti");
    listing_category(&state, |listing| listing.is_investment()).map(Json)
}

fn listing_category(
    state: &AppState,
    keep: impl Fn(&Listing) -> bool,
) -> Result<ApiResponse<Vec<Listing>>, StatusCode> {
    let mut listings: Vec<Listing> = Vec::new();
    listings.extend(
        db::property::get_active(&state.config)
            .map_err(internal)?
            .into_iter()
            .map(Listing::Property),
    );
    listings.extend(
        db::external_construction::get_active(&state.config, None)
            .map_err(internal)?
            .into_iter()
            .map(Listing::External),
    );
    listings.retain(|listing| keep(listing));

    Ok(ApiResponse { data: listings })
}

async fn services_page(State(state): State<AppState>) -> Json<ApiResponse<Vec<&'static str>>> {
    track_page(&state, "/servizi");
    Json(ApiResponse {
        data: vec![
            "Compravendita",
            "Sviluppo immobiliare",
            "Gestione cantieri",
            "Consulenza investimenti",
            "Valutazioni",
        ],
    })
}

async fn submit_contact(
    State(state): State<AppState>,
    Json(request): Json<ContactRequest>,
) -> Result<StatusCode, (StatusCode, Json<serde_json::Value>)> {
    contacts::submit(&state.config, request).map_err(|e| {
        error!("Contact submission failed: {:?}", e);
        (error_status(&e), Json(json!({ "error": e.to_string() })))
    })?;
    Ok(StatusCode::CREATED)
}

async fn map_view(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<map::MapView>>, (StatusCode, Json<serde_json::Value>)> {
    let geocoder = match &state.geocoder {
        Some(geocoder) => geocoder.clone(),
        None => {
            let token = current_session(&state, &headers)
                .and_then(|session| session.map_token)
                .ok_or((
                    StatusCode::UNAUTHORIZED,
                    Json(json!({ "error": "map token required" })),
                ))?;
            Geocoder::new(token)
        }
    };

    let view = map::build_map_view(&state.config, &geocoder)
        .await
        .map_err(|e| {
            error!("Map view failed: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "map unavailable" })),
            )
        })?;

    analytics::track(
        &state.events,
        Event::MapViewed {
            marker_count: view.markers.len(),
        },
    );

    Ok(Json(ApiResponse { data: view }))
}

/// The gated map variant: the visitor submits a Mapbox token once and it is
/// held only in the session, never persisted.
async fn submit_map_token(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<MapTokenRequest>,
) -> Result<Response, StatusCode> {
    let map_token = request.token.trim().to_string();
    if map_token.is_empty() {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }

    if let Some(token) = session_token(&headers) {
        if state.sessions.set_map_token(&token, map_token.clone()) {
            return Ok(StatusCode::NO_CONTENT.into_response());
        }
    }

    let token = state.sessions.create_anonymous();
    state.sessions.set_map_token(&token, map_token);
    Ok((session_cookie(&token), StatusCode::NO_CONTENT).into_response())
}

async fn marker_click(
    State(state): State<AppState>,
    Json(request): Json<MarkerClickRequest>,
) -> StatusCode {
    analytics::track(
        &state.events,
        Event::MarkerClick {
            property_id: request.property_id,
            title: request.title,
        },
    );
    StatusCode::NO_CONTENT
}

fn session_cookie(token: &str) -> AppendHeaders<[(axum::http::HeaderName, String); 1]> {
    AppendHeaders([(
        SET_COOKIE,
        format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, token),
    )])
}

async fn sign_up(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<StatusCode, (StatusCode, Json<serde_json::Value>)> {
    crate::services::auth::sign_up(&state.config, &credentials.email, &credentials.password)
        .map_err(|e| {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": e.to_string() })),
            )
        })?;
    Ok(StatusCode::CREATED)
}

async fn sign_in(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<Response, (StatusCode, Json<serde_json::Value>)> {
    let (token, user) = crate::services::auth::sign_in(
        &state.config,
        &state.sessions,
        &credentials.email,
        &credentials.password,
    )
    .map_err(|e| {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": e.to_string() })),
        )
    })?;

    let body = Json(ApiResponse {
        data: json!({
            "token": token,
            "email": user.email,
            "role": user.role,
        }),
    });
    Ok((session_cookie(&token), body).into_response())
}

async fn sign_out(State(state): State<AppState>, headers: HeaderMap) -> StatusCode {
    if let Some(token) = session_token(&headers) {
        crate::services::auth::sign_out(&state.sessions, &token);
    }
    StatusCode::NO_CONTENT
}

async fn request_reset(
    State(state): State<AppState>,
    Json(request): Json<ResetRequest>,
) -> Result<StatusCode, StatusCode> {
    crate::services::auth::request_password_reset(&state.config, &state.sessions, &request.email)
        .map_err(internal)?;
    // Always accepted, regardless of whether the email exists.
    Ok(StatusCode::ACCEPTED)
}

async fn complete_reset(
    State(state): State<AppState>,
    Json(request): Json<ResetCompletion>,
) -> Result<StatusCode, (StatusCode, Json<serde_json::Value>)> {
    if request.password.len() < 6 {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": "password must be at least 6 characters" })),
        ));
    }

    let user_id = state.sessions.take_reset_token(&request.token).ok_or((
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "invalid or expired reset token" })),
    ))?;

    let hash = crate::services::auth::hash_password(&request.password).map_err(|e| {
        error!("Password hash failed: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "reset failed" })),
        )
    })?;
    db::user::update_password(&state.config, user_id, &hash).map_err(|e| {
        error!("Password update failed: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "reset failed" })),
        )
    })?;

    Ok(StatusCode::NO_CONTENT)
}

async fn admin_list_properties(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Property>>>, StatusCode> {
    let properties = db::property::get_all(&state.config).map_err(internal)?;
    Ok(Json(ApiResponse { data: properties }))
}

async fn admin_create_listing(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, (StatusCode, Json<serde_json::Value>)> {
    let (form, files, _) = read_listing_form(multipart).await.map_err(bad_submission)?;

    let created = listings::create(&state.config, &state.storage, &state.events, form, files)
        .await
        .map_err(|e| {
            error!("Listing creation failed: {:?}", e);
            (error_status(&e), Json(json!({ "error": e.to_string() })))
        })?;

    let body = match created {
        CreatedListing::Property(property) => json!({ "kind": "property", "id": property.id }),
        CreatedListing::External(external) => {
            json!({ "kind": "external_construction", "id": external.id })
        }
    };
    Ok((StatusCode::CREATED, Json(ApiResponse { data: body })).into_response())
}

async fn admin_update_listing(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<Property>>, (StatusCode, Json<serde_json::Value>)> {
    let (form, files, regeocode) = read_listing_form(multipart).await.map_err(bad_submission)?;

    let updated = listings::update(
        &state.config,
        &state.storage,
        state.geocoder.as_ref(),
        id,
        form,
        files,
        regeocode,
    )
    .await
    .map_err(|e| {
        error!("Listing update failed: {:?}", e);
        (error_status(&e), Json(json!({ "error": e.to_string() })))
    })?;

    Ok(Json(ApiResponse { data: updated }))
}

async fn admin_delete_listing(State(state): State<AppState>, Path(id): Path<Uuid>) -> StatusCode {
    match listings::delete(&state.config, &state.storage, id).await {
        Ok(0) => match listings::delete_external(&state.config, id) {
            Ok(0) => StatusCode::NOT_FOUND,
            Ok(_) => StatusCode::NO_CONTENT,
            Err(e) => {
                error!("External construction delete failed: {:?}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        },
        Ok(_) => StatusCode::NO_CONTENT,
        Err(e) => {
            error!("Listing delete failed: {:?}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

async fn read_listing_form(
    mut multipart: Multipart,
) -> anyhow::Result<(ListingForm, Vec<UploadedImage>, bool)> {
    let mut form = ListingForm::default();
    let mut files = Vec::new();
    let mut regeocode = false;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "images" => {
                let file_name = field.file_name().unwrap_or("image.jpg").to_string();
                let bytes = field.bytes().await?;
                files.push(UploadedImage {
                    file_name,
                    bytes: bytes.to_vec(),
                });
            }
            "regeocode" => regeocode = listings::parse_flag(&field.text().await?),
            _ => form.set_field(&name, field.text().await?),
        }
    }

    Ok((form, files, regeocode))
}

fn bad_submission(err: anyhow::Error) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": err.to_string() })),
    )
}

fn internal(err: anyhow::Error) -> StatusCode {
    error!("Error: {:?}", err);
    StatusCode::INTERNAL_SERVER_ERROR
}

async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" })))
}
