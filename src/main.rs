mod constants;
mod engine;
mod errors;
mod middlewares;
mod models;
mod routes;
mod state;
mod store;
#[cfg(test)]
mod tests;
mod traits;
mod utils;

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware,
    response::Json,
    routing::get,
    Router,
};
use lambda_http::{run, tracing, Error};
use serde_json::{json, Value};
use state::AppState;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_axum::router::OpenApiRouter;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "offer-house-rs",
        description = "Marketplace offer negotiation API"
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "http-jwt",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

async fn root() -> Json<Value> {
    Json(json!({ "msg": "offer-house API" }))
}

async fn health_check() -> (StatusCode, String) {
    let health = true;
    match health {
        true => (StatusCode::OK, "Healthy!".to_string()),
        false => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Not healthy!".to_string(),
        ),
    }
}

pub(crate) async fn create_service(state: Arc<AppState>) -> Result<Router, Error> {
    let trace_layer =
        TraceLayer::new_for_http().on_request(|req: &Request<Body>, _: &tracing::Span| {
            let path = req.uri().path();
            tracing::info!("Got request with path: {}", path);
        });

    let offers = routes::offers::public_router()
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::auth::soft_auth_middleware,
        ))
        .merge(routes::offers::seller_router().layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::auth::auth_middleware,
        )));

    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .nest("/v1/verification", routes::verification::router())
        .nest("/v1/listings", offers)
        .split_for_parts();

    let yaml = serde_yaml::to_string(&api)?;
    let app = router
        .route("/v1/", get(root))
        .route("/v1/health", get(health_check))
        .route(
            "/v1/openapi.yaml",
            get(move || std::future::ready(yaml.clone())),
        )
        .layer(middleware::from_fn(middlewares::trace_client))
        .layer(trace_layer)
        .layer(CompressionLayer::new())
        .with_state(state);

    Ok(app)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();

    tracing::info!("Offer negotiation API start");

    let state = AppState::new().await?;
    let app = create_service(Arc::new(state)).await?;

    run(app).await
}
