use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{self, StatusCode},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{Algorithm, Validation};

use crate::{
    constants::JWT_AUDIENCE,
    models::{auth::ClaimOwned, ErrorResponse, GeneralResult},
    state::AppState,
};

fn decode_claim(state: &AppState, header: &str) -> GeneralResult<ClaimOwned> {
    // token should be "Bearer ..."
    let mut it = header.split_whitespace();
    let (_, token_str) = (it.next(), it.next());
    let token = token_str.ok_or(ErrorResponse::new(
        StatusCode::FORBIDDEN,
        "Empty token value",
    ))?;

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[JWT_AUDIENCE]);
    let data = jsonwebtoken::decode::<ClaimOwned>(token, &state.jwt.1, &validation).map_err(
        |e| {
            ErrorResponse::new(
                StatusCode::FORBIDDEN,
                format!("Failed to decode JWT token: {}", e),
            )
        },
    )?;

    Ok(data.claims)
}

fn header_value(req: &Request) -> GeneralResult<Option<&str>> {
    match req.headers().get(http::header::AUTHORIZATION) {
        Some(h) => h.to_str().map(Some).map_err(|e| {
            ErrorResponse::new(
                StatusCode::FORBIDDEN,
                format!("Failed to down cast header value to string: {}", e),
            )
        }),
        None => Ok(None),
    }
}

/// Callers on this path must present a valid token.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> GeneralResult<Response<Body>> {
    let header = header_value(&req)?.ok_or(ErrorResponse::new(
        StatusCode::FORBIDDEN,
        "Invalid authorization header.",
    ))?;

    let claim = decode_claim(&state, header)?;
    req.extensions_mut().insert(claim);

    Ok(next.run(req).await)
}

/// Guests are legal callers here: a missing header passes through with no
/// claim attached, a present-but-invalid token is still refused.
pub async fn soft_auth_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> GeneralResult<Response<Body>> {
    if let Some(header) = header_value(&req)? {
        let claim = decode_claim(&state, header)?;
        req.extensions_mut().insert(claim);
    }

    Ok(next.run(req).await)
}
