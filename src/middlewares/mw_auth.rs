use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::Response;
use serde::{Deserialize, Serialize};

use crate::auth::token_service::{Claims, TokenService};
use crate::error::{Error, Result};
use crate::services::user_service::UserService;
use crate::AppState;

/// Acting principal, resolved from the identity token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ctx {
    pub user_id: String,
    pub name: Option<String>,
    pub image: Option<String>,
}

impl From<Claims> for Ctx {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            name: claims.name,
            image: claims.picture,
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|str| str.strip_prefix("Bearer "))
}

/// Rejects requests without a valid identity, and keeps the user's display
/// info current for comment rendering.
pub async fn mw_auth(
    State(app_state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response> {
    let token = bearer_token(req.headers()).ok_or(Error::AuthFailNoAuthToken)?;

    let claims = TokenService::validate_token(token, &app_state.auth_config)?;
    let ctx = Ctx::from(claims);

    UserService::upsert_user(
        &app_state.db,
        &ctx.user_id,
        ctx.name.as_deref(),
        ctx.image.as_deref(),
    )
    .await?;

    req.extensions_mut().insert(ctx);

    Ok(next.run(req).await)
}

/// Attaches a `Ctx` when a valid identity is presented; anonymous otherwise.
pub async fn mw_optional_auth(
    State(app_state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(token) = bearer_token(req.headers()) {
        match TokenService::validate_token(token, &app_state.auth_config) {
            Ok(claims) => {
                req.extensions_mut().insert(Ctx::from(claims));
            }
            Err(_) => tracing::debug!("ignoring invalid identity token on public route"),
        }
    }

    next.run(req).await
}

/// Guards the scheduler endpoints with the shared cron secret.
pub async fn mw_cron_auth(
    State(app_state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response> {
    let secret = bearer_token(req.headers()).ok_or(Error::AuthFailCronSecret)?;

    if !TokenService::check_cron_secret(secret, &app_state.auth_config) {
        tracing::warn!("rejected scheduler call with invalid secret");
        return Err(Error::AuthFailCronSecret);
    }

    Ok(next.run(req).await)
}
