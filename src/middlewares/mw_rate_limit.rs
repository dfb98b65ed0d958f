use std::{
    env,
    net::SocketAddr,
    sync::{
        atomic::{AtomicU32, Ordering},
        Arc,
    },
    time::Duration,
};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};

use crate::{middlewares::mw_auth::Ctx, AppState};

const DEFAULT_REQUESTS_PER_MINUTE: u32 = 150;

/// Fixed-window request counter keyed by user or IP.
///
/// Each key's counter lives for one window (moka TTL from insertion), after
/// which a fresh counter starts.
#[derive(Clone)]
pub struct RateLimiter {
    hits: moka::future::Cache<String, Arc<AtomicU32>>,
    max_per_window: u32,
}

impl RateLimiter {
    pub fn new(max_per_window: u32, window: Duration) -> Self {
        Self {
            hits: moka::future::Cache::builder()
                .max_capacity(100_000)
                .time_to_live(window)
                .build(),
            max_per_window,
        }
    }

    pub fn from_env() -> Self {
        let per_minute = env::var("RATE_LIMIT_PER_MINUTE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_REQUESTS_PER_MINUTE);

        Self::new(per_minute, Duration::from_secs(60))
    }

    /// Records a hit; false once the identifier exceeded its budget.
    pub async fn hit(&self, identifier: &str) -> bool {
        let counter = self
            .hits
            .get_with(identifier.to_string(), async { Arc::new(AtomicU32::new(0)) })
            .await;

        counter.fetch_add(1, Ordering::Relaxed) < self.max_per_window
    }
}

pub async fn rate_limit_middleware(
    State(app_state): State<AppState>,
    ConnectInfo(ip): ConnectInfo<SocketAddr>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let identifier = req
        .extensions()
        .get::<Ctx>()
        .map(|ctx| format!("user:{}", ctx.user_id))
        .unwrap_or_else(|| format!("ip:{}", ip.ip()));

    if !app_state.rate_limiter.hit(&identifier).await {
        tracing::warn!(%identifier, "rate limit exceeded");
        return Err(StatusCode::TOO_MANY_REQUESTS);
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_budget_is_per_identifier() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60));

        assert!(limiter.hit("ip:1.2.3.4").await);
        assert!(limiter.hit("ip:1.2.3.4").await);
        assert!(!limiter.hit("ip:1.2.3.4").await);

        assert!(limiter.hit("user:u1").await);
    }

    #[tokio::test]
    async fn test_window_expiry_resets_budget() {
        let limiter = RateLimiter::new(1, Duration::from_millis(50));

        assert!(limiter.hit("user:u1").await);
        assert!(!limiter.hit("user:u1").await);

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(limiter.hit("user:u1").await);
    }
}
