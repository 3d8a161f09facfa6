//! Blanket per-IP rate limiting.
//!
//! One fixed window for every route, not tied to identity: each IP gets
//! `max` requests per `window`, then 429 until the window rolls over.

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::AppContext;

struct WindowCounter {
    started: Instant,
    count: u32,
}

pub struct RateLimiter {
    window: Duration,
    max: u32,
    buckets: Mutex<HashMap<IpAddr, WindowCounter>>,
}

impl RateLimiter {
    pub fn new(window: Duration, max: u32) -> Self {
        Self {
            window,
            max,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    /// Count one request from `ip` at `now`; false means over the cap.
    pub fn allow(&self, ip: IpAddr, now: Instant) -> bool {
        let mut buckets = self.buckets.lock().unwrap();

        // Expired windows are dead weight; drop them while we hold the lock.
        if buckets.len() > 1024 {
            let window = self.window;
            buckets.retain(|_, counter| now.duration_since(counter.started) < window);
        }

        let counter = buckets.entry(ip).or_insert(WindowCounter { started: now, count: 0 });
        if now.duration_since(counter.started) >= self.window {
            counter.started = now;
            counter.count = 0;
        }
        counter.count += 1;
        counter.count <= self.max
    }
}

/// Axum middleware. Requests without peer info (in-process tests) share
/// one bucket under the unspecified address.
pub async fn middleware(
    State(ctx): State<Arc<AppContext>>,
    request: Request,
    next: Next,
) -> Response {
    let ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

    if !ctx.rate_limiter.allow(ip, Instant::now()) {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({
                "error": true,
                "message": "Too many requests, please try again later"
            })),
        )
            .into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(last: u8) -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(10, 0, 0, last))
    }

    #[test]
    fn test_allows_up_to_cap() {
        let limiter = RateLimiter::new(Duration::from_secs(900), 3);
        let now = Instant::now();

        assert!(limiter.allow(ip(1), now));
        assert!(limiter.allow(ip(1), now));
        assert!(limiter.allow(ip(1), now));
        assert!(!limiter.allow(ip(1), now));
    }

    #[test]
    fn test_window_rolls_over() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 1);
        let start = Instant::now();

        assert!(limiter.allow(ip(1), start));
        assert!(!limiter.allow(ip(1), start + Duration::from_secs(59)));
        assert!(limiter.allow(ip(1), start + Duration::from_secs(61)));
    }

    #[test]
    fn test_ips_do_not_share_budgets() {
        let limiter = RateLimiter::new(Duration::from_secs(900), 1);
        let now = Instant::now();

        assert!(limiter.allow(ip(1), now));
        assert!(limiter.allow(ip(2), now));
        assert!(!limiter.allow(ip(1), now));
    }
}
