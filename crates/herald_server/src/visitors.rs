//! Unique visitor tracking.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Cookie carrying the visitor id.
pub const VISITOR_COOKIE: &str = "herald_visitor";

/// Visitor ids kept by [`VisitorCounter::new`].
pub const DEFAULT_VISITOR_LIMIT: usize = 100_000;

/// Set of visitor ids seen since startup.
///
/// Clients that drop the cookie get a new id on every request, so the set is
/// capped: once `limit` ids are stored, further new ids are not counted.
#[derive(Debug)]
pub struct VisitorCounter {
    seen: Mutex<HashSet<Uuid>>,
    limit: usize,
}

impl Default for VisitorCounter {
    fn default() -> Self {
        Self::with_limit(DEFAULT_VISITOR_LIMIT)
    }
}

impl VisitorCounter {
    /// Empty counter holding at most [`DEFAULT_VISITOR_LIMIT`] ids.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty counter holding at most `limit` ids.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            seen: Mutex::new(HashSet::new()),
            limit,
        }
    }

    /// Maximum number of ids kept.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Record a visit. Returns `true` the first time `id` is counted.
    pub fn record(&self, id: Uuid) -> bool {
        let mut seen = self.seen.lock();
        if seen.len() >= self.limit {
            return false;
        }
        let added = seen.insert(id);
        if added && seen.len() == self.limit {
            warn!(limit = self.limit, "Visitor limit reached, new visitors are no longer counted");
        }
        added
    }

    /// Number of distinct visitors.
    pub fn count(&self) -> usize {
        self.seen.lock().len()
    }
}

/// Middleware that identifies the visitor, issuing a cookie when needed.
pub(crate) async fn track_visitor(
    State(visitors): State<Arc<VisitorCounter>>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    let known = jar
        .get(VISITOR_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok());

    let (jar, id) = match known {
        Some(id) => (jar, id),
        None => {
            let id = Uuid::new_v4();
            let cookie = Cookie::build((VISITOR_COOKIE, id.to_string()))
                .path("/")
                .http_only(true)
                .permanent()
                .build();
            (jar.add(cookie), id)
        }
    };

    if visitors.record(id) {
        debug!(visitor = %id, total = visitors.count(), "New visitor");
    }

    (jar, next.run(request).await).into_response()
}
