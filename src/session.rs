//! Per-browser UI state keyed by a session cookie.

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Cookie carrying the session identifier.
pub const SESSION_COOKIE: &str = "housecast_session";
/// Default number of sessions remembered before the least recent is evicted.
pub const DEFAULT_MAX_SESSIONS: usize = 4096;

/// Which page a session sees.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UiMode {
    /// Welcome page with the entry button.
    #[default]
    Splash,
    /// The prediction form.
    Main,
}

impl UiMode {
    /// Mode after the entry action; `Main` is terminal.
    pub fn enter(self) -> Self {
        Self::Main
    }
}

/// Opaque session identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(format!("{:032x}", rand::random::<u128>()))
    }

    /// Accepts a cookie value if it has the generated shape.
    pub fn parse(raw: &str) -> Option<Self> {
        let valid = raw.len() == 32 && raw.bytes().all(|b| b.is_ascii_hexdigit());
        valid.then(|| Self(raw.to_ascii_lowercase()))
    }

    /// The identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug)]
struct SessionState {
    mode: UiMode,
    transitions: u8,
}

/// Bounded store of sessions that have left the splash page.
///
/// Requests without a known session are on the splash page and leave no entry behind,
/// so anonymous traffic cannot evict entered sessions.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Mutex<LruCache<SessionId, SessionState>>>,
}

impl SessionStore {
    /// Creates a store remembering at most `capacity` sessions (minimum one).
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Arc::new(Mutex::new(LruCache::new(capacity))),
        }
    }

    /// Mode for `id`. Missing, unknown and evicted sessions see the splash page.
    pub async fn resolve(&self, id: Option<&SessionId>) -> UiMode {
        let Some(id) = id else {
            return UiMode::Splash;
        };
        let mut guard = self.inner.lock().await;
        guard.get(id).map_or(UiMode::Splash, |state| state.mode)
    }

    /// Applies the entry action, returning the session id and whether it is new.
    ///
    /// A known session is already in main mode and stays unchanged. Otherwise a fresh
    /// session is stored in main mode with its single transition recorded.
    pub async fn enter(&self, id: Option<SessionId>) -> (SessionId, bool) {
        let mut guard = self.inner.lock().await;
        if let Some(id) = id {
            if guard.get(&id).is_some() {
                return (id, false);
            }
        }
        let id = SessionId::generate();
        guard.put(
            id.clone(),
            SessionState {
                mode: UiMode::Splash.enter(),
                transitions: 1,
            },
        );
        (id, true)
    }

    /// Number of splash → main transitions recorded for `id`.
    pub async fn transitions(&self, id: &SessionId) -> Option<u8> {
        let mut guard = self.inner.lock().await;
        guard.get(id).map(|state| state.transitions)
    }

    /// Number of tracked sessions.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }
}

/// Extracts the session identifier from a `Cookie` header value.
pub fn session_from_cookie_header(header: &str) -> Option<SessionId> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| SessionId::parse(value.trim()))
}

/// `Set-Cookie` value establishing `id`.
pub fn session_cookie(id: &SessionId) -> String {
    format!(
        "{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax",
        id.as_str()
    )
}
