use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use sha2::Digest;
use uuid::Uuid;

/// Session cookie name.
pub const SESSION_COOKIE: &str = "siteferry_sid";

const SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Clone, Debug)]
pub struct Session {
    pub user: String,
    pub csrf_token: String,
    expires_at: Instant,
}

impl Session {
    fn expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// In-memory session store keyed by session id.
///
/// Cookie values are `sid.tag` where the tag binds the sid to the
/// process-wide secret, so a tampered cookie never reaches the map.
/// The secret is fixed at construction and not rotated at runtime.
pub struct SessionStore {
    secret: String,
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new(secret: String) -> Self {
        Self {
            secret,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Open a session for an authenticated user and return the cookie
    /// value carrying it.
    pub fn create(&self, user: &str) -> String {
        self.create_with_ttl(user, SESSION_TTL)
    }

    fn create_with_ttl(&self, user: &str, ttl: Duration) -> String {
        let sid = Uuid::new_v4().simple().to_string();
        let session = Session {
            user: user.to_owned(),
            csrf_token: Uuid::new_v4().simple().to_string(),
            expires_at: Instant::now() + ttl,
        };
        self.sessions.write().insert(sid.clone(), session);
        format!("{sid}.{}", self.tag(&sid))
    }

    /// Look up the session a cookie value refers to, evicting it if
    /// expired.
    pub fn get(&self, cookie_value: &str) -> Option<Session> {
        let sid = self.verify(cookie_value)?;
        let mut sessions = self.sessions.write();
        match sessions.get(sid) {
            Some(session) if !session.expired() => Some(session.clone()),
            Some(_) => {
                sessions.remove(sid);
                None
            }
            None => None,
        }
    }

    pub fn destroy(&self, cookie_value: &str) {
        if let Some(sid) = self.verify(cookie_value) {
            self.sessions.write().remove(sid);
        }
    }

    fn verify<'a>(&self, cookie_value: &'a str) -> Option<&'a str> {
        let (sid, tag) = cookie_value.split_once('.')?;
        if self.tag(sid) == tag { Some(sid) } else { None }
    }

    fn tag(&self, sid: &str) -> String {
        let mut hasher = sha2::Sha256::new();
        hasher.update(self.secret.as_bytes());
        hasher.update(b".");
        hasher.update(sid.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}
