use std::collections::HashMap;
use std::sync::Mutex;

use uuid::Uuid;

use super::page::{Page, Session};

/// In-process session table. Sessions never expire; a restart forgets them all.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<String, Session>>,
}

impl SessionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn sessions(&self) -> std::sync::MutexGuard<'_, HashMap<String, Session>> {
        self.sessions.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Opens a session on the home page and returns its id.
    pub fn create(&self) -> (String, Session) {
        let id = Uuid::new_v4().to_string();
        let session = Session::default();
        self.sessions().insert(id.clone(), session);
        (id, session)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<Session> {
        self.sessions().get(id).copied()
    }

    pub fn navigate(&self, id: &str, page: Page) -> Option<Session> {
        self.update(id, |session| session.page = page)
    }

    pub fn set_logged_in(&self, id: &str, logged_in: bool) -> Option<Session> {
        self.update(id, |session| session.logged_in = logged_in)
    }

    fn update(&self, id: &str, apply: impl FnOnce(&mut Session)) -> Option<Session> {
        let mut sessions = self.sessions();
        let session = sessions.get_mut(id)?;
        apply(session);
        Some(*session)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
