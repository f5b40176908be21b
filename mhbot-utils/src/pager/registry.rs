//! Live pager sessions and their expiry tasks.

use std::{collections::HashMap, future::Future, sync::Arc};

use tokio::{
    sync::Mutex,
    task::JoinHandle,
    time::{Duration, Instant},
};
use tracing::debug;

use super::session::{PagerAction, PagerOutcome, PagerRejection, PagerSession, SessionKey};

struct Entry {
    session: PagerSession,
    generation: u64,
    expiry: JoinHandle<()>,
}

#[derive(Default)]
struct Sessions {
    entries: HashMap<SessionKey, Entry>,
    next_generation: u64,
}

/// Sessions keyed by `(interaction, owner)`, each with its own expiry task.
///
/// Cheap to clone; clones share the same sessions.
#[derive(Clone)]
pub struct PagerRegistry {
    sessions: Arc<Mutex<Sessions>>,
    timeout: Duration,
}

impl PagerRegistry {
    pub fn new(timeout: Duration) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(Sessions::default())),
            timeout,
        }
    }

    /// Start a session and schedule its expiry.
    ///
    /// `on_expire` runs once the timeout elapses, after the session has left
    /// the registry, and receives the expired session. Opening a key that is
    /// already live replaces the old session and cancels its expiry.
    pub async fn open<F, Fut>(
        &self,
        key: SessionKey,
        command: &str,
        query: &str,
        pages: Vec<String>,
        on_expire: F,
    ) -> Result<PagerOutcome, PagerRejection>
    where
        F: FnOnce(PagerSession) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let deadline = Instant::now() + self.timeout;
        let mut session = PagerSession::new(key, command, query, pages, deadline);
        let first_page = session.start()?;

        let mut sessions = self.sessions.lock().await;
        let generation = sessions.next_generation;
        sessions.next_generation = sessions.next_generation.wrapping_add(1);

        let expiry = tokio::spawn(expire_at(
            Arc::clone(&self.sessions),
            key,
            generation,
            deadline,
            on_expire,
        ));

        if let Some(previous) = sessions.entries.insert(
            key,
            Entry {
                session,
                generation,
                expiry,
            },
        ) {
            debug!(
                interaction_id = key.interaction_id,
                user_id = key.user_id,
                "replacing live pager session"
            );
            previous.expiry.abort();
        }

        Ok(first_page)
    }

    /// Apply a button action to a live session.
    ///
    /// Unknown keys are reported as expired, since sessions only leave the
    /// registry by timing out.
    pub async fn apply(
        &self,
        key: SessionKey,
        actor: u64,
        action: PagerAction,
    ) -> Result<PagerOutcome, PagerRejection> {
        let mut sessions = self.sessions.lock().await;
        let Some(entry) = sessions.entries.get_mut(&key) else {
            return Err(PagerRejection::Expired);
        };

        entry.session.apply(actor, action, Instant::now())
    }

    /// Remember a follow-up reply whose controls must be cleared on expiry.
    pub async fn add_surface(&self, key: SessionKey, token: &str) {
        let mut sessions = self.sessions.lock().await;
        if let Some(entry) = sessions.entries.get_mut(&key) {
            entry.session.add_surface(token);
        }
    }

    pub async fn contains(&self, key: SessionKey) -> bool {
        self.sessions.lock().await.entries.contains_key(&key)
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

async fn expire_at<F, Fut>(
    sessions: Arc<Mutex<Sessions>>,
    key: SessionKey,
    generation: u64,
    deadline: Instant,
    on_expire: F,
) where
    F: FnOnce(PagerSession) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    tokio::time::sleep_until(deadline).await;

    let removed = {
        let mut sessions = sessions.lock().await;
        let is_current = sessions
            .entries
            .get(&key)
            .is_some_and(|entry| entry.generation == generation);
        if is_current {
            sessions.entries.remove(&key)
        } else {
            None
        }
    };

    if let Some(Entry { mut session, .. }) = removed {
        debug!(
            interaction_id = key.interaction_id,
            user_id = key.user_id,
            "pager session expired"
        );
        session.expire();
        on_expire(session).await;
    }
}
