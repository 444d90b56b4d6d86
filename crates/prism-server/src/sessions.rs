//! Per-session scan state
//!
//! A session moves `idle -> fetching -> ready | failed`. Starting a new scan
//! cancels the previous one and bumps the session generation; a scan result
//! is only committed while its generation is still current. Settled
//! sessions are evicted once they have been untouched for the session TTL.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use prism_core::{ErrorKind, ScanResult, WalletSnapshot};

use crate::indexer::Indexer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Idle,
    Fetching,
    Ready,
    Failed,
}

/// Session view returned by the API
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatus {
    pub session: String,
    pub phase: SessionPhase,
    pub generation: u64,
    pub address: Option<String>,
    pub snapshot: Option<WalletSnapshot>,
    pub error: Option<ErrorKind>,
    pub message: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl SessionStatus {
    fn idle(session: &str) -> Self {
        Self {
            session: session.to_string(),
            phase: SessionPhase::Idle,
            generation: 0,
            address: None,
            snapshot: None,
            error: None,
            message: None,
            updated_at: Utc::now(),
        }
    }
}

struct Session {
    status: SessionStatus,
    cancel_token: CancellationToken,
}

/// Handle to a scan that has been started
#[derive(Debug, Clone)]
pub struct ScanTicket {
    pub generation: u64,
    pub cancel_token: CancellationToken,
}

#[derive(Clone)]
pub struct SessionManager {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    ttl: Duration,
}

impl SessionManager {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drop settled sessions not updated within the TTL. Sessions still
    /// fetching are kept so their scan can commit.
    pub async fn prune(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| {
            s.status.phase == SessionPhase::Fetching || s.status.updated_at + self.ttl > now
        });
        before - sessions.len()
    }

    pub fn spawn_pruner(&self, every: std::time::Duration) -> tokio::task::JoinHandle<()> {
        let manager = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let removed = manager.prune(Utc::now()).await;
                if removed > 0 {
                    tracing::debug!(removed, "Evicted idle sessions");
                }
            }
        })
    }

    /// Current status; unknown sessions read as idle
    pub async fn status(&self, session: &str) -> SessionStatus {
        self.sessions
            .read()
            .await
            .get(session)
            .map(|s| s.status.clone())
            .unwrap_or_else(|| SessionStatus::idle(session))
    }

    /// Supersede any running scan and move the session to `fetching`
    pub async fn begin(&self, session: &str, address: &str) -> ScanTicket {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.entry(session.to_string()).or_insert_with(|| Session {
            status: SessionStatus::idle(session),
            cancel_token: CancellationToken::new(),
        });

        entry.cancel_token.cancel();
        let cancel_token = CancellationToken::new();
        entry.cancel_token = cancel_token.clone();

        let status = &mut entry.status;
        status.generation += 1;
        status.phase = SessionPhase::Fetching;
        status.address = Some(address.to_string());
        status.snapshot = None;
        status.error = None;
        status.message = None;
        status.updated_at = Utc::now();

        tracing::debug!(session, generation = status.generation, wallet = %address, "Session scan started");

        ScanTicket {
            generation: status.generation,
            cancel_token,
        }
    }

    /// Store a scan result if `generation` is still current.
    /// Returns false when the result was discarded.
    pub async fn commit(
        &self,
        session: &str,
        generation: u64,
        result: ScanResult<WalletSnapshot>,
    ) -> bool {
        let mut sessions = self.sessions.write().await;
        let Some(entry) = sessions.get_mut(session) else {
            return false;
        };

        if entry.status.generation != generation {
            tracing::debug!(
                session,
                generation,
                current = entry.status.generation,
                "Discarding superseded scan result"
            );
            return false;
        }

        let status = &mut entry.status;
        status.updated_at = Utc::now();
        match result {
            Ok(snapshot) => {
                status.phase = SessionPhase::Ready;
                status.snapshot = Some(snapshot);
            }
            Err(err) => {
                let kind = err.kind();
                status.phase = SessionPhase::Failed;
                status.snapshot = status
                    .address
                    .as_deref()
                    .map(|address| WalletSnapshot::failed(address, kind));
                status.error = Some(kind);
                status.message = Some(kind.user_message().to_string());
            }
        }
        true
    }

    /// Start a background scan for `session`, replacing any running one
    pub async fn spawn_scan(&self, indexer: Indexer, session: String, address: String) -> u64 {
        let ticket = self.begin(&session, &address).await;
        let generation = ticket.generation;
        let manager = self.clone();

        tokio::spawn(async move {
            let result = indexer.scan(&address, &ticket.cancel_token).await;
            if let Err(e) = &result {
                println!("[SESSION] {} scan {} failed: {}", session, generation, e);
                tracing::warn!(session = %session, generation, error = %e, "Session scan failed");
            }
            if !manager.commit(&session, generation, result).await {
                println!("[SESSION] {} scan {} superseded, result dropped", session, generation);
            }
        });

        generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_core::{ScanError, TierLabel, WalletTraits};

    fn snapshot(address: &str, score: u32) -> WalletSnapshot {
        WalletSnapshot {
            address: address.to_string(),
            score,
            tier: TierLabel::Mars,
            traits: WalletTraits::default(),
            error: None,
        }
    }

    #[tokio::test]
    async fn test_unknown_session_is_idle() {
        let manager = SessionManager::new(Duration::minutes(30));
        let status = manager.status("nobody").await;
        assert_eq!(status.phase, SessionPhase::Idle);
        assert_eq!(status.generation, 0);
    }

    #[tokio::test]
    async fn test_commit_moves_to_ready() {
        let manager = SessionManager::new(Duration::minutes(30));
        let ticket = manager.begin("s1", "WalletA").await;
        assert_eq!(manager.status("s1").await.phase, SessionPhase::Fetching);

        assert!(manager.commit("s1", ticket.generation, Ok(snapshot("WalletA", 120))).await);
        let status = manager.status("s1").await;
        assert_eq!(status.phase, SessionPhase::Ready);
        assert_eq!(status.snapshot.unwrap().score, 120);
    }

    #[tokio::test]
    async fn test_superseded_scan_never_commits() {
        let manager = SessionManager::new(Duration::minutes(30));
        let first = manager.begin("s1", "WalletA").await;
        let second = manager.begin("s1", "WalletB").await;

        assert!(first.cancel_token.is_cancelled());
        assert!(!second.cancel_token.is_cancelled());
        assert_eq!(second.generation, first.generation + 1);

        // The stale result arrives after the new scan started
        assert!(!manager.commit("s1", first.generation, Ok(snapshot("WalletA", 999))).await);
        let status = manager.status("s1").await;
        assert_eq!(status.phase, SessionPhase::Fetching);
        assert_eq!(status.address.as_deref(), Some("WalletB"));
        assert!(status.snapshot.is_none());

        assert!(manager.commit("s1", second.generation, Ok(snapshot("WalletB", 300))).await);
        assert_eq!(manager.status("s1").await.snapshot.unwrap().address, "WalletB");
    }

    #[tokio::test]
    async fn test_failed_scan_records_kind() {
        let manager = SessionManager::new(Duration::minutes(30));
        let ticket = manager.begin("s1", "WalletA").await;
        let committed = manager
            .commit("s1", ticket.generation, Err(ScanError::NoEndpointsConfigured))
            .await;
        assert!(committed);

        let status = manager.status("s1").await;
        assert_eq!(status.phase, SessionPhase::Failed);
        assert_eq!(status.error, Some(ErrorKind::NoEndpointsConfigured));
        let failed = status.snapshot.unwrap();
        assert_eq!(failed.score, 0);
        assert_eq!(failed.error, Some(ErrorKind::NoEndpointsConfigured));
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let manager = SessionManager::new(Duration::minutes(30));
        let a = manager.begin("a", "WalletA").await;
        let b = manager.begin("b", "WalletB").await;
        assert!(!a.cancel_token.is_cancelled());
        assert_eq!(b.generation, 1);
    }

    #[tokio::test]
    async fn test_settled_sessions_are_evicted_after_ttl() {
        let manager = SessionManager::new(Duration::minutes(30));
        let done = manager.begin("done", "WalletA").await;
        manager.commit("done", done.generation, Ok(snapshot("WalletA", 10))).await;
        let failed = manager.begin("failed", "WalletB").await;
        manager
            .commit("failed", failed.generation, Err(ScanError::NoEndpointsConfigured))
            .await;
        manager.begin("running", "WalletC").await;
        assert_eq!(manager.len().await, 3);

        assert_eq!(manager.prune(Utc::now()).await, 0);

        let later = Utc::now() + Duration::minutes(31);
        assert_eq!(manager.prune(later).await, 2);
        assert_eq!(manager.len().await, 1);
        assert_eq!(manager.status("running").await.phase, SessionPhase::Fetching);
        assert_eq!(manager.status("done").await.phase, SessionPhase::Idle);
    }
}
