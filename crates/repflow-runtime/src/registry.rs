//! Session registry - many independent dispatchers behind per-session locks

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::info;

use repflow_core::{Frame, RepflowError, RepflowResult, SessionId};

use crate::{DispatcherConfig, DispatcherSnapshot, HandleOutcome, SessionDispatcher};

/// Keyed collection of session dispatchers.
///
/// The map lock is held only for lookup, insert and remove. Frame handling
/// locks the one session it touches, so sessions never contend with each
/// other.
#[derive(Debug)]
pub struct SessionRegistry {
    config: DispatcherConfig,
    sessions: RwLock<HashMap<SessionId, Arc<Mutex<SessionDispatcher>>>>,
    next_id: AtomicU64,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(DispatcherConfig::default())
    }
}

impl SessionRegistry {
    /// Every session opened here starts from `config`
    pub fn new(config: DispatcherConfig) -> Self {
        SessionRegistry {
            config,
            sessions: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Open a session under a fresh identifier
    pub fn open(&self) -> SessionId {
        let mut sessions = self.sessions.write();
        let mut id = SessionId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        while sessions.contains_key(&id) {
            id = SessionId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        }
        sessions.insert(id, self.new_dispatcher());
        info!(session = %id, "session opened");
        id
    }

    /// Open a session under a caller-chosen identifier.
    ///
    /// Returns false if the identifier is already in use.
    pub fn open_with_id(&self, id: SessionId) -> bool {
        let mut sessions = self.sessions.write();
        if sessions.contains_key(&id) {
            return false;
        }
        sessions.insert(id, self.new_dispatcher());
        info!(session = %id, "session opened");
        true
    }

    /// Route a frame to session `id`
    pub fn handle(
        &self,
        id: SessionId,
        exercise_id: &str,
        frame: &Frame,
    ) -> RepflowResult<HandleOutcome> {
        let session = self.session(id)?;
        let mut dispatcher = session.lock();
        dispatcher.handle(exercise_id, frame)
    }

    /// Record a tick without a detection for session `id`
    pub fn handle_lost(&self, id: SessionId, exercise_id: &str) -> RepflowResult<HandleOutcome> {
        let session = self.session(id)?;
        let mut dispatcher = session.lock();
        dispatcher.handle_lost(exercise_id)
    }

    /// Diagnostic view of session `id`
    pub fn snapshot(&self, id: SessionId) -> RepflowResult<DispatcherSnapshot> {
        let session = self.session(id)?;
        let dispatcher = session.lock();
        Ok(dispatcher.snapshot())
    }

    /// Close a session, returning its final snapshot
    pub fn close(&self, id: SessionId) -> RepflowResult<DispatcherSnapshot> {
        let session = self
            .sessions
            .write()
            .remove(&id)
            .ok_or(RepflowError::SessionNotFound(id))?;
        let snapshot = session.lock().snapshot();
        info!(session = %id, reps = snapshot.stats.reps, "session closed");
        Ok(snapshot)
    }

    /// Session `id` is open
    pub fn contains(&self, id: SessionId) -> bool {
        self.sessions.read().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    /// Ids of every open session, in no particular order
    pub fn session_ids(&self) -> Vec<SessionId> {
        let mut ids: Vec<SessionId> = self.sessions.read().keys().copied().collect();
        ids.sort();
        ids
    }

    fn session(&self, id: SessionId) -> RepflowResult<Arc<Mutex<SessionDispatcher>>> {
        self.sessions
            .read()
            .get(&id)
            .cloned()
            .ok_or(RepflowError::SessionNotFound(id))
    }

    fn new_dispatcher(&self) -> Arc<Mutex<SessionDispatcher>> {
        Arc::new(Mutex::new(SessionDispatcher::with_config(self.config.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use repflow_core::{FrameBuilder, PoseLandmark};
    use std::thread;

    fn squat_bottom() -> Frame {
        FrameBuilder::new()
            .at(PoseLandmark::LeftShoulder, 0.47, 0.45)
            .at(PoseLandmark::LeftHip, 0.45, 0.75)
            .at(PoseLandmark::LeftKnee, 0.5, 0.7)
            .at(PoseLandmark::LeftAnkle, 0.5, 0.9)
            .build()
    }

    #[test]
    fn test_open_close() {
        let registry = SessionRegistry::default();
        assert!(registry.is_empty());

        let a = registry.open();
        let b = registry.open();
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.session_ids(), vec![a, b]);

        registry.close(a).unwrap();
        assert!(!registry.contains(a));
        assert_eq!(registry.close(a), Err(RepflowError::SessionNotFound(a)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_open_with_id() {
        let registry = SessionRegistry::default();
        let id = SessionId::new(7);
        assert!(registry.open_with_id(id));
        assert!(!registry.open_with_id(id));
        assert!(registry.contains(id));
    }

    #[test]
    fn test_unknown_session() {
        let registry = SessionRegistry::default();
        let id = SessionId::new(99);
        let frame = FrameBuilder::new().build();
        assert_eq!(
            registry.handle(id, "squats", &frame),
            Err(RepflowError::SessionNotFound(id))
        );
        assert!(registry.handle_lost(id, "squats").is_err());
        assert!(registry.snapshot(id).is_err());
    }

    #[test]
    fn test_sessions_are_isolated() {
        let registry = SessionRegistry::default();
        let a = registry.open();
        let b = registry.open();

        registry.handle(a, "squats", &squat_bottom()).unwrap();
        registry.handle(b, "jumping_jacks", &FrameBuilder::new().build()).unwrap();

        let snap_a = registry.snapshot(a).unwrap();
        let snap_b = registry.snapshot(b).unwrap();
        assert_eq!(snap_a.phase, Some("squatting"));
        assert_eq!(snap_b.phase, Some("closed"));
        assert_eq!(snap_b.stats.frames, 1);
    }

    #[test]
    fn test_concurrent_sessions() {
        let registry = Arc::new(SessionRegistry::default());
        let ids: Vec<SessionId> = (0..4).map(|_| registry.open()).collect();

        let handles: Vec<_> = ids
            .iter()
            .map(|&id| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    let frame = FrameBuilder::new().build();
                    for _ in 0..50 {
                        registry.handle(id, "high_knees", &frame).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        for id in ids {
            assert_eq!(registry.snapshot(id).unwrap().stats.frames, 50);
        }
    }
}
