//! Cooperative cancellation.
//!
//! Assignment loops and GA generations poll a [`CancelToken`]; a
//! cancelled run stops at the next poll and returns what it has. The
//! [`InterruptManager`] registers each scheduling call under its task ids
//! so a caller can interrupt one task (or a whole batch) from another
//! thread.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::models::TaskId;

/// A shared cancellation flag.
///
/// Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Creates an unset token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Clears the flag for reuse.
    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Per-task interrupt state.
///
/// An id is tracked only while a scheduling call is in flight for it or an
/// interrupt is pending on it, so the map stays bounded by live work.
#[derive(Debug, Default)]
pub struct InterruptManager {
    slots: Mutex<HashMap<TaskId, Slot>>,
}

#[derive(Debug, Default)]
struct Slot {
    pending: bool,
    live: Vec<CancelToken>,
}

impl InterruptManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one call covering `tasks` and returns its lease.
    ///
    /// All ids share the lease's token, so interrupting any task of a
    /// batch cancels the whole call. Calls already in flight for the same
    /// ids keep their own tokens and are cancelled alongside. A pending
    /// interrupt on any id cancels the new token immediately.
    pub fn register(&self, tasks: &[TaskId]) -> Registration<'_> {
        let token = CancelToken::new();
        let mut slots = self.slots.lock();
        for id in tasks {
            let slot = slots.entry(*id).or_default();
            if slot.pending {
                token.cancel();
            }
            slot.live.push(token.clone());
        }
        Registration {
            manager: self,
            tasks: tasks.to_vec(),
            token,
        }
    }

    /// Flags `task` for interruption and cancels its in-flight calls.
    pub fn request_interrupt(&self, task: TaskId) {
        debug!(task = %task, "interrupt requested");
        let mut slots = self.slots.lock();
        let slot = slots.entry(task).or_default();
        slot.pending = true;
        for token in &slot.live {
            token.cancel();
        }
    }

    pub fn is_interrupted(&self, task: TaskId) -> bool {
        self.slots.lock().get(&task).is_some_and(|slot| slot.pending)
    }

    /// Drops the pending flag for `task`; the next call starts unset.
    ///
    /// Calls already cancelled stay cancelled.
    pub fn clear_interrupt(&self, task: TaskId) {
        let mut slots = self.slots.lock();
        if let Some(slot) = slots.get_mut(&task) {
            slot.pending = false;
            if slot.live.is_empty() {
                slots.remove(&task);
            }
        }
    }

    /// Number of tracked task ids.
    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.lock().is_empty()
    }

    fn release(&self, tasks: &[TaskId], token: &CancelToken) {
        let mut slots = self.slots.lock();
        for id in tasks {
            if let Some(slot) = slots.get_mut(id) {
                slot.live.retain(|t| !Arc::ptr_eq(&t.0, &token.0));
                if !slot.pending && slot.live.is_empty() {
                    slots.remove(id);
                }
            }
        }
    }
}

/// A registered scheduling call; unregisters its ids when dropped.
#[derive(Debug)]
pub struct Registration<'a> {
    manager: &'a InterruptManager,
    tasks: Vec<TaskId>,
    token: CancelToken,
}

impl Registration<'_> {
    /// The call's token.
    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }
}

impl Drop for Registration<'_> {
    fn drop(&mut self) {
        self.manager.release(&self.tasks, &self.token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_shared_between_clones() {
        let t = CancelToken::new();
        let c = t.clone();
        assert!(!c.is_cancelled());
        t.cancel();
        assert!(c.is_cancelled());
        c.reset();
        assert!(!t.is_cancelled());
    }

    #[test]
    fn test_request_and_clear() {
        let m = InterruptManager::new();
        let id = TaskId(7);
        let call = m.register(&[id]);
        assert!(!m.is_interrupted(id));

        m.request_interrupt(id);
        assert!(m.is_interrupted(id));
        assert!(call.token().is_cancelled());
        drop(call);
        assert!(m.is_interrupted(id));

        m.clear_interrupt(id);
        assert!(!m.is_interrupted(id));
        assert!(!m.register(&[id]).token().is_cancelled());
        assert!(m.is_empty());
    }

    #[test]
    fn test_batch_token() {
        let m = InterruptManager::new();
        let ids = [TaskId(1), TaskId(2), TaskId(3)];
        let call = m.register(&ids);
        m.request_interrupt(TaskId(2));
        assert!(call.token().is_cancelled());
        assert!(m.is_interrupted(TaskId(2)));
        assert!(!m.is_interrupted(TaskId(3)));
    }

    #[test]
    fn test_batch_inherits_pending_interrupt() {
        let m = InterruptManager::new();
        m.request_interrupt(TaskId(5));
        let call = m.register(&[TaskId(4), TaskId(5)]);
        assert!(call.token().is_cancelled());
    }

    #[test]
    fn test_overlapping_calls_both_cancelled() {
        let m = InterruptManager::new();
        let single = m.register(&[TaskId(1)]);
        let batch = m.register(&[TaskId(1), TaskId(2)]);
        m.request_interrupt(TaskId(1));
        assert!(single.token().is_cancelled());
        assert!(batch.token().is_cancelled());
    }

    #[test]
    fn test_released_calls_leave_nothing_tracked() {
        let m = InterruptManager::new();
        for i in 0..1000 {
            let call = m.register(&[TaskId(i), TaskId(i + 1)]);
            assert_eq!(m.len(), 2);
            drop(call);
        }
        assert!(m.is_empty());

        let outer = m.register(&[TaskId(1)]);
        drop(m.register(&[TaskId(1)]));
        assert_eq!(m.len(), 1);
        drop(outer);
        assert!(m.is_empty());
    }
}
