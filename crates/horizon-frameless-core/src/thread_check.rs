//! Thread affinity checks.
//!
//! The event loop and the frameless helper are single-threaded: all of their
//! state-mutating operations are expected to run on the thread that created
//! them. `ThreadAffinity` records that thread and lets debug builds verify it.
//!
//! ```ignore
//! use horizon_frameless_core::ThreadAffinity;
//!
//! struct Queue {
//!     affinity: ThreadAffinity,
//! }
//!
//! impl Queue {
//!     fn pump(&self) {
//!         self.affinity.debug_assert_same_thread();
//!         // ...
//!     }
//! }
//! ```

use std::thread::ThreadId;

/// Records the thread an object belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadAffinity {
    thread_id: ThreadId,
}

impl ThreadAffinity {
    /// Create an affinity bound to the calling thread.
    pub fn current() -> Self {
        Self {
            thread_id: std::thread::current().id(),
        }
    }

    /// The thread this affinity is bound to.
    #[inline]
    pub fn thread_id(&self) -> ThreadId {
        self.thread_id
    }

    /// Whether the calling thread is the bound thread.
    #[inline]
    pub fn is_same_thread(&self) -> bool {
        std::thread::current().id() == self.thread_id
    }

    /// Panics in debug builds when called from a foreign thread.
    #[inline]
    #[track_caller]
    pub fn debug_assert_same_thread(&self) {
        debug_assert!(
            self.is_same_thread(),
            "thread affinity violation: bound to {:?}, called from {:?}",
            self.thread_id,
            std::thread::current().id()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_thread() {
        let affinity = ThreadAffinity::current();
        assert!(affinity.is_same_thread());
        affinity.debug_assert_same_thread();
    }

    #[test]
    fn test_other_thread() {
        let affinity = ThreadAffinity::current();
        let on_other = std::thread::spawn(move || affinity.is_same_thread())
            .join()
            .unwrap();
        assert!(!on_other);
    }
}
