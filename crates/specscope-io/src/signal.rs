//! Coalescing single-slot work signal.
//!
//! The producer raises the signal after adding samples; the worker consumes it
//! and drains. Raising it any number of times before the worker wakes still
//! yields one wakeup. Raising it while the worker is draining leaves it pending
//! so the worker checks for work once more after the current drain.

use parking_lot::{Condvar, Mutex};
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
struct SignalState {
    pending: bool,
    busy: bool,
    closed: bool,
}

/// Wake/drain handshake between the producer side and one worker.
#[derive(Debug, Default)]
pub struct WorkSignal {
    state: Mutex<SignalState>,
    wake: Condvar,
    idle: Condvar,
}

impl WorkSignal {
    /// Creates a signal with nothing pending.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raises the signal. Never blocks beyond the state lock.
    pub fn notify(&self) {
        let mut state = self.state.lock();
        state.pending = true;
        self.wake.notify_one();
    }

    /// Waits up to `timeout` for the signal.
    ///
    /// Returns true if the signal was consumed; the caller is then busy until
    /// it calls [`finish`](Self::finish). Returns false on timeout or once the
    /// signal is closed.
    pub fn wait(&self, timeout: Duration) -> bool {
        let deadline = deadline_after(timeout);
        let mut state = self.state.lock();
        while !state.pending && !state.closed {
            match deadline {
                Some(at) => {
                    if self.wake.wait_until(&mut state, at).timed_out() {
                        break;
                    }
                }
                None => self.wake.wait(&mut state),
            }
        }
        if state.pending && !state.closed {
            state.pending = false;
            state.busy = true;
            true
        } else {
            false
        }
    }

    /// Marks the current drain as done.
    pub fn finish(&self) {
        let mut state = self.state.lock();
        state.busy = false;
        if !state.pending {
            self.idle.notify_all();
        }
    }

    /// Blocks until nothing is pending and no drain is running, or `timeout`
    /// elapses. Returns true if idle was reached.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let deadline = deadline_after(timeout);
        let mut state = self.state.lock();
        while (state.pending || state.busy) && !state.closed {
            match deadline {
                Some(at) => {
                    if self.idle.wait_until(&mut state, at).timed_out() {
                        return !(state.pending || state.busy) || state.closed;
                    }
                }
                None => self.idle.wait(&mut state),
            }
        }
        true
    }

    /// Returns true if a signal is waiting to be consumed.
    pub fn is_pending(&self) -> bool {
        self.state.lock().pending
    }

    /// Wakes the worker for good and releases every idle waiter.
    pub fn close(&self) {
        let mut state = self.state.lock();
        state.closed = true;
        state.busy = false;
        self.wake.notify_all();
        self.idle.notify_all();
    }

    /// Returns true once [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }
}

/// `None` when the timeout is too large to represent, meaning wait forever.
fn deadline_after(timeout: Duration) -> Option<Instant> {
    Instant::now().checked_add(timeout)
}
