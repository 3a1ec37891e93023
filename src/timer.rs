//! One-shot timers for bounded playback.

use std::thread;
use std::time::Duration;

use crossbeam::channel::{bounded, RecvTimeoutError, Sender};
use tracing::trace;

use crate::errors::Result;

/// Callback run when a timer fires
pub type TimerCallback = Box<dyn FnOnce() + Send + 'static>;

/// Schedules a callback to run once after a delay.
pub trait Timer: Send + Sync + 'static {
    /// Handle for a pending callback
    type Handle: Send + 'static;

    /// Runs `callback` once, `after` from now, on some other thread.
    fn schedule_once(&self, after: Duration, callback: TimerCallback) -> Result<Self::Handle>;

    /// Disarms a pending callback. Harmless when it already ran. Must not wait for a
    /// callback that is running.
    fn cancel(&self, handle: Self::Handle);
}

/// Spawns a thread per armed timer. The thread sleeps on a channel so cancelling wakes it
/// straight away.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadTimer;

/// Pending `ThreadTimer` callback. Dropping the handle cancels it.
#[derive(Debug)]
pub struct ThreadTimerHandle {
    _cancel: Sender<()>,
}

impl Timer for ThreadTimer {
    type Handle = ThreadTimerHandle;

    fn schedule_once(&self, after: Duration, callback: TimerCallback) -> Result<ThreadTimerHandle> {
        let (cancel_sender, cancel_receiver) = bounded::<()>(1);

        thread::Builder::new()
            .name("dtmf_timer".to_string())
            .spawn(move || match cancel_receiver.recv_timeout(after) {
                Err(RecvTimeoutError::Timeout) => callback(),
                Ok(()) | Err(RecvTimeoutError::Disconnected) => trace!("timer cancelled"),
            })?;

        Ok(ThreadTimerHandle {
            _cancel: cancel_sender,
        })
    }

    fn cancel(&self, handle: ThreadTimerHandle) {
        drop(handle);
    }
}
