//! Frame clocks driving the progress animation.
//!
//! A clock may produce ticks on any thread, but the controller only ever
//! sees them through [`FrameClock::poll_tick`], called on the controller's
//! own thread. That call is the marshalling point.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

pub trait FrameClock {
    /// Begin ticking. Calling it while running does nothing.
    fn start(&mut self);
    /// Stop ticking and drop undelivered ticks. Calling it while stopped does nothing.
    fn stop(&mut self);
    fn is_running(&self) -> bool;
    /// Next pending refresh period in seconds, if any.
    fn poll_tick(&mut self) -> Option<f64>;
}

/// A clock ticked by the host's own display refresh.
///
/// Clones share state: keep one handle in the host's vsync callback and give
/// the other to the controller.
#[derive(Clone, Default)]
pub struct ManualClock {
    inner: Rc<RefCell<ManualState>>,
}

#[derive(Default)]
struct ManualState {
    running: bool,
    pending: VecDeque<f64>,
    starts: usize,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report that a refresh period elapsed. Ignored while stopped.
    pub fn tick(&self, refresh_period: f64) {
        let mut state = self.inner.borrow_mut();
        if state.running {
            state.pending.push_back(refresh_period);
        }
    }

    pub fn pending(&self) -> usize {
        self.inner.borrow().pending.len()
    }

    /// How many times the clock went from stopped to running.
    pub fn start_count(&self) -> usize {
        self.inner.borrow().starts
    }
}

impl FrameClock for ManualClock {
    fn start(&mut self) {
        let mut state = self.inner.borrow_mut();
        if !state.running {
            state.running = true;
            state.starts += 1;
        }
    }

    fn stop(&mut self) {
        let mut state = self.inner.borrow_mut();
        state.running = false;
        state.pending.clear();
    }

    fn is_running(&self) -> bool {
        self.inner.borrow().running
    }

    fn poll_tick(&mut self) -> Option<f64> {
        self.inner.borrow_mut().pending.pop_front()
    }
}

/// A clock backed by a timer thread that reports the measured time between
/// wakeups.
pub struct ThreadClock {
    period: Duration,
    worker: Option<Worker>,
}

struct Worker {
    stop: Arc<AtomicBool>,
    ticks: Receiver<f64>,
}

impl ThreadClock {
    pub fn new(period: Duration) -> Self {
        Self { period, worker: None }
    }

    /// A clock at the given refresh rate.
    pub fn with_rate(hz: u32) -> Self {
        Self::new(Duration::from_secs_f64(1.0 / hz.max(1) as f64))
    }
}

impl FrameClock for ThreadClock {
    fn start(&mut self) {
        if self.worker.is_some() {
            return;
        }
        let (tx, rx) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let flag = stop.clone();
        let period = self.period;

        debug!(?period, "starting frame clock thread");
        thread::spawn(move || {
            let mut last = Instant::now();
            while !flag.load(Ordering::Acquire) {
                thread::sleep(period);
                let now = Instant::now();
                let elapsed = now.duration_since(last).as_secs_f64();
                last = now;
                if tx.send(elapsed).is_err() {
                    break;
                }
            }
            trace!("frame clock thread exiting");
        });

        self.worker = Some(Worker { stop, ticks: rx });
    }

    fn stop(&mut self) {
        // The thread notices the flag (or the dropped receiver) on its next
        // wakeup; nothing here waits for it.
        if let Some(worker) = self.worker.take() {
            worker.stop.store(true, Ordering::Release);
            debug!("stopped frame clock thread");
        }
    }

    fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    fn poll_tick(&mut self) -> Option<f64> {
        self.worker.as_ref()?.ticks.try_recv().ok()
    }
}

impl Drop for ThreadClock {
    fn drop(&mut self) {
        self.stop();
    }
}
