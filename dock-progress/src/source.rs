//! External progress sources.
//!
//! A [`ProgressSource`] is a unit-count progress object that any thread may
//! update. Subscribers receive change events over a channel and apply them
//! on their own thread. A [`SourceSubscription`] only holds a `Weak`
//! reference, so it never keeps the source alive; once the source is gone
//! the subscription goes quiet.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::trace;

/// A change reported by a source.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SourceEvent {
    FractionCompleted(f64),
    Finished(bool),
}

struct Listener {
    id: u64,
    events: Sender<SourceEvent>,
}

#[derive(Default)]
struct SourceState {
    completed: u64,
    total: u64,
    cancelled: bool,
    listeners: Vec<Listener>,
    next_listener: u64,
}

impl SourceState {
    fn fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }

    fn is_finished(&self) -> bool {
        self.total > 0 && self.completed >= self.total
    }

    fn notify(&mut self, event: SourceEvent) {
        // Receivers that went away unsubscribe themselves here.
        self.listeners.retain(|l| l.events.send(event).is_ok());
    }

    fn update(&mut self, apply: impl FnOnce(&mut Self)) {
        let was_finished = self.is_finished();
        apply(self);
        if self.cancelled {
            trace!("source cancelled, change not reported");
            return;
        }
        self.notify(SourceEvent::FractionCompleted(self.fraction()));
        let finished = self.is_finished();
        if finished != was_finished {
            self.notify(SourceEvent::Finished(finished));
        }
    }
}

#[derive(Clone, Default)]
pub struct ProgressSource {
    state: Arc<Mutex<SourceState>>,
}

impl ProgressSource {
    pub fn new(total: u64) -> Self {
        Self {
            state: Arc::new(Mutex::new(SourceState {
                total,
                ..SourceState::default()
            })),
        }
    }

    pub fn set_completed(&self, units: u64) {
        self.state.lock().update(|s| s.completed = units);
    }

    pub fn set_total(&self, units: u64) {
        self.state.lock().update(|s| s.total = units);
    }

    /// Mark the work cancelled. Later changes are not reported.
    pub fn cancel(&self) {
        self.state.lock().cancelled = true;
    }

    pub fn completed(&self) -> u64 {
        self.state.lock().completed
    }

    pub fn total(&self) -> u64 {
        self.state.lock().total
    }

    pub fn fraction_completed(&self) -> f64 {
        self.state.lock().fraction()
    }

    pub fn is_finished(&self) -> bool {
        self.state.lock().is_finished()
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.lock().cancelled
    }

    pub fn subscribe(&self) -> SourceSubscription {
        let (tx, rx) = mpsc::channel();
        let mut state = self.state.lock();
        let id = state.next_listener;
        state.next_listener += 1;
        state.listeners.push(Listener { id, events: tx });

        SourceSubscription {
            id,
            source: Arc::downgrade(&self.state),
            events: rx,
        }
    }

    #[cfg(test)]
    fn listener_count(&self) -> usize {
        self.state.lock().listeners.len()
    }
}

/// Observer token for one [`ProgressSource`]. Dropping it unsubscribes.
pub struct SourceSubscription {
    id: u64,
    source: Weak<Mutex<SourceState>>,
    events: Receiver<SourceEvent>,
}

impl SourceSubscription {
    pub fn is_alive(&self) -> bool {
        self.source.strong_count() > 0
    }

    /// Progress values to apply, in order, for the events received since the
    /// last call. Changes reported before the source was cancelled or dropped
    /// are still delivered.
    pub fn take_updates(&self) -> Vec<f64> {
        self.events
            .try_iter()
            .filter_map(|event| match event {
                SourceEvent::FractionCompleted(fraction) => Some(fraction),
                SourceEvent::Finished(true) => Some(1.0),
                SourceEvent::Finished(false) => None,
            })
            .collect()
    }
}

impl Drop for SourceSubscription {
    fn drop(&mut self) {
        if let Some(source) = self.source.upgrade() {
            let id = self.id;
            source.lock().listeners.retain(|l| l.id != id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fraction_and_finished_follow_units() {
        let source = ProgressSource::new(4);
        assert_eq!(source.fraction_completed(), 0.0);
        source.set_completed(2);
        assert_eq!(source.fraction_completed(), 0.5);
        assert!(!source.is_finished());
        source.set_completed(4);
        assert!(source.is_finished());
        assert_eq!(ProgressSource::new(0).fraction_completed(), 0.0);
        assert!(!ProgressSource::new(0).is_finished());
    }

    #[test]
    fn subscription_sees_fraction_then_finish() {
        let source = ProgressSource::new(2);
        let sub = source.subscribe();
        source.set_completed(1);
        source.set_completed(2);
        assert_eq!(sub.take_updates(), vec![0.5, 1.0, 1.0]);
        assert!(sub.take_updates().is_empty());
    }

    #[test]
    fn cancel_stops_later_reports_only() {
        let source = ProgressSource::new(10);
        let sub = source.subscribe();
        source.set_completed(3);
        source.cancel();
        source.set_completed(7);
        source.set_completed(10);
        assert_eq!(sub.take_updates(), vec![0.3]);
        assert_eq!(source.fraction_completed(), 1.0, "the source itself still tracks units");
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let source = ProgressSource::new(10);
        let sub = source.subscribe();
        let _other = source.subscribe();
        assert_eq!(source.listener_count(), 2);
        drop(sub);
        assert_eq!(source.listener_count(), 1);
    }

    #[test]
    fn dropped_source_delivers_pending_then_goes_quiet() {
        let source = ProgressSource::new(10);
        let sub = source.subscribe();
        source.set_completed(5);
        drop(source);
        assert!(!sub.is_alive());
        assert_eq!(sub.take_updates(), vec![0.5], "last report survives the source");
        assert!(sub.take_updates().is_empty());
    }

    #[test]
    fn updates_from_other_threads_are_delivered() {
        let source = ProgressSource::new(100);
        let sub = source.subscribe();
        let worker = source.clone();
        std::thread::spawn(move || worker.set_completed(25))
            .join()
            .unwrap();
        assert_eq!(sub.take_updates(), vec![0.25]);
    }
}
