//! Event channel implementation using crossbeam-channel.

use crossbeam_channel::{unbounded, Receiver, Sender};

use super::Event;

/// Sends events from the core library.
///
/// Cheap to clone; can be moved across threads.
#[derive(Clone)]
pub struct EventSender {
    inner: Sender<Event>,
}

impl EventSender {
    /// Send an event.
    ///
    /// If the receiver is dropped, the event is silently discarded so
    /// progress reporting stays optional.
    pub fn send(&self, event: Event) {
        let _ = self.inner.send(event);
    }
}

/// Receives events from the core library.
pub struct EventReceiver {
    inner: Receiver<Event>,
}

impl EventReceiver {
    /// Try to receive an event without blocking
    pub fn try_recv(&self) -> Option<Event> {
        self.inner.try_recv().ok()
    }

    /// Iterate until every sender is dropped
    pub fn iter(&self) -> impl Iterator<Item = Event> + '_ {
        self.inner.iter()
    }
}

/// Channel between the core library and a UI layer.
pub struct EventChannel;

impl EventChannel {
    /// Create a new unbounded event channel.
    pub fn new() -> (EventSender, EventReceiver) {
        let (sender, receiver) = unbounded();
        (
            EventSender { inner: sender },
            EventReceiver { inner: receiver },
        )
    }
}

/// A sender nobody listens to.
pub fn null_sender() -> EventSender {
    let (sender, _receiver) = EventChannel::new();
    sender
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{ScanEvent, SplitEvent};
    use std::path::PathBuf;
    use std::thread;

    #[test]
    fn events_can_be_sent_across_threads() {
        let (sender, receiver) = EventChannel::new();

        let handle = thread::spawn(move || {
            sender.send(Event::Split(SplitEvent::Moved {
                from: PathBuf::from("/frames/A12.png"),
                to: PathBuf::from("/frames/camera_12/A12.png"),
            }));
        });
        handle.join().unwrap();

        let first = receiver.iter().next();
        match first {
            Some(Event::Split(SplitEvent::Moved { to, .. })) => {
                assert!(to.ends_with("camera_12/A12.png"));
            }
            _ => panic!("Wrong event type"),
        }
    }

    #[test]
    fn null_sender_does_not_panic() {
        let sender = null_sender();
        sender.send(Event::Scan(ScanEvent::Completed { total_files: 3 }));
    }

    #[test]
    fn try_recv_is_empty_after_drain() {
        let (sender, receiver) = EventChannel::new();
        sender.send(Event::Scan(ScanEvent::Completed { total_files: 0 }));

        assert!(receiver.try_recv().is_some());
        assert!(receiver.try_recv().is_none());
    }
}
