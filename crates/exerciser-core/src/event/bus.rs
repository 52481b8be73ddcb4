// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

/// A generic, thread-safe, unbounded event channel.
///
/// Cloned senders may live on any thread; the bus itself stays with the single
/// consumer, which calls [`drain`](EventBus::drain) once per iteration.
#[derive(Debug)]
pub struct EventBus<T: Send + 'static> {
    sender: flume::Sender<T>,
    receiver: flume::Receiver<T>,
}

impl<T: Send + 'static> EventBus<T> {
    /// Creates a new bus with an unbounded channel.
    pub fn new() -> Self {
        let (sender, receiver) = flume::unbounded();
        log::debug!("EventBus initialized.");
        Self { sender, receiver }
    }

    /// Sends an event from the consumer's own side.
    pub fn publish(&self, event: T) {
        if let Err(e) = self.sender.send(event) {
            log::error!("Failed to send event: {e}. Receiver likely disconnected.");
        }
    }

    /// Returns a clone of the sender end, for producers on other threads.
    pub fn sender(&self) -> flume::Sender<T> {
        self.sender.clone()
    }

    /// Takes every event currently queued, in send order, without blocking.
    pub fn drain(&self) -> Vec<T> {
        self.receiver.try_iter().collect()
    }

    /// Returns `true` if no event is queued.
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

impl<T: Send + 'static> Default for EventBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[derive(Debug, Clone, PartialEq)]
    enum TestCommand {
        Quit,
        Reload,
    }

    #[test]
    fn new_bus_is_empty() {
        let bus = EventBus::<TestCommand>::new();
        assert!(bus.is_empty());
        assert!(bus.drain().is_empty());
    }

    #[test]
    fn drain_returns_events_in_send_order() {
        let bus = EventBus::new();
        bus.publish(TestCommand::Reload);
        bus.sender()
            .send(TestCommand::Quit)
            .expect("Send should succeed");

        assert_eq!(bus.drain(), vec![TestCommand::Reload, TestCommand::Quit]);
        assert!(bus.is_empty(), "drain should consume everything");
    }

    #[test]
    fn send_from_thread() {
        let bus = EventBus::new();
        let sender = bus.sender();

        let handle = thread::spawn(move || {
            sender
                .send(TestCommand::Quit)
                .expect("Send from thread failed");
        });
        handle.join().expect("Thread join failed");

        assert_eq!(bus.drain(), vec![TestCommand::Quit]);
    }

    #[test]
    fn send_fails_after_bus_drop() {
        let bus = EventBus::new();
        let sender = bus.sender();
        drop(bus);
        assert!(sender.send(TestCommand::Quit).is_err());
    }
}
