//! Host event bus.
//!
//! The host publishes display lifecycle events; menus subscribe named
//! handlers. A handler may veto a close, in which case the host must keep
//! (or reopen) the display. Every handler sees every event, and the bus
//! reports `Veto` if any one of them vetoed.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use menukit_contracts::player::PlayerId;

/// Events the host raises.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// The player is closing the named menu's display. Vetoable.
    DisplayClosing { menu: String, player: PlayerId },
    /// The player disconnected. Every menu must release the player; a veto
    /// is ignored by the host.
    PlayerQuit { player: PlayerId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResponse {
    Continue,
    Veto,
}

type Handler = Arc<dyn Fn(&HostEvent) -> EventResponse + Send + Sync>;

#[derive(Default)]
pub struct EventBus {
    handlers: RwLock<Vec<(String, Handler)>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `handler` under `name`, replacing a handler of the same name.
    pub fn subscribe<F>(&self, name: impl Into<String>, handler: F)
    where
        F: Fn(&HostEvent) -> EventResponse + Send + Sync + 'static,
    {
        let name = name.into();
        let handler: Handler = Arc::new(handler);
        let mut handlers = self.handlers.write();
        match handlers.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = handler,
            None => handlers.push((name, handler)),
        }
    }

    /// Remove the handler registered under `name`. Returns true if one existed.
    pub fn unsubscribe(&self, name: &str) -> bool {
        let mut handlers = self.handlers.write();
        let before = handlers.len();
        handlers.retain(|(n, _)| n != name);
        handlers.len() != before
    }

    pub fn handler_names(&self) -> Vec<String> {
        self.handlers.read().iter().map(|(n, _)| n.clone()).collect()
    }

    /// Deliver `event` to every handler in subscription order.
    pub fn publish(&self, event: &HostEvent) -> EventResponse {
        // Snapshot so handlers may subscribe or unsubscribe while running.
        let handlers: Vec<(String, Handler)> = self.handlers.read().clone();
        let mut response = EventResponse::Continue;
        for (name, handler) in handlers {
            if handler(event) == EventResponse::Veto {
                debug!(handler = %name, ?event, "event vetoed");
                response = EventResponse::Veto;
            }
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn publish_reaches_every_handler_and_reports_veto() {
        let bus = EventBus::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let c = calls.clone();
        bus.subscribe("first", move |_| {
            c.fetch_add(1, Ordering::SeqCst);
            EventResponse::Veto
        });
        let c = calls.clone();
        bus.subscribe("second", move |_| {
            c.fetch_add(1, Ordering::SeqCst);
            EventResponse::Continue
        });

        let player = PlayerId::new();
        let response = bus.publish(&HostEvent::PlayerQuit { player });

        assert_eq!(response, EventResponse::Veto);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn subscribe_same_name_replaces() {
        let bus = EventBus::new();
        bus.subscribe("menu:shop:close", |_| EventResponse::Veto);
        bus.subscribe("menu:shop:close", |_| EventResponse::Continue);

        assert_eq!(bus.handler_names(), vec!["menu:shop:close".to_string()]);
        let response = bus.publish(&HostEvent::PlayerQuit { player: PlayerId::new() });
        assert_eq!(response, EventResponse::Continue);

        assert!(bus.unsubscribe("menu:shop:close"));
        assert!(!bus.unsubscribe("menu:shop:close"));
    }
}
