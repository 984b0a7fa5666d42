use std::panic::{self, AssertUnwindSafe};

use serde::Serialize;

use crate::layout::LayoutState;
use crate::panel::PanelId;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum LayoutEvent {
    LayoutApplied { name: String },
    PanelVisibilityChanged { panel: PanelId, visible: bool },
    PanelResized { panel: PanelId, size: f64 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn FnMut(&LayoutEvent, &LayoutState)>;

/// Change subscribers, called synchronously in registration order.
///
/// Each callback gets the event and the state as it stands after the change,
/// so a renderer can redraw without reaching back into the manager.
#[derive(Default)]
pub struct Subscribers {
    next_id: u64,
    entries: Vec<(SubscriptionId, Callback)>,
}

impl Subscribers {
    pub fn subscribe(
        &mut self,
        callback: impl FnMut(&LayoutEvent, &LayoutState) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Box::new(callback)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    /// Deliver `event` to every subscriber. A panicking subscriber is logged
    /// and skipped; the rest still run.
    pub fn notify(&mut self, event: &LayoutEvent, state: &LayoutState) {
        for (id, callback) in self.entries.iter_mut() {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| callback(event, state)));
            if let Err(payload) = outcome {
                let msg = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                tracing::error!(subscriber = id.0, ?event, "layout subscriber panicked: {}", msg);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Recorder = Box<dyn FnMut(&LayoutEvent, &LayoutState)>;

    fn recorder() -> (Rc<RefCell<Vec<String>>>, impl Fn(&str) -> Recorder) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let log2 = log.clone();
        let make = move |tag: &str| -> Recorder {
            let log = log2.clone();
            let tag = tag.to_string();
            Box::new(move |_: &LayoutEvent, _: &LayoutState| log.borrow_mut().push(tag.clone()))
        };
        (log, make)
    }

    fn applied() -> LayoutEvent {
        LayoutEvent::LayoutApplied {
            name: "focus".to_string(),
        }
    }

    #[test]
    fn test_registration_order() {
        let (log, make) = recorder();
        let mut subs = Subscribers::default();
        subs.subscribe(make("a"));
        subs.subscribe(make("b"));
        subs.notify(&applied(), &LayoutState::default());
        assert_eq!(*log.borrow(), ["a", "b"]);
    }

    #[test]
    fn test_panicking_subscriber_does_not_block_others() {
        let (log, make) = recorder();
        let mut subs = Subscribers::default();
        subs.subscribe(|_, _| panic!("renderer exploded"));
        subs.subscribe(make("after"));
        subs.notify(&applied(), &LayoutState::default());
        subs.notify(&applied(), &LayoutState::default());
        assert_eq!(*log.borrow(), ["after", "after"]);
    }

    #[test]
    fn test_unsubscribe() {
        let (log, make) = recorder();
        let mut subs = Subscribers::default();
        let a = subs.subscribe(make("a"));
        subs.subscribe(make("b"));
        assert!(subs.unsubscribe(a));
        assert!(!subs.unsubscribe(a));
        subs.notify(&applied(), &LayoutState::default());
        assert_eq!(*log.borrow(), ["b"]);
    }

    #[test]
    fn test_callback_sees_state() {
        let seen = Rc::new(RefCell::new(None));
        let sink = seen.clone();
        let mut subs = Subscribers::default();
        subs.subscribe(move |_, state: &LayoutState| {
            *sink.borrow_mut() = Some(state.current_layout_name.clone());
        });
        let mut state = LayoutState::default();
        state.current_layout_name = "focus".to_string();
        subs.notify(&applied(), &state);
        assert_eq!(seen.borrow().as_deref(), Some("focus"));
    }

    #[test]
    fn test_event_json_shape() {
        let ev = LayoutEvent::PanelVisibilityChanged {
            panel: PanelId::Terminal,
            visible: false,
        };
        let json = serde_json::to_value(&ev).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "panelVisibilityChanged", "panel": "terminal", "visible": false})
        );
    }
}
