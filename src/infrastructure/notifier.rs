use crate::domain::notice::Notice;
use crate::domain::ports::Notifier;
use std::sync::{Arc, Mutex};
use tracing::error;

/// Renders notices as `error` events on the tracing subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: &Notice) {
        match &notice.details {
            Some(details) => error!(details = %details, "{}", notice.message),
            None => error!("{}", notice.message),
        }
    }
}

/// Keeps every notice it receives. Clones share the same list.
#[derive(Debug, Default, Clone)]
pub struct CollectingNotifier {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl CollectingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Notifier for CollectingNotifier {
    fn notify(&self, notice: &Notice) {
        self.notices
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(notice.clone());
    }
}
