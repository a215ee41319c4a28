use std::fmt;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use sweep_types::{ActionVerb, Noun, ResourceKind, RunId, Severity};

/// Which phase of a batch a notification summarizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPhase {
    /// Items that failed the eligibility check.
    Denied,
    /// Items the action succeeded on.
    Succeeded,
    /// Items the action failed on.
    Failed,
}

impl NotificationPhase {
    pub fn severity(&self) -> Severity {
        match self {
            Self::Denied | Self::Failed => Severity::Error,
            Self::Succeeded => Severity::Success,
        }
    }
}

impl fmt::Display for NotificationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Denied => write!(f, "denied"),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// One aggregated message covering every item of a batch in one phase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub run: RunId,
    pub phase: NotificationPhase,
    pub severity: Severity,
    pub kind: ResourceKind,
    pub verb: ActionVerb,
    pub noun: Noun,
    /// Display labels of the items, in the order they were reported.
    pub labels: Vec<String>,
    /// Number of items covered; drives singular/plural wording.
    pub count: usize,
}

impl Notification {
    pub fn new(
        run: RunId,
        phase: NotificationPhase,
        kind: ResourceKind,
        verb: ActionVerb,
        noun: Noun,
        labels: Vec<String>,
    ) -> Self {
        Self {
            run,
            phase,
            severity: phase.severity(),
            kind,
            verb,
            noun,
            count: labels.len(),
            labels,
        }
    }

    /// Default rendering, e.g. `Unable to delete domains: b, d`.
    pub fn message(&self) -> String {
        let noun = self.noun.for_count(self.count);
        let names = self.labels.join(", ");
        match self.phase {
            NotificationPhase::Denied => {
                format!("You are not allowed to {} {noun}: {names}", self.verb.present())
            }
            NotificationPhase::Succeeded => format!("{} {noun}: {names}", self.verb.past()),
            NotificationPhase::Failed => {
                format!("Unable to {} {noun}: {names}", self.verb.present())
            }
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message())
    }
}

/// Fire-and-forget sink for user-facing notifications (toasts).
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: &Notification);
}

/// Writes notifications to the tracing subscriber.
pub struct TracingNotifier;

impl NotificationSink for TracingNotifier {
    fn notify(&self, notification: &Notification) {
        match notification.severity {
            Severity::Success => tracing::info!(
                run = %notification.run.short_id(),
                phase = %notification.phase,
                count = notification.count,
                "{}",
                notification.message()
            ),
            Severity::Error => tracing::warn!(
                run = %notification.run.short_id(),
                phase = %notification.phase,
                count = notification.count,
                "{}",
                notification.message()
            ),
        }
    }
}

/// Keeps every notification in memory, in arrival order.
#[derive(Default)]
pub struct MemoryNotifier {
    received: RwLock<Vec<Notification>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.received
            .read()
            .expect("notifier lock poisoned")
            .clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.notifications().iter().map(Notification::message).collect()
    }

    /// Notifications for one phase.
    pub fn for_phase(&self, phase: NotificationPhase) -> Vec<Notification> {
        self.notifications()
            .into_iter()
            .filter(|n| n.phase == phase)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.received.read().expect("notifier lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl NotificationSink for MemoryNotifier {
    fn notify(&self, notification: &Notification) {
        self.received
            .write()
            .expect("notifier lock poisoned")
            .push(notification.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notification(phase: NotificationPhase, verb: ActionVerb, labels: &[&str]) -> Notification {
        let kind = ResourceKind::from("OS::Keystone::Domain");
        Notification::new(
            RunId::new(),
            phase,
            kind.clone(),
            verb,
            kind.noun(),
            labels.iter().map(|s| s.to_string()).collect(),
        )
    }

    #[test]
    fn wording_follows_count() {
        let one = notification(NotificationPhase::Succeeded, ActionVerb::Delete, &["a"]);
        assert_eq!(one.message(), "Deleted domain: a");
        assert_eq!(one.count, 1);

        let many = notification(NotificationPhase::Failed, ActionVerb::Delete, &["b", "d"]);
        assert_eq!(many.message(), "Unable to delete domains: b, d");
        assert_eq!(many.count, 2);
    }

    #[test]
    fn denial_wording_and_severity() {
        let n = notification(NotificationPhase::Denied, ActionVerb::Delete, &["b"]);
        assert_eq!(n.message(), "You are not allowed to delete domain: b");
        assert_eq!(n.severity, Severity::Error);
        assert_eq!(n.to_string(), "[error] You are not allowed to delete domain: b");
    }

    #[test]
    fn custom_verb_wording() {
        let verb: ActionVerb = "disable".parse().unwrap();
        let n = notification(NotificationPhase::Succeeded, verb, &["d1", "d2"]);
        assert_eq!(n.message(), "Disabled domains: d1, d2");
        assert_eq!(n.severity, Severity::Success);
    }

    #[test]
    fn notification_json_shape() {
        let n = notification(NotificationPhase::Failed, ActionVerb::Delete, &["c"]);
        let value = serde_json::to_value(&n).unwrap();
        assert_eq!(value["phase"], "failed");
        assert_eq!(value["severity"], "error");
        assert_eq!(value["labels"], serde_json::json!(["c"]));
        assert_eq!(value["count"], 1);

        let back: Notification = serde_json::from_value(value).unwrap();
        assert_eq!(back, n);
    }

    #[test]
    fn memory_notifier_records_in_order() {
        let sink = MemoryNotifier::new();
        assert!(sink.is_empty());
        sink.notify(&notification(NotificationPhase::Denied, ActionVerb::Delete, &["b"]));
        sink.notify(&notification(NotificationPhase::Succeeded, ActionVerb::Delete, &["a"]));
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.for_phase(NotificationPhase::Succeeded).len(), 1);
        assert_eq!(
            sink.messages(),
            vec![
                "You are not allowed to delete domain: b".to_string(),
                "Deleted domain: a".to_string()
            ]
        );
    }

    #[test]
    fn tracing_notifier_accepts_all_severities() {
        let sink = TracingNotifier;
        sink.notify(&notification(NotificationPhase::Succeeded, ActionVerb::Create, &["x"]));
        sink.notify(&notification(NotificationPhase::Failed, ActionVerb::Create, &["y"]));
    }
}
