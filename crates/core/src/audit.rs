use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogOperation {
    AddComputer,
    AddComponent,
    RemoveComponent,
    AddPeripheral,
    RemovePeripheral,
    BuyComputer,
    BuyBestComputer,
    GetComputerData,
}

impl CatalogOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AddComputer => "add_computer",
            Self::AddComponent => "add_component",
            Self::RemoveComponent => "remove_component",
            Self::AddPeripheral => "add_peripheral",
            Self::RemovePeripheral => "remove_peripheral",
            Self::BuyComputer => "buy_computer",
            Self::BuyBestComputer => "buy_best_computer",
            Self::GetComputerData => "get_computer_data",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditOutcome {
    Success,
    Rejected,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub event_id: String,
    pub operation: CatalogOperation,
    pub outcome: AuditOutcome,
    pub metadata: BTreeMap<String, String>,
    pub occurred_at: DateTime<Utc>,
}

impl AuditEvent {
    pub fn new(operation: CatalogOperation, outcome: AuditOutcome) -> Self {
        Self {
            event_id: Uuid::new_v4().to_string(),
            operation,
            outcome,
            metadata: BTreeMap::new(),
            occurred_at: Utc::now(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

pub trait AuditSink {
    fn emit(&self, event: AuditEvent);
}

/// Clonable sink; every clone appends to the same event list.
#[derive(Clone, Default)]
pub struct InMemoryAuditSink {
    events: Arc<Mutex<Vec<AuditEvent>>>,
}

impl InMemoryAuditSink {
    pub fn events(&self) -> Vec<AuditEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl AuditSink for InMemoryAuditSink {
    fn emit(&self, event: AuditEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::audit::{AuditEvent, AuditOutcome, AuditSink, CatalogOperation, InMemoryAuditSink};

    #[test]
    fn clones_share_recorded_events() {
        let sink = InMemoryAuditSink::default();
        let handle = sink.clone();
        handle.emit(
            AuditEvent::new(CatalogOperation::AddComputer, AuditOutcome::Success)
                .with_metadata("computer_id", "7"),
        );

        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].operation, CatalogOperation::AddComputer);
        assert_eq!(events[0].metadata.get("computer_id").map(String::as_str), Some("7"));
        assert!(!events[0].event_id.is_empty());
    }

    #[test]
    fn events_serialize_with_snake_case_tags() {
        let event = AuditEvent::new(CatalogOperation::BuyBestComputer, AuditOutcome::Rejected);
        let json = serde_json::to_value(&event).expect("serialize audit event");

        assert_eq!(json["operation"], "buy_best_computer");
        assert_eq!(json["outcome"], "rejected");
    }
}
