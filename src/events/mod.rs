use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

/// Domain events emitted by the engine after a successful commit. Consumers
/// (audit log, notifications) subscribe via the processing loop; delivery is
/// best-effort and never fails an already-committed operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    AdministrationRecorded {
        administration_id: Uuid,
        treatment_id: Uuid,
        lot_id: Uuid,
        dose: Decimal,
    },
    AdministrationUpdated {
        administration_id: Uuid,
        lot_id: Uuid,
        dose_delta: Option<Decimal>,
        window_recomputed: bool,
    },
    InventoryTransactionRecorded {
        transaction_id: Uuid,
        lot_id: Uuid,
        transaction_type: String,
        quantity: Decimal,
    },
    MovementExecuted {
        movement_id: Uuid,
        animal_id: Uuid,
        kind: String,
        origin_id: Option<Uuid>,
        destination_id: Option<Uuid>,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event, surfacing channel failures to the caller.
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }

    /// Fire-and-forget variant used after commit: the operation already
    /// succeeded, so a full channel only warrants a warning.
    pub async fn emit(&self, event: Event) {
        if let Err(err) = self.send(event).await {
            warn!(error = %err, "event channel send failed");
        }
    }
}

/// Drains the event channel and logs each event. Runs until every sender is
/// dropped.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        info!(?event, "domain event");
    }
    info!("event channel closed, processor exiting");
}
