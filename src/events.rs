use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::workflow::Status;

/// Domain events emitted after state changes commit. Consumers are
/// fire-and-forget; a send failure never rolls back the transaction
/// that produced the event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    WorkOrderCreated {
        work_order_id: Uuid,
        code: String,
        status: Status,
    },
    WorkOrderAdvanced {
        work_order_id: Uuid,
        from: Status,
        to: Status,
    },
    PaymentRecorded {
        work_order_id: Uuid,
        payment_id: Uuid,
        amount: Decimal,
        balance: Decimal,
    },
    ShipmentScanned {
        shipment_id: Uuid,
        work_order_id: Uuid,
        scanned_at: DateTime<Utc>,
    },
    CustomerCreated {
        customer_id: Uuid,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(tx: mpsc::Sender<Event>) -> Self {
        Self { tx }
    }

    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.tx
            .send(event)
            .await
            .map_err(|e| format!("failed to send event: {}", e))
    }
}

/// Drains the event channel and logs each event. Runs for the lifetime
/// of the process; exits when all senders are dropped.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("event processor started");
    while let Some(event) = rx.recv().await {
        match &event {
            Event::WorkOrderCreated {
                work_order_id,
                code,
                status,
            } => {
                info!(%work_order_id, %code, %status, "work order created");
            }
            Event::WorkOrderAdvanced {
                work_order_id,
                from,
                to,
            } => {
                info!(%work_order_id, %from, %to, "work order advanced");
            }
            Event::PaymentRecorded {
                work_order_id,
                payment_id,
                amount,
                balance,
            } => {
                info!(%work_order_id, %payment_id, %amount, %balance, "payment recorded");
            }
            Event::ShipmentScanned {
                shipment_id,
                work_order_id,
                ..
            } => {
                info!(%shipment_id, %work_order_id, "shipment scan recorded");
            }
            Event::CustomerCreated { customer_id } => {
                debug!(%customer_id, "customer created");
            }
        }
    }
    error!("event channel closed, processor exiting");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_and_receive() {
        let (tx, mut rx) = mpsc::channel(8);
        let sender = EventSender::new(tx);
        sender
            .send(Event::CustomerCreated {
                customer_id: Uuid::new_v4(),
            })
            .await
            .unwrap();
        assert!(matches!(
            rx.recv().await,
            Some(Event::CustomerCreated { .. })
        ));
    }

    #[tokio::test]
    async fn send_fails_when_receiver_dropped() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let sender = EventSender::new(tx);
        let result = sender
            .send(Event::CustomerCreated {
                customer_id: Uuid::new_v4(),
            })
            .await;
        assert!(result.is_err());
    }
}
