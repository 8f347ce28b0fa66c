use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Set, TransactionError, TransactionTrait,
};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::entities::{
    inventory_transaction::{self, TransactionType},
    product_lot,
};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};

/// Input for the public ledger entry point.
///
/// `quantity` is a positive magnitude for `In`/`Out` and a signed non-zero
/// delta for `Adjust`.
#[derive(Debug, Clone)]
pub struct RecordTransactionInput {
    pub lot_id: Uuid,
    pub transaction_type: TransactionType,
    pub quantity: Decimal,
    pub occurred_at: Option<DateTime<Utc>>,
    pub reason: Option<String>,
    pub created_by: Option<Uuid>,
}

/// Result of posting a stock change: the fresh lot balance and the ledger
/// entry written alongside it.
#[derive(Debug, Clone)]
pub struct StockChange {
    pub lot: product_lot::Model,
    pub entry: inventory_transaction::Model,
}

/// Expiry gates consumption only: inbound receipts and stock returns on an
/// expired lot are accepted.
pub(crate) fn assert_not_expired(
    lot: &product_lot::Model,
    as_of: NaiveDate,
) -> Result<(), ServiceError> {
    if let Some(expired_on) = lot.expires_at {
        if expired_on < as_of {
            return Err(ServiceError::LotExpired {
                lot_id: lot.id,
                expired_on,
                as_of,
            });
        }
    }
    Ok(())
}

/// Loads a lot treating soft-deleted rows as missing. Used by the
/// administration path, where an inactive lot is simply not found.
pub(crate) async fn load_active_lot<C: ConnectionTrait>(
    conn: &C,
    lot_id: Uuid,
) -> Result<product_lot::Model, ServiceError> {
    product_lot::Entity::find_by_id(lot_id)
        .filter(product_lot::Column::DeletedAt.is_null())
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Lot {} not found", lot_id)))
}

/// Applies a signed stock delta to a lot and appends the matching ledger
/// entry, as one unit on the caller's connection (callers run this inside
/// a transaction).
///
/// The sufficiency check and the balance mutation are a single conditional
/// UPDATE, so concurrent decrements cannot drive the balance negative no
/// matter the isolation level. `rows_affected == 0` means the guard
/// rejected the change; the lot is re-read to report the actual state.
pub(crate) async fn post_stock_change<C: ConnectionTrait>(
    conn: &C,
    lot: &product_lot::Model,
    delta: Decimal,
    transaction_type: TransactionType,
    occurred_at: DateTime<Utc>,
    administration_id: Option<Uuid>,
    reason: Option<String>,
    created_by: Option<Uuid>,
) -> Result<StockChange, ServiceError> {
    let now = Utc::now();

    let mut update = product_lot::Entity::update_many()
        .col_expr(
            product_lot::Column::AvailableQuantity,
            Expr::col(product_lot::Column::AvailableQuantity).add(Expr::val(delta)),
        )
        .col_expr(product_lot::Column::UpdatedAt, Expr::value(now))
        .filter(product_lot::Column::Id.eq(lot.id))
        .filter(product_lot::Column::DeletedAt.is_null());
    if delta < Decimal::ZERO {
        update = update.filter(product_lot::Column::AvailableQuantity.gte(-delta));
    }

    let result = update.exec(conn).await?;
    if result.rows_affected == 0 {
        let current = product_lot::Entity::find_by_id(lot.id)
            .filter(product_lot::Column::DeletedAt.is_null())
            .one(conn)
            .await?;
        return Err(match current {
            Some(current) => ServiceError::InsufficientStock {
                lot_id: current.id,
                available: current.available_quantity,
                requested: -delta,
            },
            None => ServiceError::LotInactive { lot_id: lot.id },
        });
    }

    let entry = inventory_transaction::ActiveModel {
        id: Set(Uuid::new_v4()),
        lot_id: Set(lot.id),
        product_id: Set(lot.product_id),
        transaction_type: Set(transaction_type),
        quantity: Set(delta),
        occurred_at: Set(occurred_at),
        administration_id: Set(administration_id),
        reason: Set(reason),
        created_by: Set(created_by),
        created_at: Set(now),
    }
    .insert(conn)
    .await?;

    let lot = load_active_lot(conn, lot.id).await?;

    Ok(StockChange { lot, entry })
}

/// Ledger service: every change to a lot balance goes through here (or
/// through `post_stock_change` from the administration recorder), paired
/// with its append-only entry.
#[derive(Clone)]
pub struct InventoryService {
    db: Arc<DatabaseConnection>,
    event_sender: EventSender,
}

impl InventoryService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self))]
    pub async fn record_transaction(
        &self,
        input: RecordTransactionInput,
    ) -> Result<inventory_transaction::Model, ServiceError> {
        let delta = signed_delta(input.transaction_type, input.quantity)?;
        let occurred_at = input.occurred_at.unwrap_or_else(Utc::now);

        let db = self.db.as_ref();
        let change = db
            .transaction::<_, StockChange, ServiceError>(move |txn| {
                Box::pin(async move {
                    let lot = product_lot::Entity::find_by_id(input.lot_id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!("Lot {} not found", input.lot_id))
                        })?;
                    if lot.is_inactive() {
                        return Err(ServiceError::LotInactive { lot_id: lot.id });
                    }

                    post_stock_change(
                        txn,
                        &lot,
                        delta,
                        input.transaction_type,
                        occurred_at,
                        None,
                        input.reason,
                        input.created_by,
                    )
                    .await
                })
            })
            .await
            .map_err(|e| match e {
                TransactionError::Connection(db_err) => ServiceError::DatabaseError(db_err),
                TransactionError::Transaction(service_err) => service_err,
            })?;

        self.event_sender
            .emit(Event::InventoryTransactionRecorded {
                transaction_id: change.entry.id,
                lot_id: change.entry.lot_id,
                transaction_type: change.entry.transaction_type.to_string(),
                quantity: change.entry.quantity,
            })
            .await;

        Ok(change.entry)
    }
}

/// Normalizes the request quantity into the signed delta stored on the
/// ledger and applied to the balance.
fn signed_delta(
    transaction_type: TransactionType,
    quantity: Decimal,
) -> Result<Decimal, ServiceError> {
    match transaction_type {
        TransactionType::In => {
            if quantity <= Decimal::ZERO {
                return Err(ServiceError::ValidationError(
                    "quantity must be positive for inbound transactions".into(),
                ));
            }
            Ok(quantity)
        }
        TransactionType::Out => {
            if quantity <= Decimal::ZERO {
                return Err(ServiceError::ValidationError(
                    "quantity must be positive for outbound transactions".into(),
                ));
            }
            Ok(-quantity)
        }
        TransactionType::Adjust => {
            if quantity == Decimal::ZERO {
                return Err(ServiceError::ValidationError(
                    "adjustment delta cannot be zero".into(),
                ));
            }
            Ok(quantity)
        }
    }
}
