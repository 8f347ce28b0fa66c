use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Ganado API",
        version = "0.3.0",
        description = r#"
# Ganado Livestock Management API

Backend for livestock traceability: animal movements across the
ranch/pasture/pen hierarchy, veterinary drug-withdrawal tracking, and
lot-based inventory control.

## Error Handling

Failures return a consistent JSON body with an HTTP status, a stable
machine-readable `code`, and a human-readable `message`:

```json
{
  "error": "Conflict",
  "code": "insufficient_stock",
  "message": "Insufficient stock in lot ...: available 5, requested 10",
  "timestamp": "2025-01-01T00:00:00Z"
}
```

Structural violations (origin/destination shape, hierarchy rules) map to
422; domain-state conflicts (expired lot, short stock, active withdrawal)
map to 409 and require caller correction, not a retry.
        "#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    tags(
        (name = "Administrations", description = "Drug application recording"),
        (name = "Movements", description = "Animal movement validation and execution"),
        (name = "Withdrawals", description = "Meat/milk withdrawal windows"),
        (name = "Inventory", description = "Lot stock ledger"),
        (name = "Health", description = "Health check endpoints")
    ),
    paths(
        crate::handlers::administrations::create_administration,
        crate::handlers::administrations::update_administration,
        crate::handlers::movements::create_movement,
        crate::handlers::inventory::record_transaction,
        crate::handlers::withdrawals::get_active_withdrawal,
        crate::handlers::health::health,
    ),
    components(schemas(
        crate::handlers::administrations::CreateAdministrationRequest,
        crate::handlers::administrations::UpdateAdministrationRequest,
        crate::handlers::movements::CreateMovementRequest,
        crate::handlers::inventory::CreateInventoryTransactionRequest,
        crate::services::withdrawal::ActiveWithdrawal,
        crate::entities::movement::MovementKind,
        crate::entities::inventory_transaction::TransactionType,
        crate::errors::ErrorResponse,
    ))
)]
pub struct ApiDoc;

/// Swagger UI mounted at `/docs`, serving the generated document.
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}
