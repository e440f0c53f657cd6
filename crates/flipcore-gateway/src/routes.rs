//! Settlement routes and the stable error-to-status contract.

use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde_json::json;
use tower_http::cors::CorsLayer;

use flipcore_engine::SettlementOrchestrator;
use flipcore_ledger::SettlementLedger;
use flipcore_types::{EngineConfig, FlipcoreError, WagerResolution};

use crate::capability::capability_document;
use crate::x402::{PaymentPayload, decode_payment_header};

/// Shared handler state: one orchestrator per process.
pub struct AppState<L: SettlementLedger> {
    pub orchestrator: Arc<SettlementOrchestrator<L>>,
}

impl<L: SettlementLedger> Clone for AppState<L> {
    fn clone(&self) -> Self {
        Self {
            orchestrator: Arc::clone(&self.orchestrator),
        }
    }
}

/// Build the gateway router. Both verbs land on the same entry point: the
/// presence of the payment header, not the method, decides between the 402
/// capability document and settlement.
pub fn router<L: SettlementLedger + 'static>(state: AppState<L>) -> Router {
    Router::new()
        .route("/", get(flip_entry::<L>).post(flip_entry::<L>))
        .route("/healthz", get(health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    "ok"
}

async fn flip_entry<L: SettlementLedger + 'static>(
    State(state): State<AppState<L>>,
    headers: HeaderMap,
) -> Response {
    let config = state.orchestrator.config();

    let Some(payment) = headers.get("x-payment").and_then(|v| v.to_str().ok()) else {
        return capability_response(config, &headers);
    };

    let envelope = match decode_payment_header(payment) {
        Ok(envelope) => envelope,
        Err(err) => return error_response(&err),
    };
    let PaymentPayload {
        signature,
        authorization,
    } = envelope.payload;

    match state.orchestrator.settle(authorization, &signature).await {
        Ok(resolution) => success_response(config, &resolution),
        Err(err) => error_response(&err),
    }
}

fn resource_url(headers: &HeaderMap) -> String {
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    format!("https://{host}/")
}

fn capability_response(config: &EngineConfig, headers: &HeaderMap) -> Response {
    let doc = capability_document(config, &resource_url(headers));
    (
        StatusCode::PAYMENT_REQUIRED,
        [(header::CACHE_CONTROL, "no-cache")],
        axum::Json(doc),
    )
        .into_response()
}

fn success_response(config: &EngineConfig, resolution: &WagerResolution) -> Response {
    let message = if resolution.lucky {
        let payout = resolution
            .payout_amount
            .unwrap_or(resolution.bet_amount)
            .to_display(config.asset_decimals);
        format!("You won! {payout} {} sent to your wallet!", config.asset_symbol)
    } else {
        "Sorry, you lost this flip. Better luck next time!".to_string()
    };

    let body = json!({
        "success": true,
        "message": message,
        "data": resolution,
    });
    (StatusCode::OK, axum::Json(body)).into_response()
}

/// The stable status contract. Exhaustive over error variants — adding a
/// variant forces a mapping decision here.
fn status_for(err: &FlipcoreError) -> StatusCode {
    use FlipcoreError as E;
    match err {
        E::AuthorizationReplayed(_) => StatusCode::CONFLICT,
        E::BetBelowMinimum { .. } | E::BetAboveMaximum { .. } => StatusCode::PAYMENT_REQUIRED,
        E::InvalidPayload { .. }
        | E::RecipientMismatch { .. }
        | E::MalformedSignature { .. }
        | E::MalformedAddress(_)
        | E::MalformedAmount(_)
        | E::MalformedNonce(_) => StatusCode::BAD_REQUEST,
        E::InsufficientGasReserve { .. } | E::InsufficientAssetReserve { .. } => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        E::CollectionRejected { .. }
        | E::PayoutRejected { .. }
        | E::Internal(_)
        | E::Serialization(_)
        | E::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(err: &FlipcoreError) -> Response {
    let status = status_for(err);

    // Settlement-reserve shortfalls are an operational condition: the full
    // reason is already logged by the orchestrator, clients get a generic
    // unavailability.
    let message = if status == StatusCode::SERVICE_UNAVAILABLE {
        tracing::warn!(error = %err, "masking payout precondition failure as 503");
        "Service temporarily unavailable. Please try again later.".to_string()
    } else {
        err.to_string()
    };

    let body = json!({ "success": false, "error": message });
    (status, axum::Json(body)).into_response()
}
