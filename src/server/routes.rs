//! Request handlers.

use std::collections::BTreeMap;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::AppState;
use super::error::ApiError;
use crate::catalog::{ClassWorkshop, Record, ResearchProject, ScienceHub};
use crate::checkout::{DONATION_ITEMS, DonationItem, DonationRequest};
use crate::listing::{
    FilterSelection, ListingConfig, ListingKind, ListingPage, LoadState, UnknownListing, load_once,
};
use crate::realtime::{ChangeEvent, ChangeKind};

const WEBHOOK_SECRET_HEADER: &str = "x-webhook-secret";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CheckoutResponse {
    session_id: String,
}

/// Database webhook body. Extra keys such as `record` are ignored.
#[derive(Debug, Deserialize)]
pub(super) struct ChangeNotification {
    #[serde(rename = "type", default)]
    kind: ChangeKind,
    table: String,
}

pub(super) async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub(super) async fn donation_items() -> Json<[DonationItem; 4]> {
    Json(DONATION_ITEMS)
}

pub(super) async fn create_checkout_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<DonationRequest>, JsonRejection>,
) -> Result<Json<CheckoutResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(%rejection, "rejected checkout body");
        ApiError::BadRequest {
            message: "Invalid request body".to_owned(),
        }
    })?;
    let origin = request_origin(&headers).unwrap_or(&state.public_origin);

    let session = state
        .checkout
        .create_checkout_session(&request, origin)
        .await?;
    Ok(Json(CheckoutResponse {
        session_id: session.id,
    }))
}

fn request_origin(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::ORIGIN)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|origin| !origin.is_empty() && *origin != "null")
}

pub(super) fn parse_kind(kind: &str) -> Result<ListingKind, ApiError> {
    kind.parse()
        .map_err(|error: UnknownListing| ApiError::NotFound {
            message: error.to_string(),
        })
}

pub(super) async fn listing(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(params): Query<BTreeMap<String, String>>,
) -> Result<(StatusCode, Json<ListingPage>), ApiError> {
    let listing_kind = parse_kind(&kind)?;
    let requested: FilterSelection = params.into_iter().collect();
    let config = listing_kind.config();

    let page = match listing_kind {
        ListingKind::Projects => load_page::<ResearchProject>(&state, &config, &requested).await,
        ListingKind::Hubs => load_page::<ScienceHub>(&state, &config, &requested).await,
        ListingKind::Classes => load_page::<ClassWorkshop>(&state, &config, &requested).await,
    };
    let status = if page.state == LoadState::Error {
        StatusCode::BAD_GATEWAY
    } else {
        StatusCode::OK
    };
    Ok((status, Json(page)))
}

async fn load_page<R: Record>(
    state: &AppState,
    config: &ListingConfig,
    requested: &FilterSelection,
) -> ListingPage {
    let snapshot = load_once::<R>(
        config.clone(),
        state.store.as_ref(),
        requested,
        state.listing_options.fetch_timeout,
    )
    .await;
    ListingPage::from_snapshot(config, &snapshot)
}

pub(super) async fn table_changed(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ChangeNotification>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    if let Some(expected) = state.webhook_secret.as_deref() {
        let presented = headers
            .get(WEBHOOK_SECRET_HEADER)
            .and_then(|value| value.to_str().ok());
        if presented != Some(expected) {
            tracing::warn!("change webhook rejected: bad secret");
            return Err(ApiError::Unauthorized);
        }
    }
    let Json(notification) = payload.map_err(|rejection| ApiError::BadRequest {
        message: format!("Invalid change notification: {}", rejection.body_text()),
    })?;

    let delivered = state
        .changes
        .publish(ChangeEvent::new(notification.table, notification.kind));
    Ok((StatusCode::ACCEPTED, Json(json!({ "delivered": delivered }))))
}
