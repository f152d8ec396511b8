use crate::backend::ReservationBackend;
use crate::booking_rules::BookingRules;
use crate::booking_validator::RejectReason;
use crate::reservation_manager::SubmitError;
use crate::slot_status::SlotStatusIndex;
use crate::types::{BookingRequest, Role};
use crate::AppState;
use axum::extract::Query;
use axum::response::Response;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use axum::{
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::error;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
struct BookingForm {
    date: NaiveDate,
    #[validate(length(max = 64))]
    booker_name: String,
    role: Role,
    #[serde(default)]
    slot: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SlotQuery {
    date: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
struct SlotStatusResponse {
    date: NaiveDate,
    slots: SlotStatusIndex,
}

#[derive(Debug, Clone, Serialize)]
struct RulesResponse {
    website_title: String,
    #[serde(flatten)]
    rules: BookingRules,
}

#[derive(Debug, Clone, Serialize)]
struct RejectionResponse {
    rejection: RejectReason,
    message: String,
}

pub fn create_app<T: ReservationBackend>(state: AppState<T>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/reservations", get(get_reservations))
        .route("/slots", get(get_slots))
        .route("/rules", get(get_rules))
        .route("/book", post(book_reservation))
        .with_state(state)
        .layer(cors)
}

async fn get_reservations<T: ReservationBackend>(State(state): State<AppState<T>>) -> Response {
    match state.reservation_manager.reservations() {
        Ok(reservations) => Json(reservations).into_response(),
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response(),
    }
}

async fn get_slots<T: ReservationBackend>(
    State(state): State<AppState<T>>,
    Query(query): Query<SlotQuery>,
) -> Response {
    match state.reservation_manager.slot_status(query.date) {
        Ok(slots) => Json(SlotStatusResponse {
            date: query.date,
            slots,
        })
        .into_response(),
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response(),
    }
}

async fn get_rules<T: ReservationBackend>(State(state): State<AppState<T>>) -> impl IntoResponse {
    Json(RulesResponse {
        website_title: state.website_title.clone(),
        rules: state.reservation_manager.rules().clone(),
    })
}

async fn book_reservation<T: ReservationBackend>(
    State(state): State<AppState<T>>,
    Json(mut form): Json<BookingForm>,
) -> Response {
    form.booker_name = form.booker_name.trim().to_string();
    if let Err(err) = form.validate() {
        return (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()).into_response();
    }

    let request = BookingRequest {
        booker_name: form.booker_name,
        role: form.role,
        slot: form.slot,
    };

    match state.reservation_manager.submit(form.date, request) {
        Ok(receipt) => Json(receipt).into_response(),
        Err(SubmitError::Rejected(reason)) => {
            let status = if reason.is_malformed_request() {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::CONFLICT
            };
            let body = RejectionResponse {
                message: reason.to_string(),
                rejection: reason,
            };
            (status, Json(body)).into_response()
        }
        Err(err @ SubmitError::Store(_)) => {
            error!(%err, "Reservation can't be booked");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
    }
}
