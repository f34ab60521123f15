//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{availability, bookings, fields, health};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Matchpoint API",
        version = "0.3.0",
        description = "Court booking platform REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Fields
        fields::list_fields,
        fields::get_field,
        fields::create_field,
        fields::update_field,
        fields::deactivate_field,
        // Availability
        availability::get_availability,
        // Bookings
        bookings::quote,
        bookings::create_booking,
        bookings::get_booking,
        bookings::modify_booking,
        bookings::cancel_booking,
        bookings::confirm_booking,
        bookings::get_user_bookings,
    ),
    components(
        schemas(
            // Fields
            crate::models::field::Field,
            crate::models::field::CreateField,
            crate::models::field::UpdateField,
            // Availability
            availability::AvailabilityResponse,
            crate::engine::availability::AvailabilitySlot,
            // Bookings
            crate::models::booking::Booking,
            crate::models::booking::CreateBooking,
            crate::models::booking::ModifyBooking,
            crate::models::booking::CancelBooking,
            crate::models::booking::QuoteRequest,
            crate::models::booking::PriceQuote,
            bookings::CancelResponse,
            // Enums
            crate::models::enums::BookingStatus,
            crate::models::enums::PaymentStatus,
            crate::models::enums::MembershipStatus,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "fields", description = "Field catalog management"),
        (name = "availability", description = "Slot availability"),
        (name = "bookings", description = "Booking lifecycle")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
