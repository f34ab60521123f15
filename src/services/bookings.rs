//! Booking lifecycle service: creation, modification, cancellation and
//! confirmation, with the engine's gates and pricing applied around the
//! transactional repository.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    engine::{conflict, policy, pricing, refund},
    error::{AppError, AppResult},
    models::booking::{Booking, CancelBooking, CreateBooking, ModifyBooking, PriceQuote, QuoteRequest, UserBookingsQuery},
    models::enums::{BookingStatus, PaymentStatus},
    models::Field,
    repository::{bookings::NewBooking, Repository},
};

use super::notifications::{Notification, NotificationSender};
use super::payments::{self, PaymentGateway};

/// Pause before the single retry after a serialization conflict
const CONFLICT_RETRY_BACKOFF: Duration = Duration::from_millis(50);

#[derive(Clone)]
pub struct BookingsService {
    repository: Repository,
    payments: Arc<dyn PaymentGateway>,
    notifications: Arc<dyn NotificationSender>,
}

impl BookingsService {
    pub fn new(
        repository: Repository,
        payments: Arc<dyn PaymentGateway>,
        notifications: Arc<dyn NotificationSender>,
    ) -> Self {
        Self {
            repository,
            payments,
            notifications,
        }
    }

    /// Get a booking by ID
    pub async fn get_booking(&self, id: Uuid) -> AppResult<Booking> {
        self.repository.bookings.get_by_id(id).await
    }

    /// A user's bookings
    pub async fn get_user_bookings(
        &self,
        user_id: Uuid,
        query: &UserBookingsQuery,
    ) -> AppResult<Vec<Booking>> {
        self.repository.users.get_by_id(user_id).await?;
        self.repository.bookings.list_for_user(user_id, query).await
    }

    /// Price an interval without creating anything
    pub async fn quote(
        &self,
        field_id: Uuid,
        request: &QuoteRequest,
        now: DateTime<Utc>,
    ) -> AppResult<PriceQuote> {
        let field = self.repository.fields.get_by_id(field_id).await?;
        policy::check_duration(&field, request.start_time, request.end_time)?;

        let (breakdown, currency) = self
            .price_for(&field, request.user_id, request.start_time, request.end_time, now)
            .await?;

        Ok(PriceQuote {
            base_price: breakdown.base_price,
            discount_amount: breakdown.discount_amount,
            tax_amount: breakdown.tax_amount,
            total_amount: breakdown.total_amount,
            currency,
        })
    }

    /// Create a booking: gates, pricing, conflict-checked insert, payment
    /// intent. Retrying with the same `booking_id` returns the stored row
    /// instead of charging twice.
    pub async fn create_booking(
        &self,
        request: CreateBooking,
        now: DateTime<Utc>,
    ) -> AppResult<Booking> {
        if let Some(id) = request.booking_id {
            if let Some(existing) = self.repository.bookings.find_by_id(id).await? {
                return Ok(existing);
            }
        }

        let field = self.repository.fields.get_by_id(request.field_id).await?;
        policy::check_creation(&field, request.start_time, request.end_time, now)?;

        let (breakdown, currency) = self
            .price_for(&field, request.user_id, request.start_time, request.end_time, now)
            .await?;

        let new = NewBooking {
            id: request.booking_id.unwrap_or_else(Uuid::new_v4),
            field_id: field.id,
            user_id: request.user_id,
            organization_id: field.organization_id,
            start_time: request.start_time,
            end_time: request.end_time,
            base_price: breakdown.base_price,
            discount_amount: breakdown.discount_amount,
            tax_amount: breakdown.tax_amount,
            total_amount: breakdown.total_amount,
            notes: request.notes,
        };

        let attempt = self
            .with_conflict_retry(field.id, new.start_time, new.end_time, None, || {
                let repo = self.repository.bookings.clone();
                let new = new.clone();
                async move { repo.create_atomic(&new).await }
            })
            .await;

        let booking = match attempt {
            // A concurrent retry carrying the same booking_id lost the insert
            // race to its twin; the stored row already is this booking.
            Err(e) if e.is_unique_violation() && request.booking_id.is_some() => {
                return self.repository.bookings.get_by_id(new.id).await;
            }
            other => other?,
        };

        // Open the charge intent; a gateway failure is recorded, not fatal
        let booking = match self
            .payments
            .create_intent(booking.total_amount, &currency, booking.id)
            .await
        {
            Ok(intent_id) => {
                self.repository
                    .bookings
                    .set_payment_status(booking.id, PaymentStatus::Pending, Some(&intent_id))
                    .await?
            }
            Err(e) => {
                tracing::warn!("Payment intent failed for booking {}: {}", booking.id, e);
                self.repository
                    .bookings
                    .set_payment_status(booking.id, PaymentStatus::Failed, None)
                    .await?
            }
        };

        self.notify(
            &booking,
            "Booking received",
            format!(
                "Your booking of {} on {} is pending confirmation.",
                field.name,
                booking.start_time.format("%Y-%m-%d %H:%M")
            ),
        )
        .await;

        Ok(booking)
    }

    /// Move a booking to a new interval, re-running gates and pricing
    pub async fn modify_booking(
        &self,
        id: Uuid,
        request: ModifyBooking,
        now: DateTime<Utc>,
    ) -> AppResult<Booking> {
        let booking = self.repository.bookings.get_by_id(id).await?;
        let field = self.repository.fields.get_by_id(booking.field_id).await?;

        policy::check_modifiable(&booking, &field, now)?;
        policy::check_creation(&field, request.start_time, request.end_time, now)?;

        let (breakdown, _) = self
            .price_for(&field, booking.user_id, request.start_time, request.end_time, now)
            .await?;

        let field_id = field.id;
        let (start_time, end_time) = (request.start_time, request.end_time);
        let updated = self
            .with_conflict_retry(field_id, start_time, end_time, Some(id), || {
                let repo = self.repository.bookings.clone();
                let notes = request.notes.clone();
                let breakdown = breakdown.clone();
                async move {
                    repo.reschedule_atomic(
                        id,
                        field_id,
                        start_time,
                        end_time,
                        breakdown.base_price,
                        breakdown.discount_amount,
                        breakdown.tax_amount,
                        breakdown.total_amount,
                        notes.as_deref(),
                    )
                    .await
                }
            })
            .await?;

        self.notify(
            &updated,
            "Booking updated",
            format!(
                "Your booking was moved to {}.",
                updated.start_time.format("%Y-%m-%d %H:%M")
            ),
        )
        .await;

        Ok(updated)
    }

    /// Cancel a booking, computing the refund once and settling it through
    /// the payment collaborator. A settlement failure leaves the booking
    /// CANCELLED and records FAILED on the payment.
    pub async fn cancel_booking(
        &self,
        id: Uuid,
        request: CancelBooking,
        now: DateTime<Utc>,
    ) -> AppResult<Booking> {
        let booking = self.repository.bookings.get_by_id(id).await?;
        if booking.status == BookingStatus::Cancelled {
            return Err(AppError::AlreadyCancelled);
        }

        let field = self.repository.fields.get_by_id(booking.field_id).await?;
        let refund = refund::refund_amount(&booking, &field, now);

        let cancelled = self
            .repository
            .bookings
            .cancel(id, request.cancelled_by, request.reason.as_deref(), refund, now)
            .await?;

        let cancelled = match (&cancelled.payment_intent_id, cancelled.payment_status) {
            (Some(intent_id), PaymentStatus::Completed) if refund > rust_decimal::Decimal::ZERO => {
                let status = payments::settle_refund(self.payments.as_ref(), intent_id, refund).await;
                self.repository
                    .bookings
                    .set_payment_status(cancelled.id, status, None)
                    .await?
            }
            _ => cancelled,
        };

        self.notify(
            &cancelled,
            "Booking cancelled",
            match cancelled.refund_amount {
                Some(amount) if amount > rust_decimal::Decimal::ZERO => {
                    format!("Your booking was cancelled; {} will be refunded.", amount)
                }
                _ => "Your booking was cancelled outside the free-cancellation window; no refund applies.".to_string(),
            },
        )
        .await;

        Ok(cancelled)
    }

    /// Staff confirmation: PENDING → CONFIRMED, capturing the payment intent
    pub async fn confirm_booking(&self, id: Uuid, now: DateTime<Utc>) -> AppResult<Booking> {
        let booking = self.repository.bookings.get_by_id(id).await?;

        let confirmed = self.repository.bookings.confirm(id).await?.ok_or_else(|| {
            AppError::InvalidStateTransition {
                from: booking.status.to_string(),
                to: BookingStatus::Confirmed.to_string(),
            }
        })?;

        // Capture the payment. The booking stays CONFIRMED even when the
        // gateway fails; the outcome lands on payment_status.
        let confirmed = match &confirmed.payment_intent_id {
            Some(intent_id) => {
                let status = payments::settle_confirmation(self.payments.as_ref(), intent_id).await;
                self.repository
                    .bookings
                    .set_payment_status(confirmed.id, status, None)
                    .await?
            }
            None => confirmed,
        };

        tracing::debug!("Booking {} confirmed at {}", confirmed.id, now);

        self.notify(
            &confirmed,
            "Booking confirmed",
            format!(
                "Your booking on {} is confirmed.",
                confirmed.start_time.format("%Y-%m-%d %H:%M")
            ),
        )
        .await;

        Ok(confirmed)
    }

    /// Price an interval for a user on a field: membership first, flat member
    /// discount second, organization tax on top. Returns the breakdown and
    /// the organization's currency.
    async fn price_for(
        &self,
        field: &Field,
        user_id: Uuid,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> AppResult<(pricing::PriceBreakdown, String)> {
        let user = self.repository.users.get_by_id(user_id).await?;
        let organization = self
            .repository
            .organizations
            .get_by_id(field.organization_id)
            .await?;
        let membership = self
            .repository
            .memberships
            .get_for_user(field.organization_id, user_id)
            .await?;

        let breakdown = pricing::price_booking(
            field,
            start_time,
            end_time,
            membership.as_ref(),
            user.is_member,
            organization.tax_rate_percent,
            now,
        );
        Ok((breakdown, organization.currency))
    }

    /// Run a conflict-checked write, retrying once after a serialization
    /// failure or exclusion-constraint race. A second race is reported as
    /// `SlotUnavailable` with the winners' ids.
    async fn with_conflict_retry<F, Fut>(
        &self,
        field_id: Uuid,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        exclude: Option<Uuid>,
        attempt: F,
    ) -> AppResult<Booking>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = AppResult<Booking>>,
    {
        match attempt().await {
            Err(e) if e.is_retryable_conflict() => {
                tracing::debug!(
                    "Conflict-checked write on field {} lost a race, retrying once",
                    field_id
                );
                tokio::time::sleep(CONFLICT_RETRY_BACKOFF).await;
                match attempt().await {
                    Err(e) if e.is_retryable_conflict() => {
                        let winners = self
                            .repository
                            .bookings
                            .list_live_for_field(field_id, start_time, end_time)
                            .await?;
                        Err(AppError::SlotUnavailable {
                            conflicts: conflict::conflicting_ids(
                                start_time, end_time, &winners, exclude,
                            ),
                        })
                    }
                    other => other,
                }
            }
            other => other,
        }
    }

    /// Best-effort notification; failures are logged, never surfaced
    async fn notify(&self, booking: &Booking, title: &str, message: String) {
        let notification = Notification {
            user_id: booking.user_id,
            title: title.to_string(),
            message,
            booking_id: booking.id,
        };
        if let Err(e) = self.notifications.send(&notification).await {
            tracing::warn!("Failed to notify user {}: {}", booking.user_id, e);
        }
    }
}
