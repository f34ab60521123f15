//! Payment gateway collaborator seam.
//!
//! The engine never speaks a gateway wire protocol; it computes amounts and
//! hands settlement to this trait. Outcomes are recorded on the booking's
//! `payment_status` and a gateway failure never rolls back a lifecycle
//! transition that already committed.

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{error::AppResult, models::enums::PaymentStatus};

/// External payment processor, keyed by opaque intent IDs
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Open a charge intent for a booking; returns the gateway's intent ID
    async fn create_intent(
        &self,
        amount: Decimal,
        currency: &str,
        booking_id: Uuid,
    ) -> AppResult<String>;

    /// Capture a previously created intent
    async fn confirm(&self, intent_id: &str) -> AppResult<()>;

    /// Refund against a captured intent
    async fn refund(&self, intent_id: &str, amount: Decimal) -> AppResult<()>;
}

/// Development gateway: accepts everything and logs what it would have done
#[derive(Debug, Default, Clone)]
pub struct LogPaymentGateway;

#[async_trait]
impl PaymentGateway for LogPaymentGateway {
    async fn create_intent(
        &self,
        amount: Decimal,
        currency: &str,
        booking_id: Uuid,
    ) -> AppResult<String> {
        let intent_id = format!("intent-{}", booking_id);
        tracing::info!("Payment intent {} opened: {} {}", intent_id, amount, currency);
        Ok(intent_id)
    }

    async fn confirm(&self, intent_id: &str) -> AppResult<()> {
        tracing::info!("Payment intent {} confirmed", intent_id);
        Ok(())
    }

    async fn refund(&self, intent_id: &str, amount: Decimal) -> AppResult<()> {
        tracing::info!("Refund of {} issued against intent {}", amount, intent_id);
        Ok(())
    }
}

/// Capture a booking's payment; the returned status is what gets recorded.
pub async fn settle_confirmation(
    gateway: &dyn PaymentGateway,
    intent_id: &str,
) -> PaymentStatus {
    match gateway.confirm(intent_id).await {
        Ok(()) => PaymentStatus::Completed,
        Err(e) => {
            tracing::warn!("Payment confirmation failed for intent {}: {}", intent_id, e);
            PaymentStatus::Failed
        }
    }
}

/// Settle a refund; the returned status is what gets recorded.
pub async fn settle_refund(
    gateway: &dyn PaymentGateway,
    intent_id: &str,
    amount: Decimal,
) -> PaymentStatus {
    match gateway.refund(intent_id, amount).await {
        Ok(()) => PaymentStatus::Refunded,
        Err(e) => {
            tracing::warn!("Refund failed for intent {}: {}", intent_id, e);
            PaymentStatus::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[tokio::test]
    async fn successful_refund_settles_as_refunded() {
        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_refund()
            .withf(|intent, amount| intent == "intent-1" && *amount == Decimal::from(30))
            .once()
            .returning(|_, _| Ok(()));

        let status = settle_refund(&gateway, "intent-1", Decimal::from(30)).await;
        assert_eq!(status, PaymentStatus::Refunded);
    }

    #[tokio::test]
    async fn failed_refund_settles_as_failed() {
        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_refund()
            .once()
            .returning(|_, _| Err(AppError::Payment("card network unreachable".to_string())));

        let status = settle_refund(&gateway, "intent-1", Decimal::from(30)).await;
        assert_eq!(status, PaymentStatus::Failed);
    }

    #[tokio::test]
    async fn confirmation_outcomes_map_to_payment_status() {
        let mut gateway = MockPaymentGateway::new();
        gateway.expect_confirm().once().returning(|_| Ok(()));
        assert_eq!(
            settle_confirmation(&gateway, "intent-2").await,
            PaymentStatus::Completed
        );

        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_confirm()
            .once()
            .returning(|_| Err(AppError::Payment("declined".to_string())));
        assert_eq!(
            settle_confirmation(&gateway, "intent-2").await,
            PaymentStatus::Failed
        );
    }
}
