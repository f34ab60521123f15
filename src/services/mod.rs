//! Business logic services

pub mod availability;
pub mod bookings;
pub mod fields;
pub mod notifications;
pub mod payments;

use std::sync::Arc;

use crate::{config::SmtpConfig, repository::Repository};

use notifications::SmtpNotificationSender;
use payments::LogPaymentGateway;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub fields: fields::FieldsService,
    pub availability: availability::AvailabilityService,
    pub bookings: bookings::BookingsService,
}

impl Services {
    /// Create all services with the given repository and the default
    /// collaborators (logging gateway, SMTP notifications)
    pub fn new(repository: Repository, smtp_config: SmtpConfig) -> Self {
        let payments = Arc::new(LogPaymentGateway);
        let notifications = Arc::new(SmtpNotificationSender::new(
            smtp_config,
            repository.clone(),
        ));

        Self {
            fields: fields::FieldsService::new(repository.clone()),
            availability: availability::AvailabilityService::new(repository.clone()),
            bookings: bookings::BookingsService::new(repository, payments, notifications),
        }
    }
}
