//! Notification sender collaborator seam, with an SMTP implementation.

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, Message},
    transport::smtp::authentication::Credentials,
    SmtpTransport, Transport,
};
use std::str::FromStr;
use uuid::Uuid;

use crate::{
    config::SmtpConfig,
    error::{AppError, AppResult},
    repository::Repository,
};

/// A booking event worth telling the user about
#[derive(Debug, Clone)]
pub struct Notification {
    pub user_id: Uuid,
    pub title: String,
    pub message: String,
    pub booking_id: Uuid,
}

#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send(&self, notification: &Notification) -> AppResult<()>;
}

/// Email sender resolving the user's address through the repository
#[derive(Clone)]
pub struct SmtpNotificationSender {
    config: SmtpConfig,
    repository: Repository,
}

impl SmtpNotificationSender {
    pub fn new(config: SmtpConfig, repository: Repository) -> Self {
        Self { config, repository }
    }

    fn build_mailer(&self) -> AppResult<SmtpTransport> {
        let builder = if self.config.use_tls {
            SmtpTransport::starttls_relay(&self.config.host)
                .map_err(|e| AppError::Internal(format!("Failed to create SMTP transport: {}", e)))?
        } else {
            SmtpTransport::builder_dangerous(&self.config.host)
        }
        .port(self.config.port);

        let builder = if let (Some(username), Some(password)) =
            (&self.config.username, &self.config.password)
        {
            builder.credentials(Credentials::new(username.clone(), password.clone()))
        } else {
            builder
        };

        Ok(builder.build())
    }
}

#[async_trait]
impl NotificationSender for SmtpNotificationSender {
    async fn send(&self, notification: &Notification) -> AppResult<()> {
        let user = self.repository.users.get_by_id(notification.user_id).await?;

        let from_name = self.config.from_name.as_deref().unwrap_or("Matchpoint");
        let from_mailbox = Mailbox::from_str(&format!("{} <{}>", from_name, self.config.from))
            .map_err(|e| AppError::Internal(format!("Invalid from address: {}", e)))?;
        let to_mailbox = Mailbox::from_str(&format!("{} <{}>", user.name, user.email))
            .map_err(|e| AppError::Internal(format!("Invalid to address: {}", e)))?;

        let body = format!(
            "{}\n\nBooking reference: {}\n",
            notification.message, notification.booking_id
        );

        let email = Message::builder()
            .from(from_mailbox)
            .to(to_mailbox)
            .subject(notification.title.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| AppError::Internal(format!("Failed to build email: {}", e)))?;

        self.build_mailer()?
            .send(&email)
            .map_err(|e| AppError::Internal(format!("Failed to send email: {}", e)))?;

        Ok(())
    }
}
