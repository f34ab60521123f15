//! Membership model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::enums::MembershipStatus;

/// Membership model from database. Pricing input only; the engine never
/// mutates it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Membership {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub user_id: Uuid,
    pub discount_percent: Decimal,
    pub status: MembershipStatus,
    pub valid_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Membership {
    /// A membership discounts a booking only while ACTIVE and unexpired
    pub fn applies_at(&self, now: DateTime<Utc>) -> bool {
        self.status == MembershipStatus::Active
            && self.valid_until.map_or(true, |until| until > now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn membership(status: MembershipStatus, valid_until: Option<DateTime<Utc>>) -> Membership {
        let now = Utc::now();
        Membership {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            discount_percent: Decimal::from(15),
            status,
            valid_until,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn active_without_expiry_applies() {
        let m = membership(MembershipStatus::Active, None);
        assert!(m.applies_at(Utc::now()));
    }

    #[test]
    fn expired_membership_does_not_apply() {
        let now = Utc::now();
        let m = membership(MembershipStatus::Active, Some(now - Duration::days(1)));
        assert!(!m.applies_at(now));
    }

    #[test]
    fn suspended_membership_does_not_apply() {
        let m = membership(MembershipStatus::Suspended, None);
        assert!(!m.applies_at(Utc::now()));
    }
}
