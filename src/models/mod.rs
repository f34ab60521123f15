//! Data models for Matchpoint

pub mod booking;
pub mod enums;
pub mod field;
pub mod membership;
pub mod organization;
pub mod user;

// Re-export commonly used types
pub use booking::{Booking, PriceQuote};
pub use enums::{BookingStatus, MembershipStatus, PaymentStatus};
pub use field::Field;
pub use membership::Membership;
pub use organization::Organization;
pub use user::User;
