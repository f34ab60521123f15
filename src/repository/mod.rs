//! Repository layer for database operations

pub mod bookings;
pub mod fields;
pub mod memberships;
pub mod organizations;
pub mod users;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub organizations: organizations::OrganizationsRepository,
    pub users: users::UsersRepository,
    pub fields: fields::FieldsRepository,
    pub memberships: memberships::MembershipsRepository,
    pub bookings: bookings::BookingsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            organizations: organizations::OrganizationsRepository::new(pool.clone()),
            users: users::UsersRepository::new(pool.clone()),
            fields: fields::FieldsRepository::new(pool.clone()),
            memberships: memberships::MembershipsRepository::new(pool.clone()),
            bookings: bookings::BookingsRepository::new(pool.clone()),
            pool,
        }
    }
}
