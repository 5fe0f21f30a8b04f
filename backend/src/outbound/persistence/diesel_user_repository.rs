//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use diesel::dsl::count_star;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::PageRequest;

use crate::domain::ports::{UserFilter, UserPersistenceError, UserRepository};
use crate::domain::{DateRange, DisplayName, Email, Role, User, UserDraft, UserId};

use super::diesel_basic_error_mapping::{
    is_unique_violation, map_diesel_error, map_pool_error, to_count,
};
use super::models::{NewUserRow, UserRow, UserUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::users;
use super::text_search::contains_pattern;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> UserPersistenceError {
    map_pool_error(error, UserPersistenceError::connection)
}

fn diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    map_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

fn corrupt(column: &str, error: impl std::fmt::Display) -> UserPersistenceError {
    UserPersistenceError::query(format!("invalid {column} in users row: {error}"))
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    Ok(User::from(UserDraft {
        id: UserId::from_uuid(row.id),
        email: Email::new(&row.email).map_err(|err| corrupt("email", err))?,
        name: DisplayName::new(&row.name).map_err(|err| corrupt("name", err))?,
        role: Role::from_str(&row.role).map_err(|err| corrupt("role", err))?,
        password_hash: row.password_hash,
        email_verified: row.email_verified,
        last_login: row.last_login,
        created_at: row.created_at,
    }))
}

fn rows_to_users(rows: Vec<UserRow>) -> Result<Vec<User>, UserPersistenceError> {
    rows.into_iter().map(row_to_user).collect()
}

fn filtered(filter: &UserFilter) -> users::BoxedQuery<'static, Pg> {
    let mut query = users::table.into_boxed();
    if let Some(role) = filter.role {
        query = query.filter(users::role.eq(role.as_str()));
    }
    if let Some(search) = filter.search.as_deref() {
        let pattern = contains_pattern(search);
        query = query.filter(
            users::name
                .ilike(pattern.clone())
                .or(users::email.ilike(pattern)),
        );
    }
    query
}

/// Narrow any boxed `users` query to accounts created inside `range`.
///
/// Grouped counts box after `GROUP BY`, so the same narrowing serves the
/// plain and grouped statement types.
macro_rules! created_within {
    ($query:expr, $range:expr) => {{
        let range: &DateRange = $range;
        let mut query = $query;
        if let Some(start) = range.start {
            query = query.filter(users::created_at.ge(start));
        }
        if let Some(end) = range.end {
            query = query.filter(users::created_at.le(end));
        }
        query
    }};
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = NewUserRow {
            id: *user.id().as_uuid(),
            email: user.email().as_ref(),
            password_hash: user.password_hash(),
            name: user.name().as_ref(),
            role: user.role().as_str(),
            email_verified: user.email_verified(),
            last_login: user.last_login(),
            created_at: user.created_at(),
            updated_at: user.created_at(),
        };

        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|error| {
                if is_unique_violation(&error) {
                    UserPersistenceError::duplicate_email(user.email().as_ref())
                } else {
                    diesel_error(error)
                }
            })
    }

    async fn update(&self, user: &User) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let changes = UserUpdate {
            password_hash: user.password_hash(),
            name: user.name().as_ref(),
            role: user.role().as_str(),
            email_verified: user.email_verified(),
            last_login: user.last_login(),
            updated_at: Utc::now(),
        };

        let updated = diesel::update(users::table.find(user.id().as_uuid()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(updated > 0)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        users::table
            .find(id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?
            .map(row_to_user)
            .transpose()
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?
            .map(row_to_user)
            .transpose()
    }

    async fn list(
        &self,
        filter: &UserFilter,
        page: PageRequest,
    ) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let offset = i64::try_from(page.offset()).unwrap_or(i64::MAX);
        let rows = filtered(filter)
            .order((users::created_at.desc(), users::id.asc()))
            .offset(offset)
            .limit(i64::from(page.limit()))
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows_to_users(rows)
    }

    async fn count(&self, filter: &UserFilter) -> Result<u64, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        filtered(filter)
            .count()
            .get_result::<i64>(&mut conn)
            .await
            .map(to_count)
            .map_err(diesel_error)
    }

    async fn count_created(&self, range: &DateRange) -> Result<u64, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        created_within!(users::table.into_boxed::<Pg>(), range)
            .count()
            .get_result::<i64>(&mut conn)
            .await
            .map(to_count)
            .map_err(diesel_error)
    }

    async fn count_by_role(
        &self,
        range: &DateRange,
    ) -> Result<Vec<(Role, u64)>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let grouped = users::table
            .group_by(users::role)
            .select((users::role, count_star()))
            .into_boxed::<Pg>();
        let rows: Vec<(String, i64)> = created_within!(grouped, range)
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter()
            .map(|(role, count)| {
                Role::from_str(&role)
                    .map(|role| (role, to_count(count)))
                    .map_err(|err| corrupt("role", err))
            })
            .collect()
    }

    async fn recent(&self, limit: u32) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows = users::table
            .order((users::created_at.desc(), users::id.asc()))
            .limit(i64::from(limit))
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows_to_users(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::epoch;
    use rstest::rstest;
    use uuid::Uuid;

    fn row(role: &str, email: &str) -> UserRow {
        UserRow {
            id: Uuid::new_v4(),
            email: email.to_owned(),
            password_hash: "$argon2id$stub".to_owned(),
            name: "Chidi Okeke".to_owned(),
            role: role.to_owned(),
            email_verified: true,
            last_login: None,
            created_at: epoch(),
        }
    }

    #[rstest]
    fn valid_row_converts() {
        let user = row_to_user(row("AGENT", "chidi@example.com")).expect("valid row");
        assert_eq!(user.role(), Role::Agent);
        assert_eq!(user.email().as_ref(), "chidi@example.com");
        assert!(user.email_verified());
    }

    #[rstest]
    #[case(row("LANDLORD", "chidi@example.com"), "role")]
    #[case(row("BUYER", "not-an-email"), "email")]
    fn corrupt_rows_are_query_errors(#[case] row: UserRow, #[case] column: &str) {
        let error = row_to_user(row).expect_err("corrupt row");
        assert!(matches!(
            &error,
            UserPersistenceError::Query { message } if message.contains(column)
        ));
    }
}
