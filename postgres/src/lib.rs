//! `PostgreSQL` offering store for the student portal.
//!
//! Implements [`OfferingStore`] on a `sqlx` connection pool. The single
//! write, [`OfferingStore::commit_registration`], runs in one transaction:
//!
//! 1. `SELECT ... FOR UPDATE` on the offering row
//! 2. admission checks re-run on the locked row
//! 3. `INSERT` of the registration (unique on offering + normalized email)
//! 4. conditional `UPDATE` bumping the counter and recomputing `status`,
//!    guarded by `current_participants < max_participants`
//!
//! Dropping the transaction on any early return rolls everything back.
//!
//! # Example
//!
//! ```ignore
//! use student_portal_postgres::PostgresOfferingStore;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = PostgresOfferingStore::connect("postgres://localhost/portal").await?;
//!     store.migrate().await?;
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;

use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use std::time::Instant;
use student_portal_core::{
    IdentityKey, Offering, OfferingFilter, OfferingId, OfferingKind, OfferingStore, Registrant,
    Registration, RegistrationEntry, RegistrationError, RegistrationId, Result, StoreFuture,
};
use uuid::Uuid;

pub use error::map_sqlx_error;

const OFFERING_COLUMNS: &str = "id, kind, title, description, category, max_participants, \
     current_participants, start_date, end_date, registration_deadline, status, \
     created_at, updated_at";

const REGISTRATION_COLUMNS: &str =
    "id, offering_id, name, email, phone, class_name, motivation, status, registered_at";

/// `PostgreSQL`-backed [`OfferingStore`].
#[derive(Clone, Debug)]
pub struct PostgresOfferingStore {
    pool: PgPool,
}

impl PostgresOfferingStore {
    /// Connect with default pool settings.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::TransientStoreError`] if the database is
    /// unreachable.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::from_pool(pool))
    }

    /// Wrap an existing pool.
    #[must_use]
    pub const fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run database migrations.
    ///
    /// # Errors
    ///
    /// Returns error if migrations fail.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| RegistrationError::ConstraintViolation(format!("Migration failed: {e}")))?;
        Ok(())
    }

    async fn commit(&self, registration: Registration, now: DateTime<Utc>) -> Result<Offering> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let locked = sqlx::query(&format!(
            "SELECT {OFFERING_COLUMNS} FROM offerings WHERE id = $1 FOR UPDATE"
        ))
        .bind(registration.offering_id.as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_sqlx_error)?
        .ok_or(RegistrationError::NotFound)?;

        row_to_offering(&locked)?.check_admission(now)?;

        sqlx::query(
            r"
            INSERT INTO registrations
                (id, offering_id, name, email, phone, class_name, identity_key,
                 motivation, status, registered_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ",
        )
        .bind(registration.id.as_uuid())
        .bind(registration.offering_id.as_uuid())
        .bind(&registration.registrant.name)
        .bind(&registration.registrant.email)
        .bind(&registration.registrant.phone)
        .bind(&registration.registrant.class_name)
        .bind(registration.identity_key().as_str())
        .bind(registration.motivation.as_deref())
        .bind(registration.status.as_str())
        .bind(registration.registered_at)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        let updated = sqlx::query(&format!(
            r"
            UPDATE offerings
            SET current_participants = current_participants + 1,
                status = CASE
                    WHEN max_participants IS NOT NULL
                         AND current_participants + 1 >= max_participants THEN 'full'
                    ELSE 'available'
                END,
                updated_at = $2
            WHERE id = $1
              AND status IN ('available', 'full')
              AND (max_participants IS NULL OR current_participants < max_participants)
            RETURNING {OFFERING_COLUMNS}
            "
        ))
        .bind(registration.offering_id.as_uuid())
        .bind(now)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        // Zero rows: the guard refused, so nothing may be kept.
        let Some(updated) = updated else {
            return Err(RegistrationError::CapacityExceeded);
        };
        let committed = row_to_offering(&updated)?;

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(committed)
    }
}

impl OfferingStore for PostgresOfferingStore {
    fn fetch_offering(&self, id: OfferingId) -> StoreFuture<'_, Option<Offering>> {
        Box::pin(async move {
            let row = sqlx::query(&format!(
                "SELECT {OFFERING_COLUMNS} FROM offerings WHERE id = $1"
            ))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

            row.as_ref().map(row_to_offering).transpose()
        })
    }

    fn find_registration(
        &self,
        offering_id: OfferingId,
        identity: IdentityKey,
    ) -> StoreFuture<'_, Option<Registration>> {
        Box::pin(async move {
            let row = sqlx::query(&format!(
                "SELECT {REGISTRATION_COLUMNS} FROM registrations \
                 WHERE offering_id = $1 AND identity_key = $2"
            ))
            .bind(offering_id.as_uuid())
            .bind(identity.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

            row.as_ref().map(row_to_registration).transpose()
        })
    }

    fn list_offerings(&self, filter: OfferingFilter) -> StoreFuture<'_, Vec<Offering>> {
        Box::pin(async move {
            let rows = sqlx::query(&format!(
                r"
                SELECT {OFFERING_COLUMNS}
                FROM offerings
                WHERE ($1::text IS NULL OR kind = $1)
                  AND ($2::text IS NULL OR category = $2)
                  AND ($3 OR status <> 'inactive')
                ORDER BY start_date ASC NULLS FIRST, title ASC
                "
            ))
            .bind(filter.kind.map(|kind| kind.as_str()))
            .bind(filter.category.as_deref())
            .bind(filter.include_inactive)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

            rows.iter().map(row_to_offering).collect()
        })
    }

    fn list_registrations(&self, offering_id: OfferingId) -> StoreFuture<'_, Vec<Registration>> {
        Box::pin(async move {
            let rows = sqlx::query(&format!(
                "SELECT {REGISTRATION_COLUMNS} FROM registrations \
                 WHERE offering_id = $1 ORDER BY registered_at DESC"
            ))
            .bind(offering_id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

            rows.iter().map(row_to_registration).collect()
        })
    }

    fn list_all_registrations(
        &self,
        kind: Option<OfferingKind>,
    ) -> StoreFuture<'_, Vec<RegistrationEntry>> {
        Box::pin(async move {
            let rows = sqlx::query(
                r"
                SELECT r.id, r.offering_id, r.name, r.email, r.phone, r.class_name,
                       r.motivation, r.status, r.registered_at,
                       o.title AS offering_title, o.kind AS offering_kind
                FROM registrations r
                JOIN offerings o ON o.id = r.offering_id
                WHERE ($1::text IS NULL OR o.kind = $1)
                ORDER BY r.registered_at DESC
                ",
            )
            .bind(kind.map(|kind| kind.as_str()))
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

            rows.iter().map(row_to_entry).collect()
        })
    }

    fn commit_registration(
        &self,
        registration: Registration,
        now: DateTime<Utc>,
    ) -> StoreFuture<'_, Offering> {
        Box::pin(async move {
            let started = Instant::now();
            let offering_id = registration.offering_id;
            let registration_id = registration.id;

            let result = self.commit(registration, now).await;

            let outcome = match &result {
                Ok(_) => "committed",
                Err(err) => err.kind(),
            };
            metrics::counter!("offering_store_commits_total", "outcome" => outcome).increment(1);
            metrics::histogram!("offering_store_commit_duration_seconds")
                .record(started.elapsed().as_secs_f64());

            match &result {
                Ok(offering) => tracing::debug!(
                    %offering_id,
                    %registration_id,
                    current_participants = offering.current_participants,
                    "Registration transaction committed"
                ),
                Err(err) if err.is_retryable() => tracing::warn!(
                    %offering_id,
                    %registration_id,
                    error = %err,
                    "Registration transaction failed"
                ),
                Err(_) => {}
            }

            result
        })
    }

    fn ping(&self) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            sqlx::query("SELECT 1")
                .execute(&self.pool)
                .await
                .map_err(map_sqlx_error)?;
            Ok(())
        })
    }
}

fn get<'r, T>(row: &'r PgRow, column: &str) -> Result<T>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(column)
        .map_err(|e| error::invalid_column(column, e))
}

fn get_count(row: &PgRow, column: &str) -> Result<u32> {
    let value: i32 = get(row, column)?;
    u32::try_from(value).map_err(|e| error::invalid_column(column, e))
}

fn row_to_offering(row: &PgRow) -> Result<Offering> {
    let kind: String = get(row, "kind")?;
    let status: String = get(row, "status")?;
    let max_participants: Option<i32> = get(row, "max_participants")?;

    Ok(Offering {
        id: OfferingId::from_uuid(get::<Uuid>(row, "id")?),
        kind: kind.parse()?,
        title: get(row, "title")?,
        description: get(row, "description")?,
        category: get(row, "category")?,
        max_participants: max_participants
            .map(u32::try_from)
            .transpose()
            .map_err(|e| error::invalid_column("max_participants", e))?,
        current_participants: get_count(row, "current_participants")?,
        start_date: get(row, "start_date")?,
        end_date: get(row, "end_date")?,
        registration_deadline: get(row, "registration_deadline")?,
        status: status.parse()?,
        created_at: get(row, "created_at")?,
        updated_at: get(row, "updated_at")?,
    })
}

fn row_to_registration(row: &PgRow) -> Result<Registration> {
    let status: String = get(row, "status")?;

    Ok(Registration {
        id: RegistrationId::from_uuid(get::<Uuid>(row, "id")?),
        offering_id: OfferingId::from_uuid(get::<Uuid>(row, "offering_id")?),
        registrant: Registrant {
            name: get(row, "name")?,
            email: get(row, "email")?,
            phone: get(row, "phone")?,
            class_name: get(row, "class_name")?,
        },
        motivation: get(row, "motivation")?,
        status: status.parse()?,
        registered_at: get(row, "registered_at")?,
    })
}

fn row_to_entry(row: &PgRow) -> Result<RegistrationEntry> {
    let kind: String = get(row, "offering_kind")?;

    Ok(RegistrationEntry {
        registration: row_to_registration(row)?,
        offering_title: get(row, "offering_title")?,
        offering_kind: kind.parse()?,
    })
}
