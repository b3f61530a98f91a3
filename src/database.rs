use crate::models::{
    Customer, FindCustomerError, FindCustomerRequest, FindCustomersError, FindReservationError,
    FindReservationRequest, FindReservationsError, GuestCount, PhoneNumber, Reservation,
    SaveCustomerError, SaveReservationError, StartAt,
};
use crate::repositories::{CustomerRepository, ReservationRepository};
use anyhow::{Context, anyhow};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow};
use sqlx::{FromRow, Row, SqlitePool};
use std::str::FromStr;

static MIGRATOR: Migrator = sqlx::migrate!();

/// Opens the single long-lived connection the application shares, creating
/// the database if needed and applying pending migrations.
pub async fn establish_pool(url: &str) -> anyhow::Result<SqlitePool> {
    let opts = SqliteConnectOptions::from_str(url)
        .with_context(|| format!("Invalid database url {url}"))?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(opts)
        .await
        .with_context(|| format!("Failed to open database at {url}"))?;

    MIGRATOR
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    Ok(pool)
}

impl<'r> FromRow<'r, SqliteRow> for Customer {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id = row.try_get("id")?;
        let first_name = row.try_get("first_name")?;
        let last_name = row.try_get("last_name")?;
        let phone: &str = row.try_get("phone")?;
        let notes = row.try_get("notes")?;

        let phone = PhoneNumber::new_unchecked(phone);
        Ok(Self::from_parts(id, first_name, last_name, phone, notes))
    }
}

impl<'r> FromRow<'r, SqliteRow> for Reservation {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id = row.try_get("id")?;
        let customer_id = row.try_get("customer_id")?;
        let num_guests = row.try_get("num_guests")?;
        let start_at: NaiveDateTime = row.try_get("start_at")?;
        let notes = row.try_get("notes")?;

        let num_guests = GuestCount::new_unchecked(num_guests);
        Ok(Self::from_parts(
            id,
            customer_id,
            num_guests,
            StartAt::from(start_at),
            notes,
        ))
    }
}

#[derive(Debug, Clone)]
pub struct DefaultCustomerRepository {
    pool: SqlitePool,
}

impl DefaultCustomerRepository {
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CustomerRepository for DefaultCustomerRepository {
    async fn find_all_customers(&self) -> Result<Vec<Customer>, FindCustomersError> {
        let customers = sqlx::query_as(
            "SELECT id, first_name, last_name, phone, notes
             FROM customers
             ORDER BY last_name, first_name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|err| {
            let err = anyhow!(err).context("Failed to retrieve all customers");
            FindCustomersError(err)
        })?;

        Ok(customers)
    }

    async fn find_customer(&self, req: &FindCustomerRequest) -> Result<Customer, FindCustomerError> {
        let customer = sqlx::query_as(
            "SELECT id, first_name, last_name, phone, notes
             FROM customers
             WHERE id = ?",
        )
        .bind(req.id())
        .fetch_one(&self.pool)
        .await
        .map_err(|err| {
            if matches!(err, sqlx::Error::RowNotFound) {
                FindCustomerError::NotFound { id: req.id() }
            } else {
                let err = anyhow!(err).context(format!(
                    r#"Failed to retrieve customer with id "{}""#,
                    req.id()
                ));
                FindCustomerError::Other(err)
            }
        })?;

        Ok(customer)
    }

    async fn search_customers(&self, fragment: &str) -> Result<Vec<Customer>, FindCustomersError> {
        let pattern = format!("%{}%", escape_like(&fold_case(fragment)));
        let customers = sqlx::query_as(
            r"SELECT id, first_name, last_name, phone, notes
              FROM customers
              WHERE first_name_folded LIKE ? ESCAPE '\'
                 OR last_name_folded LIKE ? ESCAPE '\'
              ORDER BY last_name, first_name",
        )
        .bind(pattern.as_str())
        .bind(pattern.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|err| {
            let err = anyhow!(err).context(format!(
                r#"Failed to search customers matching "{fragment}""#
            ));
            FindCustomersError(err)
        })?;

        Ok(customers)
    }

    async fn find_top_customers(&self) -> Result<Vec<Customer>, FindCustomersError> {
        let customers = sqlx::query_as(
            "SELECT c.id         AS id,
                    c.first_name AS first_name,
                    c.last_name  AS last_name,
                    c.phone      AS phone,
                    c.notes      AS notes
             FROM customers AS c
             JOIN reservations AS r ON c.id = r.customer_id
             GROUP BY c.id
             ORDER BY count(r.id) DESC, c.first_name
             LIMIT 10",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|err| {
            let err = anyhow!(err).context("Failed to retrieve top customers");
            FindCustomersError(err)
        })?;

        Ok(customers)
    }

    async fn save_customer(&self, customer: &mut Customer) -> Result<i64, SaveCustomerError> {
        customer.validate()?;

        let Some(id) = customer.id() else {
            let id: i64 = sqlx::query_scalar(
                "INSERT INTO customers
                     (first_name, last_name, phone, notes, first_name_folded, last_name_folded)
                 VALUES (?, ?, ?, ?, ?, ?)
                 RETURNING id",
            )
            .bind(customer.first_name())
            .bind(customer.last_name())
            .bind(customer.phone().as_str())
            .bind(customer.notes())
            .bind(fold_case(customer.first_name()))
            .bind(fold_case(customer.last_name()))
            .fetch_one(&self.pool)
            .await
            .map_err(|err| {
                let err = anyhow!(err).context(format!(
                    r#"Failed to create customer "{}""#,
                    customer.full_name()
                ));
                SaveCustomerError::Other(err)
            })?;

            tracing::debug!(id, "created customer");
            customer.set_id(id);
            return Ok(id);
        };

        let result = sqlx::query(
            "UPDATE customers
             SET first_name = ?,
                 last_name = ?,
                 phone = ?,
                 notes = ?,
                 first_name_folded = ?,
                 last_name_folded = ?
             WHERE id = ?",
        )
        .bind(customer.first_name())
        .bind(customer.last_name())
        .bind(customer.phone().as_str())
        .bind(customer.notes())
        .bind(fold_case(customer.first_name()))
        .bind(fold_case(customer.last_name()))
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|err| {
            let err = anyhow!(err).context(format!(r#"Failed to update customer with id "{id}""#));
            SaveCustomerError::Other(err)
        })?;

        if result.rows_affected() == 0 {
            return Err(SaveCustomerError::NotFound { id });
        }

        tracing::debug!(id, "updated customer");
        Ok(id)
    }
}

#[derive(Debug, Clone)]
pub struct DefaultReservationRepository {
    pool: SqlitePool,
}

impl DefaultReservationRepository {
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReservationRepository for DefaultReservationRepository {
    async fn find_reservations_for_customer(
        &self,
        customer_id: i64,
    ) -> Result<Vec<Reservation>, FindReservationsError> {
        let reservations = sqlx::query_as(
            "SELECT id, customer_id, num_guests, start_at, notes
             FROM reservations
             WHERE customer_id = ?",
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|err| {
            let err = anyhow!(err).context(format!(
                r#"Failed to retrieve reservations for customer with id "{customer_id}""#
            ));
            FindReservationsError(err)
        })?;

        Ok(reservations)
    }

    async fn find_reservation(
        &self,
        req: &FindReservationRequest,
    ) -> Result<Reservation, FindReservationError> {
        let reservation = sqlx::query_as(
            "SELECT id, customer_id, num_guests, start_at, notes
             FROM reservations
             WHERE id = ?",
        )
        .bind(req.id())
        .fetch_one(&self.pool)
        .await
        .map_err(|err| {
            if matches!(err, sqlx::Error::RowNotFound) {
                FindReservationError::NotFound { id: req.id() }
            } else {
                let err = anyhow!(err).context(format!(
                    r#"Failed to retrieve reservation with id "{}""#,
                    req.id()
                ));
                FindReservationError::Other(err)
            }
        })?;

        Ok(reservation)
    }

    async fn save_reservation(
        &self,
        reservation: &mut Reservation,
    ) -> Result<i64, SaveReservationError> {
        reservation.validate()?;

        let Some(id) = reservation.id() else {
            let customer_id = reservation.customer_id();
            let id: i64 = sqlx::query_scalar(
                "INSERT INTO reservations (customer_id, start_at, num_guests, notes)
                 VALUES (?, ?, ?, ?)
                 RETURNING id",
            )
            .bind(customer_id)
            .bind(reservation.start_at().as_naive())
            .bind(reservation.num_guests().get())
            .bind(reservation.notes())
            .fetch_one(&self.pool)
            .await
            .map_err(|err| {
                if is_foreign_key_violation(&err) {
                    SaveReservationError::CustomerNotFound { customer_id }
                } else {
                    let err = anyhow!(err).context(format!(
                        r#"Failed to create reservation for customer with id "{customer_id}""#
                    ));
                    SaveReservationError::Other(err)
                }
            })?;

            tracing::debug!(id, customer_id, "created reservation");
            reservation.set_id(id);
            return Ok(id);
        };

        let result = sqlx::query(
            "UPDATE reservations
             SET start_at = ?,
                 num_guests = ?,
                 notes = ?
             WHERE id = ?",
        )
        .bind(reservation.start_at().as_naive())
        .bind(reservation.num_guests().get())
        .bind(reservation.notes())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|err| {
            let err =
                anyhow!(err).context(format!(r#"Failed to update reservation with id "{id}""#));
            SaveReservationError::Other(err)
        })?;

        if result.rows_affected() == 0 {
            return Err(SaveReservationError::NotFound { id });
        }

        tracing::debug!(id, "updated reservation");
        Ok(id)
    }
}

/// SQLite only folds ASCII in `LIKE`, so names are also stored lowercased and
/// searched through these columns.
fn fold_case(value: &str) -> String {
    value.to_lowercase()
}

/// Escapes `LIKE` wildcards so the fragment matches literally.
fn escape_like(fragment: &str) -> String {
    let mut escaped = String::with_capacity(fragment.len());
    for ch in fragment.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        return db_err.is_foreign_key_violation();
    }

    false
}
