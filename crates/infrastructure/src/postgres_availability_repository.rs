use async_trait::async_trait;
use autodeputy_application::AvailabilityRepository;
use autodeputy_core::{AppError, AppResult};
use autodeputy_domain::{PersonId, UnavailabilityWindow};
use chrono::NaiveDate;
use sqlx::{FromRow, PgPool};

/// PostgreSQL-backed store of unavailability windows.
#[derive(Clone)]
pub struct PostgresAvailabilityRepository {
    pool: PgPool,
}

impl PostgresAvailabilityRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct WindowRow {
    unavailable_from: NaiveDate,
    unavailable_to: NaiveDate,
}

#[async_trait]
impl AvailabilityRepository for PostgresAvailabilityRepository {
    async fn list_windows(&self, person_id: PersonId) -> AppResult<Vec<UnavailabilityWindow>> {
        let rows = sqlx::query_as::<_, WindowRow>(
            r#"
            SELECT unavailable_from, unavailable_to
            FROM unavailability_windows
            WHERE person_id = $1
            ORDER BY unavailable_from, unavailable_to
            "#,
        )
        .bind(person_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to load unavailability windows: {error}"))
        })?;

        rows.into_iter()
            .map(|row| {
                UnavailabilityWindow::new(row.unavailable_from, row.unavailable_to).map_err(
                    |error| {
                        AppError::Internal(format!(
                            "invalid unavailability window stored for '{person_id}': {error}"
                        ))
                    },
                )
            })
            .collect()
    }

    async fn replace_windows(
        &self,
        person_id: PersonId,
        windows: Vec<UnavailabilityWindow>,
    ) -> AppResult<()> {
        let mut transaction =
            self.pool.begin().await.map_err(|error| {
                AppError::Internal(format!("failed to begin transaction: {error}"))
            })?;

        sqlx::query(
            r#"
            DELETE FROM unavailability_windows
            WHERE person_id = $1
            "#,
        )
        .bind(person_id.as_uuid())
        .execute(&mut *transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to clear unavailability windows: {error}"))
        })?;

        for window in &windows {
            sqlx::query(
                r#"
                INSERT INTO unavailability_windows (person_id, unavailable_from, unavailable_to)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(person_id.as_uuid())
            .bind(window.from())
            .bind(window.to())
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to store unavailability window: {error}"))
            })?;
        }

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        Ok(())
    }
}
