use async_trait::async_trait;
use autodeputy_application::DeputyDirectoryRepository;
use autodeputy_core::{AppError, AppResult};
use autodeputy_domain::{
    DeputyEntry, DeputyEntryId, DeputyRoster, DeputyScope, MoveDirection, PersonId, ProjectId,
    RankUpdate,
};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

/// PostgreSQL-backed deputy directory.
///
/// Every mutation takes a transaction-scoped advisory lock on the principal
/// and locks the principal's rows before applying rank changes, so concurrent
/// edits of one deputy list are serialized.
#[derive(Clone)]
pub struct PostgresDeputyDirectoryRepository {
    pool: PgPool,
}

impl PostgresDeputyDirectoryRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn begin(&self) -> AppResult<Transaction<'_, Postgres>> {
        self.pool
            .begin()
            .await
            .map_err(|error| AppError::Internal(format!("failed to begin transaction: {error}")))
    }
}

#[derive(Debug, FromRow)]
struct DeputyEntryRow {
    id: Uuid,
    deputy_id: Uuid,
    project_id: Option<Uuid>,
    rank: i32,
}

impl DeputyEntryRow {
    fn into_entry(self, principal_id: PersonId) -> AppResult<DeputyEntry> {
        let rank = u32::try_from(self.rank).map_err(|error| {
            AppError::Internal(format!(
                "invalid rank {} stored for deputy entry '{}': {error}",
                self.rank, self.id
            ))
        })?;

        Ok(DeputyEntry::new(
            DeputyEntryId::from_uuid(self.id),
            principal_id,
            PersonId::from_uuid(self.deputy_id),
            DeputyScope::from_project(self.project_id.map(ProjectId::from_uuid)),
            rank,
        ))
    }
}

fn roster_from_rows(principal_id: PersonId, rows: Vec<DeputyEntryRow>) -> AppResult<DeputyRoster> {
    let entries = rows
        .into_iter()
        .map(|row| row.into_entry(principal_id))
        .collect::<AppResult<Vec<_>>>()?;

    DeputyRoster::new(principal_id, entries).map_err(|error| {
        AppError::Internal(format!(
            "stored deputy list of '{principal_id}' is inconsistent: {error}"
        ))
    })
}

fn rank_value(rank: u32) -> AppResult<i32> {
    i32::try_from(rank)
        .map_err(|error| AppError::Internal(format!("deputy rank {rank} out of range: {error}")))
}

async fn lock_roster(
    transaction: &mut Transaction<'_, Postgres>,
    principal_id: PersonId,
) -> AppResult<DeputyRoster> {
    sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
        .bind(principal_id.to_string())
        .execute(&mut **transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to lock deputy list of '{principal_id}': {error}"
            ))
        })?;

    let rows = sqlx::query_as::<_, DeputyEntryRow>(
        r#"
        SELECT id, deputy_id, project_id, rank
        FROM deputy_entries
        WHERE principal_id = $1
        ORDER BY project_id NULLS FIRST, rank
        FOR UPDATE
        "#,
    )
    .bind(principal_id.as_uuid())
    .fetch_all(&mut **transaction)
    .await
    .map_err(|error| AppError::Internal(format!("failed to load deputy entries: {error}")))?;

    roster_from_rows(principal_id, rows)
}

async fn apply_rank_updates(
    transaction: &mut Transaction<'_, Postgres>,
    updates: &[RankUpdate],
) -> AppResult<()> {
    for update in updates {
        sqlx::query(
            r#"
            UPDATE deputy_entries
            SET rank = $2
            WHERE id = $1
            "#,
        )
        .bind(update.entry_id.as_uuid())
        .bind(rank_value(update.rank)?)
        .execute(&mut **transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to update rank of deputy entry '{}': {error}",
                update.entry_id
            ))
        })?;
    }

    Ok(())
}

async fn commit(transaction: Transaction<'_, Postgres>) -> AppResult<()> {
    transaction
        .commit()
        .await
        .map_err(|error| AppError::Internal(format!("failed to commit transaction: {error}")))
}

fn map_entry_conflict(error: sqlx::Error, entry: &DeputyEntry) -> AppError {
    if let sqlx::Error::Database(database_error) = &error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict(format!(
            "'{}' is already a deputy of '{}' in scope {:?}",
            entry.deputy_id(),
            entry.principal_id(),
            entry.scope()
        ));
    }

    AppError::Internal(format!("failed to create deputy entry: {error}"))
}

#[async_trait]
impl DeputyDirectoryRepository for PostgresDeputyDirectoryRepository {
    async fn load_roster(&self, principal_id: PersonId) -> AppResult<DeputyRoster> {
        let rows = sqlx::query_as::<_, DeputyEntryRow>(
            r#"
            SELECT id, deputy_id, project_id, rank
            FROM deputy_entries
            WHERE principal_id = $1
            ORDER BY project_id NULLS FIRST, rank
            "#,
        )
        .bind(principal_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load deputy entries: {error}")))?;

        roster_from_rows(principal_id, rows)
    }

    async fn append_entry(
        &self,
        principal_id: PersonId,
        deputy_id: PersonId,
        scope: DeputyScope,
    ) -> AppResult<DeputyEntry> {
        let mut transaction = self.begin().await?;
        let mut roster = lock_roster(&mut transaction, principal_id).await?;
        let entry = roster.append(deputy_id, scope)?;

        sqlx::query(
            r#"
            INSERT INTO deputy_entries (id, principal_id, deputy_id, project_id, rank)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(entry.id().as_uuid())
        .bind(principal_id.as_uuid())
        .bind(deputy_id.as_uuid())
        .bind(scope.project_id().map(|project_id| project_id.as_uuid()))
        .bind(rank_value(entry.rank())?)
        .execute(&mut *transaction)
        .await
        .map_err(|error| map_entry_conflict(error, &entry))?;

        commit(transaction).await?;
        Ok(entry)
    }

    async fn reorder_entry(
        &self,
        principal_id: PersonId,
        entry_id: DeputyEntryId,
        direction: MoveDirection,
    ) -> AppResult<()> {
        let mut transaction = self.begin().await?;
        let mut roster = lock_roster(&mut transaction, principal_id).await?;
        let updates = roster.reorder(entry_id, direction)?;

        apply_rank_updates(&mut transaction, &updates).await?;
        commit(transaction).await
    }

    async fn remove_entry(
        &self,
        principal_id: PersonId,
        entry_id: DeputyEntryId,
    ) -> AppResult<DeputyEntry> {
        let mut transaction = self.begin().await?;
        let mut roster = lock_roster(&mut transaction, principal_id).await?;
        let removal = roster.remove(entry_id)?;

        sqlx::query(
            r#"
            DELETE FROM deputy_entries
            WHERE id = $1
            "#,
        )
        .bind(entry_id.as_uuid())
        .execute(&mut *transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to delete deputy entry '{entry_id}': {error}"))
        })?;

        apply_rank_updates(&mut transaction, &removal.rank_updates).await?;
        commit(transaction).await?;

        Ok(removal.removed)
    }
}
