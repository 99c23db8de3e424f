use async_trait::async_trait;
use autodeputy_application::DeputyPermissionRepository;
use autodeputy_core::{AppError, AppResult};
use autodeputy_domain::{PersonId, ProjectId};
use sqlx::PgPool;

/// PostgreSQL-backed store of per-person deputy permission grants.
#[derive(Clone)]
pub struct PostgresDeputyPermissionRepository {
    pool: PgPool,
}

impl PostgresDeputyPermissionRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DeputyPermissionRepository for PostgresDeputyPermissionRepository {
    async fn list_permitted_projects(&self, person_id: PersonId) -> AppResult<Vec<ProjectId>> {
        let project_ids = sqlx::query_scalar::<_, uuid::Uuid>(
            r#"
            SELECT project_id
            FROM deputy_permissions
            WHERE person_id = $1
            ORDER BY created_at, project_id
            "#,
        )
        .bind(person_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to load deputy permissions: {error}"))
        })?;

        Ok(project_ids.into_iter().map(ProjectId::from_uuid).collect())
    }

    async fn replace_permitted_projects(
        &self,
        person_id: PersonId,
        project_ids: Vec<ProjectId>,
    ) -> AppResult<()> {
        let mut transaction =
            self.pool.begin().await.map_err(|error| {
                AppError::Internal(format!("failed to begin transaction: {error}"))
            })?;

        sqlx::query(
            r#"
            DELETE FROM deputy_permissions
            WHERE person_id = $1
            "#,
        )
        .bind(person_id.as_uuid())
        .execute(&mut *transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to clear deputy permissions: {error}"))
        })?;

        for project_id in project_ids {
            sqlx::query(
                r#"
                INSERT INTO deputy_permissions (person_id, project_id)
                VALUES ($1, $2)
                ON CONFLICT (person_id, project_id) DO NOTHING
                "#,
            )
            .bind(person_id.as_uuid())
            .bind(project_id.as_uuid())
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to store deputy permission: {error}"))
            })?;
        }

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        Ok(())
    }
}
