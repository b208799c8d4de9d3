use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::{
        pagination::{PageRequest, Paged},
        repos::{CreateReviewParams, RepoError, ReviewQueryFilter, ReviewsRepo, UpdateReviewParams},
    },
    domain::{entities::ReviewRecord, types::ReviewStatus},
};

use super::{PostgresRepositories, map_sqlx_error};

const SELECT_COLUMNS: &str =
    "id, name, company, email, rating, message, status, is_visible, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct ReviewRow {
    id: Uuid,
    name: String,
    company: Option<String>,
    email: Option<String>,
    rating: i16,
    message: String,
    status: ReviewStatus,
    is_visible: bool,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<ReviewRow> for ReviewRecord {
    fn from(row: ReviewRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            company: row.company,
            email: row.email,
            rating: row.rating,
            message: row.message,
            status: row.status,
            is_visible: row.is_visible,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl ReviewsRepo for PostgresRepositories {
    async fn list_public_reviews(&self) -> Result<Vec<ReviewRecord>, RepoError> {
        let rows: Vec<ReviewRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM reviews \
             WHERE status = $1 AND is_visible = TRUE \
             ORDER BY created_at DESC"
        ))
        .bind(ReviewStatus::Approved)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_reviews(
        &self,
        filter: &ReviewQueryFilter,
        page: PageRequest,
    ) -> Result<Paged<ReviewRecord>, RepoError> {
        let mut count_qb =
            QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM reviews WHERE 1=1");
        if let Some(status) = filter.status {
            count_qb.push(" AND status = ");
            count_qb.push_bind(status);
        }
        let (total,): (i64,) = count_qb
            .build_query_as()
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {SELECT_COLUMNS} FROM reviews WHERE 1=1"
        ));
        if let Some(status) = filter.status {
            qb.push(" AND status = ");
            qb.push_bind(status);
        }
        qb.push(" ORDER BY created_at DESC LIMIT ");
        qb.push_bind(i64::from(page.limit()));
        qb.push(" OFFSET ");
        qb.push_bind(page.offset());

        let rows: Vec<ReviewRow> = qb
            .build_query_as()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(Paged::new(
            rows.into_iter().map(Into::into).collect(),
            Self::convert_count(total)?,
            page,
        ))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ReviewRecord>, RepoError> {
        let row: Option<ReviewRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM reviews WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        Ok(row.map(Into::into))
    }

    async fn create_review(&self, params: CreateReviewParams) -> Result<ReviewRecord, RepoError> {
        let row: ReviewRow = sqlx::query_as(&format!(
            "INSERT INTO reviews (name, company, email, rating, message, status, is_visible) \
             VALUES ($1, $2, $3, $4, $5, $6, TRUE) \
             RETURNING {SELECT_COLUMNS}"
        ))
        .bind(&params.name)
        .bind(&params.company)
        .bind(&params.email)
        .bind(params.rating)
        .bind(&params.message)
        .bind(ReviewStatus::Pending)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        Ok(row.into())
    }

    async fn update_review(
        &self,
        id: Uuid,
        params: UpdateReviewParams,
    ) -> Result<Option<ReviewRecord>, RepoError> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE reviews SET updated_at = now()");
        if let Some(status) = params.status {
            qb.push(", status = ");
            qb.push_bind(status);
        }
        if let Some(is_visible) = params.is_visible {
            qb.push(", is_visible = ");
            qb.push_bind(is_visible);
        }
        qb.push(" WHERE id = ");
        qb.push_bind(id);
        qb.push(format!(" RETURNING {SELECT_COLUMNS}"));

        let row: Option<ReviewRow> = qb
            .build_query_as()
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.map(Into::into))
    }

    async fn delete_review(&self, id: Uuid) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected() > 0)
    }
}
