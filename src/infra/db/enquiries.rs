use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::{
    application::{
        pagination::{PageRequest, Paged},
        repos::{
            CreateEnquiryParams, EnquiriesRepo, EnquiryQueryFilter, RepoError, UpdateEnquiryParams,
        },
    },
    domain::{
        entities::EnquiryRecord,
        types::{EnquiryPriority, EnquiryStatus},
    },
};

use super::{PostgresRepositories, map_sqlx_error};

const SELECT_COLUMNS: &str = "id, clothing_type_id, fabric_id, clothing_type_name, fabric_name, \
     name, company, email, phone, quantity, is_sample_request, size_range, notes, status, \
     priority, deadline, admin_notes, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct EnquiryRow {
    id: Uuid,
    clothing_type_id: Option<Uuid>,
    fabric_id: Option<Uuid>,
    clothing_type_name: String,
    fabric_name: String,
    name: String,
    company: Option<String>,
    email: String,
    phone: Option<String>,
    quantity: i32,
    is_sample_request: bool,
    size_range: Option<String>,
    notes: Option<String>,
    status: EnquiryStatus,
    priority: EnquiryPriority,
    deadline: Option<Date>,
    admin_notes: Option<String>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<EnquiryRow> for EnquiryRecord {
    fn from(row: EnquiryRow) -> Self {
        Self {
            id: row.id,
            clothing_type_id: row.clothing_type_id,
            fabric_id: row.fabric_id,
            clothing_type_name: row.clothing_type_name,
            fabric_name: row.fabric_name,
            name: row.name,
            company: row.company,
            email: row.email,
            phone: row.phone,
            quantity: row.quantity,
            is_sample_request: row.is_sample_request,
            size_range: row.size_range,
            notes: row.notes,
            status: row.status,
            priority: row.priority,
            deadline: row.deadline,
            admin_notes: row.admin_notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Appends the shared SET clause for enquiry lifecycle updates.
pub(super) fn push_enquiry_update_set<'q>(
    qb: &mut QueryBuilder<'q, Postgres>,
    params: &'q UpdateEnquiryParams,
) {
    if let Some(status) = params.status {
        qb.push(", status = ");
        qb.push_bind(status);
    }
    if let Some(priority) = params.priority {
        qb.push(", priority = ");
        qb.push_bind(priority);
    }
    if let Some(deadline) = params.deadline.as_ref() {
        qb.push(", deadline = ");
        qb.push_bind(deadline);
    }
    if let Some(admin_notes) = params.admin_notes.as_ref() {
        qb.push(", admin_notes = ");
        qb.push_bind(admin_notes);
    }
}

#[async_trait]
impl EnquiriesRepo for PostgresRepositories {
    async fn create_enquiry(
        &self,
        params: CreateEnquiryParams,
    ) -> Result<EnquiryRecord, RepoError> {
        let row: EnquiryRow = sqlx::query_as(&format!(
            "INSERT INTO enquiries \
                 (clothing_type_id, fabric_id, clothing_type_name, fabric_name, name, company, \
                  email, phone, quantity, is_sample_request, size_range, notes, status, priority, \
                  deadline) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15) \
             RETURNING {SELECT_COLUMNS}"
        ))
        .bind(params.clothing_type_id)
        .bind(params.fabric_id)
        .bind(&params.clothing_type_name)
        .bind(&params.fabric_name)
        .bind(&params.name)
        .bind(&params.company)
        .bind(&params.email)
        .bind(&params.phone)
        .bind(params.quantity)
        .bind(params.is_sample_request)
        .bind(&params.size_range)
        .bind(&params.notes)
        .bind(EnquiryStatus::Pending)
        .bind(params.priority)
        .bind(params.deadline)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        Ok(row.into())
    }

    async fn list_enquiries(
        &self,
        filter: &EnquiryQueryFilter,
        page: PageRequest,
    ) -> Result<Paged<EnquiryRecord>, RepoError> {
        let mut count_qb =
            QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM enquiries WHERE 1=1");
        Self::apply_enquiry_filter(&mut count_qb, filter);
        let (total,): (i64,) = count_qb
            .build_query_as()
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {SELECT_COLUMNS} FROM enquiries WHERE 1=1"
        ));
        Self::apply_enquiry_filter(&mut qb, filter);
        qb.push(" ORDER BY created_at DESC LIMIT ");
        qb.push_bind(i64::from(page.limit()));
        qb.push(" OFFSET ");
        qb.push_bind(page.offset());

        let rows: Vec<EnquiryRow> = qb
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

    async fn find_by_id(&self, id: Uuid) -> Result<Option<EnquiryRecord>, RepoError> {
        let row: Option<EnquiryRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM enquiries WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        Ok(row.map(Into::into))
    }

    async fn update_enquiry(
        &self,
        id: Uuid,
        params: UpdateEnquiryParams,
    ) -> Result<Option<EnquiryRecord>, RepoError> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE enquiries SET updated_at = now()");
        push_enquiry_update_set(&mut qb, &params);
        qb.push(" WHERE id = ");
        qb.push_bind(id);
        qb.push(format!(" RETURNING {SELECT_COLUMNS}"));

        let row: Option<EnquiryRow> = qb
            .build_query_as()
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.map(Into::into))
    }

    async fn delete_enquiry(&self, id: Uuid) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM enquiries WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_all_enquiries(&self) -> Result<u64, RepoError> {
        let result = sqlx::query("DELETE FROM enquiries")
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected())
    }

    async fn status_counts(&self) -> Result<Vec<(EnquiryStatus, u64)>, RepoError> {
        let rows: Vec<(EnquiryStatus, i64)> =
            sqlx::query_as("SELECT status, COUNT(*) FROM enquiries GROUP BY status")
                .fetch_all(self.pool())
                .await
                .map_err(map_sqlx_error)?;
        rows.into_iter()
            .map(|(status, count)| Ok((status, Self::convert_count(count)?)))
            .collect()
    }
}
