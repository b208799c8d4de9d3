use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::{
    application::{
        pagination::{PageRequest, Paged},
        repos::{
            CreateDesignEnquiryParams, DesignEnquiriesRepo, EnquiryQueryFilter, RepoError,
            UpdateEnquiryParams,
        },
    },
    domain::{
        entities::DesignEnquiryRecord,
        types::{EnquiryPriority, EnquiryStatus},
    },
};

use super::{PostgresRepositories, enquiries::push_enquiry_update_set, map_sqlx_error};

const SELECT_COLUMNS: &str = "id, fabric_id, fabric_name, print_type, name, company, email, \
     phone, quantity, front_image_url, back_image_url, side_image_url, logo_urls, notes, status, \
     priority, deadline, admin_notes, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct DesignEnquiryRow {
    id: Uuid,
    fabric_id: Option<Uuid>,
    fabric_name: String,
    print_type: String,
    name: String,
    company: Option<String>,
    email: String,
    phone: Option<String>,
    quantity: i32,
    front_image_url: String,
    back_image_url: String,
    side_image_url: String,
    logo_urls: Vec<String>,
    notes: Option<String>,
    status: EnquiryStatus,
    priority: EnquiryPriority,
    deadline: Option<Date>,
    admin_notes: Option<String>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<DesignEnquiryRow> for DesignEnquiryRecord {
    fn from(row: DesignEnquiryRow) -> Self {
        Self {
            id: row.id,
            fabric_id: row.fabric_id,
            fabric_name: row.fabric_name,
            print_type: row.print_type,
            name: row.name,
            company: row.company,
            email: row.email,
            phone: row.phone,
            quantity: row.quantity,
            front_image_url: row.front_image_url,
            back_image_url: row.back_image_url,
            side_image_url: row.side_image_url,
            logo_urls: row.logo_urls,
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

#[async_trait]
impl DesignEnquiriesRepo for PostgresRepositories {
    async fn create_design_enquiry(
        &self,
        params: CreateDesignEnquiryParams,
    ) -> Result<DesignEnquiryRecord, RepoError> {
        let row: DesignEnquiryRow = sqlx::query_as(&format!(
            "INSERT INTO design_enquiries \
                 (fabric_id, fabric_name, print_type, name, company, email, phone, quantity, \
                  front_image_url, back_image_url, side_image_url, logo_urls, notes, status, \
                  priority, deadline) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16) \
             RETURNING {SELECT_COLUMNS}"
        ))
        .bind(params.fabric_id)
        .bind(&params.fabric_name)
        .bind(&params.print_type)
        .bind(&params.name)
        .bind(&params.company)
        .bind(&params.email)
        .bind(&params.phone)
        .bind(params.quantity)
        .bind(&params.front_image_url)
        .bind(&params.back_image_url)
        .bind(&params.side_image_url)
        .bind(&params.logo_urls)
        .bind(&params.notes)
        .bind(EnquiryStatus::Pending)
        .bind(params.priority)
        .bind(params.deadline)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        Ok(row.into())
    }

    async fn list_design_enquiries(
        &self,
        filter: &EnquiryQueryFilter,
        page: PageRequest,
    ) -> Result<Paged<DesignEnquiryRecord>, RepoError> {
        let mut count_qb =
            QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM design_enquiries WHERE 1=1");
        Self::apply_enquiry_filter(&mut count_qb, filter);
        let (total,): (i64,) = count_qb
            .build_query_as()
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {SELECT_COLUMNS} FROM design_enquiries WHERE 1=1"
        ));
        Self::apply_enquiry_filter(&mut qb, filter);
        qb.push(" ORDER BY created_at DESC LIMIT ");
        qb.push_bind(i64::from(page.limit()));
        qb.push(" OFFSET ");
        qb.push_bind(page.offset());

        let rows: Vec<DesignEnquiryRow> = qb
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

    async fn list_all_design_enquiries(&self) -> Result<Vec<DesignEnquiryRecord>, RepoError> {
        let rows: Vec<DesignEnquiryRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM design_enquiries ORDER BY created_at"
        ))
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<DesignEnquiryRecord>, RepoError> {
        let row: Option<DesignEnquiryRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM design_enquiries WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        Ok(row.map(Into::into))
    }

    async fn update_design_enquiry(
        &self,
        id: Uuid,
        params: UpdateEnquiryParams,
    ) -> Result<Option<DesignEnquiryRecord>, RepoError> {
        let mut qb =
            QueryBuilder::<Postgres>::new("UPDATE design_enquiries SET updated_at = now()");
        push_enquiry_update_set(&mut qb, &params);
        qb.push(" WHERE id = ");
        qb.push_bind(id);
        qb.push(format!(" RETURNING {SELECT_COLUMNS}"));

        let row: Option<DesignEnquiryRow> = qb
            .build_query_as()
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.map(Into::into))
    }

    async fn delete_design_enquiry(&self, id: Uuid) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM design_enquiries WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_all_design_enquiries(&self) -> Result<u64, RepoError> {
        let result = sqlx::query("DELETE FROM design_enquiries")
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected())
    }

    async fn status_counts(&self) -> Result<Vec<(EnquiryStatus, u64)>, RepoError> {
        let rows: Vec<(EnquiryStatus, i64)> =
            sqlx::query_as("SELECT status, COUNT(*) FROM design_enquiries GROUP BY status")
                .fetch_all(self.pool())
                .await
                .map_err(map_sqlx_error)?;
        rows.into_iter()
            .map(|(status, count)| Ok((status, Self::convert_count(count)?)))
            .collect()
    }
}
