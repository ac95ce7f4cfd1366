//! Merchant registry persistence. Uniqueness on `name` and `client_id` is
//! enforced by the database and surfaced to callers as `AlreadyExists`.

use sqlx::{PgPool, QueryBuilder};
use tracing::info;
use uuid::Uuid;

use crate::models::{CreateMerchantRequest, Merchant, MerchantFilter, UpdateMerchantFields};
use crate::utils::response::AppError;

#[derive(Clone)]
pub struct MerchantRepository {
    pool: PgPool,
}

impl MerchantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, req: &CreateMerchantRequest) -> Result<Merchant, AppError> {
        let id = Uuid::new_v4();

        let merchant = sqlx::query_as::<_, Merchant>(
            r#"
            INSERT INTO merchants (id, name, client_id, admin_client_id, contact_person, order_live_time, info)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&req.name)
        .bind(&req.client_id)
        .bind(&req.admin_client_id)
        .bind(req.contact_person)
        .bind(req.order_live_time)
        .bind(&req.info)
        .fetch_one(&self.pool)
        .await?;

        Ok(merchant)
    }

    pub async fn get(&self, id: Uuid) -> Result<Merchant, AppError> {
        sqlx::query_as::<_, Merchant>("SELECT * FROM merchants WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found(format!("merchant {id} not found")))
    }

    pub async fn search(&self, filter: &MerchantFilter) -> Result<Vec<Merchant>, AppError> {
        let mut qb = QueryBuilder::new("SELECT * FROM merchants WHERE 1 = 1");

        if let Some(contact_person) = filter.contact_person {
            qb.push(" AND contact_person = ").push_bind(contact_person);
        }
        if let Some(client_id) = &filter.client_id {
            qb.push(" AND client_id = ").push_bind(client_id.clone());
        }
        if let Some(name) = &filter.name {
            qb.push(" AND name = ").push_bind(name.clone());
        }
        if let Some(admin_client_id) = &filter.admin_client_id {
            qb.push(" AND admin_client_id = ").push_bind(admin_client_id.clone());
        }

        qb.push(" ORDER BY created_at DESC");

        info!(filter = ?filter, "search merchant");
        let rows = qb.build_query_as::<Merchant>().fetch_all(&self.pool).await?;
        Ok(rows)
    }

    /// Field-mask partial update; only fields the caller actually set move.
    pub async fn update(&self, id: Uuid, fields: &UpdateMerchantFields) -> Result<Merchant, AppError> {
        let merchant = sqlx::query_as::<_, Merchant>(
            r#"
            UPDATE merchants SET
                admin_client_id = COALESCE($2, admin_client_id),
                contact_person = COALESCE($3, contact_person),
                order_live_time = COALESCE($4, order_live_time),
                info = COALESCE($5, info),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&fields.admin_client_id)
        .bind(fields.contact_person)
        .bind(fields.order_live_time)
        .bind(&fields.info)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::not_found(format!("merchant {id} not found")))?;

        Ok(merchant)
    }
}
