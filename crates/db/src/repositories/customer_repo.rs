//! Repository for the `customers` table.

use pitch_core::types::DbId;
use sqlx::PgPool;

use crate::models::customer::{CreateCustomer, Customer, UpdateCustomer};

const COLUMNS: &str = "id, name, contact_person, email, phone, org_number, created_at, updated_at";

/// Provides CRUD operations for customers.
pub struct CustomerRepo;

impl CustomerRepo {
    pub async fn create(pool: &PgPool, input: &CreateCustomer) -> Result<Customer, sqlx::Error> {
        let query = format!(
            "INSERT INTO customers (name, contact_person, email, phone, org_number)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Customer>(&query)
            .bind(&input.name)
            .bind(&input.contact_person)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.org_number)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Customer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM customers WHERE id = $1");
        sqlx::query_as::<_, Customer>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Customer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM customers ORDER BY name");
        sqlx::query_as::<_, Customer>(&query).fetch_all(pool).await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCustomer,
    ) -> Result<Option<Customer>, sqlx::Error> {
        let query = format!(
            "UPDATE customers SET
                name = COALESCE($2, name),
                contact_person = COALESCE($3, contact_person),
                email = COALESCE($4, email),
                phone = COALESCE($5, phone),
                org_number = COALESCE($6, org_number),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Customer>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.contact_person)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.org_number)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
