//! Catalog service for units, categories, vendors, and products
//!
//! Units, categories, and vendors share one shape (a unique name), so their
//! queries go through common helpers keyed by table name.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use shared::models::{Category, Product, Unit, Vendor};
use shared::validation::{validate_name, validate_non_negative};

use crate::error::{AppError, AppResult};

/// Catalog service for reference data
#[derive(Clone)]
pub struct CatalogService {
    db: PgPool,
}

/// Row shared by the three name-only tables
#[derive(Debug, FromRow)]
struct NamedRow {
    id: Uuid,
    name: String,
    created_at: DateTime<Utc>,
}

/// Product row
#[derive(Debug, FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    unit_price: Decimal,
    unit_id: Uuid,
    category_id: Uuid,
    vendor_id: Uuid,
    created_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            unit_price: row.unit_price,
            unit_id: row.unit_id,
            category_id: row.category_id,
            vendor_id: row.vendor_id,
            created_at: row.created_at,
        }
    }
}

/// Input for creating a name-only catalog entity
#[derive(Debug, Deserialize)]
pub struct CreateNamedInput {
    pub name: String,
}

/// Input for updating a name-only catalog entity
#[derive(Debug, Deserialize)]
pub struct UpdateNamedInput {
    pub name: Option<String>,
}

/// Input for creating a product
#[derive(Debug, Deserialize)]
pub struct CreateProductInput {
    pub name: String,
    pub unit_price: Decimal,
    pub unit_id: Uuid,
    pub category_id: Uuid,
    pub vendor_id: Uuid,
}

/// Input for updating a product
#[derive(Debug, Deserialize)]
pub struct UpdateProductInput {
    pub name: Option<String>,
    pub unit_price: Option<Decimal>,
    pub unit_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub vendor_id: Option<Uuid>,
}

// The three name-only tables. Table names are compile-time constants; they
// are formatted into SQL but never taken from input.
const UNITS: &str = "units";
const CATEGORIES: &str = "categories";
const VENDORS: &str = "vendors";

impl CatalogService {
    /// Create a new CatalogService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    // ========================================================================
    // Units
    // ========================================================================

    pub async fn list_units(&self) -> AppResult<Vec<Unit>> {
        let rows = self.list_named(UNITS).await?;
        Ok(rows.into_iter().map(|r| Unit { id: r.id, name: r.name, created_at: r.created_at }).collect())
    }

    pub async fn create_unit(&self, input: CreateNamedInput) -> AppResult<Unit> {
        let r = self.create_named(UNITS, "Unit", &input.name).await?;
        Ok(Unit { id: r.id, name: r.name, created_at: r.created_at })
    }

    pub async fn get_unit(&self, id: Uuid) -> AppResult<Unit> {
        let r = self.get_named(UNITS, "Unit", id).await?;
        Ok(Unit { id: r.id, name: r.name, created_at: r.created_at })
    }

    pub async fn update_unit(&self, id: Uuid, input: UpdateNamedInput) -> AppResult<Unit> {
        let r = self.update_named(UNITS, "Unit", id, input).await?;
        Ok(Unit { id: r.id, name: r.name, created_at: r.created_at })
    }

    pub async fn delete_unit(&self, id: Uuid) -> AppResult<()> {
        self.delete_named(UNITS, "Unit", id).await
    }

    // ========================================================================
    // Categories
    // ========================================================================

    pub async fn list_categories(&self) -> AppResult<Vec<Category>> {
        let rows = self.list_named(CATEGORIES).await?;
        Ok(rows.into_iter().map(|r| Category { id: r.id, name: r.name, created_at: r.created_at }).collect())
    }

    pub async fn create_category(&self, input: CreateNamedInput) -> AppResult<Category> {
        let r = self.create_named(CATEGORIES, "Category", &input.name).await?;
        Ok(Category { id: r.id, name: r.name, created_at: r.created_at })
    }

    pub async fn get_category(&self, id: Uuid) -> AppResult<Category> {
        let r = self.get_named(CATEGORIES, "Category", id).await?;
        Ok(Category { id: r.id, name: r.name, created_at: r.created_at })
    }

    pub async fn update_category(&self, id: Uuid, input: UpdateNamedInput) -> AppResult<Category> {
        let r = self.update_named(CATEGORIES, "Category", id, input).await?;
        Ok(Category { id: r.id, name: r.name, created_at: r.created_at })
    }

    pub async fn delete_category(&self, id: Uuid) -> AppResult<()> {
        self.delete_named(CATEGORIES, "Category", id).await
    }

    // ========================================================================
    // Vendors
    // ========================================================================

    pub async fn list_vendors(&self) -> AppResult<Vec<Vendor>> {
        let rows = self.list_named(VENDORS).await?;
        Ok(rows.into_iter().map(|r| Vendor { id: r.id, name: r.name, created_at: r.created_at }).collect())
    }

    pub async fn create_vendor(&self, input: CreateNamedInput) -> AppResult<Vendor> {
        let r = self.create_named(VENDORS, "Vendor", &input.name).await?;
        Ok(Vendor { id: r.id, name: r.name, created_at: r.created_at })
    }

    pub async fn get_vendor(&self, id: Uuid) -> AppResult<Vendor> {
        let r = self.get_named(VENDORS, "Vendor", id).await?;
        Ok(Vendor { id: r.id, name: r.name, created_at: r.created_at })
    }

    pub async fn update_vendor(&self, id: Uuid, input: UpdateNamedInput) -> AppResult<Vendor> {
        let r = self.update_named(VENDORS, "Vendor", id, input).await?;
        Ok(Vendor { id: r.id, name: r.name, created_at: r.created_at })
    }

    pub async fn delete_vendor(&self, id: Uuid) -> AppResult<()> {
        self.delete_named(VENDORS, "Vendor", id).await
    }

    // ========================================================================
    // Products
    // ========================================================================

    pub async fn list_products(&self) -> AppResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, unit_price, unit_id, category_id, vendor_id, created_at
            FROM products
            ORDER BY name
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    pub async fn create_product(&self, input: CreateProductInput) -> AppResult<Product> {
        validate_name(&input.name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
        })?;
        validate_non_negative(input.unit_price).map_err(|msg| AppError::Validation {
            field: "unit_price".to_string(),
            message: msg.to_string(),
        })?;

        self.ensure_unique_name("products", "product", &input.name, None).await?;
        self.ensure_exists(UNITS, "Unit", input.unit_id).await?;
        self.ensure_exists(CATEGORIES, "Category", input.category_id).await?;
        self.ensure_exists(VENDORS, "Vendor", input.vendor_id).await?;

        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            INSERT INTO products (name, unit_price, unit_id, category_id, vendor_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, unit_price, unit_id, category_id, vendor_id, created_at
            "#,
        )
        .bind(&input.name)
        .bind(input.unit_price)
        .bind(input.unit_id)
        .bind(input.category_id)
        .bind(input.vendor_id)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    pub async fn get_product(&self, id: Uuid) -> AppResult<Product> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, unit_price, unit_id, category_id, vendor_id, created_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        Ok(row.into())
    }

    pub async fn update_product(&self, id: Uuid, input: UpdateProductInput) -> AppResult<Product> {
        let existing = self.get_product(id).await?;

        let name = input.name.unwrap_or(existing.name);
        let unit_price = input.unit_price.unwrap_or(existing.unit_price);
        let unit_id = input.unit_id.unwrap_or(existing.unit_id);
        let category_id = input.category_id.unwrap_or(existing.category_id);
        let vendor_id = input.vendor_id.unwrap_or(existing.vendor_id);

        validate_name(&name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
        })?;
        validate_non_negative(unit_price).map_err(|msg| AppError::Validation {
            field: "unit_price".to_string(),
            message: msg.to_string(),
        })?;

        self.ensure_unique_name("products", "product", &name, Some(id)).await?;
        self.ensure_exists(UNITS, "Unit", unit_id).await?;
        self.ensure_exists(CATEGORIES, "Category", category_id).await?;
        self.ensure_exists(VENDORS, "Vendor", vendor_id).await?;

        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            UPDATE products
            SET name = $1, unit_price = $2, unit_id = $3, category_id = $4, vendor_id = $5
            WHERE id = $6
            RETURNING id, name, unit_price, unit_id, category_id, vendor_id, created_at
            "#,
        )
        .bind(&name)
        .bind(unit_price)
        .bind(unit_id)
        .bind(category_id)
        .bind(vendor_id)
        .bind(id)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    pub async fn delete_product(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Product".to_string()));
        }

        Ok(())
    }

    // ========================================================================
    // Shared helpers
    // ========================================================================

    async fn list_named(&self, table: &str) -> AppResult<Vec<NamedRow>> {
        let rows = sqlx::query_as::<_, NamedRow>(&format!(
            "SELECT id, name, created_at FROM {} ORDER BY name",
            table
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    async fn create_named(&self, table: &str, resource: &str, name: &str) -> AppResult<NamedRow> {
        validate_name(name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
        })?;
        self.ensure_unique_name(table, resource, name, None).await?;

        let row = sqlx::query_as::<_, NamedRow>(&format!(
            "INSERT INTO {} (name) VALUES ($1) RETURNING id, name, created_at",
            table
        ))
        .bind(name)
        .fetch_one(&self.db)
        .await?;

        Ok(row)
    }

    async fn get_named(&self, table: &str, resource: &str, id: Uuid) -> AppResult<NamedRow> {
        let row = sqlx::query_as::<_, NamedRow>(&format!(
            "SELECT id, name, created_at FROM {} WHERE id = $1",
            table
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound(resource.to_string()))?;

        Ok(row)
    }

    async fn update_named(
        &self,
        table: &str,
        resource: &str,
        id: Uuid,
        input: UpdateNamedInput,
    ) -> AppResult<NamedRow> {
        let existing = self.get_named(table, resource, id).await?;
        let name = input.name.unwrap_or(existing.name);

        validate_name(&name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
        })?;
        self.ensure_unique_name(table, resource, &name, Some(id)).await?;

        let row = sqlx::query_as::<_, NamedRow>(&format!(
            "UPDATE {} SET name = $1 WHERE id = $2 RETURNING id, name, created_at",
            table
        ))
        .bind(&name)
        .bind(id)
        .fetch_one(&self.db)
        .await?;

        Ok(row)
    }

    async fn delete_named(&self, table: &str, resource: &str, id: Uuid) -> AppResult<()> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", table))
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(resource.to_string()));
        }

        Ok(())
    }

    async fn ensure_unique_name(
        &self,
        table: &str,
        field: &str,
        name: &str,
        exclude: Option<Uuid>,
    ) -> AppResult<()> {
        let taken = sqlx::query_scalar::<_, bool>(&format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE name = $1 AND ($2::uuid IS NULL OR id <> $2))",
            table
        ))
        .bind(name)
        .bind(exclude)
        .fetch_one(&self.db)
        .await?;

        if taken {
            return Err(AppError::DuplicateEntry(format!("{} name", field)));
        }

        Ok(())
    }

    async fn ensure_exists(&self, table: &str, resource: &str, id: Uuid) -> AppResult<()> {
        let exists = sqlx::query_scalar::<_, bool>(&format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)",
            table
        ))
        .bind(id)
        .fetch_one(&self.db)
        .await?;

        if !exists {
            return Err(AppError::NotFound(resource.to_string()));
        }

        Ok(())
    }
}
