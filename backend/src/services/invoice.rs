//! Invoicing service: customers, invoices, and invoice items
//!
//! Plain CRUD with derived money fields; no lifecycle beyond the paid flag.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use shared::models::{invoice_subtotal, Customer, Invoice, InvoiceItem};
use shared::validation::{validate_email, validate_name};

use crate::error::{AppError, AppResult};

/// Invoicing service
#[derive(Clone)]
pub struct InvoicingService {
    db: PgPool,
}

/// Customer row
#[derive(Debug, FromRow)]
struct CustomerRow {
    id: Uuid,
    name: String,
    address: Option<String>,
    city: Option<String>,
    state: Option<String>,
    zip_code: Option<String>,
    phone: Option<String>,
    email: Option<String>,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Customer {
            id: row.id,
            name: row.name,
            address: row.address,
            city: row.city,
            state: row.state,
            zip_code: row.zip_code,
            phone: row.phone,
            email: row.email,
        }
    }
}

/// Invoice row
#[derive(Debug, FromRow)]
struct InvoiceRow {
    id: Uuid,
    invoice_number: i32,
    date: DateTime<Utc>,
    paid: bool,
    customer_id: Uuid,
}

/// Invoice item row
#[derive(Debug, FromRow)]
struct InvoiceItemRow {
    id: Uuid,
    invoice_id: Uuid,
    date_of_service: Option<NaiveDate>,
    description: String,
    price_per_unit: Decimal,
    quantity: Decimal,
}

impl From<InvoiceItemRow> for InvoiceItem {
    fn from(row: InvoiceItemRow) -> Self {
        InvoiceItem {
            id: row.id,
            invoice_id: row.invoice_id,
            date_of_service: row.date_of_service,
            description: row.description,
            price_per_unit: row.price_per_unit,
            quantity: row.quantity,
        }
    }
}

/// Invoice representation returned to clients; `subtotal` is derived on read.
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceResponse {
    #[serde(flatten)]
    pub invoice: Invoice,
    pub subtotal: Decimal,
    pub items: Vec<InvoiceItemResponse>,
}

/// Invoice item representation; `amount` is derived on read.
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceItemResponse {
    #[serde(flatten)]
    pub item: InvoiceItem,
    pub amount: Decimal,
}

impl From<InvoiceItem> for InvoiceItemResponse {
    fn from(item: InvoiceItem) -> Self {
        InvoiceItemResponse {
            amount: item.amount(),
            item,
        }
    }
}

/// Input for creating a customer
#[derive(Debug, Deserialize)]
pub struct CreateCustomerInput {
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// Input for updating a customer
#[derive(Debug, Deserialize)]
pub struct UpdateCustomerInput {
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// Input for creating an invoice
#[derive(Debug, Deserialize)]
pub struct CreateInvoiceInput {
    pub invoice_number: i32,
    pub customer_id: Uuid,
    pub date: Option<DateTime<Utc>>,
    pub paid: Option<bool>,
}

/// Input for updating an invoice
#[derive(Debug, Deserialize)]
pub struct UpdateInvoiceInput {
    pub invoice_number: Option<i32>,
    pub customer_id: Option<Uuid>,
    pub date: Option<DateTime<Utc>>,
    pub paid: Option<bool>,
}

/// Input for creating an invoice item
#[derive(Debug, Deserialize)]
pub struct CreateInvoiceItemInput {
    pub invoice_id: Uuid,
    pub description: String,
    pub price_per_unit: Decimal,
    pub quantity: Decimal,
    pub date_of_service: Option<NaiveDate>,
}

/// Input for updating an invoice item
#[derive(Debug, Deserialize)]
pub struct UpdateInvoiceItemInput {
    pub description: Option<String>,
    pub price_per_unit: Option<Decimal>,
    pub quantity: Option<Decimal>,
    pub date_of_service: Option<NaiveDate>,
}

impl InvoicingService {
    /// Create a new InvoicingService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    // ========================================================================
    // Customers
    // ========================================================================

    pub async fn list_customers(&self) -> AppResult<Vec<Customer>> {
        let rows = sqlx::query_as::<_, CustomerRow>(
            r#"
            SELECT id, name, address, city, state, zip_code, phone, email
            FROM customers
            ORDER BY name
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Customer::from).collect())
    }

    pub async fn create_customer(&self, input: CreateCustomerInput) -> AppResult<Customer> {
        validate_name(&input.name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
        })?;
        if let Some(email) = input.email.as_deref() {
            validate_email(email).map_err(|msg| AppError::Validation {
                field: "email".to_string(),
                message: msg.to_string(),
            })?;
        }

        self.ensure_unique_customer_name(&input.name, None).await?;

        let row = sqlx::query_as::<_, CustomerRow>(
            r#"
            INSERT INTO customers (name, address, city, state, zip_code, phone, email)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, address, city, state, zip_code, phone, email
            "#,
        )
        .bind(&input.name)
        .bind(&input.address)
        .bind(&input.city)
        .bind(&input.state)
        .bind(&input.zip_code)
        .bind(&input.phone)
        .bind(&input.email)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    pub async fn get_customer(&self, id: Uuid) -> AppResult<Customer> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r#"
            SELECT id, name, address, city, state, zip_code, phone, email
            FROM customers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Customer".to_string()))?;

        Ok(row.into())
    }

    pub async fn update_customer(&self, id: Uuid, input: UpdateCustomerInput) -> AppResult<Customer> {
        let existing = self.get_customer(id).await?;

        let name = input.name.unwrap_or(existing.name);
        let address = input.address.or(existing.address);
        let city = input.city.or(existing.city);
        let state = input.state.or(existing.state);
        let zip_code = input.zip_code.or(existing.zip_code);
        let phone = input.phone.or(existing.phone);
        let email = input.email.or(existing.email);

        validate_name(&name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
        })?;
        if let Some(email) = email.as_deref() {
            validate_email(email).map_err(|msg| AppError::Validation {
                field: "email".to_string(),
                message: msg.to_string(),
            })?;
        }

        self.ensure_unique_customer_name(&name, Some(id)).await?;

        let row = sqlx::query_as::<_, CustomerRow>(
            r#"
            UPDATE customers
            SET name = $1, address = $2, city = $3, state = $4, zip_code = $5, phone = $6, email = $7
            WHERE id = $8
            RETURNING id, name, address, city, state, zip_code, phone, email
            "#,
        )
        .bind(&name)
        .bind(&address)
        .bind(&city)
        .bind(&state)
        .bind(&zip_code)
        .bind(&phone)
        .bind(&email)
        .bind(id)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    pub async fn delete_customer(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Customer".to_string()));
        }

        Ok(())
    }

    // ========================================================================
    // Invoices
    // ========================================================================

    pub async fn list_invoices(&self) -> AppResult<Vec<InvoiceResponse>> {
        let rows = sqlx::query_as::<_, InvoiceRow>(
            "SELECT id, invoice_number, date, paid, customer_id FROM invoices ORDER BY date DESC",
        )
        .fetch_all(&self.db)
        .await?;

        let mut responses = Vec::with_capacity(rows.len());
        for row in rows {
            responses.push(self.assemble_invoice(row).await?);
        }
        Ok(responses)
    }

    pub async fn create_invoice(&self, input: CreateInvoiceInput) -> AppResult<InvoiceResponse> {
        self.ensure_customer_exists(input.customer_id).await?;
        self.ensure_unique_invoice_number(input.invoice_number, None).await?;

        let row = sqlx::query_as::<_, InvoiceRow>(
            r#"
            INSERT INTO invoices (invoice_number, date, paid, customer_id)
            VALUES ($1, COALESCE($2, NOW()), COALESCE($3, false), $4)
            RETURNING id, invoice_number, date, paid, customer_id
            "#,
        )
        .bind(input.invoice_number)
        .bind(input.date)
        .bind(input.paid)
        .bind(input.customer_id)
        .fetch_one(&self.db)
        .await?;

        self.assemble_invoice(row).await
    }

    pub async fn get_invoice(&self, id: Uuid) -> AppResult<InvoiceResponse> {
        let row = sqlx::query_as::<_, InvoiceRow>(
            "SELECT id, invoice_number, date, paid, customer_id FROM invoices WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Invoice".to_string()))?;

        self.assemble_invoice(row).await
    }

    pub async fn update_invoice(&self, id: Uuid, input: UpdateInvoiceInput) -> AppResult<InvoiceResponse> {
        let existing = self.get_invoice(id).await?;

        let invoice_number = input.invoice_number.unwrap_or(existing.invoice.invoice_number);
        let customer_id = input.customer_id.unwrap_or(existing.invoice.customer_id);
        let date = input.date.unwrap_or(existing.invoice.date);
        let paid = input.paid.unwrap_or(existing.invoice.paid);

        self.ensure_customer_exists(customer_id).await?;
        self.ensure_unique_invoice_number(invoice_number, Some(id)).await?;

        let row = sqlx::query_as::<_, InvoiceRow>(
            r#"
            UPDATE invoices
            SET invoice_number = $1, date = $2, paid = $3, customer_id = $4
            WHERE id = $5
            RETURNING id, invoice_number, date, paid, customer_id
            "#,
        )
        .bind(invoice_number)
        .bind(date)
        .bind(paid)
        .bind(customer_id)
        .bind(id)
        .fetch_one(&self.db)
        .await?;

        self.assemble_invoice(row).await
    }

    /// Delete an invoice and all of its items
    pub async fn delete_invoice(&self, id: Uuid) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        sqlx::query("DELETE FROM invoice_items WHERE invoice_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM invoices WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Invoice".to_string()));
        }

        tx.commit().await?;
        Ok(())
    }

    // ========================================================================
    // Invoice items
    // ========================================================================

    pub async fn list_items(&self) -> AppResult<Vec<InvoiceItemResponse>> {
        let rows = sqlx::query_as::<_, InvoiceItemRow>(
            r#"
            SELECT id, invoice_id, date_of_service, description, price_per_unit, quantity
            FROM invoice_items
            ORDER BY id
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| InvoiceItemResponse::from(InvoiceItem::from(r)))
            .collect())
    }

    pub async fn create_item(&self, input: CreateInvoiceItemInput) -> AppResult<InvoiceItemResponse> {
        if input.description.trim().is_empty() {
            return Err(AppError::Validation {
                field: "description".to_string(),
                message: "must not be empty".to_string(),
            });
        }

        self.ensure_invoice_exists(input.invoice_id).await?;

        let row = sqlx::query_as::<_, InvoiceItemRow>(
            r#"
            INSERT INTO invoice_items (invoice_id, date_of_service, description, price_per_unit, quantity)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, invoice_id, date_of_service, description, price_per_unit, quantity
            "#,
        )
        .bind(input.invoice_id)
        .bind(input.date_of_service)
        .bind(&input.description)
        .bind(input.price_per_unit)
        .bind(input.quantity)
        .fetch_one(&self.db)
        .await?;

        Ok(InvoiceItemResponse::from(InvoiceItem::from(row)))
    }

    pub async fn get_item(&self, id: Uuid) -> AppResult<InvoiceItemResponse> {
        let row = sqlx::query_as::<_, InvoiceItemRow>(
            r#"
            SELECT id, invoice_id, date_of_service, description, price_per_unit, quantity
            FROM invoice_items
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Invoice item".to_string()))?;

        Ok(InvoiceItemResponse::from(InvoiceItem::from(row)))
    }

    pub async fn update_item(&self, id: Uuid, input: UpdateInvoiceItemInput) -> AppResult<InvoiceItemResponse> {
        let existing = self.get_item(id).await?;

        let description = input.description.unwrap_or(existing.item.description);
        let price_per_unit = input.price_per_unit.unwrap_or(existing.item.price_per_unit);
        let quantity = input.quantity.unwrap_or(existing.item.quantity);
        let date_of_service = input.date_of_service.or(existing.item.date_of_service);

        if description.trim().is_empty() {
            return Err(AppError::Validation {
                field: "description".to_string(),
                message: "must not be empty".to_string(),
            });
        }

        let row = sqlx::query_as::<_, InvoiceItemRow>(
            r#"
            UPDATE invoice_items
            SET date_of_service = $1, description = $2, price_per_unit = $3, quantity = $4
            WHERE id = $5
            RETURNING id, invoice_id, date_of_service, description, price_per_unit, quantity
            "#,
        )
        .bind(date_of_service)
        .bind(&description)
        .bind(price_per_unit)
        .bind(quantity)
        .bind(id)
        .fetch_one(&self.db)
        .await?;

        Ok(InvoiceItemResponse::from(InvoiceItem::from(row)))
    }

    pub async fn delete_item(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM invoice_items WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Invoice item".to_string()));
        }

        Ok(())
    }

    // ========================================================================
    // Internals
    // ========================================================================

    async fn assemble_invoice(&self, row: InvoiceRow) -> AppResult<InvoiceResponse> {
        let item_rows = sqlx::query_as::<_, InvoiceItemRow>(
            r#"
            SELECT id, invoice_id, date_of_service, description, price_per_unit, quantity
            FROM invoice_items
            WHERE invoice_id = $1
            ORDER BY id
            "#,
        )
        .bind(row.id)
        .fetch_all(&self.db)
        .await?;

        let items: Vec<InvoiceItem> = item_rows.into_iter().map(InvoiceItem::from).collect();
        let subtotal = invoice_subtotal(&items);

        Ok(InvoiceResponse {
            invoice: Invoice {
                id: row.id,
                invoice_number: row.invoice_number,
                date: row.date,
                paid: row.paid,
                customer_id: row.customer_id,
            },
            subtotal,
            items: items.into_iter().map(InvoiceItemResponse::from).collect(),
        })
    }

    async fn ensure_customer_exists(&self, id: Uuid) -> AppResult<()> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM customers WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.db)
                .await?;

        if !exists {
            return Err(AppError::NotFound("Customer".to_string()));
        }

        Ok(())
    }

    async fn ensure_invoice_exists(&self, id: Uuid) -> AppResult<()> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM invoices WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.db)
                .await?;

        if !exists {
            return Err(AppError::NotFound("Invoice".to_string()));
        }

        Ok(())
    }

    async fn ensure_unique_customer_name(&self, name: &str, exclude: Option<Uuid>) -> AppResult<()> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM customers WHERE name = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(name)
        .bind(exclude)
        .fetch_one(&self.db)
        .await?;

        if taken {
            return Err(AppError::DuplicateEntry("customer name".to_string()));
        }

        Ok(())
    }

    async fn ensure_unique_invoice_number(&self, number: i32, exclude: Option<Uuid>) -> AppResult<()> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM invoices WHERE invoice_number = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(number)
        .bind(exclude)
        .fetch_one(&self.db)
        .await?;

        if taken {
            return Err(AppError::DuplicateEntry("invoice number".to_string()));
        }

        Ok(())
    }
}
