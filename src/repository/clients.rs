//! Clients repository for database operations

use chrono::Utc;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::client::{Client, ClientQuery, ClientShort, CreateClient, UpdateClient},
};

#[derive(Clone)]
pub struct ClientsRepository {
    pool: Pool<Postgres>,
}

impl ClientsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get client by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Client> {
        sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Client with id {} not found", id)))
    }

    /// Check if a client name already exists
    pub async fn name_exists(&self, name: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = if let Some(id) = exclude_id {
            sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM clients WHERE LOWER(name) = LOWER($1) AND id != $2)",
            )
            .bind(name)
            .bind(id)
            .fetch_one(&self.pool)
            .await?
        } else {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM clients WHERE LOWER(name) = LOWER($1))")
                .bind(name)
                .fetch_one(&self.pool)
                .await?
        };
        Ok(exists)
    }

    /// Search clients with derived employee and asset counts
    pub async fn search(&self, query: &ClientQuery) -> AppResult<(Vec<ClientShort>, i64)> {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1) * per_page;

        let (where_clause, name_param) = match query.name {
            Some(ref name) => (
                "WHERE LOWER(c.name) LIKE $1".to_string(),
                Some(format!("%{}%", name.to_lowercase())),
            ),
            None => (String::new(), None),
        };

        let count_query = format!("SELECT COUNT(*) FROM clients c {}", where_clause);
        let mut count_builder = sqlx::query_scalar::<_, i64>(&count_query);
        if let Some(ref param) = name_param {
            count_builder = count_builder.bind(param);
        }
        let total = count_builder.fetch_one(&self.pool).await?;

        // nb_assets counts devices held by this client's employees
        let select_query = format!(
            r#"
            SELECT c.id, c.name, c.contact_name,
                   (SELECT COUNT(*) FROM employees e
                    WHERE e.client_id = c.id AND e.status = 0) as nb_employees,
                   (SELECT COUNT(*) FROM devices d
                    JOIN employees e ON d.assigned_to = e.id
                    WHERE e.client_id = c.id) as nb_assets
            FROM clients c
            {}
            ORDER BY c.name
            LIMIT {} OFFSET {}
            "#,
            where_clause, per_page, offset
        );

        let mut select_builder = sqlx::query_as::<_, ClientShort>(&select_query);
        if let Some(ref param) = name_param {
            select_builder = select_builder.bind(param);
        }
        let clients = select_builder.fetch_all(&self.pool).await?;

        Ok((clients, total))
    }

    /// Create a new client
    pub async fn create(&self, client: &CreateClient) -> AppResult<Client> {
        let now = Utc::now();

        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO clients (name, contact_name, contact_email, contact_phone, notes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING id
            "#,
        )
        .bind(&client.name)
        .bind(&client.contact_name)
        .bind(&client.contact_email)
        .bind(&client.contact_phone)
        .bind(&client.notes)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        self.get_by_id(id).await
    }

    /// Update an existing client
    pub async fn update(&self, id: i32, client: &UpdateClient) -> AppResult<Client> {
        let now = Utc::now();

        let mut sets = vec!["updated_at = $1".to_string()];
        let mut param_idx = 2;

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, param_idx));
                    param_idx += 1;
                }
            };
        }

        add_field!(client.name, "name");
        add_field!(client.contact_name, "contact_name");
        add_field!(client.contact_email, "contact_email");
        add_field!(client.contact_phone, "contact_phone");
        add_field!(client.notes, "notes");
        let _ = param_idx;

        let query = format!("UPDATE clients SET {} WHERE id = {}", sets.join(", "), id);

        let mut builder = sqlx::query(&query).bind(now);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(client.name);
        bind_field!(client.contact_name);
        bind_field!(client.contact_email);
        bind_field!(client.contact_phone);
        bind_field!(client.notes);

        builder.execute(&self.pool).await?;

        self.get_by_id(id).await
    }

    /// Delete a client
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
