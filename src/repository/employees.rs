//! Employees repository for database operations

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::employee::{
        CreateEmployee, Employee, EmployeeQuery, EmployeeRow, EmployeeShort, EmployeeShortRow,
        EmployeeStatus, UpdateEmployee,
    },
};

#[derive(Clone)]
pub struct EmployeesRepository {
    pool: Pool<Postgres>,
}

impl EmployeesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get employee by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Employee> {
        let row = sqlx::query_as::<_, EmployeeRow>(
            r#"
            SELECT e.*, c.name as client_name
            FROM employees e
            LEFT JOIN clients c ON e.client_id = c.id
            WHERE e.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Employee with id {} not found", id)))?;

        Ok(row.into())
    }

    /// Search employees with pagination
    pub async fn search(&self, query: &EmployeeQuery) -> AppResult<(Vec<EmployeeShort>, i64)> {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1) * per_page;

        let mut conditions = Vec::new();
        let mut params: Vec<String> = Vec::new();

        if let Some(ref name) = query.name {
            params.push(format!("%{}%", name.to_lowercase()));
            conditions.push(format!(
                "(LOWER(e.firstname) LIKE ${i} OR LOWER(e.lastname) LIKE ${i})",
                i = params.len()
            ));
        }

        if let Some(ref department) = query.department {
            params.push(department.to_lowercase());
            conditions.push(format!("LOWER(e.department) = ${}", params.len()));
        }

        // client_id is an integer filter, bound after the string params
        let client_param_idx = query.client_id.map(|_| params.len() + 1);
        if let Some(i) = client_param_idx {
            conditions.push(format!("e.client_id = ${}", i));
        }

        if !query.include_resigned.unwrap_or(false) {
            conditions.push(format!("e.status = {}", EmployeeStatus::Active as i16));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_query = format!("SELECT COUNT(*) FROM employees e {}", where_clause);
        let mut count_builder = sqlx::query_scalar::<_, i64>(&count_query);
        for param in &params {
            count_builder = count_builder.bind(param);
        }
        if let Some(client_id) = query.client_id {
            count_builder = count_builder.bind(client_id);
        }
        let total = count_builder.fetch_one(&self.pool).await?;

        let select_query = format!(
            r#"
            SELECT e.id, e.firstname, e.lastname, e.position, e.department,
                   c.name as client_name, e.status,
                   (SELECT COUNT(*) FROM devices d WHERE d.assigned_to = e.id) as nb_devices
            FROM employees e
            LEFT JOIN clients c ON e.client_id = c.id
            {}
            ORDER BY e.lastname, e.firstname
            LIMIT {} OFFSET {}
            "#,
            where_clause, per_page, offset
        );

        let mut select_builder = sqlx::query_as::<_, EmployeeShortRow>(&select_query);
        for param in &params {
            select_builder = select_builder.bind(param);
        }
        if let Some(client_id) = query.client_id {
            select_builder = select_builder.bind(client_id);
        }
        let employees = select_builder
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok((employees, total))
    }

    /// Create a new employee
    pub async fn create(&self, employee: &CreateEmployee) -> AppResult<Employee> {
        let now = Utc::now();

        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO employees (firstname, lastname, position, department, client_id, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            RETURNING id
            "#,
        )
        .bind(&employee.firstname)
        .bind(&employee.lastname)
        .bind(&employee.position)
        .bind(&employee.department)
        .bind(employee.client_id)
        .bind(EmployeeStatus::Active as i16)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        self.get_by_id(id).await
    }

    /// Update an existing employee
    pub async fn update(&self, id: i32, employee: &UpdateEmployee) -> AppResult<Employee> {
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

        add_field!(employee.firstname, "firstname");
        add_field!(employee.lastname, "lastname");
        add_field!(employee.position, "position");
        add_field!(employee.department, "department");
        add_field!(employee.client_id, "client_id");
        let _ = param_idx;

        let query = format!("UPDATE employees SET {} WHERE id = {}", sets.join(", "), id);

        let mut builder = sqlx::query(&query).bind(now);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(employee.firstname);
        bind_field!(employee.lastname);
        bind_field!(employee.position);
        bind_field!(employee.department);
        if let Some(client_id) = employee.client_id {
            builder = builder.bind(client_id);
        }

        builder.execute(&self.pool).await?;

        self.get_by_id(id).await
    }

    /// Mark an employee resigned
    pub async fn resign(
        &self,
        id: i32,
        date: DateTime<Utc>,
        reason: Option<&str>,
    ) -> AppResult<Employee> {
        let now = Utc::now();

        sqlx::query(
            r#"
            UPDATE employees
            SET status = $1, resignation_date = $2, resignation_reason = $3, updated_at = $4
            WHERE id = $5
            "#,
        )
        .bind(EmployeeStatus::Resigned as i16)
        .bind(date)
        .bind(reason)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.get_by_id(id).await
    }

    /// Delete an employee. History rows keep their employee reference.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Count active employees for a client
    pub async fn count_for_client(&self, client_id: i32) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM employees WHERE client_id = $1")
                .bind(client_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}
