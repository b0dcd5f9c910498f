//! # Employee Repository
//!
//! Employees are managed by the staff screens; the reconciliation core only
//! reads them to attribute dues and commissions. Inserts exist for setup and
//! seeding.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::error::DbResult;
use karobar_core::{Employee, Money};

#[derive(Debug, sqlx::FromRow)]
struct EmployeeRow {
    id: String,
    name: String,
    phone: Option<String>,
    role: Option<String>,
    daily_salary_paisa: i64,
    created_at: DateTime<Utc>,
}

impl From<EmployeeRow> for Employee {
    fn from(row: EmployeeRow) -> Self {
        Employee {
            id: row.id,
            name: row.name,
            phone: row.phone,
            role: row.role,
            daily_salary: Money::from_paisa(row.daily_salary_paisa),
            created_at: row.created_at,
        }
    }
}

/// Repository for employee database operations.
#[derive(Debug, Clone)]
pub struct EmployeeRepository {
    pool: SqlitePool,
}

impl EmployeeRepository {
    /// Creates a new EmployeeRepository.
    pub fn new(pool: SqlitePool) -> Self {
        EmployeeRepository { pool }
    }

    /// Inserts an employee.
    pub async fn insert(&self, employee: &Employee) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO employees (id, name, phone, role, daily_salary_paisa, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&employee.id)
        .bind(&employee.name)
        .bind(&employee.phone)
        .bind(&employee.role)
        .bind(employee.daily_salary.paisa())
        .bind(employee.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets an employee by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Employee>> {
        let row: Option<EmployeeRow> = sqlx::query_as(
            "SELECT id, name, phone, role, daily_salary_paisa, created_at \
             FROM employees WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Employee::from))
    }

    /// Lists all employees, ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Employee>> {
        let rows: Vec<EmployeeRow> = sqlx::query_as(
            "SELECT id, name, phone, role, daily_salary_paisa, created_at \
             FROM employees ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Employee::from).collect())
    }
}
