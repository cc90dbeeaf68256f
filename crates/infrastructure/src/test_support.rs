use rust_decimal::Decimal;
use santiye_domain::{EmployeeId, ProjectId};
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Connects to `DATABASE_URL` and applies migrations, or returns `None` when unset.
pub(crate) async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(8)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for postgres tests: {error}");
    }

    Some(pool)
}

pub(crate) async fn insert_project(pool: &PgPool, name: &str, budget: Decimal) -> ProjectId {
    let project_id = ProjectId::new();
    let insert = sqlx::query(
        r#"
            INSERT INTO projects (id, name, budget)
            VALUES ($1, $2, $3)
            "#,
    )
    .bind(project_id.as_uuid())
    .bind(name)
    .bind(budget)
    .execute(pool)
    .await;

    assert!(insert.is_ok());
    project_id
}

pub(crate) async fn insert_employee(pool: &PgPool, full_name: &str, role: &str) -> EmployeeId {
    let employee_id = EmployeeId::new();
    let insert = sqlx::query(
        r#"
            INSERT INTO employees (id, full_name, role)
            VALUES ($1, $2, $3)
            "#,
    )
    .bind(employee_id.as_uuid())
    .bind(full_name)
    .bind(role)
    .execute(pool)
    .await;

    assert!(insert.is_ok());
    employee_id
}
