//! Shared fixtures for integration tests.
//!
//! These tests need a Postgres database reachable through DATABASE_URL
//! (or the equivalent config file / ASSETFLOW_ environment settings).
//! Run with: cargo test -- --ignored

#![allow(dead_code)]

use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use assetflow_server::{
    config::AppConfig,
    models::{Asset, CurrentUser, NewAsset, NewAssignment, Role, User},
    repository::Repository,
    services::Services,
};

pub struct TestContext {
    pub repository: Repository,
    pub services: Services,
    pub location_id: Uuid,
    pub admin: CurrentUser,
    pub staff: CurrentUser,
}

/// Connect, migrate and seed one location with an admin and a staff user.
/// Every context gets its own uniquely named rows so tests can run in
/// parallel against the same database.
pub async fn setup() -> TestContext {
    dotenvy::dotenv().ok();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "assetflow_server=debug".into()),
        )
        .try_init();

    let config = AppConfig::load().expect("Failed to load configuration");

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    let repository = Repository::new(pool);
    let services = Services::new(repository.clone());

    let tag = unique_tag();

    let location_id: Uuid =
        sqlx::query_scalar("INSERT INTO locations (name) VALUES ($1) RETURNING id")
            .bind(format!("Location {}", tag))
            .fetch_one(&repository.pool)
            .await
            .expect("Failed to seed location");

    let admin = seed_user(&repository, &format!("admin_{}", tag), Role::Admin, location_id).await;
    let staff = seed_user(&repository, &format!("staff_{}", tag), Role::Staff, location_id).await;

    TestContext {
        repository,
        services,
        location_id,
        admin,
        staff,
    }
}

pub async fn seed_user(
    repository: &Repository,
    username: &str,
    role: Role,
    location_id: Uuid,
) -> CurrentUser {
    let user: User = sqlx::query_as(
        "INSERT INTO users (username, role, location_id) VALUES ($1, $2, $3) \
         RETURNING id, username, staff_code, role, location_id, version",
    )
    .bind(username)
    .bind(role)
    .bind(location_id)
    .fetch_one(&repository.pool)
    .await
    .expect("Failed to seed user");

    CurrentUser::from(&user)
}

/// Seed a category with a fresh, never-used prefix so its code sequence
/// starts at 1 for this test run.
pub async fn seed_category(ctx: &TestContext, prefix: &str) -> Uuid {
    sqlx::query_scalar("INSERT INTO categories (name, prefix) VALUES ($1, $2) RETURNING id")
        .bind(format!("Category {} {}", prefix, unique_tag()))
        .bind(prefix)
        .fetch_one(&ctx.repository.pool)
        .await
        .expect("Failed to seed category")
}

/// Create an asset through the service under a freshly seeded category
pub async fn create_asset(ctx: &TestContext, prefix: &str) -> Asset {
    let category_id = seed_category(ctx, prefix).await;
    ctx.services
        .assets
        .create(
            &ctx.admin,
            NewAsset {
                name: "ThinkPad X1".to_string(),
                specification: "14in, 32GB RAM".to_string(),
                installed_date: today(),
                category_id,
            },
        )
        .await
        .expect("Failed to create asset")
}

pub fn new_assignment(user_id: Uuid, asset_id: Uuid) -> NewAssignment {
    NewAssignment {
        user_id,
        asset_id,
        assigned_date: today(),
        note: Some("handover at reception".to_string()),
    }
}

pub fn today() -> chrono::NaiveDate {
    chrono::Utc::now().date_naive()
}

/// Short unique tag for row names
pub fn unique_tag() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

/// Fresh 4-letter category prefix, unique enough for parallel runs
pub fn unique_prefix() -> String {
    let bytes = Uuid::new_v4().into_bytes();
    bytes[..4]
        .iter()
        .map(|b| char::from(b'A' + (b % 26)))
        .collect()
}
