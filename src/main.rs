mod admin;
mod app;
mod auth;
mod cart;
mod catalog;
mod config;
mod error;
mod notify;
mod reviews;
mod state;
mod storage;
mod store;
mod users;
mod verification;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "imperius=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let (state, db) = state::AppState::init().await?;

    sqlx::migrate!("./migrations").run(&db).await?;

    app::serve(app::build_app(state)).await
}
