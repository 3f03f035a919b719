use anyhow::Context;

use schoolhub_api::config::ApiConfig;
use schoolhub_auth::PermissionTable;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ApiConfig::from_env().context("invalid configuration")?;
    schoolhub_observability::init(config.log_format);

    if config.uses_dev_secret() {
        tracing::warn!("JWT_SECRET not set; using insecure dev default");
    }

    let permissions = PermissionTable::school();
    tracing::info!(?permissions, "permission table loaded");

    let app = schoolhub_api::app::build_app(config.jwt_secret.clone(), permissions);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
