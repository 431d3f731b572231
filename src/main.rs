use dotenvy::dotenv;
use tracing::info;

use std::net::SocketAddr;
use waitlist_api::infra::{
    app::create_router,
    config::AppConfig,
    setup::{init_app_state, init_tracing},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = AppConfig::from_env();
    // Before the store opens, so migration and startup logs are kept.
    init_tracing(&config.log_file);

    let app_state = init_app_state(config).await?;

    let bind_addr = app_state.config.bind_addr;

    let app = create_router(app_state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    info!("Waitlist API listening at {}", &listener.local_addr()?);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
