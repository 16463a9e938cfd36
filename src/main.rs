use crewdeck::api;
use crewdeck::logger::*;
use crewdeck::server::*;
use crewdeck::settings::*;
use nanoid::nanoid;
use std::sync::Arc;
use tokio::signal;
use warp::Filter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let logger = Logger::new_bootstrap();

    let mut project_settings = parse_settings(cli.settings.as_deref())?;
    if let Some(address) = cli.address {
        project_settings.http.address = address;
    }
    info!(
        address = %project_settings.http.address,
        auth_backend = %project_settings.auth.backend,
        log_filter = %project_settings.log.filter,
        "settings loaded"
    );
    logger.apply_filter(&project_settings.log.filter)?;

    let address: std::net::SocketAddr = project_settings.http.address.parse()?;
    let server = Arc::new(Server::try_new(&project_settings)?);

    let api_v1 = warp::path("api")
        .and(warp::path("v1"))
        .and(api::v1::routes(server.clone()))
        .recover(api::v1::recover_error)
        .with(warp::trace(|info| {
            tracing::info_span!(
                "request",
                method = %info.method(),
                path = %info.path(),
                request_id = %nanoid!(10),
            )
        }));

    warp::serve(api_v1)
        .bind_with_graceful_shutdown(address, async {
            signal::ctrl_c().await.expect("Could not register SIGINT");
        })
        .1
        .await;

    let shutdown_timeout = std::time::Duration::from_secs(10);
    match tokio::time::timeout(shutdown_timeout, server.shutdown()).await {
        Ok(_) => tracing::info!("server shutdown successfully"),
        Err(_) => tracing::error!("server shutdown timed out"),
    }

    Ok(())
}
