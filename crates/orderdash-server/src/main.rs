use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use orderdash_server::state::AppState;

/// `orderdash health` - liveness probe for container health checks.
///
/// Calls `GET http://localhost:$ORDERDASH_PORT/health`.
/// Exits 0 if the server responds with HTTP 200, exits 1 otherwise.
fn run_health_check() -> ! {
    let port = std::env::var("ORDERDASH_PORT").unwrap_or_else(|_| "3000".to_string());
    let url = format!("http://localhost:{}/health", port);
    match ureq::get(&url).call() {
        Ok(resp) if resp.status() == 200 => std::process::exit(0),
        _ => std::process::exit(1),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.get(1).map(|s| s.as_str()) == Some("health") {
        run_health_check();
    }
    // Structured JSON logging. Level controlled via RUST_LOG env var.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("orderdash=info".parse()?),
        )
        .json()
        .init();

    let cfg = orderdash_core::config::Config::from_env()?;
    let state = Arc::new(AppState::new(cfg.clone()));

    // Spawn before seeding so the demo snapshot is logged like any other.
    {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            state.run_snapshot_watch_loop().await;
        });
    }

    if cfg.seed_demo {
        let demo = orderdash_server::seed::demo_data(chrono::Utc::now(), &mut rand::thread_rng());
        info!(
            orders = demo.orders.len(),
            products = demo.products.len(),
            users = demo.users.len(),
            "Seeding demo snapshot"
        );
        state.replace_products(demo.products);
        state.replace_users(demo.users);
        state.replace_orders(demo.orders);
    } else {
        info!("Waiting for the first snapshot on PUT /api/snapshot/{{collection}}");
    }

    let addr = format!("0.0.0.0:{}", cfg.port);
    let app = orderdash_server::app::build_app(Arc::clone(&state));

    info!(
        port = cfg.port,
        timezone = %cfg.timezone,
        dashboard_days = cfg.dashboard_days,
        "orderdash listening on {}",
        addr
    );

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    Ok(())
}
