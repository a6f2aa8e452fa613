use std::{net::SocketAddr, sync::Arc};

use backend::{
    AppState, create_router,
    models::Algorithm,
    planner::{DEFAULT_MAX_VERTICES, PlannerConfig, RoutePlanner},
};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Parser)]
#[command(author, version, about = "HTTP server for waypoint route planning")]
struct Args {
    /// Listen address; falls back to $ROUTE_ADDR, then 0.0.0.0:8080
    #[arg(long)]
    addr: Option<SocketAddr>,

    /// Largest waypoint graph a single request may build
    #[arg(long, default_value_t = DEFAULT_MAX_VERTICES)]
    max_vertices: usize,

    /// Algorithm used when a request does not name one
    #[arg(long, default_value = "a-star")]
    default_algorithm: Algorithm,
}

impl Args {
    fn listen_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        match self.addr {
            Some(addr) => Ok(addr),
            None => std::env::var("ROUTE_ADDR")
                .unwrap_or_else(|_| DEFAULT_ADDR.to_string())
                .parse(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "backend=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let planner = RoutePlanner::new(PlannerConfig {
        max_vertices: args.max_vertices,
        default_algorithm: args.default_algorithm,
    });
    tracing::info!("route planner ready: {:?}", planner.config());

    let state = AppState {
        planner: Arc::new(planner),
    };
    let app = create_router(state);

    let addr = args.listen_addr()?;
    tracing::info!("starting backend on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
