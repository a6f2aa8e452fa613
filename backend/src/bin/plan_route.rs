use backend::{
    models::{Algorithm, Endpoint, RouteOptions, TransportMode},
    planner::RoutePlanner,
};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Compute a route between two points and print it as JSON"
)]
struct Args {
    #[arg(long, allow_hyphen_values = true)]
    from_lat: f64,
    #[arg(long, allow_hyphen_values = true)]
    from_lng: f64,
    #[arg(long, allow_hyphen_values = true)]
    to_lat: f64,
    #[arg(long, allow_hyphen_values = true)]
    to_lng: f64,

    /// One of a-star, dijkstra, bfs, dfs
    #[arg(long, default_value = "a-star")]
    algorithm: Algorithm,

    /// One of driving, flying, walking, transit
    #[arg(long, default_value = "driving")]
    mode: TransportMode,

    /// Override the transport mode's default speed (km/h)
    #[arg(long)]
    avg_speed: Option<f64>,

    #[arg(long)]
    avoid_highways: bool,
    #[arg(long)]
    avoid_tolls: bool,
    #[arg(long)]
    scenic: bool,
    #[arg(long)]
    fastest: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

impl Args {
    fn options(&self) -> RouteOptions {
        RouteOptions {
            avoid_highways: self.avoid_highways,
            avoid_tolls: self.avoid_tolls,
            scenic: self.scenic,
            fastest_route: self.fastest,
            transport_mode: self.mode,
            avg_speed_kmh: self.avg_speed,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let source = Endpoint::new(args.from_lat, args.from_lng);
    let destination = Endpoint::new(args.to_lat, args.to_lng);

    let planner = RoutePlanner::default();
    let route = planner.compute_route(&source, &destination, args.algorithm, &args.options())?;

    let json = if args.pretty {
        serde_json::to_string_pretty(&route)?
    } else {
        serde_json::to_string(&route)?
    };
    println!("{json}");

    Ok(())
}
