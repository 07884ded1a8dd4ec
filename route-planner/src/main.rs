use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use route_planner::network::load_network;
use route_planner::planner::{PlannerConfig, RailGraph, RoutePlanner};
use route_planner::web::{AppState, ItineraryResult, create_router};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: route-planner [<start_lat> <start_lon> <end_lat> <end_lon>]";

/// Where to read data from and where to listen.
struct DataConfig {
    data_dir: PathBuf,
    addr: SocketAddr,
}

impl DataConfig {
    /// Read `ROUTE_PLANNER_DATA_DIR` (default `data`) and
    /// `ROUTE_PLANNER_ADDR` (default `127.0.0.1:3000`).
    fn from_env() -> Self {
        let data_dir = std::env::var("ROUTE_PLANNER_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data"));

        let default_addr = SocketAddr::from(([127, 0, 0, 1], 3000));
        let addr = match std::env::var("ROUTE_PLANNER_ADDR") {
            Ok(raw) => raw.parse().unwrap_or_else(|e| {
                warn!(%raw, error = %e, "invalid ROUTE_PLANNER_ADDR; using default");
                default_addr
            }),
            Err(_) => default_addr,
        };

        Self { data_dir, addr }
    }
}

fn parse_coordinates(args: &[String]) -> Option<[f64; 4]> {
    let values: Vec<f64> = args.iter().map(|a| a.parse().ok()).collect::<Option<_>>()?;
    values.try_into().ok()
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let coordinates = match args.len() {
        0 => None,
        4 => match parse_coordinates(&args) {
            Some(c) => Some(c),
            None => {
                eprintln!("coordinates must be decimal degrees\n{USAGE}");
                return ExitCode::from(2);
            }
        },
        _ => {
            eprintln!("{USAGE}");
            return ExitCode::from(2);
        }
    };

    let config = DataConfig::from_env();
    let data = match load_network(&config.data_dir) {
        Ok((data, _report)) => data,
        Err(e) => {
            error!(dir = %config.data_dir.display(), error = %e, "failed to load network data");
            return ExitCode::FAILURE;
        }
    };
    let planner = RoutePlanner::new(
        Arc::new(data),
        RailGraph::punggol_lrt(),
        PlannerConfig::default(),
    );

    match coordinates {
        Some([start_lat, start_lon, end_lat, end_lon]) => {
            let itinerary = match planner.plan_route(start_lat, start_lon, end_lat, end_lon) {
                Ok(itinerary) => itinerary,
                Err(e) => {
                    error!(error = %e, "planning failed");
                    return ExitCode::FAILURE;
                }
            };
            match serde_json::to_string_pretty(&ItineraryResult::from_itinerary(&itinerary)) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    error!(error = %e, "failed to serialize itinerary");
                    return ExitCode::FAILURE;
                }
            }
            ExitCode::SUCCESS
        }
        None => serve(planner, config.addr).await,
    }
}

async fn serve(planner: RoutePlanner, addr: SocketAddr) -> ExitCode {
    let app = create_router(AppState::new(planner));

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(%addr, error = %e, "failed to bind");
            return ExitCode::FAILURE;
        }
    };
    info!("route planner listening on http://{addr}");
    info!("  GET /health  - Health check");
    info!("  GET /route?start_lat=&start_lon=&end_lat=&end_lon=  - Plan a route");

    if let Err(e) = axum::serve(listener, app).await {
        error!(error = %e, "server error");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
