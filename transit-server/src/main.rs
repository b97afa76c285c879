use std::error::Error;
use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use geojson::{FeatureCollection, GeoJson};
use tracing::info;
use tracing_subscriber::EnvFilter;

use transit_server::cache::{CacheConfig, PlanCache};
use transit_server::network::{NetworkModel, Weighting};
use transit_server::planner::PlannerConfig;
use transit_server::web::{AppState, create_router};

/// Transit trip planner.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a network model from a GeoJSON collection of routes
    Generate {
        /// GeoJSON FeatureCollection of lines and tricycle zones
        routes: PathBuf,

        /// Where to write the model
        output: PathBuf,

        /// Edge weighting: walkability, distance or fare
        #[clap(default_value = "distance")]
        weighting: Weighting,
    },

    /// Serve trip searches over HTTP
    Serve {
        /// Network model produced by `generate`
        #[clap(long, env = "TRANSIT_MODEL", default_value = "network.json")]
        model: PathBuf,

        /// Address to listen on
        #[clap(long, env = "TRANSIT_ADDR", default_value = "127.0.0.1:3000")]
        addr: SocketAddr,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match Cli::parse().command {
        Command::Generate {
            routes,
            output,
            weighting,
        } => generate(routes, output, weighting),
        Command::Serve { model, addr } => serve(model, addr).await,
    }
}

fn generate(routes: PathBuf, output: PathBuf, weighting: Weighting) -> Result<(), Box<dyn Error>> {
    let text = std::fs::read_to_string(&routes)?;
    let collection = FeatureCollection::try_from(text.parse::<GeoJson>()?)?;
    info!(routes = %routes.display(), features = collection.features.len(), ?weighting, "importing routes");

    let model = NetworkModel::from_feature_collection(&collection, weighting, &PlannerConfig::default())?;
    model.save(&output)?;
    info!(output = %output.display(), nodes = model.graph().len(), "saved network model");
    Ok(())
}

async fn serve(model: PathBuf, addr: SocketAddr) -> Result<(), Box<dyn Error>> {
    let model = NetworkModel::load(&model)?;
    let state = AppState::new(
        model,
        PlannerConfig::default(),
        PlanCache::new(&CacheConfig::default()),
    );
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "transit planner listening");
    info!("GET /health  - Health check");
    info!("GET /find    - Find trips (src=lat,lon&dest=lat,lon&priority=FARE|DISTANCE|TRANSFERS)");
    info!("GET /network - Route network as GeoJSON");

    axum::serve(listener, app).await?;
    Ok(())
}
