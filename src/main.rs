//! route-transit command line.
//!
//! Loads a route hierarchy from a TOML file and either checks it, prints an
//! ancestor chain, or replays a sequence of navigations with hooks that log
//! every level they touch.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use route_transit::config::load_config;
use route_transit::observability::logging::init_logging;
use route_transit::routing::{
    CleanupOptions, NavigationArgs, Route, RouteRegistry, TracingHooks, TransitionDriver,
};

#[derive(Parser)]
#[command(name = "route-transit")]
#[command(about = "Inspect route hierarchies and replay navigations", long_about = None)]
struct Cli {
    /// Route hierarchy file.
    #[arg(short, long, default_value = "routes.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the hierarchy
    Check,
    /// Print the ancestor chain of a route type
    Chain {
        route_type: String,
    },
    /// Navigate through the listed route types in order
    Navigate {
        /// Route types to visit; repeat a name to revisit with a new instance
        #[arg(required = true)]
        route_types: Vec<String>,

        /// Argument passed to every navigation (repeatable)
        #[arg(short, long = "arg")]
        args: Vec<String>,

        /// Tear down every level on each navigation
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)?;
    init_logging(&config.observability)?;

    let registry = Arc::new(
        RouteRegistry::builder()
            .with_config(&config)
            .fallback_hooks(Arc::new(TracingHooks))
            .build()?,
    );

    tracing::info!(
        config = %cli.config.display(),
        route_types = registry.len() - 1,
        "Route hierarchy loaded"
    );

    match cli.command {
        Commands::Check => {
            println!("ok: {} route types", registry.len() - 1);
        }
        Commands::Chain { route_type } => {
            let route = Route::new(&registry, &route_type)?;
            println!("{}", registry.chain_names(route.route_type()).join(" → "));
        }
        Commands::Navigate {
            route_types,
            args,
            force,
        } => {
            let driver = TransitionDriver::new(registry.clone());
            let options = if force {
                CleanupOptions::forced()
            } else {
                CleanupOptions::default()
            };

            for name in route_types {
                let route = Arc::new(Route::new(&registry, &name)?);
                let transition = driver
                    .navigate_with(route, NavigationArgs::new(args.clone()), options)
                    .await?;
                println!(
                    "→ {name}: cleaned [{}] executed [{}]",
                    transition.cleaned.join(", "),
                    transition.executed.join(", ")
                );
            }
        }
    }

    Ok(())
}
