//! Cassandra Demo
//!
//! Four small data models on a Cassandra/ScyllaDB keyspace: sensor time
//! series, a product catalog, conversations and expiring sessions.
//! Runs as an interactive menu or one scenario at a time.

use clap::{Parser, Subcommand};
use core_config::Environment;
use core_config::tracing::{init_tracing, install_color_eyre};
use database::cassandra::{CassandraContext, check_health_detailed};
use eyre::{Result, WrapErr};
use tracing::info;

mod config;
mod menu;
mod scenarios;

use config::Config;
use scenarios::{Demo, Scenario};

#[derive(Parser)]
#[command(name = "cassandra-demo")]
#[command(about = "Cassandra data modeling demo: sensors, products, messaging and sessions")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Contact points (host:port), comma separated
    #[arg(long, value_delimiter = ',', global = true)]
    contact_points: Option<Vec<String>>,

    /// Keyspace to create and use
    #[arg(long, global = true)]
    keyspace: Option<String>,

    /// Local datacenter for load balancing
    #[arg(long, global = true)]
    datacenter: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Pick scenarios from an interactive menu (default)
    Menu,

    /// Run one scenario and exit
    Run {
        #[arg(value_enum)]
        scenario: Scenario,
    },

    /// Show cluster info and health
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    install_color_eyre();

    let cli = Cli::parse();

    let config =
        Config::from_env()?.with_overrides(cli.contact_points, cli.keyspace, cli.datacenter);
    let environment = Environment::from_env();
    init_tracing(&environment);

    println!("Cassandra Demo Application");
    println!("==========================");

    info!(
        contact_points = ?config.cassandra.contact_points,
        keyspace = config.cassandra.keyspace(),
        "Connecting to Cassandra..."
    );
    let context = CassandraContext::connect(&config.cassandra, Some(config.retry.clone()))
        .await
        .wrap_err("Cassandra connection failed")?;

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => {
            let demo = Demo::new(context, config.demo);
            menu::run(&demo).await?;
        }

        Commands::Run { scenario } => {
            let demo = Demo::new(context, config.demo);
            demo.run(scenario).await?;
        }

        Commands::Health => {
            let cluster = context.cluster_info().await?;
            println!(
                "Cluster: {}",
                cluster.cluster_name.as_deref().unwrap_or("unknown")
            );
            println!(
                "Datacenter: {}",
                cluster.datacenter.as_deref().unwrap_or("unknown")
            );
            println!("Rack: {}", cluster.rack.as_deref().unwrap_or("unknown"));
            println!(
                "Version: {}",
                cluster.release_version.as_deref().unwrap_or("unknown")
            );
            println!("Keyspace: {}", context.keyspace());
            println!("Status: {}", check_health_detailed(&context.session()).await);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_means_menu() {
        let cli = Cli::try_parse_from(["cassandra-demo"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_run_with_overrides() {
        let cli = Cli::try_parse_from([
            "cassandra-demo",
            "run",
            "messaging",
            "--contact-points",
            "10.0.0.1:9042,10.0.0.2:9042",
            "--keyspace",
            "demo_ks",
        ])
        .unwrap();

        assert!(matches!(
            cli.command,
            Some(Commands::Run {
                scenario: Scenario::Messaging
            })
        ));
        assert_eq!(cli.contact_points.unwrap().len(), 2);
        assert_eq!(cli.keyspace.as_deref(), Some("demo_ks"));
        assert!(cli.datacenter.is_none());
    }

    #[test]
    fn test_unknown_scenario_rejected() {
        assert!(Cli::try_parse_from(["cassandra-demo", "run", "graphs"]).is_err());
    }
}
