//! Demo scenarios, one per data model

use clap::ValueEnum;
use database::cassandra::CassandraContext;
use eyre::Result;
use tracing::info;

use crate::config::DemoSettings;

pub mod iot_sensors;
pub mod messaging;
pub mod product_catalog;
pub mod user_sessions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scenario {
    /// Time series of sensor readings partitioned by sensor
    IotSensors,
    /// Products partitioned by category with map attributes
    ProductCatalog,
    /// Conversations ordered by time-uuid with per-user read state
    Messaging,
    /// Sessions that expire through TTL
    UserSessions,
    /// Every scenario in order
    All,
}

impl Scenario {
    /// Scenarios run by `All`, in order
    pub const EACH: [Scenario; 4] = [
        Scenario::IotSensors,
        Scenario::ProductCatalog,
        Scenario::Messaging,
        Scenario::UserSessions,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Scenario::IotSensors => "IoT Sensor Data (Time Series)",
            Scenario::ProductCatalog => "Product Catalog",
            Scenario::Messaging => "Messaging System",
            Scenario::UserSessions => "User Sessions (TTL)",
            Scenario::All => "All Scenarios",
        }
    }
}

/// Runs scenarios against one connected keyspace
pub struct Demo {
    context: CassandraContext,
    settings: DemoSettings,
}

impl Demo {
    pub fn new(context: CassandraContext, settings: DemoSettings) -> Self {
        Self { context, settings }
    }

    pub async fn run(&self, scenario: Scenario) -> Result<()> {
        if scenario == Scenario::All {
            for each in Scenario::EACH {
                self.run_one(each).await?;
            }
            return Ok(());
        }
        self.run_one(scenario).await
    }

    async fn run_one(&self, scenario: Scenario) -> Result<()> {
        info!(scenario = ?scenario, keyspace = self.context.keyspace(), "Running scenario");
        println!("\n=== {} ===", scenario.title());

        match scenario {
            Scenario::IotSensors => iot_sensors::run(&self.context, &self.settings).await,
            Scenario::ProductCatalog => product_catalog::run(&self.context).await,
            Scenario::Messaging => messaging::run(&self.context).await,
            Scenario::UserSessions => user_sessions::run(&self.context).await,
            Scenario::All => Ok(()),
        }
    }
}
