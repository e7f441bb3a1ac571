//! Interactive scenario menu on stdin/stdout

use eyre::{Report, Result};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::error;

use crate::scenarios::{Demo, Scenario};

pub const MENU: &str = "\nSelect a use case to run:
1. IoT Sensor Data (Time Series)
2. Product Catalog
3. Messaging System
4. User Sessions
5. Run all
6. Exit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Run(Scenario),
    Exit,
}

pub fn parse_choice(input: &str) -> Option<MenuChoice> {
    match input.trim() {
        "1" => Some(MenuChoice::Run(Scenario::IotSensors)),
        "2" => Some(MenuChoice::Run(Scenario::ProductCatalog)),
        "3" => Some(MenuChoice::Run(Scenario::Messaging)),
        "4" => Some(MenuChoice::Run(Scenario::UserSessions)),
        "5" => Some(MenuChoice::Run(Scenario::All)),
        "6" => Some(MenuChoice::Exit),
        _ => None,
    }
}

/// Full report of a failed scenario: message, cause chain, location and span trace
pub fn failure_report(error: &Report) -> String {
    format!("An error occurred: {:?}", error)
}

/// Loop until the user exits or stdin closes
///
/// A failing scenario is reported and the menu comes back.
pub async fn run(demo: &Demo) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        println!("{}", MENU);
        print!("Enter your choice (1-6): ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };

        match parse_choice(&line) {
            Some(MenuChoice::Exit) => break,
            Some(MenuChoice::Run(scenario)) => {
                if let Err(e) = demo.run(scenario).await {
                    error!(scenario = ?scenario, error = %e, "Scenario failed");
                    eprintln!("{}", failure_report(&e));
                }
            }
            None => println!("Invalid choice. Please try again."),
        }
    }

    println!("Exiting application...");
    Ok(())
}
