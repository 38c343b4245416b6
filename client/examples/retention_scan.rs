//! Log in, run the retention scan and draft a message for each absentee.
//!
//! Usage: cargo run -p shepherd-client --example retention_scan -- <email> <password>

use shepherd_client::outreach::first_name;
use shepherd_client::{ClientConfig, OutreachConfig, OutreachDrafter, Store, DEFAULT_DAYS_ABSENT};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        println!("Usage: {} <email> <password>", args[0]);
        println!("  Example: {} admin@shepherd.local secret", args[0]);
        return Ok(());
    }

    let config = ClientConfig::from_env();
    let mut client = config.build_http_client()?;
    let login = client.login(&args[1], &args[2]).await?;
    tracing::info!("Logged in as: {} ({})", login.user.email, login.user.role.as_str());

    let store = Store::connect(client).await;
    let report = store.snapshot().retention_scan();

    tracing::info!("Checked services on: {}", report.service_dates.join(", "));
    if report.absentees.is_empty() {
        tracing::info!("No active members missed the recent services");
        return Ok(());
    }

    let drafter = OutreachDrafter::new(OutreachConfig::from_env())?;
    for absentee in &report.absentees {
        let name = first_name(&absentee.member.full_name);
        let message = drafter.draft(name, DEFAULT_DAYS_ABSENT).await;
        println!("--- {} ({}) ---", absentee.member.full_name, absentee.member.phone);
        println!("{}\n", message);
    }

    Ok(())
}
