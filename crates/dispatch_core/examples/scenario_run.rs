//! Run the reference city with simulated traffic and print the dispatch log.
//!
//! Run with: cargo run -p dispatch_core --example scenario_run
//! Optionally pass a scenario JSON file as the first argument. Set RUST_LOG=debug
//! for per-tick logs.

use std::time::Duration;

use dispatch_core::auto::{AutoProcessor, SharedDispatchEngine};
use dispatch_core::scenario::{build_engine, load_scenario, ScenarioParams};
use dispatch_core::simulation::TickPolicy;
use dispatch_core::{DispatchResult, OrderRequest};
use tracing_subscriber::EnvFilter;

const TICK_INTERVAL: Duration = Duration::from_millis(50);
const RUN_FOR: Duration = Duration::from_secs(2);

#[tokio::main]
async fn main() -> DispatchResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let params = match std::env::args().nth(1) {
        Some(path) => load_scenario(path)?,
        None => ScenarioParams::reference_city().with_orders(vec![
            OrderRequest::new("Alice Johnson", "Pizza Palace", 850.0, "J")
                .with_items(["Large Margherita Pizza", "Garlic Bread"]),
            OrderRequest::new("Bob Smith", "Burger King", 320.0, "E").with_items(["Whopper Meal"]),
            OrderRequest::new("Carol Davis", "Sushi Express", 1000.0, "B"),
        ]),
    };

    let mut engine = build_engine(&params)?;
    println!("--- Initial batch ---");
    for assignment in engine.process_default_batch() {
        let route: Vec<&str> = assignment
            .pickup_to_destination_path
            .iter()
            .map(|node| node.as_str())
            .collect();
        println!(
            "  order {} -> {} via {}  distance={}  eta={} min",
            assignment.order_id,
            assignment.partner_name,
            route.join(" -> "),
            assignment.total_distance,
            assignment.estimated_delivery_time_minutes,
        );
    }

    let shared = SharedDispatchEngine::new(engine);
    let policy = shared.with(|engine| TickPolicy::for_engine(engine, params.auto_process.clone()))?;
    let processor = AutoProcessor::start(shared.clone(), policy, TICK_INTERVAL);
    tokio::time::sleep(RUN_FOR).await;
    let ticks = processor.stop().await?;

    let status = shared.status()?;
    println!("--- After {ticks} simulated ticks ---");
    println!(
        "pending={} active={} completed={} cancelled={} total={}",
        status.pending, status.active, status.completed, status.cancelled, status.total_ever_created
    );
    shared.with(|engine| {
        for partner in engine.partners() {
            println!(
                "  {:<6} at {}  available={}",
                partner.name, partner.location, partner.is_available
            );
        }
    })?;
    Ok(())
}
