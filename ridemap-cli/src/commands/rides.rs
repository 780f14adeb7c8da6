//! Rides command - list mock rides or providers.

use std::time::Duration;

use console::style;
use ridemap::rides::{MockRideApi, Provider, Ride, RideApi};

use crate::error::CliError;
use crate::runner::CliRunner;

/// Run the rides command.
pub fn run(providers: bool, delay_ms: Option<u64>, verbose: bool) -> Result<(), CliError> {
    let runner = CliRunner::new(verbose)?;
    runner.log_startup("rides");

    let delay = Duration::from_millis(delay_ms.unwrap_or(runner.config().api.mock_delay_ms));
    let api = MockRideApi::new(delay);

    if providers {
        let list = runner.runtime().block_on(api.fetch_providers())?;
        print_providers(&list);
    } else {
        let list = runner.runtime().block_on(api.fetch_rides())?;
        print_rides(&list);
    }
    Ok(())
}

fn print_rides(rides: &[Ride]) {
    println!("Rides");
    println!("─────");
    for ride in rides {
        println!(
            "{}  {}  ₹{:.2}  {:.1} km  {}",
            style(&ride.id).bold(),
            ride.requested_at.format("%Y-%m-%d %H:%M"),
            ride.fare,
            ride.distance_km,
            style(ride.status.label()).cyan()
        );
        println!("    from {} ({})", ride.pickup.name, ride.pickup.coordinate.display_lat_lng());
        println!(
            "    to   {} ({})",
            ride.destination.name,
            ride.destination.coordinate.display_lat_lng()
        );
    }
}

fn print_providers(providers: &[Provider]) {
    println!("Nearby providers");
    println!("────────────────");
    for p in providers {
        println!(
            "{:<8} {:<6} ★ {:.1}  {} min  ({})",
            style(&p.name).bold(),
            format!("{:?}", p.vehicle).to_lowercase(),
            p.rating,
            p.eta_minutes,
            p.location.display_lat_lng()
        );
    }
}
