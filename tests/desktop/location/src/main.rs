//! Desktop demo for geotracker-acquisition.
//!
//! Run with: cargo run -p geotracker-location-demo

use geotracker_acquisition::{
    AcquisitionContext, AcquisitionController, Affordance, SettingsLink, Snapshot,
};
use geotracker_location::SystemLocation;
use geotracker_permission::SystemPermission;

fn print_snapshot(snapshot: &Snapshot) {
    let busy = if snapshot.busy { " (busy)" } else { "" };
    println!("Status: {:?}{busy}", snapshot.status);
    if let Some(fix) = snapshot.coordinates {
        println!("  Latitude:  {:.6}°", fix.latitude);
        println!("  Longitude: {:.6}°", fix.longitude);
        if let Some(acc) = fix.accuracy_meters {
            println!("  Accuracy:  {acc:.1}m");
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    println!("=== GeoTracker Location Demo ===\n");

    let controller = AcquisitionController::new(SystemPermission, SystemLocation, SystemLocation);
    let updates = controller.subscribe();

    println!("Acquiring location (startup)...");
    controller.acquire(AcquisitionContext::startup()).await;

    while let Ok(snapshot) = updates.try_recv() {
        print_snapshot(&snapshot);
    }

    let snapshot = controller.snapshot();
    let region = snapshot.region;
    println!(
        "\nMap region: ({:.5}, {:.5}) span {:.4}° x {:.4}°",
        region.center_lat, region.center_lon, region.lat_span_deg, region.lon_span_deg
    );

    match snapshot.status.affordance() {
        Affordance::OpenSettings => {
            println!("✗ Permission denied. Open settings: {:?}", SettingsLink::current());
        }
        Affordance::Retry => println!("✗ Location is off. Turn it on and retry."),
        Affordance::ShowMessage => {
            println!(
                "✗ {}",
                snapshot.message.as_deref().unwrap_or("Unknown error")
            );
        }
        Affordance::None => println!("✓ {}", snapshot.status.action_label()),
    }
}
