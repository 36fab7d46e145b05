use anyhow::Result;
use clap::Parser;
use location_injector::{
    GeoFix, InMemoryPropertyStore, InjectorConfig, LocationInjector, PropertyStore, RecordingShell,
};
use std::fs;

#[derive(Parser)]
#[command(name = "inject_demo")]
#[command(about = "Demonstrates the location injection engine against scratch sinks")]
struct Args {
    /// Latitude in decimal degrees
    #[arg(default_value_t = 37.422, allow_negative_numbers = true)]
    latitude: f64,

    /// Longitude in decimal degrees
    #[arg(default_value_t = -122.084, allow_negative_numbers = true)]
    longitude: f64,

    /// Horizontal accuracy in meters
    #[arg(short, long, default_value_t = 10.0)]
    accuracy: f64,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Scratch sinks and in-memory capabilities so the demo runs anywhere
    let temp_dir = tempfile::TempDir::new()?;
    let config = InjectorConfig {
        record_path: temp_dir.path().join("gps.conf"),
        sentence_path: temp_dir.path().join("nmea.txt"),
        command_path: temp_dir.path().join("location_command"),
        ..InjectorConfig::default()
    };

    let mut injector =
        LocationInjector::new(config, InMemoryPropertyStore::new(), RecordingShell::new());

    let fix = match GeoFix::new(args.latitude, args.longitude, args.accuracy) {
        Ok(fix) => fix,
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    };

    println!(
        "Injecting lat={} lng={} acc={}",
        args.latitude, args.longitude, args.accuracy
    );
    let report = injector.inject(&fix);
    for (sink, outcome) in report.outcomes() {
        println!("  {sink}: {outcome}");
    }

    println!();
    println!(
        "mock flag: {}",
        injector.properties().get("persist.sys.mock_location")
    );
    println!(
        "mirror:    {}",
        injector.properties().get("persist.sys.mock.location")
    );

    println!();
    println!("record ({}):", injector.store().record_path().display());
    print!("{}", fs::read_to_string(injector.store().record_path())?);

    println!();
    println!("sentence ({}):", injector.store().sentence_path().display());
    print!("{}", fs::read_to_string(injector.store().sentence_path())?);

    println!();
    println!(
        "verified: {}",
        injector.verify(args.latitude, args.longitude)
    );

    injector.stop();
    println!(
        "after stop, verified: {}",
        injector.verify(args.latitude, args.longitude)
    );
    println!("elevated commands run: {:?}", injector.shell().commands());

    Ok(())
}
