use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use location_injector::{
    CommandDaemon, GeoFix, InjectorConfig, LocationInjector, SuShell, SystemPropertyStore,
    DEFAULT_POLL_SECS, DEFAULT_REFRESH_SECS,
};

fn build_command() -> Command {
    Command::new("location-injector")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(concat!(
            env!("CARGO_PKG_VERSION"),
            " (",
            env!("VERGEN_GIT_SHA"),
            " ",
            env!("VERGEN_GIT_COMMIT_DATE"),
            ")"
        ))
        .about("Publish fabricated GPS positions on a rooted device: mock-location mode, property mirror, GPS record file, and NMEA sentence file.")
        .arg(
            Arg::new("debug")
                .long("debug")
                .help("Enable debug output and detailed sink information")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("record-file")
                .long("record-file")
                .help("Path of the key=value record sink (default: /data/misc/location/gps.conf)")
                .value_name("PATH")
                .global(true),
        )
        .arg(
            Arg::new("sentence-file")
                .long("sentence-file")
                .help("Path of the NMEA sentence sink (default: /data/misc/location/nmea.txt)")
                .value_name("PATH")
                .global(true),
        )
        .arg(
            Arg::new("command-file")
                .long("command-file")
                .help("Path of the daemon command drop file (default: /data/local/tmp/location_command)")
                .value_name("PATH")
                .global(true),
        )
        .subcommand(inject_subcommand())
        .subcommand(
            Command::new("verify")
                .about("Check whether an injected position is currently visible")
                .arg(latitude_arg())
                .arg(longitude_arg()),
        )
        .subcommand(
            Command::new("stop")
                .about("Clear the mock-location flag and kill the injector daemon"),
        )
        .subcommand(
            Command::new("start-daemon")
                .about("Launch the injector daemon through an elevated shell")
                .arg(
                    Arg::new("daemon-path")
                        .help("Path of the daemon executable on the device")
                        .required(true),
                )
                .arg(
                    Arg::new("package")
                        .long("package")
                        .help("Package name owning the daemon classpath")
                        .value_name("NAME")
                        .required(true),
                ),
        )
        .subcommand(
            Command::new("daemon")
                .about("Run the command-file poll loop in the foreground")
                .arg(
                    Arg::new("poll-secs")
                        .long("poll-secs")
                        .help("Seconds between command-file polls (default: 1)")
                        .value_name("SECS")
                        .value_parser(value_parser!(u64)),
                )
                .arg(
                    Arg::new("refresh-secs")
                        .long("refresh-secs")
                        .help("Seconds between re-publishes of the current fix, 0 disables (default: 6)")
                        .value_name("SECS")
                        .value_parser(value_parser!(u64)),
                ),
        )
        .subcommand(
            Command::new("check-root")
                .about("Probe whether su grants root access"),
        )
}

fn inject_subcommand() -> Command {
    let command = Command::new("inject")
        .about("Inject a fabricated position into every sink")
        .arg(latitude_arg())
        .arg(longitude_arg())
        .arg(
            Arg::new("accuracy")
                .long("accuracy")
                .help("Horizontal accuracy in meters")
                .value_name("METERS")
                .default_value("10.0")
                .value_parser(value_parser!(f64)),
        );

    #[cfg(feature = "json")]
    let command = command.arg(
        Arg::new("json")
            .long("json")
            .help("Print the injection report as JSON")
            .action(ArgAction::SetTrue),
    );

    command
}

fn latitude_arg() -> Arg {
    Arg::new("latitude")
        .help("Latitude in decimal degrees, negative south")
        .required(true)
        .allow_negative_numbers(true)
        .value_parser(value_parser!(f64))
}

fn longitude_arg() -> Arg {
    Arg::new("longitude")
        .help("Longitude in decimal degrees, negative west")
        .required(true)
        .allow_negative_numbers(true)
        .value_parser(value_parser!(f64))
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn config_from_matches(matches: &ArgMatches) -> InjectorConfig {
    let mut config = InjectorConfig::default();
    if let Some(path) = matches.get_one::<String>("record-file") {
        config.record_path = PathBuf::from(path);
    }
    if let Some(path) = matches.get_one::<String>("sentence-file") {
        config.sentence_path = PathBuf::from(path);
    }
    if let Some(path) = matches.get_one::<String>("command-file") {
        config.command_path = PathBuf::from(path);
    }
    config
}

fn device_injector(config: InjectorConfig) -> LocationInjector<SystemPropertyStore, SuShell> {
    LocationInjector::new(config, SystemPropertyStore::new(), SuShell::new())
}

fn main() -> Result<()> {
    let matches = build_command().get_matches();
    init_logging(matches.get_flag("debug"));

    let config = config_from_matches(&matches);

    match matches.subcommand() {
        Some(("inject", sub)) => run_inject(config, sub),
        Some(("verify", sub)) => run_verify(config, sub),
        Some(("stop", _)) => run_stop(config),
        Some(("start-daemon", sub)) => run_start_daemon(config, sub),
        Some(("daemon", sub)) => run_daemon(config, sub),
        Some(("check-root", _)) => run_check_root(),
        _ => {
            build_command().print_help()?;
            println!();
            Ok(())
        }
    }
}

fn run_inject(config: InjectorConfig, matches: &ArgMatches) -> Result<()> {
    let latitude = *matches
        .get_one::<f64>("latitude")
        .context("latitude is required")?;
    let longitude = *matches
        .get_one::<f64>("longitude")
        .context("longitude is required")?;
    let accuracy = *matches
        .get_one::<f64>("accuracy")
        .context("accuracy has a default")?;

    let fix = GeoFix::new(latitude, longitude, accuracy)?;
    let mut injector = device_injector(config);
    let report = injector.inject(&fix);

    #[cfg(feature = "json")]
    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for (sink, outcome) in report.outcomes() {
        println!("{}: {}", sink, outcome);
    }
    if !report.all_written() {
        eprintln!("Warning: some sinks were not written");
    }
    Ok(())
}

fn run_verify(config: InjectorConfig, matches: &ArgMatches) -> Result<()> {
    let latitude = *matches
        .get_one::<f64>("latitude")
        .context("latitude is required")?;
    let longitude = *matches
        .get_one::<f64>("longitude")
        .context("longitude is required")?;

    let injector = device_injector(config);
    if injector.verify(latitude, longitude) {
        println!("verified: injected position is visible");
        Ok(())
    } else {
        println!("not verified");
        std::process::exit(1);
    }
}

fn run_stop(config: InjectorConfig) -> Result<()> {
    let mut injector = device_injector(config);
    injector.stop();
    println!("injection stopped");
    Ok(())
}

fn run_start_daemon(config: InjectorConfig, matches: &ArgMatches) -> Result<()> {
    let daemon_path = matches
        .get_one::<String>("daemon-path")
        .map(PathBuf::from)
        .context("daemon-path is required")?;
    let package = matches
        .get_one::<String>("package")
        .context("package is required")?;

    let injector = device_injector(config);
    match injector.start_daemon(&daemon_path, package) {
        Ok(()) => {
            println!("daemon started");
            Ok(())
        }
        Err(err) => {
            eprintln!("Error: failed to start daemon: {err}");
            std::process::exit(1);
        }
    }
}

fn run_daemon(config: InjectorConfig, matches: &ArgMatches) -> Result<()> {
    let poll_secs = matches
        .get_one::<u64>("poll-secs")
        .copied()
        .unwrap_or(DEFAULT_POLL_SECS);
    let refresh_secs = matches
        .get_one::<u64>("refresh-secs")
        .copied()
        .unwrap_or(DEFAULT_REFRESH_SECS);

    let injector = device_injector(config);
    let mut daemon = CommandDaemon::new(injector, poll_secs, refresh_secs);
    daemon.run();
    Ok(())
}

fn run_check_root() -> Result<()> {
    let shell = SuShell::new();
    if shell.check_root() {
        println!("root access available");
        Ok(())
    } else {
        println!("root access not available");
        std::process::exit(1);
    }
}
