//! Integration tests for the injection engine
//!
//! Drives the engine end to end against in-memory properties, a
//! recording shell, and temp-dir sinks: inject/verify/stop flows,
//! per-sink failure reporting, and daemon launch.

use location_injector::{
    GeoFix, InMemoryPropertyStore, InjectionState, InjectorConfig, InjectorError,
    LocationInjector, PropertyStore, RecordingShell,
};
use std::fs;
use tempfile::TempDir;

fn test_config(temp_dir: &TempDir) -> InjectorConfig {
    InjectorConfig {
        record_path: temp_dir.path().join("gps.conf"),
        sentence_path: temp_dir.path().join("nmea.txt"),
        command_path: temp_dir.path().join("location_command"),
        ..InjectorConfig::default()
    }
}

fn test_injector(
    temp_dir: &TempDir,
) -> LocationInjector<InMemoryPropertyStore, RecordingShell> {
    LocationInjector::new(
        test_config(temp_dir),
        InMemoryPropertyStore::new(),
        RecordingShell::new(),
    )
}

fn test_fix() -> GeoFix {
    GeoFix::with_timestamp(37.422, -122.084, 5.0, 1_700_000_000).expect("valid test fix")
}

#[test]
fn test_inject_writes_every_sink() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut injector = test_injector(&temp_dir);

    let report = injector.inject(&test_fix());
    assert!(report.all_written(), "every sink should be written");

    assert_eq!(
        injector.properties().get("persist.sys.mock_location"),
        "1",
        "mock-allowed flag should be forced on"
    );
    assert_eq!(
        injector.properties().get("persist.sys.mock.location"),
        "37.422000,-122.084000,5.000000",
        "mirror property should carry the six-decimal triple"
    );

    let record = fs::read_to_string(temp_dir.path().join("gps.conf"))
        .expect("Failed to read record sink");
    assert!(record.contains("latitude=37.422000"));
    assert!(record.contains("longitude=-122.084000"));
    assert!(record.contains("provider=gps"));

    let sentence = fs::read_to_string(temp_dir.path().join("nmea.txt"))
        .expect("Failed to read sentence sink");
    assert!(
        sentence.starts_with("$GPGGA,") && sentence.ends_with("\r\n"),
        "sentence sink should hold a framed GGA sentence"
    );

    assert_eq!(injector.state(), InjectionState::Injected);
}

#[test]
fn test_verify_after_inject() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut injector = test_injector(&temp_dir);

    injector.inject(&test_fix());
    assert!(
        injector.verify(37.422, -122.084),
        "verification should see the injected coordinates"
    );
}

#[test]
fn test_verify_fresh_engine_is_false() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let injector = test_injector(&temp_dir);

    assert!(
        !injector.verify(37.422, -122.084),
        "nothing injected yet, verification must fail"
    );
}

#[test]
fn test_verify_fails_for_different_coordinates() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut injector = test_injector(&temp_dir);

    injector.inject(&test_fix());
    assert!(
        !injector.verify(48.8566, 2.3522),
        "other coordinates should not verify"
    );
}

#[test]
fn test_verify_gate_on_mock_flag_value() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut injector = test_injector(&temp_dir);
    injector.inject(&test_fix());

    injector
        .properties_mut()
        .insert("persist.sys.mock_location", "0");
    assert!(
        !injector.verify(37.422, -122.084),
        "a cleared flag should fail verification even with the record present"
    );

    // Any non-empty value other than "0" passes the gate
    injector
        .properties_mut()
        .insert("persist.sys.mock_location", "true");
    assert!(
        injector.verify(37.422, -122.084),
        "a non-zero flag value should pass the gate"
    );
}

#[test]
fn test_inject_reports_property_sink_failures() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut properties = InMemoryPropertyStore::new();
    properties.fail_writes(true);
    let mut injector = LocationInjector::new(
        test_config(&temp_dir),
        properties,
        RecordingShell::new(),
    );

    let report = injector.inject(&test_fix());

    assert!(!report.mock_flag.is_written(), "flag write should fail");
    assert!(
        !report.location_mirror.is_written(),
        "mirror write should fail"
    );
    assert!(
        report.record_file.is_written(),
        "file sinks should still be written"
    );
    assert!(report.sentence_file.is_written());
    assert!(!report.all_written());

    assert!(
        !injector.verify(37.422, -122.084),
        "verification should fail because the flag never landed"
    );
    assert_eq!(
        injector.state(),
        InjectionState::Injected,
        "engine still considers itself injected after partial failure"
    );
}

#[test]
fn test_inject_reports_record_sink_failure() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let blocker = temp_dir.path().join("blocker");
    fs::write(&blocker, "not a directory").expect("Failed to create blocker file");

    let mut config = test_config(&temp_dir);
    config.record_path = blocker.join("gps.conf");
    let mut injector =
        LocationInjector::new(config, InMemoryPropertyStore::new(), RecordingShell::new());

    let report = injector.inject(&test_fix());

    assert!(
        !report.record_file.is_written(),
        "record sink under a file should fail"
    );
    assert!(
        report.sentence_file.is_written(),
        "sentence sink should still be written after a record failure"
    );
    assert!(report.mock_flag.is_written());
}

#[test]
fn test_stop_clears_flag_and_kills_daemon() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut injector = test_injector(&temp_dir);
    injector.inject(&test_fix());

    assert!(injector.stop(), "stop always reports success");

    assert_eq!(
        injector.properties().get("persist.sys.mock_location"),
        "0",
        "stop should clear the mock-allowed flag"
    );
    assert_eq!(
        injector.shell().commands(),
        vec!["pkill -f location_injector"],
        "stop should kill the daemon by process name"
    );
    assert_eq!(injector.state(), InjectionState::Idle);
    assert!(
        !injector.verify(37.422, -122.084),
        "verification must fail after teardown"
    );
}

#[test]
fn test_stop_reports_success_even_when_shell_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut injector = LocationInjector::new(
        test_config(&temp_dir),
        InMemoryPropertyStore::new(),
        RecordingShell::failing(),
    );

    assert!(injector.stop(), "teardown is best effort");
    assert_eq!(injector.state(), InjectionState::Idle);
}

#[test]
fn test_start_daemon_missing_executable() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let injector = test_injector(&temp_dir);

    let result = injector.start_daemon(&temp_dir.path().join("no_such_daemon"), "com.example.app");

    assert!(
        matches!(result, Err(InjectorError::NotFound(_))),
        "missing executable should report NotFound"
    );
    assert!(
        injector.shell().commands().is_empty(),
        "no launch attempt should be made for a missing executable"
    );
}

#[test]
fn test_start_daemon_composes_launch_command() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let injector = test_injector(&temp_dir);

    let daemon_path = temp_dir.path().join("injector_daemon");
    fs::write(&daemon_path, "#!/system/bin/sh\n").expect("Failed to create daemon stub");

    injector
        .start_daemon(&daemon_path, "com.example.app")
        .expect("daemon launch should succeed");

    assert_eq!(
        injector.shell().commands(),
        vec![
            "CLASSPATH=/data/app/com.example.app-*/base.apk /system/bin/app_process \
             /system/bin location_injector com.example.app"
        ],
        "launch command should run the daemon under app_process"
    );

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(&daemon_path)
            .expect("Failed to stat daemon stub")
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o755, "daemon should be marked executable");
    }
}

#[test]
fn test_start_daemon_propagates_shell_failure() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let injector = LocationInjector::new(
        test_config(&temp_dir),
        InMemoryPropertyStore::new(),
        RecordingShell::failing(),
    );

    let daemon_path = temp_dir.path().join("injector_daemon");
    fs::write(&daemon_path, "#!/system/bin/sh\n").expect("Failed to create daemon stub");

    let result = injector.start_daemon(&daemon_path, "com.example.app");
    assert!(
        matches!(result, Err(InjectorError::PermissionDenied(_))),
        "a refused launch should surface the shell error"
    );
}
