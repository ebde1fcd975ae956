//! Configuration and data file loading against real files.

mod common;

use std::fs;
use std::path::Path;

use common::*;
use snmp_sim::config::{AppConfig, LogLevel, json_files, load_custom_dir, load_device, read_custom_list};
use snmp_sim::store::build_store;
use snmp_sim::{Error, Value};
use tempfile::TempDir;

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

#[test]
fn app_config_from_file() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "appconfig.json",
        r#"{
            "Server": { "IpAddress": "127.0.0.1", "Port": 1161, "Community": "secret" },
            "Paths": { "DevicesDirectory": "devs", "CustomDirectory": "extra" },
            "Logging": { "LogLevel": "Debug", "LogToConsole": false, "LogToFile": true, "LogFilePath": "out.log" }
        }"#,
    );

    let config = AppConfig::load(dir.path().join("appconfig.json")).unwrap();
    assert_eq!(config.server.bind_addr().unwrap().to_string(), "127.0.0.1:1161");
    assert_eq!(config.server.community, "secret");
    assert_eq!(config.paths.custom_directory, Path::new("extra"));
    assert_eq!(config.logging.log_level, LogLevel::Debug);
    assert!(config.logging.log_to_file);
}

#[test]
fn app_config_missing_or_invalid_falls_back() {
    let dir = TempDir::new().unwrap();
    assert_eq!(AppConfig::load_or_default(dir.path().join("absent.json")), AppConfig::default());

    write(dir.path(), "broken.json", "{ not json");
    let path = dir.path().join("broken.json");
    assert!(matches!(AppConfig::load(&path), Err(Error::Config { .. })));
    assert_eq!(AppConfig::load_or_default(&path), AppConfig::default());
}

#[test]
fn json_files_sorted_and_filtered() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "b.json", "[]");
    write(dir.path(), "a.json", "[]");
    write(dir.path(), "notes.txt", "ignored");
    fs::create_dir(dir.path().join("c.json")).unwrap();

    let names: Vec<_> = json_files(dir.path())
        .unwrap()
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, ["a.json", "b.json"]);

    assert!(json_files(&dir.path().join("missing")).unwrap().is_empty());
}

#[test]
fn device_selection() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "router.json", r#"{ "name": "router" }"#);
    write(
        dir.path(),
        "access.json",
        r#"{ "name": "switch", "interfaces": { "1": { "description": "port1", "speed": 100000000 } } }"#,
    );

    // First file by name
    let (device, path) = load_device(dir.path(), None).unwrap();
    assert_eq!(device.name, "switch");
    assert_eq!(path.as_deref(), Some(dir.path().join("access.json").as_path()));
    assert_eq!(device.interfaces["1"].speed, 100_000_000);
    assert_eq!(device.location, "Test Location");

    // Explicit file wins
    let explicit = dir.path().join("router.json");
    let (device, _) = load_device(dir.path(), Some(explicit.as_path())).unwrap();
    assert_eq!(device.name, "router");

    // Empty directory: built-in device
    let empty = TempDir::new().unwrap();
    let (device, path) = load_device(empty.path(), None).unwrap();
    assert_eq!(device.name, "Test System Name");
    assert!(path.is_none());
}

#[test]
fn broken_device_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "device.json", r#"{ "uptime": "soon" }"#);
    assert!(matches!(load_device(dir.path(), None), Err(Error::Config { .. })));

    let missing = dir.path().join("nope.json");
    assert!(matches!(load_device(dir.path(), Some(missing.as_path())), Err(Error::Io { path: Some(_), .. })));
}

#[test]
fn custom_files_load_in_name_order() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "20-override.json",
        r#"[ { "oid": "1.3.6.1.4.1.99999.1.0", "type": "integer", "value": 2 } ]"#,
    );
    write(
        dir.path(),
        "10-base.json",
        r#"[
            { "oid": "1.3.6.1.4.1.99999.1.0", "type": "integer", "value": "1" },
            { "oid": "1.3.6.1.4.1.99999.2.0", "type": "IpAddress", "value": "10.0.0.1" }
        ]"#,
    );
    write(dir.path(), "30-broken.json", r#"{ "oid": "not a list" }"#);

    let lists = load_custom_dir(dir.path());
    assert_eq!(lists.len(), 2);
    assert_eq!(lists[0].source, "10-base.json");
    assert_eq!(lists[1].source, "20-override.json");

    let (store, report) = build_store(&two_port_device(), &lists);
    assert!(report.is_clean());
    assert_eq!(store.lookup(&enterprise(1)), Some(&Value::Integer(2)));
    assert_eq!(store.lookup(&enterprise(2)), Some(&Value::IpAddress([10, 0, 0, 1])));
}

#[test]
fn custom_file_with_bad_entry() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "mixed.json",
        r#"[
            { "oid": "1.3.6.1.4.1.99999.1.0", "type": "integer", "value": "abc" },
            { "oid": "1.3.6.1.4.1.99999.2.0", "type": "string", "value": "ok" }
        ]"#,
    );

    let list = read_custom_list(&dir.path().join("mixed.json")).unwrap();
    let (store, report) = build_store(&two_port_device(), &[list]);

    assert!(store.lookup(&enterprise(1)).is_none());
    assert_eq!(store.lookup(&enterprise(2)), Some(&Value::from("ok")));
    assert_eq!(report.skipped().len(), 1);
    assert_eq!(report.skipped()[0].key, "1.3.6.1.4.1.99999.1.0");
}

#[test]
fn custom_file_with_misshapen_entry_keeps_siblings() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "shapes.json",
        r#"[
            { "oid": "1.3.6.1.4.1.99999.1.0", "type": "integer", "value": null },
            { "oid": "1.3.6.1.4.1.99999.2.0", "type": "string", "value": "ok" }
        ]"#,
    );

    let lists = load_custom_dir(dir.path());
    assert_eq!(lists.len(), 1);
    let (store, report) = build_store(&two_port_device(), &lists);

    assert_eq!(store.lookup(&enterprise(2)), Some(&Value::from("ok")));
    assert!(store.lookup(&enterprise(1)).is_none());
    assert_eq!(report.skipped().len(), 1);
    assert_eq!(report.skipped()[0].source, "shapes.json");
    assert_eq!(report.skipped()[0].key, "1.3.6.1.4.1.99999.1.0");
    assert!(matches!(report.skipped()[0].error, Error::InvalidEntry { .. }));
}
