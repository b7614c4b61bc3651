//! Drives the engine from `schemars`-generated schemas, the same way a
//! typed configuration front end would: derive `JsonSchema` for an
//! enum, feed `schema_for!` output to the tracker, and let the data
//! decide which variant is active.

use anyhow::Result;
use oneform::SelectionTracker;
use schemars::{schema_for, JsonSchema};
use serde_json::json;

#[derive(JsonSchema)]
#[allow(dead_code)]
enum Transport {
    Serial { port: String, baud: u32 },
    Tftp { listen_addr: String },
}

#[derive(JsonSchema)]
#[allow(dead_code)]
struct CargoBuild {
    package: String,
    release: bool,
}

#[derive(JsonSchema)]
#[allow(dead_code)]
struct ShellBuild {
    command: String,
}

#[derive(JsonSchema)]
#[allow(dead_code)]
enum BuildSystem {
    Cargo(CargoBuild),
    Shell(ShellBuild),
}

#[test]
fn struct_variants_resolve_and_match() -> Result<()> {
    let schema = serde_json::to_value(schema_for!(Transport))?;
    let mut tracker = SelectionTracker::new(&schema)?;
    assert_eq!(tracker.alternatives().len(), 2);

    let serial = tracker.init(Some(json!({
        "Serial": { "port": "/dev/ttyUSB0", "baud": 115200 },
    })));
    assert_eq!(serial.index, 0);

    let tftp = tracker.data_changed(Some(json!({
        "Tftp": { "listen_addr": "0.0.0.0" },
    })));
    assert_eq!(tftp.index, 1);
    Ok(())
}

#[test]
fn newtype_variants_match_through_definitions() -> Result<()> {
    let schema = serde_json::to_value(schema_for!(BuildSystem))?;
    let mut tracker = SelectionTracker::new(&schema)?;
    assert_eq!(tracker.alternatives().len(), 2);

    let cargo = tracker.init(Some(json!({
        "Cargo": { "package": "kernel", "release": true },
    })));
    assert_eq!(cargo.index, 0);

    let shell = tracker.data_changed(Some(json!({
        "Shell": { "command": "make all" },
    })));
    assert_eq!(shell.index, 1);
    Ok(())
}

#[test]
fn explicit_switch_clears_the_old_variant_key() -> Result<()> {
    let schema = serde_json::to_value(schema_for!(Transport))?;
    let mut tracker = SelectionTracker::new(&schema)?;

    tracker.init(Some(json!({
        "Serial": { "port": "/dev/ttyUSB0", "baud": 115200 },
    })));

    let switched = tracker.explicit_switch(1)?;
    assert_eq!(switched.index, 1);
    let data = switched.data.expect("object data survives the switch");
    assert_eq!(data.get("Serial"), None);
    Ok(())
}
