//! Walks through the preset workflow in a throwaway directory.
//!
//! ```sh
//! RUST_LOG=debug cargo run -p cadence-config --example preset_demo
//! ```

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use cadence_config::{
    Preset, PresetChecker, PresetConfig, PresetManager, SettingDescriptor, SettingManager,
    SettingValue,
};
use cadence_core::{ParamDescriptor, ParamRange, ParameterSet, ParameterStore};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let root = tempfile::tempdir()?;
    let config = PresetConfig::from_toml(&format!(
        r#"
        [identity]
        manufacturer = "Cadence"
        product = "Demo Synth"
        manufacturer_code = "Cdnc"
        plugin_code = "Dmo1"

        [presets]
        factory_dir = {:?}
        user_dir = {:?}
        check_interval_ms = 20
        "#,
        root.path().join("factory"),
        root.path().join("user"),
    ))?;

    let parameters = ParameterSet::new(vec![
        ParamDescriptor::gain_db("gain", "Gain", -60.0, 12.0, 0.0),
        ParamDescriptor::new(
            "cutoff",
            "Cutoff",
            ParamRange::with_centre(20.0, 20000.0, 1000.0)?,
            1000.0,
        )
        .with_label("Hz"),
        ParamDescriptor::choice("wave", "Waveform", &["Sine", "Triangle", "Saw", "Square"]),
    ])?;
    let store = Arc::new(ParameterStore::detached(parameters));

    let manager = Arc::new(parking_lot::Mutex::new(PresetManager::new(
        config.identity()?,
        config.locations()?,
        Arc::clone(&store),
    )));
    manager.lock().add_listener(Arc::new(|preset: &Preset| {
        println!(
            "preset: {} [{}]{}",
            preset.name,
            preset.bank,
            if preset.modified { " *" } else { "" }
        );
    }));
    let checker = PresetChecker::spawn(Arc::clone(&manager), config.check_interval())?;

    for (name, bank, cutoff) in [("Warm", "Pads", 400.0), ("Bright", "Pads", 8000.0), ("Init", "", 1000.0)] {
        store.set("cutoff", cutoff);
        manager.lock().save_current_preset(name, bank, "demo", "")?;
    }

    let mut manager_guard = manager.lock();
    manager_guard.load_default();
    while manager_guard.can_load_next_preset() {
        manager_guard.load_next_preset()?;
        println!("  cutoff = {:?}", store.get("cutoff"));
    }
    let session = manager_guard.to_toml()?;
    drop(manager_guard);

    store.set("wave", 2.0);
    std::thread::sleep(Duration::from_millis(100));
    checker.stop();

    println!("\nhost session document:\n{session}");

    let mut settings = SettingManager::new(vec![
        SettingDescriptor::new("theme", "dark"),
        SettingDescriptor::new("oversampling", 2),
    ]);
    settings.add_listener(Arc::new(|key: &str, value: &SettingValue| {
        println!("setting: {key} = {value}");
    }));
    settings.set("oversampling", 4);
    println!("{}", settings.to_toml()?);

    Ok(())
}
