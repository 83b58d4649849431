//! Integration tests for cadence-config.
//!
//! These drive the preset manager against real preset files in temporary
//! factory and user roots.

use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use cadence_config::{
    ConfigError, PluginIdentity, Preset, PresetCatalog, PresetChecker, PresetConfig,
    PresetLocations, PresetManager, fourcc, parameters_from_toml, parameters_to_toml,
};
use cadence_core::{ParamDescriptor, ParamRange, ParameterSet, ParameterStore, StateTree};
use tempfile::TempDir;

fn identity() -> PluginIdentity {
    PluginIdentity::new("Acme", "Widget", fourcc(b"Acme"), fourcc(b"Wdgt"))
}

fn store() -> Arc<ParameterStore> {
    let parameters = ParameterSet::new(vec![
        ParamDescriptor::gain_db("gain", "Gain", -60.0, 12.0, 0.0),
        ParamDescriptor::new("mix", "Mix", ParamRange::new(0.0, 1.0), 0.5),
        ParamDescriptor::toggle("bypass", "Bypass", false),
    ])
    .expect("valid catalog");
    Arc::new(ParameterStore::detached(parameters))
}

struct Fixture {
    temp_dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    fn factory(&self) -> std::path::PathBuf {
        self.temp_dir.path().join("factory")
    }

    fn user(&self) -> std::path::PathBuf {
        self.temp_dir.path().join("user")
    }

    fn manager(&self) -> PresetManager {
        PresetManager::new(
            identity(),
            PresetLocations::new(self.factory(), self.user()),
            store(),
        )
    }

    /// Writes a valid preset whose gain is `gain`.
    fn write_preset(&self, root: &Path, bank: &str, name: &str, gain: f32) {
        let mut file = root.to_path_buf();
        if !bank.is_empty() {
            file.push(bank);
        }
        file.push(format!("{name}.toml"));

        let mut preset = Preset::new(file, bank);
        preset.replace_state(
            StateTree::new("parameters")
                .with_value("gain", gain)
                .with_value("mix", 0.5)
                .with_value("bypass", 0.0),
        );
        preset.save_to_file(&identity()).unwrap();
    }
}

fn names(presets: &[Preset]) -> Vec<&str> {
    presets.iter().map(|p| p.name.as_str()).collect()
}

#[test]
fn test_identity_ignores_state() {
    let mut a = Preset::new("/presets/Lead.toml", "");
    let mut b = a.clone();
    a.replace_state(StateTree::new("parameters").with_value("gain", 1.0));
    b.replace_state(StateTree::new("parameters").with_value("gain", -9.0));
    b.author = "Someone else".into();
    assert_eq!(a, b);

    b.version = 2;
    assert_ne!(a, b);

    let c = Preset::new("/other/Lead.toml", "");
    assert_ne!(a, c);
}

#[test]
fn test_failed_load_leaves_preset_untouched() {
    let fixture = Fixture::new();
    fixture.write_preset(&fixture.user(), "", "Lead", -6.0);
    let file = fixture.user().join("Lead.toml");

    let mut preset = Preset::new(&file, "");
    preset.load_from_file(&identity()).unwrap();
    let before = (
        preset.name.clone(),
        preset.author.clone(),
        preset.comments.clone(),
        preset.version,
        preset.copy_state(),
    );

    let foreign = PluginIdentity::new("Other", "Thing", fourcc(b"Othr"), fourcc(b"Thng"));
    let bad_documents = [
        preset.to_toml(&foreign).unwrap(),
        "manufacturer = \"41636d65\"\nplugin = \"57646774\"\nversion = 0\n\n[state.parameters]\ngain = 1.0\n"
            .to_string(),
        "manufacturer = \"41636d65\"\nplugin = \"57646774\"\nversion = 3\n".to_string(),
        "this is not toml".to_string(),
    ];

    for doc in bad_documents {
        fs::write(&file, &doc).unwrap();
        let err = preset.load_from_file(&identity()).unwrap_err();
        assert!(err.is_validation(), "unexpected error {err:?} for {doc}");

        let after = (
            preset.name.clone(),
            preset.author.clone(),
            preset.comments.clone(),
            preset.version,
            preset.copy_state(),
        );
        assert_eq!(before, after);
    }
}

#[test]
fn test_save_then_load_reproduces_live_state() {
    let fixture = Fixture::new();
    let mut manager = fixture.manager();
    let live = Arc::clone(manager.parameters());
    live.set("gain", -6.0);
    live.set("mix", 0.25);
    live.set("bypass", 1.0);
    let saved = live.snapshot();

    manager
        .save_current_preset("Lead", "Basses", "A", "C")
        .unwrap();
    assert!(fixture.user().join("Basses").join("Lead.toml").is_file());

    let entry = manager.user_preset("Lead", "Basses");
    live.reset();
    manager.load_preset(&entry).unwrap();

    let current = manager.current_preset();
    assert_eq!(current.name, "Lead");
    assert_eq!(current.bank, "Basses");
    assert_eq!(current.author, "A");
    assert_eq!(current.comments, "C");
    assert!(current.check_state(&saved));
    assert!(!current.modified);
    assert!(live.snapshot().is_equivalent_to(&saved));
    assert_eq!(manager.current_index(), Some(0));
}

#[test]
fn test_save_overwrites_existing_user_preset() {
    let fixture = Fixture::new();
    let mut manager = fixture.manager();
    manager.parameters().set("gain", -6.0);
    manager.save_current_preset("Lead", "", "A", "first").unwrap();
    manager.parameters().set("gain", -12.0);
    manager.save_current_preset("Lead", ".", "A", "second").unwrap();

    let presets = manager.user_presets();
    assert_eq!(names(&presets), vec!["Lead"]);
    assert_eq!(manager.current_preset().comments, "second");
    assert_eq!(manager.current_preset().state().get("gain"), Some(-12.0));
}

#[test]
fn test_drift_detection_is_idempotent() {
    let fixture = Fixture::new();
    let mut manager = fixture.manager();
    let live = Arc::clone(manager.parameters());
    manager.load_default();

    for _ in 0..3 {
        manager.check_preset_changed();
        assert!(!manager.current_preset().modified);
    }

    let flips = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&flips);
    manager.add_listener(Arc::new(move |_: &Preset| *counter.lock().unwrap() += 1));

    live.set("gain", -3.0);
    for _ in 0..3 {
        manager.check_preset_changed();
    }
    assert!(manager.current_preset().modified);
    assert_eq!(*flips.lock().unwrap(), 1);

    live.set("gain", 0.0);
    manager.check_preset_changed();
    assert!(!manager.current_preset().modified);
    assert_eq!(*flips.lock().unwrap(), 2);
}

#[test]
fn test_navigation_is_clamped() {
    let fixture = Fixture::new();
    for (i, name) in ["A", "B", "C"].into_iter().enumerate() {
        fixture.write_preset(&fixture.factory(), "", name, -(i as f32));
    }
    let mut manager = fixture.manager();
    assert_eq!(manager.current_index(), None);
    assert!(manager.can_load_next_preset());

    manager.load_next_preset().unwrap();
    assert_eq!(manager.current_index(), Some(0));
    assert!(!manager.can_load_previous_preset());

    for _ in 0..5 {
        manager.load_next_preset().unwrap();
    }
    assert_eq!(manager.current_index(), Some(2));
    assert_eq!(manager.current_preset().name, "C");
    assert!(!manager.can_load_next_preset());
    assert_eq!(manager.parameters().get("gain"), Some(-2.0));

    for _ in 0..5 {
        manager.load_previous_preset().unwrap();
    }
    assert_eq!(manager.current_index(), Some(0));
    assert!(!manager.can_load_previous_preset());
    assert!(manager.can_load_next_preset());
}

#[test]
fn test_bank_is_first_segment_below_root() {
    let fixture = Fixture::new();
    let root = fixture.factory();
    fixture.write_preset(&root, "", "Top", 0.0);
    fixture.write_preset(&root, "Bass", "Round", 0.0);
    fixture.write_preset(&root, "Bass/Sub", "Deep", 0.0);

    let mut banks: Vec<(String, String)> = PresetCatalog::locate(&root)
        .into_iter()
        .map(|p| (p.name, p.bank))
        .collect();
    banks.sort();
    assert_eq!(
        banks,
        vec![
            ("Deep".to_string(), "Bass".to_string()),
            ("Round".to_string(), "Bass".to_string()),
            ("Top".to_string(), String::new()),
        ]
    );
}

#[test]
fn test_factory_block_precedes_user_block() {
    let fixture = Fixture::new();
    fixture.write_preset(&fixture.factory(), "", "F1", -1.0);
    fixture.write_preset(&fixture.factory(), "", "F2", -2.0);
    fixture.write_preset(&fixture.user(), "", "U1", -3.0);

    let mut manager = fixture.manager();
    let all = manager.all_presets();
    assert_eq!(names(&all), vec!["F1", "F2", "U1"]);

    let u1 = manager.user_preset("U1", "");
    manager.load_preset(&u1).unwrap();
    assert_eq!(manager.current_index(), Some(2));

    manager.load_previous_preset().unwrap();
    assert_eq!(manager.current_preset().name, "F2");
    assert_eq!(manager.current_index(), Some(1));
    assert_eq!(manager.parameters().get("gain"), Some(-2.0));
}

#[test]
fn test_foreign_preset_is_skipped_without_side_effects() {
    let fixture = Fixture::new();
    fixture.write_preset(&fixture.factory(), "", "Good", -4.0);
    fs::write(fixture.factory().join("Junk.toml"), "version = 1\n").unwrap();

    let mut manager = fixture.manager();
    manager.load_next_preset().unwrap();
    assert_eq!(manager.current_preset().name, "Good");

    let err = manager.load_next_preset().unwrap_err();
    assert!(matches!(err, ConfigError::ForeignPreset { .. }));
    assert_eq!(manager.current_preset().name, "Good");
    assert_eq!(manager.parameters().get("gain"), Some(-4.0));
}

#[test]
fn test_host_session_round_trip() {
    let fixture = Fixture::new();
    let mut manager = fixture.manager();
    manager.parameters().set("gain", -6.0);
    manager.save_current_preset("Lead", "Basses", "A", "C").unwrap();
    manager.parameters().set("mix", 0.75);
    manager.check_preset_changed();

    let manager_doc = manager.to_toml().unwrap();
    let parameters_doc = parameters_to_toml(manager.parameters()).unwrap();

    let mut restored = fixture.manager();
    restored.from_toml(&manager_doc).unwrap();
    parameters_from_toml(restored.parameters(), &parameters_doc).unwrap();

    assert_eq!(restored.current_preset(), manager.current_preset());
    assert!(restored.current_preset().modified);
    assert_eq!(restored.parameters().get("gain"), Some(-6.0));
    assert_eq!(restored.parameters().get("mix"), Some(0.75));

    restored.parameters().set("mix", 0.5);
    assert!(restored.check_preset_changed());
    assert!(!restored.current_preset().modified);
}

#[test]
fn test_checker_flags_drift_in_background() {
    let fixture = Fixture::new();
    let config = PresetConfig::from_toml(&format!(
        "[identity]\nmanufacturer = \"Acme\"\nproduct = \"Widget\"\nmanufacturer_code = \"Acme\"\nplugin_code = \"Wdgt\"\n\n[presets]\nfactory_dir = {:?}\nuser_dir = {:?}\ncheck_interval_ms = 10\n",
        fixture.factory().to_string_lossy(),
        fixture.user().to_string_lossy(),
    ))
    .unwrap();

    let manager = Arc::new(parking_lot::Mutex::new(PresetManager::new(
        config.identity().unwrap(),
        config.locations().unwrap(),
        store(),
    )));
    let live = Arc::clone(manager.lock().parameters());
    let checker = PresetChecker::spawn(Arc::clone(&manager), config.check_interval()).unwrap();

    live.set("bypass", 1.0);
    let deadline = Instant::now() + Duration::from_secs(5);
    while !manager.lock().current_preset().modified && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(5));
    }
    assert!(manager.lock().current_preset().modified);

    checker.stop();
}

#[test]
fn test_loaded_preset_with_illegal_values_starts_unmodified() {
    let fixture = Fixture::new();
    fs::create_dir_all(fixture.factory()).unwrap();
    let header = "manufacturer = \"41636d65\"\nplugin = \"57646774\"\nversion = 1\n\n[state.parameters]\n";
    fs::write(
        fixture.factory().join("Hot.toml"),
        format!("{header}gain = 0.0\nmix = 2.0\nsteps = 0.0\n"),
    )
    .unwrap();
    fs::write(
        fixture.factory().join("Step.toml"),
        format!("{header}gain = 0.0\nmix = 0.5\nsteps = 0.33\n"),
    )
    .unwrap();

    let parameters = ParameterSet::new(vec![
        ParamDescriptor::gain_db("gain", "Gain", -60.0, 12.0, 0.0),
        ParamDescriptor::new("mix", "Mix", ParamRange::new(0.0, 1.0), 0.5),
        ParamDescriptor::new("steps", "Steps", ParamRange::stepped(0.0, 1.0, 0.25), 0.0),
    ])
    .expect("valid catalog");
    let mut manager = PresetManager::new(
        identity(),
        PresetLocations::new(fixture.factory(), fixture.user()),
        Arc::new(ParameterStore::detached(parameters)),
    );

    manager.load_next_preset().unwrap();
    assert_eq!(manager.current_preset().name, "Hot");
    assert_eq!(manager.parameters().get("mix"), Some(1.0));
    assert_eq!(manager.current_preset().state().get("mix"), Some(1.0));
    assert!(!manager.check_preset_changed());
    assert!(!manager.current_preset().modified);

    manager.load_next_preset().unwrap();
    assert_eq!(manager.current_preset().name, "Step");
    assert_eq!(manager.current_index(), Some(1));
    assert_eq!(manager.parameters().get("steps"), Some(0.25));
    assert!(!manager.check_preset_changed());
    assert!(!manager.current_preset().modified);
}

#[test]
fn test_preset_with_later_version_is_outside_navigation() {
    let fixture = Fixture::new();
    fixture.write_preset(&fixture.factory(), "", "A", -1.0);
    fixture.write_preset(&fixture.factory(), "", "B", -2.0);

    let mut revised = Preset::new(fixture.factory().join("A.toml"), "");
    revised.load_from_file(&identity()).unwrap();
    revised.version = 2;
    revised.save_to_file(&identity()).unwrap();

    let mut manager = fixture.manager();
    manager.load_next_preset().unwrap();
    assert_eq!(manager.current_preset().name, "A");
    assert_eq!(manager.current_preset().version, 2);
    assert_eq!(manager.current_index(), None);

    manager.load_next_preset().unwrap();
    assert_eq!(manager.current_preset().name, "A");
    assert_eq!(manager.current_index(), None);
    assert!(!manager.can_load_previous_preset());
    assert!(manager.can_load_next_preset());
}

#[test]
fn test_save_rejects_names_outside_user_root() {
    let fixture = Fixture::new();
    let mut manager = fixture.manager();
    manager.parameters().set("gain", -6.0);

    for (name, bank) in [("../escape", ""), ("Lead", "../.."), ("Lead", "a/b"), ("..", "")] {
        let err = manager.save_current_preset(name, bank, "A", "C").unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidPresetName(_)),
            "unexpected error {err:?} for {name:?} in {bank:?}"
        );
    }

    assert!(!fixture.temp_dir.path().join("escape.toml").exists());
    assert!(manager.user_presets().is_empty());
    assert_eq!(manager.current_preset().name, "Default");
}
