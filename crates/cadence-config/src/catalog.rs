//! Preset discovery under the factory and user roots.
//!
//! The catalog keeps no cache: every call rescans the filesystem, so the
//! result always reflects what is on disk right now.

use std::path::Path;

use crate::paths::{self, PresetLocations};
use crate::preset::Preset;

/// Finds presets under the two preset roots.
#[derive(Debug, Clone)]
pub struct PresetCatalog {
    locations: PresetLocations,
}

impl PresetCatalog {
    /// Catalog over the given roots.
    pub fn new(locations: PresetLocations) -> Self {
        Self { locations }
    }

    /// The preset roots.
    pub fn locations(&self) -> &PresetLocations {
        &self.locations
    }

    /// Preset handles for every preset file below `root`.
    ///
    /// Handles carry file, name and bank only; call
    /// [`Preset::load_from_file`] to read the rest.
    pub fn locate(root: &Path) -> Vec<Preset> {
        let presets: Vec<Preset> = paths::find_preset_files(root)
            .into_iter()
            .map(|file| {
                let bank = paths::preset_bank(&file, root);
                Preset::new(file, bank)
            })
            .collect();
        tracing::debug!(root = %root.display(), count = presets.len(), "scanned presets");
        presets
    }

    /// Presets below the factory root.
    pub fn factory_presets(&self) -> Vec<Preset> {
        Self::locate(self.locations.factory())
    }

    /// Presets below the user root, creating it if missing.
    ///
    /// A user root that cannot be created is logged and scanned as empty.
    pub fn user_presets(&self) -> Vec<Preset> {
        if let Err(e) = self.locations.ensure_user() {
            tracing::warn!(error = %e, "user presets directory unavailable");
        }
        Self::locate(self.locations.user())
    }

    /// Factory presets followed by user presets.
    pub fn all_presets(&self) -> Vec<Preset> {
        let mut presets = self.factory_presets();
        presets.extend(self.user_presets());
        presets
    }

    /// Factory preset `name` in `bank`.
    ///
    /// Falls back to a handle at the path the preset would have when no such
    /// file exists, and to an unbound preset when `name` is empty.
    pub fn factory_preset(&self, name: &str, bank: &str) -> Preset {
        Self::find_or_build(self.factory_presets(), self.locations.factory(), name, bank)
    }

    /// User preset `name` in `bank`.
    ///
    /// Same fallbacks as [`factory_preset`](Self::factory_preset).
    pub fn user_preset(&self, name: &str, bank: &str) -> Preset {
        let presets = self.user_presets();
        Self::find_or_build(presets, self.locations.user(), name, bank)
    }

    fn find_or_build(presets: Vec<Preset>, root: &Path, name: &str, bank: &str) -> Preset {
        let bank = if bank == "." { "" } else { bank };

        if name.is_empty() {
            return Preset::default();
        }
        if let Some(found) = presets
            .into_iter()
            .find(|p| p.name == name && p.bank == bank)
        {
            return found;
        }

        let file = paths::preset_path(root, bank, name);
        let bank = paths::preset_bank(&file, root);
        Preset::new(file, bank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn catalog(temp_dir: &TempDir) -> PresetCatalog {
        PresetCatalog::new(PresetLocations::new(
            temp_dir.path().join("factory"),
            temp_dir.path().join("user"),
        ))
    }

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_locate_assigns_banks() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(&root.join("Init.toml"));
        touch(&root.join("Bass").join("Sub").join("Deep.toml"));
        touch(&root.join("Bass").join("Round.toml"));

        let presets = PresetCatalog::locate(root);
        let found: Vec<(&str, &str)> = presets
            .iter()
            .map(|p| (p.name.as_str(), p.bank.as_str()))
            .collect();
        assert_eq!(found, vec![("Round", "Bass"), ("Deep", "Bass"), ("Init", "")]);
    }

    #[test]
    fn test_all_presets_lists_factory_first() {
        let temp_dir = TempDir::new().unwrap();
        let catalog = catalog(&temp_dir);
        touch(&temp_dir.path().join("user").join("A.toml"));
        touch(&temp_dir.path().join("factory").join("Z.toml"));

        let names: Vec<String> = catalog.all_presets().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Z", "A"]);
    }

    #[test]
    fn test_user_root_created_on_scan() {
        let temp_dir = TempDir::new().unwrap();
        let catalog = catalog(&temp_dir);
        assert!(catalog.user_presets().is_empty());
        assert!(temp_dir.path().join("user").is_dir());
        assert!(catalog.factory_presets().is_empty());
        assert!(!temp_dir.path().join("factory").exists());
    }

    #[test]
    fn test_lookup_existing_preset() {
        let temp_dir = TempDir::new().unwrap();
        let catalog = catalog(&temp_dir);
        let file = temp_dir.path().join("user").join("Basses").join("Lead.toml");
        touch(&file);

        let preset = catalog.user_preset("Lead", "Basses");
        assert_eq!(preset.file(), Some(file.as_path()));
        assert_eq!(preset.bank, "Basses");
    }

    #[test]
    fn test_lookup_miss_builds_handle_at_expected_path() {
        let temp_dir = TempDir::new().unwrap();
        let catalog = catalog(&temp_dir);

        let user = catalog.user_preset("Lead", "Basses");
        assert_eq!(
            user.file(),
            Some(temp_dir.path().join("user").join("Basses").join("Lead.toml").as_path())
        );
        assert_eq!(user.bank, "Basses");

        let factory = catalog.factory_preset("Pad", "");
        assert_eq!(
            factory.file(),
            Some(temp_dir.path().join("factory").join("Pad.toml").as_path())
        );
        assert_eq!(factory.bank, "");
    }

    #[test]
    fn test_empty_name_gives_unbound_preset() {
        let temp_dir = TempDir::new().unwrap();
        let catalog = catalog(&temp_dir);
        touch(&temp_dir.path().join("user").join(".toml"));

        let preset = catalog.user_preset("", "");
        assert!(!preset.is_file_backed());
    }

    #[test]
    fn test_dot_bank_matches_root_presets() {
        let temp_dir = TempDir::new().unwrap();
        let catalog = catalog(&temp_dir);
        let file = temp_dir.path().join("user").join("Lead.toml");
        touch(&file);

        assert_eq!(catalog.user_preset("Lead", ".").file(), Some(file.as_path()));
    }
}
