use crate::geometry::AreaPolicy;
use crate::types::{ReamingConfig, VolumeUnits};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// User settings persisted between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReamerSettings {
    pub reaming: ReamingConfig,
    /// Height of the floor used for volume estimates, in millimetres.
    pub floor_height: f64,
    pub volume_units: VolumeUnits,
    pub area_policy: AreaPolicy,
}

impl Default for ReamerSettings {
    fn default() -> Self {
        Self {
            reaming: ReamingConfig::default(),
            floor_height: 10.0,
            volume_units: VolumeUnits::default(),
            area_policy: AreaPolicy::default(),
        }
    }
}

impl ReamerSettings {
    /// Load settings from the provided path. Missing files yield the defaults.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            info!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }

        let data = fs::read(path).with_context(|| format!("read settings {}", path.display()))?;
        let settings: ReamerSettings =
            serde_json::from_slice(&data).context("deserialize settings")?;
        info!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Persist the settings to the provided path, ensuring the directory exists.
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create settings directory {}", parent.display()))?;
        }

        let data = serde_json::to_vec_pretty(self).context("serialize settings to JSON bytes")?;
        fs::write(path, data).with_context(|| format!("write settings {}", path.display()))?;
        info!(path = %path.display(), "saved settings");
        Ok(())
    }

    /// Restore the defaults, keeping the user's prologue and epilogue.
    pub fn reset(&mut self) {
        let prologue = std::mem::take(&mut self.reaming.prologue);
        let epilogue = std::mem::take(&mut self.reaming.epilogue);
        *self = Self::default();
        self.reaming.prologue = prologue;
        self.reaming.epilogue = epilogue;
    }

    /// Resolve the default settings path (`~/.curvereamer/settings.json`).
    pub fn default_settings_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| anyhow!("could not determine home directory"))?;
        Ok(home.join(".curvereamer").join("settings.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CutBehavior;

    #[test]
    fn test_reset_keeps_prologue_and_epilogue() {
        let mut settings = ReamerSettings::default();
        settings.floor_height = 3.0;
        settings.reaming.safe_z = 20.0;
        settings.reaming.cut_behavior = CutBehavior::Table;
        settings.reaming.prologue = "G90\nG21\nM3 S12000".to_string();
        settings.reaming.epilogue = "M5\nM30".to_string();

        settings.reset();

        assert_eq!(settings.floor_height, 10.0);
        assert_eq!(settings.reaming.safe_z, 5.0);
        assert_eq!(settings.reaming.cut_behavior, CutBehavior::Line);
        assert_eq!(settings.reaming.prologue, "G90\nG21\nM3 S12000");
        assert_eq!(settings.reaming.epilogue, "M5\nM30");
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: ReamerSettings =
            serde_json::from_str(r#"{ "floor_height": 4.5 }"#).expect("deserialize");
        assert_eq!(settings.floor_height, 4.5);
        assert_eq!(settings.reaming, ReamingConfig::default());
        assert_eq!(settings.area_policy, AreaPolicy::ContainmentForest);
    }

    #[test]
    fn test_default_path_is_under_home() {
        if let Ok(path) = ReamerSettings::default_settings_path() {
            assert!(path.ends_with(".curvereamer/settings.json"));
        }
    }
}
