use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::layout_engine::Layout;

pub fn config_file() -> PathBuf { dirs::home_dir().unwrap().join(".winsnap.toml") }

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Layout applied on the destination screen by move-to-display.
    #[serde(default)]
    pub move_layout: Layout,
    /// Return focus to the target app after moving its windows.
    #[serde(default = "yes")]
    pub activate_after_apply: bool,
    /// Bundle identifiers that are never targeted (e.g. launchers that
    /// briefly steal focus).
    #[serde(default)]
    pub exclude_apps: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            move_layout: Layout::default(),
            activate_after_apply: true,
            exclude_apps: Vec::new(),
        }
    }
}

fn yes() -> bool { true }

impl Config {
    pub fn read(path: &Path) -> anyhow::Result<Config> {
        let buf = std::fs::read_to_string(path)?;
        Self::parse(&buf)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        std::fs::write(path, toml::to_string(self)?)?;
        Ok(())
    }

    fn parse(buf: &str) -> anyhow::Result<Config> { Ok(toml::from_str(buf)?) }

    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        let mut seen = std::collections::HashSet::new();

        for (index, app_id) in self.settings.exclude_apps.iter().enumerate() {
            if app_id.is_empty() {
                issues.push(format!("exclude_apps entry {} is empty", index));
                continue;
            }
            if !app_id.contains('.') {
                issues.push(format!(
                    "exclude_apps entry {} has suspicious id '{}' (should be a bundle identifier like 'com.example.app')",
                    index, app_id
                ));
            }
            if !seen.insert(app_id) {
                issues.push(format!("Duplicate bundle id '{}' in exclude_apps", app_id));
            }
        }

        issues
    }
}
