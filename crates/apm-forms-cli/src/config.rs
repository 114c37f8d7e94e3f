//! CLI Configuration

use crate::output::OutputFormat;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

pub const KEYS: [&str; 3] = ["default_format", "log_level", "include_base_registration"];

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub default_format: Option<String>,
    pub log_level: Option<String>,
    pub include_base_registration: Option<bool>,
}

impl Config {
    pub fn load(profile: Option<&str>) -> Result<Self, String> {
        let path = Self::config_path(profile)?;
        if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| e.to_string())?;
            toml::from_str(&content).map_err(|e| e.to_string())
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, profile: Option<&str>) -> Result<PathBuf, String> {
        let path = Self::config_path(profile)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| e.to_string())?;
        fs::write(&path, content).map_err(|e| e.to_string())?;
        Ok(path)
    }

    /// `default_format`, if it names a known format
    pub fn output_format(&self) -> Option<OutputFormat> {
        self.default_format
            .as_deref()
            .and_then(|name| OutputFormat::from_str(name, true).ok())
    }

    pub fn set(&mut self, key: &str, value: String) -> Result<(), String> {
        match key {
            "default_format" => {
                OutputFormat::from_str(&value, true)
                    .map_err(|_| format!("Unknown format: {} (table, json, yaml)", value))?;
                self.default_format = Some(value);
            }
            "log_level" => self.log_level = Some(value),
            "include_base_registration" => {
                let flag = value
                    .parse::<bool>()
                    .map_err(|_| format!("Expected true or false, got: {}", value))?;
                self.include_base_registration = Some(flag);
            }
            _ => return Err(format!("Unknown config key: {}", key)),
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<Option<String>, String> {
        match key {
            "default_format" => Ok(self.default_format.clone()),
            "log_level" => Ok(self.log_level.clone()),
            "include_base_registration" => Ok(self.include_base_registration.map(|b| b.to_string())),
            _ => Err(format!("Unknown config key: {}", key)),
        }
    }

    fn config_path(profile: Option<&str>) -> Result<PathBuf, String> {
        let home = dirs::home_dir().ok_or("Cannot find home directory")?;
        let filename = match profile {
            Some(p) => format!("config.{}.toml", p),
            None => "config.toml".to_string(),
        };
        Ok(home.join(".apm-forms").join(filename))
    }
}
