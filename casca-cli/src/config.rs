use anyhow::{Context, Result};
use casca_features::AggregatorConfig;
use casca_ingest::parsers::DEFAULT_STARTING_BALANCE;
use casca_ingest::ParseOptions;
use casca_model::{ForestConfig, ScorerConfig, DEFAULT_PERMUTATIONS};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::{default_config_path, ensure_casca_home};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// tracing filter used when RUST_LOG is unset
    pub log_level: String,
    pub parse: ParseSection,
    pub features: FeaturesSection,
    pub model: ModelSection,
    /// Entity id -> approved
    pub labels: BTreeMap<String, bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseSection {
    /// Opening balance for the signed-running layout
    pub starting_balance: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeaturesSection {
    /// Year for statement dates printed without one
    pub default_year: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSection {
    pub n_trees: usize,
    pub seed: u64,
    pub bootstrap: bool,
    pub permutations: usize,
}

impl Default for ParseSection {
    fn default() -> Self {
        Self {
            starting_balance: DEFAULT_STARTING_BALANCE,
        }
    }
}

impl Default for ModelSection {
    fn default() -> Self {
        let forest = ForestConfig::default();
        Self {
            n_trees: forest.n_trees,
            seed: forest.seed,
            bootstrap: forest.bootstrap,
            permutations: DEFAULT_PERMUTATIONS,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let labels = [("Business1", true), ("Business2", true), ("Business3", false)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        Self {
            log_level: "info".to_string(),
            parse: ParseSection::default(),
            features: FeaturesSection::default(),
            model: ModelSection::default(),
            labels,
        }
    }
}

impl Config {
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            starting_balance: self.parse.starting_balance,
        }
    }

    pub fn aggregator_config(&self) -> AggregatorConfig {
        AggregatorConfig {
            default_year: self.features.default_year,
        }
    }

    pub fn scorer_config(&self) -> ScorerConfig {
        ScorerConfig {
            forest: ForestConfig {
                n_trees: self.model.n_trees,
                seed: self.model.seed,
                bootstrap: self.model.bootstrap,
                ..ForestConfig::default()
            },
            permutations: self.model.permutations,
        }
    }

    pub fn label_map(&self) -> HashMap<String, bool> {
        self.labels.iter().map(|(k, v)| (k.clone(), *v)).collect()
    }
}

/// Explicit path, else the default location under the casca home.
pub fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(p) => Ok(p.to_path_buf()),
        None => default_config_path(),
    }
}

/// Defaults when the file does not exist.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn save_config(cfg: &Config, path: &Path) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn init_config(explicit: Option<&Path>) -> Result<()> {
    let p = match explicit {
        Some(p) => p.to_path_buf(),
        None => ensure_casca_home()?.join("config.toml"),
    };
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default(), &p)?;
    println!("Wrote {}", p.display());
    Ok(())
}
