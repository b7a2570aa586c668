use crate::config::GeneratorConfig;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::{debug, info};
use std::fs;
use std::path::Path;

/// Load and parse generator configuration from a YAML file
pub fn load_config(config_path: &Path) -> Result<GeneratorConfig> {
    info!("Loading configuration from: {:?}", config_path);

    let content = fs::read_to_string(config_path)
        .wrap_err_with(|| format!("Failed to read configuration '{}'", config_path.display()))?;

    // An empty file is a valid configuration that keeps every default
    let config: GeneratorConfig = if content.trim().is_empty() {
        GeneratorConfig::default()
    } else {
        serde_yaml::from_str(&content)?
    };
    debug!("Loaded parameters: {:?}", config.params);

    config.validate()?;

    Ok(config)
}

/// CLI arguments that override configuration file settings
#[derive(Debug, Clone, Default)]
pub struct ParamOverrides {
    pub user_num: Option<usize>,
    pub bearer_num: Option<usize>,
    pub bearer0_user: Option<usize>,
    pub cpu_num: Option<usize>,
    pub cpu_capacity: Option<f64>,
    pub conflict_num: Option<usize>,
    pub output: Option<String>,
    pub quiet: bool,
}

/// Apply CLI overrides to a generator configuration
pub fn apply_overrides(config: &mut GeneratorConfig, overrides: &ParamOverrides) -> Result<()> {
    let params = &mut config.params;

    if let Some(user_num) = overrides.user_num {
        params.user_num = user_num;
    }
    if let Some(bearer_num) = overrides.bearer_num {
        params.bearer_num = bearer_num;
    }
    if let Some(bearer0_user) = overrides.bearer0_user {
        params.bearer0_user = bearer0_user;
    }
    if let Some(cpu_num) = overrides.cpu_num {
        params.cpu_num = cpu_num;
    }
    if let Some(cpu_capacity) = overrides.cpu_capacity {
        params.cpu_capacity = cpu_capacity;
    }
    if let Some(conflict_num) = overrides.conflict_num {
        params.conflict_num = conflict_num;
    }

    if let Some(output) = &overrides.output {
        config.output.path = Some(output.clone());
    }
    // The flag can only switch printing off
    config.output.quiet |= overrides.quiet;

    // Re-validate after applying overrides
    config.validate()?;

    Ok(())
}
