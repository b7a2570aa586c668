use serde::{Deserialize, Serialize};

/// Workload parameters of a mobile gateway pipeline
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Params {
    /// Number of users per bearer
    pub user_num: usize,
    /// Number of bearers
    pub bearer_num: usize,
    /// Number of users on bearer 0
    pub bearer0_user: usize,
    /// Number of CPUs available to the scheduler
    pub cpu_num: usize,
    /// Capacity of a single CPU, in module weight units
    pub cpu_capacity: f64,
    /// Number of CPU failures to cover with replicas
    pub conflict_num: usize,
}

impl Params {
    /// Validate the parameters
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.cpu_capacity.is_finite() || self.cpu_capacity < 0.0 {
            return Err(ValidationError::InvalidParams(format!(
                "cpu_capacity must be a non-negative number, got {}",
                self.cpu_capacity
            )));
        }
        Ok(())
    }

    /// Number of users actually served on a bearer
    pub fn users_on_bearer(&self, bearer: usize) -> usize {
        if bearer == 0 {
            self.user_num.min(self.bearer0_user)
        } else {
            self.user_num
        }
    }

    /// Number of copies (primary plus replicas) kept of a module on `bearer`
    pub fn copies_on_bearer(&self, bearer: usize) -> usize {
        if bearer == 0 {
            1 + self.conflict_num
        } else {
            1
        }
    }
}

/// Output settings
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Where to write the LGF file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Do not print the LGF to stdout
    pub quiet: bool,
}

/// Generator configuration file
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    pub params: Params,
    pub output: OutputConfig,
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.params.validate()?;
        if let Some(path) = &self.output.path {
            if path.is_empty() {
                return Err(ValidationError::InvalidOutput("output path cannot be empty".to_string()));
            }
        }
        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),
    #[error("Invalid output configuration: {0}")]
    InvalidOutput(String),
}

/// Default implementations
impl Default for Params {
    fn default() -> Self {
        Self {
            user_num: 2,
            bearer_num: 2,
            bearer0_user: 1,
            cpu_num: 5,
            cpu_capacity: 25.0,
            conflict_num: 0,
        }
    }
}
