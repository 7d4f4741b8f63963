//! `dauc.toml` configuration
//!
//! ```toml
//! [solver]
//! threads = "auto"        # or an integer
//! time_limit_seconds = 60
//! mip_gap = 0.001
//! milp_solver = "microlp"
//!
//! [output]
//! dir = "results"
//! commitment_table = true
//! ```
//!
//! Every key is optional. Command-line flags take precedence.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use dauc_core::{MilpSolverKind, SolverConfig};
use serde::{Deserialize, Serialize};

use crate::cli::SolverArgs;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DaucConfig {
    pub solver: SolverSection,
    pub output: OutputSection,
}

/// Thread count as written in the file: a number or `"auto"`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ThreadsSetting {
    Count(usize),
    Named(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSection {
    pub threads: Option<ThreadsSetting>,
    pub time_limit_seconds: Option<f64>,
    pub mip_gap: Option<f64>,
    pub verbose: bool,
    pub milp_solver: MilpSolverKind,
    pub max_iterations: u32,
}

impl Default for SolverSection {
    fn default() -> Self {
        let base = SolverConfig::default();
        Self {
            threads: None,
            time_limit_seconds: base.time_limit_seconds,
            mip_gap: base.mip_gap,
            verbose: base.verbose,
            milp_solver: base.milp_solver,
            max_iterations: base.max_iterations,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    /// Relative output paths are resolved against this directory
    pub dir: Option<PathBuf>,
    /// Print the hourly commitment table after `uc solve`
    pub commitment_table: bool,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            dir: None,
            commitment_table: true,
        }
    }
}

impl DaucConfig {
    /// Load from `path`, or defaults when no file was given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file '{}'", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("parsing config file '{}'", path.display()))
    }

    /// Merge file settings with command-line overrides.
    pub fn solver_config(&self, args: &SolverArgs) -> Result<SolverConfig> {
        let file = &self.solver;
        let threads = match (&args.threads, &file.threads) {
            (Some(value), _) => Some(resolve_threads(value)?),
            (None, Some(ThreadsSetting::Count(n))) => Some(*n),
            (None, Some(ThreadsSetting::Named(value))) => Some(resolve_threads(value)?),
            (None, None) => None,
        };
        let config = SolverConfig {
            threads,
            time_limit_seconds: args.time_limit.or(file.time_limit_seconds),
            mip_gap: args.mip_gap.or(file.mip_gap),
            verbose: args.solver_verbose || file.verbose,
            milp_solver: args.milp_solver.unwrap_or(file.milp_solver),
            max_iterations: file.max_iterations,
        };
        if let Some(limit) = config.time_limit_seconds {
            if limit <= 0.0 {
                bail!("time limit must be positive, got {limit}");
            }
        }
        if let Some(gap) = config.mip_gap {
            if !(0.0..1.0).contains(&gap) {
                bail!("MIP gap must lie in [0, 1), got {gap}");
            }
        }
        Ok(config)
    }

    /// Place a relative output path under `[output] dir`.
    pub fn output_path(&self, path: &Path) -> PathBuf {
        match &self.output.dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }
}

/// `"auto"` means one thread per logical CPU.
pub fn resolve_threads(value: &str) -> Result<usize> {
    if value.eq_ignore_ascii_case("auto") {
        return Ok(num_cpus::get());
    }
    match value.parse::<usize>() {
        Ok(0) => bail!("thread count must be at least 1"),
        Ok(n) => Ok(n),
        Err(_) => Err(anyhow!("invalid thread count '{value}' (use a number or 'auto')")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let config = DaucConfig::load(None).unwrap();
        assert_eq!(config, DaucConfig::default());
        let solver = config.solver_config(&SolverArgs::default()).unwrap();
        assert_eq!(solver, SolverConfig::default());
    }

    #[test]
    fn test_file_values_and_overrides() {
        let config: DaucConfig = toml::from_str(
            r#"
            [solver]
            threads = 3
            mip_gap = 0.01
            milp_solver = "clarabel_relaxation"

            [output]
            commitment_table = false
            "#,
        )
        .unwrap();
        assert!(!config.output.commitment_table);

        let solver = config.solver_config(&SolverArgs::default()).unwrap();
        assert_eq!(solver.threads, Some(3));
        assert_eq!(solver.mip_gap, Some(0.01));
        assert_eq!(solver.milp_solver, MilpSolverKind::ClarabelRelaxation);

        let args = SolverArgs {
            threads: Some("2".into()),
            milp_solver: Some(MilpSolverKind::Microlp),
            ..SolverArgs::default()
        };
        let solver = config.solver_config(&args).unwrap();
        assert_eq!(solver.threads, Some(2));
        assert_eq!(solver.milp_solver, MilpSolverKind::Microlp);
    }

    #[test]
    fn test_auto_threads() {
        let config: DaucConfig = toml::from_str("[solver]\nthreads = \"auto\"\n").unwrap();
        let solver = config.solver_config(&SolverArgs::default()).unwrap();
        assert_eq!(solver.threads, Some(num_cpus::get()));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(resolve_threads("0").is_err());
        assert!(resolve_threads("many").is_err());
        let args = SolverArgs {
            mip_gap: Some(1.5),
            ..SolverArgs::default()
        };
        assert!(DaucConfig::default().solver_config(&args).is_err());
        assert!(toml::from_str::<DaucConfig>("[solver]\nmilp_solver = \"cplex\"\n").is_err());
    }

    #[test]
    fn test_output_dir() {
        let config = DaucConfig {
            output: OutputSection {
                dir: Some(PathBuf::from("results")),
                commitment_table: true,
            },
            ..DaucConfig::default()
        };
        assert_eq!(config.output_path(Path::new("uc.json")), PathBuf::from("results/uc.json"));
        assert_eq!(config.output_path(Path::new("/tmp/uc.json")), PathBuf::from("/tmp/uc.json"));
    }
}
