use clap::{Parser, Subcommand, ValueEnum, ValueHint};
use dauc_core::MilpSolverKind;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "dauc", author, version, about, long_about = None)]
pub struct Cli {
    /// Set the logging level
    #[arg(long, default_value = "info")]
    pub log_level: tracing::Level,

    /// TOML file with [solver] and [output] sections
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Day-ahead unit commitment
    Uc {
        #[command(subcommand)]
        command: UcCommands,
    },
    /// Second-order cone primal/dual demonstration
    Socp {
        #[command(subcommand)]
        command: SocpCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum UcCommands {
    /// Build and solve the unit commitment model
    Solve {
        /// Case file (.json or .toml)
        #[arg(value_hint = ValueHint::FilePath)]
        case: PathBuf,
        /// Write the solution as JSON
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: Option<PathBuf>,
        /// Also write the model in LP format
        #[arg(long, value_hint = ValueHint::FilePath)]
        lp: Option<PathBuf>,
        /// Output format for stdout
        #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
        format: OutputFormat,
        #[command(flatten)]
        solver: SolverArgs,
    },
    /// Build the model without solving and write it in LP format
    Build {
        /// Case file (.json or .toml)
        #[arg(value_hint = ValueHint::FilePath)]
        case: PathBuf,
        /// Destination LP file
        #[arg(long, value_hint = ValueHint::FilePath)]
        lp: PathBuf,
    },
    /// Check a case file for structural errors and suspicious data
    Validate {
        /// Case file (.json or .toml)
        #[arg(value_hint = ValueHint::FilePath)]
        case: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
pub enum SocpCommands {
    /// Solve the primal and dual and compare objectives
    Duality {
        /// Write the dual model in LP format
        #[arg(long, value_hint = ValueHint::FilePath)]
        lp: Option<PathBuf>,
        /// Write the primal model in LP format
        #[arg(long, value_hint = ValueHint::FilePath)]
        primal_lp: Option<PathBuf>,
        /// Write the duality report as JSON
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: Option<PathBuf>,
        #[command(flatten)]
        solver: SolverArgs,
    },
}

/// Solver options; each overrides the value from `--config`
#[derive(clap::Args, Debug, Clone, Default)]
pub struct SolverArgs {
    /// Threads hint for the solver (number or 'auto')
    #[arg(long)]
    pub threads: Option<String>,
    /// Time limit in seconds
    #[arg(long)]
    pub time_limit: Option<f64>,
    /// Relative MIP gap
    #[arg(long)]
    pub mip_gap: Option<f64>,
    /// MILP engine: microlp, highs or clarabel_relaxation
    #[arg(long)]
    pub milp_solver: Option<MilpSolverKind>,
    /// Show solver output
    #[arg(long)]
    pub solver_verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Summary and commitment table
    Plain,
    /// Solution JSON
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_solver_flags_parse() {
        let cli = Cli::try_parse_from([
            "dauc",
            "uc",
            "solve",
            "case.json",
            "--time-limit",
            "30",
            "--mip-gap",
            "0.01",
            "--milp-solver",
            "microlp",
        ])
        .unwrap();
        let Commands::Uc {
            command: UcCommands::Solve { solver, format, .. },
        } = cli.command
        else {
            panic!("expected uc solve");
        };
        assert_eq!(format, OutputFormat::Plain);
        assert_eq!(solver.time_limit, Some(30.0));
        assert_eq!(solver.mip_gap, Some(0.01));
        assert_eq!(solver.milp_solver, Some(MilpSolverKind::Microlp));
    }
}
