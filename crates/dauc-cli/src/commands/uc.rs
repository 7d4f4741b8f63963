//! Unit commitment CLI commands

use std::path::Path;

use anyhow::{bail, Context, Result};
use dauc_algo::uc::{solve_formulation, UcFormulation};
use dauc_cli::cli::{OutputFormat, SolverArgs, UcCommands};
use dauc_cli::config::DaucConfig;
use dauc_io::{load_case, solution_to_json_value, write_model_lp, write_solution_json, ValidationReport};
use tracing::{info, warn};

use crate::commands::util::{ensure_parent, print_commitment_table, print_row_counts};

pub fn handle(command: &UcCommands, config: &DaucConfig) -> Result<()> {
    match command {
        UcCommands::Solve {
            case,
            out,
            lp,
            format,
            solver,
        } => handle_solve(case, out.as_deref(), lp.as_deref(), *format, solver, config),
        UcCommands::Build { case, lp } => handle_build(case, lp, config),
        UcCommands::Validate { case } => handle_validate(case),
    }
}

fn handle_solve(
    case_path: &Path,
    out: Option<&Path>,
    lp: Option<&Path>,
    format: OutputFormat,
    args: &SolverArgs,
    config: &DaucConfig,
) -> Result<()> {
    let solver = config.solver_config(args)?;
    let case = load_case(case_path)?;
    let formulation = UcFormulation::build(&case).context("building unit commitment model")?;

    if let Some(lp) = lp {
        let path = config.output_path(lp);
        ensure_parent(&path)?;
        write_model_lp(formulation.model(), &path)?;
        info!("Wrote LP model to {}", path.display());
    }

    let solution =
        solve_formulation(&case, formulation, &solver).context("solving unit commitment model")?;
    if !solution.is_optimal() {
        warn!(status = %solution.status, "no optimal commitment found");
    }

    match format {
        OutputFormat::Plain => {
            println!("{}", solution.summary());
            if config.output.commitment_table && solution.is_optimal() {
                println!();
                print_commitment_table(&solution)?;
            }
        }
        OutputFormat::Json => {
            let value = solution_to_json_value(&solution)?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }

    if let Some(out) = out {
        let path = config.output_path(out);
        ensure_parent(&path)?;
        write_solution_json(&solution, &path)?;
        info!("Wrote solution to {}", path.display());
    }
    Ok(())
}

fn handle_build(case_path: &Path, lp: &Path, config: &DaucConfig) -> Result<()> {
    let case = load_case(case_path)?;
    let formulation = UcFormulation::build(&case).context("building unit commitment model")?;
    let model = formulation.model();
    println!(
        "Model {}: {} variables ({} binary), {} rows",
        model.name(),
        model.num_vars(),
        model.num_integer_vars(),
        model.constraints().len()
    );
    print_row_counts(model)?;

    let path = config.output_path(lp);
    ensure_parent(&path)?;
    write_model_lp(model, &path)?;
    println!("Wrote LP model to {}", path.display());
    Ok(())
}

fn handle_validate(case_path: &Path) -> Result<()> {
    let case = load_case(case_path)?;
    let report = ValidationReport::from_case(&case);
    println!("{report}");
    if !report.is_valid() {
        bail!("case '{}' failed validation", case.name);
    }
    Ok(())
}
