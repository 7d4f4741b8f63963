//! SOCP duality CLI command

use std::path::Path;

use anyhow::{Context, Result};
use dauc_algo::socp::{check_duality, SocpData, STRONG_DUALITY_TOL};
use dauc_cli::cli::{SocpCommands, SolverArgs};
use dauc_cli::config::DaucConfig;
use dauc_io::{write_duality_json, write_model_lp};
use tracing::info;

use crate::commands::util::ensure_parent;

pub fn handle(command: &SocpCommands, config: &DaucConfig) -> Result<()> {
    match command {
        SocpCommands::Duality {
            lp,
            primal_lp,
            out,
            solver,
        } => handle_duality(lp.as_deref(), primal_lp.as_deref(), out.as_deref(), solver, config),
    }
}

fn handle_duality(
    dual_lp: Option<&Path>,
    primal_lp: Option<&Path>,
    out: Option<&Path>,
    args: &SolverArgs,
    config: &DaucConfig,
) -> Result<()> {
    let solver = config.solver_config(args)?;
    let data = SocpData::reference();

    if let Some(lp) = primal_lp {
        let path = config.output_path(lp);
        ensure_parent(&path)?;
        write_model_lp(&data.primal_model()?, &path)?;
        info!("Wrote primal model to {}", path.display());
    }
    if let Some(lp) = dual_lp {
        let path = config.output_path(lp);
        ensure_parent(&path)?;
        write_model_lp(&data.dual_model()?, &path)?;
        info!("Wrote dual model to {}", path.display());
    }

    let report = check_duality(&data, &solver).context("solving SOCP primal/dual pair")?;
    println!("Primal objective: {:.6}", report.primal);
    println!("Dual objective:   {:.6}", report.dual);
    println!("Gap:              {:.3e}", report.gap);
    println!(
        "Weak duality:     {}",
        if report.weak_holds { "holds" } else { "violated" }
    );
    println!(
        "Strong duality:   {} (relative tolerance {:e})",
        if report.strong_holds { "holds" } else { "violated" },
        STRONG_DUALITY_TOL
    );
    let x: Vec<String> = report.primal_x.iter().map(|v| format!("{v:.6}")).collect();
    println!("Primal x:         [{}]", x.join(", "));

    if let Some(out) = out {
        let path = config.output_path(out);
        ensure_parent(&path)?;
        write_duality_json(&report, &path)?;
        info!("Wrote duality report to {}", path.display());
    }
    Ok(())
}
