//! CPLEX LP text writer
//!
//! Produces the sections `Minimize|Maximize`, `Subject To`, `Bounds`,
//! `Generals`, `Binaries` and `End`. Cones are written as bracketed quadratic
//! rows, e.g. `CONE: [ - 2 z0 * z1 + z2 ^2 + z3 ^2 ] <= 0`.

use std::path::Path;

use super::{ConeKind, LinExpr, Model, ObjectiveSense, VarDef, VarDomain};
use crate::error::DaucResult;

/// Render `model` as LP text
pub fn write_lp(model: &Model) -> String {
    let names: Vec<String> = model.variables().iter().map(|v| sanitize(&v.name)).collect();
    let mut out = String::new();

    out.push_str(&format!("\\ Model {}\n", model.name()));
    match model.sense() {
        ObjectiveSense::Minimize => out.push_str("Minimize\n obj: "),
        ObjectiveSense::Maximize => out.push_str("Maximize\n obj: "),
    }
    out.push_str(&fmt_lin(model.objective(), &names, true));
    out.push('\n');

    out.push_str("Subject To\n");
    for c in model.constraints() {
        out.push_str(&format!(
            " {}: {} {} {}\n",
            sanitize(&c.name),
            fmt_lin(&c.expr, &names, false),
            c.sense.symbol(),
            fmt_num(c.rhs)
        ));
    }
    for c in model.cones() {
        out.push_str(&format!(" {}: {} <= 0\n", sanitize(&c.name), fmt_cone(&c.cone, &names)));
    }

    let bounds: Vec<String> = model
        .variables()
        .iter()
        .zip(&names)
        .filter_map(|(def, name)| fmt_bound(def, name))
        .collect();
    if !bounds.is_empty() {
        out.push_str("Bounds\n");
        for b in bounds {
            out.push_str(&format!(" {b}\n"));
        }
    }

    let of_domain = |domain: VarDomain| -> Vec<&String> {
        model
            .variables()
            .iter()
            .zip(&names)
            .filter(|(def, _)| def.domain == domain)
            .map(|(_, n)| n)
            .collect()
    };
    let generals = of_domain(VarDomain::Integer);
    if !generals.is_empty() {
        out.push_str("Generals\n");
        for n in generals {
            out.push_str(&format!(" {n}\n"));
        }
    }
    let binaries = of_domain(VarDomain::Binary);
    if !binaries.is_empty() {
        out.push_str("Binaries\n");
        for n in binaries {
            out.push_str(&format!(" {n}\n"));
        }
    }

    out.push_str("End\n");
    out
}

/// Write `model` to `path` in LP format
pub fn write_lp_file(model: &Model, path: &Path) -> DaucResult<()> {
    std::fs::write(path, write_lp(model))?;
    Ok(())
}

/// LP names may not contain spaces, operators or brackets, nor start with a
/// digit or a period.
fn sanitize(name: &str) -> String {
    let mut s: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '#') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if s.is_empty() || s.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        s.insert(0, '_');
    }
    s
}

fn fmt_num(v: f64) -> String {
    if (v - v.round()).abs() < 1e-9 && v.abs() < 1e15 {
        format!("{}", v.round() as i64)
    } else {
        format!("{}", v)
    }
}

fn fmt_term(coef: f64, name: &str, first: bool) -> String {
    let sign = if coef < 0.0 { "-" } else { "+" };
    let mag = coef.abs();
    let body = if (mag - 1.0).abs() < 1e-12 {
        name.to_string()
    } else {
        format!("{} {}", fmt_num(mag), name)
    };
    if first && coef >= 0.0 {
        body
    } else {
        format!("{sign} {body}")
    }
}

fn fmt_lin(e: &LinExpr, names: &[String], keep_constant: bool) -> String {
    let mut parts: Vec<String> = e
        .terms()
        .enumerate()
        .map(|(i, (v, c))| fmt_term(c, &names[v.index()], i == 0))
        .collect();
    if keep_constant && e.constant_term() != 0.0 {
        let c = e.constant_term();
        let sign = if c < 0.0 { "-" } else { "+" };
        parts.push(format!("{sign} {}", fmt_num(c.abs())));
    }
    if parts.is_empty() {
        parts.push("0".to_string());
    }
    parts.join(" ")
}

fn fmt_cone(cone: &ConeKind, names: &[String]) -> String {
    let squares = |xs: &[super::VarId]| -> String {
        xs.iter()
            .map(|x| format!(" + {} ^2", names[x.index()]))
            .collect::<String>()
    };
    match cone {
        ConeKind::Quadratic { t, xs } => {
            format!("[ - {} ^2{} ]", names[t.index()], squares(xs))
        }
        ConeKind::RotatedQuadratic { u, v, xs } => format!(
            "[ - 2 {} * {}{} ]",
            names[u.index()],
            names[v.index()],
            squares(xs)
        ),
    }
}

fn fmt_bound(def: &VarDef, name: &str) -> Option<String> {
    if def.domain == VarDomain::Binary {
        return None;
    }
    let lo = def.lower;
    let hi = def.upper;
    match (lo.is_finite(), hi.is_finite()) {
        (false, false) => Some(format!("{name} free")),
        (true, false) if lo == 0.0 => None,
        (true, false) => Some(format!("{name} >= {}", fmt_num(lo))),
        (false, true) => Some(format!("-inf <= {name} <= {}", fmt_num(hi))),
        (true, true) if lo == hi => Some(format!("{name} = {}", fmt_num(lo))),
        (true, true) => Some(format!("{} <= {name} <= {}", fmt_num(lo), fmt_num(hi))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ConstraintKind, LinearConstraint, Sense, Site};

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("power[G1,3]"), "power_G1_3_");
        assert_eq!(sanitize("1st"), "_1st");
        assert_eq!(sanitize("ok_name"), "ok_name");
    }

    #[test]
    fn test_fmt_num() {
        assert_eq!(fmt_num(3.0), "3");
        assert_eq!(fmt_num(-2.0), "-2");
        assert_eq!(fmt_num(0.5), "0.5");
    }

    #[test]
    fn test_write_small_model() {
        let mut m = Model::new("demo");
        let x = m.add_continuous("x", 0.0, f64::INFINITY);
        let y = m.add_free("y");
        let u = m.add_binary("u");
        let k = m.add_var("k", 0.0, 5.0, VarDomain::Integer);
        m.add_constraint(LinearConstraint::new(
            "row1",
            ConstraintKind::Inequality,
            Site::none(),
            2.0 * x - y + 0.5 * k,
            Sense::Le,
            4.0,
        ))
        .unwrap();
        m.add_cone(
            "CONE",
            ConstraintKind::Cone,
            ConeKind::RotatedQuadratic { u: x, v: k, xs: vec![y] },
        )
        .unwrap();
        m.set_objective(LinExpr::from(x) - 3.0 * u, ObjectiveSense::Maximize);

        let lp = write_lp(&m);
        assert!(lp.contains("Maximize\n obj: x - 3 u\n"));
        assert!(lp.contains(" row1: 2 x - y + 0.5 k <= 4\n"));
        assert!(lp.contains(" CONE: [ - 2 x * k + y ^2 ] <= 0\n"));
        assert!(lp.contains(" y free\n"));
        assert!(lp.contains(" 0 <= k <= 5\n"));
        assert!(lp.contains("Generals\n k\n"));
        assert!(lp.contains("Binaries\n u\n"));
        assert!(lp.ends_with("End\n"));
    }

    #[test]
    fn test_write_lp_file() {
        let mut m = Model::new("file");
        let x = m.add_continuous("x", 0.0, 1.0);
        m.set_objective(LinExpr::from(x), ObjectiveSense::Minimize);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.lp");
        write_lp_file(&m, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("\\ Model file"));
    }
}
