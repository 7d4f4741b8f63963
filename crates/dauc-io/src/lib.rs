//! # dauc-io: Case Files & Result Export
//!
//! Reads unit commitment cases, reports on their validity and writes solver
//! results back out.
//!
//! | Format | File Extensions | Read | Write |
//! |--------|-----------------|------|-------|
//! | JSON case | `.json` | yes | yes |
//! | TOML case | `.toml` | yes | yes |
//! | UC solution / duality report | `.json` | | yes |
//! | Model | `.lp` | | yes |
//!
//! ```rust,no_run
//! use dauc_io::{load_case, ValidationReport};
//!
//! fn main() -> anyhow::Result<()> {
//!     let case = load_case("three_unit.json")?;
//!     let report = ValidationReport::from_case(&case);
//!     println!("{report}");
//!     Ok(())
//! }
//! ```

pub mod export;
pub mod format;
pub mod load;
pub mod report;

pub use export::{
    solution_to_json_value, write_duality_json, write_json, write_model_lp, write_solution_json,
};
pub use format::CaseFormat;
pub use load::{load_case, parse_case, save_case};
pub use report::{CaseIssue, CaseStats, Severity, ValidationReport};
