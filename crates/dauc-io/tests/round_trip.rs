//! Case file round trips through every supported format

use dauc_algo::test_utils::three_unit_case;
use dauc_io::{load_case, save_case, CaseFormat, ValidationReport};
use tempfile::tempdir;

#[test]
fn json_and_toml_round_trip() {
    let case = three_unit_case();
    let dir = tempdir().unwrap();
    for format in CaseFormat::ALL {
        let path = dir.path().join(format!("case.{}", format.extensions()[0]));
        save_case(&case, &path).unwrap();
        let back = load_case(&path).unwrap();
        assert_eq!(back, case, "{}", format.friendly_name());
    }
}

#[test]
fn explicit_system_load_survives_toml() {
    let mut case = three_unit_case();
    case.system.load_mw = Some(vec![160.0, 200.0, 240.0, 210.0]);
    let dir = tempdir().unwrap();
    let path = dir.path().join("case.toml");
    save_case(&case, &path).unwrap();
    let back = load_case(&path).unwrap();
    assert_eq!(back.system.load_mw, case.system.load_mw);
    assert!(ValidationReport::from_case(&back).is_valid());
}

#[test]
fn unsupported_extension_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("case.dat");
    std::fs::write(&path, "").unwrap();
    assert!(load_case(&path).is_err());
    assert!(save_case(&three_unit_case(), &path).is_err());
}
