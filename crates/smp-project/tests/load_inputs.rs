use smp_project::{ProjectError, TableError, load_config, load_inputs};
use std::fs;
use std::path::PathBuf;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(name);
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

const CONFIG: &str = "\
states: 2
t_max: 1.0
time_step: 0.5
tol: 1.0e-6
transition_file: edges.csv
initial_file: initial.csv
manifest_file: out/manifest.json
";

#[test]
fn loads_yaml_config_and_tables_relative_to_config() {
    let dir = scratch_dir("smp_project_yaml");
    fs::write(dir.join("run.yaml"), CONFIG).unwrap();
    fs::write(dir.join("edges.csv"), "# from,to,p\n0,1,0.8\n\n1,0,0.2\n").unwrap();
    fs::write(dir.join("initial.csv"), "1,0\n0,1\n").unwrap();

    let inputs = load_inputs(&dir.join("run.yaml")).unwrap();
    assert_eq!(inputs.config.states, 2);
    assert_eq!(inputs.edges.len(), 2);
    assert_eq!(inputs.edges[0].probability, 0.8);
    assert_eq!(inputs.initial, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
    assert_eq!(
        inputs.output_path(),
        dir.join("transition_probabilities.csv")
    );
    assert_eq!(
        inputs.manifest_path(),
        Some(dir.join("out").join("manifest.json"))
    );
}

#[test]
fn loads_json_config() {
    let dir = scratch_dir("smp_project_json");
    let json = r#"{
        "states": 3,
        "t_max": 2.0,
        "time_step": 1.0,
        "tol": 1e-4,
        "transition_file": "edges.csv",
        "initial_file": "initial.csv",
        "threads": 2,
        "quadrature": { "max_depth": 20 }
    }"#;
    fs::write(dir.join("run.json"), json).unwrap();
    let config = load_config(&dir.join("run.json")).unwrap();
    assert_eq!(config.threads, Some(2));
    assert_eq!(config.quadrature.max_depth, 20);
    assert_eq!(config.quadrature.min_width, 1e-12);
}

#[test]
fn missing_config_is_a_read_error() {
    let dir = scratch_dir("smp_project_missing");
    let err = load_config(&dir.join("absent.yaml")).unwrap_err();
    let message = err.to_string();
    match err {
        ProjectError::ConfigRead { source, .. } => {
            assert!(message.contains("absent.yaml"));
            assert!(message.ends_with(&source.to_string()), "{message}");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn unknown_extension_is_rejected() {
    let dir = scratch_dir("smp_project_xml");
    fs::write(dir.join("run.xml"), "<configuration/>").unwrap();
    assert!(matches!(
        load_config(&dir.join("run.xml")),
        Err(ProjectError::UnsupportedFormat { .. })
    ));
}

#[test]
fn invalid_values_fail_validation() {
    let dir = scratch_dir("smp_project_invalid");
    fs::write(dir.join("run.yaml"), CONFIG.replace("time_step: 0.5", "time_step: -1")).unwrap();
    assert!(matches!(
        load_config(&dir.join("run.yaml")),
        Err(ProjectError::Validation(_))
    ));
}

#[test]
fn missing_table_is_reported() {
    let dir = scratch_dir("smp_project_no_table");
    fs::write(dir.join("run.yaml"), CONFIG).unwrap();
    fs::write(dir.join("initial.csv"), "1,0\n0,1\n").unwrap();
    let err = load_inputs(&dir.join("run.yaml")).unwrap_err();
    assert!(matches!(err, ProjectError::Table(TableError::Open { .. })));
}

#[test]
fn malformed_table_row_is_fatal() {
    let dir = scratch_dir("smp_project_bad_row");
    fs::write(dir.join("run.yaml"), CONFIG).unwrap();
    fs::write(dir.join("edges.csv"), "0,1,0.8\n1,0\n").unwrap();
    fs::write(dir.join("initial.csv"), "1,0\n0,1\n").unwrap();
    let err = load_inputs(&dir.join("run.yaml")).unwrap_err();
    match err {
        ProjectError::Table(TableError::Malformed { line, .. }) => assert_eq!(line, 2),
        other => panic!("unexpected {other:?}"),
    }
}
