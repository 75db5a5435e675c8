//! Tests for harness configuration.

use super::*;

#[test]
fn test_toml_parsing() {
    let toml = r#"
        timeout_secs = 30
        verbose = false

        [[runs]]
        name = "iris"
        dataset = ["iris.csv"]
        options = "-k 3 -l 10"

        [[runs]]
        name = "corel"
        dataset = ["corel_ref.csv", "corel_query.csv"]
        options = "-k 5"
    "#;

    let config = HarnessConfig::from_toml_str(toml).unwrap();
    assert_eq!(config.timeout_secs, 30);
    assert!(!config.verbose);
    assert_eq!(config.runs.len(), 2);
    assert_eq!(config.runs[0].options, "-k 3 -l 10");
    assert_eq!(
        config.runs[0].dataset_source().unwrap(),
        DatasetSource::Single(PathBuf::from("iris.csv"))
    );
}

#[test]
fn test_yaml_parsing() {
    let yaml = r#"
        timeout_secs: 30
        runs:
          - name: corel
            dataset: [corel_ref.csv, corel_query.csv]
            options: "-k 5 --metric l1"
    "#;

    let config = HarnessConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
    assert!(config.verbose);

    let source = config.runs[0].dataset_source().unwrap();
    assert_eq!(source.reference(), Path::new("corel_ref.csv"));
    assert_eq!(source.query(), Some(Path::new("corel_query.csv")));
}

#[test]
fn test_defaults() {
    let config = HarnessConfig::from_toml_str("").unwrap();
    assert_eq!(config.timeout_secs, 0);
    assert_eq!(config.timeout(), None);
    assert!(config.verbose);
    assert!(config.runs.is_empty());
}

#[test]
fn test_rejects_three_dataset_files() {
    let toml = r#"
        [[runs]]
        name = "bad"
        dataset = ["a.csv", "b.csv", "c.csv"]
        options = "-k 1"
    "#;

    let err = HarnessConfig::from_toml_str(toml).unwrap_err();
    match err {
        ConfigError::Invalid(reason) => {
            assert!(reason.contains("run 'bad'"));
            assert!(reason.contains("got 3"));
        }
        other => panic!("expected Invalid, got {other:?}"),
    }
}

#[test]
fn test_rejects_empty_dataset_list() {
    let yaml = r#"
        runs:
          - name: empty
            dataset: []
    "#;

    assert!(matches!(
        HarnessConfig::from_yaml_str(yaml),
        Err(ConfigError::Invalid(_))
    ));
}

#[test]
fn test_builder() {
    let config = HarnessConfig::new()
        .with_timeout_secs(5)
        .with_verbose(false)
        .with_run(RunConfig::new("one", ["a.csv"], "-k 1"))
        .with_run(RunConfig::new("two", ["a.csv", "b.csv"], "-k 2"));

    assert_eq!(config.timeout(), Some(Duration::from_secs(5)));
    assert_eq!(config.runs.len(), 2);
    assert!(config.validate().is_ok());
}

#[test]
fn test_load_dispatches_on_extension() {
    let dir = tempfile::tempdir().unwrap();

    let yaml_path = dir.path().join("suite.yaml");
    std::fs::write(&yaml_path, "timeout_secs: 7\n").unwrap();
    assert_eq!(HarnessConfig::load(&yaml_path).unwrap().timeout_secs, 7);

    let toml_path = dir.path().join("suite.toml");
    std::fs::write(&toml_path, "timeout_secs = 9\n").unwrap();
    assert_eq!(HarnessConfig::load(&toml_path).unwrap().timeout_secs, 9);
}

#[test]
fn test_load_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = HarnessConfig::load(dir.path().join("missing.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}
