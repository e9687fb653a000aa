use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};
use tempfile::TempDir;
use transync_fs::{ConfigStore, Error, NormalizedPath};

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Sample {
    code: String,
    url: String,
}

fn sample() -> Sample {
    Sample {
        code: "proj".into(),
        url: "/srv/proj".into(),
    }
}

#[test]
fn saves_and_loads_toml_json_and_yaml() {
    let temp = TempDir::new().unwrap();
    let store = ConfigStore::new();
    for name in ["config.toml", "config.json", "config.yaml"] {
        let path = NormalizedPath::new(temp.path().join(name));
        store.save(&path, &sample()).unwrap();
        let loaded: Sample = store.load(&path).unwrap();
        assert_eq!(loaded, sample(), "format {name}");
    }
}

#[test]
fn rejects_unknown_extension() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("config.ini"));
    std::fs::write(path.to_native(), "code=proj").unwrap();

    let err = ConfigStore::new().load::<Sample>(&path).unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat { extension } if extension == "ini"));
}

#[test]
fn reports_parse_errors_with_format() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("config.toml"));
    std::fs::write(path.to_native(), "code = ").unwrap();

    let err = ConfigStore::new().load::<Sample>(&path).unwrap_err();
    assert!(matches!(err, Error::ConfigParse { format, .. } if format == "TOML"));
}
