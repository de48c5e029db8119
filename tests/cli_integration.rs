use assert_cmd::cargo::cargo_bin_cmd;
use mockito::Matcher;
use predicates::prelude::*;
use serde_json::json;

#[test]
fn config_path_outputs_path() {
    cargo_bin_cmd!("omero-duplicate")
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.json"));
}

#[test]
fn config_set_then_show_masks_session() {
    let dir = tempfile::tempdir().unwrap();
    let config_dir = dir.path().join("omero-duplicate");

    cargo_bin_cmd!("omero-duplicate")
        .env("XDG_CONFIG_HOME", dir.path())
        .args(["config", "set", "--session", "abcdef123456"])
        .assert()
        .success();

    assert!(config_dir.join("config.json").exists());

    cargo_bin_cmd!("omero-duplicate")
        .env("XDG_CONFIG_HOME", dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("********3456"))
        .stdout(predicate::str::contains("abcdef").not());
}

#[test]
fn missing_session_shows_error() {
    cargo_bin_cmd!("omero-duplicate")
        .env_remove("OMERO_SESSION_KEY")
        .env("XDG_CONFIG_HOME", tempfile::tempdir().unwrap().path())
        .args(["duplicate", "Dataset:50"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing session"));
}

#[test]
fn help_flag_works() {
    cargo_bin_cmd!("omero-duplicate")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("omero-duplicate"));
}

#[test]
fn flag_without_classes_is_usage_error() {
    cargo_bin_cmd!("omero-duplicate")
        .args(["duplicate", "Dataset:50", "--ignore"])
        .assert()
        .code(2);
}

#[test]
fn implicit_duplicate_end_to_end() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/cmd")
        .match_header("X-Session-Key", "sess")
        .match_body(Matcher::Json(json!({
            "@type": "omero.cmd.Duplicate",
            "targetObjects": {"Dataset": [50]},
            "dryRun": false,
            "typesToReference": ["Image"],
            "typesToIgnore": ["DatasetImageLink"],
        })))
        .with_body(r#"{"@type":"omero.cmd.DuplicateResponse","duplicates":{"ome.model.containers.Dataset":[60]}}"#)
        .with_header("content-type", "application/json")
        .expect(1)
        .create();

    let url = server.url();
    // "omero-duplicate Dataset:50" works the same as "omero-duplicate duplicate Dataset:50"
    cargo_bin_cmd!("omero-duplicate")
        .env("XDG_CONFIG_HOME", tempfile::tempdir().unwrap().path())
        .env_remove("OMERO_SESSION_KEY")
        .args([
            "Dataset:50",
            "--reference",
            "Image",
            "--ignore",
            "DatasetImageLink",
            "--report",
            "--server",
            url.as_str(),
            "--session",
            "sess",
        ])
        .assert()
        .success()
        .stdout("Duplicate Dataset:50 ... ok\nDuplicates\n  Dataset:60\n");

    mock.assert();
}

#[test]
fn server_error_fails_command() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/cmd")
        .with_body(
            r#"{"@type":"omero.cmd.ERR","category":"graph","name":"unknown-class","parameters":{"class":"Nope"}}"#,
        )
        .with_header("content-type", "application/json")
        .create();

    cargo_bin_cmd!("omero-duplicate")
        .env("XDG_CONFIG_HOME", tempfile::tempdir().unwrap().path())
        .env("OMERO_SERVER", server.url())
        .env("OMERO_SESSION_KEY", "sess")
        .args(["duplicate", "Dataset:50", "--duplicate", "Nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown-class"));

    mock.assert();
}

#[test]
fn server_error_with_numeric_parameters_fails_command() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/cmd")
        .with_body(
            r#"{"@type":"omero.cmd.ERR","category":"graph","name":"too-many","parameters":{"limit":5}}"#,
        )
        .with_header("content-type", "application/json")
        .create();

    cargo_bin_cmd!("omero-duplicate")
        .env("XDG_CONFIG_HOME", tempfile::tempdir().unwrap().path())
        .env("OMERO_SERVER", server.url())
        .env("OMERO_SESSION_KEY", "sess")
        .args(["Dataset:50", "--report"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("... ok").not())
        .stderr(predicate::str::contains("'too-many' limit=5"));

    mock.assert();
}

#[test]
fn negative_timeout_is_usage_error() {
    cargo_bin_cmd!("omero-duplicate")
        .args(["Dataset:50", "--timeout=-1"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("greater than 0"));
}
