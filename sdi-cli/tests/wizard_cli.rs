mod common;

use std::fs;

use assert_cmd::prelude::*;
use common::{sdi_cmd, serve_once, unreachable_url};
use predicates::prelude::*;
use predicates::str::contains;
use serde_json::{json, Value};
use tempfile::TempDir;

fn write_levels(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("levels.json");
    let levels = json!([
        { "value": 1, "label": "Licence 1", "classes": [{ "value": 4, "label": "L1A" }] },
        { "value": 2, "label": "Licence 2", "classes": [
            { "value": 5, "label": "L2 RIT" },
            { "value": 6, "label": "L2 SIGL" }
        ] }
    ]);
    fs::write(&path, levels.to_string()).expect("write levels");
    path
}

fn start_esatic(home: &TempDir) {
    let levels = write_levels(home);
    sdi_cmd(home.path())
        .args(["wizard", "start", "--levels"])
        .arg(&levels)
        .assert()
        .success()
        .stdout(contains("ESATIC team, 2 level(s)"));
}

fn enter_leader(home: &TempDir) {
    sdi_cmd(home.path())
        .args([
            "wizard", "leader", "--level", "2", "--matricule", "20-ESATIC042",
            "--last-name", "Yao", "--first-name", "Marc", "--email", "marc@b.com",
            "--gender", "homme", "--class", "5", "--team-name", "Les Batisseurs",
        ])
        .assert()
        .success()
        .stdout(contains("Leader saved for team 'Les Batisseurs'"))
        .stdout(contains("L2 SIGL"));
}

fn enter_members(home: &TempDir) {
    sdi_cmd(home.path())
        .args([
            "wizard", "members", "--member", "2", "--matricule", "21-ESATIC001",
            "--last-name", "Koffi", "--first-name", "Ange", "--email", "a@b.com",
            "--gender", "Homme", "--class", "5",
        ])
        .assert()
        .success()
        .stdout(contains("Saved member 2"))
        .stdout(contains("incomplete").not());

    sdi_cmd(home.path())
        .args([
            "wizard", "members", "--member", "3", "--matricule", "21-ESATIC002",
            "--last-name", "Bamba", "--first-name", "Awa", "--email", "awa@b.com",
            "--gender", "Femme",
        ])
        .assert()
        .success()
        .stdout(contains("still incomplete: please select the class of member 3"));

    sdi_cmd(home.path())
        .args(["wizard", "members", "--member", "3", "--class", "6"])
        .assert()
        .success()
        .stdout(contains("incomplete").not());
}

fn show_json(home: &TempDir) -> Value {
    let output = sdi_cmd(home.path())
        .args(["wizard", "show", "--json"])
        .output()
        .expect("run show");
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).expect("show emits JSON")
}

#[test]
fn full_registration_purges_wizard_state() {
    let home = TempDir::new().expect("home");
    start_esatic(&home);
    enter_leader(&home);
    enter_members(&home);

    let view = show_json(&home);
    assert_eq!(view["comeFromEsatic"], json!(true));
    assert_eq!(view["classes"].as_array().map(Vec::len), Some(2));
    assert_eq!(view["members"][1]["information"]["lastName"], json!("Bamba"));
    assert_eq!(view["members"][1]["information"]["class"], json!(6));

    let (url, rx) = serve_once("200 OK", r#"{"status":true,"message":"ok"}"#);
    sdi_cmd(home.path())
        .args(["--api-url", &url, "wizard", "submit"])
        .assert()
        .success()
        .stdout(contains("Team 'Les Batisseurs' registered"));

    let request = rx.recv().expect("request captured");
    assert!(request.request_line.starts_with("POST /api/groupe/register"));
    let body = request.body;
    assert_eq!(body["esatic"], json!(1));
    assert_eq!(body["classe_chef"], json!(5));
    assert_eq!(body["nom_m3"], json!("Bamba"));
    assert_eq!(body["genre_m3"], json!("Femme"));
    assert_eq!(body["photo_groupe"], json!("pas_de_photo.png"));

    let view = show_json(&home);
    assert_eq!(view["leader"], Value::Null);
    assert_eq!(view["members"][0]["information"]["lastName"], json!(""));
}

#[test]
fn incomplete_members_are_reported_and_not_sent() {
    let home = TempDir::new().expect("home");
    start_esatic(&home);
    enter_leader(&home);

    sdi_cmd(home.path())
        .args(["--api-url", &unreachable_url(), "wizard", "submit"])
        .assert()
        .failure()
        .stderr(contains("please fill in every required field for member 2"))
        .stderr(contains("your entries are kept"));
}

#[test]
fn failed_request_keeps_entries() {
    let home = TempDir::new().expect("home");
    start_esatic(&home);
    enter_leader(&home);
    enter_members(&home);

    sdi_cmd(home.path())
        .args(["--api-url", &unreachable_url(), "wizard", "submit"])
        .assert()
        .failure()
        .stderr(contains("registration not completed"));

    let view = show_json(&home);
    assert_eq!(view["leader"]["teamName"], json!("Les Batisseurs"));
    assert_eq!(view["members"][0]["information"]["lastName"], json!("Koffi"));
}

#[test]
fn rejected_registration_shows_backend_message() {
    let home = TempDir::new().expect("home");
    start_esatic(&home);
    enter_leader(&home);
    enter_members(&home);

    let (url, _rx) = serve_once(
        "200 OK",
        r#"{"status":false,"message":"team name already taken"}"#,
    );
    sdi_cmd(home.path())
        .args(["--api-url", &url, "wizard", "submit"])
        .assert()
        .failure()
        .stderr(contains("team name already taken"));

    assert_eq!(show_json(&home)["leader"]["lastName"], json!("Yao"));
}

#[test]
fn leader_without_matricule_is_refused_for_esatic_teams() {
    let home = TempDir::new().expect("home");
    start_esatic(&home);

    sdi_cmd(home.path())
        .args([
            "wizard", "leader", "--level", "2", "--last-name", "Yao", "--first-name", "Marc",
            "--email", "marc@b.com", "--gender", "Homme", "--class", "5", "--team-name", "X",
        ])
        .assert()
        .failure()
        .stderr(contains("the matricule of the team leader is required"));

    assert_eq!(show_json(&home)["leader"], Value::Null);
}

#[test]
fn external_team_uses_school() {
    let home = TempDir::new().expect("home");
    sdi_cmd(home.path())
        .args(["wizard", "start", "--external"])
        .assert()
        .success()
        .stdout(contains("external team, 0 level(s)"));

    sdi_cmd(home.path())
        .args([
            "wizard", "leader", "--level", "1", "--last-name", "Yao", "--first-name", "Marc",
            "--email", "marc@b.com", "--gender", "Homme", "--school", "INP-HB",
            "--team-name", "Visiteurs",
        ])
        .assert()
        .success();

    sdi_cmd(home.path())
        .args(["wizard", "show"])
        .assert()
        .success()
        .stdout(contains("external team"))
        .stdout(contains("team 'Visiteurs'"));
}

#[test]
fn member_position_is_bounded() {
    let home = TempDir::new().expect("home");
    sdi_cmd(home.path())
        .args(["wizard", "members", "--member", "4"])
        .assert()
        .failure();
    sdi_cmd(home.path())
        .args(["wizard", "members", "--member", "2", "--gender", "Autre"])
        .assert()
        .failure()
        .stderr(contains("unknown gender"));
    sdi_cmd(home.path())
        .args(["wizard", "members", "--last-name", "Koffi"])
        .assert()
        .failure();
    sdi_cmd(home.path())
        .args(["wizard", "members"])
        .assert()
        .success()
        .stdout(contains("Saved both members"));
}

#[test]
fn reset_keeps_session_token() {
    let home = TempDir::new().expect("home");
    sdi_cmd(home.path())
        .args(["login", "--token", "tok-123"])
        .assert()
        .success();
    start_esatic(&home);
    enter_leader(&home);

    sdi_cmd(home.path())
        .args(["wizard", "reset"])
        .assert()
        .success()
        .stdout(contains("Registration discarded"));
    sdi_cmd(home.path())
        .args(["wizard", "show"])
        .assert()
        .success()
        .stdout(contains("not entered"));

    let (url, rx) = serve_once(
        "200 OK",
        r#"{"status":true,"data":{"equipes":[]}}"#,
    );
    sdi_cmd(home.path())
        .args(["--api-url", &url, "teams"])
        .assert()
        .success();
    let request = rx.recv().expect("request captured");
    assert_eq!(request.header("authorization"), Some("Bearer tok-123"));
}

#[test]
fn reset_recovers_from_corrupt_storage() {
    let home = TempDir::new().expect("home");
    let store = home.path().join(".sdi/storage/registration.json");
    fs::create_dir_all(store.parent().expect("parent")).expect("dir");
    fs::write(&store, "{ not json").expect("corrupt");

    sdi_cmd(home.path())
        .args(["wizard", "reset"])
        .assert()
        .success()
        .stdout(contains("5 entries removed"));
    start_esatic(&home);
    assert_eq!(show_json(&home)["classes"], json!([]));
    assert_eq!(show_json(&home)["comeFromEsatic"], json!(true));
}

#[cfg(unix)]
#[test]
fn reset_fails_when_storage_cannot_be_written() {
    use std::os::unix::fs::PermissionsExt;

    let home = TempDir::new().expect("home");
    start_esatic(&home);
    let dir = home.path().join(".sdi/storage");
    fs::set_permissions(&dir, fs::Permissions::from_mode(0o500)).expect("read-only");
    if fs::write(dir.join("write-check"), "").is_ok() {
        // Running as root: permissions are not enforced.
        return;
    }

    sdi_cmd(home.path())
        .args(["wizard", "reset"])
        .assert()
        .failure()
        .stderr(contains("failed to discard registration"))
        .stdout(contains("Registration discarded").not());

    fs::set_permissions(&dir, fs::Permissions::from_mode(0o700)).expect("restore");
}
