use assert_cmd::{cargo_bin_cmd, Command};
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

const KEY: &str = "cli-test-key";

fn hemolog(config: &std::path::Path) -> Command {
    let mut cmd = cargo_bin_cmd!("hemolog");
    cmd.env_remove("HEMOLOG_API_KEY")
        .env_remove("HEMOLOG_BASE_URL")
        .arg("--config")
        .arg(config);
    cmd
}

fn start_server() -> std::net::SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener, KEY).await
        })
        .unwrap();
    });
    addr
}

#[test]
fn configure_log_and_list() {
    let addr = start_server();
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.yml");

    hemolog(&config)
        .args(["config", "--set-api-key", KEY, "--base-url"])
        .arg(format!("http://{addr}/"))
        .assert()
        .success()
        .stderr(contains("Settings saved"));

    hemolog(&config)
        .args(["config", "--print"])
        .assert()
        .success()
        .stdout(contains("********-key").and(contains(format!("http://{addr}"))));

    hemolog(&config)
        .args(["log-infusion", "--type", "bleed", "--date", "2024-03-01"])
        .args(["--sites", "Left ankle", "--cause", "Door"])
        .assert()
        .success()
        .stderr(contains("Infusion logged!"));

    hemolog(&config)
        .args(["log-treatment", "--date", "2024-04-01"])
        .assert()
        .success()
        .stderr(contains("Treatment logged!"));

    hemolog(&config)
        .arg("recent")
        .assert()
        .success()
        .stdout(
            contains("ANTIBODY")
                .and(contains("2024-04-01"))
                .and(contains("Left ankle — Door"))
                .and(contains("2024-03-01")),
        );

    hemolog(&config)
        .args(["recent", "--type", "Bleed"])
        .assert()
        .success()
        .stdout(
            contains("BLEED")
                .and(contains("Left ankle — Door"))
                .and(contains("ANTIBODY").not())
                .and(contains("2024-04-01").not()),
        );

    hemolog(&config)
        .args(["recent", "--type", "prophy"])
        .assert()
        .success()
        .stdout(contains("No records."));
}

#[test]
fn missing_api_key_is_a_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    hemolog(&dir.path().join("config.yml"))
        .arg("recent")
        .assert()
        .failure()
        .stderr(contains("no API key configured"));
}

#[test]
fn failed_fetch_prints_empty_list_and_fails() {
    let addr = start_server();
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.yml");
    std::fs::write(
        &config,
        format!("api_key: wrong\nbase_url: http://{addr}\n"),
    )
    .unwrap();

    hemolog(&config)
        .arg("recent")
        .assert()
        .failure()
        .stdout(contains("No records."))
        .stderr(contains("Could not load infusions"));
}

#[test]
fn env_key_overrides_settings_file() {
    let addr = start_server();
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.yml");
    std::fs::write(
        &config,
        format!("api_key: wrong\nbase_url: http://{addr}\n"),
    )
    .unwrap();

    hemolog(&config)
        .env("HEMOLOG_API_KEY", KEY)
        .arg("recent")
        .assert()
        .success()
        .stdout(contains("No records."));
}

#[test]
fn unknown_type_is_rejected_before_any_request() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.yml");
    std::fs::write(&config, "api_key: k\nbase_url: http://127.0.0.1:9\n").unwrap();

    hemolog(&config)
        .args(["log-infusion", "--type", "antibody"])
        .assert()
        .failure()
        .stderr(contains("expected one of 🔵 Prophy (PROPHY), 🔴 Bleed (BLEED)"));
}
