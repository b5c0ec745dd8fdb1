//! CLI integration tests against the file-backed ledger.

mod common;

use common::{TestEnv, stderr};

fn add_spotify(env: &TestEnv) {
    env.run_success(&[
        "add",
        "--name",
        "Spotify",
        "--price",
        "11900",
        "--currency",
        "KRW",
        "--billing-day",
        "5",
        "--category",
        "music",
    ]);
}

#[test]
fn login_creates_session_and_repository() {
    let env = TestEnv::new();
    let api = env.api_url();

    let stdout = env.run_success(&["login", "--api", &api, "--owner", "octocat"]);
    assert!(stdout.contains("octocat/subscription-ledger"));
    assert!(env.ledger.join("repos/octocat/subscription-ledger/repo.json").exists());

    let whoami = env.run_success(&["whoami"]);
    assert!(whoami.contains("octocat"));
    assert!(whoami.contains("file://"));

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(env.session_path())
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}

#[test]
fn local_login_requires_owner() {
    let env = TestEnv::new();
    let api = env.api_url();
    let output = env.run(&["login", "--api", &api]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("--owner"));
}

#[test]
fn github_login_requires_token() {
    let env = TestEnv::new();
    let output = env.run(&["login", "--api", "https://api.github.com"]);
    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("SUBLOG_TOKEN"));
    assert!(err.contains("missing access token"));
}

#[test]
fn commands_require_login() {
    let env = TestEnv::new();
    let output = env.run(&["list"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("sublog login"));
}

#[test]
fn logout_clears_session() {
    let env = TestEnv::logged_in("octocat");
    env.run_success(&["logout"]);
    assert!(!env.session_path().exists());
    assert!(!env.run(&["whoami"]).status.success());
}

#[test]
fn subscription_lifecycle() {
    let env = TestEnv::logged_in("octocat");
    add_spotify(&env);

    let list = env.run_json(&["list", "--json"]);
    assert_eq!(list[0]["id"], "spotify");
    assert_eq!(list[0]["status"], "active");
    assert_eq!(list[0]["price"], 11900.0);

    env.run_success(&["pause", "spotify", "--until", "2026-12-01T00:00:00Z"]);
    let list = env.run_json(&["list", "--json"]);
    assert_eq!(list[0]["status"], "paused");
    assert_eq!(list[0]["pausedUntil"], "2026-12-01T00:00:00Z");

    env.run_success(&["resume", "spotify"]);
    let list = env.run_json(&["list", "--json"]);
    assert_eq!(list[0]["status"], "active");
    assert!(list[0].get("pausedUntil").is_none());

    env.run_success(&["cancel", "spotify"]);
    let active = env.run_json(&["list", "--json"]);
    assert_eq!(active.as_array().unwrap().len(), 0);

    let all = env.run_json(&["list", "--all", "--json"]);
    assert_eq!(all[0]["status"], "cancelled");

    let history = env.run_json(&["history", "--json"]);
    let messages: Vec<_> = history
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["message"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        messages,
        vec![
            "chore: cancel Spotify subscription",
            "chore: resume Spotify subscription",
            "chore: pause Spotify subscription",
            "feat: add Spotify subscription",
        ]
    );
}

#[test]
fn rejected_transition_leaves_ledger_unchanged() {
    let env = TestEnv::logged_in("octocat");
    add_spotify(&env);
    env.run_success(&["pause", "spotify"]);

    let before = std::fs::read(env.ledger_file("octocat")).unwrap();
    let output = env.run(&["pause", "spotify"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("cannot transition from paused to paused"));

    let after = std::fs::read(env.ledger_file("octocat")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn invalid_input_is_reported_per_field() {
    let env = TestEnv::logged_in("octocat");
    let output = env.run(&[
        "add",
        "--name",
        "Gym",
        "--price",
        "0",
        "--billing-day",
        "40",
    ]);
    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("price"));
    assert!(err.contains("billing_day"));
    assert!(!env.ledger_file("octocat").exists());
}

#[test]
fn add_from_stdin_and_update() {
    let env = TestEnv::logged_in("octocat");
    let output = env.run_with_stdin(
        &["add", "--json", "-"],
        r#"{"name": "Domain Renewal", "price": 20, "currency": "USD", "cycle": "yearly", "billing_day": 15, "billing_month": 3}"#,
    );
    common::assert_success(&["add", "--json", "-"], output);

    env.run_success(&["update", "domain-renewal", "--price", "25"]);

    let list = env.run_json(&["list", "--json"]);
    assert_eq!(list[0]["id"], "domain-renewal");
    assert_eq!(list[0]["price"], 25.0);
    assert_eq!(list[0]["billing_month"], 3);

    let history = env.run_json(&["history", "--json"]);
    assert_eq!(history[0]["message"], "chore: update Domain Renewal subscription");
}

#[test]
fn update_of_unknown_id_fails() {
    let env = TestEnv::logged_in("octocat");
    let output = env.run(&["update", "nope", "--price", "10"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("subscription not found: nope"));
}

#[test]
fn summary_converts_to_display_currency() {
    let env = TestEnv::logged_in("octocat");
    env.run_success(&[
        "add",
        "--name",
        "Netflix",
        "--price",
        "13500",
        "--currency",
        "KRW",
        "--billing-day",
        "10",
        "--category",
        "entertainment",
    ]);
    env.run_success(&[
        "add",
        "--name",
        "Copilot",
        "--price",
        "12",
        "--currency",
        "USD",
        "--cycle",
        "yearly",
        "--billing-day",
        "1",
        "--billing-month",
        "6",
        "--category",
        "development",
    ]);

    let summary = env.run_json(&["summary", "--offline", "--currency", "USD", "--json"]);
    assert_eq!(summary["active"], 2);
    assert_eq!(summary["currency"], "USD");
    assert!((summary["monthly"].as_f64().unwrap() - 11.0).abs() < 1e-9);
    assert!((summary["yearly"].as_f64().unwrap() - 132.0).abs() < 1e-9);
    assert_eq!(summary["fallback_rates"], true);
    assert_eq!(summary["categories"][0]["category"], "entertainment");
}

#[test]
fn calendar_clamps_to_month_end() {
    let env = TestEnv::logged_in("octocat");
    env.run_success(&[
        "add",
        "--name",
        "Gym",
        "--price",
        "50000",
        "--billing-day",
        "31",
    ]);

    let feb = env.run_json(&[
        "calendar", "--offline", "--year", "2026", "--month", "2", "--json",
    ]);
    assert_eq!(feb["28"][0]["id"], "gym");

    let output = env.run(&["calendar", "--offline", "--month", "13"]);
    assert!(!output.status.success());
}

#[test]
fn currency_setting_resolution() {
    let env = TestEnv::new();

    let shown = env.run_with_env(&["config", "show"], &[("SUBLOG_CURRENCY", "JPY")]);
    let stdout = common::assert_success(&["config", "show"], shown);
    assert!(stdout.contains("JPY (environment)"));

    env.run_success(&["config", "set-currency", "usd"]);

    let shown = env.run_with_env(&["config", "show"], &[("SUBLOG_CURRENCY", "JPY")]);
    let stdout = common::assert_success(&["config", "show"], shown);
    assert!(stdout.contains("USD (settings file)"));
    assert!(stdout.contains("subscription-ledger (default)"));
}

#[test]
fn repo_setting_changes_ledger_location() {
    let env = TestEnv::new();
    env.run_success(&["config", "set-repo", "money"]);

    let api = env.api_url();
    env.run_success(&["login", "--api", &api, "--owner", "octocat"]);
    add_spotify(&env);

    assert!(
        env.ledger
            .join("repos/octocat/money/files/subscriptions.json")
            .exists()
    );
}

#[test]
fn offline_rates_are_the_fallback_table() {
    let env = TestEnv::new();
    let rates = env.run_json(&["rates", "--offline", "--json"]);
    assert_eq!(rates["base"], "USD");
    assert_eq!(rates["rates"]["KRW"], 1350.0);
    assert_eq!(rates["fallback"], true);
}
