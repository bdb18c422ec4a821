//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own temporary data
//! directory and checks the printed output.

use std::process::Command;

use tempfile::TempDir;

struct Cli {
    dir: TempDir,
}

impl Cli {
    fn new() -> Self {
        let cli = Self {
            dir: TempDir::new().expect("temp dir"),
        };
        // Keep sign-in instant.
        cli.success(&["config", "set", "auth.login_delay_ms", "0"]);
        cli.success(&["config", "set", "auth.register_delay_ms", "0"]);
        cli
    }

    /// Run a CLI command and return (stdout, stderr, exit code).
    fn run(&self, args: &[&str]) -> (String, String, i32) {
        let output = Command::new(env!("CARGO_BIN_EXE_barakah"))
            .args(args)
            .env("BARAKAH_DATA_DIR", self.dir.path())
            .env_remove("RUST_LOG")
            .output()
            .expect("Failed to execute CLI command");

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let code = output.status.code().unwrap_or(-1);
        (stdout, stderr, code)
    }

    fn success(&self, args: &[&str]) -> String {
        let (stdout, stderr, code) = self.run(args);
        assert_eq!(code, 0, "command {args:?} failed: {stderr}");
        stdout
    }

    fn json(&self, args: &[&str]) -> serde_json::Value {
        let stdout = self.success(args);
        serde_json::from_str(&stdout).expect("Failed to parse JSON output")
    }
}

#[test]
fn test_login_names_user_after_email() {
    let cli = Cli::new();
    let user = cli.json(&["auth", "login", "aisha@example.com", "secret1"]);
    assert_eq!(user["name"], "aisha");
    assert_eq!(user["email"], "aisha@example.com");
    assert_eq!(user["preferences"]["defaultWorkDuration"], 25);

    let status = cli.json(&["auth", "status"]);
    assert_eq!(status["id"], user["id"]);
}

#[test]
fn test_short_password_rejected() {
    let cli = Cli::new();
    let (_, stderr, code) = cli.run(&["auth", "login", "aisha@example.com", "12345"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
    assert_eq!(cli.success(&["auth", "status"]).trim(), "not signed in");
}

#[test]
fn test_update_preferences_keeps_siblings() {
    let cli = Cli::new();
    cli.success(&["auth", "register", "bilal@example.com", "secret1", "Bilal"]);
    let user = cli.json(&["auth", "update", "--theme", "dark"]);
    assert_eq!(user["name"], "Bilal");
    assert_eq!(user["preferences"]["theme"], "dark");
    assert_eq!(user["preferences"]["preferredReciter"], "mishary");
    assert_eq!(user["preferences"]["defaultBreakDuration"], 5);

    let (_, _, code) = cli.run(&["auth", "update", "--reciter", "nobody"]);
    assert_eq!(code, 1);
}

#[test]
fn test_timer_start_records_session() {
    let cli = Cli::new();
    let started = cli.json(&["timer", "start", "--name", "Tafsir", "--category", "study"]);
    assert_eq!(started["type"], "TimerStarted");
    assert_eq!(started["session"]["name"], "Tafsir");
    assert_eq!(started["duration_secs"], 1500);
    assert_eq!(cli.success(&["immersive", "status"]).trim(), "true");

    let logged = cli.json(&["timer", "distraction", "phone"]);
    assert_eq!(logged["total"], 1);

    let paused = cli.json(&["timer", "pause"]);
    assert_eq!(paused["type"], "TimerPaused");
    assert_eq!(cli.success(&["immersive", "status"]).trim(), "false");

    let groups = cli.json(&["history", "list", "--json"]);
    let sessions = groups[0]["sessions"].as_array().unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0]["category"], "study");
    assert_eq!(sessions[0]["distractions"][0], "phone");
    assert_eq!(sessions[0]["isCompleted"], false);

    let today = cli.json(&["history", "day"]);
    assert_eq!(today["total_sessions"], 1);
    assert_eq!(today["completed_sessions"], 0);
}

#[test]
fn test_timer_adjust_clamps() {
    let cli = Cli::new();
    let adjusted = cli.json(&["timer", "adjust", "100"]);
    assert_eq!(adjusted["duration_min"], 60);
    let adjusted = cli.json(&["timer", "adjust", "-120"]);
    assert_eq!(adjusted["duration_min"], 1);
    assert_eq!(adjusted["remaining_ms"], 60_000);
}

#[test]
fn test_logout_clears_history() {
    let cli = Cli::new();
    cli.success(&["auth", "login", "umar@example.com", "secret1"]);
    cli.success(&["timer", "start", "--name", "before-logout"]);
    cli.success(&["auth", "logout"]);
    assert_eq!(cli.success(&["auth", "status"]).trim(), "not signed in");

    // The timer was discarded with the history, so nothing is written back.
    let (_, _, code) = cli.run(&["timer", "distraction", "phone"]);
    assert_eq!(code, 1);
    let status = cli.json(&["timer", "status"]);
    assert_eq!(status["state"], "idle");
    assert!(status["session"].is_null());
    assert_eq!(cli.success(&["history", "list"]).trim(), "No sessions yet");
}

#[test]
fn test_background_selection() {
    let cli = Cli::new();
    assert_eq!(cli.success(&["content", "background"]).trim(), "waves");
    assert_eq!(cli.success(&["content", "background", "rain"]).trim(), "rain");
    let (_, _, code) = cli.run(&["config", "get", "ui.background"]);
    assert_eq!(code, 1);
    let (_, _, code) = cli.run(&["content", "background", "lava"]);
    assert_eq!(code, 1);
    assert_eq!(cli.success(&["content", "background"]).trim(), "rain");
}

#[test]
fn test_duas_crud() {
    let cli = Cli::new();
    let list = cli.json(&["duas", "list"]);
    assert_eq!(list.as_array().unwrap().len(), 3);

    let added = cli.json(&["duas", "add", "Rabbi zidni ilma", "--category", "Study"]);
    let id = added["id"].as_str().unwrap().to_string();
    cli.success(&["duas", "update", &id, "Rabbi zidni ilma", "--category", "Learning"]);
    cli.success(&["duas", "delete", "1"]);

    let list = cli.json(&["duas", "list"]);
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 3);
    assert!(list.iter().any(|d| d["id"] == id.as_str() && d["category"] == "Learning"));
}

#[test]
fn test_config_get_set() {
    let cli = Cli::new();
    assert_eq!(cli.success(&["config", "get", "timer.work_duration"]).trim(), "25");
    cli.success(&["config", "set", "timer.work_duration", "50"]);
    assert_eq!(cli.success(&["config", "get", "timer.work_duration"]).trim(), "50");
    let (_, _, code) = cli.run(&["config", "set", "timer.nope", "1"]);
    assert_eq!(code, 1);
    let (_, _, code) = cli.run(&["config", "set", "audio.selected", "metal"]);
    assert_eq!(code, 1);
    let (_, _, code) = cli.run(&["config", "set", "audio.reciter", "nobody"]);
    assert_eq!(code, 1);
    assert_eq!(cli.success(&["config", "get", "audio.reciter"]).trim(), "mishary");

    let started = cli.json(&["timer", "start"]);
    assert_eq!(started["duration_secs"], 3000);
}

#[test]
fn test_progress_empty() {
    let cli = Cli::new();
    let summary = cli.json(&["progress", "summary"]);
    assert_eq!(summary["streak"], 0);
    assert_eq!(summary["points"], 0);
    let week = cli.json(&["progress", "week"]);
    assert_eq!(week.as_array().unwrap().len(), 7);
    let achievements = cli.json(&["progress", "achievements"]);
    assert_eq!(achievements[0]["unlocked"], false);
}

#[test]
fn test_history_stats_is_json() {
    let cli = Cli::new();
    let stats = cli.json(&["history", "stats"]);
    assert_eq!(stats["total_sessions"], 0);
    assert_eq!(stats["total_days"], 0);
    assert_eq!(stats["total_focus"], "0m");
}
