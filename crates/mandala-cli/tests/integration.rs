use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn mandala(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("mandala").unwrap();
    cmd.current_dir(dir.path()).env("MANDALA_ROOT", dir.path());
    cmd
}

fn create_plan(dir: &TempDir) {
    mandala(dir)
        .args(["create", "user-1", "2026"])
        .assert()
        .success();
}

/// Drive the wizard through step `through` as a reviewer (no midnight waits).
fn advance(dir: &TempDir, through: u8) {
    create_plan(dir);
    for step in 1..=through {
        let mut cmd = mandala(dir);
        match step {
            1 => {
                cmd.args([
                    "complete",
                    "reflection",
                    "user-1",
                    "2026",
                    "--theme",
                    "career",
                    "--answer",
                    "answer one",
                    "--answer",
                    "answer two",
                    "--answer",
                    "answer three",
                    "--role",
                    "reviewer",
                ]);
            }
            2 => {
                cmd.args(["complete", "notes", "user-1", "2026", "--role", "reviewer"]);
            }
            3 => {
                cmd.args([
                    "complete", "goal", "user-1", "2026", "center goal", "--role", "reviewer",
                ]);
            }
            4 | 5 => {
                let batch = if step == 4 { "first" } else { "second" };
                cmd.args(["complete", "subgoals", "user-1", "2026", "--batch", batch]);
                let base = if step == 4 { 0 } else { 4 };
                for i in base..base + 4 {
                    cmd.arg(format!("sub {i}"));
                }
                cmd.args(["--role", "reviewer"]);
            }
            6..=13 => {
                let index = (step - 6).to_string();
                cmd.args(["complete", "plans", "user-1", "2026", "--index", &index]);
                for i in 0..8 {
                    cmd.arg(format!("plan {i}"));
                }
                cmd.args(["--role", "reviewer"]);
            }
            _ => panic!("advance only drives steps 1-13"),
        }
        cmd.assert().success();
    }
}

fn show_json(dir: &TempDir) -> serde_json::Value {
    let output = mandala(dir)
        .args(["--json", "show", "user-1", "2026"])
        .output()
        .unwrap();
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).unwrap()
}

// ---------------------------------------------------------------------------
// mandala init / create / show
// ---------------------------------------------------------------------------

#[test]
fn init_creates_plan_store() {
    let dir = TempDir::new().unwrap();
    mandala(&dir).arg("init").assert().success();
    assert!(dir.path().join(".mandala/plans").is_dir());
}

#[test]
fn init_is_idempotent() {
    let dir = TempDir::new().unwrap();
    mandala(&dir).arg("init").assert().success();
    mandala(&dir).arg("init").assert().success();
}

#[test]
fn create_then_show() {
    let dir = TempDir::new().unwrap();
    create_plan(&dir);

    mandala(&dir)
        .args(["show", "user-1", "2026"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Step: 1 of 14"));
}

#[test]
fn create_is_idempotent_across_invocations() {
    let dir = TempDir::new().unwrap();
    create_plan(&dir);
    let first = show_json(&dir);

    create_plan(&dir);
    let second = show_json(&dir);
    assert_eq!(first["id"], second["id"]);
}

#[test]
fn create_invalid_owner_fails() {
    let dir = TempDir::new().unwrap();
    mandala(&dir)
        .args(["create", "BAD OWNER", "2026"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn show_missing_plan_fails() {
    let dir = TempDir::new().unwrap();
    mandala(&dir)
        .args(["show", "user-1", "2026"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no plan"));
}

#[test]
fn show_without_year_lists_all_plans() {
    let dir = TempDir::new().unwrap();
    mandala(&dir)
        .args(["create", "user-1", "2025"])
        .assert()
        .success();
    mandala(&dir)
        .args(["create", "user-1", "2026"])
        .assert()
        .success();

    mandala(&dir)
        .args(["show", "user-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2025").and(predicate::str::contains("2026")));
}

// ---------------------------------------------------------------------------
// mandala access
// ---------------------------------------------------------------------------

#[test]
fn access_step_one_granted_without_record() {
    let dir = TempDir::new().unwrap();
    mandala(&dir)
        .args(["access", "user-1", "2026", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("granted"));
}

#[test]
fn access_later_step_locked_without_record() {
    let dir = TempDir::new().unwrap();
    mandala(&dir)
        .args(["access", "user-1", "2026", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("locked"));
}

#[test]
fn access_gated_step_reports_wait() {
    let dir = TempDir::new().unwrap();
    advance(&dir, 2);

    mandala(&dir)
        .args(["access", "user-1", "2026", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("wait until"));
}

#[test]
fn access_out_of_range_step_fails() {
    let dir = TempDir::new().unwrap();
    mandala(&dir)
        .args(["access", "user-1", "2026", "15"])
        .assert()
        .failure();
}

// ---------------------------------------------------------------------------
// mandala complete
// ---------------------------------------------------------------------------

#[test]
fn reflection_then_notes_same_day() {
    let dir = TempDir::new().unwrap();
    create_plan(&dir);

    mandala(&dir)
        .args([
            "complete",
            "reflection",
            "user-1",
            "2026",
            "--theme",
            "health",
            "--answer",
            "a",
            "--answer",
            "b",
            "--answer",
            "c",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Current step: 2"));

    // No gate sits between steps 1 and 2.
    mandala(&dir)
        .args(["complete", "notes", "user-1", "2026"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Current step: 3"));
}

#[test]
fn gated_step_fails_for_standard_account() {
    let dir = TempDir::new().unwrap();
    advance(&dir, 2);

    mandala(&dir)
        .args(["complete", "goal", "user-1", "2026", "my goal"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("step 3"));
}

#[test]
fn reviewer_role_bypasses_the_gate() {
    let dir = TempDir::new().unwrap();
    advance(&dir, 2);

    mandala(&dir)
        .args([
            "complete", "goal", "user-1", "2026", "my goal", "--role", "reviewer",
        ])
        .assert()
        .success();
}

#[test]
fn second_subgoal_batch_requires_the_first() {
    let dir = TempDir::new().unwrap();
    advance(&dir, 3);

    mandala(&dir)
        .args([
            "complete", "subgoals", "user-1", "2026", "--batch", "second", "a", "b", "c", "d",
            "--role", "reviewer",
        ])
        .assert()
        .failure();
}

#[test]
fn unknown_theme_fails() {
    let dir = TempDir::new().unwrap();
    create_plan(&dir);

    mandala(&dir)
        .args([
            "complete",
            "reflection",
            "user-1",
            "2026",
            "--theme",
            "astrology",
            "--answer",
            "a",
            "--answer",
            "b",
            "--answer",
            "c",
        ])
        .assert()
        .failure();
}

#[test]
fn wizard_reaches_step_fourteen() {
    let dir = TempDir::new().unwrap();
    advance(&dir, 13);

    let plan = show_json(&dir);
    assert_eq!(plan["current_step"], 14);
    assert_eq!(plan["sub_goals"].as_array().unwrap().len(), 8);
    assert_eq!(plan["action_plans"].as_object().unwrap().len(), 8);
}

// ---------------------------------------------------------------------------
// mandala edit / export
// ---------------------------------------------------------------------------

#[test]
fn edit_replaces_center_goal() {
    let dir = TempDir::new().unwrap();
    advance(&dir, 3);

    mandala(&dir)
        .args([
            "edit",
            "user-1",
            "2026",
            "--center-goal",
            "revised goal",
        ])
        .assert()
        .success();

    let plan = show_json(&dir);
    assert_eq!(plan["center_goal"], "revised goal");
}

#[test]
fn edit_plan_flag_requires_index() {
    let dir = TempDir::new().unwrap();
    advance(&dir, 3);

    mandala(&dir)
        .args(["edit", "user-1", "2026", "--plan", "one entry"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--plan-index"));
}

#[test]
fn export_writes_csv() {
    let dir = TempDir::new().unwrap();
    advance(&dir, 6);

    let out = dir.path().join("chart.csv");
    mandala(&dir)
        .args(["export", "user-1", "2026", "--out"])
        .arg(&out)
        .assert()
        .success();

    let csv = std::fs::read_to_string(&out).unwrap();
    assert!(csv.starts_with("section,index,content\n"));
    assert!(csv.contains("center_goal,,center goal\n"));
    assert!(csv.contains("action_plan,0.0,plan 0\n"));
}

#[test]
fn export_to_stdout_by_default() {
    let dir = TempDir::new().unwrap();
    advance(&dir, 3);

    mandala(&dir)
        .args(["export", "user-1", "2026"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("section,index,content\n"));
}

// ---------------------------------------------------------------------------
// mandala report
// ---------------------------------------------------------------------------

#[test]
fn report_without_api_key_fails_cleanly() {
    let dir = TempDir::new().unwrap();
    advance(&dir, 13);

    mandala(&dir)
        .env_remove("GEMINI_API_KEY")
        .args(["report", "user-1", "2026", "--role", "reviewer"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("GEMINI_API_KEY"));
}

#[test]
fn report_before_the_final_step_fails() {
    let dir = TempDir::new().unwrap();
    advance(&dir, 4);

    mandala(&dir)
        .env("GEMINI_API_KEY", "test-key")
        .args(["report", "user-1", "2026", "--role", "reviewer"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("locked"));
}

// ---------------------------------------------------------------------------
// JSON output
// ---------------------------------------------------------------------------

#[test]
fn json_flag_emits_parseable_output() {
    let dir = TempDir::new().unwrap();
    create_plan(&dir);

    let output = mandala(&dir)
        .args(["--json", "access", "user-1", "2026", "1"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let body: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["decision"], "granted");
    assert_eq!(body["step"], 1);
}
