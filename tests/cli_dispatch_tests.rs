use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_paygroups")
}

fn unique_temp_path(name: &str, ext: &str) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("paygroups-{name}-{stamp}.{ext}"))
}

fn run(args: &[&str]) -> Output {
    Command::new(bin())
        .args(args)
        .current_dir(std::env::temp_dir())
        .env_remove("PAYGROUPS_LIMIT")
        .env_remove("PAYGROUPS_LEADER_COUNT")
        .env_remove("PAYGROUPS_BIND")
        .env_remove("RUST_LOG")
        .output()
        .expect("paygroups should run")
}

struct Fixture {
    employees: PathBuf,
    leaders: PathBuf,
}

impl Fixture {
    fn new(name: &str, employees: &str, leaders: &str) -> Self {
        let fixture = Self {
            employees: unique_temp_path(&format!("{name}-employees"), "csv"),
            leaders: unique_temp_path(&format!("{name}-leaders"), "csv"),
        };
        fs::write(&fixture.employees, employees).expect("employees fixture should be written");
        fs::write(&fixture.leaders, leaders).expect("leaders fixture should be written");
        fixture
    }

    fn employees(&self) -> String {
        self.employees.to_string_lossy().into_owned()
    }

    fn leaders(&self) -> String {
        self.leaders.to_string_lossy().into_owned()
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.employees);
        let _ = fs::remove_file(&self.leaders);
    }
}

const EMPLOYEES: &str = "Name,Salary\nA,10000\nB,20000\nC,15000\nD,30000\n";

#[test]
fn assign_prints_table() {
    let fixture = Fixture::new("table", EMPLOYEES, "LeaderName\nA\n");
    let output = run(&[
        "assign",
        "--employees",
        &fixture.employees(),
        "--leaders",
        &fixture.leaders(),
        "--limit",
        "50000",
        "--leader-count",
        "1",
    ]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Group 1 - Leader: A | Total Salary: 40000"));
    assert!(stdout.contains("Unassigned Employees"));
}

#[test]
fn assign_emits_json() {
    let fixture = Fixture::new("json", EMPLOYEES, "LeaderName\nA\nB\n");
    let output = run(&[
        "assign",
        "--employees",
        &fixture.employees(),
        "--leaders",
        &fixture.leaders(),
        "--limit",
        "50000",
        "--leader-count",
        "2",
        "--format",
        "json",
    ]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let payload: serde_json::Value =
        serde_json::from_str(&stdout).expect("assign should emit json");
    assert_eq!(payload["groups"].as_array().map(Vec::len), Some(2));
    assert_eq!(payload["unassigned"].as_array().map(Vec::len), Some(0));
}

#[test]
fn assign_writes_csv_export() {
    let fixture = Fixture::new("export", EMPLOYEES, "LeaderName\nA\n");
    let out_path = unique_temp_path("export-out", "csv");
    let output = run(&[
        "assign",
        "--employees",
        &fixture.employees(),
        "--leaders",
        &fixture.leaders(),
        "--limit",
        "50000",
        "--leader-count",
        "1",
        "--csv",
        out_path.to_string_lossy().as_ref(),
    ]);

    assert_eq!(output.status.code(), Some(0));
    let written = fs::read_to_string(&out_path).expect("csv should be written");
    assert_eq!(written, "Leader,Employee,Salary\nA,A,10000\nA,D,30000\n");

    let _ = fs::remove_file(out_path);
}

#[test]
fn assign_fails_on_leader_count_mismatch() {
    let fixture = Fixture::new("count", EMPLOYEES, "LeaderName\nA\n");
    let output = run(&[
        "assign",
        "--employees",
        &fixture.employees(),
        "--leaders",
        &fixture.leaders(),
    ]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("You must enter exactly 15 leaders"));
}

#[test]
fn assign_fails_on_unknown_leader() {
    let fixture = Fixture::new("unknown", EMPLOYEES, "LeaderName\nZ\n");
    let output = run(&[
        "assign",
        "--employees",
        &fixture.employees(),
        "--leaders",
        &fixture.leaders(),
        "--leader-count",
        "1",
    ]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Leader 'Z' not found in employees list."));
}

#[test]
fn assign_reports_bad_salary_cells() {
    let fixture = Fixture::new("salary", "Name,Salary\nA,lots\n", "LeaderName\nA\n");
    let output = run(&[
        "assign",
        "--employees",
        &fixture.employees(),
        "--leaders",
        &fixture.leaders(),
        "--leader-count",
        "1",
    ]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("salary 'lots'"));
}

#[test]
fn assign_without_inputs_fails() {
    let output = run(&["assign"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--workbook"));
}

#[test]
fn missing_workbook_is_reported() {
    let path = unique_temp_path("missing", "xlsx");
    let output = run(&["inspect", path.to_string_lossy().as_ref()]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read workbook"));
}

#[test]
fn explicit_config_file_is_used() {
    let fixture = Fixture::new("config", EMPLOYEES, "LeaderName\nA\n");
    let config_path = unique_temp_path("config", "yaml");
    fs::write(&config_path, "limit: 60000\nleader_count: 1\n").expect("config should be written");

    let output = run(&[
        "assign",
        "--employees",
        &fixture.employees(),
        "--leaders",
        &fixture.leaders(),
        "--config",
        config_path.to_string_lossy().as_ref(),
    ]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    // 10000 + 30000 + 20000 = 60000 fits under the file's limit.
    assert!(stdout.contains("Total Salary: 60000"));

    let _ = fs::remove_file(config_path);
}

#[test]
fn unknown_command_is_a_usage_error() {
    let output = run(&["launch"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn flags_override_invalid_config_values() {
    let fixture = Fixture::new("override", EMPLOYEES, "LeaderName\nA\n");
    let config_path = unique_temp_path("zero-config", "yaml");
    fs::write(&config_path, "limit: 0\nleader_count: 0\n").expect("config should be written");

    let output = run(&[
        "assign",
        "--employees",
        &fixture.employees(),
        "--leaders",
        &fixture.leaders(),
        "--config",
        config_path.to_string_lossy().as_ref(),
        "--limit",
        "50000",
        "--leader-count",
        "1",
    ]);
    let _ = fs::remove_file(&config_path);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Group 1 - Leader: A | Total Salary: 40000"));
}

#[test]
fn invalid_config_without_override_is_rejected() {
    let fixture = Fixture::new("zero", EMPLOYEES, "LeaderName\nA\n");
    let config_path = unique_temp_path("zero-limit", "yaml");
    fs::write(&config_path, "limit: 0\n").expect("config should be written");

    let output = run(&[
        "assign",
        "--employees",
        &fixture.employees(),
        "--leaders",
        &fixture.leaders(),
        "--config",
        config_path.to_string_lossy().as_ref(),
        "--leader-count",
        "1",
    ]);
    let _ = fs::remove_file(&config_path);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("limit must be greater than zero"));
}

fn fixture_path(name: &str) -> String {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
        .to_string_lossy()
        .into_owned()
}

#[test]
fn assign_reads_workbook() {
    let output = run(&[
        "assign",
        "--workbook",
        &fixture_path("roster.xlsx"),
        "--limit",
        "50000",
        "--leader-count",
        "1",
    ]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Group 1 - Leader: A | Total Salary: 40000"));
    assert!(stdout.contains("Unassigned Employees"));
}

#[test]
fn workbook_missing_leaders_sheet_fails() {
    let output = run(&[
        "assign",
        "--workbook",
        &fixture_path("no_leaders.xlsx"),
        "--leader-count",
        "1",
    ]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("workbook has no 'Leaders' sheet"));
}
