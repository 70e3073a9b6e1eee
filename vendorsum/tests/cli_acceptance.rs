use rusqlite::Connection;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

struct CliTestEnv {
    _temp_dir: TempDir,
    home: PathBuf,
    data_dir: PathBuf,
    xdg_data: PathBuf,
    xdg_config: PathBuf,
    xdg_state: PathBuf,
}

impl CliTestEnv {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let base = temp_dir.path().to_path_buf();
        let home = base.join("home");
        let data_dir = base.join("data");
        let xdg_data = base.join("xdg-data");
        let xdg_config = base.join("xdg-config");
        let xdg_state = base.join("xdg-state");

        fs::create_dir_all(&home).expect("failed to create HOME");
        fs::create_dir_all(&xdg_data).expect("failed to create XDG_DATA_HOME");
        fs::create_dir_all(&xdg_config).expect("failed to create XDG_CONFIG_HOME");
        fs::create_dir_all(&xdg_state).expect("failed to create XDG_STATE_HOME");

        seed_inventory_fixture(&data_dir);

        Self {
            _temp_dir: temp_dir,
            home,
            data_dir,
            xdg_data,
            xdg_config,
            xdg_state,
        }
    }

    fn db_path(&self) -> PathBuf {
        self.xdg_data.join("vendorsum/inventory.db")
    }

    fn log_path(&self, file_name: &str) -> PathBuf {
        self.xdg_state.join("vendorsum").join(file_name)
    }
}

fn seed_inventory_fixture(data_dir: &Path) {
    let source = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../vendorsum-core/tests/fixtures/inventory");

    fs::create_dir_all(data_dir).expect("failed to create data dir");
    for entry in fs::read_dir(source).expect("missing inventory fixtures") {
        let path = entry.expect("unreadable fixture entry").path();
        fs::copy(&path, data_dir.join(path.file_name().expect("fixture name")))
            .expect("failed to copy inventory fixture");
    }
}

fn run_bin(env: &CliTestEnv, bin_name: &str, args: &[&str]) -> Output {
    let bin_path = match bin_name {
        "vendorsum-ingest" => PathBuf::from(assert_cmd::cargo::cargo_bin!("vendorsum-ingest")),
        "vendorsum-summary" => PathBuf::from(assert_cmd::cargo::cargo_bin!("vendorsum-summary")),
        _ => panic!("unsupported binary in test harness: {bin_name}"),
    };

    let mut command = Command::new(bin_path);

    command
        .args(args)
        .env("HOME", &env.home)
        .env("XDG_DATA_HOME", &env.xdg_data)
        .env("XDG_CONFIG_HOME", &env.xdg_config)
        .env("XDG_STATE_HOME", &env.xdg_state)
        .env_remove("VENDORSUM_DATABASE")
        .env_remove("RUST_LOG")
        .output()
        .unwrap_or_else(|e| panic!("failed to execute {bin_name}: {e}"))
}

fn assert_success(bin_name: &str, args: &[&str], output: &Output) {
    if output.status.success() {
        return;
    }

    let rendered_args = args
        .iter()
        .map(|arg| OsString::from(arg).to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    panic!(
        "{bin_name} {rendered_args} failed\nstatus: {}\nstdout:\n{}\nstderr:\n{}",
        output.status, stdout, stderr
    );
}

fn count_rows(db_path: &Path, table: &str) -> i64 {
    let conn = Connection::open(db_path).expect("failed to open db");
    conn.query_row(&format!("SELECT COUNT(*) FROM \"{table}\""), [], |r| r.get(0))
        .unwrap_or_else(|e| panic!("failed to count {table}: {e}"))
}

#[test]
fn ingest_then_summary_populates_database() {
    let env = CliTestEnv::new();
    let data_dir = env.data_dir.to_string_lossy().into_owned();
    let ingest_args = ["--data-dir", data_dir.as_str()];

    let output = run_bin(&env, "vendorsum-ingest", &ingest_args);
    assert_success("vendorsum-ingest", &ingest_args, &output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Files loaded: 4/4"),
        "expected ingest summary in stdout, got:\n{stdout}"
    );

    let db_path = env.db_path();
    assert!(
        db_path.exists(),
        "database file should exist at {}",
        db_path.display()
    );
    assert_eq!(count_rows(&db_path, "purchases"), 6);

    let output = run_bin(&env, "vendorsum-summary", &[]);
    assert_success("vendorsum-summary", &[], &output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Wrote 3 row(s) to vendor_sales_summary"));
    assert_eq!(count_rows(&db_path, "vendor_sales_summary"), 3);

    let ingest_log = fs::read_to_string(env.log_path("ingestion_db.log")).expect("missing ingest log");
    assert!(ingest_log.contains("Ingestion completed"));
    let summary_log =
        fs::read_to_string(env.log_path("vendor_summary.log")).expect("missing summary log");
    assert!(summary_log.contains("INFO"));
    assert!(summary_log.contains("Vendor summary data ingested into database successfully"));
}

#[test]
fn ingest_skips_malformed_file() {
    let env = CliTestEnv::new();
    fs::write(
        env.data_dir.join("begin_inventory.csv"),
        "InventoryId,Store\n1_A,1\n2_B,2,3\n",
    )
    .expect("failed to write malformed csv");

    let data_dir = env.data_dir.to_string_lossy().into_owned();
    let args = ["--data-dir", data_dir.as_str()];
    let output = run_bin(&env, "vendorsum-ingest", &args);
    assert_success("vendorsum-ingest", &args, &output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Files loaded: 4/5"), "got:\n{stdout}");

    let log = fs::read_to_string(env.log_path("ingestion_db.log")).expect("missing ingest log");
    assert!(log.contains("ERROR"));
    assert!(log.contains("begin_inventory.csv"));
}

#[test]
fn summary_fails_without_source_tables() {
    let env = CliTestEnv::new();
    let db_path = env.xdg_data.join("empty.db");
    let db_arg = db_path.to_string_lossy().into_owned();
    let args = ["--database", db_arg.as_str()];

    let output = run_bin(&env, "vendorsum-summary", &args);
    assert!(!output.status.success(), "summary should fail on an empty database");

    let log = fs::read_to_string(env.log_path("vendor_summary.log")).expect("missing summary log");
    assert!(log.contains("Failed to generate or ingest vendor summary"));
    assert!(log.contains("source relation not found"));
}
