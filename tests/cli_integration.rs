use assert_cmd::Command;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const ALL_FILES: [&str; 8] = [
    "region.tbl",
    "nation.tbl",
    "customer.tbl",
    "supplier.tbl",
    "part.tbl",
    "partsupp.tbl",
    "orders.tbl",
    "lineitem.tbl",
];

/// Runs the binary from inside `cwd` so no stray tpch_synth.toml is picked up.
fn tpch_synth(cwd: &Path) -> Command {
    let mut cmd = Command::cargo_bin("tpch-synth").expect("Binary not found");
    cmd.current_dir(cwd);
    cmd
}

fn generate(dir: &Path, scale_factor: &str, seed: &str) {
    tpch_synth(dir)
        .arg("generate")
        .arg("--scale-factor")
        .arg(scale_factor)
        .arg("--seed")
        .arg(seed)
        .arg("--output-dir")
        .arg(dir.join("out"))
        .assert()
        .success();
}

fn line_count(path: &Path) -> usize {
    fs::read_to_string(path)
        .expect("Failed to read generated file")
        .lines()
        .count()
}

#[test]
fn test_generate_all_tables_scale_factor_0_001() {
    let temp_dir = tempdir().expect("Failed to create temporary directory");
    generate(temp_dir.path(), "0.001", "42");
    let out = temp_dir.path().join("out");

    for file in &ALL_FILES {
        let path = out.join(file);
        assert!(path.exists(), "File {:?} does not exist", path);
        assert!(
            !out.join(format!("{file}.tmp")).exists(),
            "staging file left behind for {file}"
        );
    }

    let customers = fs::read_to_string(out.join("customer.tbl")).unwrap();
    let mut lines = customers.lines();
    assert_eq!(
        lines.next(),
        Some("c_custkey|c_name|c_address|c_nationkey|c_phone|c_acctbal|c_mktsegment|c_comment")
    );
    assert_eq!(lines.next().map(|l| l.split('|').next()), Some(Some("1")));

    // header plus rows
    assert_eq!(line_count(&out.join("region.tbl")), 6);
    assert_eq!(line_count(&out.join("nation.tbl")), 26);
    assert_eq!(line_count(&out.join("customer.tbl")), 151);
    assert_eq!(line_count(&out.join("supplier.tbl")), 11);
    assert_eq!(line_count(&out.join("part.tbl")), 201);
    assert_eq!(line_count(&out.join("orders.tbl")), 1501);

    let partsupp = line_count(&out.join("partsupp.tbl")) - 1;
    assert!((200..=800).contains(&partsupp), "partsupp rows {partsupp}");
    let lineitems = line_count(&out.join("lineitem.tbl")) - 1;
    assert!((1500..=10500).contains(&lineitems), "lineitem rows {lineitems}");
}

#[test]
fn test_generated_dataset_verifies() {
    let temp_dir = tempdir().expect("Failed to create temporary directory");
    generate(temp_dir.path(), "0.001", "7");

    tpch_synth(temp_dir.path())
        .arg("verify")
        .arg(temp_dir.path().join("out"))
        .assert()
        .success();
}

#[test]
fn test_verify_flags_broken_foreign_key() {
    let temp_dir = tempdir().expect("Failed to create temporary directory");
    generate(temp_dir.path(), "0.001", "7");
    let orders = temp_dir.path().join("out").join("orders.tbl");

    let contents = fs::read_to_string(&orders).unwrap();
    let mut lines: Vec<String> = contents.lines().map(str::to_string).collect();
    let mut fields: Vec<&str> = lines[1].split('|').collect();
    fields[1] = "999999";
    lines[1] = fields.join("|");
    fs::write(&orders, lines.join("\n") + "\n").unwrap();

    tpch_synth(temp_dir.path())
        .arg("verify")
        .arg(temp_dir.path().join("out"))
        .assert()
        .failure();
}

#[test]
fn test_same_seed_same_output() {
    let first = tempdir().expect("Failed to create temporary directory");
    let second = tempdir().expect("Failed to create temporary directory");
    generate(first.path(), "0.001", "1234");
    generate(second.path(), "0.001", "1234");

    for file in &ALL_FILES {
        let a = fs::read(first.path().join("out").join(file)).unwrap();
        let b = fs::read(second.path().join("out").join(file)).unwrap();
        assert_eq!(a, b, "{file} differs between runs with the same seed");
    }
}

#[test]
fn test_single_supplier_terminates() {
    // scale factor 0.0001 leaves exactly one supplier
    let temp_dir = tempdir().expect("Failed to create temporary directory");
    generate(temp_dir.path(), "0.0001", "5");
    let out = temp_dir.path().join("out");

    assert_eq!(line_count(&out.join("supplier.tbl")), 2);
    // one row per part since every extra slot collides
    assert_eq!(line_count(&out.join("partsupp.tbl")), 21);
}

#[test]
fn test_table_selection_and_no_header() {
    let temp_dir = tempdir().expect("Failed to create temporary directory");
    let out = temp_dir.path().join("out");
    tpch_synth(temp_dir.path())
        .arg("generate")
        .arg("--scale-factor")
        .arg("0.001")
        .arg("--tables")
        .arg("n,orders")
        .arg("--no-header")
        .arg("--output-dir")
        .arg(&out)
        .assert()
        .success();

    assert_eq!(line_count(&out.join("nation.tbl")), 25);
    assert_eq!(line_count(&out.join("orders.tbl")), 1500);
    assert!(!out.join("lineitem.tbl").exists());
    assert!(!out.join("customer.tbl").exists());
}

#[test]
fn test_parquet_output() {
    let temp_dir = tempdir().expect("Failed to create temporary directory");
    let out = temp_dir.path().join("out");
    tpch_synth(temp_dir.path())
        .arg("generate")
        .arg("--scale-factor")
        .arg("0.001")
        .arg("--format")
        .arg("parquet")
        .arg("--tables")
        .arg("region,lineitem")
        .arg("--output-dir")
        .arg(&out)
        .assert()
        .success();

    for file in ["region.parquet", "lineitem.parquet"] {
        let bytes = fs::read(out.join(file)).unwrap();
        assert_eq!(&bytes[..4], b"PAR1");
        assert_eq!(&bytes[bytes.len() - 4..], b"PAR1");
    }
    assert!(!out.join("region.tbl").exists());
}

#[test]
fn test_config_file_and_env_layering() {
    let temp_dir = tempdir().expect("Failed to create temporary directory");
    let out = temp_dir.path().join("from_file");
    fs::write(
        temp_dir.path().join("tpch_synth.toml"),
        format!(
            "scale_factor = 0.001\nseed = 9\ntables = [\"region\", \"supplier\"]\noutput_dir = {:?}\n",
            out
        ),
    )
    .unwrap();

    tpch_synth(temp_dir.path())
        .env("TPCH_SYNTH_HEADER", "false")
        .arg("generate")
        .assert()
        .success();

    assert_eq!(line_count(&out.join("region.tbl")), 5);
    assert_eq!(line_count(&out.join("supplier.tbl")), 10);
    assert!(!out.join("part.tbl").exists());
}

#[test]
fn test_invalid_scale_factor_fails() {
    let temp_dir = tempdir().expect("Failed to create temporary directory");
    for sf in ["0", "-1", "0.00001"] {
        tpch_synth(temp_dir.path())
            .arg("generate")
            .arg(format!("--scale-factor={sf}"))
            .arg("--output-dir")
            .arg(temp_dir.path().join("out"))
            .assert()
            .failure();
    }
    assert!(!temp_dir.path().join("out").join("customer.tbl").exists());
}

#[test]
fn test_unknown_table_fails() {
    let temp_dir = tempdir().expect("Failed to create temporary directory");
    tpch_synth(temp_dir.path())
        .arg("generate")
        .arg("--tables")
        .arg("warehouse")
        .arg("--output-dir")
        .arg(temp_dir.path().join("out"))
        .assert()
        .failure();
}

#[test]
fn test_unusable_log_dir_fails_cleanly() {
    let temp_dir = tempdir().expect("Failed to create temporary directory");
    let blocker = temp_dir.path().join("not_a_dir");
    fs::write(&blocker, "").unwrap();

    let output = tpch_synth(temp_dir.path())
        .arg("generate")
        .arg("--scale-factor")
        .arg("0.0001")
        .arg("--log-dir")
        .arg(blocker.join("logs"))
        .arg("--output-dir")
        .arg(temp_dir.path().join("out"))
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("log directory"), "{stderr}");
    assert!(!stderr.contains("panicked"), "{stderr}");
    assert!(!temp_dir.path().join("out").exists());
}

#[test]
fn test_verify_rejects_oversized_balance() {
    let temp_dir = tempdir().expect("Failed to create temporary directory");
    generate(temp_dir.path(), "0.0001", "3");
    let customers = temp_dir.path().join("out").join("customer.tbl");

    let contents = fs::read_to_string(&customers).unwrap();
    let mut lines: Vec<String> = contents.lines().map(str::to_string).collect();
    let mut fields: Vec<&str> = lines[1].split('|').collect();
    fields[5] = "99999999999999999.00";
    lines[1] = fields.join("|");
    fs::write(&customers, lines.join("\n") + "\n").unwrap();

    let output = tpch_synth(temp_dir.path())
        .arg("verify")
        .arg(temp_dir.path().join("out"))
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("c_acctbal"), "{stderr}");
    assert!(!stderr.contains("panicked"), "{stderr}");
}
