use std::io::Write;

use assert_cmd::Command;

fn bin() -> Command {
    Command::cargo_bin("hash-probe-bench").unwrap()
}

fn write_ceps(dir: &std::path::Path, rows: usize) -> std::path::PathBuf {
    let path = dir.join("ceps.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "CEP,CIDADE,ESTADO").unwrap();
    for i in 0..rows {
        writeln!(file, "{:05}-123,Cidade {},MG", i * 3, i).unwrap();
    }
    path
}

#[test]
fn plot_writes_sample_chart() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("chart.svg");

    bin().args(["plot", "--output"]).arg(&out).assert().success();

    let svg = std::fs::read_to_string(&out).unwrap();
    assert!(svg.contains("Hash Simples"));
    assert!(svg.contains("Hash Dupla"));
    assert!(svg.contains("Tempo de Busca (s)"));
}

#[test]
fn plot_twice_gives_same_file() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.svg");
    let b = dir.path().join("b.svg");

    bin().args(["plot", "-o"]).arg(&a).assert().success();
    bin().args(["plot", "-o"]).arg(&b).assert().success();

    assert_eq!(std::fs::read(&a).unwrap(), std::fs::read(&b).unwrap());
}

#[test]
fn bench_without_csv_is_a_usage_error() {
    bin().arg("bench").assert().failure();
}

#[test]
fn bench_with_missing_csv_fails() {
    let dir = tempfile::tempdir().unwrap();
    bin()
        .arg("bench")
        .arg(dir.path().join("missing.csv"))
        .arg("--output")
        .arg(dir.path().join("chart.svg"))
        .assert()
        .failure();
}

#[test]
fn bench_prints_table_and_charts_measurements() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_ceps(dir.path(), 300);
    let out = dir.path().join("bench.svg");

    let assert = bin()
        .arg("bench")
        .arg(&csv)
        .arg("--output")
        .arg(&out)
        .args(["--capacity", "200", "--lookups", "50", "--repetitions", "2", "--records", "300"])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("CEP 01310 encontrado: São Paulo, SP"));
    assert!(stdout.contains("Taxa\tHash Simples (s)\tHash Duplo (s)"));
    assert!(stdout.contains("99%\t"));
    assert!(stdout.contains("Overhead estrutura dinâmica"));

    let svg = std::fs::read_to_string(&out).unwrap();
    assert!(svg.contains("Hash Dupla"));
}

#[test]
fn no_subcommand_writes_default_chart() {
    let dir = tempfile::tempdir().unwrap();

    bin().current_dir(dir.path()).assert().success();

    let svg = std::fs::read_to_string(dir.path().join("search-time.svg")).unwrap();
    assert!(svg.contains("Hash Simples"));
}

#[test]
fn bench_loads_latin1_csv() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("latin1.csv");
    let mut data = b"CEP,CIDADE,ESTADO\n".to_vec();
    for i in 0..100 {
        data.extend_from_slice(format!("{:05}-000,S", i * 11).as_bytes());
        data.extend_from_slice(b"\xE3o Jos\xE9,SP\n");
    }
    std::fs::write(&csv, data).unwrap();

    bin()
        .arg("bench")
        .arg(&csv)
        .arg("--output")
        .arg(dir.path().join("chart.svg"))
        .args(["--capacity", "100", "--lookups", "10", "--repetitions", "1", "--records", "100"])
        .assert()
        .success();
}
