mod common;

use assert_cmd::Command;
use csv_normalize::{column::ColumnType, config::NormalizeConfig};
use predicates::{prelude::PredicateBooleanExt, str::contains};

use common::{ACTIVITY_LOG_NORMALIZED, ACTIVITY_LOG_TYPES, TestWorkspace, fixture_path};

fn normalize_cmd() -> Command {
    let mut cmd = Command::cargo_bin("csv-normalize").expect("binary exists");
    cmd.arg("normalize");
    cmd
}

#[test]
fn normalize_writes_clean_rows_and_separate_diagnostics() {
    let workspace = TestWorkspace::new();
    let input = fixture_path("activity_log.csv");
    let output = workspace.file("out.csv");
    let diagnostics = workspace.file("diagnostics.txt");

    normalize_cmd()
        .args([
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "-d",
            diagnostics.to_str().unwrap(),
            "--types",
            ACTIVITY_LOG_TYPES,
            "--timestamp-offset",
            "3",
        ])
        .assert()
        .success();

    assert_eq!(workspace.read("out.csv"), ACTIVITY_LOG_NORMALIZED);
    let report = workspace.read("diagnostics.txt");
    let lines = report.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 2, "one line per discarded record: {report}");
    assert!(lines[0].starts_with("Record discarded (line 4): <not a time,Nowhere,94121,ann"));
    assert!(lines[0].contains("cannot parse 'not a time' as timestamp"));
    assert!(lines[1].starts_with("Record discarded (line 6):"));
    assert!(lines[1].contains("zip code '123456' is out of range"));
}

#[test]
fn normalize_streams_stdin_to_stdout() {
    normalize_cmd()
        .args([
            "-i",
            "-",
            "--types",
            "zip,name,duration,total",
            "--timestamp-offset",
            "-2",
        ])
        .write_stdin("zip,name,lap,total\n42,JOHN Q. PUBLIC,25:00:00,ignored\nabc,x,1,1\n")
        .assert()
        .success()
        .stdout("zip,name,lap,total\n00042,John Q. Public,90000,90000\n")
        .stderr(contains("Record discarded (line 3): <abc,x,1,1>"));
}

#[test]
fn unrecognized_type_aborts_after_first_record() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("in.csv", "a,b\n1,2\n3,4\n5,6\n");
    let output = workspace.file("out.csv");

    normalize_cmd()
        .args([
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "--types",
            "string,currency",
        ])
        .assert()
        .failure()
        .stderr(contains("Fatal: record discarded (line 2): <1,2>"))
        .stderr(contains("<3,4>").not());

    assert_eq!(workspace.read("out.csv"), "a,b\n");
}

#[test]
fn empty_input_fails_without_output_rows() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("empty.csv", "");
    let output = workspace.file("out.csv");

    normalize_cmd()
        .args(["-i", input.to_str().unwrap(), "-o", output.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(contains("Error: no input to process"));

    assert!(workspace.read("out.csv").is_empty());
}

#[test]
fn header_only_input_copies_header() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("header.csv", "When,Where,\"Who, exactly\"\n");

    normalize_cmd()
        .args(["-i", input.to_str().unwrap(), "--types", "timestamp"])
        .assert()
        .success()
        .stdout("When,Where,\"Who, exactly\"\n");
}

#[test]
fn undeclared_columns_warn_and_pass_through() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("in.csv", "zip,notes\n501,  Keep   Me \n");

    normalize_cmd()
        .args(["-i", input.to_str().unwrap(), "--types", "zip"])
        .assert()
        .success()
        .stdout("zip,notes\n00501,  Keep   Me \n")
        .stderr(contains(
            "Warning: column types not specified for 1 column(s); guessed string",
        ));
}

#[test]
fn tsv_input_uses_tab_delimiter_for_both_sides() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("in.tsv", "zip\tname\n7\tann, lee\n");
    let output = workspace.file("out.tsv");

    normalize_cmd()
        .args([
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "--types",
            "zip,name",
        ])
        .assert()
        .success();

    assert_eq!(workspace.read("out.tsv"), "zip\tname\n00007\tAnn, Lee\n");
}

#[test]
fn config_file_drives_types_and_timestamp_settings() {
    let workspace = TestWorkspace::new();
    let config = workspace.write(
        "normalize.yml",
        "columns: [timestamp, duration]\n\
         delimiter: ';'\n\
         timestamp_offset_hours: -1\n\
         timestamp_format: '%d/%m/%Y %H:%M'\n",
    );
    let input = workspace.write("in.txt", "at;spent\n2024-05-06 00:30:00;1:00\n");

    normalize_cmd()
        .args([
            "-i",
            input.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout("at;spent\n05/05/2024 23:30;60\n");
}

#[test]
fn cli_flags_override_config_values() {
    let workspace = TestWorkspace::new();
    let config = workspace.write(
        "normalize.yml",
        "columns: [timestamp]\ntimestamp_offset_hours: 5\n",
    );
    let input = workspace.write("in.csv", "at\n2024-01-01 00:00:00\n");

    normalize_cmd()
        .args([
            "-i",
            input.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
            "--timestamp-offset",
            "0",
        ])
        .assert()
        .success()
        .stdout("at\n2024-01-01T00:00:00\n");
}

#[test]
fn invalid_timestamp_format_is_rejected_up_front() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("in.csv", "at\n2024-01-01 00:00:00\n");

    normalize_cmd()
        .args([
            "-i",
            input.to_str().unwrap(),
            "--types",
            "timestamp",
            "--timestamp-format",
            "%Q",
        ])
        .assert()
        .failure()
        .stderr(contains("Invalid timestamp format"));
}

#[test]
fn latin1_input_is_decoded_and_utf8_written() {
    let workspace = TestWorkspace::new();
    let input = workspace.file("latin1.csv");
    std::fs::write(&input, b"name\nren\xe9e dupont\n").expect("write latin1 input");

    normalize_cmd()
        .args([
            "-i",
            input.to_str().unwrap(),
            "--types",
            "name",
            "--input-encoding",
            "latin1",
        ])
        .assert()
        .success()
        .stdout("name\nRenée Dupont\n");
}

#[test]
fn probe_writes_config_consumed_by_normalize() {
    let workspace = TestWorkspace::new();
    let input = fixture_path("activity_log.csv");
    let config_path = workspace.file("activity.yml");

    Command::cargo_bin("csv-normalize")
        .expect("binary exists")
        .args([
            "probe",
            "-i",
            input.to_str().unwrap(),
            "-c",
            config_path.to_str().unwrap(),
        ])
        .assert()
        .success();

    let config = NormalizeConfig::load(&config_path).expect("load probed config");
    assert_eq!(
        config.columns,
        vec![
            ColumnType::Timestamp,
            ColumnType::UnmodifiedString,
            ColumnType::ZipCode,
            ColumnType::FullName,
            ColumnType::Duration,
            ColumnType::Duration,
            ColumnType::UnmodifiedString,
            ColumnType::UnmodifiedString,
        ]
    );
    assert_eq!(config.delimiter, b',');

    normalize_cmd()
        .args([
            "-i",
            input.to_str().unwrap(),
            "--config",
            config_path.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(contains("2011-04-01T11:00:00"));
}

#[test]
fn latin1_output_is_transcoded_and_unencodable_rows_are_discarded() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("in.csv", "name\nrenée dupont\nΩmega\nbob\n");
    let output = workspace.file("out.csv");
    let diagnostics = workspace.file("diagnostics.txt");

    normalize_cmd()
        .args([
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "-d",
            diagnostics.to_str().unwrap(),
            "--types",
            "name",
            "--output-encoding",
            "latin1",
        ])
        .assert()
        .success();

    let bytes = std::fs::read(&output).expect("read latin1 output");
    assert_eq!(bytes, b"name\nRen\xe9e Dupont\nBob\n");
    assert_eq!(
        workspace.read("diagnostics.txt"),
        "Record discarded (line 3): <Ωmega> (error: column 1 cannot be written as windows-1252 text)\n"
    );
}

#[test]
fn probe_warns_when_sample_record_cannot_be_decoded() {
    let workspace = TestWorkspace::new();
    let input = workspace.file("in.csv");
    std::fs::write(&input, b"zip,name\n94\xff105,ann\n").expect("write input");
    let config_path = workspace.file("probed.yml");

    Command::cargo_bin("csv-normalize")
        .expect("binary exists")
        .env_remove("RUST_LOG")
        .args([
            "probe",
            "-i",
            input.to_str().unwrap(),
            "-c",
            config_path.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stderr(contains(
            "Sample record column 1 is not valid UTF-8 text; guessing from the header only",
        ));

    assert!(config_path.exists());
}
