use super::*;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("export-cli-{}-{name}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir
}

#[test]
fn deliver_creates_directory_and_writes_bytes() {
    let dir = scratch_dir("write");
    let sink = DirectorySink::new(dir.join("nested"));

    sink.deliver("fri_data_2024-01-15_1.xlsx", b"xlsx").unwrap();

    let written = fs::read(dir.join("nested").join("fri_data_2024-01-15_1.xlsx")).unwrap();
    assert_eq!(written, b"xlsx");
    assert_eq!(sink.written(), vec![dir.join("nested").join("fri_data_2024-01-15_1.xlsx")]);
    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn path_for_strips_directory_components() {
    let sink = DirectorySink::new(PathBuf::from("/out"));
    assert_eq!(sink.path_for("../../etc/report.xlsx"), PathBuf::from("/out/report.xlsx"));
}

#[test]
fn deliver_rejects_names_without_file_component() {
    let sink = DirectorySink::new(scratch_dir("reject"));
    let err = sink.deliver("..", b"x").unwrap_err();
    assert!(matches!(err, SinkError::Write { .. }));
}

#[test]
fn written_reports_generated_name_not_record_name() {
    let dir = scratch_dir("renamed");
    let sink = DirectorySink::new(dir.clone());

    sink.deliver("mnrl_normal_2024-01-15_7.xlsx", b"xlsx").unwrap();

    // The backend may save the record under a different name; the local file
    // keeps the generated one.
    let written = sink.written();
    assert_eq!(written, vec![dir.join("mnrl_normal_2024-01-15_7.xlsx")]);
    assert_ne!(written[0], sink.path_for("renamed-by-backend.xlsx"));
    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn rejected_delivery_records_nothing() {
    let sink = DirectorySink::new(scratch_dir("none"));
    assert!(sink.deliver("..", b"x").is_err());
    assert!(sink.written().is_empty());
}
