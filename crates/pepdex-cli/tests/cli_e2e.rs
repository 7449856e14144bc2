use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn pepdex_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_pepdex"))
}

fn run(args: &[&str]) -> Output {
    Command::new(pepdex_bin())
        .args(args)
        .env("NO_COLOR", "1")
        .env_remove("PEPDEX_LOG")
        .env_remove("PEPDEX_MAX_FILES")
        .env_remove("PEPDEX_MAX_FILE_BYTES")
        .env_remove("PEPDEX_EXTENSIONS")
        .output()
        .expect("run pepdex")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).to_string()
}

const PEP_333: &str = "PEP: 333\nTitle: Python Web Server Gateway Interface v1.0\nAuthor: Phillip J. Eby <pje@telecommunity.com>\nStatus: Final\nType: Informational\nCreated: 07-Dec-2003\n\nPreface\n=======\n";

const PEP_3333: &str = "PEP: 3333\nTitle: Python Web Server Gateway Interface v1.0.1\nAuthor: Phillip J. Eby <pje@telecommunity.com>\nStatus: Draft\nType: Informational\nCreated: 26-Sep-2010\n\nPreface\n=======\n";

fn write(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, text).unwrap();
    path
}

#[test]
fn parse_prints_json_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        dir.path(),
        "pep-0487.rst",
        "Number: 487\nTitle: X\nStatus: Draft\nType: Standards Track\nCreated: 27-Feb-2015\n\nbody...",
    );

    let out = run(&["parse", "--json", path.to_str().unwrap()]);
    assert!(out.status.success(), "stderr={}", String::from_utf8_lossy(&out.stderr));
    let json: serde_json::Value = serde_json::from_str(&stdout(&out)).expect("json");
    assert_eq!(json["number"], 487);
    assert_eq!(json["status"], "Draft");
}

#[test]
fn parse_failure_names_field_and_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        dir.path(),
        "pep-0487.rst",
        "Number: 487\nTitle: X\nStatus: Draft\nType: Standards Track\n\nbody...",
    );

    let out = run(&["parse", path.to_str().unwrap()]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("pep-0487"), "stderr={stderr}");
    assert!(stderr.contains("created"), "stderr={stderr}");
}

#[test]
fn check_fails_on_broken_corpus_and_passes_with_no_fail() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "pep-0333.rst", PEP_333);
    write(
        dir.path(),
        "pep-0999.rst",
        "PEP: 999\nTitle: X\nStatus: Bogus\nType: Process\nCreated: 01-Jan-2020\n",
    );
    let root = dir.path().to_str().unwrap();

    let out = run(&["check", root]);
    assert!(!out.status.success());
    assert!(stdout(&out).contains("1 parsed"), "stdout={}", stdout(&out));

    let out = run(&["check", "--no-fail", "--json", root]);
    assert!(out.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout(&out)).expect("json");
    assert_eq!(json["failed"][0]["error"]["field"], "status");
    assert_eq!(json["failed"][0]["error"]["kind"], "malformed_field");
}

#[test]
fn index_writes_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let corpus = dir.path().join("peps");
    fs::create_dir_all(&corpus).unwrap();
    write(&corpus, "pep-0333.rst", PEP_333);
    write(&corpus, "pep-3333.rst", PEP_3333);
    let index_path = dir.path().join("index.json");

    let out = run(&[
        "index",
        corpus.to_str().unwrap(),
        "--out",
        index_path.to_str().unwrap(),
    ]);
    assert!(out.status.success(), "stderr={}", String::from_utf8_lossy(&out.stderr));

    let index = pepdex_corpus_index(&index_path);
    assert_eq!(index["version"], 1);
    assert_eq!(index["entries"].as_array().unwrap().len(), 2);
    assert_eq!(index["entries"][0]["record"]["number"], 333);
}

fn pepdex_corpus_index(path: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn advance_and_post_rewrite_the_header_only() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "pep-3333.rst", PEP_3333);
    let p = path.to_str().unwrap();

    let out = run(&["advance", p, "--to", "Accepted", "--write"]);
    assert!(out.status.success(), "stderr={}", String::from_utf8_lossy(&out.stderr));
    let out = run(&["post", p, "--date", "04-Oct-2010", "--write"]);
    assert!(out.status.success(), "stderr={}", String::from_utf8_lossy(&out.stderr));

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("Status: Accepted\n"), "text={text}");
    assert!(text.contains("Post-History: 04-Oct-2010\n"), "text={text}");
    assert!(text.ends_with("\n\nPreface\n=======\n"), "text={text}");

    // Backward move is refused and the file is left alone.
    let out = run(&["advance", p, "--to", "Draft", "--write"]);
    assert!(!out.status.success());
    assert_eq!(fs::read_to_string(&path).unwrap(), text);
}

#[test]
fn supersede_links_both_files() {
    let dir = tempfile::tempdir().unwrap();
    let old = write(
        dir.path(),
        "pep-0333.rst",
        &PEP_333.replace("Status: Final", "Status: Accepted"),
    );
    let new = write(dir.path(), "pep-3333.rst", PEP_3333);

    let out = run(&["supersede", old.to_str().unwrap(), new.to_str().unwrap()]);
    assert!(out.status.success(), "stderr={}", String::from_utf8_lossy(&out.stderr));

    let old_text = fs::read_to_string(&old).unwrap();
    let new_text = fs::read_to_string(&new).unwrap();
    assert!(old_text.contains("Status: Superseded\n"), "old={old_text}");
    assert!(old_text.contains("Superseded-By: 3333\n"), "old={old_text}");
    assert!(new_text.contains("Replaces: 333\n"), "new={new_text}");

    let out = run(&["check", dir.path().to_str().unwrap()]);
    assert!(out.status.success(), "stdout={}", stdout(&out));
}

#[test]
fn fmt_refuses_write_with_out() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "pep-0333.rst", PEP_333);
    let other = dir.path().join("other.rst");
    let out = run(&[
        "fmt",
        path.to_str().unwrap(),
        "--write",
        "--out",
        other.to_str().unwrap(),
    ]);
    assert!(!out.status.success());
}

#[test]
fn check_reports_an_unreadable_file_and_still_checks_the_rest() {
    let dir = tempfile::tempdir().unwrap();
    let bad = dir.path().join("pep-0002.rst");
    fs::write(&bad, [0xff, 0xfe]).unwrap();
    let good = write(dir.path(), "pep-0333.rst", PEP_333);

    let out = run(&["check", bad.to_str().unwrap(), good.to_str().unwrap()]);
    assert!(!out.status.success());
    let text = stdout(&out);
    assert!(text.contains("pep-0002.rst"), "stdout={text}");
    assert!(text.contains("1 parsed, 1 failed"), "stdout={text}");

    let out = run(&[
        "check",
        "--no-fail",
        "--json",
        bad.to_str().unwrap(),
        good.to_str().unwrap(),
    ]);
    assert!(out.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout(&out)).expect("json");
    assert_eq!(json["parsed"][0]["record"]["number"], 333);
    assert_eq!(json["unreadable"].as_array().unwrap().len(), 1);
}

#[test]
fn check_reads_a_file_listed_twice_once() {
    let dir = tempfile::tempdir().unwrap();
    let file = write(dir.path(), "pep-0333.rst", PEP_333);

    let out = run(&["check", dir.path().to_str().unwrap(), file.to_str().unwrap()]);
    assert!(out.status.success(), "stdout={}", stdout(&out));
    assert!(stdout(&out).contains("1 parsed, 0 failed"), "stdout={}", stdout(&out));
}

#[test]
fn edits_keep_post_history_links() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        dir.path(),
        "pep-3333.rst",
        &PEP_3333.replace(
            "Created: 26-Sep-2010\n",
            "Created: 26-Sep-2010\nPost-History: `26-Sep-2010 <https://mail.python.org/pipermail/web-sig/2010-September/004655.html>`__\n",
        ),
    );
    let p = path.to_str().unwrap();

    let out = run(&["advance", p, "--to", "Accepted", "--write"]);
    assert!(out.status.success(), "stderr={}", String::from_utf8_lossy(&out.stderr));
    let out = run(&[
        "post",
        p,
        "--date",
        "04-Oct-2010",
        "--link",
        "https://discuss.python.org/t/4655",
        "--write",
    ]);
    assert!(out.status.success(), "stderr={}", String::from_utf8_lossy(&out.stderr));

    let text = fs::read_to_string(&path).unwrap();
    assert!(
        text.contains("Post-History: `26-Sep-2010 <https://mail.python.org/pipermail/web-sig/2010-September/004655.html>`__, `04-Oct-2010 <https://discuss.python.org/t/4655>`__\n"),
        "text={text}"
    );
}
