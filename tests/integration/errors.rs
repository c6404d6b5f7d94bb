use predicates::prelude::*;

use crate::common::{HAPROXY_TEMPLATE, TestProject};

#[test]
fn test_missing_dependency_fails_without_output() {
    let project = TestProject::new();
    project.write("haproxy.ctmpl", HAPROXY_TEMPLATE);
    project.write(
        "data.json",
        r#"{ "services": { "release.webapp": [] }, "keys": { "service/redis/maxconns": "15" } }"#,
    );

    project
        .ctmpl()
        .args(["render", "haproxy.ctmpl", "--data", "data.json"])
        .assert()
        .failure()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains(
            "template context missing keyPrefix `service/redis/config`",
        ))
        .stderr(predicate::str::contains("suggestion"));
}

#[test]
fn test_undefined_function_reports_line_and_suggestion() {
    let project = TestProject::new();
    project.write("typo.ctmpl", "line one\n{{ servce(name=\"web\") }}\n");

    project
        .ctmpl()
        .args(["deps", "typo.ctmpl"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("typo.ctmpl:2"))
        .stderr(predicate::str::contains("function \"servce\" not defined"))
        .stderr(predicate::str::contains("Did you mean `service`?"));
}

#[test]
fn test_undefined_filter_fails_at_construction() {
    let project = TestProject::new();
    project.write("filter.ctmpl", "{{ key(path=\"a\") | upper }}\n{{ key(path=\"b\") | bogus_filter }}\n");

    project
        .ctmpl()
        .args(["deps", "filter.ctmpl"])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("filter.ctmpl:2"))
        .stderr(predicate::str::contains("filter \"bogus_filter\" not defined"));
}

#[test]
fn test_undefined_filter_section_suggests_name() {
    let project = TestProject::new();
    project.write("section.ctmpl", "{% filter uper %}{{ key(path=\"a\") }}{% endfilter %}\n");

    project
        .ctmpl()
        .args(["deps", "section.ctmpl"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("filter \"uper\" not defined"))
        .stderr(predicate::str::contains("Did you mean `upper`?"));
}

#[test]
fn test_syntax_error() {
    let project = TestProject::new();
    project.write("broken.ctmpl", "{% for s in service(name=\"web\") %}");

    project
        .ctmpl()
        .args(["deps", "broken.ctmpl"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("template: "));
}

#[test]
fn test_invalid_service_identifier() {
    let project = TestProject::new();
    project.write("bad.ctmpl", r#"{{ service(name="not valid!") }}"#);

    project
        .ctmpl()
        .args(["deps", "bad.ctmpl"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error calling service"));
}

#[test]
fn test_include_is_rejected() {
    let project = TestProject::new();
    project.write("other.ctmpl", "x");
    project.write("main.ctmpl", r#"{% include "other.ctmpl" %}"#);

    project
        .ctmpl()
        .args(["deps", "main.ctmpl"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not supported"));
}

#[test]
fn test_missing_template_file() {
    let project = TestProject::new();

    project
        .ctmpl()
        .args(["deps", "nope.ctmpl"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("failed to read template"));
}

#[test]
fn test_missing_snapshot_file() {
    let project = TestProject::new();
    project.write("plain.ctmpl", "hello");

    project
        .ctmpl()
        .args(["render", "plain.ctmpl", "--data", "nope.json"])
        .assert()
        .failure()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("Snapshot file not found"));
}

#[test]
fn test_invalid_snapshot_file() {
    let project = TestProject::new();
    project.write("plain.ctmpl", "hello");
    project.write("data.json", "[1, 2");

    project
        .ctmpl()
        .args(["render", "plain.ctmpl", "--data", "data.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid snapshot"));
}
