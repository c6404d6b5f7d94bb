use predicates::prelude::*;

use crate::common::{HAPROXY_TEMPLATE, TestProject};

#[test]
fn test_deps_text() {
    let project = TestProject::new();
    project.write("haproxy.ctmpl", HAPROXY_TEMPLATE);

    project.ctmpl().args(["deps", "haproxy.ctmpl"]).assert().success().stdout(
        "service\trelease.webapp\nkey\tservice/redis/maxconns\nkeyPrefix\tservice/redis/config\n",
    );
}

#[test]
fn test_deps_json() {
    let project = TestProject::new();
    project.write("haproxy.ctmpl", HAPROXY_TEMPLATE);

    let output = project
        .ctmpl()
        .args(["deps", "haproxy.ctmpl", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        parsed,
        serde_json::json!([
            { "kind": "service", "key": "release.webapp" },
            { "kind": "key", "key": "service/redis/maxconns" },
            { "kind": "keyPrefix", "key": "service/redis/config" },
        ])
    );
}

#[test]
fn test_deps_deduplicates_in_first_use_order() {
    let project = TestProject::new();
    project.write(
        "dup.ctmpl",
        r#"{{ key(path="b") }}{{ key(path="a") }}{{ key(path="b") }}{% for s in service(name="a") %}{% endfor %}"#,
    );

    project
        .ctmpl()
        .args(["deps", "dup.ctmpl"])
        .assert()
        .success()
        .stdout("key\tb\nkey\ta\nservice\ta\n");
}

#[test]
fn test_deps_includes_unexecuted_branches() {
    let project = TestProject::new();
    project.write(
        "branch.ctmpl",
        r#"{% if false %}{{ key(path="never/rendered") }}{% endif %}"#,
    );

    project
        .ctmpl()
        .args(["deps", "branch.ctmpl"])
        .assert()
        .success()
        .stdout(predicate::str::contains("key\tnever/rendered"));
}

#[test]
fn test_deps_plain_template() {
    let project = TestProject::new();
    project.write("plain.ctmpl", "no data here\n");

    project.ctmpl().args(["deps", "plain.ctmpl"]).assert().success().stdout("");
}
