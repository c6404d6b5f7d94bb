use predicates::prelude::*;

use crate::common::{HAPROXY_DATA, HAPROXY_TEMPLATE, TestProject};

#[test]
fn test_render_json_snapshot() {
    let project = TestProject::new();
    project.write("haproxy.ctmpl", HAPROXY_TEMPLATE);
    project.write("data.json", HAPROXY_DATA);

    project
        .ctmpl()
        .args(["render", "haproxy.ctmpl", "--data", "data.json"])
        .assert()
        .success()
        .stdout(
            "server web1 10.0.0.1:8080\n\
             server web2 10.0.0.2:8080\n\
             maxconns 15\n\
             minconns=2\n\
             timeout=30s\n",
        );
}

#[test]
fn test_render_toml_snapshot() {
    let project = TestProject::new();
    project.write("limits.ctmpl", r#"maxconns={{ key(path="service/redis/maxconns") }}"#);
    project.write(
        "data.toml",
        r#"[keys]
"service/redis/maxconns" = "11"
"#,
    );

    project
        .ctmpl()
        .args(["render", "limits.ctmpl", "-d", "data.toml"])
        .assert()
        .success()
        .stdout("maxconns=11");
}

#[test]
fn test_render_empty_service_list_is_satisfied() {
    let project = TestProject::new();
    project.write(
        "web.ctmpl",
        r#"{% for s in service(name="web") %}{{ s.Address }}{% else %}none{% endfor %}"#,
    );
    project.write("data.json", r#"{ "services": { "web": [] } }"#);

    project
        .ctmpl()
        .args(["render", "web.ctmpl", "--data", "data.json"])
        .assert()
        .success()
        .stdout("none");
}

#[test]
fn test_render_is_deterministic() {
    let project = TestProject::new();
    project.write("haproxy.ctmpl", HAPROXY_TEMPLATE);
    project.write("data.json", HAPROXY_DATA);

    let first = project
        .ctmpl()
        .args(["render", "haproxy.ctmpl", "--data", "data.json"])
        .output()
        .unwrap();
    let second = project
        .ctmpl()
        .args(["render", "haproxy.ctmpl", "--data", "data.json"])
        .output()
        .unwrap();

    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn test_render_verbose_logs_to_stderr() {
    let project = TestProject::new();
    project.write("plain.ctmpl", "hello");
    project.write("data.json", "{}");

    project
        .ctmpl()
        .args(["--verbose", "render", "plain.ctmpl", "--data", "data.json"])
        .assert()
        .success()
        .stdout("hello")
        .stderr(predicate::str::contains("Rendered"));
}
