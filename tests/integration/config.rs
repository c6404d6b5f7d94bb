use predicates::prelude::*;

use crate::common::TestProject;

#[test]
fn test_autoescape_from_config_flag() {
    let project = TestProject::new();
    project.write("page.ctmpl", r#"{{ key(path="title") }}"#);
    project.write("data.json", r#"{ "keys": { "title": "<b>hi</b>" } }"#);
    project.write("ctmpl.toml", "autoescape = true\n");

    project
        .ctmpl()
        .args(["--config", "ctmpl.toml", "render", "page.ctmpl", "--data", "data.json"])
        .assert()
        .success()
        .stdout("&lt;b&gt;hi&lt;&#x2F;b&gt;");
}

#[test]
fn test_autoescape_off_by_default() {
    let project = TestProject::new();
    project.write("page.ctmpl", r#"{{ key(path="title") }}"#);
    project.write("data.json", r#"{ "keys": { "title": "<b>hi</b>" } }"#);

    project
        .ctmpl()
        .args(["render", "page.ctmpl", "--data", "data.json"])
        .assert()
        .success()
        .stdout("<b>hi</b>");
}

#[test]
fn test_default_config_location_is_home() {
    let project = TestProject::new();
    std::fs::create_dir_all(project.path().join(".ctmpl")).unwrap();
    project.write(".ctmpl/config.toml", "builtin_functions = []\n");
    project.write("nums.ctmpl", "{% for i in range(end=2) %}{{ i }}{% endfor %}");

    project
        .ctmpl()
        .args(["deps", "nums.ctmpl"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("function \"range\" not defined"));
}

#[test]
fn test_invalid_config_file() {
    let project = TestProject::new();
    project.write("plain.ctmpl", "hello");
    project.write("ctmpl.toml", "autoescape = \"yes please\"\n");

    project
        .ctmpl()
        .args(["--config", "ctmpl.toml", "deps", "plain.ctmpl"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Configuration error"));
}
