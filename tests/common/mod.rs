//! Helpers shared by the integration suite.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// A scratch directory that doubles as `$HOME` for the binary.
pub struct TestProject {
    temp: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        Self {
            temp: TempDir::new().expect("create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// Write a file into the project directory.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        ctmpl::test_utils::write_template(self.path(), name, contents).expect("write fixture")
    }

    /// The `ctmpl` binary, isolated from the user's config and environment.
    pub fn ctmpl(&self) -> Command {
        let mut cmd = Command::cargo_bin("ctmpl").expect("ctmpl binary is built");
        cmd.current_dir(self.path())
            .env("HOME", self.path())
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG");
        cmd
    }
}

/// Template used across tests; reads one of each dependency kind.
pub const HAPROXY_TEMPLATE: &str = r#"{% for s in service(name="release.webapp") %}server {{ s.Name }} {{ s.Address }}:{{ s.Port }}
{% endfor %}maxconns {{ key(path="service/redis/maxconns") }}
{% for p in keyPrefix(path="service/redis/config") %}{{ p.Key }}={{ p.Value }}
{% endfor %}"#;

/// Snapshot satisfying [`HAPROXY_TEMPLATE`].
pub const HAPROXY_DATA: &str = r#"{
  "services": {
    "release.webapp": [
      { "Node": "nyc-worker-2", "ID": "web2", "Name": "web2", "Address": "10.0.0.2", "Port": 8080 },
      { "Node": "nyc-worker-1", "ID": "web1", "Name": "web1", "Address": "10.0.0.1", "Port": 8080 }
    ]
  },
  "keys": { "service/redis/maxconns": "15" },
  "key_prefixes": {
    "service/redis/config": [
      { "Key": "minconns", "Value": "2" },
      { "Key": "timeout", "Value": "30s" }
    ]
  }
}"#;
