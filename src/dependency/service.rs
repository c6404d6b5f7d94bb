use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

use super::DependencyError;

/// `[tag.]name[@datacenter][:port]`, ASCII word characters only.
fn service_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^(?:(?P<tag>[[:word:].\-]+)\.)?(?P<name>[[:word:]\-]+)(?:@(?P<datacenter>[[:word:].\-]+))?(?::(?P<port>[0-9]+))?$",
        )
        .expect("service dependency pattern is valid")
    })
}

/// A request for the live instances of one logical service.
///
/// Built from the argument of `service(name="...")`. The identifier may scope
/// the lookup by tag and datacenter and may pin a port:
///
/// | Spec                      | tag       | name     | datacenter | port |
/// |---------------------------|-----------|----------|------------|------|
/// | `webapp`                  | -         | `webapp` | -          | -    |
/// | `release.webapp`          | `release` | `webapp` | -          | -    |
/// | `release.webapp@east-1`   | `release` | `webapp` | `east-1`   | -    |
/// | `webapp:8080`             | -         | `webapp` | -          | 8080 |
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceDependency {
    raw: String,
    tag: Option<String>,
    name: String,
    datacenter: Option<String>,
    port: Option<u16>,
}

impl ServiceDependency {
    /// The specification exactly as written in the template.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.raw
    }

    /// Tag filter, if the identifier was tag-scoped.
    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Logical service name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Datacenter to query instead of the local one.
    #[must_use]
    pub fn datacenter(&self) -> Option<&str> {
        self.datacenter.as_deref()
    }

    /// Port override.
    #[must_use]
    pub const fn port(&self) -> Option<u16> {
        self.port
    }
}

impl FromStr for ServiceDependency {
    type Err = DependencyError;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let captures = service_pattern().captures(spec).ok_or_else(|| {
            DependencyError::InvalidService {
                spec: spec.to_string(),
            }
        })?;

        let port = match captures.name("port") {
            Some(port) => Some(port.as_str().parse::<u16>().map_err(|_| {
                DependencyError::InvalidPort {
                    spec: spec.to_string(),
                    port: port.as_str().to_string(),
                }
            })?),
            None => None,
        };

        Ok(Self {
            raw: spec.to_string(),
            tag: captures.name("tag").map(|m| m.as_str().to_string()),
            name: captures["name"].to_string(),
            datacenter: captures.name("datacenter").map(|m| m.as_str().to_string()),
            port,
        })
    }
}
