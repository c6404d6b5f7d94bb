//! Global constants used throughout the ctmpl codebase.
//!
//! Function names recognized in template bodies, identity formatting, and
//! configuration defaults are defined here so the extractor, renderer, and
//! CLI agree on them.

/// Template function that enumerates the instances of a discovered service.
pub const SERVICE_FUNCTION: &str = "service";

/// Template function that reads a single key from the configuration store.
pub const KEY_FUNCTION: &str = "key";

/// Template function that lists every key/value pair under a store prefix.
pub const KEY_PREFIX_FUNCTION: &str = "keyPrefix";

/// Keyword argument carrying the service identifier in `service(name="...")`.
pub const SERVICE_ARGUMENT: &str = "name";

/// Keyword argument carrying the store path in `key(path="...")` and `keyPrefix(path="...")`.
pub const PATH_ARGUMENT: &str = "path";

/// Type tag prefixed to a template's identity string.
pub const TEMPLATE_HASH_TAG: &str = "Template";

/// Separator between the type tag and the source path in a template identity.
pub const TEMPLATE_HASH_DELIMITER: char = '|';

/// Tera built-in functions templates may call unless the configuration says otherwise.
///
/// Excludes `now`, `get_random` and `get_env`: rendered output must depend on
/// the template context alone.
pub const DEFAULT_BUILTIN_FUNCTIONS: &[&str] = &["range", "throw"];

/// Tera built-in filters templates may apply unless the configuration says otherwise.
///
/// `safe` and `default` are handled by Tera's renderer directly; the rest are
/// the filters `Tera::default()` registers.
pub const DEFAULT_BUILTIN_FILTERS: &[&str] = &[
    "abs", "addslashes", "as_str", "capitalize", "concat", "date", "default", "escape",
    "escape_xml", "filesizeformat", "filter", "first", "float", "get", "group_by", "indent",
    "int", "join", "json_encode", "last", "length", "linebreaksbr", "lower", "map", "nth",
    "pluralize", "replace", "reverse", "round", "safe", "slice", "slugify", "sort", "spaceless",
    "split", "striptags", "title", "trim", "trim_end", "trim_end_matches", "trim_start",
    "trim_start_matches", "truncate", "unique", "upper", "urlencode", "urlencode_strict",
    "wordcount",
];

/// Directory name (under the home directory) holding the global configuration.
pub const CONFIG_DIR_NAME: &str = ".ctmpl";

/// File name of the global configuration.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Maximum Levenshtein distance for "did you mean" suggestions on unknown functions.
pub const MAX_SUGGESTION_DISTANCE: usize = 3;
