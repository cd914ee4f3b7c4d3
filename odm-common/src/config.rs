// odm-common/src/config.rs
use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::error::{OdmError, Result};
use crate::dependency::DependencyTable;
use crate::model::RelativePath;

const DEFAULT_REMOTE_BASE_URL: &str = "https://raw.githubusercontent.com/zendframework/zf1/release-";
const DEFAULT_SOURCE_VERSION: &str = "1.12.18";
const DEFAULT_FILE_EXTENSION: &str = ".php";
const DEFAULT_INCLUDE_DIRECTIVE: &str = "require_once";
const DEFAULT_NAMESPACE_FILTER: &str = "Zend";
const LIBRARY_SEGMENT: &str = "library";
const CONFIG_FILE_ENV: &str = "ODM_CONFIG";

/// How remote bytes are pulled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportStrategy {
    /// Configurable HTTP client.
    #[serde(alias = "curl")]
    Http,
    /// Plain stream read of the URL; also accepts local paths.
    Basic,
}

/// Where the module resolution hook goes in the host's resolver chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HookPriority {
    Prepend,
    Append,
}

impl FromStr for TransportStrategy {
    type Err = OdmError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" | "curl" => Ok(Self::Http),
            "basic" => Ok(Self::Basic),
            other => Err(OdmError::Config(format!(
                "unknown transport strategy '{other}' (expected 'http' or 'basic')"
            ))),
        }
    }
}

impl FromStr for HookPriority {
    type Err = OdmError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "prepend" | "front" => Ok(Self::Prepend),
            "append" | "back" => Ok(Self::Append),
            other => Err(OdmError::Config(format!(
                "unknown hook priority '{other}' (expected 'prepend' or 'append')"
            ))),
        }
    }
}

impl fmt::Display for TransportStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http => f.write_str("http"),
            Self::Basic => f.write_str("basic"),
        }
    }
}

impl fmt::Display for HookPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prepend => f.write_str("prepend"),
            Self::Append => f.write_str("append"),
        }
    }
}

/// Resolved location of a path on the upstream source tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteLocation {
    /// The upstream tree is a checkout on this machine.
    Local(PathBuf),
    Url(String),
}

/// On-disk config file. Every key is optional and overrides the default.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub local_root: Option<PathBuf>,
    pub remote_base_url: Option<String>,
    pub source_version: Option<String>,
    pub transport: Option<TransportStrategy>,
    pub hook_priority: Option<HookPriority>,
    pub file_extension: Option<String>,
    pub include_directive: Option<String>,
    pub namespace_filter: Option<String>,
    #[serde(default)]
    pub dependencies: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub local_root: PathBuf,
    pub remote_base_url: String,
    pub source_version: String,
    pub transport: TransportStrategy,
    pub hook_priority: HookPriority,
    pub file_extension: String,
    pub include_directive: String,
    /// Only module names containing this (case-insensitive) are resolved.
    pub namespace_filter: Option<String>,
    /// Entries layered over the builtin dependency table.
    pub extra_dependencies: Vec<(String, Vec<String>)>,
}

impl Config {
    /// Defaults, then the config file if present, then `ODM_*` environment
    /// variables.
    pub fn load() -> Result<Self> {
        debug!("Loading odm configuration");
        let mut config = Self::default();

        if let Some(path) = config_file_path() {
            if path.is_file() {
                debug!("Reading config file {}", path.display());
                config.apply_file(ConfigFile::read(&path)?)?;
            } else {
                debug!("No config file at {}", path.display());
            }
        }

        config.apply_overrides(|key| env::var(key).ok().filter(|v| !v.is_empty()))?;
        debug!("Effective library root: {}", config.local_root.display());
        Ok(config)
    }

    pub fn apply_file(&mut self, file: ConfigFile) -> Result<()> {
        if let Some(v) = file.local_root {
            self.local_root = v;
        }
        if let Some(v) = file.remote_base_url {
            self.remote_base_url = v;
        }
        if let Some(v) = file.source_version {
            self.source_version = v;
        }
        if let Some(v) = file.transport {
            self.transport = v;
        }
        if let Some(v) = file.hook_priority {
            self.hook_priority = v;
        }
        if let Some(v) = file.file_extension {
            self.file_extension = v;
        }
        if let Some(v) = file.include_directive {
            validate_include_directive(&v)?;
            self.include_directive = v;
        }
        if let Some(v) = file.namespace_filter {
            self.namespace_filter = if v.is_empty() { None } else { Some(v) };
        }
        self.extra_dependencies.extend(file.dependencies);
        Ok(())
    }

    /// Applies `ODM_*` overrides looked up through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("ODM_LOCAL_ROOT") {
            self.local_root = PathBuf::from(v);
        }
        if let Some(v) = lookup("ODM_REMOTE_BASE_URL") {
            self.remote_base_url = v;
        }
        if let Some(v) = lookup("ODM_SOURCE_VERSION") {
            self.source_version = v;
        }
        if let Some(v) = lookup("ODM_TRANSPORT") {
            self.transport = v.parse()?;
        }
        if let Some(v) = lookup("ODM_HOOK_PRIORITY") {
            self.hook_priority = v.parse()?;
        }
        Ok(())
    }

    pub fn local_root(&self) -> &Path {
        &self.local_root
    }

    /// `{base}{version}/library/{path}`. The base is concatenated verbatim so
    /// it may carry a tag prefix such as `release-`.
    pub fn remote_url(&self, path: &RelativePath) -> String {
        format!(
            "{}{}/{}/{}",
            self.remote_base_url, self.source_version, LIBRARY_SEGMENT, path
        )
    }

    /// Like [`Config::remote_url`], but recognizes an upstream tree that
    /// lives on the local filesystem (plain path or `file://` URL).
    pub fn remote_location(&self, path: &RelativePath) -> RemoteLocation {
        let url = self.remote_url(path);
        if url.starts_with("http://") || url.starts_with("https://") {
            return RemoteLocation::Url(url);
        }
        if url.starts_with("file://") {
            return match Url::parse(&url).ok().and_then(|u| u.to_file_path().ok()) {
                Some(p) => RemoteLocation::Local(p),
                None => RemoteLocation::Url(url),
            };
        }
        RemoteLocation::Local(PathBuf::from(url))
    }

    pub fn dependency_table(&self) -> Result<DependencyTable> {
        let builtin = DependencyTable::builtin(&self.file_extension)?;
        if self.extra_dependencies.is_empty() {
            return Ok(builtin);
        }
        let extra =
            DependencyTable::from_entries(self.extra_dependencies.clone(), &self.file_extension)?;
        Ok(builtin.merged(extra))
    }
}

impl ConfigFile {
    pub fn read(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            OdmError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Ok(toml::from_str(&raw)?)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            local_root: default_local_root(),
            remote_base_url: DEFAULT_REMOTE_BASE_URL.to_string(),
            source_version: DEFAULT_SOURCE_VERSION.to_string(),
            transport: TransportStrategy::Http,
            hook_priority: HookPriority::Prepend,
            file_extension: DEFAULT_FILE_EXTENSION.to_string(),
            include_directive: DEFAULT_INCLUDE_DIRECTIVE.to_string(),
            namespace_filter: Some(DEFAULT_NAMESPACE_FILTER.to_string()),
            extra_dependencies: Vec::new(),
        }
    }
}

/// Directory holding the running executable, falling back to the working
/// directory.
pub fn default_local_root() -> PathBuf {
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .or_else(|| env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// `$ODM_CONFIG`, else `<config dir>/odm/config.toml`.
pub fn config_file_path() -> Option<PathBuf> {
    env::var_os(CONFIG_FILE_ENV)
        .map(PathBuf::from)
        .or_else(|| dirs::config_dir().map(|d| d.join("odm").join("config.toml")))
}

/// The directive is disabled by prefixing `//`; a directive containing a
/// slash could match inside that prefix and be disabled again on every pass.
pub fn validate_include_directive(directive: &str) -> Result<()> {
    if directive.contains('/') {
        return Err(OdmError::Config(format!(
            "include_directive '{directive}' must not contain '/'"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn path(s: &str) -> RelativePath {
        RelativePath::new(s).unwrap()
    }

    #[test]
    fn remote_url_concatenates_base_and_version() {
        let config = Config::default();
        assert_eq!(
            config.remote_url(&path("Zend/View.php")),
            "https://raw.githubusercontent.com/zendframework/zf1/release-1.12.18/library/Zend/View.php"
        );
    }

    #[test]
    fn remote_location_detects_local_trees() {
        let mut config = Config {
            remote_base_url: "/srv/zf1/".to_string(),
            source_version: "1.0".to_string(),
            ..Config::default()
        };
        assert_eq!(
            config.remote_location(&path("Zend/View")),
            RemoteLocation::Local(PathBuf::from("/srv/zf1/1.0/library/Zend/View"))
        );

        config.remote_base_url = "file:///srv/zf1/".to_string();
        assert_eq!(
            config.remote_location(&path("Zend")),
            RemoteLocation::Local(PathBuf::from("/srv/zf1/1.0/library/Zend"))
        );

        config.remote_base_url = "http://mirror.local/zf1-".to_string();
        assert!(matches!(
            config.remote_location(&path("Zend")),
            RemoteLocation::Url(_)
        ));
    }

    #[test]
    fn overrides_take_precedence() {
        let env: HashMap<&str, &str> = [
            ("ODM_LOCAL_ROOT", "/tmp/lib"),
            ("ODM_SOURCE_VERSION", "1.12.20"),
            ("ODM_TRANSPORT", "basic"),
            ("ODM_HOOK_PRIORITY", "append"),
        ]
        .into_iter()
        .collect();
        let mut config = Config::default();
        config
            .apply_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.local_root, PathBuf::from("/tmp/lib"));
        assert_eq!(config.source_version, "1.12.20");
        assert_eq!(config.transport, TransportStrategy::Basic);
        assert_eq!(config.hook_priority, HookPriority::Append);
    }

    #[test]
    fn bad_override_is_a_config_error() {
        let mut config = Config::default();
        let err = config
            .apply_overrides(|k| (k == "ODM_TRANSPORT").then(|| "ftp".to_string()))
            .unwrap_err();
        assert!(matches!(err, OdmError::Config(_)));
    }

    #[test]
    fn config_file_layers_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("config.toml");
        std::fs::write(
            &file,
            r#"
local_root = "/opt/lib"
transport = "curl"
hook_priority = "append"
namespace_filter = ""

[dependencies]
"Zend/Form.php" = ["Zend/Form/Element", "Zend/Validate.php"]
"#,
        )
        .unwrap();

        let mut config = Config::default();
        config.apply_file(ConfigFile::read(&file).unwrap()).unwrap();
        assert_eq!(config.local_root, PathBuf::from("/opt/lib"));
        assert_eq!(config.transport, TransportStrategy::Http);
        assert_eq!(config.hook_priority, HookPriority::Append);
        assert_eq!(config.namespace_filter, None);
        assert_eq!(config.source_version, DEFAULT_SOURCE_VERSION);

        let table = config.dependency_table().unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(table.get(&path("Zend/Form.php")).len(), 2);
    }

    #[test]
    fn unknown_config_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("config.toml");
        std::fs::write(&file, "libraryPath = \"/x\"\n").unwrap();
        assert!(matches!(ConfigFile::read(&file), Err(OdmError::Toml(_))));
    }

    #[test]
    fn include_directive_with_slash_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("config.toml");
        std::fs::write(&file, "include_directive = \"/\"\n").unwrap();

        let mut config = Config::default();
        let err = config.apply_file(ConfigFile::read(&file).unwrap()).unwrap_err();
        assert!(matches!(err, OdmError::Config(_)));
        assert_eq!(config.include_directive, DEFAULT_INCLUDE_DIRECTIVE);

        assert!(validate_include_directive("include_once").is_ok());
        assert!(validate_include_directive("//require").is_err());
    }
}
