use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::error::ConfigError;
use crate::config::lister::{FileLister, RecursiveFileLister};

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// JSON format (.json)
    Json,
    /// YAML format (.yaml, .yml) - requires "yaml-config" feature
    #[cfg(feature = "yaml-config")]
    Yaml,
    /// TOML format (.toml) - requires "toml-config" feature
    #[cfg(feature = "toml-config")]
    Toml,
}

impl ConfigFormat {
    const ALL: &'static [ConfigFormat] = &[
        ConfigFormat::Json,
        #[cfg(feature = "yaml-config")]
        ConfigFormat::Yaml,
        #[cfg(feature = "toml-config")]
        ConfigFormat::Toml,
    ];

    /// File extensions recognised for this format
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            ConfigFormat::Json => &["json"],
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => &["yaml", "yml"],
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => &["toml"],
        }
    }

    /// Split `<namespace>.config.<ext>` into the namespace and its format.
    ///
    /// Returns `None` for file names outside the convention.
    pub fn split_namespace(file_name: &str) -> Option<(String, ConfigFormat)> {
        for format in Self::ALL {
            for ext in format.extensions() {
                let suffix = format!(".config.{ext}");
                if let Some(stem) = file_name.strip_suffix(suffix.as_str()) {
                    if !stem.is_empty() {
                        return Some((stem.to_string(), *format));
                    }
                }
            }
        }
        None
    }

    /// Parse raw file contents into the uniform value tree.
    pub fn parse(&self, raw: &str) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        match self {
            ConfigFormat::Json => serde_json::from_str(raw).map_err(Into::into),
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::from_str(raw).map_err(Into::into),
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::from_str(raw).map_err(Into::into),
        }
    }
}

/// Load lifecycle of a [`ConfigLoader`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    /// `load` has not been called yet
    #[default]
    Unloaded,
    /// A load is in flight
    Loading,
    /// Every discovered file parsed; the namespace map is committed
    Loaded,
    /// The last load aborted; no partial map was committed
    Failed,
}

/// Loader for the application's configuration namespaces.
///
/// One namespace is created per `<namespace>.config.<ext>` file found under
/// the configuration directory. The namespace map is write-once per
/// successful [`load`](ConfigLoader::load) and read-many afterwards.
pub struct ConfigLoader {
    /// The location of the configuration files
    config_dir: PathBuf,
    lister: Arc<dyn FileLister>,
    namespaces: HashMap<String, Value>,
    state: LoadState,
}

impl ConfigLoader {
    /// Create a loader over `config_dir` using the local filesystem.
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self::with_lister(config_dir, Arc::new(RecursiveFileLister))
    }

    /// Create a loader with a custom [`FileLister`].
    pub fn with_lister(config_dir: impl Into<PathBuf>, lister: Arc<dyn FileLister>) -> Self {
        Self {
            config_dir: config_dir.into(),
            lister,
            namespaces: HashMap::new(),
            state: LoadState::Unloaded,
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    /// Whether the loader is done loading
    pub fn is_loaded(&self) -> bool {
        self.state == LoadState::Loaded
    }

    /// Names of the committed namespaces.
    pub fn namespaces(&self) -> Vec<&str> {
        self.namespaces.keys().map(String::as_str).collect()
    }

    /// Load the configuration files.
    ///
    /// Fail-fast: the first file that cannot be listed, read or parsed
    /// aborts the load, the state becomes [`LoadState::Failed`] and the
    /// previously committed map (if any) is left untouched.
    pub async fn load(&mut self) -> Result<(), ConfigError> {
        self.state = LoadState::Loading;
        log::info!("Loading configuration from '{}'", self.config_dir.display());

        match self.read_namespaces().await {
            Ok(namespaces) => {
                log::info!("Loaded {} config namespaces", namespaces.len());
                self.namespaces = namespaces;
                self.state = LoadState::Loaded;
                Ok(())
            }
            Err(err) => {
                log::error!("Configuration load failed: {err}");
                self.state = LoadState::Failed;
                Err(err)
            }
        }
    }

    async fn read_namespaces(&self) -> Result<HashMap<String, Value>, ConfigError> {
        let entries = self
            .lister
            .list(&self.config_dir, None)
            .await
            .map_err(|source| ConfigError::Discovery {
                path: self.config_dir.clone(),
                source,
            })?;

        let mut namespaces = HashMap::new();
        for entry in entries {
            let Some((namespace, format)) = ConfigFormat::split_namespace(&entry.file_name) else {
                // A `.config.` file with an unrecognised extension is a
                // misconfiguration, not something to skip silently.
                if entry.file_name.contains(".config.") {
                    return Err(ConfigError::UnsupportedFormat(entry.file_path));
                }
                continue;
            };

            let raw = tokio::fs::read_to_string(&entry.file_path)
                .await
                .map_err(|err| ConfigError::Parse {
                    path: entry.file_path.clone(),
                    source: Box::new(err),
                })?;
            let value = format.parse(&raw).map_err(|source| ConfigError::Parse {
                path: entry.file_path.clone(),
                source,
            })?;

            log::debug!(
                "Read config namespace '{namespace}' from '{}'",
                entry.file_path.display()
            );
            if namespaces.insert(namespace.clone(), value).is_some() {
                return Err(ConfigError::DuplicateNamespace {
                    namespace,
                    path: entry.file_path,
                });
            }
        }
        Ok(namespaces)
    }

    /// Resolve a dotted path against the loaded namespaces.
    ///
    /// The first segment selects a namespace; the remaining segments walk
    /// the value tree. Object segments must name an existing key, array
    /// segments must parse as an in-range index, and reaching a scalar
    /// before the path is consumed is an error. The value at the end of the
    /// path is returned unchanged, subtrees included.
    pub fn get(&self, path: &str) -> Result<&Value, ConfigError> {
        let mut segments = path.split('.');
        let namespace = segments.next().unwrap_or_default();
        let mut cursor = self
            .namespaces
            .get(namespace)
            .ok_or_else(|| ConfigError::UnknownNamespace(namespace.to_string()))?;

        for segment in segments {
            cursor = match cursor {
                Value::Object(fields) => fields.get(segment).ok_or_else(|| {
                    Self::not_followable(path, segment, format!("object has no key '{segment}'"))
                })?,
                Value::Array(items) => {
                    let index: usize = segment.parse().map_err(|_| {
                        Self::not_followable(
                            path,
                            segment,
                            "array index must be an integer".to_string(),
                        )
                    })?;
                    items.get(index).ok_or_else(|| {
                        Self::not_followable(
                            path,
                            segment,
                            format!("array index {index} out of range (length {})", items.len()),
                        )
                    })?
                }
                _ => {
                    return Err(Self::not_followable(
                        path,
                        segment,
                        "scalar value reached before the path was consumed".to_string(),
                    ));
                }
            };
        }
        Ok(cursor)
    }

    /// Typed lookup: [`get`](ConfigLoader::get) followed by deserialization
    /// of the subtree.
    pub fn get_as<T: DeserializeOwned>(&self, path: &str) -> Result<T, ConfigError> {
        let value = self.get(path)?;
        serde_json::from_value(value.clone()).map_err(|source| ConfigError::TypeMismatch {
            path: path.to_string(),
            source,
        })
    }

    fn not_followable(path: &str, segment: &str, reason: String) -> ConfigError {
        ConfigError::PathNotFollowable {
            path: path.to_string(),
            segment: segment.to_string(),
            reason,
        }
    }
}
