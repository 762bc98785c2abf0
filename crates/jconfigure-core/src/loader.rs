//! Discovery of configuration files by basename and profile.
//!
//! The loader reads the defaults basename from every configured directory,
//! then each active profile in order, and deep-merges every file it finds
//! into one tree. Within a basename, directories are visited in the order
//! given; within a directory, extensions in [`SUPPORTED_FILE_EXTENSIONS`]
//! order. All matching files are loaded, not just the first.

use crate::error::{Cause, ConfigError, Result};
use crate::evaluate::evaluate_file;
use crate::format::SUPPORTED_FILE_EXTENSIONS;
use crate::merge::merge;
use crate::tags::{BUILTIN_TAGS, TagRegistry};
use crate::value::ConfigValue;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Comma separated list of configuration directories.
pub const CONFIG_DIRECTORIES_ENV: &str = "JCONFIGURE_CONFIG_DIRECTORIES";

/// Comma separated list of active profiles.
pub const ACTIVE_PROFILES_ENV: &str = "JCONFIGURE_ACTIVE_PROFILES";

pub const DEFAULT_DEFAULTS_BASENAME: &str = "defaults";

/// Settings for one [`ConfigLoader::load`] call.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Directories searched for every basename, in merge order.
    pub config_dirs: Vec<PathBuf>,

    /// Basename loaded before any profile.
    pub defaults_basename: String,

    /// Profiles loaded after the defaults, in merge order.
    pub active_profiles: Vec<String>,

    /// When false, a file that fails to evaluate is logged and skipped.
    pub fail_on_parse_error: bool,

    /// When true, a basename found in no directory aborts the load.
    pub fail_on_missing_files: bool,

    /// Values visible to `!ContextValue` in every loaded file.
    pub bindings: IndexMap<String, ConfigValue>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            config_dirs: vec![default_config_dir()],
            defaults_basename: DEFAULT_DEFAULTS_BASENAME.to_string(),
            active_profiles: Vec::new(),
            fail_on_parse_error: true,
            fail_on_missing_files: false,
            bindings: IndexMap::new(),
        }
    }
}

impl LoadOptions {
    /// Options with directories and profiles taken from
    /// `JCONFIGURE_CONFIG_DIRECTORIES` and `JCONFIGURE_ACTIVE_PROFILES`.
    ///
    /// Without `JCONFIGURE_CONFIG_DIRECTORIES` the `config` directory under
    /// the working directory is searched.
    pub fn from_env() -> Self {
        let mut options = Self::default();
        if let Ok(dirs) = std::env::var(CONFIG_DIRECTORIES_ENV) {
            options.config_dirs = split_list(&dirs).into_iter().map(PathBuf::from).collect();
        }
        if let Ok(profiles) = std::env::var(ACTIVE_PROFILES_ENV) {
            options.active_profiles = split_list(&profiles);
        }
        options
    }

    pub fn with_config_dirs<P: Into<PathBuf>>(mut self, dirs: impl IntoIterator<Item = P>) -> Self {
        self.config_dirs = dirs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_defaults_basename(mut self, basename: impl Into<String>) -> Self {
        self.defaults_basename = basename.into();
        self
    }

    pub fn with_active_profiles<S: Into<String>>(
        mut self,
        profiles: impl IntoIterator<Item = S>,
    ) -> Self {
        self.active_profiles = profiles.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_fail_on_parse_error(mut self, fail: bool) -> Self {
        self.fail_on_parse_error = fail;
        self
    }

    pub fn with_fail_on_missing_files(mut self, fail: bool) -> Self {
        self.fail_on_missing_files = fail;
        self
    }

    pub fn with_bindings(mut self, bindings: IndexMap<String, ConfigValue>) -> Self {
        self.bindings = bindings;
        self
    }

    pub fn with_binding(mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.bindings.insert(key.into(), value.into());
        self
    }
}

fn default_config_dir() -> PathBuf {
    std::env::current_dir().map_or_else(|_| PathBuf::from("config"), |cwd| cwd.join("config"))
}

/// Split a comma separated list, trimming entries and dropping empty ones.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// Files for `basename` in `dir`, in extension order.
pub fn find_config_files(dir: &Path, basename: &str) -> Vec<PathBuf> {
    SUPPORTED_FILE_EXTENSIONS
        .iter()
        .map(|extension| dir.join(format!("{basename}.{extension}")))
        .filter(|path| path.is_file())
        .collect()
}

/// Loads and merges configuration files according to [`LoadOptions`].
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    options: LoadOptions,
    registry: TagRegistry,
}

impl ConfigLoader {
    pub fn new(options: LoadOptions) -> Self {
        Self {
            options,
            registry: BUILTIN_TAGS.clone(),
        }
    }

    /// Use a different tag vocabulary for every loaded file.
    pub fn with_registry(mut self, registry: TagRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// Load the defaults, then every active profile.
    pub fn load(&self) -> Result<ConfigValue> {
        let dirs: Vec<String> = self
            .options
            .config_dirs
            .iter()
            .map(|dir| dir.display().to_string())
            .collect();
        info!(dirs = ?dirs, "Configuring application from config directories");
        info!(profiles = ?self.options.active_profiles, "Active profiles");

        let mut config = ConfigValue::empty_map();

        debug!("Searching for defaults config files");
        self.load_basenames(&mut config, std::slice::from_ref(&self.options.defaults_basename))?;

        debug!("Searching for active profile config files");
        self.load_basenames(&mut config, &self.options.active_profiles)?;

        Ok(config)
    }

    fn load_basenames(&self, config: &mut ConfigValue, basenames: &[String]) -> Result<()> {
        let mut missing = Vec::new();

        for basename in basenames {
            let mut found = false;
            for dir in &self.options.config_dirs {
                let files = find_config_files(dir, basename);
                if files.is_empty() {
                    debug!(basename = %basename, dir = %dir.display(), "No config files found");
                    continue;
                }
                found = true;

                for file in files {
                    let overrides = self.load_file(&file)?;
                    *config = merge(std::mem::take(config), overrides);
                }
            }
            if !found {
                missing.push(basename);
            }
        }

        match missing.first() {
            Some(basename) if self.options.fail_on_missing_files => {
                error!(
                    basename = %basename,
                    "No files found in any directory and fail_on_missing_files is set"
                );
                Err(ConfigError::FilesNotFound {
                    basename: basename.to_string(),
                })
            }
            _ => Ok(()),
        }
    }

    /// Evaluate one file into a mapping.
    ///
    /// An empty document yields an empty mapping. When `fail_on_parse_error`
    /// is off, a failing file is logged and yields an empty mapping too.
    pub fn load_file(&self, path: &Path) -> Result<ConfigValue> {
        debug!(path = %path.display(), "Parsing file and merging with config");
        match self.evaluate_mapping(path) {
            Ok(value) => Ok(value),
            Err(e) if self.options.fail_on_parse_error => {
                error!(path = %path.display(), error = %e, "Failed to parse config file");
                Err(e)
            }
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to parse config file, fail_on_parse_error is not set, continuing"
                );
                Ok(ConfigValue::empty_map())
            }
        }
    }

    fn evaluate_mapping(&self, path: &Path) -> Result<ConfigValue> {
        match evaluate_file(path, self.options.bindings.clone(), &self.registry)? {
            value @ ConfigValue::Map(_) => Ok(value),
            ConfigValue::Null => Ok(ConfigValue::empty_map()),
            other => Err(ConfigError::FileParsing {
                path: path.to_path_buf(),
                cause: Cause::NotAMapping(other.kind_name()),
            }),
        }
    }
}

/// Load configuration with the built-in tags.
pub fn load(options: LoadOptions) -> Result<ConfigValue> {
    ConfigLoader::new(options).load()
}
