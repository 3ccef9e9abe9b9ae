//! Layered configuration loading with figment.
//!
//! Layers, lowest priority first:
//!
//! 1. [`HeraldConfig::default`]
//! 2. `herald.{profile}.toml` (or `.yaml` / `.yml`)
//! 3. `herald.toml` (or `.yaml` / `.yml`)
//! 4. `HERALD_*` environment variables, `__` separating sections
//! 5. Overrides passed to [`ConfigLoader::merge`], in call order
//!
//! Only the first directory that holds a `herald.*` file contributes files.
//! An explicit [`ConfigLoader::file`] replaces layers 2 and 3.
//!
//! ```text
//! HERALD_DISPATCH__DELIMITER=?          dispatch.delimiter = "?"
//! HERALD_DISPATCH__ADMINS=[alice,bob]   dispatch.admins = ["alice", "bob"]
//! HERALD_LOGGING__LEVEL=debug           logging.level = "debug"
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Serialized};
#[cfg(any(feature = "toml-config", feature = "yaml-config"))]
use figment::providers::Format;
use tracing::{debug, info, warn};

use super::error::{ConfigError, ConfigResult};
use super::schema::HeraldConfig;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "HERALD_";

/// Environment variable selecting the [`ConfigProfile`].
pub const PROFILE_ENV: &str = "HERALD_PROFILE";

const FILE_STEM: &str = "herald";

/// Names the optional `herald.{profile}.*` layer.
///
/// `dev` and `prod` are accepted for `development` and `production`; any
/// other name is used as given, lowercased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigProfile(String);

impl ConfigProfile {
    pub const DEVELOPMENT: &'static str = "development";
    pub const PRODUCTION: &'static str = "production";

    pub fn new(name: &str) -> Self {
        let name = name.trim().to_lowercase();
        Self(match name.as_str() {
            "dev" => Self::DEVELOPMENT.to_string(),
            "prod" => Self::PRODUCTION.to_string(),
            _ => name,
        })
    }

    /// Reads [`PROFILE_ENV`], falling back to development.
    pub fn from_env() -> Self {
        std::env::var(PROFILE_ENV)
            .map(|name| Self::new(&name))
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ConfigProfile {
    fn default() -> Self {
        Self(Self::DEVELOPMENT.to_string())
    }
}

impl fmt::Display for ConfigProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// File formats compiled into this build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    #[cfg(feature = "toml-config")]
    Toml,
    #[cfg(feature = "yaml-config")]
    Yaml,
}

impl FileFormat {
    const ENABLED: &'static [FileFormat] = &[
        #[cfg(feature = "toml-config")]
        FileFormat::Toml,
        #[cfg(feature = "yaml-config")]
        FileFormat::Yaml,
    ];

    fn extensions(self) -> &'static [&'static str] {
        match self {
            #[cfg(feature = "toml-config")]
            Self::Toml => &["toml"],
            #[cfg(feature = "yaml-config")]
            Self::Yaml => &["yaml", "yml"],
        }
    }

    fn for_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        Self::ENABLED
            .iter()
            .copied()
            .find(|format| format.extensions().contains(&ext))
    }

    fn layer(self, figment: Figment, path: &Path) -> Figment {
        match self {
            #[cfg(feature = "toml-config")]
            Self::Toml => figment.merge(figment::providers::Toml::file(path)),
            #[cfg(feature = "yaml-config")]
            Self::Yaml => figment.merge(figment::providers::Yaml::file(path)),
        }
    }
}

/// One layer of the final configuration, as reported by
/// [`ConfigLoader::sources`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Defaults,
    File(PathBuf),
    Environment,
    Override,
}

/// Builds a [`HeraldConfig`] from defaults, files, environment and overrides.
#[derive(Debug)]
pub struct ConfigLoader {
    profile: ConfigProfile,
    search_paths: Vec<PathBuf>,
    explicit_file: Option<PathBuf>,
    read_env: bool,
    overrides: Vec<HeraldConfig>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Creates a loader for the profile named by `HERALD_PROFILE`.
    pub fn new() -> Self {
        Self {
            profile: ConfigProfile::from_env(),
            search_paths: Vec::new(),
            explicit_file: None,
            read_env: true,
            overrides: Vec::new(),
        }
    }

    pub fn profile(mut self, name: impl AsRef<str>) -> Self {
        self.profile = ConfigProfile::new(name.as_ref());
        self
    }

    /// Adds a directory to look for `herald.*` files in.
    ///
    /// Without any, the current directory and `<user config dir>/herald`
    /// are searched.
    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.search_paths.push(path.as_ref().to_path_buf());
        self
    }

    pub fn with_current_dir(self) -> Self {
        match std::env::current_dir() {
            Ok(cwd) => self.search_path(cwd),
            Err(_) => self,
        }
    }

    pub fn with_user_config_dir(self) -> Self {
        match dirs::config_dir() {
            Some(dir) => self.search_path(dir.join(FILE_STEM)),
            None => self,
        }
    }

    /// Reads exactly this file instead of searching.
    pub fn file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.explicit_file = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn with_env(mut self) -> Self {
        self.read_env = true;
        self
    }

    pub fn without_env(mut self) -> Self {
        self.read_env = false;
        self
    }

    /// Layers `config` over every other source.
    pub fn merge(mut self, config: HeraldConfig) -> Self {
        self.overrides.push(config);
        self
    }

    /// Lists the layers [`load`](Self::load) would merge, lowest first.
    pub fn sources(&self) -> ConfigResult<Vec<ConfigSource>> {
        let mut sources = vec![ConfigSource::Defaults];
        sources.extend(self.files()?.into_iter().map(ConfigSource::File));
        if self.read_env {
            sources.push(ConfigSource::Environment);
        }
        sources.extend(self.overrides.iter().map(|_| ConfigSource::Override));
        Ok(sources)
    }

    /// Merges every layer and extracts the result.
    ///
    /// The result is not validated; see
    /// [`validate_config`](super::validate_config).
    pub fn load(self) -> ConfigResult<HeraldConfig> {
        let mut figment = Figment::from(Serialized::defaults(HeraldConfig::default()));

        for path in self.files()? {
            let format = FileFormat::for_path(&path)
                .ok_or_else(|| ConfigError::UnsupportedFormat(path.clone()))?;
            info!(path = %path.display(), "Loading configuration file");
            figment = format.layer(figment, &path);
        }

        if self.read_env {
            figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
        }

        for overrides in &self.overrides {
            figment = figment.merge(Serialized::defaults(overrides));
        }

        let config: HeraldConfig = figment
            .extract()
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        debug!(
            profile = %self.profile,
            delimiter = %config.dispatch.delimiter,
            admins = config.dispatch.admins.len(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Files to merge, lowest priority first.
    fn files(&self) -> ConfigResult<Vec<PathBuf>> {
        if let Some(path) = &self.explicit_file {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.clone()));
            }
            return Ok(vec![path.clone()]);
        }

        for dir in self.directories() {
            let found = self.files_in(&dir);
            if !found.is_empty() {
                return Ok(found);
            }
        }

        warn!("No configuration file found, using defaults");
        Ok(Vec::new())
    }

    /// The profile file then the base file in `dir`, first extension wins.
    fn files_in(&self, dir: &Path) -> Vec<PathBuf> {
        let exts = FileFormat::ENABLED
            .iter()
            .flat_map(|format| format.extensions().iter().copied());

        let pick = |stem: &str| {
            exts.clone()
                .map(|ext| dir.join(format!("{stem}.{ext}")))
                .find(|path| path.is_file())
        };

        let profile_stem = format!("{FILE_STEM}.{}", self.profile);
        [pick(&profile_stem), pick(FILE_STEM)]
            .into_iter()
            .flatten()
            .collect()
    }

    fn directories(&self) -> Vec<PathBuf> {
        if !self.search_paths.is_empty() {
            return self.search_paths.clone();
        }
        std::env::current_dir()
            .ok()
            .into_iter()
            .chain(dirs::config_dir().map(|dir| dir.join(FILE_STEM)))
            .collect()
    }
}

/// Loads configuration from the default locations.
pub fn load_config() -> ConfigResult<HeraldConfig> {
    ConfigLoader::new().load()
}

/// Loads configuration from one file plus environment variables.
pub fn load_config_from_file<P: AsRef<Path>>(path: P) -> ConfigResult<HeraldConfig> {
    ConfigLoader::new().file(path).load()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::LogLevel;
    use figment::Jail;

    #[test]
    fn test_defaults_without_files() {
        Jail::expect_with(|jail| {
            let loader = ConfigLoader::new()
                .search_path(jail.directory())
                .without_env();
            assert_eq!(loader.sources().unwrap(), vec![ConfigSource::Defaults]);

            let config = loader.load().map_err(|e| e.to_string())?;
            assert_eq!(config, HeraldConfig::default());
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "herald.toml",
                r#"
                [dispatch]
                delimiter = "?"
                admins = ["1", "2"]
                suggest_threshold = 250

                [logging]
                level = "debug"
                "#,
            )?;
            jail.set_env("HERALD_DISPATCH__SUGGEST_THRESHOLD", "300");

            let config = ConfigLoader::new()
                .search_path(jail.directory())
                .load()
                .map_err(|e| e.to_string())?;

            assert_eq!(config.dispatch.delimiter, "?");
            assert_eq!(config.dispatch.admins, vec!["1", "2"]);
            assert_eq!(config.dispatch.suggest_threshold, 300);
            assert_eq!(config.logging.level, LogLevel::Debug);
            Ok(())
        });
    }

    #[test]
    fn test_base_file_overrides_profile_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "herald.production.toml",
                "[dispatch]\ndelimiter = \"#\"\nstrict_arity = true\n",
            )?;
            jail.create_file("herald.toml", "[dispatch]\ndelimiter = \"?\"\n")?;

            let loader = ConfigLoader::new()
                .profile("prod")
                .search_path(jail.directory())
                .without_env();
            assert_eq!(
                loader.sources().unwrap(),
                vec![
                    ConfigSource::Defaults,
                    ConfigSource::File(jail.directory().join("herald.production.toml")),
                    ConfigSource::File(jail.directory().join("herald.toml")),
                ]
            );

            let config = loader.load().map_err(|e| e.to_string())?;
            assert_eq!(config.dispatch.delimiter, "?");
            assert!(config.dispatch.strict_arity);
            Ok(())
        });
    }

    #[test]
    fn test_override_beats_env() {
        Jail::expect_with(|jail| {
            jail.create_file("herald.toml", "[dispatch]\ndelimiter = \"?\"\n")?;
            jail.set_env("HERALD_DISPATCH__DELIMITER", "::");

            let mut overrides = HeraldConfig::default();
            overrides.dispatch.delimiter = "~".into();

            let config = ConfigLoader::new()
                .search_path(jail.directory())
                .merge(overrides)
                .load()
                .map_err(|e| e.to_string())?;

            assert_eq!(config.dispatch.delimiter, "~");
            Ok(())
        });
    }

    #[test]
    fn test_missing_explicit_file() {
        let result = ConfigLoader::new()
            .file("/nonexistent/herald.toml")
            .without_env()
            .load();
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_explicit_file_with_unknown_extension() {
        Jail::expect_with(|jail| {
            jail.create_file("herald.ini", "delimiter = ?")?;

            let result = ConfigLoader::new()
                .file(jail.directory().join("herald.ini"))
                .without_env()
                .load();
            assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
            Ok(())
        });
    }

    #[test]
    fn test_profile_names() {
        assert_eq!(ConfigProfile::new("PROD").as_str(), "production");
        assert_eq!(ConfigProfile::new("dev"), ConfigProfile::default());
        assert_eq!(ConfigProfile::new(" Staging ").as_str(), "staging");
    }
}
