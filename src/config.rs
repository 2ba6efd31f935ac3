use crate::error::PredictError;
use crate::predictor::DEFAULT_TOP_K;
use config::{ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

pub const MODEL_FILE: &str = "decision_tree_model_optimized.json";
const CONFIG_FILE: &str = "jurusan";
const ENV_PREFIX: &str = "JURUSAN";
pub const DEFAULT_LOG_FILTER: &str = "jurusan_predict=warn";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Overrides the artifact location next to the installed binary.
    #[serde(default)]
    pub model_path: Option<PathBuf>,
    pub top_k: usize,
    pub log_filter: String,
}

impl Config {
    /// Defaults, then `jurusan.toml` beside the binary if present, then
    /// `JURUSAN_*` variables. The working directory is never consulted.
    pub fn load() -> Result<Self, PredictError> {
        Self::from_sources(&install_dir()?, Environment::with_prefix(ENV_PREFIX))
    }

    fn from_sources(config_dir: &Path, environment: Environment) -> Result<Self, PredictError> {
        let settings = config::Config::builder()
            .set_default("top_k", DEFAULT_TOP_K as i64)?
            .set_default("log_filter", DEFAULT_LOG_FILTER)?
            .add_source(File::from(config_dir.join(CONFIG_FILE).as_path()).required(false))
            .add_source(environment.try_parsing(true))
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_overrides(mut self, model_path: Option<PathBuf>, top_k: Option<usize>) -> Result<Self, PredictError> {
        if model_path.is_some() {
            self.model_path = model_path;
        }
        if let Some(k) = top_k {
            self.top_k = k;
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), PredictError> {
        if self.top_k == 0 {
            return Err(ConfigError::Message("top_k must be at least 1".to_string()).into());
        }
        Ok(())
    }

    /// Explicit path if configured, else `<exe dir>/../model/<MODEL_FILE>`.
    pub fn model_path(&self) -> Result<PathBuf, PredictError> {
        if let Some(path) = &self.model_path {
            return Ok(path.clone());
        }
        Ok(install_dir()?.join("..").join("model").join(MODEL_FILE))
    }
}

fn install_dir() -> Result<PathBuf, PredictError> {
    let exe = env::current_exe()?;
    Ok(exe.parent().map(PathBuf::from).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env_source(vars: &[(&str, &str)]) -> Environment {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix(ENV_PREFIX).source(Some(vars))
    }

    fn from_env(vars: &[(&str, &str)]) -> Result<Config, PredictError> {
        let empty = tempfile::tempdir().unwrap();
        Config::from_sources(empty.path(), env_source(vars))
    }

    fn install_with(contents: &str) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("jurusan.toml"), contents).unwrap();
        dir
    }

    #[test]
    fn test_defaults() {
        let config = from_env(&[]).unwrap();
        assert_eq!(config.top_k, 3);
        assert_eq!(config.log_filter, "jurusan_predict=warn");
        assert!(config.model_path.is_none());
    }

    #[test]
    fn test_environment_overrides_defaults() {
        let config = from_env(&[
            ("JURUSAN_TOP_K", "5"),
            ("JURUSAN_MODEL_PATH", "/srv/model/tree.json"),
        ])
        .unwrap();
        assert_eq!(config.top_k, 5);
        assert_eq!(config.model_path, Some(PathBuf::from("/srv/model/tree.json")));
        assert_eq!(config.model_path().unwrap(), PathBuf::from("/srv/model/tree.json"));
    }

    #[test]
    fn test_zero_top_k_is_rejected() {
        let err = from_env(&[("JURUSAN_TOP_K", "0")]).unwrap_err();
        assert!(matches!(err, PredictError::Config(_)));
    }

    #[test]
    fn test_cli_overrides_win() {
        let config = from_env(&[("JURUSAN_TOP_K", "5")])
            .unwrap()
            .with_overrides(Some(PathBuf::from("tree.json")), Some(2))
            .unwrap();
        assert_eq!(config.top_k, 2);
        assert_eq!(config.model_path, Some(PathBuf::from("tree.json")));
    }

    #[test]
    fn test_default_model_path_is_beside_install() {
        let config = from_env(&[]).unwrap();
        let path = config.model_path().unwrap();
        assert!(path.ends_with("../model/decision_tree_model_optimized.json"));
        let exe_dir = env::current_exe().unwrap().parent().unwrap().to_path_buf();
        assert!(path.starts_with(exe_dir));
    }

    #[test]
    fn test_file_beside_binary_is_read() {
        let dir = install_with("top_k = 4\nmodel_path = \"/srv/model/tree.json\"\n");
        let config = Config::from_sources(dir.path(), env_source(&[])).unwrap();
        assert_eq!(config.top_k, 4);
        assert_eq!(config.model_path, Some(PathBuf::from("/srv/model/tree.json")));
    }

    #[test]
    fn test_environment_overrides_file() {
        let dir = install_with("top_k = 4\n");
        let config = Config::from_sources(dir.path(), env_source(&[("JURUSAN_TOP_K", "6")])).unwrap();
        assert_eq!(config.top_k, 6);
    }

    #[test]
    fn test_file_outside_config_dir_is_ignored() {
        let _elsewhere = install_with("top_k = 4\n");
        let config = from_env(&[]).unwrap();
        assert_eq!(config.top_k, 3);
        assert!(config.model_path.is_none());
    }
}
