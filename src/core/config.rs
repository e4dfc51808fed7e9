use config::Config;
use serde::Deserialize;

use crate::core::error::ConfigError;

pub(crate) const DEFAULT_SECRET: &str = "secret";
const DEFAULT_API_KEY: &str = "api_key";
const DEFAULT_API_URL: &str = "http://localhost:8000";

#[derive(Debug, Deserialize, Clone)]
pub(crate) struct Args {
    pub(crate) secret: String,
    pub(crate) api_url: String,
    pub(crate) api_key: String,
    pub(crate) development: bool,
    pub(crate) log_level: String,
    pub(crate) port: u16,
}

impl Args {
    /// Reads an optional `garage.toml` from the working directory, then
    /// `GARAGE_*` environment variables. Anything unset falls back to a default.
    pub(crate) fn load() -> Result<Self, ConfigError> {
        Self::from_sources(
            config::File::with_name("garage").required(false),
            config::Environment::with_prefix("GARAGE").try_parsing(true),
        )
    }

    fn from_sources<F, E>(file: F, environment: E) -> Result<Self, ConfigError>
    where
        F: config::Source + Send + Sync + 'static,
        E: config::Source + Send + Sync + 'static,
    {
        let config = Config::builder()
            .set_default("secret", DEFAULT_SECRET)?
            .set_default("api_url", DEFAULT_API_URL)?
            .set_default("api_key", DEFAULT_API_KEY)?
            .set_default("development", false)?
            .set_default("log_level", "info")?
            .set_default("port", 3000)?
            .add_source(file)
            .add_source(environment)
            .build()?;

        Ok(config.try_deserialize::<Args>()?)
    }

    pub(crate) fn uses_default_secret(&self) -> bool {
        self.secret == DEFAULT_SECRET
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn environment(vars: &[(&str, &str)]) -> config::Environment {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        config::Environment::with_prefix("GARAGE")
            .try_parsing(true)
            .source(Some(source))
    }

    fn file(contents: &str) -> config::File<config::FileSourceString, config::FileFormat> {
        config::File::from_str(contents, config::FileFormat::Toml)
    }

    #[test]
    fn test_defaults() {
        let args = Args::from_sources(file(""), environment(&[])).unwrap();

        assert_eq!(args.secret, "secret");
        assert_eq!(args.api_key, "api_key");
        assert_eq!(args.api_url, "http://localhost:8000");
        assert!(!args.development);
        assert_eq!(args.port, 3000);
        assert!(args.uses_default_secret());
    }

    #[test]
    fn test_environment_overrides() {
        let args = Args::from_sources(
            file(""),
            environment(&[
                ("GARAGE_SECRET", "hunter2"),
                ("GARAGE_DEVELOPMENT", "true"),
                ("GARAGE_PORT", "8080"),
                ("GARAGE_API_URL", "https://api.garage.test"),
            ]),
        )
        .unwrap();

        assert_eq!(args.secret, "hunter2");
        assert!(args.development);
        assert_eq!(args.port, 8080);
        assert_eq!(args.api_url, "https://api.garage.test");
        assert!(!args.uses_default_secret());
    }

    #[test]
    fn test_environment_wins_over_file() {
        let args = Args::from_sources(
            file("secret = \"from-file\"\nlog_level = \"debug\"\nport = 4000\n"),
            environment(&[("GARAGE_PORT", "5000")]),
        )
        .unwrap();

        assert_eq!(args.secret, "from-file");
        assert_eq!(args.log_level, "debug");
        assert_eq!(args.port, 5000);
    }
}
