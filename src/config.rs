use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

const PREFIX: &str = "MOVIEFLIX_";

/// Process configuration, read from `MOVIEFLIX_*` environment variables.
#[derive(Clone, Deserialize)]
pub struct Config {
    /// HMAC secret for session tokens.
    pub secret: String,
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Uses a temporary database when unset.
    #[serde(default)]
    pub database_path: Option<PathBuf>,
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_owned()
}

fn default_bcrypt_cost() -> u32 {
    bcrypt::DEFAULT_COST
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("secret", &"<redacted>")
            .field("bind", &self.bind)
            .field("database_path", &self.database_path)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, envy::Error> {
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::prefixed(PREFIX).from_iter(vars)
    }

    pub fn open_database(&self) -> sled::Result<sled::Db> {
        match &self.database_path {
            Some(path) => sled::Config::new().path(path).open(),
            None => sled::Config::new().temporary(true).open(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_apply() {
        let config = Config::from_vars(vars(&[("MOVIEFLIX_SECRET", "s3cret")])).unwrap();
        assert_eq!(config.secret, "s3cret");
        assert_eq!(config.bind, "127.0.0.1:8080");
        assert_eq!(config.database_path, None);
        assert_eq!(config.bcrypt_cost, bcrypt::DEFAULT_COST);
    }

    #[test]
    fn overrides_are_read() {
        let config = Config::from_vars(vars(&[
            ("MOVIEFLIX_SECRET", "s3cret"),
            ("MOVIEFLIX_BIND", "0.0.0.0:9000"),
            ("MOVIEFLIX_DATABASE_PATH", "/tmp/movieflix"),
            ("MOVIEFLIX_BCRYPT_COST", "4"),
            ("UNRELATED", "ignored"),
        ]))
        .unwrap();
        assert_eq!(config.bind, "0.0.0.0:9000");
        assert_eq!(config.database_path, Some(PathBuf::from("/tmp/movieflix")));
        assert_eq!(config.bcrypt_cost, 4);
    }

    #[test]
    fn secret_is_required() {
        assert!(Config::from_vars(vars(&[("MOVIEFLIX_BIND", "0.0.0.0:9000")])).is_err());
    }

    #[test]
    fn debug_output_hides_the_secret() {
        let config = Config::from_vars(vars(&[("MOVIEFLIX_SECRET", "s3cret")])).unwrap();
        let printed = format!("{:?}", config);
        assert!(!printed.contains("s3cret"), "{}", printed);
        assert!(printed.contains("<redacted>"));
        assert!(printed.contains("127.0.0.1:8080"));
    }
}
