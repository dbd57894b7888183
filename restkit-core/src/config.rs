use std::collections::HashMap;
use std::path::Path;

/// Error type for configuration operations.
#[derive(Debug)]
pub enum ConfigError {
    /// The requested key was not found in the configuration.
    NotFound(String),
    /// The value could not be converted to the requested type.
    TypeMismatch { key: String, expected: &'static str },
    /// An I/O or YAML parsing error occurred while loading config files.
    Load(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NotFound(key) => write!(f, "Config key not found: {key}"),
            ConfigError::TypeMismatch { key, expected } => {
                write!(f, "Config type mismatch for '{key}': expected {expected}")
            }
            ConfigError::Load(msg) => write!(f, "Config load error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// A single scalar configuration value.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl ConfigValue {
    fn from_yaml(value: &serde_yaml::Value) -> Self {
        match value {
            serde_yaml::Value::Bool(b) => ConfigValue::Bool(*b),
            serde_yaml::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    ConfigValue::Integer(i)
                } else {
                    ConfigValue::Float(n.as_f64().unwrap_or(0.0))
                }
            }
            serde_yaml::Value::String(s) => ConfigValue::String(s.clone()),
            other => ConfigValue::String(format!("{other:?}")),
        }
    }
}

/// Conversion from a [`ConfigValue`] into a concrete type.
pub trait FromConfigValue: Sized {
    const EXPECTED: &'static str;

    fn from_config_value(value: &ConfigValue) -> Option<Self>;
}

impl FromConfigValue for String {
    const EXPECTED: &'static str = "string";

    fn from_config_value(value: &ConfigValue) -> Option<Self> {
        match value {
            ConfigValue::String(s) => Some(s.clone()),
            ConfigValue::Integer(i) => Some(i.to_string()),
            ConfigValue::Float(f) => Some(f.to_string()),
            ConfigValue::Bool(b) => Some(b.to_string()),
        }
    }
}

impl FromConfigValue for bool {
    const EXPECTED: &'static str = "bool";

    fn from_config_value(value: &ConfigValue) -> Option<Self> {
        match value {
            ConfigValue::Bool(b) => Some(*b),
            ConfigValue::String(s) => s.parse().ok(),
            _ => None,
        }
    }
}

macro_rules! from_config_int {
    ( $( $ty:ty ),* ) => {
        $(
            impl FromConfigValue for $ty {
                const EXPECTED: &'static str = stringify!($ty);

                fn from_config_value(value: &ConfigValue) -> Option<Self> {
                    match value {
                        ConfigValue::Integer(i) => <$ty>::try_from(*i).ok(),
                        ConfigValue::String(s) => s.parse().ok(),
                        _ => None,
                    }
                }
            }
        )*
    };
}

from_config_int!(i64, u64, u32, u16, usize);

impl FromConfigValue for f64 {
    const EXPECTED: &'static str = "f64";

    fn from_config_value(value: &ConfigValue) -> Option<Self> {
        match value {
            ConfigValue::Float(f) => Some(*f),
            ConfigValue::Integer(i) => Some(*i as f64),
            ConfigValue::String(s) => s.parse().ok(),
            _ => None,
        }
    }
}

/// Application configuration loaded from YAML files, `.env` files, and
/// environment variables, flattened to dot-separated keys.
///
/// Resolution order (lowest to highest priority):
/// 1. `application.yaml` (base)
/// 2. `application-{profile}.yaml` (profile override)
/// 3. `.env` file (loaded into the process environment, never overwriting)
/// 4. Environment variables with the `APP_` prefix
///    (`APP_SERVER_PORT` overrides `app.server.port`)
#[derive(Debug, Clone)]
pub struct RestConfig {
    values: HashMap<String, ConfigValue>,
    profile: String,
}

impl RestConfig {
    /// An empty configuration (useful as a fallback and in tests).
    pub fn empty() -> Self {
        Self {
            values: HashMap::new(),
            profile: "dev".to_string(),
        }
    }

    /// Load configuration for the given profile from the current directory.
    pub fn load(profile: &str) -> Result<Self, ConfigError> {
        let mut values = HashMap::new();

        load_yaml_file(Path::new("application.yaml"), &mut values)?;
        load_yaml_file(
            Path::new(&format!("application-{profile}.yaml")),
            &mut values,
        )?;

        // .env never overwrites already-set environment variables.
        let _ = dotenvy::dotenv();

        for (name, value) in std::env::vars() {
            if let Some(rest) = name.strip_prefix("APP_") {
                let key = format!("app.{}", rest.to_lowercase().replace('_', "."));
                values.insert(key, ConfigValue::String(value));
            }
        }

        Ok(Self {
            values,
            profile: profile.to_string(),
        })
    }

    /// Parse configuration from a YAML string (tests, embedded defaults).
    pub fn from_yaml_str(content: &str, profile: &str) -> Result<Self, ConfigError> {
        let mut values = HashMap::new();
        let yaml: serde_yaml::Value =
            serde_yaml::from_str(content).map_err(|e| ConfigError::Load(e.to_string()))?;
        flatten_yaml("", &yaml, &mut values);
        Ok(Self {
            values,
            profile: profile.to_string(),
        })
    }

    /// The active profile name.
    pub fn profile(&self) -> &str {
        &self.profile
    }

    /// Typed lookup of a dot-separated key.
    pub fn get<T: FromConfigValue>(&self, key: &str) -> Result<T, ConfigError> {
        let value = self
            .values
            .get(key)
            .ok_or_else(|| ConfigError::NotFound(key.to_string()))?;
        T::from_config_value(value).ok_or_else(|| ConfigError::TypeMismatch {
            key: key.to_string(),
            expected: T::EXPECTED,
        })
    }

    /// Typed lookup with a fallback default.
    pub fn get_or<T: FromConfigValue>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    /// Whether a key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }
}

fn load_yaml_file(
    path: &Path,
    values: &mut HashMap<String, ConfigValue>,
) -> Result<(), ConfigError> {
    if path.exists() {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Load(e.to_string()))?;
        let yaml: serde_yaml::Value =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::Load(e.to_string()))?;
        flatten_yaml("", &yaml, values);
    }
    Ok(())
}

/// Flatten a YAML tree into dot-separated keys.
fn flatten_yaml(prefix: &str, value: &serde_yaml::Value, out: &mut HashMap<String, ConfigValue>) {
    match value {
        serde_yaml::Value::Mapping(map) => {
            for (k, v) in map {
                let key_str = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    other => format!("{other:?}"),
                };
                let full_key = if prefix.is_empty() {
                    key_str
                } else {
                    format!("{prefix}.{key_str}")
                };
                flatten_yaml(&full_key, v, out);
            }
        }
        serde_yaml::Value::Sequence(seq) => {
            for (i, item) in seq.iter().enumerate() {
                let indexed_key = format!("{prefix}.{i}");
                flatten_yaml(&indexed_key, item, out);
            }
        }
        leaf => {
            if !prefix.is_empty() {
                out.insert(prefix.to_string(), ConfigValue::from_yaml(leaf));
            }
        }
    }
}
