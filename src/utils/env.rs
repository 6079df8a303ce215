use std::collections::HashMap;
use std::{env, fmt, io};

use heck::ToShoutySnakeCase;

/// ServiceEnv allows us to mock environment variables while
/// running tests. That way we can run our tests in parallel,
/// and our local development environment will not have unintended
/// side effects on our tests.
#[derive(Debug, Clone)]
pub struct ServiceEnv {
    mock_store: Option<HashMap<String, String>>,
}

impl Default for ServiceEnv {
    fn default() -> ServiceEnv {
        ServiceEnv::new()
    }
}

impl ServiceEnv {
    /// creates a new environment variable store
    pub fn new() -> ServiceEnv {
        let mock_store = if cfg!(test) {
            Some(HashMap::new())
        } else {
            None
        };

        ServiceEnv { mock_store }
    }

    /// returns the value of the environment variable if it exists
    pub fn get(&self, key: EnvKey) -> io::Result<Option<String>> {
        let key_str = key.to_string();
        tracing::trace!("Checking for ${}", &key_str);
        let result = match &self.mock_store {
            Some(mock_store) => Ok(mock_store.get(&key_str).map(|v| v.to_owned())),
            None => match env::var(&key_str) {
                Ok(data) => Ok(Some(data)),
                Err(e) => match e {
                    env::VarError::NotPresent => Ok(None),
                    env::VarError::NotUnicode(_) => Err(io::Error::new(
                        io::ErrorKind::InvalidInput,
                        format!(
                            "The value of the environment variable \"{}\" is not valid Unicode.",
                            &key_str
                        ),
                    )),
                },
            },
        }?;

        if let Some(result) = &result {
            tracing::debug!("read {}", self.get_debug_value(key, result));
        } else {
            tracing::trace!("could not find ${}", &key_str);
        }

        Ok(result)
    }

    fn get_debug_value(&self, key: EnvKey, value: &str) -> String {
        let value = if key.is_credential() {
            mask_credential(value)
        } else {
            value.to_string()
        };

        format!("environment variable ${} = {}", key, value)
    }

    /// sets an environment variable to a value
    pub fn insert(&mut self, key: EnvKey, value: &str) {
        tracing::debug!("writing {}", self.get_debug_value(key, value));
        let key = key.to_string();
        match &mut self.mock_store {
            Some(mock_store) => {
                mock_store.insert(key, value.into());
            }
            None => {
                env::set_var(&key, value);
            }
        }
    }

    /// unsets an environment variable
    pub fn remove(&mut self, key: EnvKey) {
        let key = key.to_string();
        tracing::debug!("removing {}", &key);
        match &mut self.mock_store {
            Some(mock_store) => {
                mock_store.remove(&key);
            }
            None => {
                env::remove_var(&key);
            }
        }
    }
}

/// Masks all but the last four characters of a credential value. Values
/// no longer than the visible suffix are masked entirely, so a short
/// credential never round-trips through the logs.
pub fn mask_credential(value: &str) -> String {
    const VISIBLE_SUFFIX: usize = 4;

    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= VISIBLE_SUFFIX {
        return "******".to_string();
    }
    let visible: String = chars[chars.len() - VISIBLE_SUFFIX..].iter().collect();
    format!("******{}", visible)
}

/// EnvKey defines all of the environment variables
/// that are respected by the liveclass services. Any time a new
/// environment variable is added to the public contract, it should be
/// defined here. Each environment variable is prefixed with `LIVECLASS_`
/// and the suffix is the name of the key defined here. It will
/// automatically be converted from CamelCase to SHOUTY_SNAKE_CASE.
/// For example, `EnvKey::DatabaseUrl.to_string()` becomes
/// `LIVECLASS_DATABASE_URL`.
///
/// Every variable is optional and unvalidated here; each consumer decides
/// what absence means.
#[derive(Debug, Copy, Clone)]
pub enum EnvKey {
    Port,
    MetricsPort,
    DatabaseUrl,
    GraphqlEndpoint,
    MediaBucket,
    MediaBaseUrl,
    AccessToken,
    LogLevel,
    CorsDomain,
    EnableLiveSessions,
}

impl EnvKey {
    /// Whether the value is a secret that must never be logged verbatim.
    pub const fn is_credential(&self) -> bool {
        matches!(self, EnvKey::AccessToken)
    }
}

impl fmt::Display for EnvKey {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        let dbg = format!("{:?}", self).to_shouty_snake_case();
        fmt.write_str(&format!("LIVECLASS_{}", &dbg))
    }
}
