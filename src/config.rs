use crate::ClientError;
use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};
use std::{sync::OnceLock, time::Duration};
use url::Url;

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct ClientConfig {
    /// base url of the signer
    pub server: Url,

    /// per request
    pub timeout_secs: u64,

    // modulus bits of the local key pair
    pub key_bits: usize,

    pub prime_test_rounds: usize,

    // prime candidates per generated prime
    pub max_prime_attempts: usize,

    // primes drawn per blinding factor
    pub blinding_attempts: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server: Url::parse("http://localhost:3000").unwrap_or_else(|_| unreachable!()),
            timeout_secs: 10,
            key_bits: 1024,
            prime_test_rounds: utils::DEFAULT_PRIME_TEST_ROUNDS,
            max_prime_attempts: 10_000,
            blinding_attempts: 16,
        }
    }
}

impl From<ConfigError> for ClientError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value.to_string())
    }
}

impl ClientConfig {
    /// The process wide configuration, loaded on first use. `f` only counts on that first call.
    pub fn config_with_file(f: Option<&str>) -> Result<&'static Self, ClientError> {
        static CONFIG: OnceLock<ClientConfig> = OnceLock::new();

        if let Some(c) = CONFIG.get() {
            return Ok(c);
        }

        let c = Self::load(f)?;
        Ok(CONFIG.get_or_init(|| c))
    }

    /// Defaults, then the file `f`, then `BLINDRSA_*` environment variables.
    pub fn load(f: Option<&str>) -> Result<Self, ClientError> {
        let default_config = Config::try_from(&ClientConfig::default())?;

        let mut config = Config::builder().add_source(default_config);
        if let Some(f) = f {
            config = config.add_source(config::File::with_name(f).required(true));
        }
        config = config.add_source(
            Environment::with_prefix("BLINDRSA")
                .prefix_separator("_")
                .try_parsing(true)
                .separator("__"),
        );

        let config: ClientConfig = config.build()?.try_deserialize()?;
        config.check()?;

        log::trace!("{:?}", config);
        Ok(config)
    }

    fn check(&self) -> Result<(), ClientError> {
        if self.key_bits < 32 {
            return Err(ClientError::Config(format!(
                "`key_bits` {} is too small",
                self.key_bits
            )));
        }

        for (name, v) in [
            ("prime_test_rounds", self.prime_test_rounds),
            ("max_prime_attempts", self.max_prime_attempts),
            ("blinding_attempts", self.blinding_attempts),
        ] {
            if v == 0 {
                return Err(ClientError::Config(format!("`{name}` must be positive")));
            }
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
