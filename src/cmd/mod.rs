use crate::config::ClientConfig;
use crate::session::{Session, VerificationOutcome};
use crate::transport::{HttpTransport, LocalSigner, Transport};
use crate::ClientError;
use clap::{Arg, ArgAction, ArgMatches, Command};
use regex::Regex;

pub trait Cmd {
    const NAME: &'static str;

    fn cmd() -> Command;

    fn run(&self, m: &ArgMatches);
}

/// letters, digits, `_` and whitespace, 1 to 100 characters
pub const MESSAGE_PATTERN: &str = r"^[a-zA-Z0-9_\s]{1,100}$";

pub fn validate_message(msg: &str) -> Result<&str, ClientError> {
    let re = Regex::new(MESSAGE_PATTERN).map_err(|e| ClientError::InvalidMessage(e.to_string()))?;

    if re.is_match(msg) {
        Ok(msg)
    } else {
        Err(ClientError::InvalidMessage(format!(
            "`{msg}` is not 1 to 100 characters of letters, digits, `_` or whitespace"
        )))
    }
}

/// Where the subcommands find the signer.
#[derive(Clone, Copy)]
pub struct CmdCtx {
    config: &'static ClientConfig,
    local: bool,
}

impl CmdCtx {
    /// `local` swaps the HTTP signer for an in-process one with a fresh key.
    pub fn new(config: &'static ClientConfig, local: bool) -> Self {
        Self { config, local }
    }

    pub fn config(&self) -> &'static ClientConfig {
        self.config
    }

    pub fn transport(&self) -> anyhow::Result<Box<dyn Transport + Send + Sync>> {
        if self.local {
            log::info!("using an in-process signer");
            let signer = LocalSigner::generate(
                self.config.key_bits,
                self.config.prime_test_rounds,
                self.config.max_prime_attempts,
            )?;
            Ok(Box::new(signer))
        } else {
            let server = self.config.server.clone();
            log::debug!("signer at {server}");
            Ok(Box::new(HttpTransport::new(server, self.config.timeout())?))
        }
    }

    pub fn session(&self) -> anyhow::Result<Session<Box<dyn Transport + Send + Sync>>> {
        Ok(Session::connect(self.transport()?, self.config)?)
    }
}

fn message_arg() -> Arg {
    Arg::new("message")
        .value_name("MESSAGE")
        .action(ArgAction::Set)
        .required(true)
        .help("1 to 100 characters of letters, digits, `_` or whitespace")
}

fn message(m: &ArgMatches) -> Result<&str, ClientError> {
    let msg = m.get_one::<String>("message").map(String::as_str).unwrap_or_default();
    validate_message(msg)
}

fn print_outcome(msg: &str, outcome: &VerificationOutcome) {
    println!("recovered: {}", outcome.text);
    if outcome.matches(msg) {
        println!("Validation success.");
    } else {
        println!("Validation failed, the signature is not over `{msg}`.");
    }
}

mod pubkey;
pub use pubkey::PubkeyCmd;

mod greet;
pub use greet::GreetCmd;

mod encrypt;
pub use encrypt::EncryptCmd;

mod sign;
pub use sign::SignCmd;

mod blind;
pub use blind::BlindCmd;

mod keygen;
pub use keygen::KeygenCmd;
