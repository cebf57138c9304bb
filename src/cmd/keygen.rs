use super::{Cmd, CmdCtx};
use crate::log_error;
use cipher::rsa::PrivateKey;
use cipher::DefaultRand;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};

pub struct KeygenCmd {
    ctx: CmdCtx,
}

impl KeygenCmd {
    pub fn new(ctx: CmdCtx) -> Self {
        Self { ctx }
    }

    fn keygen(&self, m: &ArgMatches) -> anyhow::Result<()> {
        let config = self.ctx.config();
        let bits = m.get_one::<usize>("bits").copied().unwrap_or(config.key_bits);

        let mut rng = DefaultRand::default();
        let key = PrivateKey::generate_key(
            bits,
            config.prime_test_rounds,
            config.max_prime_attempts,
            &mut rng,
        )?;

        let json = if m.get_flag("public") {
            serde_json::to_string_pretty(key.public_key())?
        } else {
            serde_json::to_string_pretty(&key)?
        };
        println!("{json}");
        Ok(())
    }
}

impl Cmd for KeygenCmd {
    const NAME: &'static str = "keygen";

    fn cmd() -> Command {
        Command::new(Self::NAME)
            .about("generate a local rsa key pair with e = 65537")
            .arg(
                Arg::new("bits")
                    .long("bits")
                    .short('b')
                    .action(ArgAction::Set)
                    .required(false)
                    .value_parser(value_parser!(usize))
                    .help("modulus bits, `key_bits` of the config by default"),
            )
            .arg(
                Arg::new("public")
                    .long("public")
                    .action(ArgAction::SetTrue)
                    .required(false)
                    .help("print the public key only"),
            )
    }

    fn run(&self, m: &ArgMatches) {
        log_error(self.keygen(m));
    }
}
