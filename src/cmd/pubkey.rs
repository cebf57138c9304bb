use super::{Cmd, CmdCtx};
use crate::log_error;
use clap::{Arg, ArgAction, ArgMatches, Command};
use encode::integer_to_hex;

pub struct PubkeyCmd {
    ctx: CmdCtx,
}

impl PubkeyCmd {
    pub fn new(ctx: CmdCtx) -> Self {
        Self { ctx }
    }

    fn pubkey(&self, m: &ArgMatches) -> anyhow::Result<()> {
        let session = self.ctx.session()?;
        let pk = session.public_key();

        if m.get_flag("json") {
            println!("{}", serde_json::to_string_pretty(pk)?);
        } else {
            println!("n: {}", integer_to_hex(pk.modulus()));
            println!("e: {}", integer_to_hex(pk.exponent()));
            println!("bits: {}", pk.modulus().bits());
        }

        Ok(())
    }
}

impl Cmd for PubkeyCmd {
    const NAME: &'static str = "pubkey";

    fn cmd() -> Command {
        Command::new(Self::NAME)
            .about("fetch the public key of the signer")
            .arg(
                Arg::new("json")
                    .long("json")
                    .action(ArgAction::SetTrue)
                    .required(false)
                    .help("print the key as json"),
            )
    }

    fn run(&self, m: &ArgMatches) {
        log_error(self.pubkey(m));
    }
}
