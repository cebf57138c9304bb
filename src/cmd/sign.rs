use super::{message, message_arg, print_outcome, Cmd, CmdCtx};
use crate::log_error;
use clap::{ArgMatches, Command};

/// The signer sees the message in the clear.
pub struct SignCmd {
    ctx: CmdCtx,
}

impl SignCmd {
    pub fn new(ctx: CmdCtx) -> Self {
        Self { ctx }
    }

    fn sign(&self, m: &ArgMatches) -> anyhow::Result<()> {
        let msg = message(m)?;
        let outcome = self.ctx.session()?.sign_round_trip(msg)?;
        print_outcome(msg, &outcome);
        Ok(())
    }
}

impl Cmd for SignCmd {
    const NAME: &'static str = "sign";

    fn cmd() -> Command {
        Command::new(Self::NAME)
            .about("have the signer sign a message and verify the signature")
            .arg(message_arg())
    }

    fn run(&self, m: &ArgMatches) {
        log_error(self.sign(m));
    }
}
