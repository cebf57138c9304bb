use super::{message, message_arg, print_outcome, Cmd, CmdCtx};
use crate::log_error;
use clap::{ArgMatches, Command};

pub struct BlindCmd {
    ctx: CmdCtx,
}

impl BlindCmd {
    pub fn new(ctx: CmdCtx) -> Self {
        Self { ctx }
    }

    fn blind_sign(&self, m: &ArgMatches) -> anyhow::Result<()> {
        let msg = message(m)?;
        let outcome = self.ctx.session()?.blind_sign_round_trip(msg)?;
        print_outcome(msg, &outcome);
        Ok(())
    }
}

impl Cmd for BlindCmd {
    const NAME: &'static str = "blind";

    fn cmd() -> Command {
        Command::new(Self::NAME)
            .about("have the signer sign a message it cannot read and verify the signature")
            .arg(message_arg())
    }

    fn run(&self, m: &ArgMatches) {
        log_error(self.blind_sign(m));
    }
}
