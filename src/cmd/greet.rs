use super::{Cmd, CmdCtx};
use crate::log_error;
use clap::{ArgMatches, Command};

pub struct GreetCmd {
    ctx: CmdCtx,
}

impl GreetCmd {
    pub fn new(ctx: CmdCtx) -> Self {
        Self { ctx }
    }
}

impl Cmd for GreetCmd {
    const NAME: &'static str = "greet";

    fn cmd() -> Command {
        Command::new(Self::NAME).about("show the greeting of the signer")
    }

    fn run(&self, _m: &ArgMatches) {
        if let Some(msg) = log_error(
            self.ctx
                .session()
                .and_then(|s| s.greeting().map_err(anyhow::Error::from)),
        ) {
            println!("{msg}");
        }
    }
}
