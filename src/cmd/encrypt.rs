use super::{message, message_arg, Cmd, CmdCtx};
use crate::log_error;
use clap::{ArgMatches, Command};
use encode::integer_to_hex;

pub struct EncryptCmd {
    ctx: CmdCtx,
}

impl EncryptCmd {
    pub fn new(ctx: CmdCtx) -> Self {
        Self { ctx }
    }

    fn encrypt(&self, m: &ArgMatches) -> anyhow::Result<()> {
        let msg = message(m)?;
        let session = self.ctx.session()?;

        let c = session.encrypt(msg)?;
        println!("ciphertext: {}", integer_to_hex(&c));

        let reply = session.encrypt_round_trip(msg)?;
        println!("decrypted by the signer: {reply}");
        Ok(())
    }
}

impl Cmd for EncryptCmd {
    const NAME: &'static str = "encrypt";

    fn cmd() -> Command {
        Command::new(Self::NAME)
            .about("encrypt a message with the signer key and have the signer decrypt it")
            .arg(message_arg())
    }

    fn run(&self, m: &ArgMatches) {
        log_error(self.encrypt(m));
    }
}
