use blindrsa::cmd::{
    BlindCmd, Cmd, CmdCtx, EncryptCmd, GreetCmd, KeygenCmd, PubkeyCmd, SignCmd,
};
use blindrsa::config::ClientConfig;
use clap::{Arg, ArgAction, Command};
use log::LevelFilter;

fn main() {
    env_logger::builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let version = env!("BLINDRSA_VERSION_INFO");
    let app = Command::new("blindrsa")
        .version(version)
        .about("rsa encryption, signature and blind signature client")
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .action(ArgAction::Set)
                .required(false)
                .global(true)
                .help("json config file, `BLINDRSA_*` environment variables override it"),
        )
        .arg(
            Arg::new("local")
                .long("local")
                .short('l')
                .action(ArgAction::SetTrue)
                .required(false)
                .global(true)
                .help("use an in-process signer with a freshly generated key instead of the server"),
        )
        .subcommand(PubkeyCmd::cmd())
        .subcommand(GreetCmd::cmd())
        .subcommand(EncryptCmd::cmd())
        .subcommand(SignCmd::cmd())
        .subcommand(BlindCmd::cmd())
        .subcommand(KeygenCmd::cmd())
        .get_matches();

    let config = match ClientConfig::config_with_file(app.get_one::<String>("config").map(String::as_str)) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    };

    let ctx = CmdCtx::new(config, app.get_flag("local"));
    if let Some((s, m)) = app.subcommand() {
        match s {
            PubkeyCmd::NAME => PubkeyCmd::new(ctx).run(m),
            GreetCmd::NAME => GreetCmd::new(ctx).run(m),
            EncryptCmd::NAME => EncryptCmd::new(ctx).run(m),
            SignCmd::NAME => SignCmd::new(ctx).run(m),
            BlindCmd::NAME => BlindCmd::new(ctx).run(m),
            KeygenCmd::NAME => KeygenCmd::new(ctx).run(m),
            name => {
                log::error!("unsupported subcommand `{name}`");
            }
        }
    } else {
        println!(
            "{} {} ({})",
            env!("CARGO_PKG_NAME"),
            version,
            env!("BLINDRSA_GIT_INFO")
        );
    }
}
