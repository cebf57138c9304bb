use chrono::{DateTime, Local};
use std::{process::Command, time::SystemTime};

fn exe_cmd(cmd: &mut Command) -> anyhow::Result<String> {
    let output = cmd.output()?;

    if output.status.success() {
        Ok(String::from_utf8(output.stdout)?)
    } else {
        anyhow::bail!("{}", String::from_utf8_lossy(&output.stderr))
    }
}

fn git_info(args: &[&str]) -> String {
    match exe_cmd(Command::new("git").args(args)) {
        Ok(s) => s.trim().to_string(),
        Err(e) => {
            println!("cargo:warning=git {} failed: {e}", args.join(" "));
            String::from("unknown")
        }
    }
}

fn main() {
    let mut commit = git_info(&["log", "-n", "1", "--pretty=format:%H"]);
    commit.truncate(8);
    let branch = git_info(&["branch", "--show-current"]);

    println!(
        "cargo:rustc-env=BLINDRSA_VERSION_INFO={}-{}",
        env!("CARGO_PKG_VERSION"),
        DateTime::<Local>::from(SystemTime::now()).format("%Y/%m/%d-%H:%M:%S:%Z")
    );

    println!("cargo:rustc-env=BLINDRSA_GIT_INFO={branch}-{commit}");
    println!("cargo:rerun-if-changed=build.rs");
}
