//! Client side of textbook RSA against a remote key holder: encryption, signature
//! verification and blind signatures.

pub mod cmd;
pub mod config;
pub mod protocol;
pub mod session;
pub mod transport;

mod error;
pub use error::ClientError;

fn log_error<T>(x: Result<T, anyhow::Error>) -> Option<T> {
    x.map_err(|e| {
        log::error!("{e}");
    })
    .ok()
}
