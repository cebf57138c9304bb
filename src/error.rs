use crate::transport::TransportError;
use cipher::CipherError;
use encode::EncodeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Decode failed: {0}")]
    Decode(#[from] EncodeError),

    #[error("{0}")]
    Cipher(#[from] CipherError),

    #[error("Signer unavailable: {0}")]
    SignerUnavailable(String),

    /// the server answered with a fault status, the input may be marked invalid
    #[error("Server failed to process the request with status `{status}`: {msg}")]
    Processing { status: u16, msg: String },

    /// the signer answered, but not with the expected payload
    #[error("Malformed reply from the signer: {0}")]
    MalformedReply(String),

    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    #[error("{0}")]
    Config(String),
}

impl From<TransportError> for ClientError {
    fn from(value: TransportError) -> Self {
        if value.malformed {
            return Self::MalformedReply(value.msg);
        }

        match value.status {
            Some(status) if status >= 500 => Self::Processing {
                status,
                msg: value.msg,
            },
            _ => Self::SignerUnavailable(value.to_string()),
        }
    }
}
