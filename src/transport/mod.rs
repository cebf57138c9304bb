//! The channel between the client and the key holder.
//!
//! Every integer crosses it as lower-case hex without a `0x` prefix. The calls block until
//! the signer answers or the transport gives up.

use serde::{Deserialize, Serialize};
use std::{error::Error, fmt::Display};

mod http;
pub use http::HttpTransport;

mod local;
pub use local::LocalSigner;

/// `{"e": hex, "n": hex}`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKeyPayload {
    pub e: String,
    pub n: String,
}

/// `{"msg": ...}`, hex for the round trips and plain text for the greeting
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePayload {
    pub msg: String,
}

impl MessagePayload {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportError {
    /// HTTP status of the reply when there was one
    pub status: Option<u16>,
    /// a reply arrived but its body could not be parsed
    pub malformed: bool,
    pub msg: String,
}

impl TransportError {
    pub fn new(status: Option<u16>, msg: impl Into<String>) -> Self {
        Self {
            status,
            malformed: false,
            msg: msg.into(),
        }
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self {
            status: None,
            malformed: true,
            msg: msg.into(),
        }
    }
}

impl Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(status) => write!(f, "status `{status}`: {}", self.msg),
            None if self.malformed => write!(f, "malformed reply: {}", self.msg),
            None => f.write_str(&self.msg),
        }
    }
}

impl Error for TransportError {}

pub trait Transport {
    /// `GET /pubkey`
    fn public_key(&self) -> Result<PublicKeyPayload, TransportError>;

    /// `POST /postmsg`, the signer decrypts the ciphertext
    fn post_message(&self, payload: &MessagePayload) -> Result<MessagePayload, TransportError>;

    /// `POST /sign`, the signer applies its private exponent
    fn sign(&self, payload: &MessagePayload) -> Result<MessagePayload, TransportError>;

    /// `GET /getmsg`
    fn greeting(&self) -> Result<MessagePayload, TransportError>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn public_key(&self) -> Result<PublicKeyPayload, TransportError> {
        (**self).public_key()
    }

    fn post_message(&self, payload: &MessagePayload) -> Result<MessagePayload, TransportError> {
        (**self).post_message(payload)
    }

    fn sign(&self, payload: &MessagePayload) -> Result<MessagePayload, TransportError> {
        (**self).sign(payload)
    }

    fn greeting(&self) -> Result<MessagePayload, TransportError> {
        (**self).greeting()
    }
}

impl<T: Transport + ?Sized> Transport for &T {
    fn public_key(&self) -> Result<PublicKeyPayload, TransportError> {
        (**self).public_key()
    }

    fn post_message(&self, payload: &MessagePayload) -> Result<MessagePayload, TransportError> {
        (**self).post_message(payload)
    }

    fn sign(&self, payload: &MessagePayload) -> Result<MessagePayload, TransportError> {
        (**self).sign(payload)
    }

    fn greeting(&self) -> Result<MessagePayload, TransportError> {
        (**self).greeting()
    }
}
