use super::{MessagePayload, PublicKeyPayload, Transport, TransportError};
use reqwest::blocking::Client;
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use url::Url;

const PUBKEY_PATH: &str = "pubkey";
const POSTMSG_PATH: &str = "postmsg";
const SIGN_PATH: &str = "sign";
const GETMSG_PATH: &str = "getmsg";

/// Blocking JSON over HTTP to the signer at `server`.
pub struct HttpTransport {
    client: Client,
    server: Url,
}

impl From<reqwest::Error> for TransportError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            Self::malformed(value.to_string())
        } else {
            Self::new(value.status().map(|s| s.as_u16()), value.to_string())
        }
    }
}

impl HttpTransport {
    pub fn new(mut server: Url, timeout: Duration) -> Result<Self, TransportError> {
        // endpoints are joined below the server path, not beside its last segment
        if !server.path().ends_with('/') {
            let path = format!("{}/", server.path());
            server.set_path(&path);
        }

        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, server })
    }

    pub fn server(&self) -> &Url {
        &self.server
    }

    fn endpoint(&self, path: &str) -> Result<Url, TransportError> {
        self.server
            .join(path)
            .map_err(|e| TransportError::new(None, format!("invalid endpoint `{path}`: {e}")))
    }

    fn get<V: DeserializeOwned>(&self, path: &str) -> Result<V, TransportError> {
        let url = self.endpoint(path)?;
        log::debug!("GET {url}");
        let resp = self.client.get(url).send()?.error_for_status()?;
        Ok(resp.json()?)
    }

    fn post<B: Serialize + ?Sized, V: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<V, TransportError> {
        let url = self.endpoint(path)?;
        log::debug!("POST {url}");
        let resp = self.client.post(url).json(body).send()?.error_for_status()?;
        Ok(resp.json()?)
    }
}

impl Transport for HttpTransport {
    fn public_key(&self) -> Result<PublicKeyPayload, TransportError> {
        self.get(PUBKEY_PATH)
    }

    fn post_message(&self, payload: &MessagePayload) -> Result<MessagePayload, TransportError> {
        self.post(POSTMSG_PATH, payload)
    }

    fn sign(&self, payload: &MessagePayload) -> Result<MessagePayload, TransportError> {
        self.post(SIGN_PATH, payload)
    }

    fn greeting(&self) -> Result<MessagePayload, TransportError> {
        self.get(GETMSG_PATH)
    }
}
