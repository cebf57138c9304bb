use super::{MessagePayload, PublicKeyPayload, Transport, TransportError};
use cipher::rsa::PrivateKey;
use cipher::{CipherError, DefaultRand};
use encode::{hex_to_integer, integer_to_hex};

const GREETING: &str = "Hello from the local signer";

/// An honest signer in the same process, holding the private key the server would hold.
///
/// Malformed input is answered with status 500 as the server does.
pub struct LocalSigner {
    key: PrivateKey,
}

impl LocalSigner {
    pub fn new(key: PrivateKey) -> Self {
        Self { key }
    }

    pub fn generate(
        bits_len: usize,
        prime_test_rounds: usize,
        max_attempts: usize,
    ) -> Result<Self, CipherError> {
        let mut rng = DefaultRand::default();
        let key = PrivateKey::generate_key(bits_len, prime_test_rounds, max_attempts, &mut rng)?;
        Ok(Self::new(key))
    }

    // c^d mod n, decryption and signing alike
    fn apply_private(&self, payload: &MessagePayload) -> Result<MessagePayload, TransportError> {
        let x = hex_to_integer(&payload.msg).map_err(|e| TransportError::new(Some(500), e.to_string()))?;
        let y = self
            .key
            .rsadp(&x)
            .map_err(|e| TransportError::new(Some(500), e.to_string()))?;
        Ok(MessagePayload::new(integer_to_hex(&y)))
    }
}

impl Transport for LocalSigner {
    fn public_key(&self) -> Result<PublicKeyPayload, TransportError> {
        let pk = self.key.public_key();
        Ok(PublicKeyPayload {
            e: integer_to_hex(pk.exponent()),
            n: integer_to_hex(pk.modulus()),
        })
    }

    fn post_message(&self, payload: &MessagePayload) -> Result<MessagePayload, TransportError> {
        self.apply_private(payload)
    }

    fn sign(&self, payload: &MessagePayload) -> Result<MessagePayload, TransportError> {
        self.apply_private(payload)
    }

    fn greeting(&self) -> Result<MessagePayload, TransportError> {
        Ok(MessagePayload::new(GREETING))
    }
}

#[cfg(test)]
mod tests {
    use super::LocalSigner;
    use crate::transport::{MessagePayload, Transport};
    use cipher::rsa::PrivateKey;
    use num_bigint::BigUint;

    fn textbook_signer() -> LocalSigner {
        LocalSigner::new(PrivateKey::new_uncheck(
            BigUint::from(3233u32),
            BigUint::from(17u32),
            BigUint::from(2753u32),
        ))
    }

    #[test]
    fn textbook_replies() {
        let signer = textbook_signer();
        let pk = signer.public_key().unwrap();
        assert_eq!((pk.e.as_str(), pk.n.as_str()), ("11", "ca1"));

        // 2790 = 0xae6 decrypts to 65 = 0x41
        let reply = signer.post_message(&MessagePayload::new("ae6")).unwrap();
        assert_eq!(reply.msg, "41");
        // 65^2753 mod 3233 = 588 = 0x24c
        let reply = signer.sign(&MessagePayload::new("41")).unwrap();
        assert_eq!(reply.msg, "24c");
        assert!(!signer.greeting().unwrap().msg.is_empty());
    }

    #[test]
    fn bad_input_is_a_server_fault() {
        let signer = textbook_signer();
        for msg in ["", "xyz", "ca1", "ffff"] {
            let e = signer.sign(&MessagePayload::new(msg)).unwrap_err();
            assert_eq!(e.status, Some(500), "case `{msg}`");
        }
    }

    #[test]
    fn generated_signer() {
        let signer = LocalSigner::generate(128, 20, 10_000).unwrap();
        let pk = signer.public_key().unwrap();
        assert_eq!(pk.e, "10001");
        assert_eq!(pk.n.len(), 32);
    }
}
