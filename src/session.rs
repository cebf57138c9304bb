use crate::config::ClientConfig;
use crate::protocol::BlindSignProtocol;
use crate::transport::{MessagePayload, Transport};
use crate::ClientError;
use cipher::rsa::{PrimeSource, PrivateKey, PublicKey, RandPrimeSource};
use cipher::DefaultRand;
use encode::{hex_to_integer, integer_to_hex, integer_to_text, text_to_integer};
use num_bigint::BigUint;
use num_traits::Zero;

/// What a signature verified to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerificationOutcome {
    pub recovered: BigUint,
    /// `recovered` read as UTF-8, invalid sequences replaced
    pub text: String,
}

impl VerificationOutcome {
    pub fn new(recovered: BigUint) -> Self {
        let text = if recovered.is_zero() {
            String::new()
        } else {
            String::from_utf8_lossy(&recovered.to_bytes_be()).into_owned()
        };
        Self { recovered, text }
    }

    /// whether the signature was made over `expected`
    pub fn matches(&self, expected: &str) -> bool {
        self.recovered == text_to_integer(expected)
    }
}

/// The server key, the local key pair and the channel to the signer, for one session.
///
/// The public key is fixed once the session exists; every use case only reads it.
pub struct Session<T> {
    pk: PublicKey,
    key_pair: PrivateKey,
    transport: T,
    prime_test_rounds: usize,
    max_prime_attempts: usize,
    blinding_attempts: usize,
}

impl<T: Transport> Session<T> {
    /// Fetch the server public key and generate the local key pair.
    pub fn connect(transport: T, config: &ClientConfig) -> Result<Self, ClientError> {
        let payload = transport.public_key()?;
        let n = hex_to_integer(&payload.n)?;
        let e = hex_to_integer(&payload.e)?;
        let pk = PublicKey::new(n, e)?;
        log::info!("server public key: {pk}");

        let mut rng = DefaultRand::default();
        let key_pair = PrivateKey::generate_key(
            config.key_bits,
            config.prime_test_rounds,
            config.max_prime_attempts,
            &mut rng,
        )?;
        log::debug!("local key pair of {} bits generated", config.key_bits);

        Ok(Self::new(pk, key_pair, transport, config))
    }

    pub fn new(pk: PublicKey, key_pair: PrivateKey, transport: T, config: &ClientConfig) -> Self {
        Self {
            pk,
            key_pair,
            transport,
            prime_test_rounds: config.prime_test_rounds,
            max_prime_attempts: config.max_prime_attempts,
            blinding_attempts: config.blinding_attempts,
        }
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.pk
    }

    pub fn key_pair(&self) -> &PrivateKey {
        &self.key_pair
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The ciphertext of `plaintext` under the server key.
    pub fn encrypt(&self, plaintext: &str) -> Result<BigUint, ClientError> {
        let m = text_to_integer(plaintext);
        Ok(self.pk.forward_transform(&m)?)
    }

    /// hex integer to text
    pub fn decode(&self, reply: &str) -> Result<String, ClientError> {
        let i = hex_to_integer(reply)?;
        Ok(integer_to_text(&i)?)
    }

    /// Send the ciphertext of `plaintext` and decode what the server decrypted.
    pub fn encrypt_round_trip(&self, plaintext: &str) -> Result<String, ClientError> {
        let c = self.encrypt(plaintext)?;
        let reply = self
            .transport
            .post_message(&MessagePayload::new(integer_to_hex(&c)))?;
        self.decode(&reply.msg)
    }

    /// Have the server sign `plaintext` in the clear and verify the signature.
    pub fn sign_round_trip(&self, plaintext: &str) -> Result<VerificationOutcome, ClientError> {
        let m = text_to_integer(plaintext);
        self.pk.check_range(&m)?;

        let reply = self
            .transport
            .sign(&MessagePayload::new(integer_to_hex(&m)))?;
        let s = hex_to_integer(&reply.msg)?;
        let outcome = VerificationOutcome::new(self.pk.verify_transform(&s)?);
        log::info!("signature verified to `{}`", outcome.text);

        Ok(outcome)
    }

    /// Have the server sign `plaintext` without showing it, then verify the signature.
    pub fn blind_sign_round_trip(&self, plaintext: &str) -> Result<VerificationOutcome, ClientError> {
        let mut source = RandPrimeSource::new(
            DefaultRand::default(),
            self.prime_test_rounds,
            self.max_prime_attempts,
        );
        self.blind_sign_round_trip_with(plaintext, &mut source)
    }

    /// [`Session::blind_sign_round_trip`] with blinding factors drawn from `source`.
    pub fn blind_sign_round_trip_with<P: PrimeSource + ?Sized>(
        &self,
        plaintext: &str,
        source: &mut P,
    ) -> Result<VerificationOutcome, ClientError> {
        let m = text_to_integer(plaintext);
        let protocol = BlindSignProtocol::new(&self.pk, self.blinding_attempts);
        let outcome = VerificationOutcome::new(protocol.run(&m, &self.transport, source)?);
        log::info!("blind signature verified to `{}`", outcome.text);

        Ok(outcome)
    }

    /// `GET /getmsg`
    pub fn greeting(&self) -> Result<String, ClientError> {
        Ok(self.transport.greeting()?.msg)
    }
}

#[cfg(test)]
mod tests {
    use super::{Session, VerificationOutcome};
    use crate::config::ClientConfig;
    use crate::transport::{LocalSigner, MessagePayload, PublicKeyPayload, Transport, TransportError};
    use crate::ClientError;
    use cipher::rsa::{PrimeSource, PrivateKey};
    use cipher::CipherError;
    use encode::EncodeError;
    use num_bigint::BigUint;

    fn test_config() -> ClientConfig {
        ClientConfig {
            key_bits: 64,
            prime_test_rounds: 20,
            ..Default::default()
        }
    }

    fn textbook_key() -> PrivateKey {
        PrivateKey::new_uncheck(
            BigUint::from(3233u32),
            BigUint::from(17u32),
            BigUint::from(2753u32),
        )
    }

    fn textbook_session() -> Session<LocalSigner> {
        Session::connect(LocalSigner::new(textbook_key()), &test_config()).unwrap()
    }

    /// replies with a fixed status to every call but the key fetch
    struct Failing {
        key: LocalSigner,
        status: Option<u16>,
    }

    impl Failing {
        fn err(&self) -> TransportError {
            TransportError::new(self.status, "no luck")
        }
    }

    impl Transport for Failing {
        fn public_key(&self) -> Result<PublicKeyPayload, TransportError> {
            self.key.public_key()
        }

        fn post_message(&self, _: &MessagePayload) -> Result<MessagePayload, TransportError> {
            Err(self.err())
        }

        fn sign(&self, _: &MessagePayload) -> Result<MessagePayload, TransportError> {
            Err(self.err())
        }

        fn greeting(&self) -> Result<MessagePayload, TransportError> {
            Err(self.err())
        }
    }

    /// the signer answers with a fixed hex value
    struct Forger(LocalSigner, &'static str);

    impl Transport for Forger {
        fn public_key(&self) -> Result<PublicKeyPayload, TransportError> {
            self.0.public_key()
        }

        fn post_message(&self, _: &MessagePayload) -> Result<MessagePayload, TransportError> {
            Ok(MessagePayload::new(self.1))
        }

        fn sign(&self, _: &MessagePayload) -> Result<MessagePayload, TransportError> {
            Ok(MessagePayload::new(self.1))
        }

        fn greeting(&self) -> Result<MessagePayload, TransportError> {
            self.0.greeting()
        }
    }

    struct FixedPrime(u32);

    impl PrimeSource for FixedPrime {
        fn random_prime(&mut self, _bound: &BigUint) -> Result<BigUint, CipherError> {
            Ok(BigUint::from(self.0))
        }
    }

    #[test]
    fn textbook_scenario() {
        let session = textbook_session();
        assert_eq!(session.public_key().modulus(), &BigUint::from(3233u32));
        assert_eq!(session.key_pair().public_key().modulus().bits(), 64);

        assert_eq!(session.encrypt("A").unwrap(), BigUint::from(2790u32));
        assert_eq!(session.decode("41").unwrap(), "A");
        assert_eq!(session.encrypt_round_trip("A").unwrap(), "A");

        let outcome = session.sign_round_trip("A").unwrap();
        assert_eq!(outcome.recovered, BigUint::from(65u8));
        assert_eq!(outcome.text, "A");
        assert!(outcome.matches("A"));
        assert!(!outcome.matches("B"));
    }

    #[test]
    fn textbook_blind_sign() {
        let session = textbook_session();
        for r in [7u32, 11] {
            let outcome = session
                .blind_sign_round_trip_with("A", &mut FixedPrime(r))
                .unwrap();
            assert_eq!(outcome.recovered, BigUint::from(65u8), "r = {r}");
            assert!(outcome.matches("A"));
        }
        assert!(session.blind_sign_round_trip("A").unwrap().matches("A"));
    }

    #[test]
    fn generated_server_key() {
        let signer = LocalSigner::generate(512, 20, 10_000).unwrap();
        let session = Session::connect(signer, &test_config()).unwrap();

        for msg in ["hello world", "blind_sign 42", "x", "Z9 _ z0"] {
            assert_eq!(session.encrypt_round_trip(msg).unwrap(), msg);
            assert!(session.sign_round_trip(msg).unwrap().matches(msg), "case `{msg}`");
            let outcome = session.blind_sign_round_trip(msg).unwrap();
            assert!(outcome.matches(msg), "case `{msg}`");
            assert_eq!(outcome.text, msg);
        }
    }

    #[test]
    fn message_too_long_for_key() {
        let session = textbook_session();
        for e in [
            session.encrypt("AB").unwrap_err(),
            session.encrypt_round_trip("AB").unwrap_err(),
            session.sign_round_trip("AB").unwrap_err(),
            session.blind_sign_round_trip("AB").unwrap_err(),
        ] {
            assert!(matches!(e, ClientError::Cipher(CipherError::OutOfRange { .. })), "{e}");
        }
    }

    #[test]
    fn transport_failures() {
        for (status, processing) in [(Some(500u16), true), (Some(404), false), (None, false)] {
            let t = Failing {
                key: LocalSigner::new(textbook_key()),
                status,
            };
            let session = Session::connect(t, &test_config()).unwrap();

            for e in [
                session.encrypt_round_trip("A").unwrap_err(),
                session.sign_round_trip("A").unwrap_err(),
                session.blind_sign_round_trip("A").unwrap_err(),
            ] {
                match e {
                    ClientError::Processing { status: s, .. } => {
                        assert!(processing);
                        assert_eq!(Some(s), status);
                    }
                    ClientError::SignerUnavailable(_) => assert!(!processing),
                    e => panic!("unexpected {e}"),
                }
            }
        }
    }

    #[test]
    fn forged_replies() {
        // 0x24c is the real signature of "A"
        let session = Session::connect(Forger(LocalSigner::new(textbook_key()), "24d"), &test_config()).unwrap();
        let outcome = session.sign_round_trip("A").unwrap();
        assert!(!outcome.matches("A"));

        let session = Session::connect(Forger(LocalSigner::new(textbook_key()), "zz"), &test_config()).unwrap();
        assert!(matches!(
            session.sign_round_trip("A"),
            Err(ClientError::Decode(EncodeError::InvalidBaseCodeInDec('z')))
        ));
        assert!(matches!(session.decode("ff"), Err(ClientError::Decode(EncodeError::InvalidUtf8(_)))));

        let session = Session::connect(Forger(LocalSigner::new(textbook_key()), "ffff"), &test_config()).unwrap();
        assert!(matches!(
            session.blind_sign_round_trip("A"),
            Err(ClientError::Cipher(CipherError::OutOfRange { .. }))
        ));
    }

    #[test]
    fn invalid_server_key() {
        let bad = LocalSigner::new(PrivateKey::new_uncheck(
            BigUint::from(3233u32),
            BigUint::from(1u32),
            BigUint::from(1u32),
        ));
        assert!(matches!(
            Session::connect(bad, &test_config()),
            Err(ClientError::Cipher(CipherError::InvalidPublicKey(_)))
        ));
    }

    #[test]
    fn outcome_text() {
        assert_eq!(VerificationOutcome::new(BigUint::from(0u8)).text, "");
        assert_eq!(VerificationOutcome::new(BigUint::from(0x41u8)).text, "A");
        assert_eq!(VerificationOutcome::new(BigUint::from(0xffu8)).text, "\u{fffd}");
    }

    #[test]
    fn session_is_shared_across_threads() {
        let session = textbook_session();
        std::thread::scope(|s| {
            for msg in ["A", "B", "C"] {
                let session = &session;
                s.spawn(move || assert!(session.blind_sign_round_trip(msg).unwrap().matches(msg)));
            }
        });
    }
}
