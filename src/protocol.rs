//! One blind signature run against a signer that never sees the message.
//!
//! ```text
//! Start -> GenerateBlindingFactor -> Blind -> Delegate -> Unblind -> Verify -> Done
//! ```
//!
//! Any error ends the run as `Failed`. Nothing is retried here, a new run draws a new
//! blinding factor.

use crate::transport::{MessagePayload, Transport};
use crate::ClientError;
use cipher::rsa::{BlindingFactor, PrimeSource, PublicKey};
use encode::{hex_to_integer, integer_to_hex};
use num_bigint::BigUint;
use std::fmt::Display;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlindStep {
    Start,
    GenerateBlindingFactor,
    Blind,
    Delegate,
    Unblind,
    Verify,
    Done,
    Failed,
}

impl Display for BlindStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Start => "start",
            Self::GenerateBlindingFactor => "generate blinding factor",
            Self::Blind => "blind",
            Self::Delegate => "delegate",
            Self::Unblind => "unblind",
            Self::Verify => "verify",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

pub struct BlindSignProtocol<'a> {
    pk: &'a PublicKey,
    blinding_attempts: usize,
}

impl<'a> BlindSignProtocol<'a> {
    pub fn new(pk: &'a PublicKey, blinding_attempts: usize) -> Self {
        Self {
            pk,
            blinding_attempts,
        }
    }

    /// Get `m` signed through `transport` and return what the unblinded signature verifies
    /// to. The caller decides whether that matches `m`.
    pub fn run<T, P>(&self, m: &BigUint, transport: &T, source: &mut P) -> Result<BigUint, ClientError>
    where
        T: Transport + ?Sized,
        P: PrimeSource + ?Sized,
    {
        let mut step = BlindStep::Start;
        let res = self.steps(m, transport, source, &mut step);

        match &res {
            Ok(_) => log::trace!("blind sign: {}", BlindStep::Done),
            Err(e) => log::warn!("blind sign: {} at `{step}`, {e}", BlindStep::Failed),
        }

        res
    }

    fn steps<T, P>(
        &self,
        m: &BigUint,
        transport: &T,
        source: &mut P,
        step: &mut BlindStep,
    ) -> Result<BigUint, ClientError>
    where
        T: Transport + ?Sized,
        P: PrimeSource + ?Sized,
    {
        log::trace!("blind sign: {step}, message of {} bits", m.bits());
        self.pk.check_range(m)?;

        *step = BlindStep::GenerateBlindingFactor;
        log::trace!("blind sign: {step}");
        let factor = BlindingFactor::generate(self.pk, source, self.blinding_attempts)?;

        *step = BlindStep::Blind;
        log::trace!("blind sign: {step}");
        let b = self.pk.blind(m, &factor)?;

        *step = BlindStep::Delegate;
        log::trace!("blind sign: {step}");
        let reply = transport.sign(&MessagePayload::new(integer_to_hex(&b)))?;

        *step = BlindStep::Unblind;
        log::trace!("blind sign: {step}");
        let bs = hex_to_integer(&reply.msg)?;
        let s = self.pk.unblind(&bs, &factor)?;
        drop(factor);

        *step = BlindStep::Verify;
        log::trace!("blind sign: {step}");
        Ok(self.pk.verify_transform(&s)?)
    }
}
