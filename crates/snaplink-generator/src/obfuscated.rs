use crate::{into_generation_error, Generator};
use snaplink_core::base58::ShortCodeBase58;
use snaplink_core::{GenerationError, ShortCode};
use snaplink_tinyflake::{Clock, SystemClock, TinyId, Tinyflake, TinyflakeSettings};
use typed_builder::TypedBuilder;

const LOWER_48_BITS_MASK: u64 = (1_u64 << 48) - 1;

/// Scrambles a [`TinyId`] so consecutive ids don't look consecutive.
///
/// The id is multiplied by an odd constant and XORed with a mask, both modulo
/// 2^48. Each step is a bijection on 48-bit values, so distinct ids always
/// map to distinct outputs.
#[derive(Debug, Clone, Copy, TypedBuilder)]
pub struct Obfuscator {
    /// Forced odd; an even multiplier would lose the low bit.
    #[builder(default = 0x5_DEEC_E66D, setter(transform = |prime: u64| prime | 1))]
    prime: u64,
    #[builder(default = 0xDEAD_BEEF_CAFE, setter(transform = |mask: u64| mask & LOWER_48_BITS_MASK))]
    mask: u64,
}

impl Default for Obfuscator {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Obfuscator {
    pub fn prime(&self) -> u64 {
        self.prime
    }

    pub fn mask(&self) -> u64 {
        self.mask
    }

    pub fn obfuscate(&self, id: TinyId) -> ObfuscatedTinyId {
        ObfuscatedTinyId {
            value: self.scramble(id.as_u64()),
        }
    }

    fn scramble(&self, source: u64) -> u64 {
        (source.wrapping_mul(self.prime) ^ self.mask) & LOWER_48_BITS_MASK
    }
}

/// A [`TinyId`] after obfuscation, kept in the low 48 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObfuscatedTinyId {
    value: u64,
}

impl ObfuscatedTinyId {
    /// Big-endian bytes of the 48-bit value.
    pub fn to_bytes(self) -> [u8; 6] {
        let raw = self.value.to_be_bytes();
        [raw[2], raw[3], raw[4], raw[5], raw[6], raw[7]]
    }
}

impl From<ObfuscatedTinyId> for ShortCodeBase58 {
    fn from(id: ObfuscatedTinyId) -> Self {
        ShortCodeBase58::new(id.to_bytes())
    }
}

impl From<ObfuscatedTinyId> for ShortCode {
    fn from(id: ObfuscatedTinyId) -> Self {
        ShortCode::generated(id)
    }
}

/// A [`Tinyflake`] whose ids go through an [`Obfuscator`] before encoding.
pub struct ObfuscatedTinyflake<C: Clock> {
    inner: Tinyflake<C>,
    obfuscator: Obfuscator,
}

impl ObfuscatedTinyflake<SystemClock> {
    pub fn new(
        settings: TinyflakeSettings,
        obfuscator: Obfuscator,
    ) -> Result<Self, snaplink_tinyflake::Error> {
        Ok(Self::from_parts(Tinyflake::new(settings)?, obfuscator))
    }
}

impl<C: Clock> ObfuscatedTinyflake<C> {
    pub fn from_parts(inner: Tinyflake<C>, obfuscator: Obfuscator) -> Self {
        Self { inner, obfuscator }
    }

    pub fn next_obfuscated_id(&self) -> Result<ObfuscatedTinyId, snaplink_tinyflake::Error> {
        let id = self.inner.next_id()?;
        Ok(self.obfuscator.obfuscate(id))
    }
}

impl<C: Clock + 'static> Generator for ObfuscatedTinyflake<C> {
    type Output = ObfuscatedTinyId;

    fn generate(&self) -> Result<Self::Output, GenerationError> {
        self.next_obfuscated_id().map_err(into_generation_error)
    }
}
