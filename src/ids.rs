use chrono::Utc;
use uuid::Uuid;

use crate::error::ConfigError;

/// Random bits a v4 UUID carries once its version and variant bits are removed.
pub const MAX_ID_BITS: u32 = 122;

/// Bits of randomness appended to every generated id unless configured otherwise.
pub const DEFAULT_ID_BITS: u32 = MAX_ID_BITS;

/// Source of unique poll identifiers.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Time-prefixed ids: milliseconds since the epoch in hex, then `bits` random bits.
#[derive(Debug, Clone, Copy)]
pub struct TimeIdGenerator {
    bits: u32,
}

impl TimeIdGenerator {
    pub fn new(bits: u32) -> Result<Self, ConfigError> {
        if bits == 0 || bits > MAX_ID_BITS {
            return Err(ConfigError::InvalidIdBits);
        }
        Ok(Self { bits })
    }

    pub fn bits(&self) -> u32 {
        self.bits
    }

    fn random_bits(&self) -> u128 {
        let raw = Uuid::new_v4().as_u128();
        // skip the variant (bits 62-63) and version (bits 76-79) fields
        let low = raw & ((1u128 << 62) - 1);
        let middle = (raw >> 64) & 0xfff;
        let high = raw >> 80;
        let packed = low | (middle << 62) | (high << 74);
        packed & ((1u128 << self.bits) - 1)
    }
}

impl Default for TimeIdGenerator {
    fn default() -> Self {
        Self { bits: DEFAULT_ID_BITS }
    }
}

impl IdGenerator for TimeIdGenerator {
    fn generate(&self) -> String {
        let millis = Utc::now().timestamp_millis().max(0) as u64;
        let width = self.bits.div_ceil(4) as usize;
        format!("{:x}{:0width$x}", millis, self.random_bits(), width = width)
    }
}
