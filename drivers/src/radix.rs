/*++

Licensed under the Apache-2.0 license.

File Name:

    radix.rs

Abstract:

    File contains the mapping from requested key sizes to PKA radix classes
    and the operand memory layout that follows from it.

--*/

use se_error::{SeError, SeResult};
use se_registers::se::pka::{
    BANK_SIZE, BANK_START_A, BANK_START_B, BANK_START_C, BANK_START_D, CONTROL_BASE_RADIX_SHIFT,
};

/// Native operand widths of the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RadixClass {
    R256,
    R512,
    R1024,
    R2048,
    R4096,
}

impl RadixClass {
    const ALL: [RadixClass; 5] = [
        RadixClass::R256,
        RadixClass::R512,
        RadixClass::R1024,
        RadixClass::R2048,
        RadixClass::R4096,
    ];

    pub const fn bits(self) -> u32 {
        match self {
            Self::R256 => 256,
            Self::R512 => 512,
            Self::R1024 => 1024,
            Self::R2048 => 2048,
            Self::R4096 => 4096,
        }
    }

    /// Encoding of the class in the control register's base radix field
    pub const fn base_radix_code(self) -> u32 {
        match self {
            Self::R256 => 2,
            Self::R512 => 3,
            Self::R1024 => 4,
            Self::R2048 => 5,
            Self::R4096 => 6,
        }
    }
}

/// Key sizes the drivers accept
pub const SUPPORTED_KEY_SIZES: [u32; 6] = [256, 512, 1024, 2048, 3072, 4096];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RadixConfig {
    pub requested_bits: u32,

    /// 32-bit words per operand slot
    pub word_count: u32,
    pub radix_class: RadixClass,

    /// Requested size in words when smaller than the class, zero otherwise
    pub partial_radix_mask: u32,
}

impl RadixConfig {
    /// Map a key size onto the smallest radix class that holds it
    ///
    /// # Arguments
    ///
    /// * `key_size_bits` - One of [`SUPPORTED_KEY_SIZES`]
    pub fn configure(key_size_bits: u32) -> SeResult<Self> {
        if !SUPPORTED_KEY_SIZES.contains(&key_size_bits) {
            return Err(SeError::DRIVER_PKA_INVALID_KEY_SIZE);
        }
        let radix_class = RadixClass::ALL
            .into_iter()
            .find(|class| class.bits() >= key_size_bits)
            .ok_or(SeError::DRIVER_PKA_INVALID_KEY_SIZE)?;

        let partial_radix_mask = if key_size_bits < radix_class.bits() {
            key_size_bits / 32
        } else {
            0
        };

        Ok(Self {
            requested_bits: key_size_bits,
            word_count: radix_class.bits() / 32,
            radix_class,
            partial_radix_mask,
        })
    }

    /// Words in the caller's operand representation
    pub fn requested_words(&self) -> usize {
        (self.requested_bits / 32) as usize
    }

    /// Words in one operand slot
    pub fn slot_words(&self) -> usize {
        self.word_count as usize
    }

    /// Radix fields of the control register, without the go bit
    pub fn control_bits(&self) -> u32 {
        (self.radix_class.base_radix_code() << CONTROL_BASE_RADIX_SHIFT) | self.partial_radix_mask
    }

    /// Secure bus address of an operand slot
    pub fn bank_address(&self, slot: OperandBankRef) -> u32 {
        let offset = slot.index * 4 * self.word_count;
        debug_assert!(offset + 4 * self.word_count <= BANK_SIZE);
        slot.bank.start() + offset
    }
}

/// Free function form of [`RadixConfig::configure`]
pub fn configure_radix(key_size_bits: u32) -> SeResult<RadixConfig> {
    RadixConfig::configure(key_size_bits)
}

/// Operand memory banks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bank {
    A,
    B,
    C,
    D,
}

impl Bank {
    pub const fn start(self) -> u32 {
        match self {
            Self::A => BANK_START_A,
            Self::B => BANK_START_B,
            Self::C => BANK_START_C,
            Self::D => BANK_START_D,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperandBankRef {
    pub bank: Bank,
    pub index: u32,
}

impl OperandBankRef {
    pub const fn new(bank: Bank, index: u32) -> Self {
        Self { bank, index }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radix_table() {
        let expected = [
            (256, RadixClass::R256, 8, 0),
            (512, RadixClass::R512, 16, 0),
            (1024, RadixClass::R1024, 32, 0),
            (2048, RadixClass::R2048, 64, 0),
            (3072, RadixClass::R4096, 128, 96),
            (4096, RadixClass::R4096, 128, 0),
        ];
        for (bits, class, words, partial) in expected {
            let config = configure_radix(bits).unwrap();
            assert_eq!(config.radix_class, class, "key size {bits}");
            assert_eq!(config.word_count, words, "key size {bits}");
            assert_eq!(config.partial_radix_mask, partial, "key size {bits}");
            assert_eq!(config.requested_bits, bits);
        }
    }

    #[test]
    fn test_rejects_unlisted_sizes() {
        for bits in [0, 128, 255, 384, 521, 8192] {
            assert_eq!(
                configure_radix(bits),
                Err(SeError::DRIVER_PKA_INVALID_KEY_SIZE)
            );
        }
    }

    #[test]
    fn test_control_bits() {
        assert_eq!(configure_radix(256).unwrap().control_bits(), 2 << 8);
        assert_eq!(configure_radix(3072).unwrap().control_bits(), (6 << 8) | 96);
    }

    #[test]
    fn test_bank_address() {
        let config = configure_radix(256).unwrap();
        assert_eq!(
            config.bank_address(OperandBankRef::new(Bank::D, 7)),
            BANK_START_D + 7 * 32
        );
        let config = configure_radix(1024).unwrap();
        assert_eq!(
            config.bank_address(OperandBankRef::new(Bank::B, 2)),
            BANK_START_B + 2 * 128
        );
    }
}
