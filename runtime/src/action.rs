/*++

Licensed under the Apache-2.0 license.

File Name:

    action.rs

Abstract:

    File contains the secure action tags and the per-action properties the
    dispatcher checks before touching a request.

--*/

use crate::abi::*;
use core::mem::size_of;
use se_drivers::SeError;

bitflags::bitflags! {
    /// Companion libraries whose integrity an action depends on
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CompanionLib: u32 {
        const SE = 1 << 0;
        const SHA = 1 << 1;
        const BIGINT = 1 << 2;
    }
}

#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionType {
    RegisterAccess = 0x1,
    HashCompute = 0x2,
    GenerateKey = 0x3,
    DeriveKey = 0x4,

    // HDCP 2.2 protocol stages
    StartSession = 0x100,
    GenerateKmKd = 0x101,
    ValidateHprime = 0x102,
    ValidateLprime = 0x103,
    GenerateSessionKey = 0x104,
    ControlEncryption = 0x105,
    ValidateVprime = 0x106,
    ValidateMprime = 0x107,
    EndSession = 0x108,
    SrmRevocation = 0x109,
}

impl ActionType {
    pub const ALL: [Self; 14] = [
        Self::RegisterAccess,
        Self::HashCompute,
        Self::GenerateKey,
        Self::DeriveKey,
        Self::StartSession,
        Self::GenerateKmKd,
        Self::ValidateHprime,
        Self::ValidateLprime,
        Self::GenerateSessionKey,
        Self::ControlEncryption,
        Self::ValidateVprime,
        Self::ValidateMprime,
        Self::EndSession,
        Self::SrmRevocation,
    ];

    /// Libraries that must pass their integrity check before the action runs
    pub const fn required_libs(self) -> CompanionLib {
        match self {
            Self::RegisterAccess
            | Self::GenerateKey
            | Self::ControlEncryption
            | Self::EndSession => CompanionLib::SE,
            Self::HashCompute
            | Self::DeriveKey
            | Self::StartSession
            | Self::ValidateHprime
            | Self::ValidateLprime
            | Self::GenerateSessionKey
            | Self::ValidateVprime
            | Self::ValidateMprime => CompanionLib::SE.union(CompanionLib::SHA),
            Self::GenerateKmKd | Self::SrmRevocation => CompanionLib::SE
                .union(CompanionLib::SHA)
                .union(CompanionLib::BIGINT),
        }
    }

    /// Bytes of the payload union owned by this action's argument member.
    /// Every payload byte past this length must be zero.
    pub const fn member_len(self) -> usize {
        match self {
            Self::RegisterAccess => size_of::<RegisterAccessArgs>(),
            Self::HashCompute => size_of::<HashComputeArgs>(),
            Self::GenerateKey => size_of::<GenerateKeyArgs>(),
            Self::DeriveKey => size_of::<DeriveKeyArgs>(),
            Self::StartSession => size_of::<StartSessionArgs>(),
            Self::GenerateKmKd => size_of::<GenerateKmKdArgs>(),
            Self::ValidateHprime | Self::ValidateLprime | Self::ValidateMprime => {
                size_of::<PrimeArgs>()
            }
            Self::GenerateSessionKey => size_of::<SessionKeyArgs>(),
            Self::ControlEncryption => size_of::<ControlEncryptionArgs>(),
            Self::ValidateVprime => size_of::<VprimeArgs>(),
            // Deployed firmware checks END_SESSION against the SRM
            // revocation extent rather than its own member. Kept as is until
            // the intended range is confirmed against the hardware manual.
            Self::EndSession => size_of::<SrmRevocationArgs>(),
            Self::SrmRevocation => size_of::<SrmRevocationArgs>(),
        }
    }

    /// True for actions handled by an external protocol stage handler
    pub const fn is_stage(self) -> bool {
        (self as u32) >= Self::StartSession as u32
    }
}

impl TryFrom<u32> for ActionType {
    type Error = SeError;

    fn try_from(val: u32) -> Result<Self, SeError> {
        Self::ALL
            .iter()
            .copied()
            .find(|action| *action as u32 == val)
            .ok_or(SeError::SECURE_ACTION_INVALID_ACTION)
    }
}

impl From<ActionType> for u32 {
    fn from(val: ActionType) -> Self {
        val as u32
    }
}
