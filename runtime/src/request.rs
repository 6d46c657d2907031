/*++

Licensed under the Apache-2.0 license.

File Name:

    request.rs

Abstract:

    File contains the conversion between the flat request buffer and the
    typed secure action it carries.

--*/

use crate::abi::*;
use crate::action::ActionType;
use core::ops::Range;
use se_drivers::{SeError, SeResult};
use zeroize::Zeroize;

/// Argument structures of the protocol stage actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageRequest {
    StartSession(StartSessionArgs),
    GenerateKmKd(GenerateKmKdArgs),
    ValidateHprime(PrimeArgs),
    ValidateLprime(PrimeArgs),
    GenerateSessionKey(SessionKeyArgs),
    ControlEncryption(ControlEncryptionArgs),
    ValidateVprime(VprimeArgs),
    ValidateMprime(PrimeArgs),
    EndSession(EndSessionArgs),
    SrmRevocation(SrmRevocationArgs),
}

impl StageRequest {
    pub fn action(&self) -> ActionType {
        match self {
            Self::StartSession(_) => ActionType::StartSession,
            Self::GenerateKmKd(_) => ActionType::GenerateKmKd,
            Self::ValidateHprime(_) => ActionType::ValidateHprime,
            Self::ValidateLprime(_) => ActionType::ValidateLprime,
            Self::GenerateSessionKey(_) => ActionType::GenerateSessionKey,
            Self::ControlEncryption(_) => ActionType::ControlEncryption,
            Self::ValidateVprime(_) => ActionType::ValidateVprime,
            Self::ValidateMprime(_) => ActionType::ValidateMprime,
            Self::EndSession(_) => ActionType::EndSession,
            Self::SrmRevocation(_) => ActionType::SrmRevocation,
        }
    }
}

/// A validated secure action request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecureAction {
    RegisterAccess(RegisterAccessArgs),
    HashCompute(HashComputeArgs),
    GenerateKey(GenerateKeyArgs),
    DeriveKey(DeriveKeyArgs),
    Stage(StageRequest),
}

/// Payload bytes, relative to the start of the request, that lie outside
/// the member selected by `action`
pub fn padding_range(action: ActionType) -> Range<usize> {
    PAYLOAD_OFFSET + action.member_len()..REQUEST_SIZE
}

/// Read the action tag of a request
pub fn action_tag(request: &[u8]) -> SeResult<u32> {
    let tag = request
        .get(..PAYLOAD_OFFSET)
        .ok_or(SeError::SECURE_ACTION_INVALID_REQUEST_SIZE)?;
    Ok(u32::from_le_bytes([tag[0], tag[1], tag[2], tag[3]]))
}

/// Check that every request byte outside the selected payload member is
/// zero
///
/// # Arguments
///
/// * `request` - Raw request, `REQUEST_SIZE` bytes
/// * `action` - Action selected by the request tag
pub fn check_arg_shape(request: &[u8], action: ActionType) -> SeResult<()> {
    if request.len() != REQUEST_SIZE {
        return Err(SeError::SECURE_ACTION_INVALID_REQUEST_SIZE);
    }
    if request[padding_range(action)].iter().all(|b| *b == 0) {
        Ok(())
    } else {
        Err(SeError::SECURE_ACTION_ARG_CHECK_FAILED)
    }
}

fn check_len(len: u32, max: usize) -> SeResult<()> {
    if len as usize > max {
        Err(SeError::SECURE_ACTION_INVALID_ARGUMENT)
    } else {
        Ok(())
    }
}

impl SecureAction {
    /// Decode the payload member selected by `action`. Length fields are
    /// bounded by their buffers.
    pub fn parse(action: ActionType, payload: &[u8]) -> SeResult<Self> {
        let parsed = match action {
            ActionType::RegisterAccess => {
                let args: RegisterAccessArgs = read_args(payload)?;
                if args.is_read > 1 {
                    return Err(SeError::SECURE_ACTION_INVALID_ARGUMENT);
                }
                Self::RegisterAccess(args)
            }
            ActionType::HashCompute => {
                let args: HashComputeArgs = read_args(payload)?;
                check_len(args.input_len, HASH_INPUT_MAX)?;
                Self::HashCompute(args)
            }
            ActionType::GenerateKey => {
                let args: GenerateKeyArgs = read_args(payload)?;
                if args.key_len == 0 {
                    return Err(SeError::SECURE_ACTION_INVALID_ARGUMENT);
                }
                check_len(args.key_len, KEY_MAX)?;
                Self::GenerateKey(args)
            }
            ActionType::DeriveKey => {
                let mut args: DeriveKeyArgs = read_args(payload)?;
                if let Err(err) = check_len(args.label_len, DERIVE_LABEL_MAX) {
                    args.zeroize();
                    return Err(err);
                }
                Self::DeriveKey(args)
            }
            ActionType::StartSession => {
                Self::Stage(StageRequest::StartSession(read_args(payload)?))
            }
            ActionType::GenerateKmKd => {
                Self::Stage(StageRequest::GenerateKmKd(read_args(payload)?))
            }
            ActionType::ValidateHprime => {
                Self::Stage(StageRequest::ValidateHprime(read_args(payload)?))
            }
            ActionType::ValidateLprime => {
                Self::Stage(StageRequest::ValidateLprime(read_args(payload)?))
            }
            ActionType::GenerateSessionKey => {
                Self::Stage(StageRequest::GenerateSessionKey(read_args(payload)?))
            }
            ActionType::ControlEncryption => {
                let args: ControlEncryptionArgs = read_args(payload)?;
                if args.enable > 1 {
                    return Err(SeError::SECURE_ACTION_INVALID_ARGUMENT);
                }
                Self::Stage(StageRequest::ControlEncryption(args))
            }
            ActionType::ValidateVprime => {
                Self::Stage(StageRequest::ValidateVprime(read_args(payload)?))
            }
            ActionType::ValidateMprime => {
                Self::Stage(StageRequest::ValidateMprime(read_args(payload)?))
            }
            ActionType::EndSession => {
                Self::Stage(StageRequest::EndSession(read_args(payload)?))
            }
            ActionType::SrmRevocation => {
                let args: SrmRevocationArgs = read_args(payload)?;
                check_len(args.srm_len, SRM_MAX)?;
                Self::Stage(StageRequest::SrmRevocation(args))
            }
        };
        Ok(parsed)
    }

    /// Write the (possibly updated) argument member back into the payload
    pub fn encode(&self, payload: &mut [u8]) -> SeResult<()> {
        match self {
            Self::RegisterAccess(args) => write_args(payload, args),
            Self::HashCompute(args) => write_args(payload, args),
            Self::GenerateKey(args) => write_args(payload, args),
            Self::DeriveKey(args) => write_args(payload, args),
            Self::Stage(stage) => match stage {
                StageRequest::StartSession(args) => write_args(payload, args),
                StageRequest::GenerateKmKd(args) => write_args(payload, args),
                StageRequest::ValidateHprime(args)
                | StageRequest::ValidateLprime(args)
                | StageRequest::ValidateMprime(args) => write_args(payload, args),
                StageRequest::GenerateSessionKey(args) => write_args(payload, args),
                StageRequest::ControlEncryption(args) => write_args(payload, args),
                StageRequest::ValidateVprime(args) => write_args(payload, args),
                StageRequest::EndSession(args) => write_args(payload, args),
                StageRequest::SrmRevocation(args) => write_args(payload, args),
            },
        }
    }

    /// Clear key material held by the decoded request
    pub fn scrub(&mut self) {
        match self {
            Self::GenerateKey(args) => args.zeroize(),
            Self::DeriveKey(args) => args.zeroize(),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zerocopy::IntoBytes;

    fn request(action: ActionType) -> [u8; REQUEST_SIZE] {
        let mut req = [0u8; REQUEST_SIZE];
        req[..4].copy_from_slice(&u32::from(action).to_le_bytes());
        req
    }

    #[test]
    fn test_padding_range() {
        assert_eq!(padding_range(ActionType::RegisterAccess), 16..REQUEST_SIZE);
        assert_eq!(padding_range(ActionType::HashCompute), REQUEST_SIZE..REQUEST_SIZE);
        assert_eq!(padding_range(ActionType::ValidateHprime), 40..REQUEST_SIZE);
        assert_eq!(padding_range(ActionType::EndSession), REQUEST_SIZE..REQUEST_SIZE);
    }

    #[test]
    fn test_check_arg_shape() {
        let mut req = request(ActionType::RegisterAccess);
        req[4..16].fill(0xff);
        assert_eq!(check_arg_shape(&req, ActionType::RegisterAccess), Ok(()));

        req[16] = 1;
        assert_eq!(
            check_arg_shape(&req, ActionType::RegisterAccess),
            Err(SeError::SECURE_ACTION_ARG_CHECK_FAILED)
        );

        req[16] = 0;
        req[REQUEST_SIZE - 1] = 1;
        assert_eq!(
            check_arg_shape(&req, ActionType::RegisterAccess),
            Err(SeError::SECURE_ACTION_ARG_CHECK_FAILED)
        );
        assert_eq!(check_arg_shape(&req, ActionType::HashCompute), Ok(()));
        assert_eq!(
            check_arg_shape(&req[..REQUEST_SIZE - 1], ActionType::HashCompute),
            Err(SeError::SECURE_ACTION_INVALID_REQUEST_SIZE)
        );
    }

    #[test]
    fn test_action_tag() {
        let req = request(ActionType::SrmRevocation);
        assert_eq!(action_tag(&req), Ok(0x109));
        assert_eq!(
            action_tag(&req[..3]),
            Err(SeError::SECURE_ACTION_INVALID_REQUEST_SIZE)
        );
    }

    #[test]
    fn test_parse_bounds_lengths() {
        let mut payload = [0u8; PAYLOAD_SIZE];
        payload[..4].copy_from_slice(&129u32.to_le_bytes());
        assert_eq!(
            SecureAction::parse(ActionType::HashCompute, &payload),
            Err(SeError::SECURE_ACTION_INVALID_ARGUMENT)
        );
        payload[..4].copy_from_slice(&128u32.to_le_bytes());
        assert!(SecureAction::parse(ActionType::HashCompute, &payload).is_ok());

        assert_eq!(
            SecureAction::parse(ActionType::GenerateKey, &[0u8; PAYLOAD_SIZE]),
            Err(SeError::SECURE_ACTION_INVALID_ARGUMENT)
        );

        let mut payload = [0u8; PAYLOAD_SIZE];
        payload[..4].copy_from_slice(&161u32.to_le_bytes());
        assert_eq!(
            SecureAction::parse(ActionType::SrmRevocation, &payload),
            Err(SeError::SECURE_ACTION_INVALID_ARGUMENT)
        );

        let mut payload = [0u8; PAYLOAD_SIZE];
        payload[..4].copy_from_slice(&2u32.to_le_bytes());
        assert_eq!(
            SecureAction::parse(ActionType::RegisterAccess, &payload),
            Err(SeError::SECURE_ACTION_INVALID_ARGUMENT)
        );
    }

    #[test]
    fn test_parse_stage() {
        let args = PrimeArgs {
            session_id: 7,
            prime: [0x5a; PRIME_SIZE],
        };
        let mut payload = [0u8; PAYLOAD_SIZE];
        payload[..args.as_bytes().len()].copy_from_slice(args.as_bytes());
        let parsed = SecureAction::parse(ActionType::ValidateLprime, &payload).unwrap();
        assert_eq!(
            parsed,
            SecureAction::Stage(StageRequest::ValidateLprime(args.clone()))
        );

        let mut out = [0u8; PAYLOAD_SIZE];
        parsed.encode(&mut out).unwrap();
        assert_eq!(out, payload);
    }

    #[test]
    fn test_scrub() {
        let mut action = SecureAction::GenerateKey(GenerateKeyArgs {
            key_len: 16,
            key: [0xaa; KEY_MAX],
        });
        action.scrub();
        assert_eq!(action, SecureAction::GenerateKey(GenerateKeyArgs::default()));
    }
}
