// Licensed under the Apache-2.0 license

use crate::abi::HashComputeArgs;
use se_drivers::{SeError, SeResult};
use sha2::{Digest, Sha256};

pub struct HashComputeCmd;
impl HashComputeCmd {
    /// SHA-256 of the first `input_len` bytes of `input`
    pub(crate) fn execute(args: &mut HashComputeArgs) -> SeResult<()> {
        let input = args
            .input
            .get(..args.input_len as usize)
            .ok_or(SeError::SECURE_ACTION_INVALID_ARGUMENT)?;
        let digest = Sha256::digest(input);
        args.digest.copy_from_slice(&digest);
        Ok(())
    }
}
