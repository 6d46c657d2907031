// Licensed under the Apache-2.0 license

use crate::drivers::Drivers;
use crate::request::StageRequest;
use se_drivers::{Csb, SeError, SeResult};

/// Implements the HDCP protocol stages. The dispatcher hands over the
/// validated arguments; fields the handler updates are copied back into
/// the caller's request when it succeeds.
pub trait StageHandler<C: Csb> {
    fn handle(&mut self, drivers: &mut Drivers<C>, stage: &mut StageRequest) -> SeResult<()>;
}

/// Stage handler for builds without protocol support
pub struct UnsupportedStages;

impl<C: Csb> StageHandler<C> for UnsupportedStages {
    fn handle(&mut self, _drivers: &mut Drivers<C>, _stage: &mut StageRequest) -> SeResult<()> {
        Err(SeError::SECURE_ACTION_STAGE_FAILED)
    }
}
