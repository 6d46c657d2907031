/*++

Licensed under the Apache-2.0 license.

File Name:

    dispatcher.rs

Abstract:

    File contains the secure action dispatcher: the single entry point
    other subsystems use to reach the security engine from secure mode.

--*/

use crate::abi::{PAYLOAD_OFFSET, REQUEST_SIZE};
use crate::action::ActionType;
use crate::drivers::Drivers;
use crate::hash::HashComputeCmd;
use crate::integrity::LibraryIntegrity;
use crate::key::{DeriveKeyCmd, GenerateKeyCmd};
use crate::register_access::RegisterAccessCmd;
use crate::request::{action_tag, check_arg_shape, SecureAction};
use crate::stage::StageHandler;
use se_drivers::{cprintln, first_error, status_code, Csb, SeError, SeResult};
use se_registers::csb::{
    Sctl, LOCKDOWN_OVERRIDE, LOCKDOWN_OVERRIDE_DISENGAGED, LOCKDOWN_OVERRIDE_ENGAGED, SCTL,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    /// Boundary crossed; privilege checked and lockdown engaged
    Entered,

    /// Companion libraries required by the action passed
    LibsValidated,

    /// Request bytes outside the action's member are zero
    PreChecked,

    /// Routed to the action handler
    Dispatched,

    /// Teardown done
    Exited,
}

const MAX_STATES: usize = 5;

/// States visited by the last dispatch, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchTrace {
    states: [DispatchState; MAX_STATES],
    len: usize,
}

impl Default for DispatchTrace {
    fn default() -> Self {
        Self {
            states: [DispatchState::Exited; MAX_STATES],
            len: 0,
        }
    }
}

impl DispatchTrace {
    fn enter(&mut self, state: DispatchState) {
        if let Some(slot) = self.states.get_mut(self.len) {
            *slot = state;
            self.len += 1;
        }
    }

    pub fn path(&self) -> &[DispatchState] {
        &self.states[..self.len]
    }

    /// Most recent state, `None` before the first dispatch
    pub fn state(&self) -> Option<DispatchState> {
        self.path().last().copied()
    }
}

/// Secure action dispatcher
pub struct Dispatcher<L, S> {
    libs: L,
    stages: S,
    trace: DispatchTrace,
}

impl<L: LibraryIntegrity, S> Dispatcher<L, S> {
    pub fn new(libs: L, stages: S) -> Self {
        Self {
            libs,
            stages,
            trace: DispatchTrace::default(),
        }
    }

    pub fn trace(&self) -> &DispatchTrace {
        &self.trace
    }

    pub fn stages(&self) -> &S {
        &self.stages
    }

    /// Validate and execute one secure action request
    ///
    /// On success, output fields of the selected member are written back
    /// into `request`. On failure `request` is left untouched. The
    /// lockdown override engaged on entry is always disengaged before
    /// returning.
    ///
    /// # Arguments
    ///
    /// * `drivers` - Engine drivers
    /// * `request` - Raw request, `REQUEST_SIZE` bytes
    pub fn dispatch<C: Csb>(&mut self, drivers: &mut Drivers<C>, request: &mut [u8]) -> SeResult<()>
    where
        S: StageHandler<C>,
    {
        self.trace = DispatchTrace::default();
        self.trace.enter(DispatchState::Entered);

        let mut engaged = false;
        let result = self.run(drivers, request, &mut engaged);
        let teardown = if engaged {
            drivers
                .bus
                .csb_write(LOCKDOWN_OVERRIDE, LOCKDOWN_OVERRIDE_DISENGAGED)
        } else {
            Ok(())
        };
        self.trace.enter(DispatchState::Exited);

        let result = first_error(result, teardown);
        if let Err(err) = result {
            cprintln!("[sa] request failed 0x{:08x}", u32::from(err));
        }
        result
    }

    fn run<C: Csb>(
        &mut self,
        drivers: &mut Drivers<C>,
        request: &mut [u8],
        engaged: &mut bool,
    ) -> SeResult<()>
    where
        S: StageHandler<C>,
    {
        Self::check_privilege(drivers)?;
        drivers
            .bus
            .csb_write(LOCKDOWN_OVERRIDE, LOCKDOWN_OVERRIDE_ENGAGED)?;
        *engaged = true;

        if request.len() != REQUEST_SIZE {
            return Err(SeError::SECURE_ACTION_INVALID_REQUEST_SIZE);
        }
        let action = ActionType::try_from(action_tag(request)?)?;

        self.libs.validate_all(action.required_libs())?;
        self.trace.enter(DispatchState::LibsValidated);

        check_arg_shape(request, action)?;
        self.trace.enter(DispatchState::PreChecked);

        let payload = &mut request[PAYLOAD_OFFSET..];
        let mut parsed = SecureAction::parse(action, payload)?;

        self.trace.enter(DispatchState::Dispatched);
        let result = self
            .execute(drivers, &mut parsed)
            .and_then(|()| parsed.encode(payload));
        parsed.scrub();
        result
    }

    fn check_privilege<C: Csb>(drivers: &mut Drivers<C>) -> SeResult<()> {
        let mode = drivers.bus.context().level.sctl_mode();
        let sctl = Sctl::from_bits_truncate(drivers.bus.csb_read(SCTL)?);
        if !sctl.contains(mode) {
            cprintln!("[sa] caller not in secure mode, sctl 0x{:08x}", sctl.bits());
            return Err(SeError::SECURE_ACTION_NOT_PRIVILEGED);
        }
        Ok(())
    }

    fn execute<C: Csb>(&mut self, drivers: &mut Drivers<C>, action: &mut SecureAction) -> SeResult<()>
    where
        S: StageHandler<C>,
    {
        match action {
            SecureAction::RegisterAccess(args) => RegisterAccessCmd::execute(drivers, args),
            SecureAction::HashCompute(args) => HashComputeCmd::execute(args),
            SecureAction::GenerateKey(args) => GenerateKeyCmd::execute(drivers, args),
            SecureAction::DeriveKey(args) => DeriveKeyCmd::execute(args),
            SecureAction::Stage(stage) => self.stages.handle(drivers, stage),
        }
    }
}

/// Privilege boundary entry point. Returns zero on success, otherwise the
/// failure's status code.
pub fn secure_action_entry<C, L, S>(
    dispatcher: &mut Dispatcher<L, S>,
    drivers: &mut Drivers<C>,
    request: &mut [u8],
) -> u32
where
    C: Csb,
    L: LibraryIntegrity,
    S: StageHandler<C>,
{
    status_code(&dispatcher.dispatch(drivers, request))
}
