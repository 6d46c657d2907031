// Licensed under the Apache-2.0 license

use crate::abi::RegisterAccessArgs;
use crate::drivers::Drivers;
use se_drivers::{Csb, SeResult};

pub struct RegisterAccessCmd;
impl RegisterAccessCmd {
    pub(crate) fn execute<C: Csb>(
        drivers: &mut Drivers<C>,
        args: &mut RegisterAccessArgs,
    ) -> SeResult<()> {
        if args.is_read != 0 {
            args.val = drivers.bus.read(args.addr)?;
        } else {
            drivers.bus.write(args.addr, args.val)?;
        }
        Ok(())
    }
}
