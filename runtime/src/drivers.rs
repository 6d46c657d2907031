// Licensed under the Apache-2.0 license

use se_drivers::{Csb, Pka, SecureBus, SecurityContext, Trng};

/// Engine drivers available to secure action handlers
pub struct Drivers<C: Csb> {
    pub bus: SecureBus<C>,

    /// Random Number Generator
    pub trng: Trng,
}

impl<C: Csb> Drivers<C> {
    pub fn new(csb: C, ctx: SecurityContext) -> Self {
        Self {
            bus: SecureBus::new(csb, ctx),
            trng: Trng::new(),
        }
    }

    /// PKA engine on the shared transport
    pub fn pka(&mut self) -> Pka<'_, C> {
        Pka::new(&mut self.bus)
    }
}
