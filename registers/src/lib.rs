/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains the control-status-bus capability and the register map of
    the security engine.

--*/
#![no_std]

pub mod csb;
pub mod se;

/// Fault raised by the control-status bus itself.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CsbError {
    /// Load from a CSB register faulted
    ReadFault,

    /// Store to a CSB register faulted
    WriteFault,
}

/// Raw access to the processor's control-status bus. Production code talks to
/// the hardware through [`RealCsb`]; tests substitute a simulated register
/// file.
pub trait Csb {
    /// Read a 32-bit register
    ///
    /// # Arguments
    ///
    /// * `addr` - CSB address to read from
    fn read(&mut self, addr: u32) -> Result<u32, CsbError>;

    /// Write a 32-bit register
    ///
    /// # Arguments
    ///
    /// * `addr` - CSB address to write
    /// * `val` - Data to write
    fn write(&mut self, addr: u32, val: u32) -> Result<(), CsbError>;
}

impl<T: Csb + ?Sized> Csb for &mut T {
    fn read(&mut self, addr: u32) -> Result<u32, CsbError> {
        T::read(self, addr)
    }

    fn write(&mut self, addr: u32, val: u32) -> Result<(), CsbError> {
        T::write(self, addr, val)
    }
}

/// Memory mapped CSB window.
pub struct RealCsb {
    base: usize,
}

impl RealCsb {
    /// Create a CSB accessor rooted at `base`
    ///
    /// # Safety
    ///
    /// `base` must be the address of the processor's CSB window and no other
    /// accessor may be used concurrently.
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }
}

impl Csb for RealCsb {
    fn read(&mut self, addr: u32) -> Result<u32, CsbError> {
        let ptr = (self.base + addr as usize) as *const u32;
        Ok(unsafe { core::ptr::read_volatile(ptr) })
    }

    fn write(&mut self, addr: u32, val: u32) -> Result<(), CsbError> {
        let ptr = (self.base + addr as usize) as *mut u32;
        unsafe { core::ptr::write_volatile(ptr, val) };
        Ok(())
    }
}
