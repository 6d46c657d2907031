/*++

Licensed under the Apache-2.0 license.

File Name:

    printer.rs

Abstract:

    File contains support routines and macros to print driver diagnostics

--*/
use core::convert::Infallible;
use ufmt::uWrite;

#[derive(Default)]
pub struct Printer;

impl uWrite for Printer {
    type Error = Infallible;

    /// Writes a string slice into this writer, returning whether the write succeeded.
    fn write_str(&mut self, _str: &str) -> Result<(), Self::Error> {
        cfg_if::cfg_if! {
            if #[cfg(any(test, feature = "std"))] {
                extern crate std;
                std::print!("{_str}");
            }
        }
        Ok(())
    }
}

#[macro_export]
macro_rules! cprint {
    ($($tt:tt)*) => {{
        let _ = ufmt::uwrite!(&mut $crate::printer::Printer::default(), $($tt)*);
    }}
}

#[macro_export]
macro_rules! cprintln {
    ($($tt:tt)*) => {{
        let _ = ufmt::uwriteln!(&mut $crate::printer::Printer::default(), $($tt)*);
    }}
}
