/*++

Licensed under the Apache-2.0 license.

File Name:

    log.rs

Abstract:

    File contains a shared access log for the simulated register file.

--*/
use std::{
    cell::{Ref, RefCell},
    fmt::Write,
    ops::Deref,
    rc::Rc,
};

/// Append-only text log that can be written without `&mut self`.
///
/// Clones share the same buffer, so a test can keep a handle to the log of a
/// model that was moved into a driver.
#[derive(Clone, Default)]
pub struct Log {
    log: Rc<RefCell<String>>,
}

impl Log {
    pub fn new() -> Self {
        Self::default()
    }

    /// Access the contents of the log without modifying it.
    pub fn as_str(&self) -> impl Deref<Target = str> + '_ {
        Ref::map(self.log.borrow(), String::as_str)
    }

    /// Empty the log, returning what it held.
    pub fn take(&self) -> String {
        std::mem::take(&mut *self.log.borrow_mut())
    }

    /// Lines beginning with `prefix`
    pub fn count(&self, prefix: &str) -> usize {
        self.log
            .borrow()
            .lines()
            .filter(|line| line.starts_with(prefix))
            .count()
    }

    /// Returns a writer that can be used with write!() or writeln!().
    pub fn w(&self) -> impl Write + '_ {
        LogWriter { log: &self.log }
    }
}

struct LogWriter<'a> {
    log: &'a RefCell<String>,
}

impl Write for LogWriter<'_> {
    fn write_str(&mut self, s: &str) -> std::fmt::Result {
        Write::write_str(&mut *self.log.borrow_mut(), s)
    }
}
