/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains exports for the security engine software model used to
    exercise the drivers off-target.

--*/

mod log;
mod math;
mod model;
mod mutex;
mod pka;
mod trng;

pub use log::Log;
pub use model::{SeModel, TIMER_TICK_NS};
pub use mutex::MutexModel;
pub use pka::{PkaModel, STOP_MONTGOMERY_MISMATCH};
pub use trng::TrngModel;
