/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains exports for the secure action runtime.

--*/

#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub mod abi;
mod action;
mod dispatcher;
mod drivers;
mod hash;
mod integrity;
mod key;
mod register_access;
mod request;
mod stage;

pub use action::{ActionType, CompanionLib};
pub use dispatcher::{secure_action_entry, DispatchState, DispatchTrace, Dispatcher};
pub use drivers::Drivers;
pub use integrity::{LibraryIntegrity, MeasuredLibraries, MeasuredLibrary, LIB_DIGEST_SIZE};
pub use request::{action_tag, check_arg_shape, padding_range, SecureAction, StageRequest};
pub use stage::{StageHandler, UnsupportedStages};
