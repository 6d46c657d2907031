/*++

Licensed under the Apache-2.0 license.

File Name:

    wait.rs

Abstract:

    File contains common functions to implement wait routines.

--*/

use crate::SeResult;

/// Busy-wait until `predicate` reports true. A failing poll ends the wait.
pub fn until<F>(mut predicate: F) -> SeResult<()>
where
    F: FnMut() -> SeResult<bool>,
{
    while !predicate()? {}
    Ok(())
}
