pub mod info;
pub mod suite;
pub mod worker;

use slapseg::error::SlapResult;
use tracing::error;

/// Map an operation's outcome to the process exit code.
pub fn report(operation: &str, result: SlapResult<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            error!("{}: {}", operation, e);
            if e.is_contract_violation() {
                error!("The engine under test is broken; this is not a segmentation finding.");
            }
            1
        }
    }
}
