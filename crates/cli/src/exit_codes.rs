//! CLI Exit Code Registry
//!
//! Single source of truth for `letsgo-snippet` exit codes. Scripts (and the
//! site's content checks) rely on them.
//!
//! | Code | Meaning                                                    |
//! |------|------------------------------------------------------------|
//! | 0    | Success                                                    |
//! | 1    | The program ran and reported an error                      |
//! | 2    | Usage error (bad args, capability not enabled)             |
//! | 3    | Local I/O error (files, clipboard tool, download)          |
//! | 4    | Could not communicate with the execution endpoint          |

use letsgo_snippet::FailureKind;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// The submitted program failed to build or run.
pub const EXIT_PROGRAM_ERROR: u8 = 1;

/// Usage error - bad arguments, or the snippet does not allow the action.
pub const EXIT_USAGE: u8 = 2;

/// Local I/O failure: unreadable file, missing clipboard tool, failed save.
pub const EXIT_IO: u8 = 3;

/// Endpoint unreachable, non-success status, or undecodable reply.
pub const EXIT_COMMUNICATION: u8 = 4;

/// Exit code for a failed run.
pub fn run_exit_code(kind: FailureKind) -> u8 {
    match kind {
        FailureKind::Program => EXIT_PROGRAM_ERROR,
        FailureKind::Api | FailureKind::Communication => EXIT_COMMUNICATION,
    }
}
