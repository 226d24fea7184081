//! Error codes and exit status for dpwctl

use dpw_common::DpwError;

/// Exit code for success
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code for general errors
pub const EXIT_GENERAL_ERROR: i32 = 1;

/// Exit code when the API returns a body that cannot be decoded
pub const EXIT_INVALID_RESPONSE: i32 = 65;

/// Exit code when the API is unreachable or answers with an error status
pub const EXIT_API_UNAVAILABLE: i32 = 70;

/// Exit code when a command needs a signed-in account
pub const EXIT_NOT_AUTHENTICATED: i32 = 77;

/// Map a library error to an exit code.
pub fn exit_code_for(err: &DpwError) -> i32 {
    match err {
        DpwError::Network { .. } | DpwError::Http { .. } => EXIT_API_UNAVAILABLE,
        DpwError::Decode { .. } => EXIT_INVALID_RESPONSE,
        DpwError::Auth(_) => EXIT_NOT_AUTHENTICATED,
        _ => EXIT_GENERAL_ERROR,
    }
}

/// Exit code for an error coming out of command glue
pub fn exit_code_for_any(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<DpwError>()
        .map(exit_code_for)
        .unwrap_or(EXIT_GENERAL_ERROR)
}
