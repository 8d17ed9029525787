//! Maps fetch errors onto [`FailureKind`].

use super::error::FetchError;
use super::policy::FailureKind;

pub fn status_failure(status: u32) -> FailureKind {
    match status {
        429 | 503 => FailureKind::Throttled,
        500..=599 => FailureKind::ServerError(status),
        _ => FailureKind::Permanent,
    }
}

pub fn curl_failure(e: &curl::Error) -> FailureKind {
    if e.is_operation_timedout() {
        FailureKind::Timeout
    } else if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_read_error()
        || e.is_got_nothing()
        || e.is_partial_file()
    {
        FailureKind::Unreachable
    } else {
        FailureKind::Permanent
    }
}

impl FetchError {
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            FetchError::Curl { source, .. } => curl_failure(source),
            FetchError::Http { status, .. } => status_failure(*status),
            FetchError::Aborted { .. } => FailureKind::Permanent,
        }
    }
}
