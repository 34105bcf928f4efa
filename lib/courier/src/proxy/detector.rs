//! Error detection.

/// Decides whether a response status is an error to be decoded.
///
/// Closures of type `Fn(u16) -> bool` implement this trait, so a custom
/// detector can be given inline:
///
/// ```
/// use courier::proxy::InvocationFns;
///
/// let fns = InvocationFns::builder()
///     .error_detector(|status: u16| status >= 500)
///     .build();
/// ```
pub trait ErrorDetector: Send + Sync {
    /// Returns `true` if the status must be converted into a domain error.
    fn is_error(&self, status: u16) -> bool;
}

impl<F> ErrorDetector for F
where
    F: Fn(u16) -> bool + Send + Sync,
{
    fn is_error(&self, status: u16) -> bool {
        self(status)
    }
}

/// Default error detector: every 4xx and 5xx status is an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultErrorDetector;

impl ErrorDetector for DefaultErrorDetector {
    fn is_error(&self, status: u16) -> bool {
        (400..600).contains(&status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_detector_matches_client_and_server_errors() {
        let detector = DefaultErrorDetector;
        assert!(detector.is_error(400));
        assert!(detector.is_error(404));
        assert!(detector.is_error(500));
        assert!(detector.is_error(599));
        assert!(!detector.is_error(200));
        assert!(!detector.is_error(204));
        assert!(!detector.is_error(302));
    }

    #[test]
    fn closures_are_detectors() {
        let server_only = |status: u16| status >= 500;
        assert!(server_only.is_error(503));
        assert!(!server_only.is_error(404));
    }
}
