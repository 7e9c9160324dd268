//! Tests for log level selection and subscriber installation

#[cfg(test)]
mod tests {
    use tileweave::io::logging::{init_logging, level_directive};

    // Tests verbosity flags map to increasing levels
    // Verified by mapping one -v to trace
    #[test]
    fn test_level_directive() {
        assert_eq!(level_directive(0, false), "info");
        assert_eq!(level_directive(1, false), "debug");
        assert_eq!(level_directive(2, false), "trace");
        assert_eq!(level_directive(7, false), "trace");
    }

    // Tests quiet overrides verbosity
    // Verified by checking verbosity first
    #[test]
    fn test_quiet_wins() {
        assert_eq!(level_directive(0, true), "error");
        assert_eq!(level_directive(3, true), "error");
    }

    // Tests a second installation is refused without panicking
    // Verified by using init instead of try_init
    #[test]
    fn test_init_logging_once() {
        init_logging(0, true);
        assert!(!init_logging(0, true));
    }
}
