pub mod compile_time {
    pub mod scanner {
        /// Maximum source size allowed for tokenization (10MB)
        /// SECURITY: Prevents DoS attacks via enormous source inputs
        pub const MAX_SOURCE_SIZE: usize = 10 * 1024 * 1024;

        /// Maximum number of tokens allowed in a single source
        /// SECURITY: Prevents DoS via token explosion attacks
        pub const MAX_TOKEN_COUNT: usize = 1_000_000;
    }

    pub mod logging {
        /// Log buffer size for in-memory collection
        /// RESOURCE: Controls memory usage for logging
        pub const LOG_BUFFER_SIZE: usize = 10_000;

        /// Maximum log message length
        /// RESOURCE: Prevents memory attacks via huge messages
        pub const MAX_LOG_MESSAGE_LENGTH: usize = 10_000;
    }
}
