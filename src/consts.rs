pub mod tui_consts {
    //! Dashboard Configuration Constants
    //!
    //! Layout geometry, timing and buffer limits for the terminal dashboard,
    //! organized by functional area.

    // =============================================================================
    // BUFFER CONFIGURATION
    // =============================================================================

    /// The maximum number of entries kept in the in-memory console log.
    pub const MAX_CONSOLE_LOGS: usize = 1000;

    /// Number of console lines shown in the right sidebar.
    pub const CONSOLE_TAIL: usize = 10;

    /// Maximum number of alerts listed on the overview panel.
    pub const MAX_OVERVIEW_ALERTS: usize = 5;

    // =============================================================================
    // LAYOUT CONFIGURATION
    // =============================================================================

    /// Fixed region geometry, in terminal cells.
    pub mod layout {
        /// Height of the top bar (title, KPI row, rule).
        pub const TOP_BAR_HEIGHT: u16 = 3;

        /// Height of the hotkey legend at the bottom.
        pub const STATUS_BAR_HEIGHT: u16 = 1;

        /// Left navigation width on regular terminals.
        pub const LEFT_NAV_WIDTH: u16 = 20;

        /// Right sidebar width on regular terminals.
        pub const RIGHT_SIDEBAR_WIDTH: u16 = 30;

        /// Width of both sidebars once the terminal is wider than `WIDE_TERMINAL_THRESHOLD`.
        pub const WIDE_SIDEBAR_WIDTH: u16 = 35;

        /// Terminals strictly wider than this get the wide sidebars.
        pub const WIDE_TERMINAL_THRESHOLD: u16 = 180;
    }

    // =============================================================================
    // SCROLL CONFIGURATION
    // =============================================================================

    pub mod scroll {
        /// Rows moved by page up / page down.
        pub const PAGE_STEP: usize = 10;

        /// Rows a list panel keeps visible when scrolled to the bottom.
        pub const LIST_PAGE_ROWS: usize = 10;
    }

    // =============================================================================
    // EVENT LOOP CONFIGURATION
    // =============================================================================

    /// Main loop pacing
    pub mod event_loop {
        use std::time::Duration;

        /// How long a single input poll may wait (milliseconds)
        pub const INPUT_POLL_MS: u64 = 50;

        /// Sleep between loop iterations (milliseconds)
        pub const FRAME_SLEEP_MS: u64 = 50;

        /// Default auto-refresh interval for the active panel (seconds)
        pub const AUTO_REFRESH_SECS: u64 = 10;

        pub const fn input_poll() -> Duration {
            Duration::from_millis(INPUT_POLL_MS)
        }

        pub const fn frame_sleep() -> Duration {
            Duration::from_millis(FRAME_SLEEP_MS)
        }

        pub const fn auto_refresh_interval() -> Duration {
            Duration::from_secs(AUTO_REFRESH_SECS)
        }
    }

    // =============================================================================
    // NETWORK CONFIGURATION
    // =============================================================================

    /// Monitoring API client configuration
    pub mod network {
        use std::time::Duration;

        /// API base URL used when neither the config file nor the environment sets one.
        pub const DEFAULT_API_URL: &str = "http://localhost:8000";

        /// Environment variable overriding the API base URL.
        pub const API_URL_ENV: &str = "PROMETHEUS_API_URL";

        /// TCP connect timeout (seconds)
        pub const CONNECT_TIMEOUT_SECS: u64 = 10;

        /// Whole-request timeout (seconds)
        pub const REQUEST_TIMEOUT_SECS: u64 = 30;

        pub const fn connect_timeout() -> Duration {
            Duration::from_secs(CONNECT_TIMEOUT_SECS)
        }

        pub const fn request_timeout() -> Duration {
            Duration::from_secs(REQUEST_TIMEOUT_SECS)
        }
    }
}
