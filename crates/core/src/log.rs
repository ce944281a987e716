//! Tagged stderr logging.
//!
//! Lines look like `[Tetrion] level 3 (0.026 cells/tick)`. Front ends that
//! own the terminal call [`set_quiet`] so log output does not tear the
//! screen.

use std::sync::atomic::{AtomicBool, Ordering};

static QUIET: AtomicBool = AtomicBool::new(false);

pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

pub fn is_quiet() -> bool {
    QUIET.load(Ordering::Relaxed)
}

/// `log_event!("Tag", "format {}", args)` writes `[Tag] ...` to stderr unless muted.
#[macro_export]
macro_rules! log_event {
    ($tag:literal, $($arg:tt)*) => {
        if !$crate::log::is_quiet() {
            eprintln!(concat!("[", $tag, "] {}"), format_args!($($arg)*));
        }
    };
}
