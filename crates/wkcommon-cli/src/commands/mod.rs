//! Command implementations.

pub mod cache;
pub mod check;
pub mod config;
pub mod watch;

pub use self::cache::execute_cache;
pub use self::check::execute_check;
pub use self::config::execute_config;
pub use self::watch::execute_watch;
