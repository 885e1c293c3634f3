//! CLI subcommand implementations.

pub mod delete;
pub mod edit;
pub mod growth;
pub mod history;
pub mod insights;
pub mod log;
pub mod migrate;
pub mod profile;
pub mod reminder;
pub mod stash;
pub mod status;
pub mod timer;
pub mod util;
