//! CLI command implementations

pub(crate) mod deploy;
