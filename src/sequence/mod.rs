pub(crate) mod config;
pub(crate) mod generator;
pub(crate) mod header;
pub(crate) mod inputs;
pub(crate) mod progress;
