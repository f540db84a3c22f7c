pub mod data;
pub mod error;
pub mod keys;
pub mod orchestrator;
pub mod persist;
pub mod refs;
pub mod report;
pub mod resolver;
pub mod seed;
pub mod seeds;
pub mod settings;
pub mod tenant;
