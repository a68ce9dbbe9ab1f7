//! In-memory filesystem and canned host layouts for testing resolvers
//! without touching the real machine.

mod filesystem;
mod scenarios;

pub use filesystem::MockFs;
