//! Host fact resolution and query engine.
//!
//! Facts (`os.name`, `memory.system.total`, `disks`, ...) are produced by
//! probes registered per platform, resolved concurrently on demand and
//! returned as a flat list or a nested `FactCollection`. Every structured
//! fact may carry flat legacy aliases (`operatingsystem`, `memorysize`), some
//! of which stand for a family of names discovered at runtime
//! (`blockdevice_<disk>_size`).
//!
//! ```no_run
//! use rfacter_core::{Facter, Options};
//!
//! let facter = Facter::new();
//! let facts = facter.resolve(&Options::default(), &["os.release.major"]).unwrap();
//! let tree = rfacter_core::to_collection(&facts);
//! println!("{:?}", tree.value("os.release.major"));
//! ```

pub mod augmenter;
pub mod cache;
pub mod collection;
pub mod engine;
pub mod error;
pub mod fact;
pub mod facts;
pub mod filter;
pub mod fmt;
pub mod fs;
pub mod options;
pub mod orchestrator;
pub mod platform;
pub mod probe;
pub mod query;
pub mod registry;
pub mod resolvers;
pub mod value;

pub use cache::{FactCache, MemoryCache};
pub use collection::FactCollection;
pub use engine::{Facter, to_collection};
pub use error::{FacterError, ProbeError};
pub use fact::{FactKind, ResolvedFact, SearchedFact};
pub use facts::BuiltinFacts;
pub use options::Options;
pub use platform::{CurrentOs, Platform, PlatformIdentifier};
pub use probe::{FieldFact, Probe};
pub use registry::{FactRegistry, FactSource};
pub use value::{FactMap, FactValue};
