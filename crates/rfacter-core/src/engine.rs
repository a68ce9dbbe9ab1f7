//! The fact resolution pipeline.
//!
//! ```text
//!   queries + Options
//!        │
//!        ▼
//!   FactLoader ──► QueryParser ──► cache split ──► Orchestrator
//!   (registry)     (SearchedFact[])                (worker pool)
//!                                                        │ raw facts
//!                                                        ▼
//!                    FactCollection ◄── FactFilter ◄── FactAugmenter
//! ```
//!
//! Every `resolve` call loads a fresh registry, so resolver memo state never
//! leaks from one run into the next.

use crate::augmenter::FactAugmenter;
use crate::cache::{FactCache, split_cached};
use crate::collection::FactCollection;
use crate::error::FacterError;
use crate::fact::ResolvedFact;
use crate::facts::BuiltinFacts;
use crate::filter::FactFilter;
use crate::options::Options;
use crate::orchestrator::Orchestrator;
use crate::platform::{CurrentOs, PlatformIdentifier};
use crate::query::QueryParser;
use crate::registry::{FactLoader, FactSource};
use crate::value::FactValue;
use indexmap::IndexMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Fact resolution engine.
pub struct Facter {
    source: Box<dyn FactSource>,
    platform: Box<dyn PlatformIdentifier>,
    cache: Option<Arc<dyn FactCache>>,
}

impl Default for Facter {
    fn default() -> Self {
        Self::new()
    }
}

impl Facter {
    /// Engine over the built-in facts of the running host.
    pub fn new() -> Self {
        Self::with_source(BuiltinFacts::host())
    }

    /// Engine over a custom fact source.
    pub fn with_source(source: impl FactSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            platform: Box::new(CurrentOs),
            cache: None,
        }
    }

    /// Overrides platform detection.
    pub fn platform(mut self, platform: impl PlatformIdentifier + 'static) -> Self {
        self.platform = Box::new(platform);
        self
    }

    /// Attaches a fact cache, consulted when `Options::cache` is set.
    pub fn cache(mut self, cache: Arc<dyn FactCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Resolves `queries`, or every fact when `queries` is empty.
    pub fn resolve<S: AsRef<str>>(
        &self,
        options: &Options,
        queries: &[S],
    ) -> Result<Vec<ResolvedFact>, FacterError> {
        let start = Instant::now();
        let platform = self.platform.identifier();
        let legacy_visible = options.legacy_visible(queries);

        let loader = FactLoader::new(self.source.as_ref(), options);
        let loaded = loader.load_partitioned(&platform, legacy_visible)?;

        let searched = QueryParser::new(&loaded.entries).parse(queries);
        debug!("Searching {} facts on {}", searched.len(), platform);

        let cache = self.cache.as_deref().filter(|_| options.cache);
        let (pending, cached) = match cache {
            Some(cache) => split_cached(cache, &searched),
            None => (searched.clone(), Vec::new()),
        };

        let resolved = Orchestrator::new(options).resolve(&pending);
        if let Some(cache) = cache {
            cache.store(&resolved);
        }

        let mut raw = cached;
        raw.extend(resolved);
        let augmented = FactAugmenter::new(legacy_visible)
            .blocking(loaded.blocked)
            .augment(&searched, raw);
        let facts = FactFilter::new(options.strict, legacy_visible).filter(&searched, augmented);

        if options.timing {
            info!("Resolved {} facts in {:?}", facts.len(), start.elapsed());
        }
        Ok(facts)
    }

    /// Resolves every fact into a collection.
    pub fn to_hash(&self, options: &Options) -> Result<FactCollection, FacterError> {
        let facts = self.resolve::<&str>(options, &[])?;
        Ok(to_collection(&facts))
    }

    /// Resolves one dotted query and returns its value.
    pub fn value(&self, query: &str) -> Result<Option<FactValue>, FacterError> {
        let facts = self.resolve(&Options::default(), &[query])?;
        Ok(to_collection(&facts).value(query).cloned())
    }

    /// Fact groups available for blocking.
    pub fn block_groups(&self, options: &Options) -> IndexMap<String, Vec<String>> {
        FactLoader::new(self.source.as_ref(), options).block_groups()
    }
}

/// Builds the nested fact tree from final facts.
pub fn to_collection(facts: &[ResolvedFact]) -> FactCollection {
    FactCollection::from_facts(facts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::error::ProbeError;
    use crate::fact::FactKind;
    use crate::fs::MockFs;
    use crate::platform::Platform;
    use crate::probe::{FieldFact, Probe};
    use crate::registry::FactRegistry;
    use crate::resolvers::Resolver;
    use crate::resolvers::testing::StaticResolver;
    use crate::facts::disks::DisksFact;
    use std::collections::BTreeSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn linux() -> Facter {
        Facter::with_source(BuiltinFacts::new(MockFs::typical_linux_host())).platform(Platform::Linux)
    }

    fn options() -> Options {
        Options {
            workers: Some(4),
            ..Options::default()
        }
    }

    fn names(facts: &[ResolvedFact]) -> Vec<&str> {
        facts.iter().map(|f| f.name.as_str()).collect()
    }

    fn disks_only(disks: FactValue) -> Facter {
        let source = move |_: &Platform| -> Result<FactRegistry, FacterError> {
            let resolver: Arc<dyn Resolver> =
                Arc::new(StaticResolver::new(&[("disks", disks.clone())]));
            let mut registry = FactRegistry::new();
            DisksFact::new(&resolver).register(&mut registry)?;
            Ok(registry)
        };
        Facter::with_source(source).platform(Platform::Linux)
    }

    fn sda() -> FactValue {
        let mut collection = FactCollection::new();
        collection.insert("sda.model", "Virtual disk").unwrap();
        collection.insert("sda.size", "20.00 GiB").unwrap();
        collection.insert("sda.size_bytes", 21474836480u64).unwrap();
        collection.insert("sda.vendor", "VMware").unwrap();
        FactValue::Map(collection.into_map())
    }

    #[test]
    fn test_disk_enumeration_with_legacy() {
        let facter = disks_only(sda());
        let options = Options {
            show_legacy: true,
            ..options()
        };
        let facts = facter.resolve::<&str>(&options, &[]).unwrap();

        assert_eq!(
            names(&facts),
            vec![
                "disks",
                "blockdevices",
                "blockdevice_sda_model",
                "blockdevice_sda_size",
                "blockdevice_sda_vendor"
            ]
        );
        assert_eq!(facts[1].value, FactValue::from("sda"));
        assert_eq!(facts[3].value, FactValue::from(21474836480u64));
        assert_eq!(facts[3].kind, FactKind::Legacy);
    }

    #[test]
    fn test_disk_wildcard_query() {
        let facter = disks_only(sda());
        let facts = facter.resolve(&options(), &["blockdevice_sda_size"]).unwrap();

        let queried: Vec<&ResolvedFact> = facts
            .iter()
            .filter(|f| f.user_query.as_deref() == Some("blockdevice_sda_size"))
            .collect();
        assert_eq!(queried.len(), 1);
        assert_eq!(queried[0].name, "blockdevice_sda_size");
        assert_eq!(queried[0].value, FactValue::from(21474836480u64));
    }

    #[test]
    fn test_empty_disks_yield_single_null() {
        for disks in [FactValue::Null, FactValue::Map(Default::default())] {
            let facts = disks_only(disks).resolve::<&str>(&options(), &[]).unwrap();
            assert_eq!(facts, vec![ResolvedFact::null("disks", FactKind::Core)]);
        }
    }

    #[test]
    fn test_failing_probe_leaves_siblings_intact() {
        let source = |_: &Platform| -> Result<FactRegistry, FacterError> {
            let ok: Arc<dyn Resolver> =
                Arc::new(StaticResolver::new(&[("name", FactValue::from("Debian"))]));
            let failing: Arc<dyn Probe> =
                Arc::new(|_: Option<&str>| -> Result<Vec<ResolvedFact>, ProbeError> {
                    Err(ProbeError::InvalidData("dmidecode missing".into()))
                });
            let mut registry = FactRegistry::new();
            FieldFact::new("os.name", &ok, "name").register(&mut registry)?;
            registry.register("dmi.product.uuid", failing, &[])?;
            FieldFact::new("os.family", &ok, "family").register(&mut registry)?;
            Ok(registry)
        };
        let facts = Facter::with_source(source)
            .resolve::<&str>(&options(), &[])
            .unwrap();

        assert_eq!(names(&facts), vec!["os.name", "dmi.product.uuid", "os.family"]);
        assert_eq!(facts[0].value, FactValue::from("Debian"));
        assert!(facts[1].value.is_null());
    }

    #[test]
    fn test_legacy_hidden_without_show_legacy() {
        let facts = linux().resolve::<&str>(&options(), &[]).unwrap();
        assert!(!facts.is_empty());
        assert!(facts.iter().all(|f| f.kind == FactKind::Core));
    }

    #[test]
    fn test_core_count_matches_canonical_searches() {
        let facter = linux();
        let options = Options {
            show_legacy: true,
            ..options()
        };
        let canonical = FactLoader::new(facter.source.as_ref(), &options)
            .load(&Platform::Linux)
            .unwrap()
            .len();

        for workers in [1, 3, 16] {
            let options = Options {
                workers: Some(workers),
                ..options.clone()
            };
            let facts = facter.resolve::<&str>(&options, &[]).unwrap();
            let core = facts.iter().filter(|f| f.kind == FactKind::Core).count();
            assert_eq!(core, canonical, "workers = {}", workers);
        }
    }

    #[test]
    fn test_runs_are_idempotent() {
        let facter = linux();
        let options = Options {
            show_legacy: true,
            ..options()
        };
        let run = || -> BTreeSet<(String, bool)> {
            facter
                .resolve::<&str>(&options, &[])
                .unwrap()
                .into_iter()
                .map(|f| {
                    let legacy = f.is_legacy();
                    (f.name, legacy)
                })
                .collect()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_resolver_runs_once_per_run() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let source = move |_: &Platform| -> Result<FactRegistry, FacterError> {
            let mut source = crate::resolvers::testing::CountingSource::new(&[
                ("total", FactValue::from(1i64)),
                ("free", FactValue::from(2i64)),
            ]);
            source.calls = Arc::clone(&counter);
            source.delay = Duration::from_millis(20);
            let resolver: Arc<dyn Resolver> = crate::resolvers::Memoized::shared(source);
            let mut registry = FactRegistry::new();
            FieldFact::new("memory.total", &resolver, "total").register(&mut registry)?;
            FieldFact::new("memory.free", &resolver, "free").register(&mut registry)?;
            Ok(registry)
        };
        let facter = Facter::with_source(source);

        facter.resolve::<&str>(&options(), &[]).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        facter.resolve::<&str>(&options(), &[]).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_value_lookups_on_linux_host() {
        let facter = linux();
        let facts = facter
            .resolve(&options(), &["os.release.major", "hostname", "os"])
            .unwrap();
        let collection = to_collection(&facts);

        assert_eq!(collection.value("os.release.major"), Some(&FactValue::from("12")));
        assert_eq!(collection.value("hostname"), Some(&FactValue::from("web01")));
        assert_eq!(collection.value("os.name"), Some(&FactValue::from("Debian")));
        assert_eq!(
            collection.value("os.distro.codename"),
            Some(&FactValue::from("bookworm"))
        );
    }

    #[test]
    fn test_value_convenience() {
        let facter = linux();
        assert_eq!(
            facter.value("networking.fqdn").unwrap(),
            Some(FactValue::from("web01.example.com"))
        );
        assert_eq!(facter.value("virtual").unwrap(), Some(FactValue::from("vmware")));
        assert_eq!(facter.value("no_such_fact").unwrap(), None);
    }

    #[test]
    fn test_to_hash() {
        let hash = linux().to_hash(&options()).unwrap();
        assert_eq!(hash.value("kernelrelease"), Some(&FactValue::from("6.1.0-18-amd64")));
        assert_eq!(
            hash.value("disks.sda.size_bytes"),
            Some(&FactValue::from(21474836480u64))
        );
        assert_eq!(hash.value("memorysize"), None);
    }

    #[test]
    fn test_strict_unknown_fact() {
        let options = Options {
            strict: true,
            ..options()
        };
        let facts = linux().resolve(&options, &["no_such_fact", "kernelrelease"]).unwrap();
        assert!(facts[0].unresolved);
        assert!(facts[0].value.is_null());
        assert!(!facts[1].unresolved);
    }

    #[test]
    fn test_blocked_fact_is_unknown() {
        let options = Options {
            block_list: vec!["hardware".into()],
            ..options()
        };
        let facts = linux().resolve(&options, &["dmi.manufacturer", "os.name"]).unwrap();
        assert!(facts[0].value.is_null());
        assert_eq!(facts[1].value, FactValue::from("Debian"));

        let hash = linux().to_hash(&options).unwrap();
        assert_eq!(hash.value("disks"), None);
        assert_eq!(hash.value("processors"), None);
    }

    #[test]
    fn test_cache_answers_before_probe() {
        let cache = Arc::new(MemoryCache::new(Duration::from_secs(3600)));
        cache.store(&[ResolvedFact::core("kernelrelease", "7.0.0-cached")]);
        let facter = linux().cache(cache.clone());

        let facts = facter.resolve(&options(), &["kernelrelease", "os.name"]).unwrap();
        assert_eq!(facts[0].value, FactValue::from("7.0.0-cached"));
        // Freshly resolved facts are stored back.
        assert!(cache.fetch("os.name").is_some());

        let options = Options {
            cache: false,
            ..options()
        };
        let facts = facter.resolve(&options, &["kernelrelease"]).unwrap();
        assert_eq!(facts[0].value, FactValue::from("6.1.0-18-amd64"));
    }

    #[test]
    fn test_block_groups_include_configured() {
        let mut options = options();
        options.fact_groups.insert("mine".into(), vec!["path".into()]);
        let groups = linux().block_groups(&options);
        assert!(groups.contains_key("hardware"));
        assert_eq!(groups["mine"], vec!["path".to_string()]);
    }

    #[test]
    fn test_blocked_aliases_never_emitted_by_siblings() {
        let options = Options {
            show_legacy: true,
            block_list: vec![
                "blockdevices".into(),
                "blockdevice_.*_size".into(),
                "operatingsystem".into(),
            ],
            ..options()
        };
        let facts = linux().resolve::<&str>(&options, &[]).unwrap();
        let names = names(&facts);

        assert!(names.contains(&"disks"));
        assert!(names.contains(&"blockdevice_sda_model"));
        assert!(names.contains(&"os.name"));
        for blocked in ["blockdevices", "blockdevice_sda_size", "operatingsystem"] {
            assert!(!names.contains(&blocked), "{} leaked", blocked);
        }
    }

    #[test]
    fn test_query_for_blocked_alias_is_unknown() {
        let options = Options {
            strict: true,
            block_list: vec!["blockdevices".into()],
            ..options()
        };
        let facts = linux()
            .resolve(&options, &["disks", "blockdevices"])
            .unwrap();

        let blocked: Vec<&ResolvedFact> =
            facts.iter().filter(|f| f.name == "blockdevices").collect();
        assert_eq!(blocked.len(), 1);
        assert!(blocked[0].value.is_null());
        assert!(blocked[0].unresolved);
        assert!(facts.iter().any(|f| f.name == "disks" && !f.value.is_null()));
    }
}
