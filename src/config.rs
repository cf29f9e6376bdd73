//! Configuration for the defensive copy analyzer.
//!
//! The configuration is built once, before any analysis runs, and is shared immutably by all
//! worker threads afterwards. It carries two things:
//!
//! - the include-list deciding which [`FindingClass`]es are reported, and
//! - the [`RuntimePolicy`] describing which compiler-synthesized access patterns are known to be
//!   copy free on the targeted runtime.
//!
//! # Include-list
//!
//! The include-list is a single string of finding-class identifiers separated by `,` or `;`.
//! Entries are trimmed and compared ordinally. Both the descriptive identifiers
//! (`Necessary-Copy`, `Unnecessary-Copy`) and the short diagnostic ids (`HAM0001`, `HAM0003`) are
//! accepted. An absent or empty list enables every class.
//!
//! ```rust
//! use copyscope::{config::AnalyzerConfig, FindingClass};
//!
//! let config = AnalyzerConfig::from_include_list(" HAM0003 ;Some-Other-Rule");
//! assert!(config.should_report(FindingClass::Unnecessary));
//! assert!(!config.should_report(FindingClass::Necessary));
//!
//! let all = AnalyzerConfig::default();
//! assert!(all.should_report(FindingClass::Necessary));
//! ```

use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::{findings::FindingClass, model::CoreLibrary, Error, Result};

/// The runtime the analyzed code is compiled against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum TargetRuntime {
    /// .NET Framework 4.x
    #[strum(to_string = "net48", serialize = "netframework")]
    NetFramework,
    /// .NET 8
    #[strum(to_string = "net8.0", serialize = "net8")]
    Net8,
    /// .NET 9
    #[strum(to_string = "net9.0", serialize = "net9")]
    Net9,
    /// .NET 10
    #[default]
    #[strum(to_string = "net10.0", serialize = "net10")]
    Net10,
}

impl TargetRuntime {
    /// Returns true if the reference assemblies declare the primitive types as `readonly struct`
    #[must_use]
    pub fn has_readonly_primitives(&self) -> bool {
        !matches!(self, TargetRuntime::NetFramework)
    }

    /// Returns true if the nullable wrapper's `HasValue`, `Value` and `GetValueOrDefault` are
    /// declared `readonly`
    #[must_use]
    pub fn has_readonly_nullable_accessors(&self) -> bool {
        !matches!(self, TargetRuntime::NetFramework)
    }

    /// Returns true if the runtime supports `[InlineArray]` buffers
    #[must_use]
    pub fn supports_inline_arrays(&self) -> bool {
        matches!(
            self,
            TargetRuntime::Net8 | TargetRuntime::Net9 | TargetRuntime::Net10
        )
    }
}

/// Access patterns treated as structurally copy free.
///
/// Whether the compiler synthesizes a copy for these patterns depends on the compiler and runtime
/// version, so they are kept in a table keyed by [`TargetRuntime`] instead of being hard coded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimePolicy {
    /// Index and range accesses on an `[InlineArray]` buffer never copy the buffer
    pub inline_array_indexer_is_copy_free: bool,
    /// Range slicing of an `[InlineArray]` element access yields a span over the original
    /// storage, so the sliced buffer is never read-only
    pub inline_array_range_is_copy_free: bool,
}

impl RuntimePolicy {
    /// Returns the policy of a runtime.
    ///
    /// Every runtime known so far treats both inline array patterns as copy free. Runtimes
    /// without inline array support never produce the patterns, the flags are set for
    /// consistency.
    #[must_use]
    pub fn for_runtime(runtime: TargetRuntime) -> Self {
        match runtime {
            TargetRuntime::NetFramework
            | TargetRuntime::Net8
            | TargetRuntime::Net9
            | TargetRuntime::Net10 => RuntimePolicy {
                inline_array_indexer_is_copy_free: true,
                inline_array_range_is_copy_free: true,
            },
        }
    }
}

impl Default for RuntimePolicy {
    fn default() -> Self {
        Self::for_runtime(TargetRuntime::default())
    }
}

/// Immutable analyzer configuration.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Trimmed include-list entries; empty means every class is reported
    include: Vec<String>,

    /// The runtime the analyzed code targets.
    ///
    /// Only selects [`AnalyzerConfig::policy`]. Which core library members are `readonly` is
    /// decided by the symbols [`CoreLibrary::install`] registered; use
    /// [`AnalyzerConfig::with_core_library`] to keep both on the same runtime.
    pub runtime: TargetRuntime,

    /// Copy free access patterns of [`AnalyzerConfig::runtime`]
    pub policy: RuntimePolicy,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        AnalyzerConfig {
            include: Vec::new(),
            runtime: TargetRuntime::default(),
            policy: RuntimePolicy::default(),
        }
    }
}

impl AnalyzerConfig {
    /// Creates a configuration reporting every finding class for the default runtime
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration from an include-list string.
    ///
    /// # Arguments
    ///
    /// * `include` - Identifiers separated by `,` or `;`
    #[must_use]
    pub fn from_include_list(include: &str) -> Self {
        let include: Vec<String> = include
            .split([',', ';'])
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::to_string)
            .collect();

        for entry in &include {
            if FindingClass::from_id(entry).is_none() {
                log::debug!("ignoring unknown finding class '{}' in include-list", entry);
            }
        }

        AnalyzerConfig {
            include,
            ..Default::default()
        }
    }

    /// Creates a configuration from raw option values as found in an editor config file.
    ///
    /// # Arguments
    ///
    /// * `include` - Optional include-list, see [`AnalyzerConfig::from_include_list`]
    /// * `runtime` - Optional runtime moniker (`net48`, `net8.0`, ...)
    ///
    /// # Errors
    /// Returns [`crate::Error::Config`] if the runtime moniker is not recognised.
    pub fn from_options(include: Option<&str>, runtime: Option<&str>) -> Result<Self> {
        let config = include.map_or_else(Self::default, Self::from_include_list);
        match runtime {
            Some(moniker) => {
                let runtime = moniker.trim().parse::<TargetRuntime>().map_err(|_| {
                    Error::Config(format!(
                        "unknown target runtime '{}', expected one of: {}",
                        moniker,
                        TargetRuntime::iter()
                            .map(|r| r.to_string())
                            .collect::<Vec<_>>()
                            .join(", ")
                    ))
                })?;
                Ok(config.with_runtime(runtime))
            }
            None => Ok(config),
        }
    }

    /// Targets a runtime and adopts its [`RuntimePolicy`]
    #[must_use]
    pub fn with_runtime(mut self, runtime: TargetRuntime) -> Self {
        self.runtime = runtime;
        self.policy = RuntimePolicy::for_runtime(runtime);
        self
    }

    /// Targets the runtime a [`CoreLibrary`] was installed for and adopts its [`RuntimePolicy`].
    ///
    /// # Arguments
    ///
    /// * `core` - The core library registered in the analyzed symbol table
    #[must_use]
    pub fn with_core_library(self, core: &CoreLibrary) -> Self {
        if self.runtime != core.runtime {
            log::debug!(
                "configured runtime {} differs from core library runtime {}, using {}",
                self.runtime,
                core.runtime,
                core.runtime
            );
        }
        self.with_runtime(core.runtime)
    }

    /// Overrides the runtime policy
    #[must_use]
    pub fn with_policy(mut self, policy: RuntimePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the include-list entries
    #[must_use]
    pub fn include_list(&self) -> &[String] {
        &self.include
    }

    /// Returns true if findings of `class` should be reported.
    ///
    /// # Arguments
    ///
    /// * `class` - The finding class to check
    #[must_use]
    pub fn should_report(&self, class: FindingClass) -> bool {
        self.include.is_empty()
            || self
                .include
                .iter()
                .any(|entry| entry == class.id() || entry == class.diagnostic_id())
    }

    /// Returns true if at least one finding class is reported
    #[must_use]
    pub fn reports_anything(&self) -> bool {
        FindingClass::iter().any(|class| self.should_report(class))
    }
}
