//! Findings produced by the analyzer and the sinks collecting them.
//!
//! Every confirmed defensive copy becomes one [`Finding`], classified as either
//! [`FindingClass::Necessary`] (the invoked member may mutate, the copy isolates the original) or
//! [`FindingClass::Unnecessary`] (the member provably never mutates and only lacks a `readonly`
//! annotation). Each class has a static [`FindingDescriptor`] carrying its identifiers, message
//! format, category and default severity.
//!
//! Findings are delivered through the [`FindingSink`] trait. [`Findings`] is the default sink:
//! a lock-free, append-only collection that can be filled from many threads at once.
//!
//! # Example
//!
//! ```rust
//! use copyscope::{Finding, FindingClass, FindingSink, Findings, Location, model::Span};
//!
//! let findings = Findings::new();
//! findings.report(Finding::new(
//!     FindingClass::Necessary,
//!     Location::new("Program.cs".into(), Span::new(10, 14)),
//!     "M1",
//!     "value",
//! ));
//!
//! assert_eq!(findings.count(), 1);
//! assert_eq!(
//!     findings.sorted()[0].message(),
//!     "Call to member 'M1' will execute on a defensive copy of 'value'"
//! );
//! ```

use std::{fmt, sync::Arc};

use strum::{Display, EnumIter, EnumString};

use crate::model::Span;

/// Severity a finding class is reported with by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FindingSeverity {
    /// Informational, the code is correct but could be faster
    Info,
    /// The code likely does not do what its author expects
    Warning,
}

impl fmt::Display for FindingSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FindingSeverity::Info => write!(f, "INFO"),
            FindingSeverity::Warning => write!(f, "WARN"),
        }
    }
}

/// Category of a finding class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum FindingCategory {
    /// A mutation silently lands on a copy
    Correctness,
    /// A copy is made that an annotation would avoid
    Performance,
}

/// Static description of a finding class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FindingDescriptor {
    /// Stable descriptive identifier, used in include-lists
    pub id: &'static str,
    /// Short diagnostic id, accepted as an include-list alias
    pub diagnostic_id: &'static str,
    /// One line title
    pub title: &'static str,
    /// Message format, `{0}` is the member and `{1}` the receiver
    pub message_format: &'static str,
    /// Category
    pub category: FindingCategory,
    /// Default severity
    pub severity: FindingSeverity,
}

impl FindingDescriptor {
    /// Formats the message of a finding
    #[must_use]
    pub fn format(&self, member: &str, receiver: &str) -> String {
        self.message_format
            .replace("{0}", member)
            .replace("{1}", receiver)
    }
}

/// Descriptor of [`FindingClass::Necessary`]
pub static NECESSARY_COPY: FindingDescriptor = FindingDescriptor {
    id: "Necessary-Copy",
    diagnostic_id: "HAM0001",
    title: "Operation causes the compiler to create a defensive copy",
    message_format: "Call to member '{0}' will execute on a defensive copy of '{1}'",
    category: FindingCategory::Correctness,
    severity: FindingSeverity::Warning,
};

/// Descriptor of [`FindingClass::Unnecessary`]
pub static UNNECESSARY_COPY: FindingDescriptor = FindingDescriptor {
    id: "Unnecessary-Copy",
    diagnostic_id: "HAM0003",
    title: "Operation on readonly member causes the compiler to unnecessarily create a defensive copy",
    message_format:
        "Call to readonly member '{0}' will execute on an unnecessary defensive copy of '{1}'",
    category: FindingCategory::Performance,
    severity: FindingSeverity::Info,
};

/// Necessity of a detected defensive copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumString)]
pub enum FindingClass {
    /// The member may mutate its receiver; the copy is semantically required
    #[strum(serialize = "Necessary-Copy", serialize = "HAM0001")]
    Necessary,
    /// The member never mutates its receiver; the copy only exists for lack of a `readonly`
    /// annotation
    #[strum(serialize = "Unnecessary-Copy", serialize = "HAM0003")]
    Unnecessary,
}

impl FindingClass {
    /// Returns the static descriptor of the class
    #[must_use]
    pub fn descriptor(&self) -> &'static FindingDescriptor {
        match self {
            FindingClass::Necessary => &NECESSARY_COPY,
            FindingClass::Unnecessary => &UNNECESSARY_COPY,
        }
    }

    /// Returns the descriptive identifier (`Necessary-Copy`, `Unnecessary-Copy`)
    #[must_use]
    pub fn id(&self) -> &'static str {
        self.descriptor().id
    }

    /// Returns the short diagnostic id (`HAM0001`, `HAM0003`)
    #[must_use]
    pub fn diagnostic_id(&self) -> &'static str {
        self.descriptor().diagnostic_id
    }

    /// Resolves a descriptive identifier or diagnostic id, compared ordinally
    #[must_use]
    pub fn from_id(id: &str) -> Option<FindingClass> {
        id.parse().ok()
    }
}

impl fmt::Display for FindingClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Source location of a finding.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Location {
    /// Document the finding was raised in
    pub document: Arc<str>,
    /// Covered source positions
    pub span: Span,
}

impl Location {
    /// Creates a new location
    #[must_use]
    pub fn new(document: Arc<str>, span: Span) -> Self {
        Location { document, span }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.document, self.span)
    }
}

/// A confirmed defensive copy.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Finding {
    /// Where the copy happens
    pub location: Location,
    /// Necessity of the copy
    pub class: FindingClass,
    /// Display name of the invoked member
    pub member: String,
    /// Display name of the copied receiver
    pub receiver: String,
}

impl Finding {
    /// Creates a new finding.
    ///
    /// # Arguments
    ///
    /// * `class` - Necessity of the copy
    /// * `location` - Where the copy happens
    /// * `member` - Display name of the invoked member
    /// * `receiver` - Display name of the copied receiver
    pub fn new(
        class: FindingClass,
        location: Location,
        member: impl Into<String>,
        receiver: impl Into<String>,
    ) -> Self {
        Finding {
            location,
            class,
            member: member.into(),
            receiver: receiver.into(),
        }
    }

    /// Returns the descriptor of the finding's class
    #[must_use]
    pub fn descriptor(&self) -> &'static FindingDescriptor {
        self.class.descriptor()
    }

    /// Returns the formatted message
    #[must_use]
    pub fn message(&self) -> String {
        self.descriptor().format(&self.member, &self.receiver)
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let descriptor = self.descriptor();
        write!(
            f,
            "[{}] {} {}: {} ({})",
            descriptor.severity,
            descriptor.diagnostic_id,
            descriptor.category,
            self.message(),
            self.location
        )
    }
}

/// Receiver of findings.
///
/// Sinks are called concurrently from the analyzer's worker threads, in no particular order.
pub trait FindingSink: Sync {
    /// Accepts one finding
    fn report(&self, finding: Finding);
}

/// Thread-safe container for collecting findings.
///
/// Uses `boxcar::Vec` internally for lock-free concurrent append operations.
#[derive(Debug)]
pub struct Findings {
    entries: boxcar::Vec<Finding>,
}

impl Default for Findings {
    fn default() -> Self {
        Self::new()
    }
}

impl Findings {
    /// Creates a new empty container
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: boxcar::Vec::new(),
        }
    }

    /// Adds a finding
    pub fn push(&self, finding: Finding) {
        self.entries.push(finding);
    }

    /// Returns the total number of findings
    pub fn count(&self) -> usize {
        self.entries.count()
    }

    /// Returns true if no finding has been collected
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Returns the number of findings of one class
    pub fn count_of(&self, class: FindingClass) -> usize {
        self.entries
            .iter()
            .filter(|(_, finding)| finding.class == class)
            .count()
    }

    /// Returns an iterator over all findings in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Finding> {
        self.entries.iter().map(|(_, finding)| finding)
    }

    /// Returns all findings ordered by location, class and names.
    ///
    /// Insertion order depends on thread scheduling; this view does not.
    pub fn sorted(&self) -> Vec<Finding> {
        let mut findings: Vec<Finding> = self.iter().cloned().collect();
        findings.sort();
        findings
    }

    /// Returns a formatted multi-line summary of all findings
    pub fn summary(&self) -> String {
        self.sorted()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl FindingSink for Findings {
    fn report(&self, finding: Finding) {
        self.push(finding);
    }
}
