//! Defensive copy analysis.
//!
//! The compiler silently copies a value type receiver before invoking a member on it whenever the
//! receiver is a read-only reference and the member is not known to leave its receiver untouched.
//! This module finds those copies and classifies them.
//!
//! # Pipeline
//!
//! For each operation of a tree:
//!
//! 1. [`dispatch`] extracts the receiver expression and the method or accessor invoked on it
//! 2. [`usage`] decides which accessors a property or indexer access executes
//! 3. [`provenance`] decides whether the receiver is an effectively read-only reference, with
//!    the rules of the enclosing member taken from [`context`]
//! 4. [`suppression`] drops copies inside generated code
//! 5. [`necessity`] classifies the remaining copies as necessary or unnecessary
//!
//! [`DefensiveCopyAnalyzer`] drives the pipeline, in parallel over the nodes of a tree, and
//! delivers the findings to a [`crate::FindingSink`].
//!
//! # Example
//!
//! ```rust
//! use copyscope::{
//!     analysis::{dispatch::member_accesses, CancellationToken},
//!     config::{RuntimePolicy, TargetRuntime},
//!     model::{
//!         CoreLibrary, LocalSymbol, MethodKind, MethodSymbol, OperationTreeBuilder,
//!         SemanticModel, SymbolTable, TypeKind, TypeSymbol,
//!     },
//! };
//!
//! let mut symbols = SymbolTable::new();
//! let core = CoreLibrary::install(&mut symbols, TargetRuntime::Net10)?;
//! let s1 = symbols.add_type(TypeSymbol::new("S1", "App", TypeKind::Struct).with_base(core.value_type))?;
//! let m1 = symbols.add_method(MethodSymbol::new("M1", MethodKind::Ordinary).with_containing_type(s1))?;
//! let local = symbols.add_local(LocalSymbol::new("value", s1))?;
//!
//! let mut builder = OperationTreeBuilder::new(&symbols, "Program.cs");
//! let receiver = builder.local(local)?;
//! let call = builder.call(m1, Some(receiver), &[])?;
//! let tree = builder.build();
//!
//! let model = SemanticModel::new(&symbols, &tree);
//! let accesses = member_accesses(&model, call, &RuntimePolicy::default(), &CancellationToken::new())?;
//! assert_eq!(accesses[0].receiver, receiver);
//! assert_eq!(accesses[0].target, m1);
//! # Ok::<(), copyscope::Error>(())
//! ```

mod analyzer;
mod cancel;

pub mod context;
pub mod dispatch;
pub mod facts;
pub mod necessity;
pub mod pinning;
pub mod provenance;
pub mod suppression;
pub mod usage;

pub use analyzer::DefensiveCopyAnalyzer;
pub use cancel::CancellationToken;
pub use context::EnclosingContext;
pub use dispatch::MemberAccess;
pub use facts::SymbolFacts;
pub use provenance::ProvenanceResolver;
pub use usage::ValueUsage;
