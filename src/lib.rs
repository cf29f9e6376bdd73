// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # copyscope
//!
//! A static analysis engine that finds hidden defensive copies of .NET value types.
//!
//! When a member is invoked on a `struct` reached through a read-only reference (an `in`
//! parameter, a `ref readonly` local, a `readonly` field, `this` inside a `readonly` member),
//! the C# compiler copies the value first so that the member cannot mutate the original. The
//! copy is invisible in source, costs time for large structs, and silently discards any mutation
//! the member performs. `copyscope` reports each such copy and tells apart:
//!
//! - **Necessary copies** (`Necessary-Copy`, `HAM0001`) - the member may mutate its receiver,
//!   so the copy changes behavior
//! - **Unnecessary copies** (`Unnecessary-Copy`, `HAM0003`) - the member provably never mutates
//!   and only lacks a `readonly` annotation
//!
//! ## Features
//!
//! - **Frontend independent** - works on a semantic model (symbols plus bound operation trees)
//!   any compiler frontend can populate
//! - **Complete operation coverage** - method calls, property and indexer accessors, event
//!   subscriptions, `foreach`, string concatenation, index and range slicing, `await` and
//!   `fixed` pinning
//! - **Parallel** - the nodes of a tree are analyzed concurrently with lock-free collection
//! - **Cancellable** - every recursive descent polls a [`CancellationToken`]
//! - **Runtime aware** - core library annotations and copy free patterns follow the targeted
//!   runtime
//!
//! ## Quick Start
//!
//! ```rust
//! use copyscope::prelude::*;
//!
//! let mut symbols = SymbolTable::new();
//! let core = CoreLibrary::install(&mut symbols, TargetRuntime::NetFramework)?;
//!
//! // struct Counter { void Increment(); }
//! let counter = symbols.add_type(
//!     TypeSymbol::new("Counter", "App", TypeKind::Struct).with_base(core.value_type),
//! )?;
//! let increment = symbols.add_method(
//!     MethodSymbol::new("Increment", MethodKind::Ordinary).with_containing_type(counter),
//! )?;
//!
//! // static void Tick(in Counter counter) => counter.Increment();
//! let tick = symbols.add_method(MethodSymbol::new("Tick", MethodKind::Ordinary))?;
//! let parameter = symbols.add_parameter(
//!     tick,
//!     ParameterSymbol::new("counter", counter).with_ref_kind(RefKind::In),
//! )?;
//! let mut builder = OperationTreeBuilder::new(&symbols, "Counter.cs");
//! builder.member(tick, |b| {
//!     let receiver = b.parameter(parameter)?;
//!     b.call(increment, Some(receiver), &[])
//! })?;
//! let tree = builder.build();
//!
//! let analyzer = DefensiveCopyAnalyzer::new(AnalyzerConfig::default());
//! let findings = analyzer.collect(&symbols, &tree, &CancellationToken::new())?;
//! for finding in findings.sorted() {
//!     println!("{}", finding);
//! }
//! assert_eq!(findings.count_of(FindingClass::Necessary), 1);
//! # Ok::<(), copyscope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`model`] - Symbol table, operation trees and the semantic model view
//! - [`analysis`] - Dispatchers, provenance resolution, classification and the analyzer driver
//! - [`findings`] - Findings, their descriptors and the sinks collecting them
//! - [`config`] - Include-list and runtime policy
//! - [`Error`] and [`Result`] - Error handling
//!
//! ## Logging
//!
//! Diagnostics about skipped nodes and provenance decisions are emitted through the [`log`]
//! facade at `debug` and `trace` level. Install any logger in the embedding application to see
//! them.

#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use copyscope::prelude::*;
///
/// let config = AnalyzerConfig::from_include_list("Necessary-Copy");
/// let analyzer = DefensiveCopyAnalyzer::new(config);
/// assert!(!analyzer.config().should_report(FindingClass::Unnecessary));
/// ```
pub mod prelude;

pub mod analysis;
pub mod config;
pub mod findings;
pub mod model;

/// `copyscope` Result type
///
/// A type alias for `std::result::Result<T, Error>` where the error type is always [`Error`].
///
/// # Examples
///
/// ```rust
/// use copyscope::{Result, model::{SymbolTable, Token}};
///
/// fn method_name(symbols: &SymbolTable, token: Token) -> Result<String> {
///     Ok(symbols.method(token)?.name.clone())
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// `copyscope` Error type
///
/// The main error type for all operations in this crate.
pub use error::Error;

/// Main entry point for the analysis
pub use analysis::{CancellationToken, DefensiveCopyAnalyzer};

/// Analyzer configuration
pub use config::{AnalyzerConfig, RuntimePolicy, TargetRuntime};

/// Findings and sinks
pub use findings::{
    Finding, FindingCategory, FindingClass, FindingDescriptor, FindingSeverity, FindingSink,
    Findings, Location,
};
