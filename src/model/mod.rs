//! The semantic model consumed by the analyzer.
//!
//! The analyzer never parses source text. A host frontend resolves a compilation and describes
//! the result through this module:
//!
//! - [`SymbolTable`] - types, members, parameters, locals, modules and assemblies addressed by
//!   [`Token`]s
//! - [`OperationTree`] - the bound operation nodes of one document, built with an
//!   [`OperationTreeBuilder`]
//! - [`SemanticModel`] - the read-only view over both that the analysis queries
//! - [`CoreLibrary`] - a helper seeding the core library symbols the analysis relies on
//!
//! Everything in here is plain data: once built, a model is immutable and `Sync`, so one table
//! and many trees can be analyzed from many threads at once.

mod corelib;
mod operation;
mod symbols;
mod table;
mod token;
mod tree;

pub use corelib::{CoreLibrary, UniversalMembers};
pub use operation::{
    BinaryOperator, InstanceReferenceKind, OpId, Operation, OperationKind, Span,
};
pub use symbols::{
    Accessibility, AssemblySymbol, EventSymbol, FieldFlags, FieldSymbol, LocalSymbol,
    MethodFlags, MethodKind, MethodSymbol, ModuleSymbol, ParameterSymbol, PropertySymbol,
    RefKind, SpecialType, TypeFlags, TypeKind, TypeParameterInfo, TypeSymbol, WellKnownType,
};
pub use table::SymbolTable;
pub use token::{SymbolKind, Token};
pub use tree::{MemberRegion, OperationTree, OperationTreeBuilder, SemanticModel};
