//! # copyscope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the copyscope library. Import it to populate a semantic model, run the analyzer and
//! inspect its findings without spelling out module paths.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all copyscope operations
pub use crate::Error;

/// The result type used throughout copyscope
pub use crate::Result;

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// The defensive copy analyzer
pub use crate::DefensiveCopyAnalyzer;

/// Cooperative cancellation of a running analysis
pub use crate::CancellationToken;

/// Analyzer configuration
pub use crate::config::{AnalyzerConfig, RuntimePolicy, TargetRuntime};

// ================================================================================================
// Findings
// ================================================================================================

/// A confirmed defensive copy and its classification
pub use crate::findings::{Finding, FindingClass, Location};

/// Collection of findings
pub use crate::findings::{FindingSink, Findings};

// ================================================================================================
// Semantic Model
// ================================================================================================

/// Symbol handles and the symbol table
pub use crate::model::{SymbolKind, SymbolTable, Token};

/// Symbol definitions
pub use crate::model::{
    AssemblySymbol, EventSymbol, FieldSymbol, LocalSymbol, MethodSymbol, ModuleSymbol,
    ParameterSymbol, PropertySymbol, TypeSymbol,
};

/// Symbol classification and modifiers
pub use crate::model::{
    FieldFlags, MethodFlags, MethodKind, RefKind, SpecialType, TypeFlags, TypeKind,
};

/// Operation trees
pub use crate::model::{OpId, OperationKind, OperationTree, OperationTreeBuilder, SemanticModel};

/// Core library seeding
pub use crate::model::CoreLibrary;
