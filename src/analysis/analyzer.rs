//! The analyzer driver.
//!
//! [`DefensiveCopyAnalyzer`] ties the pieces together: each operation is turned into member
//! accesses by the dispatchers, every access is checked against the receiver's provenance, the
//! enclosing member and the generated-code marker, and confirmed copies are classified and
//! handed to a [`FindingSink`].

use rayon::prelude::*;

use crate::{
    analysis::{
        cancel::CancellationToken,
        context::EnclosingContext,
        dispatch::{member_accesses, receiver_display_name, MemberAccess},
        facts::SymbolFacts,
        necessity::classify,
        provenance::ProvenanceResolver,
        suppression::is_generated_code,
    },
    config::AnalyzerConfig,
    findings::{Finding, FindingSink, Findings, Location},
    model::{OpId, OperationTree, SemanticModel, SymbolTable},
    Error, Result,
};

/// Detects defensive copies of value type receivers.
///
/// The analyzer holds nothing but its immutable configuration and can be shared by any number
/// of threads.
///
/// # Example
///
/// ```rust
/// use copyscope::{
///     CancellationToken, DefensiveCopyAnalyzer, Findings,
///     config::{AnalyzerConfig, TargetRuntime},
///     model::{
///         CoreLibrary, MethodKind, MethodSymbol, OperationTreeBuilder, ParameterSymbol,
///         RefKind, SymbolTable, TypeKind, TypeSymbol,
///     },
/// };
///
/// let mut symbols = SymbolTable::new();
/// let core = CoreLibrary::install(&mut symbols, TargetRuntime::Net8)?;
/// let s1 = symbols.add_type(
///     TypeSymbol::new("S1", "App", TypeKind::Struct).with_base(core.value_type),
/// )?;
/// let m1 = symbols.add_method(MethodSymbol::new("M1", MethodKind::Ordinary).with_containing_type(s1))?;
/// let run = symbols.add_method(MethodSymbol::new("Run", MethodKind::Ordinary))?;
/// let value = symbols.add_parameter(run, ParameterSymbol::new("value", s1).with_ref_kind(RefKind::In))?;
///
/// let mut builder = OperationTreeBuilder::new(&symbols, "Program.cs");
/// builder.member(run, |b| {
///     let receiver = b.parameter(value)?;
///     b.call(m1, Some(receiver), &[])
/// })?;
/// let tree = builder.build();
///
/// let analyzer = DefensiveCopyAnalyzer::new(AnalyzerConfig::default());
/// let findings = Findings::new();
/// analyzer.analyze_tree(&symbols, &tree, &findings, &CancellationToken::new())?;
///
/// assert_eq!(findings.count(), 1);
/// assert_eq!(findings.sorted()[0].receiver, "value");
/// # Ok::<(), copyscope::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct DefensiveCopyAnalyzer {
    config: AnalyzerConfig,
}

impl DefensiveCopyAnalyzer {
    /// Creates an analyzer
    #[must_use]
    pub fn new(config: AnalyzerConfig) -> Self {
        DefensiveCopyAnalyzer { config }
    }

    /// Returns the configuration
    #[must_use]
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyzes a single operation.
    ///
    /// Findings that are identical in every field are reported once.
    ///
    /// # Arguments
    ///
    /// * `model` - The semantic model containing the operation
    /// * `id` - The operation to analyze
    /// * `cancel` - Polled throughout the analysis
    ///
    /// # Errors
    /// Returns [`crate::Error::Cancelled`] if cancellation was requested. No finding of the
    /// operation is returned in that case.
    pub fn analyze_operation(
        &self,
        model: &SemanticModel<'_>,
        id: OpId,
        cancel: &CancellationToken,
    ) -> Result<Vec<Finding>> {
        let mut findings: Vec<Finding> = Vec::new();
        for access in member_accesses(model, id, &self.config.policy, cancel)? {
            if let Some(finding) = self.analyze_member_access(model, &access, cancel)? {
                if !findings.contains(&finding) {
                    findings.push(finding);
                }
            }
        }
        Ok(findings)
    }

    /// Decides whether one member access executes on a defensive copy.
    ///
    /// # Arguments
    ///
    /// * `model` - The semantic model containing the access
    /// * `access` - Receiver, target and reporting details
    /// * `cancel` - Polled throughout the analysis
    ///
    /// # Returns
    ///
    /// The finding, or `None` if no copy is made, the code is generated or the finding class is
    /// disabled.
    ///
    /// # Errors
    /// Returns [`crate::Error::Cancelled`] if cancellation was requested.
    pub fn analyze_member_access(
        &self,
        model: &SemanticModel<'_>,
        access: &MemberAccess,
        cancel: &CancellationToken,
    ) -> Result<Option<Finding>> {
        cancel.check()?;

        let symbols = model.symbols();
        let facts = SymbolFacts::new(symbols);
        let Some(target) = symbols.get_method(access.target) else {
            log::debug!("skipping {}: unresolved target {}", access.location, access.target);
            return Ok(None);
        };
        if (!access.force_include && facts.is_method_readonly(target)) || target.is_static() {
            return Ok(None);
        }

        let Some(receiver_type) = model.type_of(access.receiver) else {
            log::debug!("skipping {}: receiver {} has no type", access.location, access.receiver);
            return Ok(None);
        };
        let value_like = facts.is_value_type(receiver_type) || facts.is_type_parameter(receiver_type);
        if !value_like || facts.is_reference_type(receiver_type) {
            return Ok(None);
        }
        if !access.force_include
            && facts.is_type_readonly(receiver_type)
            && !facts.is_on_universal_base(target)
        {
            return Ok(None);
        }

        let enclosing = model.enclosing_symbol_of(access.receiver);
        let context = EnclosingContext::derive(&facts, enclosing);
        let resolver = ProvenanceResolver::new(*model, context, self.config.policy, cancel);
        if !resolver.is_effectively_readonly_reference(access.receiver)? {
            return Ok(None);
        }

        if is_generated_code(&facts, enclosing, cancel)? {
            log::debug!("skipping {}: generated code", access.location);
            return Ok(None);
        }

        let class = classify(&facts, receiver_type, access.target);
        if !self.config.should_report(class) {
            return Ok(None);
        }

        let Some(location) = model.operation(access.location) else {
            return Err(Error::InvalidOperation(access.location));
        };
        let member = access
            .display_name
            .clone()
            .unwrap_or_else(|| target.name.clone());

        Ok(Some(Finding::new(
            class,
            Location::new(model.tree().document().clone(), location.span),
            member,
            receiver_display_name(model, access.receiver),
        )))
    }

    /// Analyzes every operation of a tree in parallel and reports the findings to `sink`.
    ///
    /// # Arguments
    ///
    /// * `symbols` - The symbol table the tree refers to
    /// * `tree` - The operations to analyze
    /// * `sink` - Receives the findings
    /// * `cancel` - Polled throughout the analysis
    ///
    /// # Errors
    /// Returns [`crate::Error::Cancelled`] if cancellation was requested. Findings of operations
    /// completed before the cancellation was observed stay reported.
    pub fn analyze_tree<S: FindingSink + ?Sized>(
        &self,
        symbols: &SymbolTable,
        tree: &OperationTree,
        sink: &S,
        cancel: &CancellationToken,
    ) -> Result<()> {
        if !self.config.reports_anything() {
            return Ok(());
        }

        let model = SemanticModel::new(symbols, tree);
        let ids: Vec<OpId> = tree.ids().collect();
        let result = ids.par_iter().try_for_each(|id| {
            for finding in self.analyze_operation(&model, *id, cancel)? {
                sink.report(finding);
            }
            Ok(())
        });

        if let Err(Error::Cancelled) = &result {
            log::debug!("analysis of {} cancelled", tree.document());
        }
        result
    }

    /// Analyzes several trees in parallel, see [`DefensiveCopyAnalyzer::analyze_tree`].
    ///
    /// # Errors
    /// Returns [`crate::Error::Cancelled`] if cancellation was requested.
    pub fn analyze_trees<S: FindingSink + ?Sized>(
        &self,
        symbols: &SymbolTable,
        trees: &[OperationTree],
        sink: &S,
        cancel: &CancellationToken,
    ) -> Result<()> {
        trees
            .par_iter()
            .try_for_each(|tree| self.analyze_tree(symbols, tree, sink, cancel))
    }

    /// Analyzes a tree and collects its findings.
    ///
    /// # Errors
    /// Returns [`crate::Error::Cancelled`] if cancellation was requested.
    pub fn collect(
        &self,
        symbols: &SymbolTable,
        tree: &OperationTree,
        cancel: &CancellationToken,
    ) -> Result<Findings> {
        let findings = Findings::new();
        self.analyze_tree(symbols, tree, &findings, cancel)?;
        Ok(findings)
    }
}
