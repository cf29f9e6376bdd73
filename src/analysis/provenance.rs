//! Provenance of a receiver expression.
//!
//! The compiler copies a value type receiver when the receiver denotes storage the current
//! context may only read: `in` parameters, `ref readonly` locals and returns, `readonly` fields
//! outside of their initialization, `this` inside `readonly` members, and everything reached
//! from those through mutable value type fields. [`ProvenanceResolver`] decides this by walking
//! the receiver expression down to its root storage.

use crate::{
    analysis::{cancel::CancellationToken, context::EnclosingContext, facts::SymbolFacts},
    config::RuntimePolicy,
    model::{
        InstanceReferenceKind, OpId, OperationKind, RefKind, SemanticModel, SymbolKind, Token,
        TypeKind, WellKnownType,
    },
    Result,
};

/// Decides whether receiver expressions are effectively read-only references.
#[derive(Debug, Clone, Copy)]
pub struct ProvenanceResolver<'a> {
    model: SemanticModel<'a>,
    facts: SymbolFacts<'a>,
    context: EnclosingContext,
    policy: RuntimePolicy,
    cancel: &'a CancellationToken,
}

impl<'a> ProvenanceResolver<'a> {
    /// Creates a resolver for expressions inside one enclosing member.
    ///
    /// # Arguments
    ///
    /// * `model` - The semantic model containing the expressions
    /// * `context` - Properties of the enclosing member
    /// * `policy` - Access patterns known to be copy free
    /// * `cancel` - Polled at every step
    #[must_use]
    pub fn new(
        model: SemanticModel<'a>,
        context: EnclosingContext,
        policy: RuntimePolicy,
        cancel: &'a CancellationToken,
    ) -> Self {
        ProvenanceResolver {
            model,
            facts: SymbolFacts::new(model.symbols()),
            context,
            policy,
            cancel,
        }
    }

    /// Returns true if `receiver` denotes storage that may not be mutated from the enclosing
    /// member, so that calling a mutating member on it requires a defensive copy.
    ///
    /// Unknown shapes and unresolvable symbols answer `false`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Cancelled`] if cancellation was requested.
    pub fn is_effectively_readonly_reference(&self, receiver: OpId) -> Result<bool> {
        let symbols = self.model.symbols();
        let mut current = receiver;

        loop {
            self.cancel.check()?;

            let Some(operation) = self.model.operation(current) else {
                return Ok(false);
            };

            match &operation.kind {
                OperationKind::Invocation { method, .. } => {
                    return Ok(symbols
                        .get_method(*method)
                        .is_some_and(|m| m.returns_by_ref_readonly()));
                }
                OperationKind::PropertyReference { property, .. } => {
                    return Ok(symbols
                        .get_property(*property)
                        .is_some_and(|p| p.returns_by_ref_readonly()));
                }
                OperationKind::LocalReference { local } => {
                    return Ok(symbols
                        .get_local(*local)
                        .is_some_and(|l| l.ref_kind == RefKind::RefReadOnly));
                }
                OperationKind::ParameterReference { parameter } => {
                    return Ok(self.parameter_is_readonly(current, *parameter));
                }
                OperationKind::SimpleAssignment { target, is_ref, .. } => {
                    if !*is_ref {
                        return Ok(false);
                    }
                    current = *target;
                }
                OperationKind::FieldReference { field, instance } => {
                    let Some(symbol) = symbols.get_field(*field) else {
                        return Ok(false);
                    };
                    match symbol.ref_kind {
                        RefKind::RefReadOnly => return Ok(true),
                        RefKind::Ref => return Ok(false),
                        _ => {}
                    }
                    if symbol.is_readonly() {
                        return Ok(self.is_readonly_field_like_access(
                            symbol.is_static(),
                            *instance,
                            symbol.containing_type,
                        ));
                    }

                    let Some(instance) = instance else {
                        return Ok(false);
                    };
                    if self
                        .model
                        .type_of(*instance)
                        .is_some_and(|ty| self.facts.is_reference_type(ty))
                    {
                        return Ok(false);
                    }
                    current = *instance;
                }
                OperationKind::Conditional {
                    when_true,
                    when_false,
                    is_ref: true,
                    ..
                } => {
                    if self.is_effectively_readonly_reference(*when_true)? {
                        return Ok(true);
                    }
                    match when_false {
                        Some(when_false) => current = *when_false,
                        None => return Ok(false),
                    }
                }
                OperationKind::InstanceReference {
                    reference_kind: InstanceReferenceKind::ContainingTypeInstance,
                } => return Ok(self.context.is_readonly_member),
                OperationKind::InlineArrayAccess { instance, argument } => {
                    if self.policy.inline_array_range_is_copy_free
                        && self
                            .model
                            .type_of(*argument)
                            .is_some_and(|ty| self.facts.well_known(ty) == Some(WellKnownType::Range))
                    {
                        log::trace!("{} slices an inline array, never read-only", current);
                        return Ok(false);
                    }
                    current = *instance;
                }
                OperationKind::ImplicitIndexerReference { indexer, .. } => {
                    return Ok(match indexer.kind() {
                        Some(SymbolKind::Method) => symbols
                            .get_method(*indexer)
                            .is_some_and(|m| m.returns_by_ref_readonly()),
                        Some(SymbolKind::Property) => symbols
                            .get_property(*indexer)
                            .is_some_and(|p| p.returns_by_ref_readonly()),
                        _ => false,
                    });
                }
                _ => return Ok(false),
            }
        }
    }

    fn parameter_is_readonly(&self, id: OpId, parameter: Token) -> bool {
        let symbols = self.model.symbols();
        let Some(symbol) = symbols.get_parameter(parameter) else {
            return false;
        };

        match symbol.ref_kind {
            RefKind::In | RefKind::RefReadOnlyParameter => return true,
            RefKind::Ref => return false,
            _ => {}
        }

        let declared_on_struct = symbol.is_primary_constructor_parameter
            && symbol
                .containing_method
                .and_then(|m| symbols.get_method(m))
                .and_then(|m| m.containing_type)
                .and_then(|ty| symbols.get_type(ty))
                .is_some_and(|ty| ty.kind == TypeKind::Struct);
        if !(declared_on_struct && self.context.is_readonly_member) {
            return false;
        }

        // Field and property initializers read the captured value before any copy exists.
        let in_initializer = self
            .model
            .enclosing_symbol_of(id)
            .is_some_and(|s| s.is(SymbolKind::Field) || s.is(SymbolKind::Property));
        if in_initializer {
            return false;
        }

        self.is_readonly_field_like_access(false, None, None)
    }

    /// Decides the read-only-ness of an access to `readonly` field-like storage.
    fn is_readonly_field_like_access(
        &self,
        is_static: bool,
        instance: Option<OpId>,
        declaring_type: Option<Token>,
    ) -> bool {
        let initializer_type = self.context.static_initializer_type;
        if is_static && initializer_type.is_none() {
            return true;
        }
        if !is_static && !self.context.allows_mutating_this {
            return true;
        }

        if is_static {
            declaring_type != initializer_type
        } else {
            instance.is_some_and(|instance| {
                !matches!(
                    self.model.operation(instance).map(|op| &op.kind),
                    Some(OperationKind::InstanceReference {
                        reference_kind: InstanceReferenceKind::ContainingTypeInstance
                    })
                )
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::{MethodKind, MethodSymbol, PropertySymbol},
        test::Fixture,
    };

    fn resolve(
        fixture: &Fixture,
        tree: &crate::model::OperationTree,
        context: EnclosingContext,
        receiver: OpId,
    ) -> bool {
        resolve_with(fixture, tree, context, RuntimePolicy::default(), receiver)
    }

    fn resolve_with(
        fixture: &Fixture,
        tree: &crate::model::OperationTree,
        context: EnclosingContext,
        policy: RuntimePolicy,
        receiver: OpId,
    ) -> bool {
        let cancel = CancellationToken::new();
        let model = SemanticModel::new(&fixture.symbols, tree);
        ProvenanceResolver::new(model, context, policy, &cancel)
            .is_effectively_readonly_reference(receiver)
            .unwrap()
    }

    #[test]
    fn test_parameters_and_locals() {
        let f = Fixture::new();
        let mut b = f.builder();
        let in_param = b.parameter(f.in_param).unwrap();
        let ref_param = b.parameter(f.ref_param).unwrap();
        let value_param = b.parameter(f.value_param).unwrap();
        let readonly_local = b.local(f.readonly_local).unwrap();
        let local = b.local(f.local).unwrap();
        let tree = b.build();

        let ctx = EnclosingContext::default();
        assert!(resolve(&f, &tree, ctx, in_param));
        assert!(!resolve(&f, &tree, ctx, ref_param));
        assert!(!resolve(&f, &tree, ctx, value_param));
        assert!(resolve(&f, &tree, ctx, readonly_local));
        assert!(!resolve(&f, &tree, ctx, local));
    }

    #[test]
    fn test_field_chains() {
        let f = Fixture::new();
        let mut b = f.builder();
        // in S2 v; v.inner.value
        let root = b.parameter(f.in_s2_param).unwrap();
        let inner = b.field(f.s2_inner, Some(root)).unwrap();
        let through = b.field(f.s1_value, Some(inner)).unwrap();
        // S2 local; local.inner
        let local = b.local(f.s2_local).unwrap();
        let mutable = b.field(f.s2_inner, Some(local)).unwrap();
        // class instance field holding a struct, reached from an in parameter of a class
        let holder = b.parameter(f.in_holder_param).unwrap();
        let held = b.field(f.holder_value, Some(holder)).unwrap();
        let tree = b.build();

        let ctx = EnclosingContext::default();
        assert!(resolve(&f, &tree, ctx, inner));
        assert!(resolve(&f, &tree, ctx, through));
        assert!(!resolve(&f, &tree, ctx, mutable));
        assert!(!resolve(&f, &tree, ctx, held));
    }

    #[test]
    fn test_readonly_fields_and_initialization() {
        let f = Fixture::new();
        let mut b = f.builder();
        let this = b.implicit_this(f.s2).unwrap();
        let own_field = b.field(f.s2_readonly_inner, Some(this)).unwrap();
        let local = b.local(f.s2_local).unwrap();
        let other_field = b.field(f.s2_readonly_inner, Some(local)).unwrap();
        let static_field = b.field(f.s2_static_readonly, None).unwrap();
        let tree = b.build();

        let method = EnclosingContext::default();
        assert!(resolve(&f, &tree, method, own_field));
        assert!(resolve(&f, &tree, method, static_field));

        let ctor = EnclosingContext {
            allows_mutating_this: true,
            ..Default::default()
        };
        assert!(!resolve(&f, &tree, ctor, own_field));
        assert!(resolve(&f, &tree, ctor, other_field));

        let own_cctor = EnclosingContext {
            static_initializer_type: Some(f.s2),
            ..Default::default()
        };
        assert!(!resolve(&f, &tree, own_cctor, static_field));

        let foreign_cctor = EnclosingContext {
            static_initializer_type: Some(f.s1),
            ..Default::default()
        };
        assert!(resolve(&f, &tree, foreign_cctor, static_field));
    }

    #[test]
    fn test_this_and_ref_shapes() {
        let f = Fixture::new();
        let mut b = f.builder();
        let this = b.this(f.s1).unwrap();

        let cond = b.literal(Some(f.core.boolean())).unwrap();
        let ro = b.local(f.readonly_local).unwrap();
        let rw = b.local(f.local).unwrap();
        let mixed = b.ref_conditional(cond, rw, ro).unwrap();

        let cond2 = b.literal(Some(f.core.boolean())).unwrap();
        let rw1 = b.local(f.local).unwrap();
        let rw2 = b.local(f.ref_local).unwrap();
        let mutable = b.ref_conditional(cond2, rw1, rw2).unwrap();

        let target = b.local(f.readonly_local).unwrap();
        let source = b.parameter(f.in_param).unwrap();
        let ref_assignment = b.ref_assign(target, source).unwrap();

        let call = b.call(f.s1_ref_readonly_getter, None, &[]).unwrap();
        let tree = b.build();

        assert!(!resolve(&f, &tree, EnclosingContext::default(), this));
        let readonly_member = EnclosingContext {
            is_readonly_member: true,
            ..Default::default()
        };
        assert!(resolve(&f, &tree, readonly_member, this));
        assert!(resolve(&f, &tree, EnclosingContext::default(), mixed));
        assert!(!resolve(&f, &tree, EnclosingContext::default(), mutable));
        assert!(resolve(&f, &tree, EnclosingContext::default(), ref_assignment));
        assert!(resolve(&f, &tree, EnclosingContext::default(), call));
    }

    #[test]
    fn test_inline_array_elements() {
        let f = Fixture::new();
        let int32 = f.core.int32();
        let mut b = f.builder();

        // in S1 buffer; buffer[0]
        let instance = b.parameter(f.in_param).unwrap();
        let index = b.literal(Some(int32)).unwrap();
        let element = b
            .push(OperationKind::InlineArrayAccess { instance, argument: index }, Some(int32))
            .unwrap();

        // S1 buffer; buffer[0]
        let instance = b.local(f.local).unwrap();
        let index = b.literal(Some(int32)).unwrap();
        let mutable_element = b
            .push(OperationKind::InlineArrayAccess { instance, argument: index }, Some(int32))
            .unwrap();

        // in S1 buffer; buffer[1..]
        let instance = b.parameter(f.in_param).unwrap();
        let range = b.literal(Some(f.core.range)).unwrap();
        let slice = b
            .push(OperationKind::InlineArrayAccess { instance, argument: range }, None)
            .unwrap();
        let tree = b.build();

        let ctx = EnclosingContext::default();
        assert!(resolve(&f, &tree, ctx, element));
        assert!(!resolve(&f, &tree, ctx, mutable_element));
        assert!(!resolve(&f, &tree, ctx, slice));

        let copying_slices = RuntimePolicy {
            inline_array_indexer_is_copy_free: true,
            inline_array_range_is_copy_free: false,
        };
        assert!(resolve_with(&f, &tree, ctx, copying_slices, slice));
    }

    #[test]
    fn test_implicit_indexer_return_kind() {
        let mut f = Fixture::new();
        let int32 = f.core.int32();
        let get_item = f
            .symbols
            .add_method(
                MethodSymbol::new("get_Item", MethodKind::PropertyGet)
                    .with_ref_kind(RefKind::RefReadOnly)
                    .with_return_type(int32)
                    .with_containing_type(f.s1),
            )
            .unwrap();
        let readonly_item = f
            .symbols
            .add_property(
                PropertySymbol::new("Item", int32)
                    .indexer()
                    .with_ref_kind(RefKind::RefReadOnly)
                    .with_getter(get_item)
                    .with_containing_type(f.s1),
            )
            .unwrap();

        let mut b = f.builder();
        let indexed = |b: &mut crate::model::OperationTreeBuilder<'_>, indexer: Token| {
            let instance = b.local(f.local).unwrap();
            let argument = b.literal(Some(f.core.index)).unwrap();
            b.push(
                OperationKind::ImplicitIndexerReference {
                    instance,
                    argument,
                    indexer,
                    length: f.s1_length,
                },
                Some(int32),
            )
            .unwrap()
        };
        let through_property = indexed(&mut b, readonly_item);
        let through_getter = indexed(&mut b, get_item);
        let by_value = indexed(&mut b, f.s1_indexer);
        let tree = b.build();

        let ctx = EnclosingContext::default();
        assert!(resolve(&f, &tree, ctx, through_property));
        assert!(resolve(&f, &tree, ctx, through_getter));
        assert!(!resolve(&f, &tree, ctx, by_value));
    }

    #[test]
    fn test_cancellation() {
        let f = Fixture::new();
        let mut b = f.builder();
        let receiver = b.parameter(f.in_param).unwrap();
        let tree = b.build();

        let cancel = CancellationToken::new();
        cancel.cancel();
        let model = SemanticModel::new(&f.symbols, &tree);
        let result = ProvenanceResolver::new(
            model,
            EnclosingContext::default(),
            RuntimePolicy::default(),
            &cancel,
        )
        .is_effectively_readonly_reference(receiver);
        assert!(matches!(result, Err(crate::Error::Cancelled)));
    }
}
