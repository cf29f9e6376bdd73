//! Extraction of receiver and target member from each operation category.
//!
//! Every operation that may invoke an instance member on a value type receiver yields one or
//! more [`MemberAccess`]es: the receiver expression, the method or accessor that runs on it, the
//! node the finding is reported at and the member name shown to the user. Operations that never
//! call a member on a receiver yield nothing.

use crate::{
    analysis::{
        cancel::CancellationToken,
        facts::SymbolFacts,
        pinning::{containing_type_of, resolve_pinnable_reference},
        usage::{property_usage, value_usage},
    },
    config::RuntimePolicy,
    model::{
        BinaryOperator, MethodKind, OpId, OperationKind, SemanticModel, SpecialType, SymbolKind,
        Token, TypeKind, WellKnownType,
    },
    Result,
};

const INDEXER_NAME: &str = "this[]";

/// One member invocation on a receiver expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberAccess {
    /// The receiver expression
    pub receiver: OpId,
    /// The method or accessor invoked on the receiver
    pub target: Token,
    /// The node a finding is reported at
    pub location: OpId,
    /// Member name shown in findings, the target's name when `None`
    pub display_name: Option<String>,
    /// Analyze even if the target or the receiver type is `readonly`
    pub force_include: bool,
}

impl MemberAccess {
    fn new(receiver: OpId, target: Token, location: OpId) -> Self {
        MemberAccess {
            receiver,
            target,
            location,
            display_name: None,
            force_include: false,
        }
    }

    fn named(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    fn forced(mut self) -> Self {
        self.force_include = true;
        self
    }
}

/// Returns the member accesses performed by the operation `id`.
///
/// # Arguments
///
/// * `model` - The semantic model containing the operation
/// * `id` - The operation to inspect
/// * `policy` - Access patterns known to be copy free
/// * `cancel` - Polled between declarators of a `fixed` statement
///
/// # Errors
/// Returns [`crate::Error::Cancelled`] if cancellation was requested.
pub fn member_accesses(
    model: &SemanticModel<'_>,
    id: OpId,
    policy: &RuntimePolicy,
    cancel: &CancellationToken,
) -> Result<Vec<MemberAccess>> {
    let Some(operation) = model.operation(id) else {
        return Ok(Vec::new());
    };

    let accesses = match &operation.kind {
        OperationKind::PropertyReference {
            property, instance, ..
        } => property_reference(model, id, *property, *instance),
        OperationKind::EventAssignment {
            event_reference,
            adds,
            ..
        } => event_assignment(model, *event_reference, *adds),
        OperationKind::Invocation {
            method, instance, ..
        } => instance
            .map(|receiver| MemberAccess::new(receiver, *method, id))
            .into_iter()
            .collect(),
        OperationKind::ForEachLoop {
            collection,
            get_enumerator,
            ..
        } => for_each(model, *collection, *get_enumerator),
        OperationKind::Binary {
            operator: BinaryOperator::Add,
            left,
            right,
        }
        | OperationKind::CompoundAssignment {
            operator: BinaryOperator::Add,
            target: left,
            value: right,
        } => string_concatenation(model, *left, *right),
        OperationKind::ImplicitIndexerReference {
            instance,
            argument,
            indexer,
            length,
        } => implicit_indexer(model, id, policy, *instance, *argument, *indexer, *length),
        OperationKind::Await {
            operand,
            get_awaiter: Some(get_awaiter),
            is_dynamic: false,
        } => vec![MemberAccess::new(*operand, *get_awaiter, id)],
        OperationKind::FixedStatement { declarators, .. } => {
            fixed_statement(model, id, declarators, cancel)?
        }
        _ => Vec::new(),
    };
    Ok(accesses)
}

fn property_reference(
    model: &SemanticModel<'_>,
    id: OpId,
    property: Token,
    instance: Option<OpId>,
) -> Vec<MemberAccess> {
    let Some(receiver) = instance else {
        return Vec::new();
    };
    let Some(symbol) = model.symbols().get_property(property) else {
        log::debug!("{} references unknown property {}", id, property);
        return Vec::new();
    };

    let names_only = std::iter::once(id)
        .chain(model.tree().ancestors(id))
        .filter_map(|ancestor| model.operation(ancestor))
        .any(|op| {
            matches!(
                op.kind,
                OperationKind::NameOf { .. }
                    | OperationKind::TypeOf { .. }
                    | OperationKind::SizeOf { .. }
            )
        });
    if names_only {
        return Vec::new();
    }

    let name = if symbol.is_indexer {
        INDEXER_NAME
    } else {
        symbol.name.as_str()
    };
    let (get, set) = property_usage(value_usage(model, id), symbol);

    [(get, symbol.getter), (set, symbol.setter)]
        .into_iter()
        .filter_map(|(runs, accessor)| if runs { accessor } else { None })
        .map(|accessor| MemberAccess::new(receiver, accessor, id).named(name))
        .collect()
}

fn event_assignment(model: &SemanticModel<'_>, event_reference: OpId, adds: bool) -> Vec<MemberAccess> {
    let Some(OperationKind::EventReference {
        event,
        instance: Some(receiver),
    }) = model.operation(event_reference).map(|op| &op.kind)
    else {
        return Vec::new();
    };
    let Some(symbol) = model.symbols().get_event(*event) else {
        return Vec::new();
    };

    let accessor = if adds { symbol.add } else { symbol.remove };
    accessor
        .map(|accessor| {
            MemberAccess::new(*receiver, accessor, event_reference).named(symbol.name.as_str())
        })
        .into_iter()
        .collect()
}

fn for_each(
    model: &SemanticModel<'_>,
    collection: OpId,
    get_enumerator: Option<Token>,
) -> Vec<MemberAccess> {
    let Some(get_enumerator) = get_enumerator else {
        return Vec::new();
    };

    let receiver = match model.operation(collection) {
        Some(op) if op.is_implicit => match op.kind {
            OperationKind::Conversion { operand, .. } => operand,
            _ => collection,
        },
        _ => collection,
    };
    vec![MemberAccess::new(receiver, get_enumerator, receiver).named("GetEnumerator")]
}

/// `string + value` and `string += value` box `value` and call its `ToString`.
fn string_concatenation(model: &SemanticModel<'_>, left: OpId, right: OpId) -> Vec<MemberAccess> {
    let symbols = model.symbols();
    let facts = SymbolFacts::new(symbols);
    let special = |id: OpId| {
        model
            .type_of(id)
            .and_then(|ty| symbols.get_type(ty))
            .map(|ty| ty.special)
    };

    if special(left) != Some(SpecialType::String) || special(right) != Some(SpecialType::Object) {
        return Vec::new();
    }
    let Some(object) = model.type_of(right) else {
        return Vec::new();
    };
    let Some(conversion) = model.operation(right) else {
        return Vec::new();
    };
    let OperationKind::Conversion {
        operand,
        is_user_defined: false,
        ..
    } = conversion.kind
    else {
        return Vec::new();
    };
    if !conversion.is_implicit {
        return Vec::new();
    }
    let Some(receiver_type) = model.type_of(operand) else {
        return Vec::new();
    };

    let Some((object_to_string, _)) = facts.methods_named(object, "ToString").find(|(_, m)| {
        m.parameters.is_empty()
            && m.return_type
                .and_then(|ty| symbols.get_type(ty))
                .is_some_and(|ty| ty.special == SpecialType::String)
    }) else {
        log::debug!("no object.ToString() to resolve {} against", operand);
        return Vec::new();
    };

    let target = facts
        .override_for(receiver_type, object_to_string)
        .unwrap_or(object_to_string);
    vec![MemberAccess::new(operand, target, operand).forced()]
}

#[allow(clippy::too_many_arguments)]
fn implicit_indexer(
    model: &SemanticModel<'_>,
    id: OpId,
    policy: &RuntimePolicy,
    instance: OpId,
    argument: OpId,
    indexer: Token,
    length: Token,
) -> Vec<MemberAccess> {
    let symbols = model.symbols();
    let facts = SymbolFacts::new(symbols);

    let inline_array = model
        .type_of(instance)
        .is_some_and(|ty| facts.has_attribute(ty, WellKnownType::InlineArrayAttribute));
    if inline_array && policy.inline_array_indexer_is_copy_free {
        return Vec::new();
    }

    let targets: Vec<Token> = match indexer.kind() {
        Some(SymbolKind::Method) => vec![indexer],
        Some(SymbolKind::Property) => match symbols.get_property(indexer) {
            Some(property) => {
                let (get, set) = property_usage(value_usage(model, id), property);
                [(get, property.getter), (set, property.setter)]
                    .into_iter()
                    .filter_map(|(runs, accessor)| if runs { accessor } else { None })
                    .collect()
            }
            None => Vec::new(),
        },
        _ => Vec::new(),
    };

    let mut accesses = Vec::with_capacity(targets.len());
    for target in targets {
        let Some(method) = symbols.get_method(target) else {
            continue;
        };
        let mut access = MemberAccess::new(instance, target, id).named(INDEXER_NAME).forced();

        let copy_free_target = method.is_extension()
            || facts.is_method_readonly(method)
            || facts.is_containing_type_readonly(method);
        if copy_free_target && computes_from_length(model, &facts, argument) {
            let length_method = match length.kind() {
                Some(SymbolKind::Method) => Some(length),
                Some(SymbolKind::Property) => symbols.get_property(length).and_then(|p| p.getter),
                _ => None,
            };
            let mutable_length = length_method
                .and_then(|m| symbols.get_method(m).map(|symbol| (m, symbol)))
                .filter(|(_, symbol)| {
                    !symbol.is_extension()
                        && !facts.is_method_readonly(symbol)
                        && !facts.is_containing_type_readonly(symbol)
                });
            if let Some((length_method, _)) = mutable_length {
                access.target = length_method;
                access.display_name = symbols.name_of(length).map(str::to_string);
            }
        }
        accesses.push(access);
    }
    accesses
}

/// Returns true if the index or range argument is resolved against the length of the
/// collection: a `Range` value, or a bound that is an `Index` other than one converted from
/// an `int`.
fn computes_from_length(model: &SemanticModel<'_>, facts: &SymbolFacts<'_>, argument: OpId) -> bool {
    let is_well_known = |id: Option<OpId>, expected: WellKnownType| {
        id.and_then(|id| model.type_of(id))
            .is_some_and(|ty| facts.well_known(ty) == Some(expected))
    };

    let (left, right, is_range_literal) = match model.operation(argument).map(|op| &op.kind) {
        Some(OperationKind::Range { left, right }) => (*left, *right, true),
        _ => (Some(argument), None, false),
    };
    let left = left.map(|bound| strip_index_conversion(model, facts, bound));
    let right = right.map(|bound| strip_index_conversion(model, facts, bound));

    (!is_range_literal && is_well_known(Some(argument), WellKnownType::Range))
        || is_well_known(left, WellKnownType::Index)
        || is_well_known(right, WellKnownType::Index)
}

fn strip_index_conversion(model: &SemanticModel<'_>, facts: &SymbolFacts<'_>, id: OpId) -> OpId {
    let symbols = model.symbols();
    let Some(OperationKind::Conversion {
        operand,
        method: Some(method),
        ..
    }) = model.operation(id).map(|op| &op.kind)
    else {
        return id;
    };
    let Some(symbol) = symbols.get_method(*method) else {
        return id;
    };

    let is_index =
        |ty: Option<Token>| ty.is_some_and(|ty| facts.well_known(ty) == Some(WellKnownType::Index));
    let from_int = match symbol.parameters.as_slice() {
        [parameter] => symbols
            .get_parameter(*parameter)
            .and_then(|p| p.param_type)
            .and_then(|ty| symbols.get_type(ty))
            .is_some_and(|ty| ty.special == SpecialType::Int32),
        _ => false,
    };

    if symbol.kind == MethodKind::Conversion
        && symbol.name == "op_Implicit"
        && is_index(symbol.containing_type)
        && is_index(symbol.return_type)
        && from_int
    {
        *operand
    } else {
        id
    }
}

fn fixed_statement(
    model: &SemanticModel<'_>,
    id: OpId,
    declarators: &[OpId],
    cancel: &CancellationToken,
) -> Result<Vec<MemberAccess>> {
    let symbols = model.symbols();
    let facts = SymbolFacts::new(symbols);
    let Some(within) = model
        .enclosing_symbol_of(id)
        .and_then(|enclosing| containing_type_of(&facts, enclosing))
    else {
        return Ok(Vec::new());
    };

    let mut accesses = Vec::new();
    for declarator in declarators {
        cancel.check()?;

        let Some(OperationKind::VariableDeclarator {
            local,
            initializer: Some(initializer),
        }) = model.operation(*declarator).map(|op| &op.kind)
        else {
            continue;
        };
        let Some(pointee) = symbols
            .get_local(*local)
            .and_then(|l| l.local_type)
            .and_then(|ty| symbols.get_type(ty))
            .filter(|ty| ty.kind == TypeKind::Pointer)
            .and_then(|ty| ty.pointee)
        else {
            continue;
        };
        let Some(OperationKind::VariableInitializer { value }) =
            model.operation(*initializer).map(|op| &op.kind)
        else {
            continue;
        };
        if matches!(
            model.operation(*value).map(|op| &op.kind),
            Some(OperationKind::AddressOf { .. })
        ) {
            continue;
        }
        let Some(value_type) = model.type_of(*value) else {
            continue;
        };
        if facts.is_reference_type(value_type) {
            continue;
        }

        let Some(method) = resolve_pinnable_reference(&facts, value_type, within, cancel)? else {
            continue;
        };
        let returns_pointee = symbols
            .get_method(method)
            .is_some_and(|m| m.return_type == Some(pointee));
        let pins_void = symbols
            .get_type(pointee)
            .is_some_and(|ty| ty.special == SpecialType::Void);
        if returns_pointee || pins_void {
            accesses.push(MemberAccess::new(*value, method, *value).named("GetPinnableReference"));
        }
    }
    Ok(accesses)
}

/// Returns the name a receiver expression is shown with in findings.
///
/// # Arguments
///
/// * `model` - The semantic model containing the receiver
/// * `receiver` - The receiver expression
#[must_use]
pub fn receiver_display_name(model: &SemanticModel<'_>, receiver: OpId) -> String {
    let symbols = model.symbols();
    let Some(operation) = model.operation(receiver) else {
        return String::new();
    };
    let name_of = |token: Token| {
        symbols
            .name_of(token)
            .map_or_else(|| token.to_string(), str::to_string)
    };

    match &operation.kind {
        OperationKind::Invocation { method, .. } => name_of(*method),
        OperationKind::PropertyReference { property, .. } => match symbols.get_property(*property) {
            Some(symbol) if symbol.is_indexer => INDEXER_NAME.to_string(),
            _ => name_of(*property),
        },
        OperationKind::LocalReference { local } => name_of(*local),
        OperationKind::ParameterReference { parameter } => name_of(*parameter),
        OperationKind::FieldReference { field, .. } => name_of(*field),
        OperationKind::SimpleAssignment { is_ref: true, .. } => "assignment".to_string(),
        OperationKind::Conditional { .. } => "conditional".to_string(),
        OperationKind::InstanceReference { .. } => "this".to_string(),
        OperationKind::InlineArrayAccess { .. } | OperationKind::ImplicitIndexerReference { .. } => {
            INDEXER_NAME.to_string()
        }
        other => other.name().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::{LocalSymbol, MethodFlags, MethodSymbol, OperationTree, PropertySymbol, TypeSymbol},
        test::Fixture,
    };

    fn accesses(f: &Fixture, tree: &OperationTree, id: OpId) -> Vec<MemberAccess> {
        let model = SemanticModel::new(&f.symbols, tree);
        member_accesses(&model, id, &RuntimePolicy::default(), &CancellationToken::new()).unwrap()
    }

    #[test]
    fn test_invocation_and_static_call() {
        let f = Fixture::new();
        let mut b = f.builder();
        let receiver = b.parameter(f.in_param).unwrap();
        let call = b.call(f.s1_m1, Some(receiver), &[]).unwrap();
        let static_call = b.call(f.s1_ref_readonly_getter, None, &[]).unwrap();
        let tree = b.build();

        assert_eq!(
            accesses(&f, &tree, call),
            vec![MemberAccess::new(receiver, f.s1_m1, call)]
        );
        assert!(accesses(&f, &tree, static_call).is_empty());
    }

    #[test]
    fn test_property_usage_selects_accessors() {
        let f = Fixture::new();
        let mut b = f.builder();
        let read_receiver = b.local(f.local).unwrap();
        let read = b.property(f.s1_prop, Some(read_receiver), &[]).unwrap();

        let rw_receiver = b.local(f.local).unwrap();
        let rw = b.property(f.s1_prop, Some(rw_receiver), &[]).unwrap();
        let one = b.literal(Some(f.core.int32())).unwrap();
        b.push(
            OperationKind::CompoundAssignment {
                operator: BinaryOperator::Add,
                target: rw,
                value: one,
            },
            Some(f.core.int32()),
        )
        .unwrap();

        let index_receiver = b.local(f.local).unwrap();
        let index = b.literal(Some(f.core.int32())).unwrap();
        let index_arg = b.argument(None, index).unwrap();
        let indexer = b.property(f.s1_indexer, Some(index_receiver), &[index_arg]).unwrap();

        let named_receiver = b.local(f.local).unwrap();
        let named = b.property(f.s1_prop, Some(named_receiver), &[]).unwrap();
        b.push(OperationKind::NameOf { argument: named }, Some(f.core.string)).unwrap();
        let tree = b.build();

        let getter = f.symbols.property(f.s1_prop).unwrap().getter.unwrap();
        let setter = f.symbols.property(f.s1_prop).unwrap().setter.unwrap();

        let found = accesses(&f, &tree, read);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].target, getter);
        assert_eq!(found[0].display_name.as_deref(), Some("P"));

        let targets: Vec<Token> = accesses(&f, &tree, rw).iter().map(|a| a.target).collect();
        assert_eq!(targets, vec![getter, setter]);

        let found = accesses(&f, &tree, indexer);
        assert_eq!(found[0].display_name.as_deref(), Some(INDEXER_NAME));
        assert!(accesses(&f, &tree, named).is_empty());
    }

    #[test]
    fn test_event_assignment() {
        let f = Fixture::new();
        let mut b = f.builder();
        let receiver = b.local(f.local).unwrap();
        let event = b.event(f.s1_event, Some(receiver)).unwrap();
        let handler = b.literal(f.symbols.type_of(f.s1_event)).unwrap();
        let unsubscribe = b
            .push(
                OperationKind::EventAssignment {
                    event_reference: event,
                    handler,
                    adds: false,
                },
                None,
            )
            .unwrap();
        let tree = b.build();

        let remove = f.symbols.event(f.s1_event).unwrap().remove.unwrap();
        let found = accesses(&f, &tree, unsubscribe);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].target, remove);
        assert_eq!(found[0].location, event);
        assert_eq!(found[0].display_name.as_deref(), Some("Changed"));
    }

    #[test]
    fn test_for_each_and_await() {
        let f = Fixture::new();
        let mut b = f.builder();
        let collection = b.local(f.local).unwrap();
        let converted = b.implicit_conversion(collection, f.s1).unwrap();
        let loop_op = b
            .push(
                OperationKind::ForEachLoop {
                    collection: converted,
                    get_enumerator: Some(f.s1_get_enumerator),
                    body: None,
                },
                None,
            )
            .unwrap();

        let awaited = b.local(f.local).unwrap();
        let await_op = b
            .push(
                OperationKind::Await {
                    operand: awaited,
                    get_awaiter: Some(f.s1_get_awaiter),
                    is_dynamic: false,
                },
                None,
            )
            .unwrap();
        let dynamic = b.local(f.local).unwrap();
        let dynamic_await = b
            .push(
                OperationKind::Await {
                    operand: dynamic,
                    get_awaiter: Some(f.s1_get_awaiter),
                    is_dynamic: true,
                },
                None,
            )
            .unwrap();
        let tree = b.build();

        let found = accesses(&f, &tree, loop_op);
        assert_eq!(found[0].receiver, collection);
        assert_eq!(found[0].location, collection);
        assert_eq!(found[0].display_name.as_deref(), Some("GetEnumerator"));

        assert_eq!(
            accesses(&f, &tree, await_op),
            vec![MemberAccess::new(awaited, f.s1_get_awaiter, await_op)]
        );
        assert!(accesses(&f, &tree, dynamic_await).is_empty());
    }

    #[test]
    fn test_string_concatenation() {
        let f = Fixture::new();
        let mut b = f.builder();
        let text = b.literal(Some(f.core.string)).unwrap();
        let value = b.parameter(f.in_param).unwrap();
        let boxed = b.implicit_conversion(value, f.core.object).unwrap();
        let concat = b
            .binary(BinaryOperator::Add, text, boxed, Some(f.core.string))
            .unwrap();

        let text2 = b.literal(Some(f.core.string)).unwrap();
        let number = b.literal(Some(f.core.int32())).unwrap();
        let boxed_int = b.implicit_conversion(number, f.core.object).unwrap();
        let int_concat = b
            .binary(BinaryOperator::Add, text2, boxed_int, Some(f.core.string))
            .unwrap();

        let text3 = b.literal(Some(f.core.string)).unwrap();
        let value3 = b.parameter(f.in_param).unwrap();
        let explicit = b
            .push(
                OperationKind::Conversion {
                    operand: value3,
                    is_user_defined: false,
                    method: None,
                },
                Some(f.core.object),
            )
            .unwrap();
        let explicit_concat = b
            .binary(BinaryOperator::Add, text3, explicit, Some(f.core.string))
            .unwrap();
        let tree = b.build();

        let found = accesses(&f, &tree, concat);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].receiver, value);
        assert_eq!(found[0].target, f.s1_to_string);
        assert!(found[0].force_include);

        let int_to_string = f
            .core
            .primitive_members(SpecialType::Int32)
            .unwrap()
            .to_string;
        assert_eq!(accesses(&f, &tree, int_concat)[0].target, int_to_string);
        assert!(accesses(&f, &tree, explicit_concat).is_empty());
    }

    #[test]
    fn test_implicit_indexer_length_substitution() {
        let mut f = Fixture::new();
        // readonly indexer, mutable Length
        let ro_get_item = f
            .symbols
            .add_method(
                MethodSymbol::new("get_Item", MethodKind::PropertyGet)
                    .with_flags(MethodFlags::READONLY)
                    .with_return_type(f.core.int32())
                    .with_containing_type(f.s1),
            )
            .unwrap();
        let ro_indexer = f
            .symbols
            .add_property(
                PropertySymbol::new("Item", f.core.int32())
                    .indexer()
                    .with_getter(ro_get_item)
                    .with_containing_type(f.s1),
            )
            .unwrap();
        let index_local = f
            .symbols
            .add_local(LocalSymbol::new("i", f.core.index))
            .unwrap();

        let mut b = f.builder();
        let receiver = b.local(f.local).unwrap();
        let number = b.literal(Some(f.core.int32())).unwrap();
        let converted = b
            .push_implicit(
                OperationKind::Conversion {
                    operand: number,
                    is_user_defined: true,
                    method: Some(f.core.index_from_int),
                },
                Some(f.core.index),
            )
            .unwrap();
        let from_start = b
            .push(
                OperationKind::ImplicitIndexerReference {
                    instance: receiver,
                    argument: converted,
                    indexer: ro_indexer,
                    length: f.s1_length,
                },
                Some(f.core.int32()),
            )
            .unwrap();

        let receiver2 = b.local(f.local).unwrap();
        let hat = b.local(index_local).unwrap();
        let from_end = b
            .push(
                OperationKind::ImplicitIndexerReference {
                    instance: receiver2,
                    argument: hat,
                    indexer: ro_indexer,
                    length: f.s1_length,
                },
                Some(f.core.int32()),
            )
            .unwrap();
        let tree = b.build();

        let found = accesses(&f, &tree, from_start);
        assert_eq!(found[0].target, ro_get_item);
        assert_eq!(found[0].display_name.as_deref(), Some(INDEXER_NAME));

        let length_getter = f.symbols.property(f.s1_length).unwrap().getter.unwrap();
        let found = accesses(&f, &tree, from_end);
        assert_eq!(found[0].target, length_getter);
        assert_eq!(found[0].display_name.as_deref(), Some("Length"));
        assert!(found[0].force_include);
    }

    #[test]
    fn test_inline_array_indexer_is_skipped() {
        let mut f = Fixture::new();
        let buffer = f
            .symbols
            .add_type(
                TypeSymbol::new("Buffer", "App", TypeKind::Struct)
                    .with_base(f.core.value_type)
                    .with_attribute(f.core.inline_array),
            )
            .unwrap();
        let local = f.symbols.add_local(LocalSymbol::new("buffer", buffer)).unwrap();

        let mut b = f.builder();
        let receiver = b.local(local).unwrap();
        let index = b.literal(Some(f.core.int32())).unwrap();
        let access = b
            .push(
                OperationKind::ImplicitIndexerReference {
                    instance: receiver,
                    argument: index,
                    indexer: f.s1_indexer,
                    length: f.s1_length,
                },
                Some(f.core.int32()),
            )
            .unwrap();
        let tree = b.build();

        assert!(accesses(&f, &tree, access).is_empty());

        let model = SemanticModel::new(&f.symbols, &tree);
        let keep_copies = RuntimePolicy {
            inline_array_indexer_is_copy_free: false,
            inline_array_range_is_copy_free: true,
        };
        let found = member_accesses(&model, access, &keep_copies, &CancellationToken::new()).unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_fixed_statement() {
        let mut f = Fixture::new();
        let int_pointer = f
            .symbols
            .add_type(TypeSymbol::pointer_to(f.core.int32()))
            .unwrap();
        let byte_pointer = f
            .symbols
            .add_type(TypeSymbol::pointer_to(
                f.core.primitive(SpecialType::Byte).unwrap(),
            ))
            .unwrap();
        let p = f.symbols.add_local(LocalSymbol::new("p", int_pointer)).unwrap();
        let q = f.symbols.add_local(LocalSymbol::new("q", byte_pointer)).unwrap();

        let mut b = f.builder();
        let (fixed, value, mismatched) = b
            .member(f.run, |b| {
                let value = b.parameter(f.in_param)?;
                let init = b.push(OperationKind::VariableInitializer { value }, None)?;
                let decl = b.push(
                    OperationKind::VariableDeclarator {
                        local: p,
                        initializer: Some(init),
                    },
                    None,
                )?;
                let mismatched = b.parameter(f.in_param)?;
                let init2 = b.push(OperationKind::VariableInitializer { value: mismatched }, None)?;
                let decl2 = b.push(
                    OperationKind::VariableDeclarator {
                        local: q,
                        initializer: Some(init2),
                    },
                    None,
                )?;
                let fixed = b.push(
                    OperationKind::FixedStatement {
                        declarators: vec![decl, decl2],
                        body: None,
                    },
                    None,
                )?;
                Ok((fixed, value, mismatched))
            })
            .unwrap();
        let tree = b.build();

        let found = accesses(&f, &tree, fixed);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].receiver, value);
        assert_eq!(found[0].target, f.s1_get_pinnable);
        assert_eq!(found[0].display_name.as_deref(), Some("GetPinnableReference"));
        assert!(found.iter().all(|a| a.receiver != mismatched));
    }

    #[test]
    fn test_receiver_display_names() {
        let f = Fixture::new();
        let mut b = f.builder();
        let local = b.local(f.local).unwrap();
        let param = b.parameter(f.in_param).unwrap();
        let this = b.this(f.s2).unwrap();
        let field = b.field(f.s2_inner, Some(this)).unwrap();
        let call = b.call(f.s1_ref_readonly_getter, None, &[]).unwrap();
        let cond = b.literal(Some(f.core.boolean())).unwrap();
        let x = b.local(f.readonly_local).unwrap();
        let y = b.local(f.readonly_local).unwrap();
        let conditional = b.ref_conditional(cond, x, y).unwrap();
        let target = b.local(f.readonly_local).unwrap();
        let source = b.parameter(f.in_param).unwrap();
        let assignment = b.ref_assign(target, source).unwrap();
        let literal = b.literal(Some(f.s1)).unwrap();
        let tree = b.build();

        let model = SemanticModel::new(&f.symbols, &tree);
        let name = |id| receiver_display_name(&model, id);
        assert_eq!(name(local), "local");
        assert_eq!(name(param), "value");
        assert_eq!(name(field), "inner");
        assert_eq!(name(call), "GetRef");
        assert_eq!(name(conditional), "conditional");
        assert_eq!(name(assignment), "assignment");
        assert_eq!(name(literal), "Literal");

        let mut b = f.builder();
        let this = b.this(f.s1).unwrap();
        let tree = b.build();
        let model = SemanticModel::new(&f.symbols, &tree);
        assert_eq!(receiver_display_name(&model, this), "this");
    }
}
