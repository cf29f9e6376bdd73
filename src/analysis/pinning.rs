//! Resolution of the `GetPinnableReference` pattern used by `fixed` statements.

use crate::{
    analysis::{cancel::CancellationToken, facts::SymbolFacts},
    model::{MethodSymbol, RefKind, SymbolKind, Token, TypeKind},
    Result,
};

const GET_PINNABLE_REFERENCE: &str = "GetPinnableReference";

/// Returns the type declaring the code of `symbol`, looking through lambdas and local functions.
#[must_use]
pub fn containing_type_of(facts: &SymbolFacts<'_>, symbol: Token) -> Option<Token> {
    let symbols = facts.symbols();
    let mut current = symbol;
    for _ in 0..256 {
        current = match current.kind()? {
            SymbolKind::Method => {
                let method = symbols.get_method(current)?;
                match method.containing_type {
                    Some(ty) => return Some(ty),
                    None => method.containing_method?,
                }
            }
            SymbolKind::Field => return symbols.get_field(current)?.containing_type,
            SymbolKind::Property => return symbols.get_property(current)?.containing_type,
            SymbolKind::Event => return symbols.get_event(current)?.containing_type,
            SymbolKind::Type => return symbols.get_type(current)?.containing_type,
            _ => return None,
        };
    }
    None
}

/// Resolves the `GetPinnableReference` method a `fixed` statement pins a value of type `ty`
/// through.
///
/// A candidate is an accessible instance method without parameters returning by reference.
/// The exact type is searched first. For a type parameter, each constraint type is searched
/// directly and, for interface constraints, through all of the interfaces it inherits; a match
/// on more than one constraint is ambiguous and resolves to nothing.
///
/// # Arguments
///
/// * `facts` - Symbol queries
/// * `ty` - Static type of the pinned value
/// * `within` - The type containing the `fixed` statement
/// * `cancel` - Polled once per constraint type
///
/// # Errors
/// Returns [`crate::Error::Cancelled`] if `cancel` was triggered.
pub fn resolve_pinnable_reference(
    facts: &SymbolFacts<'_>,
    ty: Token,
    within: Token,
    cancel: &CancellationToken,
) -> Result<Option<Token>> {
    let candidate = |owner: Token| -> Option<Token> {
        facts
            .methods_named(owner, GET_PINNABLE_REFERENCE)
            .find(|(_, method)| is_candidate(facts, method, within))
            .map(|(token, _)| token)
    };

    if let Some(found) = candidate(ty) {
        return Ok(Some(found));
    }
    if !facts.is_type_parameter(ty) {
        return Ok(None);
    }

    let mut resolved = None;
    for constraint in facts.constraint_types(ty) {
        cancel.check()?;
        let local = candidate(*constraint).or_else(|| {
            let is_interface = facts
                .symbols()
                .get_type(*constraint)
                .is_some_and(|c| c.kind == TypeKind::Interface);
            if is_interface {
                facts
                    .all_interfaces(*constraint)
                    .into_iter()
                    .find_map(|interface| candidate(interface))
            } else {
                None
            }
        });

        if let Some(local) = local {
            if resolved.is_some() {
                log::debug!("ambiguous {} across constraints of {}", GET_PINNABLE_REFERENCE, ty);
                return Ok(None);
            }
            resolved = Some(local);
        }
    }
    Ok(resolved)
}

fn is_candidate(facts: &SymbolFacts<'_>, method: &MethodSymbol, within: Token) -> bool {
    !method.is_static()
        && method.parameters.is_empty()
        && method.ref_kind != RefKind::None
        && facts.is_accessible_within(method, within)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Accessibility, MethodFlags, MethodKind, SymbolTable, TypeParameterInfo, TypeSymbol,
    };

    fn pinnable(symbols: &mut SymbolTable, owner: Token, element: Token) -> Token {
        symbols
            .add_method(
                MethodSymbol::new(GET_PINNABLE_REFERENCE, MethodKind::Ordinary)
                    .with_ref_kind(RefKind::Ref)
                    .with_return_type(element)
                    .with_containing_type(owner),
            )
            .unwrap()
    }

    #[test]
    fn test_direct_and_inaccessible() {
        let mut symbols = SymbolTable::new();
        let element = symbols
            .add_type(TypeSymbol::new("Byte", "System", TypeKind::Struct))
            .unwrap();
        let buffer = symbols
            .add_type(TypeSymbol::new("Buffer", "App", TypeKind::Struct))
            .unwrap();
        let caller = symbols
            .add_type(TypeSymbol::new("Caller", "App", TypeKind::Class))
            .unwrap();
        let method = pinnable(&mut symbols, buffer, element);

        let hidden = symbols
            .add_type(TypeSymbol::new("Hidden", "App", TypeKind::Struct))
            .unwrap();
        symbols
            .add_method(
                MethodSymbol::new(GET_PINNABLE_REFERENCE, MethodKind::Ordinary)
                    .with_ref_kind(RefKind::Ref)
                    .with_accessibility(Accessibility::Private)
                    .with_containing_type(hidden),
            )
            .unwrap();

        let by_value = symbols
            .add_type(TypeSymbol::new("ByValue", "App", TypeKind::Struct))
            .unwrap();
        symbols
            .add_method(
                MethodSymbol::new(GET_PINNABLE_REFERENCE, MethodKind::Ordinary)
                    .with_containing_type(by_value),
            )
            .unwrap();
        let static_only = symbols
            .add_type(TypeSymbol::new("StaticOnly", "App", TypeKind::Struct))
            .unwrap();
        symbols
            .add_method(
                MethodSymbol::new(GET_PINNABLE_REFERENCE, MethodKind::Ordinary)
                    .with_flags(MethodFlags::STATIC)
                    .with_ref_kind(RefKind::Ref)
                    .with_containing_type(static_only),
            )
            .unwrap();

        let facts = SymbolFacts::new(&symbols);
        let cancel = CancellationToken::new();
        let resolve = |ty, within| resolve_pinnable_reference(&facts, ty, within, &cancel).unwrap();
        assert_eq!(resolve(buffer, caller), Some(method));
        assert_eq!(resolve(hidden, caller), None);
        assert!(resolve(hidden, hidden).is_some());
        assert_eq!(resolve(by_value, caller), None);
        assert_eq!(resolve(static_only, caller), None);
    }

    #[test]
    fn test_constraints_and_ambiguity() {
        let mut symbols = SymbolTable::new();
        let element = symbols
            .add_type(TypeSymbol::new("Char", "System", TypeKind::Struct))
            .unwrap();
        let caller = symbols
            .add_type(TypeSymbol::new("Caller", "App", TypeKind::Class))
            .unwrap();
        let base = symbols
            .add_type(TypeSymbol::new("IPinBase", "App", TypeKind::Interface))
            .unwrap();
        let inherited = pinnable(&mut symbols, base, element);
        let derived = symbols
            .add_type(TypeSymbol::new("IPin", "App", TypeKind::Interface).with_interface(base))
            .unwrap();
        let other = symbols
            .add_type(TypeSymbol::new("IOtherPin", "App", TypeKind::Interface))
            .unwrap();
        pinnable(&mut symbols, other, element);

        let single = symbols
            .add_type(TypeSymbol::type_parameter(
                "T",
                TypeParameterInfo::new(0, None).with_constraint(derived),
            ))
            .unwrap();
        let ambiguous = symbols
            .add_type(TypeSymbol::type_parameter(
                "U",
                TypeParameterInfo::new(1, None)
                    .with_constraint(derived)
                    .with_constraint(other),
            ))
            .unwrap();

        let facts = SymbolFacts::new(&symbols);
        let cancel = CancellationToken::new();
        let resolve = |ty| resolve_pinnable_reference(&facts, ty, caller, &cancel).unwrap();
        assert_eq!(resolve(single), Some(inherited));
        assert_eq!(resolve(ambiguous), None);
    }

    #[test]
    fn test_cancelled_constraint_search() {
        let mut symbols = SymbolTable::new();
        let element = symbols
            .add_type(TypeSymbol::new("Byte", "System", TypeKind::Struct))
            .unwrap();
        let caller = symbols
            .add_type(TypeSymbol::new("Caller", "App", TypeKind::Class))
            .unwrap();
        let buffer = symbols
            .add_type(TypeSymbol::new("Buffer", "App", TypeKind::Struct))
            .unwrap();
        pinnable(&mut symbols, buffer, element);
        let pin = symbols
            .add_type(TypeSymbol::new("IPin", "App", TypeKind::Interface))
            .unwrap();
        pinnable(&mut symbols, pin, element);
        let constrained = symbols
            .add_type(TypeSymbol::type_parameter(
                "T",
                TypeParameterInfo::new(0, None).with_constraint(pin),
            ))
            .unwrap();

        let facts = SymbolFacts::new(&symbols);
        let cancel = CancellationToken::new();
        cancel.cancel();

        // A direct match never reaches the constraint loop
        assert!(resolve_pinnable_reference(&facts, buffer, caller, &cancel)
            .unwrap()
            .is_some());
        assert!(matches!(
            resolve_pinnable_reference(&facts, constrained, caller, &cancel),
            Err(crate::Error::Cancelled)
        ));
    }

    #[test]
    fn test_containing_type_through_lambda() {
        let mut symbols = SymbolTable::new();
        let owner = symbols
            .add_type(TypeSymbol::new("C", "App", TypeKind::Class))
            .unwrap();
        let method = symbols
            .add_method(MethodSymbol::new("M", MethodKind::Ordinary).with_containing_type(owner))
            .unwrap();
        let lambda = symbols
            .add_method(MethodSymbol::new("<M>b__0", MethodKind::Lambda).with_containing_method(method))
            .unwrap();

        let facts = SymbolFacts::new(&symbols);
        assert_eq!(containing_type_of(&facts, lambda), Some(owner));
        assert_eq!(containing_type_of(&facts, method), Some(owner));
    }
}
