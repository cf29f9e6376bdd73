//! Classification of confirmed defensive copies.
//!
//! A copy is [`FindingClass::Unnecessary`] when the invoked member provably never mutates its
//! receiver: it is `readonly` itself, its receiver type is `readonly`, it resolves to a
//! non-mutating universal member, or it belongs to one of the core library types whose members
//! are known to be pure. Everything else is [`FindingClass::Necessary`].

use crate::{
    analysis::facts::SymbolFacts,
    findings::FindingClass,
    model::{MethodSymbol, RefKind, SymbolKind, Token, TypeKind},
};

/// Classifies the copy made to call `target` on a receiver of type `receiver_type`.
///
/// # Arguments
///
/// * `facts` - Symbol queries
/// * `receiver_type` - Static type of the copied receiver
/// * `target` - The invoked method or accessor
#[must_use]
pub fn classify(facts: &SymbolFacts<'_>, receiver_type: Token, target: Token) -> FindingClass {
    if is_unnecessary(facts, receiver_type, target) {
        FindingClass::Unnecessary
    } else {
        FindingClass::Necessary
    }
}

fn is_unnecessary(facts: &SymbolFacts<'_>, receiver_type: Token, target: Token) -> bool {
    let symbols = facts.symbols();
    let Some(method) = symbols.get_method(target) else {
        return false;
    };
    let Some(receiver) = symbols.get_type(receiver_type) else {
        return facts.is_method_readonly(method);
    };

    if facts.is_method_readonly(method) || receiver.is_readonly() {
        return true;
    }

    if facts.is_value_type(receiver_type)
        && receiver.kind != TypeKind::TypeParameter
        && facts.is_on_universal_base(method)
    {
        let pure_override = match facts
            .override_for(receiver_type, target)
            .and_then(|o| symbols.get_method(o))
        {
            None => true,
            Some(found) => facts.is_on_universal_base(found) || facts.is_method_readonly(found),
        };
        if pure_override {
            return true;
        }
    }

    if receiver.special.is_immutable_primitive() || facts.is_enum(receiver_type) {
        return true;
    }

    if facts.is_nullable(receiver_type) && is_pure_nullable_member(facts, method) {
        return true;
    }

    if facts.has_enum_constraint(receiver_type) {
        return true;
    }

    if facts.is_on_interface(method) {
        let readonly_implementation = facts
            .find_implementation(receiver_type, target)
            .and_then(|implementation| symbols.get_method(implementation))
            .is_some_and(|implementation| facts.is_method_readonly(implementation));
        if readonly_implementation {
            return true;
        }
    }

    false
}

/// `HasValue`, `Value`, `GetValueOrDefault()` and `GetValueOrDefault(T)` of the nullable
/// wrapper only read the wrapped value.
fn is_pure_nullable_member(facts: &SymbolFacts<'_>, method: &MethodSymbol) -> bool {
    let symbols = facts.symbols();
    let parameterless = matches!(
        method.name.as_str(),
        "get_HasValue" | "get_Value" | "GetValueOrDefault"
    ) && method.parameters.is_empty();
    if parameterless {
        return true;
    }
    if method.name != "GetValueOrDefault" {
        return false;
    }

    let definition = method
        .original_definition
        .and_then(|d| symbols.get_method(d))
        .unwrap_or(method);
    let [parameter] = definition.parameters.as_slice() else {
        return false;
    };
    let Some(parameter) = symbols.get_parameter(*parameter) else {
        return false;
    };
    if parameter.ref_kind != RefKind::None {
        return false;
    }

    parameter
        .param_type
        .and_then(|ty| symbols.get_type(ty))
        .and_then(|ty| ty.type_parameter.as_ref())
        .is_some_and(|info| {
            info.ordinal == 0 && info.owner.is_some_and(|owner| owner.is(SymbolKind::Type))
        })
}
