//! Suppression of findings inside generated code.

use crate::{
    analysis::{cancel::CancellationToken, facts::SymbolFacts},
    model::{SymbolKind, Token, WellKnownType},
    Result,
};

/// Returns true if `symbol` or one of its containers is marked as compiler generated.
///
/// The walk visits a method, the property or event owning it, then its enclosing method (for
/// lambdas and local functions) or declaring type; a field and the property or event it backs,
/// then its declaring type; a property or event and its declaring type; a type, then its
/// enclosing type, else its module, else its assembly; a module and its assembly.
///
/// # Errors
/// Returns [`crate::Error::Cancelled`] if cancellation was requested.
pub fn is_generated_code(
    facts: &SymbolFacts<'_>,
    symbol: Option<Token>,
    cancel: &CancellationToken,
) -> Result<bool> {
    let symbols = facts.symbols();
    let marked = |token: Token| facts.has_attribute(token, WellKnownType::CompilerGeneratedAttribute);

    let mut current = symbol;
    while let Some(token) = current {
        cancel.check()?;

        if marked(token) {
            return Ok(true);
        }

        current = match token.kind() {
            Some(SymbolKind::Method) => {
                let Some(method) = symbols.get_method(token) else {
                    return Ok(false);
                };
                if method.associated.is_some_and(marked) {
                    return Ok(true);
                }
                method.containing_method.or(method.containing_type)
            }
            Some(SymbolKind::Field) => {
                let Some(field) = symbols.get_field(token) else {
                    return Ok(false);
                };
                if field.associated.is_some_and(marked) {
                    return Ok(true);
                }
                field.containing_type
            }
            Some(SymbolKind::Property) => symbols.get_property(token).and_then(|p| p.containing_type),
            Some(SymbolKind::Event) => symbols.get_event(token).and_then(|e| e.containing_type),
            Some(SymbolKind::Type) => symbols
                .get_type(token)
                .and_then(|ty| ty.containing_type.or(ty.module)),
            Some(SymbolKind::Module) => symbols.get_module(token).and_then(|m| m.assembly),
            _ => None,
        };
    }
    Ok(false)
}
