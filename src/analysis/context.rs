//! Properties of the member enclosing an analyzed expression.

use crate::{
    analysis::facts::SymbolFacts,
    model::{MethodKind, MethodSymbol, SymbolKind, Token},
};

/// What the enclosing member allows the code inside it to do with `this` and static fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnclosingContext {
    /// `this` is passed by read-only reference (`readonly` member or member of a `readonly`
    /// struct)
    pub is_readonly_member: bool,
    /// `readonly` instance fields of `this` may be assigned (constructors, `init` accessors)
    pub allows_mutating_this: bool,
    /// The type whose static initialization is running, if any (static constructors and
    /// static field initializers)
    pub static_initializer_type: Option<Token>,
}

impl EnclosingContext {
    /// Derives the context of code declared inside `enclosing`.
    ///
    /// # Arguments
    ///
    /// * `facts` - Symbol queries
    /// * `enclosing` - The innermost member declaration covering the code
    #[must_use]
    pub fn derive(facts: &SymbolFacts<'_>, enclosing: Option<Token>) -> Self {
        let Some(enclosing) = enclosing else {
            return EnclosingContext::default();
        };
        let symbols = facts.symbols();

        match enclosing.kind() {
            Some(SymbolKind::Field) => EnclosingContext {
                static_initializer_type: symbols
                    .get_field(enclosing)
                    .filter(|field| field.is_static())
                    .and_then(|field| field.containing_type),
                ..Default::default()
            },
            Some(SymbolKind::Method) => match symbols.get_method(enclosing) {
                Some(method) => EnclosingContext {
                    is_readonly_member: is_readonly_member(facts, method),
                    allows_mutating_this: !method.is_extension()
                        && !method.is_static()
                        && (method.is_init_only() || method.kind == MethodKind::Constructor),
                    static_initializer_type: if method.kind == MethodKind::StaticConstructor {
                        method.containing_type
                    } else {
                        None
                    },
                },
                None => EnclosingContext::default(),
            },
            Some(SymbolKind::Property) => EnclosingContext {
                is_readonly_member: symbols
                    .get_property(enclosing)
                    .and_then(|property| property.getter)
                    .and_then(|getter| symbols.get_method(getter))
                    .is_some_and(|getter| is_readonly_member(facts, getter)),
                ..Default::default()
            },
            _ => EnclosingContext::default(),
        }
    }
}

fn is_readonly_member(facts: &SymbolFacts<'_>, method: &MethodSymbol) -> bool {
    !method.is_extension() && facts.is_method_readonly(method)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        FieldFlags, FieldSymbol, MethodFlags, PropertySymbol, SymbolTable, TypeFlags, TypeKind,
        TypeSymbol,
    };

    #[test]
    fn test_derive_contexts() {
        let mut symbols = SymbolTable::new();
        let s = symbols
            .add_type(TypeSymbol::new("S", "App", TypeKind::Struct))
            .unwrap();
        let rs = symbols
            .add_type(TypeSymbol::new("RS", "App", TypeKind::Struct).with_flags(TypeFlags::READONLY))
            .unwrap();

        let ctor = symbols
            .add_method(MethodSymbol::new(".ctor", MethodKind::Constructor).with_containing_type(s))
            .unwrap();
        let cctor = symbols
            .add_method(
                MethodSymbol::new(".cctor", MethodKind::StaticConstructor)
                    .with_flags(MethodFlags::STATIC)
                    .with_containing_type(s),
            )
            .unwrap();
        let init = symbols
            .add_method(
                MethodSymbol::new("set_P", MethodKind::PropertySet)
                    .with_flags(MethodFlags::INIT_ONLY)
                    .with_containing_type(s),
            )
            .unwrap();
        let readonly_method = symbols
            .add_method(
                MethodSymbol::new("M", MethodKind::Ordinary)
                    .with_flags(MethodFlags::READONLY)
                    .with_containing_type(s),
            )
            .unwrap();
        let extension = symbols
            .add_method(
                MethodSymbol::new("E", MethodKind::Ordinary)
                    .with_flags(MethodFlags::STATIC | MethodFlags::EXTENSION)
                    .with_containing_type(rs),
            )
            .unwrap();
        let rs_getter = symbols
            .add_method(MethodSymbol::new("get_Q", MethodKind::PropertyGet).with_containing_type(rs))
            .unwrap();
        let rs_property = symbols
            .add_property(
                PropertySymbol::new("Q", s)
                    .with_getter(rs_getter)
                    .with_containing_type(rs),
            )
            .unwrap();
        let static_field = symbols
            .add_field(
                FieldSymbol::new("F", s)
                    .with_flags(FieldFlags::STATIC)
                    .with_containing_type(s),
            )
            .unwrap();
        let instance_field = symbols
            .add_field(FieldSymbol::new("G", s).with_containing_type(s))
            .unwrap();

        let facts = SymbolFacts::new(&symbols);
        let derive = |token| EnclosingContext::derive(&facts, Some(token));

        assert!(derive(ctor).allows_mutating_this);
        assert!(!derive(ctor).is_readonly_member);
        assert!(derive(init).allows_mutating_this);
        assert_eq!(derive(cctor).static_initializer_type, Some(s));
        assert!(!derive(cctor).allows_mutating_this);
        assert!(derive(readonly_method).is_readonly_member);
        assert!(!derive(extension).is_readonly_member);
        assert!(derive(rs_property).is_readonly_member);
        assert_eq!(derive(static_field).static_initializer_type, Some(s));
        assert_eq!(derive(instance_field), EnclosingContext::default());
        assert_eq!(
            EnclosingContext::derive(&facts, None),
            EnclosingContext::default()
        );
    }
}
