//! Read-only symbol queries used by every analysis pass.
//!
//! [`SymbolFacts`] answers the questions the analysis asks about types and members: value or
//! reference semantics, `readonly` annotations, override and interface implementation
//! resolution, attribute presence and accessibility. All queries are total: an unknown token
//! answers `false` or `None` instead of failing, which lets the passes skip unresolvable symbols
//! silently.

use std::collections::HashSet;

use crate::model::{
    Accessibility, MethodFlags, MethodSymbol, SpecialType, SymbolTable, Token, TypeKind,
    TypeSymbol, WellKnownType,
};

/// Upper bound for walks along base type and constraint chains of damaged symbol tables.
const MAX_CHAIN: usize = 256;

/// Query facade over a [`SymbolTable`].
#[derive(Debug, Clone, Copy)]
pub struct SymbolFacts<'a> {
    symbols: &'a SymbolTable,
}

impl<'a> SymbolFacts<'a> {
    /// Creates a facade over `symbols`
    #[must_use]
    pub fn new(symbols: &'a SymbolTable) -> Self {
        SymbolFacts { symbols }
    }

    /// Returns the underlying symbol table
    #[must_use]
    pub fn symbols(&self) -> &'a SymbolTable {
        self.symbols
    }

    /// Returns true if values of `ty` have value semantics.
    ///
    /// Type parameters are value types when constrained to `struct`/`unmanaged` or to another
    /// value type.
    #[must_use]
    pub fn is_value_type(&self, ty: Token) -> bool {
        self.is_value_type_at(ty, 0)
    }

    fn is_value_type_at(&self, ty: Token, depth: usize) -> bool {
        let Some(symbol) = self.symbols.get_type(ty) else {
            return false;
        };
        match symbol.kind {
            TypeKind::Struct | TypeKind::Enum => true,
            TypeKind::TypeParameter if depth < MAX_CHAIN => {
                symbol.type_parameter.as_ref().is_some_and(|info| {
                    info.has_value_type_constraint
                        || info
                            .constraint_types
                            .iter()
                            .any(|constraint| self.is_value_type_at(*constraint, depth + 1))
                })
            }
            _ => false,
        }
    }

    /// Returns true if values of `ty` have reference semantics.
    ///
    /// Type parameters are reference types when constrained to `class` or to a class other than
    /// `object`, `System.ValueType` and `System.Enum`.
    #[must_use]
    pub fn is_reference_type(&self, ty: Token) -> bool {
        self.is_reference_type_at(ty, 0)
    }

    fn is_reference_type_at(&self, ty: Token, depth: usize) -> bool {
        let Some(symbol) = self.symbols.get_type(ty) else {
            return false;
        };
        match symbol.kind {
            TypeKind::Class
            | TypeKind::Interface
            | TypeKind::Delegate
            | TypeKind::Array
            | TypeKind::Dynamic => true,
            TypeKind::TypeParameter if depth < MAX_CHAIN => {
                symbol.type_parameter.as_ref().is_some_and(|info| {
                    info.has_reference_constraint
                        || info.constraint_types.iter().any(|constraint| {
                            self.symbols.get_type(*constraint).is_some_and(|c| match c.kind {
                                TypeKind::Class | TypeKind::Delegate | TypeKind::Array => {
                                    !c.special.is_universal_base()
                                }
                                TypeKind::TypeParameter => {
                                    self.is_reference_type_at(*constraint, depth + 1)
                                }
                                _ => false,
                            })
                        })
                })
            }
            _ => false,
        }
    }

    /// Returns true if `ty` is a generic type parameter
    #[must_use]
    pub fn is_type_parameter(&self, ty: Token) -> bool {
        self.symbols
            .get_type(ty)
            .is_some_and(|symbol| symbol.kind == TypeKind::TypeParameter)
    }

    /// Returns true if `ty` is declared `readonly`
    #[must_use]
    pub fn is_type_readonly(&self, ty: Token) -> bool {
        self.symbols.get_type(ty).is_some_and(TypeSymbol::is_readonly)
    }

    /// Returns true if `method` never mutates its receiver, either because it is declared
    /// `readonly` or because it is an instance member of a `readonly` type
    #[must_use]
    pub fn is_method_readonly(&self, method: &MethodSymbol) -> bool {
        method.flags.contains(MethodFlags::READONLY)
            || (!method.is_static()
                && method
                    .containing_type
                    .is_some_and(|ty| self.is_type_readonly(ty)))
    }

    /// Returns true if the declaring type of `method` is `readonly`
    #[must_use]
    pub fn is_containing_type_readonly(&self, method: &MethodSymbol) -> bool {
        method
            .containing_type
            .is_some_and(|ty| self.is_type_readonly(ty))
    }

    /// Returns true if `method` is declared on `object`, `System.ValueType` or `System.Enum`
    #[must_use]
    pub fn is_on_universal_base(&self, method: &MethodSymbol) -> bool {
        method
            .containing_type
            .and_then(|ty| self.symbols.get_type(ty))
            .is_some_and(|ty| ty.special.is_universal_base())
    }

    /// Returns true if `method` is declared on an interface
    #[must_use]
    pub fn is_on_interface(&self, method: &MethodSymbol) -> bool {
        method
            .containing_type
            .and_then(|ty| self.symbols.get_type(ty))
            .is_some_and(|ty| ty.kind == TypeKind::Interface)
    }

    /// Returns the members of a type, resolving constructed generic types to their definition
    #[must_use]
    pub fn members(&self, ty: Token) -> &'a [Token] {
        let Some(symbol) = self.symbols.get_type(ty) else {
            return &[];
        };
        match symbol.original_definition {
            Some(definition) if symbol.members.is_empty() => self
                .symbols
                .get_type(definition)
                .map_or(&[], |def| def.members.as_slice()),
            _ => symbol.members.as_slice(),
        }
    }

    /// Returns the methods of a type with the given name
    pub fn methods_named<'n>(
        &self,
        ty: Token,
        name: &'n str,
    ) -> impl Iterator<Item = (Token, &'a MethodSymbol)> + 'n
    where
        'a: 'n,
    {
        let symbols = self.symbols;
        self.members(ty).iter().filter_map(move |member| {
            symbols
                .get_method(*member)
                .filter(|method| method.name == name)
                .map(|method| (*member, method))
        })
    }

    /// Returns `ty` followed by its base types, most derived first
    #[must_use]
    pub fn type_and_bases(&self, ty: Token) -> Vec<Token> {
        let mut chain = Vec::new();
        let mut current = Some(ty);
        while let Some(token) = current {
            if chain.len() >= MAX_CHAIN || chain.contains(&token) {
                break;
            }
            let Some(symbol) = self.symbols.get_type(token) else {
                break;
            };
            chain.push(token);
            current = symbol.base;
        }
        chain
    }

    /// Finds the method of `ty` or one of its bases that overrides `method`, directly or through
    /// a chain of intermediate overrides.
    ///
    /// # Arguments
    ///
    /// * `ty` - The type to search, usually the receiver type
    /// * `method` - The virtual base method
    #[must_use]
    pub fn override_for(&self, ty: Token, method: Token) -> Option<Token> {
        for owner in self.type_and_bases(ty) {
            for member in self.members(owner) {
                let Some(candidate) = self.symbols.get_method(*member) else {
                    continue;
                };

                let mut overridden = candidate.overridden;
                let mut steps = 0;
                while let Some(current) = overridden {
                    if current == method {
                        return Some(*member);
                    }
                    steps += 1;
                    if steps >= MAX_CHAIN {
                        break;
                    }
                    overridden = self.symbols.get_method(current).and_then(|m| m.overridden);
                }
            }
        }
        None
    }

    /// Returns every interface `ty` implements, directly, through its bases or through
    /// interface inheritance
    #[must_use]
    pub fn all_interfaces(&self, ty: Token) -> Vec<Token> {
        let mut result = Vec::new();
        let mut visited = HashSet::new();
        let mut pending: Vec<Token> = Vec::new();

        for owner in self.type_and_bases(ty) {
            if let Some(symbol) = self.symbols.get_type(owner) {
                pending.extend(symbol.interfaces.iter().rev());
            }
            while let Some(interface) = pending.pop() {
                if !visited.insert(interface) {
                    continue;
                }
                result.push(interface);
                if let Some(symbol) = self.symbols.get_type(interface) {
                    pending.extend(symbol.interfaces.iter().rev());
                }
            }
        }
        result
    }

    /// Finds the member of `ty` that implements `interface_method`.
    ///
    /// Explicit implementations win over implicit ones; implicit implementations are matched by
    /// name and parameter types. Type parameters and types that do not implement the interface
    /// have no implementation.
    #[must_use]
    pub fn find_implementation(&self, ty: Token, interface_method: Token) -> Option<Token> {
        let target = self.symbols.get_method(interface_method)?;
        let interface = target.containing_type?;
        if self.is_type_parameter(ty) {
            return None;
        }

        let interface_definition = self.definition_of(interface);
        let implements_interface = self
            .all_interfaces(ty)
            .into_iter()
            .any(|candidate| candidate == interface || self.definition_of(candidate) == interface_definition);
        if !implements_interface {
            return None;
        }

        let target_definition = target.original_definition.unwrap_or(interface_method);
        let owners = self.type_and_bases(ty);

        for owner in &owners {
            for member in self.members(*owner) {
                if let Some(method) = self.symbols.get_method(*member) {
                    if method
                        .implements
                        .iter()
                        .any(|m| *m == interface_method || *m == target_definition)
                    {
                        return Some(*member);
                    }
                }
            }
        }

        for owner in &owners {
            for (token, method) in self.methods_named(*owner, &target.name) {
                if !method.is_static()
                    && method.accessibility == Accessibility::Public
                    && self.same_parameter_types(method, target)
                {
                    return Some(token);
                }
            }
        }
        None
    }

    fn same_parameter_types(&self, left: &MethodSymbol, right: &MethodSymbol) -> bool {
        left.parameters.len() == right.parameters.len()
            && left
                .parameters
                .iter()
                .zip(&right.parameters)
                .all(|(l, r)| {
                    match (self.symbols.get_parameter(*l), self.symbols.get_parameter(*r)) {
                        (Some(l), Some(r)) => l.param_type == r.param_type && l.ref_kind == r.ref_kind,
                        _ => false,
                    }
                })
    }

    fn definition_of(&self, ty: Token) -> Token {
        self.symbols
            .get_type(ty)
            .and_then(|symbol| symbol.original_definition)
            .unwrap_or(ty)
    }

    /// Classifies a type as one of the library types recognised by name
    #[must_use]
    pub fn well_known(&self, ty: Token) -> Option<WellKnownType> {
        let definition = self.definition_of(ty);
        let symbol = self.symbols.get_type(definition)?;
        if symbol.kind == TypeKind::TypeParameter || symbol.containing_type.is_some() {
            return None;
        }
        symbol.full_name().parse().ok()
    }

    /// Returns true if `ty` is a constructed nullable value wrapper
    #[must_use]
    pub fn is_nullable(&self, ty: Token) -> bool {
        self.well_known(ty) == Some(WellKnownType::Nullable)
    }

    /// Returns true if `ty` is an enumeration
    #[must_use]
    pub fn is_enum(&self, ty: Token) -> bool {
        self.symbols
            .get_type(ty)
            .is_some_and(|symbol| symbol.kind == TypeKind::Enum)
    }

    /// Returns the explicit constraint types of a type parameter
    #[must_use]
    pub fn constraint_types(&self, ty: Token) -> &'a [Token] {
        self.symbols
            .get_type(ty)
            .and_then(|symbol| symbol.type_parameter.as_ref())
            .map_or(&[], |info| info.constraint_types.as_slice())
    }

    /// Returns true if `ty` is a type parameter constrained to `System.Enum`
    #[must_use]
    pub fn has_enum_constraint(&self, ty: Token) -> bool {
        self.constraint_types(ty).iter().any(|constraint| {
            self.symbols
                .get_type(*constraint)
                .is_some_and(|c| c.special == SpecialType::Enum)
        })
    }

    /// Returns true if `symbol` carries an attribute of the given well-known class
    #[must_use]
    pub fn has_attribute(&self, symbol: Token, attribute: WellKnownType) -> bool {
        self.symbols
            .attributes_of(symbol)
            .iter()
            .any(|class| self.well_known(*class) == Some(attribute))
    }

    /// Returns true if `method` may be called from code inside `within`.
    ///
    /// # Arguments
    ///
    /// * `method` - The candidate method
    /// * `within` - The type containing the calling code
    #[must_use]
    pub fn is_accessible_within(&self, method: &MethodSymbol, within: Token) -> bool {
        let Some(owner) = method.containing_type else {
            return true;
        };

        match method.accessibility {
            Accessibility::Public => true,
            Accessibility::Internal | Accessibility::ProtectedInternal => {
                self.same_assembly(owner, within)
                    || (method.accessibility == Accessibility::ProtectedInternal
                        && self.is_within_derived(owner, within))
            }
            Accessibility::Protected => {
                self.is_nested_within(owner, within) || self.is_within_derived(owner, within)
            }
            Accessibility::PrivateProtected => {
                self.is_nested_within(owner, within)
                    || (self.same_assembly(owner, within) && self.is_within_derived(owner, within))
            }
            Accessibility::Private => self.is_nested_within(owner, within),
        }
    }

    fn enclosing_types(&self, ty: Token) -> Vec<Token> {
        let mut chain = Vec::new();
        let mut current = Some(ty);
        while let Some(token) = current {
            if chain.len() >= MAX_CHAIN || chain.contains(&token) {
                break;
            }
            chain.push(token);
            current = self.symbols.get_type(token).and_then(|s| s.containing_type);
        }
        chain
    }

    fn is_nested_within(&self, owner: Token, within: Token) -> bool {
        let owner = self.definition_of(owner);
        self.enclosing_types(within)
            .into_iter()
            .any(|ty| self.definition_of(ty) == owner)
    }

    fn is_within_derived(&self, owner: Token, within: Token) -> bool {
        let owner = self.definition_of(owner);
        self.enclosing_types(within).into_iter().any(|ty| {
            self.type_and_bases(ty)
                .into_iter()
                .any(|base| self.definition_of(base) == owner)
        })
    }

    fn assembly_of(&self, ty: Token) -> Option<Token> {
        let outermost = *self.enclosing_types(ty).last()?;
        let module = self.symbols.get_type(outermost)?.module?;
        self.symbols.get_module(module)?.assembly
    }

    fn same_assembly(&self, left: Token, right: Token) -> bool {
        match (self.assembly_of(left), self.assembly_of(right)) {
            (Some(l), Some(r)) => l == r,
            _ => true,
        }
    }
}
