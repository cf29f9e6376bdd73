//! The symbol table of the semantic model.
//!
//! [`SymbolTable`] owns one arena per [`SymbolKind`]. Registering a symbol hands out a [`Token`]
//! and wires up the reverse links the analysis relies on: members are appended to their
//! declaring type, parameters to their method, and accessors learn the property or event they
//! belong to. A populated table is never mutated by the analyzer and can be shared freely
//! between threads.

use crate::{
    model::{
        AssemblySymbol, EventSymbol, FieldSymbol, LocalSymbol, MethodSymbol, ModuleSymbol,
        ParameterSymbol, PropertySymbol, SymbolKind, Token, TypeKind, TypeSymbol,
    },
    Error, Result,
};

/// Arena of all symbols known to the analysis.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    assemblies: Vec<AssemblySymbol>,
    modules: Vec<ModuleSymbol>,
    types: Vec<TypeSymbol>,
    methods: Vec<MethodSymbol>,
    parameters: Vec<ParameterSymbol>,
    fields: Vec<FieldSymbol>,
    properties: Vec<PropertySymbol>,
    events: Vec<EventSymbol>,
    locals: Vec<LocalSymbol>,
}

fn next_token(kind: SymbolKind, len: usize) -> Result<Token> {
    let row = u32::try_from(len + 1).map_err(|_| malformed_error!("{} table is full", kind))?;
    if row > 0x00FF_FFFF {
        return Err(malformed_error!("{} table is full", kind));
    }
    Ok(Token::from_parts(kind, row))
}

fn index(token: Token, kind: SymbolKind) -> Option<usize> {
    if token.is(kind) {
        Some(token.row() as usize - 1)
    } else {
        None
    }
}

impl SymbolTable {
    /// Creates an empty symbol table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an assembly.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the assembly table is full.
    pub fn add_assembly(&mut self, assembly: AssemblySymbol) -> Result<Token> {
        let token = next_token(SymbolKind::Assembly, self.assemblies.len())?;
        self.assemblies.push(assembly);
        Ok(token)
    }

    /// Registers a module.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidToken`] if the owning assembly is unknown.
    pub fn add_module(&mut self, module: ModuleSymbol) -> Result<Token> {
        if let Some(assembly) = module.assembly {
            self.assembly(assembly)?;
        }

        let token = next_token(SymbolKind::Module, self.modules.len())?;
        self.modules.push(module);
        Ok(token)
    }

    /// Registers a type.
    ///
    /// Nested types are not added to the member list of their containing type; the link is kept
    /// in [`TypeSymbol::containing_type`] only.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidToken`] if the base type, containing type or module is
    /// unknown.
    pub fn add_type(&mut self, ty: TypeSymbol) -> Result<Token> {
        for referenced in [ty.base, ty.containing_type, ty.original_definition]
            .into_iter()
            .flatten()
        {
            self.type_symbol(referenced)?;
        }
        if let Some(module) = ty.module {
            self.module(module)?;
        }

        let token = next_token(SymbolKind::Type, self.types.len())?;
        self.types.push(ty);
        Ok(token)
    }

    /// Creates a constructed generic type from a generic definition.
    ///
    /// The constructed type shares the members of its definition; member lookups on it resolve
    /// through [`TypeSymbol::original_definition`].
    ///
    /// # Arguments
    ///
    /// * `definition` - The generic type definition (``Nullable`1``)
    /// * `type_arguments` - The type arguments, in order
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidToken`] if the definition or an argument is unknown.
    pub fn construct(&mut self, definition: Token, type_arguments: &[Token]) -> Result<Token> {
        for argument in type_arguments {
            self.type_symbol(*argument)?;
        }

        let def = self.type_symbol(definition)?;
        let mut constructed = TypeSymbol::new(def.name.clone(), def.namespace.clone(), def.kind);
        constructed.special = def.special;
        constructed.flags = def.flags;
        constructed.base = def.base;
        constructed.containing_type = def.containing_type;
        constructed.module = def.module;
        constructed.interfaces = def.interfaces.clone();
        constructed.attributes = def.attributes.clone();
        constructed.type_arguments = type_arguments.to_vec();
        constructed.original_definition = Some(definition);

        self.add_type(constructed)
    }

    /// Registers a method and appends it to the members of its declaring type.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidToken`] if a referenced type or method is unknown.
    pub fn add_method(&mut self, method: MethodSymbol) -> Result<Token> {
        if let Some(return_type) = method.return_type {
            self.type_symbol(return_type)?;
        }
        for referenced in [
            method.containing_method,
            method.overridden,
            method.original_definition,
        ]
        .into_iter()
        .flatten()
        {
            self.method(referenced)?;
        }
        for implemented in &method.implements {
            self.method(*implemented)?;
        }

        let token = next_token(SymbolKind::Method, self.methods.len())?;
        let containing_type = method.containing_type;
        self.push_member(containing_type, token)?;
        self.methods.push(method);
        Ok(token)
    }

    /// Registers a parameter of an already registered method.
    ///
    /// The ordinal and owning method of the parameter are set from its position.
    ///
    /// # Arguments
    ///
    /// * `method` - The owning method
    /// * `parameter` - The parameter to register
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidToken`] if the method or parameter type is unknown.
    pub fn add_parameter(&mut self, method: Token, mut parameter: ParameterSymbol) -> Result<Token> {
        if let Some(param_type) = parameter.param_type {
            self.type_symbol(param_type)?;
        }

        let token = next_token(SymbolKind::Parameter, self.parameters.len())?;
        let owner = self.method_mut(method)?;
        parameter.ordinal = u32::try_from(owner.parameters.len())
            .map_err(|_| malformed_error!("too many parameters on {}", method))?;
        parameter.containing_method = Some(method);
        owner.parameters.push(token);

        self.parameters.push(parameter);
        Ok(token)
    }

    /// Registers a field and appends it to the members of its declaring type.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidToken`] if a referenced symbol is unknown.
    pub fn add_field(&mut self, field: FieldSymbol) -> Result<Token> {
        if let Some(field_type) = field.field_type {
            self.type_symbol(field_type)?;
        }
        if let Some(associated) = field.associated {
            match associated.kind() {
                Some(SymbolKind::Property) => {
                    self.property(associated)?;
                }
                Some(SymbolKind::Event) => {
                    self.event(associated)?;
                }
                _ => return Err(Error::InvalidToken(associated)),
            }
        }

        let token = next_token(SymbolKind::Field, self.fields.len())?;
        self.push_member(field.containing_type, token)?;
        self.fields.push(field);
        Ok(token)
    }

    /// Registers a property, links its accessors and appends it to its declaring type.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidToken`] if a referenced symbol is unknown.
    pub fn add_property(&mut self, property: PropertySymbol) -> Result<Token> {
        if let Some(property_type) = property.property_type {
            self.type_symbol(property_type)?;
        }

        let token = next_token(SymbolKind::Property, self.properties.len())?;
        let accessors: Vec<Token> = [property.getter, property.setter].into_iter().flatten().collect();
        for accessor in &accessors {
            self.method(*accessor)?;
        }
        for accessor in accessors {
            self.method_mut(accessor)?.associated = Some(token);
        }
        self.push_member(property.containing_type, token)?;
        self.properties.push(property);
        Ok(token)
    }

    /// Registers an event, links its accessors and appends it to its declaring type.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidToken`] if a referenced symbol is unknown.
    pub fn add_event(&mut self, event: EventSymbol) -> Result<Token> {
        if let Some(event_type) = event.event_type {
            self.type_symbol(event_type)?;
        }

        let token = next_token(SymbolKind::Event, self.events.len())?;
        let accessors: Vec<Token> = [event.add, event.remove].into_iter().flatten().collect();
        for accessor in &accessors {
            self.method(*accessor)?;
        }
        for accessor in accessors {
            self.method_mut(accessor)?.associated = Some(token);
        }
        self.push_member(event.containing_type, token)?;
        self.events.push(event);
        Ok(token)
    }

    /// Registers a local variable.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidToken`] if the local type is unknown.
    pub fn add_local(&mut self, local: LocalSymbol) -> Result<Token> {
        if let Some(local_type) = local.local_type {
            self.type_symbol(local_type)?;
        }

        let token = next_token(SymbolKind::Local, self.locals.len())?;
        self.locals.push(local);
        Ok(token)
    }

    fn push_member(&mut self, containing_type: Option<Token>, member: Token) -> Result<()> {
        if let Some(containing_type) = containing_type {
            self.type_mut(containing_type)?.members.push(member);
        }
        Ok(())
    }

    /// Returns the number of registered types
    #[must_use]
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    /// Returns the number of registered methods
    #[must_use]
    pub fn method_count(&self) -> usize {
        self.methods.len()
    }

    /// Returns the assembly behind a token.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidToken`] if the token is not an assembly token.
    pub fn assembly(&self, token: Token) -> Result<&AssemblySymbol> {
        self.get_assembly(token).ok_or(Error::InvalidToken(token))
    }

    /// Returns the module behind a token.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidToken`] if the token is not a module token.
    pub fn module(&self, token: Token) -> Result<&ModuleSymbol> {
        self.get_module(token).ok_or(Error::InvalidToken(token))
    }

    /// Returns the type behind a token.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidToken`] if the token is not a type token.
    pub fn type_symbol(&self, token: Token) -> Result<&TypeSymbol> {
        self.get_type(token).ok_or(Error::InvalidToken(token))
    }

    /// Returns the method behind a token.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidToken`] if the token is not a method token.
    pub fn method(&self, token: Token) -> Result<&MethodSymbol> {
        self.get_method(token).ok_or(Error::InvalidToken(token))
    }

    /// Returns the property behind a token.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidToken`] if the token is not a property token.
    pub fn property(&self, token: Token) -> Result<&PropertySymbol> {
        self.get_property(token).ok_or(Error::InvalidToken(token))
    }

    /// Returns the event behind a token.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidToken`] if the token is not an event token.
    pub fn event(&self, token: Token) -> Result<&EventSymbol> {
        self.get_event(token).ok_or(Error::InvalidToken(token))
    }

    /// Returns a mutable reference to a type, used to complete a type after its members exist.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidToken`] if the token is not a type token.
    pub fn type_mut(&mut self, token: Token) -> Result<&mut TypeSymbol> {
        index(token, SymbolKind::Type)
            .and_then(|i| self.types.get_mut(i))
            .ok_or(Error::InvalidToken(token))
    }

    /// Returns a mutable reference to a method.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidToken`] if the token is not a method token.
    pub fn method_mut(&mut self, token: Token) -> Result<&mut MethodSymbol> {
        index(token, SymbolKind::Method)
            .and_then(|i| self.methods.get_mut(i))
            .ok_or(Error::InvalidToken(token))
    }

    /// Looks up an assembly
    #[must_use]
    pub fn get_assembly(&self, token: Token) -> Option<&AssemblySymbol> {
        index(token, SymbolKind::Assembly).and_then(|i| self.assemblies.get(i))
    }

    /// Looks up a module
    #[must_use]
    pub fn get_module(&self, token: Token) -> Option<&ModuleSymbol> {
        index(token, SymbolKind::Module).and_then(|i| self.modules.get(i))
    }

    /// Looks up a type
    #[must_use]
    pub fn get_type(&self, token: Token) -> Option<&TypeSymbol> {
        index(token, SymbolKind::Type).and_then(|i| self.types.get(i))
    }

    /// Looks up a method
    #[must_use]
    pub fn get_method(&self, token: Token) -> Option<&MethodSymbol> {
        index(token, SymbolKind::Method).and_then(|i| self.methods.get(i))
    }

    /// Looks up a parameter
    #[must_use]
    pub fn get_parameter(&self, token: Token) -> Option<&ParameterSymbol> {
        index(token, SymbolKind::Parameter).and_then(|i| self.parameters.get(i))
    }

    /// Looks up a field
    #[must_use]
    pub fn get_field(&self, token: Token) -> Option<&FieldSymbol> {
        index(token, SymbolKind::Field).and_then(|i| self.fields.get(i))
    }

    /// Looks up a property
    #[must_use]
    pub fn get_property(&self, token: Token) -> Option<&PropertySymbol> {
        index(token, SymbolKind::Property).and_then(|i| self.properties.get(i))
    }

    /// Looks up an event
    #[must_use]
    pub fn get_event(&self, token: Token) -> Option<&EventSymbol> {
        index(token, SymbolKind::Event).and_then(|i| self.events.get(i))
    }

    /// Looks up a local
    #[must_use]
    pub fn get_local(&self, token: Token) -> Option<&LocalSymbol> {
        index(token, SymbolKind::Local).and_then(|i| self.locals.get(i))
    }

    /// Returns the display name of any symbol, or `None` for an unknown token
    #[must_use]
    pub fn name_of(&self, token: Token) -> Option<&str> {
        match token.kind()? {
            SymbolKind::Assembly => self.get_assembly(token).map(|s| s.name.as_str()),
            SymbolKind::Module => self.get_module(token).map(|s| s.name.as_str()),
            SymbolKind::Type => self.get_type(token).map(|s| s.name.as_str()),
            SymbolKind::Method => self.get_method(token).map(|s| s.name.as_str()),
            SymbolKind::Parameter => self.get_parameter(token).map(|s| s.name.as_str()),
            SymbolKind::Field => self.get_field(token).map(|s| s.name.as_str()),
            SymbolKind::Property => self.get_property(token).map(|s| s.name.as_str()),
            SymbolKind::Event => self.get_event(token).map(|s| s.name.as_str()),
            SymbolKind::Local => self.get_local(token).map(|s| s.name.as_str()),
        }
    }

    /// Returns the attribute classes applied to any symbol
    #[must_use]
    pub fn attributes_of(&self, token: Token) -> &[Token] {
        let attributes = match token.kind() {
            Some(SymbolKind::Assembly) => self.get_assembly(token).map(|s| &s.attributes),
            Some(SymbolKind::Module) => self.get_module(token).map(|s| &s.attributes),
            Some(SymbolKind::Type) => self.get_type(token).map(|s| &s.attributes),
            Some(SymbolKind::Method) => self.get_method(token).map(|s| &s.attributes),
            Some(SymbolKind::Parameter) => self.get_parameter(token).map(|s| &s.attributes),
            Some(SymbolKind::Field) => self.get_field(token).map(|s| &s.attributes),
            Some(SymbolKind::Property) => self.get_property(token).map(|s| &s.attributes),
            Some(SymbolKind::Event) => self.get_event(token).map(|s| &s.attributes),
            Some(SymbolKind::Local) | None => None,
        };
        attributes.map_or(&[], Vec::as_slice)
    }

    /// Returns the declared type of a typed symbol (field, parameter, local, property, event)
    /// or the return type of a method
    #[must_use]
    pub fn type_of(&self, token: Token) -> Option<Token> {
        match token.kind()? {
            SymbolKind::Field => self.get_field(token)?.field_type,
            SymbolKind::Parameter => self.get_parameter(token)?.param_type,
            SymbolKind::Local => self.get_local(token)?.local_type,
            SymbolKind::Property => self.get_property(token)?.property_type,
            SymbolKind::Event => self.get_event(token)?.event_type,
            SymbolKind::Method => self.get_method(token)?.return_type,
            SymbolKind::Type => Some(token),
            SymbolKind::Module | SymbolKind::Assembly => None,
        }
    }

    /// Finds a top level type by namespace and name
    #[must_use]
    pub fn find_type(&self, namespace: &str, name: &str) -> Option<Token> {
        self.types
            .iter()
            .position(|ty| {
                ty.namespace == namespace
                    && ty.name == name
                    && ty.original_definition.is_none()
                    && ty.kind != TypeKind::TypeParameter
            })
            .and_then(|i| next_token(SymbolKind::Type, i).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MethodKind, RefKind};

    fn table_with_struct() -> (SymbolTable, Token) {
        let mut table = SymbolTable::new();
        let assembly = table.add_assembly(AssemblySymbol::new("App")).unwrap();
        let module = table.add_module(ModuleSymbol::new("App.dll", assembly)).unwrap();
        let s1 = table
            .add_type(TypeSymbol::new("S1", "App", TypeKind::Struct).with_module(module))
            .unwrap();
        (table, s1)
    }

    #[test]
    fn test_tokens_are_one_based_per_table() {
        let (mut table, s1) = table_with_struct();
        assert_eq!(s1, Token(0x02000001));

        let method = table
            .add_method(MethodSymbol::new("M1", MethodKind::Ordinary).with_containing_type(s1))
            .unwrap();
        assert_eq!(method, Token(0x06000001));
        assert_eq!(table.type_symbol(s1).unwrap().members, vec![method]);
    }

    #[test]
    fn test_add_parameter_sets_ordinal() {
        let (mut table, s1) = table_with_struct();
        let method = table
            .add_method(MethodSymbol::new("M1", MethodKind::Ordinary).with_containing_type(s1))
            .unwrap();
        let first = table
            .add_parameter(method, ParameterSymbol::new("a", s1))
            .unwrap();
        let second = table
            .add_parameter(
                method,
                ParameterSymbol::new("b", s1).with_ref_kind(RefKind::In),
            )
            .unwrap();

        assert_eq!(table.get_parameter(first).unwrap().ordinal, 0);
        assert_eq!(table.get_parameter(second).unwrap().ordinal, 1);
        assert_eq!(
            table.get_parameter(second).unwrap().containing_method,
            Some(method)
        );
        assert_eq!(table.method(method).unwrap().parameters, vec![first, second]);
    }

    #[test]
    fn test_add_property_links_accessors() {
        let (mut table, s1) = table_with_struct();
        let getter = table
            .add_method(MethodSymbol::new("get_P", MethodKind::PropertyGet).with_containing_type(s1))
            .unwrap();
        let property = table
            .add_property(
                PropertySymbol::new("P", s1)
                    .with_getter(getter)
                    .with_containing_type(s1),
            )
            .unwrap();

        assert_eq!(table.method(getter).unwrap().associated, Some(property));
        assert_eq!(table.name_of(property), Some("P"));
        assert_eq!(table.type_of(property), Some(s1));
    }

    #[test]
    fn test_dangling_references_are_rejected() {
        let (mut table, _) = table_with_struct();
        let missing = Token::from_parts(SymbolKind::Type, 42);

        let result = table.add_method(
            MethodSymbol::new("M1", MethodKind::Ordinary).with_containing_type(missing),
        );
        assert!(matches!(result, Err(Error::InvalidToken(token)) if token == missing));
        assert_eq!(table.method_count(), 0);

        let wrong_table = Token::from_parts(SymbolKind::Field, 1);
        assert!(matches!(
            table.type_symbol(wrong_table),
            Err(Error::InvalidToken(_))
        ));
    }

    #[test]
    fn test_construct_generic() {
        let (mut table, s1) = table_with_struct();
        let definition = table
            .add_type(TypeSymbol::new("Box`1", "App", TypeKind::Struct))
            .unwrap();
        let constructed = table.construct(definition, &[s1]).unwrap();

        let ty = table.type_symbol(constructed).unwrap();
        assert_eq!(ty.original_definition, Some(definition));
        assert_eq!(ty.type_arguments, vec![s1]);
        assert_eq!(ty.full_name(), "App.Box`1");
        assert_eq!(table.find_type("App", "Box`1"), Some(definition));
    }

    #[test]
    fn test_attributes_of_unknown_symbol_is_empty() {
        let table = SymbolTable::new();
        assert!(table.attributes_of(Token(0x06000009)).is_empty());
        assert!(table.name_of(Token(0x0A000001)).is_none());
    }
}
