//! Core library seeding.
//!
//! The analysis depends on a handful of core library symbols: the universal base types
//! (`object`, `System.ValueType`, `System.Enum`) with their `ToString` / `Equals` / `GetHashCode`
//! members, the primitive value types, the nullable wrapper, `System.Index` / `System.Range` and
//! the generated-code and inline-array marker attributes. [`CoreLibrary::install`] registers these
//! symbols in a [`SymbolTable`] the way the reference assemblies of the chosen
//! [`TargetRuntime`] declare them. The runtimes differ in whether the primitives are
//! `readonly struct`s and whether the nullable wrapper's members are annotated `readonly`.
//!
//! ```rust
//! use copyscope::{config::TargetRuntime, model::{CoreLibrary, SpecialType, SymbolTable}};
//!
//! let mut symbols = SymbolTable::new();
//! let core = CoreLibrary::install(&mut symbols, TargetRuntime::NetFramework)?;
//! let int32 = core.primitive(SpecialType::Int32).unwrap();
//! assert!(!symbols.type_symbol(int32)?.is_readonly());
//! # Ok::<(), copyscope::Error>(())
//! ```

use crate::{
    config::TargetRuntime,
    model::{
        AssemblySymbol, MethodFlags, MethodKind, MethodSymbol, ModuleSymbol, ParameterSymbol,
        PropertySymbol, SpecialType, SymbolTable, Token, TypeFlags, TypeKind, TypeParameterInfo,
        TypeSymbol,
    },
    Result,
};

/// The universal members declared by a base type or overridden by a value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniversalMembers {
    /// `ToString()`
    pub to_string: Token,
    /// `Equals(object)`
    pub equals: Token,
    /// `GetHashCode()`
    pub get_hash_code: Token,
}

/// Tokens of the core library symbols installed into a [`SymbolTable`].
#[derive(Debug, Clone)]
pub struct CoreLibrary {
    /// The runtime the symbols were shaped after
    pub runtime: TargetRuntime,
    /// The core library assembly
    pub assembly: Token,
    /// The core library module
    pub module: Token,
    /// `System.Object`
    pub object: Token,
    /// `System.ValueType`
    pub value_type: Token,
    /// `System.Enum`
    pub enum_type: Token,
    /// `System.String`
    pub string: Token,
    /// `System.Void`
    pub void: Token,
    /// Members declared on `System.Object`
    pub object_members: UniversalMembers,
    /// Overrides declared on `System.ValueType`
    pub value_type_members: UniversalMembers,
    /// Overrides declared on `System.Enum`
    pub enum_members: UniversalMembers,
    /// `System.Enum.HasFlag(Enum)`
    pub enum_has_flag: Token,
    /// The generic definition ``System.Nullable`1``
    pub nullable: Token,
    /// The type parameter `T` of the nullable wrapper
    pub nullable_t: Token,
    /// `Nullable<T>.HasValue`
    pub nullable_has_value: Token,
    /// `Nullable<T>.Value`
    pub nullable_value: Token,
    /// `Nullable<T>.GetValueOrDefault()`
    pub nullable_get_value_or_default: Token,
    /// `Nullable<T>.GetValueOrDefault(T)`
    pub nullable_get_value_or_default_with: Token,
    /// Overrides declared on the nullable wrapper
    pub nullable_members: UniversalMembers,
    /// `System.Index`
    pub index: Token,
    /// `System.Index.op_Implicit(int)`
    pub index_from_int: Token,
    /// `System.Range`
    pub range: Token,
    /// `System.Runtime.CompilerServices.CompilerGeneratedAttribute`
    pub compiler_generated: Token,
    /// `System.Runtime.CompilerServices.InlineArrayAttribute`
    pub inline_array: Token,
    primitives: Vec<(SpecialType, Token, UniversalMembers)>,
}

const PRIMITIVES: [(SpecialType, &str); 16] = [
    (SpecialType::Boolean, "Boolean"),
    (SpecialType::Char, "Char"),
    (SpecialType::SByte, "SByte"),
    (SpecialType::Byte, "Byte"),
    (SpecialType::Int16, "Int16"),
    (SpecialType::UInt16, "UInt16"),
    (SpecialType::Int32, "Int32"),
    (SpecialType::UInt32, "UInt32"),
    (SpecialType::Int64, "Int64"),
    (SpecialType::UInt64, "UInt64"),
    (SpecialType::Single, "Single"),
    (SpecialType::Double, "Double"),
    (SpecialType::IntPtr, "IntPtr"),
    (SpecialType::UIntPtr, "UIntPtr"),
    (SpecialType::Decimal, "Decimal"),
    (SpecialType::DateTime, "DateTime"),
];

impl CoreLibrary {
    /// Registers the core library symbols of `runtime` in `symbols`.
    ///
    /// # Arguments
    ///
    /// * `symbols` - The table to populate
    /// * `runtime` - The runtime whose reference assemblies are mirrored
    ///
    /// # Errors
    /// Returns an error only if the table is already full.
    pub fn install(symbols: &mut SymbolTable, runtime: TargetRuntime) -> Result<CoreLibrary> {
        let assembly_name = match runtime {
            TargetRuntime::NetFramework => "mscorlib",
            _ => "System.Private.CoreLib",
        };
        let assembly = symbols.add_assembly(AssemblySymbol::new(assembly_name))?;
        let module = symbols.add_module(ModuleSymbol::new(
            format!("{}.dll", assembly_name),
            assembly,
        ))?;

        let object = symbols.add_type(
            TypeSymbol::new("Object", "System", TypeKind::Class)
                .with_special(SpecialType::Object)
                .with_module(module),
        )?;
        let string = symbols.add_type(
            TypeSymbol::new("String", "System", TypeKind::Class)
                .with_special(SpecialType::String)
                .with_base(object)
                .with_module(module),
        )?;
        let boolean_placeholder = symbols.add_type(
            TypeSymbol::new("Boolean", "System", TypeKind::Struct)
                .with_special(SpecialType::Boolean)
                .with_module(module),
        )?;
        let int32_placeholder = symbols.add_type(
            TypeSymbol::new("Int32", "System", TypeKind::Struct)
                .with_special(SpecialType::Int32)
                .with_module(module),
        )?;

        let object_members = Self::universal_members(
            symbols,
            object,
            None,
            MethodFlags::VIRTUAL,
            string,
            boolean_placeholder,
            int32_placeholder,
        )?;

        let value_type = symbols.add_type(
            TypeSymbol::new("ValueType", "System", TypeKind::Class)
                .with_special(SpecialType::ValueType)
                .with_base(object)
                .with_module(module),
        )?;
        let value_type_members = Self::universal_members(
            symbols,
            value_type,
            Some(object_members),
            MethodFlags::empty(),
            string,
            boolean_placeholder,
            int32_placeholder,
        )?;

        let enum_type = symbols.add_type(
            TypeSymbol::new("Enum", "System", TypeKind::Class)
                .with_special(SpecialType::Enum)
                .with_base(value_type)
                .with_module(module),
        )?;
        let enum_members = Self::universal_members(
            symbols,
            enum_type,
            Some(value_type_members),
            MethodFlags::empty(),
            string,
            boolean_placeholder,
            int32_placeholder,
        )?;
        let enum_has_flag = symbols.add_method(
            MethodSymbol::new("HasFlag", MethodKind::Ordinary)
                .with_containing_type(enum_type)
                .with_return_type(boolean_placeholder),
        )?;
        symbols.add_parameter(enum_has_flag, ParameterSymbol::new("flag", enum_type))?;

        let void = symbols.add_type(
            TypeSymbol::new("Void", "System", TypeKind::Struct)
                .with_special(SpecialType::Void)
                .with_base(value_type)
                .with_module(module),
        )?;

        let primitive_flags = if runtime.has_readonly_primitives() {
            TypeFlags::READONLY
        } else {
            TypeFlags::empty()
        };
        let mut primitives = Vec::with_capacity(PRIMITIVES.len());
        for (special, name) in PRIMITIVES {
            let token = match special {
                SpecialType::Boolean => boolean_placeholder,
                SpecialType::Int32 => int32_placeholder,
                _ => symbols.add_type(
                    TypeSymbol::new(name, "System", TypeKind::Struct)
                        .with_special(special)
                        .with_module(module),
                )?,
            };
            let ty = symbols.type_mut(token)?;
            ty.base = Some(value_type);
            ty.flags |= primitive_flags;

            let members = Self::universal_members(
                symbols,
                token,
                Some(value_type_members),
                MethodFlags::empty(),
                string,
                boolean_placeholder,
                int32_placeholder,
            )?;
            primitives.push((special, token, members));
        }

        let nullable = symbols.add_type(
            TypeSymbol::new("Nullable`1", "System", TypeKind::Struct)
                .with_base(value_type)
                .with_module(module),
        )?;
        let nullable_t = symbols.add_type(TypeSymbol::type_parameter(
            "T",
            TypeParameterInfo::new(0, Some(nullable)).with_value_type_constraint(),
        ))?;
        symbols.type_mut(nullable)?.type_arguments.push(nullable_t);

        let accessor_flags = if runtime.has_readonly_nullable_accessors() {
            MethodFlags::READONLY
        } else {
            MethodFlags::empty()
        };
        let get_has_value = symbols.add_method(
            MethodSymbol::new("get_HasValue", MethodKind::PropertyGet)
                .with_flags(accessor_flags)
                .with_containing_type(nullable)
                .with_return_type(boolean_placeholder),
        )?;
        let nullable_has_value = symbols.add_property(
            PropertySymbol::new("HasValue", boolean_placeholder)
                .with_getter(get_has_value)
                .with_containing_type(nullable),
        )?;
        let get_value = symbols.add_method(
            MethodSymbol::new("get_Value", MethodKind::PropertyGet)
                .with_flags(accessor_flags)
                .with_containing_type(nullable)
                .with_return_type(nullable_t),
        )?;
        let nullable_value = symbols.add_property(
            PropertySymbol::new("Value", nullable_t)
                .with_getter(get_value)
                .with_containing_type(nullable),
        )?;
        let nullable_get_value_or_default = symbols.add_method(
            MethodSymbol::new("GetValueOrDefault", MethodKind::Ordinary)
                .with_flags(accessor_flags)
                .with_containing_type(nullable)
                .with_return_type(nullable_t),
        )?;
        let nullable_get_value_or_default_with = symbols.add_method(
            MethodSymbol::new("GetValueOrDefault", MethodKind::Ordinary)
                .with_flags(accessor_flags)
                .with_containing_type(nullable)
                .with_return_type(nullable_t),
        )?;
        symbols.add_parameter(
            nullable_get_value_or_default_with,
            ParameterSymbol::new("defaultValue", nullable_t),
        )?;
        let nullable_members = Self::universal_members(
            symbols,
            nullable,
            Some(value_type_members),
            MethodFlags::empty(),
            string,
            boolean_placeholder,
            int32_placeholder,
        )?;

        let index_flags = if runtime.has_readonly_primitives() {
            TypeFlags::READONLY
        } else {
            TypeFlags::empty()
        };
        let index = symbols.add_type(
            TypeSymbol::new("Index", "System", TypeKind::Struct)
                .with_base(value_type)
                .with_flags(index_flags)
                .with_module(module),
        )?;
        let index_from_int = symbols.add_method(
            MethodSymbol::new("op_Implicit", MethodKind::Conversion)
                .with_flags(MethodFlags::STATIC)
                .with_containing_type(index)
                .with_return_type(index),
        )?;
        symbols.add_parameter(index_from_int, ParameterSymbol::new("value", int32_placeholder))?;
        let range = symbols.add_type(
            TypeSymbol::new("Range", "System", TypeKind::Struct)
                .with_base(value_type)
                .with_flags(index_flags)
                .with_module(module),
        )?;

        let compiler_generated = symbols.add_type(
            TypeSymbol::new(
                "CompilerGeneratedAttribute",
                "System.Runtime.CompilerServices",
                TypeKind::Class,
            )
            .with_base(object)
            .with_module(module),
        )?;
        let inline_array = symbols.add_type(
            TypeSymbol::new(
                "InlineArrayAttribute",
                "System.Runtime.CompilerServices",
                TypeKind::Class,
            )
            .with_base(object)
            .with_module(module),
        )?;

        Ok(CoreLibrary {
            runtime,
            assembly,
            module,
            object,
            value_type,
            enum_type,
            string,
            void,
            object_members,
            value_type_members,
            enum_members,
            enum_has_flag,
            nullable,
            nullable_t,
            nullable_has_value,
            nullable_value,
            nullable_get_value_or_default,
            nullable_get_value_or_default_with,
            nullable_members,
            index,
            index_from_int,
            range,
            compiler_generated,
            inline_array,
            primitives,
        })
    }

    fn universal_members(
        symbols: &mut SymbolTable,
        owner: Token,
        overrides: Option<UniversalMembers>,
        flags: MethodFlags,
        string: Token,
        boolean: Token,
        int32: Token,
    ) -> Result<UniversalMembers> {
        let declare = |symbols: &mut SymbolTable,
                       name: &str,
                       return_type: Token,
                       overridden: Option<Token>|
         -> Result<Token> {
            let mut method = MethodSymbol::new(name, MethodKind::Ordinary)
                .with_flags(flags)
                .with_containing_type(owner)
                .with_return_type(return_type);
            if let Some(overridden) = overridden {
                method = method.with_overridden(overridden);
            }
            symbols.add_method(method)
        };

        let to_string = declare(symbols, "ToString", string, overrides.map(|m| m.to_string))?;
        let equals = declare(symbols, "Equals", boolean, overrides.map(|m| m.equals))?;
        let object = match overrides {
            Some(_) => symbols.find_type("System", "Object").unwrap_or(owner),
            None => owner,
        };
        symbols.add_parameter(equals, ParameterSymbol::new("obj", object))?;
        let get_hash_code =
            declare(symbols, "GetHashCode", int32, overrides.map(|m| m.get_hash_code))?;

        Ok(UniversalMembers {
            to_string,
            equals,
            get_hash_code,
        })
    }

    /// Returns the token of a primitive type
    #[must_use]
    pub fn primitive(&self, special: SpecialType) -> Option<Token> {
        self.primitives
            .iter()
            .find(|(kind, _, _)| *kind == special)
            .map(|(_, token, _)| *token)
    }

    /// Returns the universal member overrides declared by a primitive type
    #[must_use]
    pub fn primitive_members(&self, special: SpecialType) -> Option<UniversalMembers> {
        self.primitives
            .iter()
            .find(|(kind, _, _)| *kind == special)
            .map(|(_, _, members)| *members)
    }

    /// Returns `System.Int32`
    #[must_use]
    pub fn int32(&self) -> Token {
        self.primitive(SpecialType::Int32).unwrap_or(self.object)
    }

    /// Returns `System.Boolean`
    #[must_use]
    pub fn boolean(&self) -> Token {
        self.primitive(SpecialType::Boolean).unwrap_or(self.object)
    }

    /// Creates the constructed nullable wrapper of a value type.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidToken`] if `underlying` is unknown.
    pub fn nullable_of(&self, symbols: &mut SymbolTable, underlying: Token) -> Result<Token> {
        symbols.construct(self.nullable, &[underlying])
    }
}
