//! Symbol definitions of the semantic model.
//!
//! The host frontend describes every type and member it resolved as one of the symbol structs in
//! this module and registers it in a [`crate::model::SymbolTable`]. Symbols reference each other
//! exclusively through [`Token`]s, which keeps the table free of reference cycles and makes it
//! trivially shareable across the worker threads of the analyzer.
//!
//! All symbol structs follow the same construction pattern: a `new` constructor taking the
//! mandatory parts, followed by `with_*` builder methods for everything optional.
//!
//! ```rust
//! use copyscope::model::{MethodFlags, MethodKind, MethodSymbol, RefKind};
//!
//! let getter = MethodSymbol::new("get_Item", MethodKind::PropertyGet)
//!     .with_flags(MethodFlags::READONLY)
//!     .with_ref_kind(RefKind::RefReadOnly);
//! assert!(getter.returns_by_ref_readonly());
//! assert!(!getter.is_static());
//! ```

use bitflags::bitflags;
use strum::{Display, EnumString, IntoStaticStr};

use crate::model::Token;

/// Classification of a type symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum TypeKind {
    /// A reference type declared as `class`
    Class,
    /// A value type declared as `struct`
    Struct,
    /// An interface
    Interface,
    /// An enumeration, always a value type
    Enum,
    /// A delegate type
    Delegate,
    /// A generic type parameter, see [`TypeParameterInfo`]
    TypeParameter,
    /// An unmanaged pointer, see [`TypeSymbol::pointee`]
    Pointer,
    /// An array
    Array,
    /// The `dynamic` pseudo type
    Dynamic,
    /// A type the frontend could not resolve
    Error,
}

/// Types with a fixed meaning inside the core library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
pub enum SpecialType {
    /// Not a special type
    #[default]
    None,
    /// `System.Object`
    Object,
    /// `System.ValueType`
    ValueType,
    /// `System.Enum`
    Enum,
    /// `System.Void`
    Void,
    /// `System.String`
    String,
    /// `System.Boolean`
    Boolean,
    /// `System.Char`
    Char,
    /// `System.SByte`
    SByte,
    /// `System.Byte`
    Byte,
    /// `System.Int16`
    Int16,
    /// `System.UInt16`
    UInt16,
    /// `System.Int32`
    Int32,
    /// `System.UInt32`
    UInt32,
    /// `System.Int64`
    Int64,
    /// `System.UInt64`
    UInt64,
    /// `System.Single`
    Single,
    /// `System.Double`
    Double,
    /// `System.IntPtr`
    IntPtr,
    /// `System.UIntPtr`
    UIntPtr,
    /// `System.Decimal`
    Decimal,
    /// `System.DateTime`
    DateTime,
}

impl SpecialType {
    /// Returns true for `object`, `System.ValueType` and `System.Enum`, the three types that
    /// declare the universal `Equals` / `GetHashCode` / `ToString` members.
    #[must_use]
    pub fn is_universal_base(&self) -> bool {
        matches!(
            self,
            SpecialType::Object | SpecialType::ValueType | SpecialType::Enum
        )
    }

    /// Returns true for the primitive value types whose members never mutate the receiver,
    /// whether or not the core library annotates them as such.
    #[must_use]
    pub fn is_immutable_primitive(&self) -> bool {
        matches!(
            self,
            SpecialType::Boolean
                | SpecialType::Char
                | SpecialType::SByte
                | SpecialType::Byte
                | SpecialType::Int16
                | SpecialType::UInt16
                | SpecialType::Int32
                | SpecialType::UInt32
                | SpecialType::Int64
                | SpecialType::UInt64
                | SpecialType::Single
                | SpecialType::Double
                | SpecialType::IntPtr
                | SpecialType::UIntPtr
                | SpecialType::Decimal
                | SpecialType::DateTime
        )
    }
}

/// Library types recognised by their fully qualified metadata name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
pub enum WellKnownType {
    /// `System.Index`, produced by `^n` expressions
    #[strum(serialize = "System.Index")]
    Index,
    /// `System.Range`, produced by `a..b` expressions
    #[strum(serialize = "System.Range")]
    Range,
    /// The generic nullable value wrapper
    #[strum(serialize = "System.Nullable`1")]
    Nullable,
    /// The marker attribute for generated code
    #[strum(serialize = "System.Runtime.CompilerServices.CompilerGeneratedAttribute")]
    CompilerGeneratedAttribute,
    /// The attribute turning a struct into a fixed size inline buffer
    #[strum(serialize = "System.Runtime.CompilerServices.InlineArrayAttribute")]
    InlineArrayAttribute,
}

/// How a value is passed, returned or stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
pub enum RefKind {
    /// By value
    #[default]
    None,
    /// A mutable reference (`ref`)
    Ref,
    /// A read-only parameter reference (`in`)
    In,
    /// A read-only reference (`ref readonly` return, local or field)
    RefReadOnly,
    /// An output parameter (`out`)
    Out,
    /// A `ref readonly` parameter
    RefReadOnlyParameter,
}

/// Declared accessibility of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
pub enum Accessibility {
    /// `public`
    #[default]
    Public,
    /// `internal`
    Internal,
    /// `protected internal`
    ProtectedInternal,
    /// `protected`
    Protected,
    /// `private protected`
    PrivateProtected,
    /// `private`
    Private,
}

bitflags! {
    #[derive(PartialEq, Eq, Debug, Clone, Copy, Hash, Default)]
    /// Modifiers of a type symbol
    pub struct TypeFlags: u32 {
        /// The type is a `readonly struct`
        const READONLY = 0x0001;
        /// The type is a `ref struct`
        const REF_LIKE = 0x0002;
        /// The type is `static`
        const STATIC = 0x0004;
    }
}

bitflags! {
    #[derive(PartialEq, Eq, Debug, Clone, Copy, Hash, Default)]
    /// Modifiers of a method symbol
    pub struct MethodFlags: u32 {
        /// The method has no receiver
        const STATIC = 0x0001;
        /// The method is declared `readonly` and never mutates its receiver
        const READONLY = 0x0002;
        /// The method is an `init` accessor
        const INIT_ONLY = 0x0004;
        /// The method is an extension method
        const EXTENSION = 0x0008;
        /// The method is `virtual`
        const VIRTUAL = 0x0010;
        /// The method is `abstract`
        const ABSTRACT = 0x0020;
    }
}

bitflags! {
    #[derive(PartialEq, Eq, Debug, Clone, Copy, Hash, Default)]
    /// Modifiers of a field symbol
    pub struct FieldFlags: u32 {
        /// The field has no receiver
        const STATIC = 0x0001;
        /// The field is declared `readonly`
        const READONLY = 0x0002;
        /// The field is a compile time constant
        const CONST = 0x0004;
    }
}

/// Constraint information of a generic type parameter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TypeParameterInfo {
    /// Zero based position in the owner's type parameter list
    pub ordinal: u32,
    /// The declaring type or method
    pub owner: Option<Token>,
    /// `where T : class`
    pub has_reference_constraint: bool,
    /// `where T : struct`
    pub has_value_type_constraint: bool,
    /// `where T : unmanaged`
    pub has_unmanaged_constraint: bool,
    /// `where T : allows ref struct`
    pub allows_ref_like: bool,
    /// Explicit constraint types (`where T : IFoo, Base`)
    pub constraint_types: Vec<Token>,
}

impl TypeParameterInfo {
    /// Creates the constraint information for an unconstrained type parameter.
    ///
    /// # Arguments
    ///
    /// * `ordinal` - Zero based position in the owner's type parameter list
    /// * `owner` - The declaring type or method
    #[must_use]
    pub fn new(ordinal: u32, owner: Option<Token>) -> Self {
        TypeParameterInfo {
            ordinal,
            owner,
            ..Default::default()
        }
    }

    /// Adds a `class` constraint
    #[must_use]
    pub fn with_reference_constraint(mut self) -> Self {
        self.has_reference_constraint = true;
        self
    }

    /// Adds a `struct` constraint
    #[must_use]
    pub fn with_value_type_constraint(mut self) -> Self {
        self.has_value_type_constraint = true;
        self
    }

    /// Adds an `unmanaged` constraint
    #[must_use]
    pub fn with_unmanaged_constraint(mut self) -> Self {
        self.has_unmanaged_constraint = true;
        self.has_value_type_constraint = true;
        self
    }

    /// Adds a constraint type
    #[must_use]
    pub fn with_constraint(mut self, constraint: Token) -> Self {
        self.constraint_types.push(constraint);
        self
    }
}

/// A type, a constructed generic type, a type parameter or a pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSymbol {
    /// Metadata name, generic definitions carry their arity (``Nullable`1``)
    pub name: String,
    /// Namespace, empty for nested types and type parameters
    pub namespace: String,
    /// Classification
    pub kind: TypeKind,
    /// Core library role
    pub special: SpecialType,
    /// Modifiers
    pub flags: TypeFlags,
    /// Direct base type
    pub base: Option<Token>,
    /// Enclosing type of a nested type
    pub containing_type: Option<Token>,
    /// Module declaring the type
    pub module: Option<Token>,
    /// Directly implemented interfaces
    pub interfaces: Vec<Token>,
    /// Member symbols (methods, fields, properties, events)
    pub members: Vec<Token>,
    /// Type arguments of a constructed generic type
    pub type_arguments: Vec<Token>,
    /// The generic definition a constructed type was created from
    pub original_definition: Option<Token>,
    /// Constraint information, set for [`TypeKind::TypeParameter`]
    pub type_parameter: Option<TypeParameterInfo>,
    /// Target type of a [`TypeKind::Pointer`]
    pub pointee: Option<Token>,
    /// Attribute classes applied to the type
    pub attributes: Vec<Token>,
}

impl TypeSymbol {
    /// Creates a new type symbol.
    ///
    /// # Arguments
    ///
    /// * `name` - Metadata name of the type
    /// * `namespace` - Namespace of the type, may be empty
    /// * `kind` - Classification of the type
    pub fn new(name: impl Into<String>, namespace: impl Into<String>, kind: TypeKind) -> Self {
        TypeSymbol {
            name: name.into(),
            namespace: namespace.into(),
            kind,
            special: SpecialType::None,
            flags: TypeFlags::empty(),
            base: None,
            containing_type: None,
            module: None,
            interfaces: Vec::new(),
            members: Vec::new(),
            type_arguments: Vec::new(),
            original_definition: None,
            type_parameter: None,
            pointee: None,
            attributes: Vec::new(),
        }
    }

    /// Creates a generic type parameter.
    ///
    /// # Arguments
    ///
    /// * `name` - Name of the type parameter (`T`)
    /// * `info` - Ordinal, owner and constraints
    pub fn type_parameter(name: impl Into<String>, info: TypeParameterInfo) -> Self {
        let mut symbol = TypeSymbol::new(name, "", TypeKind::TypeParameter);
        symbol.type_parameter = Some(info);
        symbol
    }

    /// Creates an unmanaged pointer type.
    ///
    /// # Arguments
    ///
    /// * `pointee` - The pointed-at type
    #[must_use]
    pub fn pointer_to(pointee: Token) -> Self {
        let mut symbol = TypeSymbol::new("*", "", TypeKind::Pointer);
        symbol.pointee = Some(pointee);
        symbol
    }

    /// Sets the core library role
    #[must_use]
    pub fn with_special(mut self, special: SpecialType) -> Self {
        self.special = special;
        self
    }

    /// Adds modifiers
    #[must_use]
    pub fn with_flags(mut self, flags: TypeFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// Sets the direct base type
    #[must_use]
    pub fn with_base(mut self, base: Token) -> Self {
        self.base = Some(base);
        self
    }

    /// Nests the type inside another type
    #[must_use]
    pub fn with_containing_type(mut self, containing_type: Token) -> Self {
        self.containing_type = Some(containing_type);
        self
    }

    /// Sets the declaring module
    #[must_use]
    pub fn with_module(mut self, module: Token) -> Self {
        self.module = Some(module);
        self
    }

    /// Adds a directly implemented interface
    #[must_use]
    pub fn with_interface(mut self, interface: Token) -> Self {
        self.interfaces.push(interface);
        self
    }

    /// Applies an attribute class
    #[must_use]
    pub fn with_attribute(mut self, attribute: Token) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Returns the namespace qualified metadata name
    #[must_use]
    pub fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    /// Returns true if the type is declared `readonly`
    #[must_use]
    pub fn is_readonly(&self) -> bool {
        self.flags.contains(TypeFlags::READONLY)
    }
}

/// Classification of a method symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum MethodKind {
    /// A regular method
    Ordinary,
    /// An instance constructor
    Constructor,
    /// A static constructor
    StaticConstructor,
    /// A property or indexer getter
    PropertyGet,
    /// A property or indexer setter, including `init` accessors
    PropertySet,
    /// An event `add` accessor
    EventAdd,
    /// An event `remove` accessor
    EventRemove,
    /// A user defined conversion operator
    Conversion,
    /// A user defined operator
    UserDefinedOperator,
    /// A lambda or anonymous method
    Lambda,
    /// A local function
    LocalFunction,
    /// A finalizer
    Destructor,
}

/// A method, accessor, operator, lambda or local function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSymbol {
    /// Metadata name (`get_Value`, `.ctor`, `ToString`)
    pub name: String,
    /// Classification
    pub kind: MethodKind,
    /// Modifiers
    pub flags: MethodFlags,
    /// How the return value is passed back
    pub ref_kind: RefKind,
    /// Return type, `None` when unresolved
    pub return_type: Option<Token>,
    /// Parameter symbols in declaration order
    pub parameters: Vec<Token>,
    /// Declaring type
    pub containing_type: Option<Token>,
    /// Enclosing method of a lambda or local function
    pub containing_method: Option<Token>,
    /// Property or event owning an accessor
    pub associated: Option<Token>,
    /// The method this method overrides
    pub overridden: Option<Token>,
    /// Interface methods this method explicitly implements
    pub implements: Vec<Token>,
    /// The generic definition a constructed method was created from
    pub original_definition: Option<Token>,
    /// Declared accessibility
    pub accessibility: Accessibility,
    /// Attribute classes applied to the method
    pub attributes: Vec<Token>,
}

impl MethodSymbol {
    /// Creates a new public instance method returning by value.
    ///
    /// # Arguments
    ///
    /// * `name` - Metadata name of the method
    /// * `kind` - Classification of the method
    pub fn new(name: impl Into<String>, kind: MethodKind) -> Self {
        MethodSymbol {
            name: name.into(),
            kind,
            flags: MethodFlags::empty(),
            ref_kind: RefKind::None,
            return_type: None,
            parameters: Vec::new(),
            containing_type: None,
            containing_method: None,
            associated: None,
            overridden: None,
            implements: Vec::new(),
            original_definition: None,
            accessibility: Accessibility::Public,
            attributes: Vec::new(),
        }
    }

    /// Adds modifiers
    #[must_use]
    pub fn with_flags(mut self, flags: MethodFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// Sets the return kind
    #[must_use]
    pub fn with_ref_kind(mut self, ref_kind: RefKind) -> Self {
        self.ref_kind = ref_kind;
        self
    }

    /// Sets the return type
    #[must_use]
    pub fn with_return_type(mut self, return_type: Token) -> Self {
        self.return_type = Some(return_type);
        self
    }

    /// Sets the declaring type
    #[must_use]
    pub fn with_containing_type(mut self, containing_type: Token) -> Self {
        self.containing_type = Some(containing_type);
        self
    }

    /// Nests a lambda or local function inside another method
    #[must_use]
    pub fn with_containing_method(mut self, containing_method: Token) -> Self {
        self.containing_method = Some(containing_method);
        self
    }

    /// Sets the overridden method
    #[must_use]
    pub fn with_overridden(mut self, overridden: Token) -> Self {
        self.overridden = Some(overridden);
        self
    }

    /// Adds an explicitly implemented interface method
    #[must_use]
    pub fn with_implements(mut self, interface_method: Token) -> Self {
        self.implements.push(interface_method);
        self
    }

    /// Sets the generic definition
    #[must_use]
    pub fn with_original_definition(mut self, definition: Token) -> Self {
        self.original_definition = Some(definition);
        self
    }

    /// Sets the declared accessibility
    #[must_use]
    pub fn with_accessibility(mut self, accessibility: Accessibility) -> Self {
        self.accessibility = accessibility;
        self
    }

    /// Applies an attribute class
    #[must_use]
    pub fn with_attribute(mut self, attribute: Token) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Returns true if the method has no receiver
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.flags.contains(MethodFlags::STATIC)
    }

    /// Returns true if the method is an extension method
    #[must_use]
    pub fn is_extension(&self) -> bool {
        self.flags.contains(MethodFlags::EXTENSION)
    }

    /// Returns true if the method is an `init` accessor
    #[must_use]
    pub fn is_init_only(&self) -> bool {
        self.flags.contains(MethodFlags::INIT_ONLY)
    }

    /// Returns true if the method returns a `ref readonly`
    #[must_use]
    pub fn returns_by_ref_readonly(&self) -> bool {
        self.ref_kind == RefKind::RefReadOnly
    }
}

/// A method parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSymbol {
    /// Parameter name
    pub name: String,
    /// Zero based position
    pub ordinal: u32,
    /// Passing convention
    pub ref_kind: RefKind,
    /// Declared type
    pub param_type: Option<Token>,
    /// Owning method, set when the parameter is registered
    pub containing_method: Option<Token>,
    /// The parameter belongs to the primary constructor of its type and is captured as
    /// field-like storage
    pub is_primary_constructor_parameter: bool,
    /// Attribute classes applied to the parameter
    pub attributes: Vec<Token>,
}

impl ParameterSymbol {
    /// Creates a new by-value parameter.
    ///
    /// # Arguments
    ///
    /// * `name` - Parameter name
    /// * `param_type` - Declared type of the parameter
    pub fn new(name: impl Into<String>, param_type: Token) -> Self {
        ParameterSymbol {
            name: name.into(),
            ordinal: 0,
            ref_kind: RefKind::None,
            param_type: Some(param_type),
            containing_method: None,
            is_primary_constructor_parameter: false,
            attributes: Vec::new(),
        }
    }

    /// Sets the passing convention
    #[must_use]
    pub fn with_ref_kind(mut self, ref_kind: RefKind) -> Self {
        self.ref_kind = ref_kind;
        self
    }

    /// Marks the parameter as a captured primary constructor parameter
    #[must_use]
    pub fn primary_constructor(mut self) -> Self {
        self.is_primary_constructor_parameter = true;
        self
    }

    /// Applies an attribute class
    #[must_use]
    pub fn with_attribute(mut self, attribute: Token) -> Self {
        self.attributes.push(attribute);
        self
    }
}

/// A field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSymbol {
    /// Field name
    pub name: String,
    /// Modifiers
    pub flags: FieldFlags,
    /// Storage kind, `ref` fields only exist in ref structs
    pub ref_kind: RefKind,
    /// Declared type
    pub field_type: Option<Token>,
    /// Declaring type
    pub containing_type: Option<Token>,
    /// The auto-property or field-like event backed by this field
    pub associated: Option<Token>,
    /// Declared accessibility
    pub accessibility: Accessibility,
    /// Attribute classes applied to the field
    pub attributes: Vec<Token>,
}

impl FieldSymbol {
    /// Creates a new mutable instance field.
    ///
    /// # Arguments
    ///
    /// * `name` - Field name
    /// * `field_type` - Declared type of the field
    pub fn new(name: impl Into<String>, field_type: Token) -> Self {
        FieldSymbol {
            name: name.into(),
            flags: FieldFlags::empty(),
            ref_kind: RefKind::None,
            field_type: Some(field_type),
            containing_type: None,
            associated: None,
            accessibility: Accessibility::Public,
            attributes: Vec::new(),
        }
    }

    /// Adds modifiers
    #[must_use]
    pub fn with_flags(mut self, flags: FieldFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// Sets the storage kind
    #[must_use]
    pub fn with_ref_kind(mut self, ref_kind: RefKind) -> Self {
        self.ref_kind = ref_kind;
        self
    }

    /// Sets the declaring type
    #[must_use]
    pub fn with_containing_type(mut self, containing_type: Token) -> Self {
        self.containing_type = Some(containing_type);
        self
    }

    /// Links a backing field to its property or event
    #[must_use]
    pub fn with_associated(mut self, associated: Token) -> Self {
        self.associated = Some(associated);
        self
    }

    /// Applies an attribute class
    #[must_use]
    pub fn with_attribute(mut self, attribute: Token) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Returns true if the field has no receiver
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.flags.contains(FieldFlags::STATIC)
    }

    /// Returns true if the field is declared `readonly`
    #[must_use]
    pub fn is_readonly(&self) -> bool {
        self.flags.contains(FieldFlags::READONLY)
    }
}

/// A property or indexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertySymbol {
    /// Property name, `Item` for indexers
    pub name: String,
    /// The property is an indexer (`this[...]`)
    pub is_indexer: bool,
    /// How the value is returned
    pub ref_kind: RefKind,
    /// Declared type
    pub property_type: Option<Token>,
    /// Getter accessor
    pub getter: Option<Token>,
    /// Setter or `init` accessor
    pub setter: Option<Token>,
    /// Declaring type
    pub containing_type: Option<Token>,
    /// Attribute classes applied to the property
    pub attributes: Vec<Token>,
}

impl PropertySymbol {
    /// Creates a new by-value property.
    ///
    /// # Arguments
    ///
    /// * `name` - Property name
    /// * `property_type` - Declared type of the property
    pub fn new(name: impl Into<String>, property_type: Token) -> Self {
        PropertySymbol {
            name: name.into(),
            is_indexer: false,
            ref_kind: RefKind::None,
            property_type: Some(property_type),
            getter: None,
            setter: None,
            containing_type: None,
            attributes: Vec::new(),
        }
    }

    /// Marks the property as an indexer
    #[must_use]
    pub fn indexer(mut self) -> Self {
        self.is_indexer = true;
        self
    }

    /// Sets the return kind
    #[must_use]
    pub fn with_ref_kind(mut self, ref_kind: RefKind) -> Self {
        self.ref_kind = ref_kind;
        self
    }

    /// Sets the getter accessor
    #[must_use]
    pub fn with_getter(mut self, getter: Token) -> Self {
        self.getter = Some(getter);
        self
    }

    /// Sets the setter accessor
    #[must_use]
    pub fn with_setter(mut self, setter: Token) -> Self {
        self.setter = Some(setter);
        self
    }

    /// Sets the declaring type
    #[must_use]
    pub fn with_containing_type(mut self, containing_type: Token) -> Self {
        self.containing_type = Some(containing_type);
        self
    }

    /// Applies an attribute class
    #[must_use]
    pub fn with_attribute(mut self, attribute: Token) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Returns true if the property returns a `ref readonly`
    #[must_use]
    pub fn returns_by_ref_readonly(&self) -> bool {
        self.ref_kind == RefKind::RefReadOnly
    }
}

/// An event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSymbol {
    /// Event name
    pub name: String,
    /// Delegate type of the event
    pub event_type: Option<Token>,
    /// `add` accessor
    pub add: Option<Token>,
    /// `remove` accessor
    pub remove: Option<Token>,
    /// Declaring type
    pub containing_type: Option<Token>,
    /// Attribute classes applied to the event
    pub attributes: Vec<Token>,
}

impl EventSymbol {
    /// Creates a new event.
    ///
    /// # Arguments
    ///
    /// * `name` - Event name
    /// * `event_type` - Delegate type of the event
    pub fn new(name: impl Into<String>, event_type: Token) -> Self {
        EventSymbol {
            name: name.into(),
            event_type: Some(event_type),
            add: None,
            remove: None,
            containing_type: None,
            attributes: Vec::new(),
        }
    }

    /// Sets both accessors
    #[must_use]
    pub fn with_accessors(mut self, add: Token, remove: Token) -> Self {
        self.add = Some(add);
        self.remove = Some(remove);
        self
    }

    /// Sets the declaring type
    #[must_use]
    pub fn with_containing_type(mut self, containing_type: Token) -> Self {
        self.containing_type = Some(containing_type);
        self
    }

    /// Applies an attribute class
    #[must_use]
    pub fn with_attribute(mut self, attribute: Token) -> Self {
        self.attributes.push(attribute);
        self
    }
}

/// A local variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalSymbol {
    /// Local name
    pub name: String,
    /// Storage kind (`ref`, `ref readonly` or by value)
    pub ref_kind: RefKind,
    /// Declared type
    pub local_type: Option<Token>,
}

impl LocalSymbol {
    /// Creates a new by-value local.
    ///
    /// # Arguments
    ///
    /// * `name` - Local name
    /// * `local_type` - Declared type of the local
    pub fn new(name: impl Into<String>, local_type: Token) -> Self {
        LocalSymbol {
            name: name.into(),
            ref_kind: RefKind::None,
            local_type: Some(local_type),
        }
    }

    /// Sets the storage kind
    #[must_use]
    pub fn with_ref_kind(mut self, ref_kind: RefKind) -> Self {
        self.ref_kind = ref_kind;
        self
    }
}

/// A module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSymbol {
    /// Module name
    pub name: String,
    /// Owning assembly
    pub assembly: Option<Token>,
    /// Module level attribute classes
    pub attributes: Vec<Token>,
}

impl ModuleSymbol {
    /// Creates a new module.
    ///
    /// # Arguments
    ///
    /// * `name` - Module name
    /// * `assembly` - Owning assembly
    pub fn new(name: impl Into<String>, assembly: Token) -> Self {
        ModuleSymbol {
            name: name.into(),
            assembly: Some(assembly),
            attributes: Vec::new(),
        }
    }

    /// Applies an attribute class
    #[must_use]
    pub fn with_attribute(mut self, attribute: Token) -> Self {
        self.attributes.push(attribute);
        self
    }
}

/// An assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblySymbol {
    /// Assembly name
    pub name: String,
    /// Assembly level attribute classes
    pub attributes: Vec<Token>,
}

impl AssemblySymbol {
    /// Creates a new assembly.
    ///
    /// # Arguments
    ///
    /// * `name` - Assembly name
    pub fn new(name: impl Into<String>) -> Self {
        AssemblySymbol {
            name: name.into(),
            attributes: Vec::new(),
        }
    }

    /// Applies an attribute class
    #[must_use]
    pub fn with_attribute(mut self, attribute: Token) -> Self {
        self.attributes.push(attribute);
        self
    }
}
