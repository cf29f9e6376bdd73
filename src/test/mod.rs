//! Shared fixtures for the unit tests.
//!
//! [`Fixture`] models a small program against the .NET Framework core library:
//!
//! ```csharp
//! struct S1 {
//!     int value;
//!     void M1();
//!     readonly void M2();
//!     override string ToString();
//!     int P { get; set; }
//!     int this[int i] { get; set; }
//!     int Length { get; }
//!     event EventHandler Changed;
//!     object GetEnumerator();
//!     object GetAwaiter();
//!     ref int GetPinnableReference();
//!     static ref readonly S1 GetRef();
//! }
//! struct S2 { S1 inner; readonly S1 frozen; static readonly S1 Default; }
//! class Holder { S1 value; }
//! class Program {
//!     static void Run(in S1 value, ref S1 byRef, S1 copy, in S2 outer, in Holder holder) {
//!         S1 local; ref readonly S1 view; ref S1 alias; S2 pair;
//!     }
//! }
//! ```

use crate::{
    config::TargetRuntime,
    model::{
        AssemblySymbol, CoreLibrary, EventSymbol, FieldFlags, FieldSymbol, LocalSymbol,
        MethodFlags, MethodKind, MethodSymbol, ModuleSymbol, OperationTreeBuilder,
        ParameterSymbol, PropertySymbol, RefKind, SymbolTable, Token, TypeKind, TypeSymbol,
    },
};

pub struct Fixture {
    pub symbols: SymbolTable,
    pub core: CoreLibrary,
    pub module: Token,

    pub s1: Token,
    pub s2: Token,
    pub holder: Token,
    pub program: Token,
    pub run: Token,

    pub s1_value: Token,
    pub s1_m1: Token,
    pub s1_m2: Token,
    pub s1_to_string: Token,
    pub s1_prop: Token,
    pub s1_indexer: Token,
    pub s1_length: Token,
    pub s1_event: Token,
    pub s1_get_enumerator: Token,
    pub s1_get_awaiter: Token,
    pub s1_get_pinnable: Token,
    pub s1_ref_readonly_getter: Token,

    pub s2_inner: Token,
    pub s2_readonly_inner: Token,
    pub s2_static_readonly: Token,
    pub holder_value: Token,

    pub in_param: Token,
    pub ref_param: Token,
    pub value_param: Token,
    pub in_s2_param: Token,
    pub in_holder_param: Token,

    pub local: Token,
    pub readonly_local: Token,
    pub ref_local: Token,
    pub s2_local: Token,
}

// Helper function to declare an ordinary instance method
fn method(symbols: &mut SymbolTable, owner: Token, name: &str, returns: Token) -> Token {
    symbols
        .add_method(
            MethodSymbol::new(name, MethodKind::Ordinary)
                .with_containing_type(owner)
                .with_return_type(returns),
        )
        .unwrap()
}

// Helper function to declare a property accessor
fn accessor(symbols: &mut SymbolTable, owner: Token, name: &str, kind: MethodKind) -> Token {
    symbols
        .add_method(MethodSymbol::new(name, kind).with_containing_type(owner))
        .unwrap()
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_runtime(TargetRuntime::NetFramework)
    }

    pub fn with_runtime(runtime: TargetRuntime) -> Self {
        let mut symbols = SymbolTable::new();
        let core = CoreLibrary::install(&mut symbols, runtime).unwrap();
        let int32 = core.int32();

        let assembly = symbols.add_assembly(AssemblySymbol::new("App")).unwrap();
        let module = symbols
            .add_module(ModuleSymbol::new("App.dll", assembly))
            .unwrap();
        let value_type = |name: &str| {
            TypeSymbol::new(name, "App", TypeKind::Struct)
                .with_base(core.value_type)
                .with_module(module)
        };

        let s1 = symbols.add_type(value_type("S1")).unwrap();
        let s2 = symbols.add_type(value_type("S2")).unwrap();
        let holder = symbols
            .add_type(
                TypeSymbol::new("Holder", "App", TypeKind::Class)
                    .with_base(core.object)
                    .with_module(module),
            )
            .unwrap();
        let program = symbols
            .add_type(
                TypeSymbol::new("Program", "App", TypeKind::Class)
                    .with_base(core.object)
                    .with_module(module),
            )
            .unwrap();
        let handler = symbols
            .add_type(
                TypeSymbol::new("EventHandler", "System", TypeKind::Delegate)
                    .with_base(core.object)
                    .with_module(core.module),
            )
            .unwrap();

        // S1
        let s1_value = symbols
            .add_field(FieldSymbol::new("value", int32).with_containing_type(s1))
            .unwrap();
        let s1_m1 = method(&mut symbols, s1, "M1", core.void);
        let s1_m2 = symbols
            .add_method(
                MethodSymbol::new("M2", MethodKind::Ordinary)
                    .with_flags(MethodFlags::READONLY)
                    .with_containing_type(s1),
            )
            .unwrap();
        let s1_to_string = symbols
            .add_method(
                MethodSymbol::new("ToString", MethodKind::Ordinary)
                    .with_containing_type(s1)
                    .with_return_type(core.string)
                    .with_overridden(core.value_type_members.to_string),
            )
            .unwrap();

        let get_p = accessor(&mut symbols, s1, "get_P", MethodKind::PropertyGet);
        let set_p = accessor(&mut symbols, s1, "set_P", MethodKind::PropertySet);
        let s1_prop = symbols
            .add_property(
                PropertySymbol::new("P", int32)
                    .with_getter(get_p)
                    .with_setter(set_p)
                    .with_containing_type(s1),
            )
            .unwrap();

        let get_item = accessor(&mut symbols, s1, "get_Item", MethodKind::PropertyGet);
        symbols
            .add_parameter(get_item, ParameterSymbol::new("i", int32))
            .unwrap();
        let set_item = accessor(&mut symbols, s1, "set_Item", MethodKind::PropertySet);
        symbols
            .add_parameter(set_item, ParameterSymbol::new("i", int32))
            .unwrap();
        let s1_indexer = symbols
            .add_property(
                PropertySymbol::new("Item", int32)
                    .indexer()
                    .with_getter(get_item)
                    .with_setter(set_item)
                    .with_containing_type(s1),
            )
            .unwrap();

        let get_length = accessor(&mut symbols, s1, "get_Length", MethodKind::PropertyGet);
        let s1_length = symbols
            .add_property(
                PropertySymbol::new("Length", int32)
                    .with_getter(get_length)
                    .with_containing_type(s1),
            )
            .unwrap();

        let add = accessor(&mut symbols, s1, "add_Changed", MethodKind::EventAdd);
        let remove = accessor(&mut symbols, s1, "remove_Changed", MethodKind::EventRemove);
        let s1_event = symbols
            .add_event(
                EventSymbol::new("Changed", handler)
                    .with_accessors(add, remove)
                    .with_containing_type(s1),
            )
            .unwrap();

        let s1_get_enumerator = method(&mut symbols, s1, "GetEnumerator", core.object);
        let s1_get_awaiter = method(&mut symbols, s1, "GetAwaiter", core.object);
        let s1_get_pinnable = symbols
            .add_method(
                MethodSymbol::new("GetPinnableReference", MethodKind::Ordinary)
                    .with_ref_kind(RefKind::Ref)
                    .with_containing_type(s1)
                    .with_return_type(int32),
            )
            .unwrap();
        let s1_ref_readonly_getter = symbols
            .add_method(
                MethodSymbol::new("GetRef", MethodKind::Ordinary)
                    .with_flags(MethodFlags::STATIC)
                    .with_ref_kind(RefKind::RefReadOnly)
                    .with_containing_type(s1)
                    .with_return_type(s1),
            )
            .unwrap();

        // S2 and Holder
        let s2_inner = symbols
            .add_field(FieldSymbol::new("inner", s1).with_containing_type(s2))
            .unwrap();
        let s2_readonly_inner = symbols
            .add_field(
                FieldSymbol::new("frozen", s1)
                    .with_flags(FieldFlags::READONLY)
                    .with_containing_type(s2),
            )
            .unwrap();
        let s2_static_readonly = symbols
            .add_field(
                FieldSymbol::new("Default", s1)
                    .with_flags(FieldFlags::STATIC | FieldFlags::READONLY)
                    .with_containing_type(s2),
            )
            .unwrap();
        let holder_value = symbols
            .add_field(FieldSymbol::new("value", s1).with_containing_type(holder))
            .unwrap();

        // Program.Run
        let run = symbols
            .add_method(
                MethodSymbol::new("Run", MethodKind::Ordinary)
                    .with_flags(MethodFlags::STATIC)
                    .with_containing_type(program)
                    .with_return_type(core.void),
            )
            .unwrap();
        let mut parameter = |name: &str, ty: Token, ref_kind: RefKind| {
            symbols
                .add_parameter(run, ParameterSymbol::new(name, ty).with_ref_kind(ref_kind))
                .unwrap()
        };
        let in_param = parameter("value", s1, RefKind::In);
        let ref_param = parameter("byRef", s1, RefKind::Ref);
        let value_param = parameter("copy", s1, RefKind::None);
        let in_s2_param = parameter("outer", s2, RefKind::In);
        let in_holder_param = parameter("holder", holder, RefKind::In);

        let mut local = |name: &str, ty: Token, ref_kind: RefKind| {
            symbols
                .add_local(LocalSymbol::new(name, ty).with_ref_kind(ref_kind))
                .unwrap()
        };
        let plain_local = local("local", s1, RefKind::None);
        let readonly_local = local("view", s1, RefKind::RefReadOnly);
        let ref_local = local("alias", s1, RefKind::Ref);
        let s2_local = local("pair", s2, RefKind::None);

        Fixture {
            symbols,
            core,
            module,
            s1,
            s2,
            holder,
            program,
            run,
            s1_value,
            s1_m1,
            s1_m2,
            s1_to_string,
            s1_prop,
            s1_indexer,
            s1_length,
            s1_event,
            s1_get_enumerator,
            s1_get_awaiter,
            s1_get_pinnable,
            s1_ref_readonly_getter,
            s2_inner,
            s2_readonly_inner,
            s2_static_readonly,
            holder_value,
            in_param,
            ref_param,
            value_param,
            in_s2_param,
            in_holder_param,
            local: plain_local,
            readonly_local,
            ref_local,
            s2_local,
        }
    }

    pub fn builder(&self) -> OperationTreeBuilder<'_> {
        OperationTreeBuilder::new(&self.symbols, "Program.cs")
    }
}
