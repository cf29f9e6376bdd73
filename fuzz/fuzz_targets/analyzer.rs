#![no_main]

use copyscope::{
    model::{BinaryOperator, OpId},
    prelude::*,
};
use libfuzzer_sys::fuzz_target;

struct Symbols {
    table: SymbolTable,
    core: CoreLibrary,
    s1: Token,
    run: Token,
    members: Vec<Token>,
    values: Vec<Token>,
}

fn symbols() -> Option<Symbols> {
    let mut table = SymbolTable::new();
    let core = CoreLibrary::install(&mut table, TargetRuntime::NetFramework).ok()?;
    let s1 = table
        .add_type(TypeSymbol::new("S1", "Fuzz", TypeKind::Struct).with_base(core.value_type))
        .ok()?;
    let m1 = table
        .add_method(MethodSymbol::new("M1", MethodKind::Ordinary).with_containing_type(s1))
        .ok()?;
    let getter = table
        .add_method(MethodSymbol::new("get_P", MethodKind::PropertyGet).with_containing_type(s1))
        .ok()?;
    let property = table
        .add_property(
            PropertySymbol::new("P", s1)
                .with_getter(getter)
                .with_containing_type(s1),
        )
        .ok()?;
    let field = table
        .add_field(
            FieldSymbol::new("f", s1)
                .with_flags(FieldFlags::READONLY)
                .with_containing_type(s1),
        )
        .ok()?;
    let run = table
        .add_method(MethodSymbol::new("Run", MethodKind::Ordinary).with_containing_type(s1))
        .ok()?;
    let input = table
        .add_parameter(run, ParameterSymbol::new("value", s1).with_ref_kind(RefKind::In))
        .ok()?;
    let local = table
        .add_local(LocalSymbol::new("view", s1).with_ref_kind(RefKind::RefReadOnly))
        .ok()?;

    Some(Symbols {
        table,
        members: vec![m1, getter, property, field, core.object_members.to_string],
        values: vec![input, local],
        core,
        s1,
        run,
    })
}

/// Turns the input into node shapes over earlier nodes; malformed shapes are rejected by the
/// builder and skipped.
fn build(symbols: &Symbols, data: &[u8]) -> OperationTree {
    let mut builder = OperationTreeBuilder::new(&symbols.table, "Fuzz.cs");
    let _ = builder.member(symbols.run, |b| {
        let mut nodes: Vec<OpId> = Vec::new();
        let pick = |nodes: &[OpId], byte: u8| -> Option<OpId> {
            (!nodes.is_empty()).then(|| nodes[byte as usize % nodes.len()])
        };
        for chunk in data.chunks(3) {
            let [op, x, y] = [chunk[0], *chunk.get(1).unwrap_or(&0), *chunk.get(2).unwrap_or(&0)];
            let member = symbols.members[x as usize % symbols.members.len()];
            let value = symbols.values[y as usize % symbols.values.len()];
            let (a, c) = (pick(&nodes, x), pick(&nodes, y));
            let node = match op % 12 {
                0 => b.parameter(value),
                1 => b.local(value),
                2 => b.this(symbols.s1),
                3 => b.call(member, a, &[]),
                4 => b.property(member, a, &[]),
                5 => b.field(member, a),
                6 => match (a, c) {
                    (Some(a), Some(c)) => b.ref_assign(a, c),
                    _ => continue,
                },
                7 => match (a, c) {
                    (Some(a), Some(c)) => {
                        let condition = b.literal(Some(symbols.core.boolean()))?;
                        b.ref_conditional(condition, a, c)
                    }
                    _ => continue,
                },
                8 => match a {
                    Some(a) => b.implicit_conversion(a, symbols.core.object),
                    None => continue,
                },
                9 => match (a, c) {
                    (Some(a), Some(c)) => {
                        b.binary(BinaryOperator::Add, a, c, Some(symbols.core.string))
                    }
                    _ => continue,
                },
                10 => match a {
                    Some(operand) => b.push(
                        OperationKind::Await {
                            operand,
                            get_awaiter: Some(member),
                            is_dynamic: y % 2 == 0,
                        },
                        None,
                    ),
                    None => continue,
                },
                _ => match a {
                    Some(collection) => b.push(
                        OperationKind::ForEachLoop {
                            collection,
                            get_enumerator: Some(member),
                            body: None,
                        },
                        None,
                    ),
                    None => continue,
                },
            };
            if let Ok(node) = node {
                nodes.push(node);
            }
        }
        Ok(())
    });
    builder.build()
}

fuzz_target!(|data: &[u8]| {
    let Some(symbols) = symbols() else {
        return;
    };
    let tree = build(&symbols, data);
    let analyzer = DefensiveCopyAnalyzer::default();
    let _ = analyzer.collect(&symbols.table, &tree, &CancellationToken::new());
});
