//! Classification of how an expression's value is used by its parent.
//!
//! A property access may run the getter, the setter or both, and an indexer returning by
//! reference only ever runs its getter. [`value_usage`] derives the usage from the parent shape
//! of a node and [`property_usage`] turns it into the accessors that execute.

use bitflags::bitflags;

use crate::model::{OpId, OperationKind, PropertySymbol, RefKind, SemanticModel, SymbolKind};

bitflags! {
    #[derive(PartialEq, Eq, Debug, Clone, Copy, Hash, Default)]
    /// How a value is used
    pub struct ValueUsage: u8 {
        /// The value is read
        const READ = 0x01;
        /// The value is overwritten
        const WRITE = 0x02;
        /// A reference to the storage is taken
        const REFERENCE = 0x04;
        /// Only the name is used (`nameof`, `typeof`, `sizeof`)
        const NAME = 0x08;

        /// Read and written, as in `x += 1`
        const READ_WRITE = Self::READ.bits() | Self::WRITE.bits();
        /// Passed as `in` or bound to a `ref readonly`
        const READABLE_REFERENCE = Self::READ.bits() | Self::REFERENCE.bits();
        /// Passed as `out`
        const WRITABLE_REFERENCE = Self::WRITE.bits() | Self::REFERENCE.bits();
        /// Passed as `ref` or bound to a `ref`
        const READABLE_WRITABLE_REFERENCE =
            Self::READ.bits() | Self::WRITE.bits() | Self::REFERENCE.bits();
    }
}

impl ValueUsage {
    /// Returns true if the value is read
    #[must_use]
    pub fn is_read(&self) -> bool {
        self.contains(ValueUsage::READ)
    }

    /// Returns true if the value is written
    #[must_use]
    pub fn is_written(&self) -> bool {
        self.contains(ValueUsage::WRITE)
    }

    /// Returns true if a reference is taken
    #[must_use]
    pub fn is_reference(&self) -> bool {
        self.contains(ValueUsage::REFERENCE)
    }
}

/// Returns how the value of `id` is used by the surrounding operations.
///
/// # Arguments
///
/// * `model` - The semantic model containing the node
/// * `id` - The node whose usage is classified
#[must_use]
pub fn value_usage(model: &SemanticModel<'_>, id: OpId) -> ValueUsage {
    let mut current = id;
    loop {
        let Some(parent_id) = model.tree().parent(current) else {
            return ValueUsage::READ;
        };
        let Some(parent) = model.operation(parent_id) else {
            return ValueUsage::READ;
        };

        match &parent.kind {
            OperationKind::SimpleAssignment { target, .. } if *target == current => {
                return ValueUsage::WRITE;
            }
            OperationKind::CompoundAssignment { target, .. }
            | OperationKind::CoalesceAssignment { target, .. }
                if *target == current =>
            {
                return ValueUsage::READ_WRITE;
            }
            OperationKind::SimpleAssignment {
                value,
                is_ref: true,
                ..
            } if *value == current => return ValueUsage::READABLE_WRITABLE_REFERENCE,
            OperationKind::Increment { .. } => return ValueUsage::READ_WRITE,
            OperationKind::NameOf { .. } => return ValueUsage::NAME,
            OperationKind::Argument { parameter, .. } => {
                let ref_kind = parameter
                    .and_then(|p| model.symbols().get_parameter(p))
                    .map(|p| p.ref_kind);
                return match ref_kind {
                    Some(RefKind::In | RefKind::RefReadOnly | RefKind::RefReadOnlyParameter) => {
                        ValueUsage::READABLE_REFERENCE
                    }
                    Some(RefKind::Out) => ValueUsage::WRITABLE_REFERENCE,
                    Some(RefKind::Ref) => ValueUsage::READABLE_WRITABLE_REFERENCE,
                    _ => ValueUsage::READ,
                };
            }
            OperationKind::Return { .. } => {
                let ref_kind = model
                    .enclosing_symbol_of(parent_id)
                    .filter(|symbol| symbol.is(SymbolKind::Method))
                    .and_then(|symbol| model.symbols().get_method(symbol))
                    .map(|method| method.ref_kind);
                return match ref_kind {
                    Some(RefKind::RefReadOnly) => ValueUsage::READABLE_REFERENCE,
                    Some(RefKind::Ref) => ValueUsage::READABLE_WRITABLE_REFERENCE,
                    _ => ValueUsage::READ,
                };
            }
            OperationKind::Conditional {
                when_true,
                when_false,
                ..
            } => {
                if *when_true == current || *when_false == Some(current) {
                    current = parent_id;
                    continue;
                }
                return ValueUsage::READ;
            }
            _ => {}
        }

        if is_left_of_deconstruction(model, current) {
            return ValueUsage::WRITE;
        }

        if let OperationKind::VariableInitializer { .. } = parent.kind {
            let declarator = model
                .tree()
                .parent(parent_id)
                .and_then(|id| model.operation(id));
            if let Some(OperationKind::VariableDeclarator { local, .. }) =
                declarator.map(|op| &op.kind)
            {
                match model.symbols().get_local(*local).map(|l| l.ref_kind) {
                    Some(RefKind::Ref) => return ValueUsage::READABLE_WRITABLE_REFERENCE,
                    Some(RefKind::RefReadOnly) => return ValueUsage::READABLE_REFERENCE,
                    _ => {}
                }
            }
        }

        return ValueUsage::READ;
    }
}

fn is_left_of_deconstruction(model: &SemanticModel<'_>, id: OpId) -> bool {
    let mut previous = id;
    let mut current = model.tree().parent(id);
    while let Some(parent_id) = current {
        let Some(parent) = model.operation(parent_id) else {
            return false;
        };
        match &parent.kind {
            OperationKind::DeconstructionAssignment { target, .. } => return *target == previous,
            OperationKind::Tuple { .. } | OperationKind::Conversion { .. } => {
                previous = parent_id;
                current = model.tree().parent(parent_id);
            }
            _ => return false,
        }
    }
    false
}

/// Returns which accessors of `property` run for a use classified as `usage`.
///
/// By-value properties run the getter when read and the setter when written. A by-reference
/// property only has a getter: it runs for any read or write, and always when a reference is
/// taken.
///
/// # Returns
///
/// `(getter, setter)`
#[must_use]
pub fn property_usage(usage: ValueUsage, property: &PropertySymbol) -> (bool, bool) {
    let (read, write, reference) = (usage.is_read(), usage.is_written(), usage.is_reference());
    match (reference, property.ref_kind != RefKind::None) {
        (_, false) => (read, write),
        (false, true) => (read || write, false),
        (true, true) => (true, false),
    }
}
