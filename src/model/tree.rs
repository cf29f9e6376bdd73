//! Operation trees and the semantic model facade.
//!
//! An [`OperationTree`] holds every operation node of one document together with the source
//! regions of the members declared in it. Trees are produced with an [`OperationTreeBuilder`],
//! which hands out source positions in construction order: a leaf covers one fresh position and a
//! composite node covers its children plus one fresh position. Building children before their
//! parents therefore yields properly nested spans, and building a member body inside
//! [`OperationTreeBuilder::member`] records the region that
//! [`OperationTree::enclosing_symbol`] resolves positions against.
//!
//! # Example
//!
//! ```rust
//! use copyscope::model::{
//!     LocalSymbol, OperationTreeBuilder, SymbolTable, TypeKind, TypeSymbol, MethodKind,
//!     MethodSymbol,
//! };
//!
//! let mut symbols = SymbolTable::new();
//! let s1 = symbols.add_type(TypeSymbol::new("S1", "App", TypeKind::Struct))?;
//! let m1 = symbols.add_method(
//!     MethodSymbol::new("M1", MethodKind::Ordinary).with_containing_type(s1),
//! )?;
//! let local = symbols.add_local(LocalSymbol::new("value", s1))?;
//!
//! let mut builder = OperationTreeBuilder::new(&symbols, "Program.cs");
//! let call = builder.member(m1, |b| {
//!     let receiver = b.local(local)?;
//!     b.call(m1, Some(receiver), &[])
//! })?;
//! let tree = builder.build();
//!
//! let span = tree.operation(call)?.span;
//! assert_eq!(tree.enclosing_symbol(span.start), Some(m1));
//! # Ok::<(), copyscope::Error>(())
//! ```

use std::sync::Arc;

use crate::{
    model::{
        BinaryOperator, InstanceReferenceKind, OpId, Operation, OperationKind, Span,
        SymbolTable, Token,
    },
    Error, Result,
};

/// Source region of a declared member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberRegion {
    /// The member (method, field, property, type) whose declaration covers the region
    pub symbol: Token,
    /// Covered source positions
    pub span: Span,
}

/// All operations of one document.
#[derive(Debug, Clone)]
pub struct OperationTree {
    document: Arc<str>,
    nodes: Vec<Operation>,
    regions: Vec<MemberRegion>,
}

impl OperationTree {
    /// Returns the document the tree was built for
    #[must_use]
    pub fn document(&self) -> &Arc<str> {
        &self.document
    }

    /// Returns the number of operations
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the tree has no operations
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Looks up an operation
    #[must_use]
    pub fn get(&self, id: OpId) -> Option<&Operation> {
        self.nodes.get(id.index())
    }

    /// Returns an operation.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidOperation`] if the id is not part of this tree.
    pub fn operation(&self, id: OpId) -> Result<&Operation> {
        self.get(id).ok_or(Error::InvalidOperation(id))
    }

    /// Iterates over all operation ids in construction order
    pub fn ids(&self) -> impl Iterator<Item = OpId> + '_ {
        (0..self.nodes.len()).map(|i| OpId(i as u32))
    }

    /// Returns the parent of an operation
    #[must_use]
    pub fn parent(&self, id: OpId) -> Option<OpId> {
        self.get(id).and_then(|op| op.parent)
    }

    /// Iterates from the parent of `id` up to the root
    pub fn ancestors(&self, id: OpId) -> impl Iterator<Item = OpId> + '_ {
        std::iter::successors(self.parent(id), move |current| self.parent(*current))
    }

    /// Returns the recorded member regions
    #[must_use]
    pub fn regions(&self) -> &[MemberRegion] {
        &self.regions
    }

    /// Returns the innermost member whose declaration covers `position`.
    ///
    /// Lambdas and local functions are registered as members of their own, so a position
    /// inside a lambda resolves to the lambda and not to the method declaring it.
    #[must_use]
    pub fn enclosing_symbol(&self, position: u32) -> Option<Token> {
        self.regions
            .iter()
            .filter(|region| region.span.contains(position))
            .min_by_key(|region| (region.span.len(), u32::MAX - region.span.start))
            .map(|region| region.symbol)
    }
}

/// Incremental constructor for an [`OperationTree`].
///
/// The typed helpers (`local`, `field`, `call`, ...) derive the static type of the new node from
/// the symbol table; [`OperationTreeBuilder::push`] accepts any node shape with an explicit type.
#[derive(Debug)]
pub struct OperationTreeBuilder<'a> {
    symbols: &'a SymbolTable,
    document: Arc<str>,
    nodes: Vec<Operation>,
    regions: Vec<MemberRegion>,
    position: u32,
}

impl<'a> OperationTreeBuilder<'a> {
    /// Creates a builder for one document.
    ///
    /// # Arguments
    ///
    /// * `symbols` - The symbol table used to derive node types
    /// * `document` - Name of the document, carried into every finding location
    pub fn new(symbols: &'a SymbolTable, document: &str) -> Self {
        OperationTreeBuilder {
            symbols,
            document: Arc::from(document),
            nodes: Vec::new(),
            regions: Vec::new(),
            position: 0,
        }
    }

    /// Returns the symbol table the builder resolves types against
    #[must_use]
    pub fn symbols(&self) -> &'a SymbolTable {
        self.symbols
    }

    /// Adds an explicit node.
    ///
    /// # Arguments
    ///
    /// * `kind` - Shape and children of the node
    /// * `ty` - Static type of the node
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidOperation`] for an unknown child and
    /// [`crate::Error::Malformed`] for a child that already has a parent.
    pub fn push(&mut self, kind: OperationKind, ty: Option<Token>) -> Result<OpId> {
        self.insert(kind, ty, false)
    }

    /// Adds a compiler synthesized node, see [`OperationTreeBuilder::push`].
    ///
    /// # Errors
    /// Same as [`OperationTreeBuilder::push`].
    pub fn push_implicit(&mut self, kind: OperationKind, ty: Option<Token>) -> Result<OpId> {
        self.insert(kind, ty, true)
    }

    fn insert(&mut self, kind: OperationKind, ty: Option<Token>, is_implicit: bool) -> Result<OpId> {
        let id = OpId(
            u32::try_from(self.nodes.len()).map_err(|_| malformed_error!("operation tree is full"))?,
        );

        let mut children = kind.children();
        let mut start = self.position;
        for child in &children {
            let node = self.nodes.get(child.index()).ok_or(Error::InvalidOperation(*child))?;
            if node.parent.is_some() {
                return Err(malformed_error!("{} already has a parent", child));
            }
            start = start.min(node.span.start);
        }

        children.sort_unstable();
        let count = children.len();
        children.dedup();
        if children.len() != count {
            return Err(malformed_error!("{} lists the same child twice", id));
        }

        for child in children {
            if let Some(node) = self.nodes.get_mut(child.index()) {
                node.parent = Some(id);
            }
        }

        self.position += 1;
        self.nodes.push(Operation {
            kind,
            ty,
            span: Span::new(start, self.position),
            parent: None,
            is_implicit,
        });
        Ok(id)
    }

    /// Builds the body of a member and records its source region.
    ///
    /// # Arguments
    ///
    /// * `symbol` - The member being declared (method, lambda, field, property)
    /// * `build` - Closure adding the nodes of the body
    ///
    /// # Errors
    /// Returns whatever `build` returns.
    pub fn member<R>(
        &mut self,
        symbol: Token,
        build: impl FnOnce(&mut Self) -> Result<R>,
    ) -> Result<R> {
        let start = self.position;
        let result = build(self)?;
        self.position += 1;
        self.regions.push(MemberRegion {
            symbol,
            span: Span::new(start, self.position),
        });
        Ok(result)
    }

    /// Adds a local reference typed after the local.
    ///
    /// # Errors
    /// See [`OperationTreeBuilder::push`].
    pub fn local(&mut self, local: Token) -> Result<OpId> {
        let ty = self.symbols.type_of(local);
        self.push(OperationKind::LocalReference { local }, ty)
    }

    /// Adds a parameter reference typed after the parameter.
    ///
    /// # Errors
    /// See [`OperationTreeBuilder::push`].
    pub fn parameter(&mut self, parameter: Token) -> Result<OpId> {
        let ty = self.symbols.type_of(parameter);
        self.push(OperationKind::ParameterReference { parameter }, ty)
    }

    /// Adds an explicit `this` of the given type.
    ///
    /// # Errors
    /// See [`OperationTreeBuilder::push`].
    pub fn this(&mut self, ty: Token) -> Result<OpId> {
        self.push(
            OperationKind::InstanceReference {
                reference_kind: InstanceReferenceKind::ContainingTypeInstance,
            },
            Some(ty),
        )
    }

    /// Adds an implicit `this` of the given type, as in `Field` instead of `this.Field`.
    ///
    /// # Errors
    /// See [`OperationTreeBuilder::push`].
    pub fn implicit_this(&mut self, ty: Token) -> Result<OpId> {
        self.push_implicit(
            OperationKind::InstanceReference {
                reference_kind: InstanceReferenceKind::ContainingTypeInstance,
            },
            Some(ty),
        )
    }

    /// Adds a field reference typed after the field.
    ///
    /// # Errors
    /// See [`OperationTreeBuilder::push`].
    pub fn field(&mut self, field: Token, instance: Option<OpId>) -> Result<OpId> {
        let ty = self.symbols.type_of(field);
        self.push(OperationKind::FieldReference { field, instance }, ty)
    }

    /// Adds a method invocation typed after the method's return type.
    ///
    /// # Errors
    /// See [`OperationTreeBuilder::push`].
    pub fn call(&mut self, method: Token, instance: Option<OpId>, arguments: &[OpId]) -> Result<OpId> {
        let ty = self.symbols.type_of(method);
        self.push(
            OperationKind::Invocation {
                method,
                instance,
                arguments: arguments.to_vec(),
            },
            ty,
        )
    }

    /// Adds a property or indexer reference typed after the property.
    ///
    /// # Errors
    /// See [`OperationTreeBuilder::push`].
    pub fn property(
        &mut self,
        property: Token,
        instance: Option<OpId>,
        arguments: &[OpId],
    ) -> Result<OpId> {
        let ty = self.symbols.type_of(property);
        self.push(
            OperationKind::PropertyReference {
                property,
                instance,
                arguments: arguments.to_vec(),
            },
            ty,
        )
    }

    /// Adds an event reference typed after the event.
    ///
    /// # Errors
    /// See [`OperationTreeBuilder::push`].
    pub fn event(&mut self, event: Token, instance: Option<OpId>) -> Result<OpId> {
        let ty = self.symbols.type_of(event);
        self.push(OperationKind::EventReference { event, instance }, ty)
    }

    /// Adds an argument node matched to `parameter`, typed after the value.
    ///
    /// # Errors
    /// See [`OperationTreeBuilder::push`].
    pub fn argument(&mut self, parameter: Option<Token>, value: OpId) -> Result<OpId> {
        let ty = self.type_of_node(value);
        self.push(OperationKind::Argument { parameter, value }, ty)
    }

    /// Adds a constant of the given type.
    ///
    /// # Errors
    /// See [`OperationTreeBuilder::push`].
    pub fn literal(&mut self, ty: Option<Token>) -> Result<OpId> {
        self.push(OperationKind::Literal, ty)
    }

    /// Adds `target = value`, typed after the target.
    ///
    /// # Errors
    /// See [`OperationTreeBuilder::push`].
    pub fn assign(&mut self, target: OpId, value: OpId) -> Result<OpId> {
        let ty = self.type_of_node(target);
        self.push(
            OperationKind::SimpleAssignment {
                target,
                value,
                is_ref: false,
            },
            ty,
        )
    }

    /// Adds `target = ref value`, typed after the target.
    ///
    /// # Errors
    /// See [`OperationTreeBuilder::push`].
    pub fn ref_assign(&mut self, target: OpId, value: OpId) -> Result<OpId> {
        let ty = self.type_of_node(target);
        self.push(
            OperationKind::SimpleAssignment {
                target,
                value,
                is_ref: true,
            },
            ty,
        )
    }

    /// Adds `condition ? ref when_true : ref when_false`, typed after `when_true`.
    ///
    /// # Errors
    /// See [`OperationTreeBuilder::push`].
    pub fn ref_conditional(
        &mut self,
        condition: OpId,
        when_true: OpId,
        when_false: OpId,
    ) -> Result<OpId> {
        let ty = self.type_of_node(when_true);
        self.push(
            OperationKind::Conditional {
                condition,
                when_true,
                when_false: Some(when_false),
                is_ref: true,
            },
            ty,
        )
    }

    /// Adds a compiler synthesized, non user defined conversion of `operand` to `ty`.
    ///
    /// # Errors
    /// See [`OperationTreeBuilder::push`].
    pub fn implicit_conversion(&mut self, operand: OpId, ty: Token) -> Result<OpId> {
        self.push_implicit(
            OperationKind::Conversion {
                operand,
                is_user_defined: false,
                method: None,
            },
            Some(ty),
        )
    }

    /// Adds `left op right` of the given result type.
    ///
    /// # Errors
    /// See [`OperationTreeBuilder::push`].
    pub fn binary(
        &mut self,
        operator: BinaryOperator,
        left: OpId,
        right: OpId,
        ty: Option<Token>,
    ) -> Result<OpId> {
        self.push(
            OperationKind::Binary {
                operator,
                left,
                right,
            },
            ty,
        )
    }

    /// Adds a statement block.
    ///
    /// # Errors
    /// See [`OperationTreeBuilder::push`].
    pub fn block(&mut self, operations: &[OpId]) -> Result<OpId> {
        self.push(
            OperationKind::Block {
                operations: operations.to_vec(),
            },
            None,
        )
    }

    fn type_of_node(&self, id: OpId) -> Option<Token> {
        self.nodes.get(id.index()).and_then(|op| op.ty)
    }

    /// Finishes the tree
    #[must_use]
    pub fn build(self) -> OperationTree {
        OperationTree {
            document: self.document,
            nodes: self.nodes,
            regions: self.regions,
        }
    }
}

/// Read-only view over a symbol table and one operation tree.
///
/// This is the single query surface the analysis consumes: node shapes, parents, static types,
/// symbol facts and the position to enclosing symbol mapping.
#[derive(Debug, Clone, Copy)]
pub struct SemanticModel<'a> {
    symbols: &'a SymbolTable,
    tree: &'a OperationTree,
}

impl<'a> SemanticModel<'a> {
    /// Creates a new model view
    #[must_use]
    pub fn new(symbols: &'a SymbolTable, tree: &'a OperationTree) -> Self {
        SemanticModel { symbols, tree }
    }

    /// Returns the symbol table
    #[must_use]
    pub fn symbols(&self) -> &'a SymbolTable {
        self.symbols
    }

    /// Returns the operation tree
    #[must_use]
    pub fn tree(&self) -> &'a OperationTree {
        self.tree
    }

    /// Looks up an operation
    #[must_use]
    pub fn operation(&self, id: OpId) -> Option<&'a Operation> {
        self.tree.get(id)
    }

    /// Returns the static type of an operation
    #[must_use]
    pub fn type_of(&self, id: OpId) -> Option<Token> {
        self.tree.get(id).and_then(|op| op.ty)
    }

    /// Returns the innermost member declaration covering the start of an operation
    #[must_use]
    pub fn enclosing_symbol_of(&self, id: OpId) -> Option<Token> {
        self.tree
            .get(id)
            .and_then(|op| self.tree.enclosing_symbol(op.span.start))
    }
}
