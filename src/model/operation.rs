//! Semantic operation nodes.
//!
//! An [`Operation`] is one node of the bound expression/statement graph the host frontend
//! produced for a member body. Nodes are stored in an [`crate::model::OperationTree`] and refer
//! to their children and parent through [`OpId`]s. The set of node shapes is closed; anything
//! the analysis does not need to distinguish is represented by [`OperationKind::Other`].

use std::fmt;

use strum::IntoStaticStr;

use crate::model::Token;

/// Index of an operation inside its [`crate::model::OperationTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OpId(pub u32);

impl OpId {
    /// Returns the position of the node inside the tree storage
    #[must_use]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for OpId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "op#{}", self.0)
    }
}

/// Half-open range of source positions covered by a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Span {
    /// First covered position
    pub start: u32,
    /// One past the last covered position
    pub end: u32,
}

impl Span {
    /// Creates a new span
    #[must_use]
    pub fn new(start: u32, end: u32) -> Self {
        Span { start, end }
    }

    /// Returns true if `position` lies inside the span
    #[must_use]
    pub fn contains(&self, position: u32) -> bool {
        self.start <= position && position < self.end
    }

    /// Returns the number of covered positions
    #[must_use]
    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if the span covers nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Operator of a binary or compound assignment operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    /// `+`
    Add,
    /// `-`
    Subtract,
    /// `*`
    Multiply,
    /// `/`
    Divide,
    /// `==`
    Equals,
    /// Any other operator
    Other,
}

/// What an instance reference denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstanceReferenceKind {
    /// `this` inside the containing type, explicit or implicit
    ContainingTypeInstance,
    /// The implicit receiver of an object or collection initializer
    ImplicitReceiver,
    /// The input of a pattern
    PatternInput,
}

/// The shape of an operation, with its children and resolved symbols.
#[derive(Debug, Clone, PartialEq, Eq, IntoStaticStr)]
pub enum OperationKind {
    /// A method call `instance.Method(arguments)`
    Invocation {
        /// Invoked method
        method: Token,
        /// Receiver, `None` for static calls
        instance: Option<OpId>,
        /// [`OperationKind::Argument`] nodes
        arguments: Vec<OpId>,
    },
    /// A property or indexer access
    PropertyReference {
        /// Accessed property
        property: Token,
        /// Receiver, `None` for static properties
        instance: Option<OpId>,
        /// Indexer [`OperationKind::Argument`] nodes
        arguments: Vec<OpId>,
    },
    /// An event access
    EventReference {
        /// Accessed event
        event: Token,
        /// Receiver, `None` for static events
        instance: Option<OpId>,
    },
    /// An event subscription `e += h` or unsubscription `e -= h`
    EventAssignment {
        /// The [`OperationKind::EventReference`] being assigned
        event_reference: OpId,
        /// The handler
        handler: OpId,
        /// True for `+=`, false for `-=`
        adds: bool,
    },
    /// A field access
    FieldReference {
        /// Accessed field
        field: Token,
        /// Receiver, `None` for static fields
        instance: Option<OpId>,
    },
    /// A parameter access
    ParameterReference {
        /// Accessed parameter
        parameter: Token,
    },
    /// A local access
    LocalReference {
        /// Accessed local
        local: Token,
    },
    /// `this`, explicit or implicit
    InstanceReference {
        /// What the reference denotes
        reference_kind: InstanceReferenceKind,
    },
    /// `target = value` or `target = ref value`
    SimpleAssignment {
        /// Assigned location
        target: OpId,
        /// Assigned value
        value: OpId,
        /// True for a ref reassignment
        is_ref: bool,
    },
    /// `target op= value`
    CompoundAssignment {
        /// Operator
        operator: BinaryOperator,
        /// Assigned location
        target: OpId,
        /// Right operand
        value: OpId,
    },
    /// `target ??= value`
    CoalesceAssignment {
        /// Assigned location
        target: OpId,
        /// Right operand
        value: OpId,
    },
    /// `++target`, `target--` and friends
    Increment {
        /// Incremented location
        target: OpId,
        /// True for a decrement
        is_decrement: bool,
    },
    /// `left op right`
    Binary {
        /// Operator
        operator: BinaryOperator,
        /// Left operand
        left: OpId,
        /// Right operand
        right: OpId,
    },
    /// `condition ? when_true : when_false`, by value or by reference
    Conditional {
        /// Condition
        condition: OpId,
        /// Value when the condition holds
        when_true: OpId,
        /// Value otherwise, absent for an `if` statement
        when_false: Option<OpId>,
        /// True for `c ? ref a : ref b`
        is_ref: bool,
    },
    /// A type conversion
    Conversion {
        /// Converted value
        operand: OpId,
        /// The conversion calls a user defined operator
        is_user_defined: bool,
        /// Conversion method, for user defined and library operators
        method: Option<Token>,
    },
    /// An argument of an invocation or indexer
    Argument {
        /// Matched parameter
        parameter: Option<Token>,
        /// Passed value
        value: OpId,
    },
    /// `return value`
    Return {
        /// Returned value
        value: Option<OpId>,
    },
    /// `nameof(argument)`
    NameOf {
        /// Named expression
        argument: OpId,
    },
    /// `typeof(T)`
    TypeOf {
        /// Named type
        type_operand: Token,
    },
    /// `sizeof(T)`
    SizeOf {
        /// Measured type
        type_operand: Token,
    },
    /// `foreach (var x in collection) body`
    ForEachLoop {
        /// Enumerated collection
        collection: OpId,
        /// The resolved `GetEnumerator` method
        get_enumerator: Option<Token>,
        /// Loop body
        body: Option<OpId>,
    },
    /// `await operand`
    Await {
        /// Awaited value
        operand: OpId,
        /// The resolved `GetAwaiter` method
        get_awaiter: Option<Token>,
        /// The await is dispatched dynamically
        is_dynamic: bool,
    },
    /// An index or range access served by a `Length`/`Count` member plus an indexer or `Slice`
    ImplicitIndexerReference {
        /// Accessed collection
        instance: OpId,
        /// Index or range argument
        argument: OpId,
        /// Indexer property or `Slice` method
        indexer: Token,
        /// `Length` or `Count` property or method
        length: Token,
    },
    /// An element access into an inline array
    InlineArrayAccess {
        /// Accessed inline array
        instance: OpId,
        /// Index or range argument
        argument: OpId,
    },
    /// `left..right`
    Range {
        /// Start bound
        left: Option<OpId>,
        /// End bound
        right: Option<OpId>,
    },
    /// A declared variable with its optional initializer
    VariableDeclarator {
        /// Declared local
        local: Token,
        /// [`OperationKind::VariableInitializer`] node
        initializer: Option<OpId>,
    },
    /// `= value` of a declarator
    VariableInitializer {
        /// Initial value
        value: OpId,
    },
    /// `fixed (T* p = value, ...) body`
    FixedStatement {
        /// [`OperationKind::VariableDeclarator`] nodes
        declarators: Vec<OpId>,
        /// Statement body
        body: Option<OpId>,
    },
    /// `&reference`
    AddressOf {
        /// Addressed location
        reference: OpId,
    },
    /// `(a, b) = value`
    DeconstructionAssignment {
        /// Deconstructed targets, usually a [`OperationKind::Tuple`]
        target: OpId,
        /// Deconstructed value
        value: OpId,
    },
    /// `(a, b)`
    Tuple {
        /// Tuple elements
        elements: Vec<OpId>,
    },
    /// A constant
    Literal,
    /// `{ ... }`
    Block {
        /// Statements
        operations: Vec<OpId>,
    },
    /// Any other node
    Other {
        /// Child nodes
        children: Vec<OpId>,
    },
}

impl OperationKind {
    /// Returns the child nodes in source order
    #[must_use]
    pub fn children(&self) -> Vec<OpId> {
        match self {
            OperationKind::Invocation {
                instance,
                arguments,
                ..
            }
            | OperationKind::PropertyReference {
                instance,
                arguments,
                ..
            } => instance.iter().chain(arguments.iter()).copied().collect(),
            OperationKind::EventReference { instance, .. }
            | OperationKind::FieldReference { instance, .. } => instance.iter().copied().collect(),
            OperationKind::EventAssignment {
                event_reference,
                handler,
                ..
            } => vec![*event_reference, *handler],
            OperationKind::SimpleAssignment { target, value, .. }
            | OperationKind::CompoundAssignment { target, value, .. }
            | OperationKind::CoalesceAssignment { target, value }
            | OperationKind::DeconstructionAssignment { target, value } => vec![*target, *value],
            OperationKind::Increment { target, .. } => vec![*target],
            OperationKind::Binary { left, right, .. } => vec![*left, *right],
            OperationKind::Conditional {
                condition,
                when_true,
                when_false,
                ..
            } => [Some(*condition), Some(*when_true), *when_false]
                .into_iter()
                .flatten()
                .collect(),
            OperationKind::Conversion { operand, .. } => vec![*operand],
            OperationKind::Argument { value, .. } => vec![*value],
            OperationKind::Return { value } => value.iter().copied().collect(),
            OperationKind::NameOf { argument } => vec![*argument],
            OperationKind::ForEachLoop {
                collection, body, ..
            } => std::iter::once(*collection).chain(*body).collect(),
            OperationKind::Await { operand, .. } => vec![*operand],
            OperationKind::ImplicitIndexerReference {
                instance, argument, ..
            }
            | OperationKind::InlineArrayAccess { instance, argument } => vec![*instance, *argument],
            OperationKind::Range { left, right } => left.iter().chain(right.iter()).copied().collect(),
            OperationKind::VariableDeclarator { initializer, .. } => {
                initializer.iter().copied().collect()
            }
            OperationKind::VariableInitializer { value } => vec![*value],
            OperationKind::FixedStatement { declarators, body } => {
                declarators.iter().copied().chain(*body).collect()
            }
            OperationKind::AddressOf { reference } => vec![*reference],
            OperationKind::Tuple { elements } => elements.clone(),
            OperationKind::Block { operations } => operations.clone(),
            OperationKind::Other { children } => children.clone(),
            OperationKind::ParameterReference { .. }
            | OperationKind::LocalReference { .. }
            | OperationKind::InstanceReference { .. }
            | OperationKind::TypeOf { .. }
            | OperationKind::SizeOf { .. }
            | OperationKind::Literal => Vec::new(),
        }
    }

    /// Returns the variant name, used as a last resort display name
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.into()
    }
}

/// A node of an operation tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    /// Shape and children
    pub kind: OperationKind,
    /// Static type of the value, `None` for statements and unresolved expressions
    pub ty: Option<Token>,
    /// Covered source positions
    pub span: Span,
    /// Parent node, `None` for the root
    pub parent: Option<OpId>,
    /// The node was synthesized by the compiler (implicit conversions, implicit `this`)
    pub is_implicit: bool,
}
