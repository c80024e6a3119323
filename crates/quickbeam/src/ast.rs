//! Abstract syntax tree consumed by the evaluator
//!
//! This is the input contract between a language frontend and the
//! interpreter core. Every statement carries a [`Span`] so diagnostics can
//! point back at the source.
//!
//! Function and class bodies are held behind `Rc` so that runtime values
//! (closures, class records) can share them without cloning whole subtrees.

use std::fmt;
use std::rc::Rc;

/// A source position (1-indexed line and column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Line number (1-indexed)
    pub line: usize,

    /// Column number (1-indexed)
    pub column: usize,
}

impl Span {
    /// Create a new span.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Program & Statements
// ═══════════════════════════════════════════════════════════════════════

/// A parsed source file: an ordered list of top-level statements.
#[derive(Debug, Clone, Default)]
pub struct Program {
    /// Top-level statements in source order
    pub stmts: Vec<Stmt>,
}

/// A braced sequence of statements.
#[derive(Debug, Clone, Default)]
pub struct Block {
    /// Statements in source order
    pub stmts: Vec<Stmt>,
}

impl Block {
    /// Create a block from statements.
    pub fn new(stmts: Vec<Stmt>) -> Self {
        Self { stmts }
    }
}

/// A statement with its source position.
#[derive(Debug, Clone)]
pub struct Stmt {
    /// What kind of statement this is
    pub kind: StmtKind,

    /// Where the statement starts
    pub span: Span,
}

impl Stmt {
    /// Create a statement.
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Statement forms.
#[derive(Debug, Clone)]
pub enum StmtKind {
    /// `namespace A.B` - switches the current namespace for what follows
    Namespace(String),

    /// `use A.B.C [as D]`
    Use {
        /// Fully-qualified dotted path
        path: String,
        /// Optional local alias
        alias: Option<String>,
    },

    /// `class ... { ... }`
    Class(Rc<ClassDecl>),

    /// `interface ... { ... }`
    Interface(Rc<InterfaceDecl>),

    /// `func name(...) { ... }` at statement level
    Function(Rc<FunctionDecl>),

    /// `let x[: T] [= e]`
    Let {
        /// Bound name
        name: String,
        /// Declared type, if any
        ty: Option<TypeRef>,
        /// Initializer (null when absent)
        value: Option<Expr>,
    },

    /// `x := e`
    ShortDeclare {
        /// Bound name
        name: String,
        /// Initializer
        value: Expr,
    },

    /// Expression evaluated for its effect (includes assignments)
    Expr(Expr),

    /// `return [e]`
    Return(Option<Expr>),

    /// `if cond { } [else ...]`
    If {
        /// Condition
        condition: Expr,
        /// Taken when the condition is truthy
        then_branch: Block,
        /// `else if` (an `If` statement) or `else` (a `Block` statement)
        else_branch: Option<Box<Stmt>>,
    },

    /// Any of the three `for` forms
    For(ForLoop),

    /// `break`
    Break,

    /// `continue`
    Continue,

    /// Nested `{ ... }`
    Block(Block),

    /// `go expr` - concurrent task launch
    Go(Expr),
}

/// A `for` loop. The three source forms map onto optional parts:
///
/// - `for { }` - everything `None`
/// - `for cond { }` - only `condition`
/// - `for init; cond; post { }` - any combination
#[derive(Debug, Clone)]
pub struct ForLoop {
    /// Runs once before the first iteration, in the loop's own scope
    pub init: Option<Box<Stmt>>,

    /// Checked before every iteration; absent means "forever"
    pub condition: Option<Expr>,

    /// Runs after every iteration that completes or `continue`s
    pub post: Option<Box<Stmt>>,

    /// Loop body
    pub body: Block,
}

// ═══════════════════════════════════════════════════════════════════════
// Declarations
// ═══════════════════════════════════════════════════════════════════════

/// A (possibly qualified) type annotation. Types are recorded, not checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    /// Dotted type name, e.g. `int` or `App.Models.User`
    pub name: String,

    /// Whether the type was written as an array, e.g. `int[]`
    pub is_array: bool,
}

impl TypeRef {
    /// Create a scalar type reference.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_array: false,
        }
    }
}

/// A parameter in a function, method or signature.
#[derive(Debug, Clone)]
pub struct Param {
    /// Parameter name
    pub name: String,

    /// Declared type
    pub ty: Option<TypeRef>,

    /// Default value expression, evaluated at call time when omitted
    pub default: Option<Expr>,
}

impl Param {
    /// Create an untyped parameter without a default.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: None,
            default: None,
        }
    }
}

/// A function, method or closure definition.
#[derive(Debug, Clone)]
pub struct FunctionDecl {
    /// Name (`None` for function literals)
    pub name: Option<String>,

    /// Parameters in order
    pub params: Vec<Param>,

    /// Declared return types (multiple for tuple-style returns)
    pub return_types: Vec<TypeRef>,

    /// Body
    pub body: Rc<Block>,
}

/// Member visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    /// Accessible everywhere
    #[default]
    Public,
    /// Accessible from the declaring class and its relatives
    Protected,
    /// Accessible only from the declaring class
    Private,
}

/// Modifier flags shared by every class member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    /// Visibility
    pub visibility: Visibility,

    /// `static`
    pub is_static: bool,
}

/// A class member.
#[derive(Debug, Clone)]
pub enum ClassMember {
    /// `const NAME = expr`
    Constant {
        /// Constant name
        name: String,
        /// Value expression
        value: Expr,
        /// Modifiers
        modifiers: Modifiers,
    },

    /// `name[: T] [= expr]` (instance field, or static field with `static`)
    Field {
        /// Field name
        name: String,
        /// Declared type
        ty: Option<TypeRef>,
        /// Default value expression (null when absent)
        default: Option<Expr>,
        /// Modifiers
        modifiers: Modifiers,
    },

    /// `func name(...) { ... }`
    Method {
        /// Method definition
        decl: Rc<FunctionDecl>,
        /// Modifiers
        modifiers: Modifiers,
    },
}

/// A class declaration.
#[derive(Debug, Clone)]
pub struct ClassDecl {
    /// Class name (unqualified)
    pub name: String,

    /// Parent class name, possibly dotted
    pub parent: Option<String>,

    /// Implemented interface names, possibly dotted
    pub interfaces: Vec<String>,

    /// Members in declaration order
    pub members: Vec<ClassMember>,
}

/// A required method in an interface.
#[derive(Debug, Clone)]
pub struct MethodSignature {
    /// Method name
    pub name: String,

    /// Parameters (names and types)
    pub params: Vec<Param>,

    /// Declared return types
    pub return_types: Vec<TypeRef>,
}

/// An interface declaration.
#[derive(Debug, Clone)]
pub struct InterfaceDecl {
    /// Interface name (unqualified)
    pub name: String,

    /// Extended interface names, possibly dotted
    pub parents: Vec<String>,

    /// Required methods
    pub methods: Vec<MethodSignature>,
}

// ═══════════════════════════════════════════════════════════════════════
// Expressions
// ═══════════════════════════════════════════════════════════════════════

/// An expression with its source position.
#[derive(Debug, Clone)]
pub struct Expr {
    /// What kind of expression this is
    pub kind: ExprKind,

    /// Where the expression starts
    pub span: Span,
}

impl Expr {
    /// Create an expression.
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// The dotted name this expression spells, if it is nothing but
    /// identifiers joined by member access (`a`, `a.b`, `a.b.c`).
    pub fn dotted_path(&self) -> Option<String> {
        match &self.kind {
            ExprKind::Ident(name) => Some(name.clone()),
            ExprKind::Member { object, property } => object
                .dotted_path()
                .map(|prefix| format!("{prefix}.{property}")),
            _ => None,
        }
    }
}

/// Literal values.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// `null`
    Null,
    /// `true` / `false`
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit float
    Float(f64),
    /// String
    Str(String),
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixOp {
    /// `-`
    Neg,
    /// `!`
    Not,
}

impl fmt::Display for PrefixOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrefixOp::Neg => write!(f, "-"),
            PrefixOp::Not => write!(f, "!"),
        }
    }
}

/// Infix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfixOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Rem,
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `&&`
    And,
    /// `||`
    Or,
}

impl fmt::Display for InfixOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InfixOp::Add => "+",
            InfixOp::Sub => "-",
            InfixOp::Mul => "*",
            InfixOp::Div => "/",
            InfixOp::Rem => "%",
            InfixOp::Eq => "==",
            InfixOp::Ne => "!=",
            InfixOp::Lt => "<",
            InfixOp::Le => "<=",
            InfixOp::Gt => ">",
            InfixOp::Ge => ">=",
            InfixOp::And => "&&",
            InfixOp::Or => "||",
        };
        write!(f, "{s}")
    }
}

/// The class a `::` expression is anchored on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassRef {
    /// A class name, possibly dotted (`Foo`, `App.Models.Foo`)
    Named(String),
    /// `self` - the class that defined the running method
    SelfClass,
    /// `super` - the parent of the defining class
    Super,
    /// `static` - the dynamically invoked class
    Static,
}

impl fmt::Display for ClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassRef::Named(name) => write!(f, "{name}"),
            ClassRef::SelfClass => write!(f, "self"),
            ClassRef::Super => write!(f, "super"),
            ClassRef::Static => write!(f, "static"),
        }
    }
}

/// Expression forms.
#[derive(Debug, Clone)]
pub enum ExprKind {
    /// A literal
    Literal(Literal),

    /// A plain identifier (dotted chains are `Member` nodes)
    Ident(String),

    /// `[a, b, c]`
    Array(Vec<Expr>),

    /// `-x`, `!x`
    Prefix {
        /// Operator
        op: PrefixOp,
        /// Operand
        operand: Box<Expr>,
    },

    /// `a op b`
    Infix {
        /// Operator
        op: InfixOp,
        /// Left operand
        left: Box<Expr>,
        /// Right operand
        right: Box<Expr>,
    },

    /// `cond ? a : b`
    Ternary {
        /// Condition
        condition: Box<Expr>,
        /// Value when truthy
        then_branch: Box<Expr>,
        /// Value when falsy
        else_branch: Box<Expr>,
    },

    /// `callee(args)`
    Call {
        /// Callee expression
        callee: Box<Expr>,
        /// Arguments
        args: Vec<Expr>,
    },

    /// `new A.B.C(args)`
    New {
        /// Class name, possibly dotted
        class: String,
        /// Constructor arguments
        args: Vec<Expr>,
    },

    /// `object.property`
    Member {
        /// Receiver expression
        object: Box<Expr>,
        /// Member name
        property: String,
    },

    /// `object[index]`
    Index {
        /// Indexed expression
        object: Box<Expr>,
        /// Index expression
        index: Box<Expr>,
    },

    /// `Class::method(args)`
    StaticCall {
        /// Anchor class
        class: ClassRef,
        /// Method name
        method: String,
        /// Arguments
        args: Vec<Expr>,
    },

    /// `Class::member`
    StaticAccess {
        /// Anchor class
        class: ClassRef,
        /// Member name
        member: String,
    },

    /// `this`
    This,

    /// bare `super`
    Super,

    /// `func (params) { body }`
    Function(Rc<FunctionDecl>),

    /// `target = value` or `target op= value`
    Assign {
        /// Assignment target (identifier, member, index or static access)
        target: Box<Expr>,
        /// Compound operator, if any
        op: Option<InfixOp>,
        /// Assigned value
        value: Box<Expr>,
    },
}
