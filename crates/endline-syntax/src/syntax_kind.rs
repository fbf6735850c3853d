use rowan::Language;

/// Unified syntax kind for both tokens and nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    // --- Trivia ---
    Whitespace,
    LineComment,
    BlockComment,
    DocComment,

    // --- Identifiers & literals ---
    Identifier,
    IntLiteral,
    LongLiteral,
    FloatLiteral,
    DoubleLiteral,
    CharLiteral,
    StringLiteral,

    // --- Keywords (reserved) ---
    AbstractKw,
    AssertKw,
    BooleanKw,
    BreakKw,
    ByteKw,
    CaseKw,
    CatchKw,
    CharKw,
    ClassKw,
    ConstKw,
    ContinueKw,
    DefaultKw,
    DoKw,
    DoubleKw,
    ElseKw,
    EnumKw,
    ExtendsKw,
    FinalKw,
    FinallyKw,
    FloatKw,
    ForKw,
    GotoKw,
    IfKw,
    ImplementsKw,
    ImportKw,
    InstanceofKw,
    IntKw,
    InterfaceKw,
    LongKw,
    NativeKw,
    NewKw,
    PackageKw,
    PrivateKw,
    ProtectedKw,
    PublicKw,
    ReturnKw,
    ShortKw,
    StaticKw,
    StrictfpKw,
    SuperKw,
    SwitchKw,
    SynchronizedKw,
    ThisKw,
    ThrowKw,
    ThrowsKw,
    TransientKw,
    TryKw,
    VoidKw,
    VolatileKw,
    WhileKw,

    // --- Literal keywords ---
    TrueKw,
    FalseKw,
    NullKw,

    // --- Contextual keywords ---
    VarKw,
    YieldKw,
    RecordKw,

    // --- Separators & operators ---
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semicolon,
    Comma,
    Dot,
    Ellipsis,
    At,
    DoubleColon,
    Question,
    Colon,
    Arrow,

    Eq,
    EqEq,
    Bang,
    BangEq,
    Tilde,
    Less,
    LessEq,
    Greater,
    GreaterEq,
    Plus,
    PlusPlus,
    PlusEq,
    Minus,
    MinusMinus,
    MinusEq,
    Star,
    StarEq,
    Slash,
    SlashEq,
    Percent,
    PercentEq,
    Amp,
    AmpAmp,
    AmpEq,
    Pipe,
    PipePipe,
    PipeEq,
    Caret,
    CaretEq,
    LeftShift,
    LeftShiftEq,
    RightShift,
    RightShiftEq,
    UnsignedRightShift,
    UnsignedRightShiftEq,

    // --- Special ---
    Error,
    Eof,

    // --- Nodes ---
    CompilationUnit,
    StatementFragment,
    PackageDeclaration,
    ImportDeclaration,
    Modifiers,
    Annotation,
    Name,

    ClassDeclaration,
    InterfaceDeclaration,
    EnumDeclaration,
    ExtendsClause,
    ImplementsClause,
    ClassBody,
    InterfaceBody,
    EnumBody,
    EnumConstant,

    FieldDeclaration,
    MethodDeclaration,
    ConstructorDeclaration,
    InitializerBlock,
    EmptyDeclaration,
    ParameterList,
    Parameter,
    ThrowsClause,

    Block,
    LocalVariableDeclarationStatement,
    LocalTypeDeclarationStatement,
    ExpressionStatement,
    IfStatement,
    ElseClause,
    SwitchStatement,
    SwitchBlock,
    SwitchLabel,
    ForStatement,
    ForHeader,
    WhileStatement,
    DoWhileStatement,
    SynchronizedStatement,
    TryStatement,
    ResourceSpecification,
    Resource,
    CatchClause,
    FinallyClause,
    AssertStatement,
    ReturnStatement,
    BreakStatement,
    ContinueStatement,
    ThrowStatement,
    LabeledStatement,
    EmptyStatement,

    VariableDeclaratorList,
    VariableDeclarator,
    ArrayInitializer,

    Type,
    PrimitiveType,
    NamedType,
    TypeArguments,
    TypeArgument,
    WildcardType,
    ArrayDimensions,
    TypeParameters,

    LiteralExpression,
    NameExpression,
    ThisExpression,
    SuperExpression,
    NewExpression,
    ArrayCreationExpression,
    ParenthesizedExpression,
    CastExpression,
    MethodCallExpression,
    FieldAccessExpression,
    ArrayAccessExpression,
    MethodReferenceExpression,
    ClassLiteralExpression,
    UnaryExpression,
    PostfixExpression,
    BinaryExpression,
    InstanceofExpression,
    AssignmentExpression,
    ConditionalExpression,
    LambdaExpression,
    LambdaParameters,
    ArgumentList,

    __Last,
}

impl SyntaxKind {
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            SyntaxKind::Whitespace
                | SyntaxKind::LineComment
                | SyntaxKind::BlockComment
                | SyntaxKind::DocComment
        )
    }

    pub fn is_contextual_keyword(self) -> bool {
        matches!(
            self,
            SyntaxKind::VarKw | SyntaxKind::YieldKw | SyntaxKind::RecordKw
        )
    }

    pub fn is_identifier_like(self) -> bool {
        self == SyntaxKind::Identifier || self.is_contextual_keyword()
    }

    pub fn is_literal(self) -> bool {
        matches!(
            self,
            SyntaxKind::IntLiteral
                | SyntaxKind::LongLiteral
                | SyntaxKind::FloatLiteral
                | SyntaxKind::DoubleLiteral
                | SyntaxKind::CharLiteral
                | SyntaxKind::StringLiteral
                | SyntaxKind::TrueKw
                | SyntaxKind::FalseKw
                | SyntaxKind::NullKw
        )
    }

    pub fn is_keyword(self) -> bool {
        (SyntaxKind::AbstractKw as u16..=SyntaxKind::RecordKw as u16).contains(&(self as u16))
    }

    /// Every statement form. Blocks count as statements.
    pub fn is_statement(self) -> bool {
        matches!(
            self,
            SyntaxKind::Block
                | SyntaxKind::LocalVariableDeclarationStatement
                | SyntaxKind::LocalTypeDeclarationStatement
                | SyntaxKind::ExpressionStatement
                | SyntaxKind::IfStatement
                | SyntaxKind::SwitchStatement
                | SyntaxKind::ForStatement
                | SyntaxKind::WhileStatement
                | SyntaxKind::DoWhileStatement
                | SyntaxKind::SynchronizedStatement
                | SyntaxKind::TryStatement
                | SyntaxKind::AssertStatement
                | SyntaxKind::ReturnStatement
                | SyntaxKind::BreakStatement
                | SyntaxKind::ContinueStatement
                | SyntaxKind::ThrowStatement
                | SyntaxKind::LabeledStatement
                | SyntaxKind::EmptyStatement
        )
    }

    /// Declarations that live directly in a type body.
    pub fn is_member_declaration(self) -> bool {
        matches!(
            self,
            SyntaxKind::FieldDeclaration
                | SyntaxKind::MethodDeclaration
                | SyntaxKind::ConstructorDeclaration
                | SyntaxKind::InitializerBlock
                | SyntaxKind::EmptyDeclaration
                | SyntaxKind::EnumConstant
                | SyntaxKind::ClassDeclaration
                | SyntaxKind::InterfaceDeclaration
                | SyntaxKind::EnumDeclaration
        )
    }

    pub fn from_keyword(text: &str) -> Option<SyntaxKind> {
        Some(match text {
            "abstract" => SyntaxKind::AbstractKw,
            "assert" => SyntaxKind::AssertKw,
            "boolean" => SyntaxKind::BooleanKw,
            "break" => SyntaxKind::BreakKw,
            "byte" => SyntaxKind::ByteKw,
            "case" => SyntaxKind::CaseKw,
            "catch" => SyntaxKind::CatchKw,
            "char" => SyntaxKind::CharKw,
            "class" => SyntaxKind::ClassKw,
            "const" => SyntaxKind::ConstKw,
            "continue" => SyntaxKind::ContinueKw,
            "default" => SyntaxKind::DefaultKw,
            "do" => SyntaxKind::DoKw,
            "double" => SyntaxKind::DoubleKw,
            "else" => SyntaxKind::ElseKw,
            "enum" => SyntaxKind::EnumKw,
            "extends" => SyntaxKind::ExtendsKw,
            "final" => SyntaxKind::FinalKw,
            "finally" => SyntaxKind::FinallyKw,
            "float" => SyntaxKind::FloatKw,
            "for" => SyntaxKind::ForKw,
            "goto" => SyntaxKind::GotoKw,
            "if" => SyntaxKind::IfKw,
            "implements" => SyntaxKind::ImplementsKw,
            "import" => SyntaxKind::ImportKw,
            "instanceof" => SyntaxKind::InstanceofKw,
            "int" => SyntaxKind::IntKw,
            "interface" => SyntaxKind::InterfaceKw,
            "long" => SyntaxKind::LongKw,
            "native" => SyntaxKind::NativeKw,
            "new" => SyntaxKind::NewKw,
            "package" => SyntaxKind::PackageKw,
            "private" => SyntaxKind::PrivateKw,
            "protected" => SyntaxKind::ProtectedKw,
            "public" => SyntaxKind::PublicKw,
            "return" => SyntaxKind::ReturnKw,
            "short" => SyntaxKind::ShortKw,
            "static" => SyntaxKind::StaticKw,
            "strictfp" => SyntaxKind::StrictfpKw,
            "super" => SyntaxKind::SuperKw,
            "switch" => SyntaxKind::SwitchKw,
            "synchronized" => SyntaxKind::SynchronizedKw,
            "this" => SyntaxKind::ThisKw,
            "throw" => SyntaxKind::ThrowKw,
            "throws" => SyntaxKind::ThrowsKw,
            "transient" => SyntaxKind::TransientKw,
            "try" => SyntaxKind::TryKw,
            "void" => SyntaxKind::VoidKw,
            "volatile" => SyntaxKind::VolatileKw,
            "while" => SyntaxKind::WhileKw,

            "true" => SyntaxKind::TrueKw,
            "false" => SyntaxKind::FalseKw,
            "null" => SyntaxKind::NullKw,

            "var" => SyntaxKind::VarKw,
            "yield" => SyntaxKind::YieldKw,
            "record" => SyntaxKind::RecordKw,

            _ => return None,
        })
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(value: SyntaxKind) -> Self {
        rowan::SyntaxKind(value as u16)
    }
}

/// Rowan language marker for Java.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum JavaLanguage {}

impl Language for JavaLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> SyntaxKind {
        if raw.0 < SyntaxKind::__Last as u16 {
            // SAFETY: the enum is `repr(u16)` with contiguous discriminants and `raw.0` is
            // below `__Last`.
            unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
        } else {
            SyntaxKind::Error
        }
    }

    fn kind_to_raw(kind: SyntaxKind) -> rowan::SyntaxKind {
        kind.into()
    }
}
