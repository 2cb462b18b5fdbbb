//! Token categories and the keyword table.

use std::fmt;

/// All lexical categories the lexer can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Eof,

    /// A `!`-sigil variable or `__`-sigil function name.
    Identifier,
    IntLiteral,
    DecimalLiteral,
    StringLiteral,

    // Keywords.
    KwInteiro,
    KwDecimal,
    KwTexto,
    KwSe,
    KwSenao,
    KwEnquanto,
    KwPara,
    KwRetorne,
    KwRetorno,
    KwPrincipal,
    KwFuncao,
    KwLeia,
    KwEscreva,

    // Arithmetic operators.
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,

    // Relational operators.
    EqEq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,

    // Logical operators. The lexer never emits these (see DESIGN.md); the
    // variants exist because the parser's precedence table and the
    // analyzer's type rule for them are both specified.
    AndAnd,
    OrOr,

    Assign,

    // Punctuation.
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semicolon,
    Comma,

    Error,
}

impl TokenKind {
    /// Whether a token of this kind begins a new statement, used by the
    /// parser's panic-mode resynchronization predicate.
    pub fn begins_statement(self) -> bool {
        matches!(
            self,
            TokenKind::KwInteiro
                | TokenKind::KwDecimal
                | TokenKind::KwTexto
                | TokenKind::KwSe
                | TokenKind::KwEnquanto
                | TokenKind::KwPara
                | TokenKind::KwLeia
                | TokenKind::KwEscreva
                | TokenKind::KwFuncao
                | TokenKind::KwRetorne
        )
    }

    /// Whether this kind introduces a variable declaration's type.
    pub fn is_type_keyword(self) -> bool {
        matches!(self, TokenKind::KwInteiro | TokenKind::KwDecimal | TokenKind::KwTexto)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A lexical token: its kind, the exact source text it was built from, and
/// the 1-based line it started on. Lexemes are owned strings rather than
/// borrows into the source, so a token can outlive the reader that scanned
/// it once embedded into an AST node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: u32,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: u32) -> Self {
        Self { kind, lexeme: lexeme.into(), line }
    }

    pub fn eof(line: u32) -> Self {
        Self::new(TokenKind::Eof, "", line)
    }
}

/// Flat linear scan over the twelve... thirteen reserved words. Not worth a
/// hash map at this size; mirrors the original scanner's `if`/`else` chain.
const KEYWORDS: &[(&str, TokenKind)] = &[
    ("inteiro", TokenKind::KwInteiro),
    ("decimal", TokenKind::KwDecimal),
    ("texto", TokenKind::KwTexto),
    ("se", TokenKind::KwSe),
    ("senao", TokenKind::KwSenao),
    ("enquanto", TokenKind::KwEnquanto),
    ("para", TokenKind::KwPara),
    ("retorne", TokenKind::KwRetorne),
    ("retorno", TokenKind::KwRetorno),
    ("principal", TokenKind::KwPrincipal),
    ("funcao", TokenKind::KwFuncao),
    ("leia", TokenKind::KwLeia),
    ("escreva", TokenKind::KwEscreva),
];

/// Looks up a bare word in the keyword table. The language has no bare
/// identifiers, so a miss here is always a lexical error upstream.
pub fn lookup_keyword(word: &str) -> Option<TokenKind> {
    KEYWORDS.iter().find(|(kw, _)| *kw == word).map(|(_, kind)| *kind)
}
