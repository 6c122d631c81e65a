use logos::Logos;

/// Token set for the Cube line-file family.
///
/// Newlines are kept as tokens rather than skipped: access/xfer/node files
/// are rows of bare numbers, so the only thing delimiting one record from
/// the next is the line break, and inline comments are distinguished from
/// free-standing ones the same way.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r]+")]
pub enum Token {
    /// `;`-comment running to end of line, raw text including the `;`.
    #[regex(r";[^\n]*", |lex| lex.slice().to_string())]
    Comment(String),

    #[token("\n")]
    Newline,

    /// single- or double-quoted string, quotes stripped.
    #[regex(r#""[^"\n]*""#, trim_quotes)]
    #[regex(r"'[^'\n]*'", trim_quotes)]
    Quoted(String),

    #[regex(r"-?[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    Int(i64),

    /// kept as raw text so values round-trip unchanged.
    #[regex(r"-?[0-9]+\.[0-9]*", |lex| lex.slice().to_string())]
    Float(String),

    /// attribute names and bare values; names may carry a bracketed
    /// numeric suffix (`HEADWAY[1]`). At least one letter is required so
    /// plain numbers lex as Int/Float.
    #[regex(r"[0-9.]*[A-Za-z_][A-Za-z0-9_.]*(\[[0-9]+\])?", |lex| lex.slice().to_string())]
    Word(String),

    #[token("=")]
    Eq,

    #[token(",")]
    Comma,

    #[token("-")]
    Dash,
}

fn trim_quotes(lex: &mut logos::Lexer<Token>) -> String {
    let slice = lex.slice();
    slice[1..slice.len() - 1].to_string()
}
