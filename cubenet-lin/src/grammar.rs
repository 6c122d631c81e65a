//! Leaf-producing parser for the Cube line-file family.
//!
//! Statements are dispatched by their leading keyword, case-insensitively:
//! LINE, LINK, PNR, ZONEACCESS/ZAC, SUPPLINK, FACTOR, FARESYSTEM,
//! WAITCRVDEF, CROWDCRVDEF, OPERATOR, MODE, VEHICLETYPE. Rows of bare
//! numbers (access/xfer/node files) form access-row leaves, and free
//! `;`-comments form smcw leaves. The whole input must be consumed; the
//! first token that cannot extend the current production fails the parse.

use crate::error::SyntaxError;
use crate::lexer::Token;
use logos::Logos;
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafTag {
    /// free-standing comment.
    Smcw,
    /// one line-level attribute of a LINE statement.
    LinAttr,
    /// one routing node of a LINE statement, with its attributes.
    LinNode,
    Link,
    Factor,
    Pnr,
    Zac,
    Supplink,
    Faresystem,
    WaitCrvDef,
    CrowdCrvDef,
    Operator,
    Mode,
    VehicleType,
    /// bare `a b [wnr|pnr] [value]` row from an access/xfer/node file.
    AccessRow,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Piece {
    Attr {
        name: String,
        value: String,
        comment: Option<String>,
    },
    NodeNum(i64),
    NodePair(i64, i64),
    /// bare integer in an access row.
    Num(i64),
    /// bare float in an access row, raw text.
    FloatVal(String),
    /// `wnr` / `pnr` marker in an access row.
    AccessTag(String),
    Comment(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Leaf {
    pub tag: LeafTag,
    pub span: Range<usize>,
    pub pieces: Vec<Piece>,
}

impl Leaf {
    fn new(tag: LeafTag, span: Range<usize>) -> Self {
        Self {
            tag,
            span,
            pieces: Vec::new(),
        }
    }

    /// the first attribute piece with this name, case-insensitive.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.pieces.iter().find_map(|p| match p {
            Piece::Attr { name: n, value, .. } if n.eq_ignore_ascii_case(name) => {
                Some(value.as_str())
            }
            _ => None,
        })
    }

    pub fn node_pair(&self) -> Option<(i64, i64)> {
        self.pieces.iter().find_map(|p| match p {
            Piece::NodePair(a, b) => Some((*a, *b)),
            _ => None,
        })
    }
}

enum Keyword {
    Line,
    Statement(LeafTag),
}

fn keyword(word: &str) -> Option<Keyword> {
    match word.to_uppercase().as_str() {
        "LINE" => Some(Keyword::Line),
        "LINK" => Some(Keyword::Statement(LeafTag::Link)),
        "PNR" => Some(Keyword::Statement(LeafTag::Pnr)),
        "ZONEACCESS" | "ZAC" => Some(Keyword::Statement(LeafTag::Zac)),
        "SUPPLINK" => Some(Keyword::Statement(LeafTag::Supplink)),
        "FACTOR" => Some(Keyword::Statement(LeafTag::Factor)),
        "FARESYSTEM" => Some(Keyword::Statement(LeafTag::Faresystem)),
        "WAITCRVDEF" => Some(Keyword::Statement(LeafTag::WaitCrvDef)),
        "CROWDCRVDEF" => Some(Keyword::Statement(LeafTag::CrowdCrvDef)),
        "OPERATOR" => Some(Keyword::Statement(LeafTag::Operator)),
        "MODE" => Some(Keyword::Statement(LeafTag::Mode)),
        "VEHICLETYPE" => Some(Keyword::Statement(LeafTag::VehicleType)),
        _ => None,
    }
}

pub fn parse(text: &str) -> Result<Vec<Leaf>, SyntaxError> {
    let mut tokens: Vec<(Token, Range<usize>)> = Vec::new();
    for (result, span) in Token::lexer(text).spanned() {
        match result {
            Ok(token) => tokens.push((token, span)),
            Err(_) => return Err(syntax_error(text, span.start)),
        }
    }
    Parser {
        text,
        tokens,
        pos: 0,
    }
    .run()
}

fn syntax_error(text: &str, offset: usize) -> SyntaxError {
    SyntaxError {
        offset,
        context: context_window(text, offset),
    }
}

/// a window of roughly 80 bytes around the offset, clipped to char
/// boundaries.
fn context_window(text: &str, offset: usize) -> String {
    let mut start = offset.saturating_sub(40);
    let mut end = (offset + 40).min(text.len());
    while start > 0 && !text.is_char_boundary(start) {
        start -= 1;
    }
    while end < text.len() && !text.is_char_boundary(end) {
        end += 1;
    }
    text[start..end].to_string()
}

struct Parser<'a> {
    text: &'a str,
    tokens: Vec<(Token, Range<usize>)>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn run(mut self) -> Result<Vec<Leaf>, SyntaxError> {
        let mut leaves = Vec::new();
        while let Some((token, span)) = self.peek() {
            match token {
                Token::Newline => {
                    self.pos += 1;
                }
                Token::Comment(cmt) => {
                    let mut leaf = Leaf::new(LeafTag::Smcw, span);
                    leaf.pieces.push(Piece::Comment(cmt));
                    leaves.push(leaf);
                    self.pos += 1;
                }
                Token::Int(_) => self.access_row(&mut leaves)?,
                Token::Word(word) => match keyword(&word) {
                    Some(Keyword::Line) => {
                        self.pos += 1;
                        self.line_statement(&mut leaves)?;
                    }
                    Some(Keyword::Statement(tag)) => {
                        self.pos += 1;
                        self.attr_statement(tag, span, &mut leaves)?;
                    }
                    None => return Err(self.err_here()),
                },
                _ => return Err(self.err_here()),
            }
        }
        Ok(leaves)
    }

    fn peek(&self) -> Option<(Token, Range<usize>)> {
        self.tokens.get(self.pos).cloned()
    }

    fn peek_at(&self, offset: usize) -> Option<Token> {
        self.tokens.get(self.pos + offset).map(|(t, _)| t.clone())
    }

    fn err_here(&self) -> SyntaxError {
        let offset = self
            .tokens
            .get(self.pos)
            .map(|(_, span)| span.start)
            .unwrap_or(self.text.len());
        syntax_error(self.text, offset)
    }

    /// true when the word at the cursor opens the next statement (a
    /// keyword not followed by `=`).
    fn at_statement_boundary(&self) -> bool {
        match self.peek_at(0) {
            Some(Token::Word(w)) => {
                keyword(&w).is_some() && !matches!(self.peek_at(1), Some(Token::Eq))
            }
            _ => false,
        }
    }

    /// One `NAME=value` unit; the cursor sits on the name word, `=` has
    /// been checked by the caller. `allow_seq` admits multi-number values
    /// (factor node lists, FAREFROMFS tables); it must stay off inside
    /// LINE statements or a node attribute would swallow the next routing
    /// node.
    fn attr(&mut self, allow_seq: bool) -> Result<Piece, SyntaxError> {
        let Some((Token::Word(name), _)) = self.peek() else {
            return Err(self.err_here());
        };
        self.pos += 2; // name and '='
        let mut value = self.scalar_value()?;
        if allow_seq {
            value = self.extend_value_seq(value);
        }
        if matches!(self.peek_at(0), Some(Token::Comma)) {
            self.pos += 1;
        }
        // an inline comment before the line break belongs to this attribute
        let comment = match self.peek_at(0) {
            Some(Token::Comment(cmt)) => {
                self.pos += 1;
                Some(cmt.trim().to_string())
            }
            _ => None,
        };
        Ok(Piece::Attr {
            name,
            value,
            comment,
        })
    }

    fn scalar_value(&mut self) -> Result<String, SyntaxError> {
        let value = match self.peek_at(0) {
            Some(Token::Word(w)) => w,
            Some(Token::Quoted(q)) => q,
            Some(Token::Int(n)) => n.to_string(),
            Some(Token::Float(fl)) => fl,
            _ => return Err(self.err_here()),
        };
        self.pos += 1;
        Ok(value)
    }

    /// `FAREFROMFS=0,1.5,2.0`-style numeric sequences: a comma directly
    /// followed by a number extends the value rather than separating the
    /// next attribute. A directly-following negative int is a dash-fused
    /// continuation (`NODES=15536-15537`).
    fn extend_value_seq(&mut self, mut value: String) -> String {
        loop {
            match (self.peek_at(0), self.peek_at(1), self.peek_at(2)) {
                (Some(Token::Comma), Some(Token::Int(n)), after)
                    if !matches!(after, Some(Token::Eq)) =>
                {
                    value.push_str(&format!(",{n}"));
                    self.pos += 2;
                }
                (Some(Token::Comma), Some(Token::Float(fl)), after)
                    if !matches!(after, Some(Token::Eq)) =>
                {
                    value.push_str(&format!(",{fl}"));
                    self.pos += 2;
                }
                (Some(Token::Int(n)), _, _) if n < 0 => {
                    value.push_str(&format!("-{}", n.abs()));
                    self.pos += 1;
                }
                _ => break,
            }
        }
        value
    }

    /// `a-b` or `a,b` after an identity attribute's `=`. The lexer fuses a
    /// dash-separated pair into an int followed by a negative int, so a
    /// directly-following negative number is read as the far end.
    fn node_pair_or_num(&mut self) -> Result<Piece, SyntaxError> {
        let Some(Token::Int(a)) = self.peek_at(0) else {
            return Err(self.err_here());
        };
        self.pos += 1;
        match self.peek_at(0) {
            Some(Token::Int(b)) if b < 0 => {
                self.pos += 1;
                Ok(Piece::NodePair(a, b.abs()))
            }
            Some(Token::Dash) => {
                self.pos += 1;
                let Some(Token::Int(b)) = self.peek_at(0) else {
                    return Err(self.err_here());
                };
                self.pos += 1;
                Ok(Piece::NodePair(a, b))
            }
            Some(Token::Comma)
                if matches!(self.peek_at(1), Some(Token::Int(_)))
                    && !matches!(self.peek_at(2), Some(Token::Eq)) =>
            {
                self.pos += 1;
                let Some(Token::Int(b)) = self.peek_at(0) else {
                    return Err(self.err_here());
                };
                self.pos += 1;
                Ok(Piece::NodePair(a, b))
            }
            _ => Ok(Piece::NodeNum(a)),
        }
    }

    /// identity attribute names whose value is a node or node pair.
    fn is_identity_attr(tag: LeafTag, name: &str) -> bool {
        match tag {
            LeafTag::Link | LeafTag::Supplink => {
                name.eq_ignore_ascii_case("NODES") || name.eq_ignore_ascii_case("N")
            }
            LeafTag::Pnr => name.eq_ignore_ascii_case("NODE"),
            LeafTag::Zac => name.eq_ignore_ascii_case("LINK"),
            _ => false,
        }
    }

    /// LINK/PNR/ZONEACCESS/SUPPLINK/FACTOR/FARESYSTEM/PT statements: a run
    /// of attributes, one leaf per statement.
    fn attr_statement(
        &mut self,
        tag: LeafTag,
        start: Range<usize>,
        leaves: &mut Vec<Leaf>,
    ) -> Result<(), SyntaxError> {
        let mut leaf = Leaf::new(tag, start);
        let mut newline = false;
        loop {
            match self.peek_at(0) {
                None => break,
                Some(Token::Newline) => {
                    newline = true;
                    self.pos += 1;
                }
                Some(Token::Comment(cmt)) => {
                    // a comment on its own line opens a new context
                    if newline {
                        break;
                    }
                    leaf.pieces.push(Piece::Comment(cmt.trim().to_string()));
                    self.pos += 1;
                }
                Some(Token::Word(name)) => {
                    if self.at_statement_boundary() {
                        break;
                    }
                    if !matches!(self.peek_at(1), Some(Token::Eq)) {
                        return Err(self.err_here());
                    }
                    if Self::is_identity_attr(tag, &name) {
                        self.pos += 2;
                        leaf.pieces.push(self.node_pair_or_num()?);
                        if matches!(self.peek_at(0), Some(Token::Comma)) {
                            self.pos += 1;
                        }
                    } else {
                        leaf.pieces.push(self.attr(true)?);
                    }
                    newline = false;
                }
                Some(Token::Int(_)) => break,
                Some(Token::Comma) => {
                    self.pos += 1;
                }
                _ => return Err(self.err_here()),
            }
        }
        if let Some((_, span)) = self.tokens.get(self.pos.saturating_sub(1)) {
            leaf.span.end = span.end;
        }
        leaves.push(leaf);
        Ok(())
    }

    /// LINE statements interleave three leaf kinds: line attributes, nodes
    /// (with their own attributes), and free comments.
    fn line_statement(&mut self, leaves: &mut Vec<Leaf>) -> Result<(), SyntaxError> {
        let mut in_nodes = false;
        let mut newline = false;
        loop {
            let Some((token, span)) = self.peek() else {
                break;
            };
            match token {
                Token::Newline => {
                    newline = true;
                    self.pos += 1;
                }
                Token::Comma => {
                    self.pos += 1;
                }
                Token::Comment(cmt) => {
                    let cmt = cmt.trim().to_string();
                    self.pos += 1;
                    match leaves.last_mut() {
                        // inline comment on the node it follows
                        Some(last) if !newline && last.tag == LeafTag::LinNode => {
                            last.pieces.push(Piece::Comment(cmt));
                        }
                        _ => {
                            let mut leaf = Leaf::new(LeafTag::Smcw, span);
                            leaf.pieces.push(Piece::Comment(cmt));
                            leaves.push(leaf);
                        }
                    }
                }
                Token::Word(word) => {
                    if self.at_statement_boundary() {
                        break;
                    }
                    if !matches!(self.peek_at(1), Some(Token::Eq)) {
                        return Err(self.err_here());
                    }
                    // N= / NODES= introduces the node list
                    if word.eq_ignore_ascii_case("N") || word.eq_ignore_ascii_case("NODES") {
                        self.pos += 2;
                        in_nodes = true;
                        newline = false;
                        continue;
                    }
                    let attr = self.attr(false)?;
                    match leaves.last_mut() {
                        Some(last) if in_nodes && last.tag == LeafTag::LinNode => {
                            last.pieces.push(attr);
                        }
                        _ => {
                            let mut leaf = Leaf::new(LeafTag::LinAttr, span);
                            leaf.pieces.push(attr);
                            leaves.push(leaf);
                        }
                    }
                    newline = false;
                }
                Token::Int(num) => {
                    let mut leaf = Leaf::new(LeafTag::LinNode, span);
                    leaf.pieces.push(Piece::NodeNum(num));
                    leaves.push(leaf);
                    self.pos += 1;
                    in_nodes = true;
                    newline = false;
                }
                _ => return Err(self.err_here()),
            }
        }
        Ok(())
    }

    /// one bare row of an access/xfer/node file, ended by the line break.
    fn access_row(&mut self, leaves: &mut Vec<Leaf>) -> Result<(), SyntaxError> {
        let Some((_, start)) = self.peek() else {
            return Err(self.err_here());
        };
        let mut leaf = Leaf::new(LeafTag::AccessRow, start);
        loop {
            match self.peek_at(0) {
                None | Some(Token::Newline) => break,
                Some(Token::Int(n)) => {
                    leaf.pieces.push(Piece::Num(n));
                    self.pos += 1;
                }
                Some(Token::Float(fl)) => {
                    leaf.pieces.push(Piece::FloatVal(fl));
                    self.pos += 1;
                }
                Some(Token::Word(w))
                    if w.eq_ignore_ascii_case("wnr") || w.eq_ignore_ascii_case("pnr") =>
                {
                    leaf.pieces.push(Piece::AccessTag(w.to_lowercase()));
                    self.pos += 1;
                }
                Some(Token::Comment(cmt)) => {
                    leaf.pieces.push(Piece::Comment(cmt.trim().to_string()));
                    self.pos += 1;
                    break;
                }
                Some(Token::Comma | Token::Dash) => {
                    self.pos += 1;
                }
                _ => return Err(self.err_here()),
            }
        }
        if let Some((_, span)) = self.tokens.get(self.pos.saturating_sub(1)) {
            leaf.span.end = span.end;
        }
        leaves.push(leaf);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::{parse, LeafTag, Piece};

    #[test]
    fn test_line_statement_leaves() {
        let text = "LINE NAME=\"MUN110I\", MODE=11, HEADWAY[1]=10\n N=1234, -5678, 9012\n";
        let leaves = parse(text).unwrap();
        let tags: Vec<LeafTag> = leaves.iter().map(|l| l.tag).collect();
        assert_eq!(
            tags,
            vec![
                LeafTag::LinAttr,
                LeafTag::LinAttr,
                LeafTag::LinAttr,
                LeafTag::LinNode,
                LeafTag::LinNode,
                LeafTag::LinNode,
            ]
        );
        assert_eq!(leaves[0].attr("NAME"), Some("MUN110I"));
        assert_eq!(leaves[3].pieces, vec![Piece::NodeNum(1234)]);
        assert_eq!(leaves[4].pieces, vec![Piece::NodeNum(-5678)]);
    }

    #[test]
    fn test_node_attributes_attach_to_their_node() {
        let text = "LINE NAME=A, HEADWAY[1]=10, N=100, ACCESS=1, 200\n";
        let leaves = parse(text).unwrap();
        let node = leaves
            .iter()
            .find(|l| l.tag == LeafTag::LinNode && l.pieces.contains(&Piece::NodeNum(100)))
            .unwrap();
        assert_eq!(node.attr("ACCESS"), Some("1"));
    }

    #[test]
    fn test_inline_node_comment_vs_free_comment() {
        let text =
            "LINE NAME=A, HEADWAY[1]=10\n N=100 ; transbay terminal\n; next stop downtown\n 200\n";
        let leaves = parse(text).unwrap();
        let node = &leaves[2];
        assert_eq!(node.tag, LeafTag::LinNode);
        assert!(node
            .pieces
            .contains(&Piece::Comment("; transbay terminal".to_string())));
        assert_eq!(leaves[3].tag, LeafTag::Smcw);
    }

    #[test]
    fn test_link_statement_with_dashed_pair() {
        let leaves = parse("LINK NODES=54648-39249, ONEWAY=T, DIST=0.1\n").unwrap();
        assert_eq!(leaves.len(), 1);
        assert_eq!(leaves[0].tag, LeafTag::Link);
        assert_eq!(leaves[0].node_pair(), Some((54648, 39249)));
        assert_eq!(leaves[0].attr("ONEWAY"), Some("T"));
    }

    #[test]
    fn test_comma_pair_is_not_confused_with_next_attr() {
        let leaves = parse("ZONEACCESS LINK=100,200, MODE=1\n").unwrap();
        assert_eq!(leaves[0].node_pair(), Some((100, 200)));
        assert_eq!(leaves[0].attr("MODE"), Some("1"));
    }

    #[test]
    fn test_access_rows_are_line_oriented() {
        let leaves = parse("1234 5678 0.25\n2345 6789 3 ; xfer\n").unwrap();
        assert_eq!(leaves.len(), 2);
        assert_eq!(
            leaves[0].pieces,
            vec![
                Piece::Num(1234),
                Piece::Num(5678),
                Piece::FloatVal("0.25".to_string()),
            ]
        );
        assert_eq!(
            leaves[1].pieces,
            vec![
                Piece::Num(2345),
                Piece::Num(6789),
                Piece::Num(3),
                Piece::Comment("; xfer".to_string()),
            ]
        );
    }

    #[test]
    fn test_farefromfs_sequence_value() {
        let leaves = parse("FARESYSTEM NUMBER=1, FAREFROMFS=0,1.5,2.0, NAME=\"local\"\n").unwrap();
        assert_eq!(leaves[0].attr("FAREFROMFS"), Some("0,1.5,2.0"));
        assert_eq!(leaves[0].attr("NAME"), Some("local"));
    }

    #[test]
    fn test_factor_node_sequence_value() {
        let leaves = parse("FACTOR MAXWAITTIME=1, NODES=15536-15537\n").unwrap();
        assert_eq!(leaves[0].tag, LeafTag::Factor);
        assert_eq!(leaves[0].attr("MAXWAITTIME"), Some("1"));
        assert_eq!(leaves[0].attr("NODES"), Some("15536-15537"));
    }

    #[test]
    fn test_unconsumable_input_fails_with_offset() {
        let err = parse("LINE NAME=A\nGIBBERISH 42\n").unwrap_err();
        assert_eq!(err.offset, 12);
        assert!(err.context.contains("GIBBERISH"));
    }

    #[test]
    fn test_statement_keyword_vs_attribute_of_same_spelling() {
        // MODE= inside a LINE is an attribute; MODE at statement level
        // opens a PT system record
        let leaves =
            parse("LINE NAME=A, MODE=5, HEADWAY[1]=3\nMODE NUMBER=5, NAME=bus\n").unwrap();
        let tags: Vec<LeafTag> = leaves.iter().map(|l| l.tag).collect();
        assert_eq!(
            tags,
            vec![
                LeafTag::LinAttr,
                LeafTag::LinAttr,
                LeafTag::LinAttr,
                LeafTag::Mode
            ]
        );
    }
}
