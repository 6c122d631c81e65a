use cubenet_core::error::ModelError;

/// the grammar could not consume the entire input. Fatal for the parse;
/// carries the byte offset of the first unconsumable token and a bounded
/// window of the surrounding text.
#[derive(thiserror::Error, Debug)]
#[error("syntax error at byte {offset}, near: {context}")]
pub struct SyntaxError {
    pub offset: usize,
    pub context: String,
}

/// umbrella for the file-reading path: IO, grammar, or record conversion.
#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error("failure reading line file: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("cannot derive a file kind from '{path}'; expected a .lin/.link/.pnr/.zac/.access/.xfer/.node/.pts suffix")]
    UnknownFileKind { path: String },
}
