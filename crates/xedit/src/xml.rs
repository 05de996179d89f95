//! Lossless XML module

pub mod escape;
pub mod fragment;
pub mod parser;
pub mod printer;
pub mod tree;

pub use fragment::build_fragment;
pub use parser::{parse, parse_with_config, Config, Parser, MAX_DEPTH};
pub use printer::print;
pub use tree::{
    Attribute, CData, Closing, Comment, Content, Doctype, Document, ProcessingInstruction, Quote,
    Tag, Text,
};
