//! Printer: writes a tree back to text
//!
//! Nodes are rendered from the literal pieces the parser recorded, so an
//! unmodified tree prints exactly the bytes it was parsed from. No
//! reindentation or reordering happens here.

use std::fmt;

use crate::xml::tree::{Attribute, Closing, Content, Document, Tag};

/// Render a document to text
pub fn print(doc: &Document) -> String {
    let mut output = String::new();
    if doc.bom {
        output.push('\u{FEFF}');
    }
    for content in &doc.content {
        write_content(content, &mut output);
    }
    output.push_str(&doc.eof);
    output
}

/// Render a single tag, prefix included
pub fn print_tag(tag: &Tag) -> String {
    let mut output = String::new();
    write_tag(tag, &mut output);
    output
}

fn write_content(content: &Content, output: &mut String) {
    match content {
        Content::Tag(tag) => write_tag(tag, output),
        Content::Text(text) => {
            output.push_str(&text.prefix);
            output.push_str(&text.text);
        }
        Content::Comment(comment) => {
            output.push_str(&comment.prefix);
            output.push_str("<!--");
            output.push_str(&comment.text);
            output.push_str("-->");
        }
        Content::CData(cdata) => {
            output.push_str(&cdata.prefix);
            output.push_str("<![CDATA[");
            output.push_str(&cdata.text);
            output.push_str("]]>");
        }
        Content::ProcessingInstruction(pi) => {
            output.push_str(&pi.prefix);
            output.push_str("<?");
            output.push_str(&pi.body);
            output.push_str("?>");
        }
        Content::Doctype(doctype) => {
            output.push_str(&doctype.prefix);
            output.push_str("<!DOCTYPE");
            output.push_str(&doctype.body);
            output.push('>');
        }
    }
}

fn write_tag(tag: &Tag, output: &mut String) {
    output.push_str(&tag.prefix);
    output.push('<');
    output.push_str(&tag.name);

    for (name, attribute) in &tag.attributes {
        write_attribute(name, attribute, output);
    }
    output.push_str(&tag.before_end);

    match &tag.closing {
        Closing::SelfClosing => output.push_str("/>"),
        Closing::Paired { prefix, before_end } => {
            output.push('>');
            for child in &tag.content {
                write_content(child, output);
            }
            output.push_str(prefix);
            output.push_str("</");
            output.push_str(&tag.name);
            output.push_str(before_end);
            output.push('>');
        }
    }
}

fn write_attribute(name: &str, attribute: &Attribute, output: &mut String) {
    let quote = attribute.quote.as_char();
    output.push_str(&attribute.prefix);
    output.push_str(name);
    output.push_str(&attribute.before_eq);
    output.push('=');
    output.push_str(&attribute.after_eq);
    output.push(quote);
    output.push_str(&attribute.raw);
    output.push(quote);
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&print(self))
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&print_tag(self))
    }
}
