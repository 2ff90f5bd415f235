//! Markup to plain text
//!
//! Parses with html5ever's RcDom and keeps only the text nodes.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::{ContentError, Result};

/// Elements whose text is never rendered
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "template", "noscript"];

/// Strip tags, attributes and comments from `markup`.
///
/// Text runs are whitespace-collapsed and joined with single spaces.
pub fn strip_markup(markup: &str) -> Result<String> {
    let dom = parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut markup.as_bytes())
        .map_err(|e| ContentError::Markup(e.to_string()))?;

    let mut words = Vec::new();
    collect_text(&dom.document, &mut words);
    Ok(words.join(" "))
}

fn collect_text(handle: &Handle, words: &mut Vec<String>) {
    match &handle.data {
        NodeData::Text { contents } => {
            let contents = contents.borrow();
            words.extend(contents.split_whitespace().map(str::to_string));
            return;
        }
        NodeData::Element { name, .. } => {
            if SKIPPED_ELEMENTS.contains(&&*name.local) {
                return;
            }
        }
        NodeData::Document => {}
        NodeData::Doctype { .. }
        | NodeData::Comment { .. }
        | NodeData::ProcessingInstruction { .. } => return,
    }

    for child in handle.children.borrow().iter() {
        collect_text(child, words);
    }
}
