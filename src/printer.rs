//! Renders trees back to source text.
//!
//! Symbols print as their text and quotations as `[` contents `]`, with a
//! single space between neighbouring items. The brackets sit directly against
//! their contents (`[a [b c]]`), which the lexer splits apart again, so
//! printing is the left inverse of parsing.

use crate::types::Tree;

pub fn print(trees: &[Tree]) -> String {
    let mut out = String::new();
    write_sequence(&mut out, trees);
    out
}

fn write_sequence(out: &mut String, trees: &[Tree]) {
    let mut first = true;
    for tree in trees {
        if !first {
            out.push(' ');
        }
        write_tree(out, tree);
        first = false;
    }
}

fn write_tree(out: &mut String, tree: &Tree) {
    match tree {
        Tree::Symbol(s) => out.push_str(s),
        Tree::Quotation(items) => {
            out.push('[');
            write_sequence(out, items);
            out.push(']');
        }
    }
}
