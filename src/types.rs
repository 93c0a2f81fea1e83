use crate::printer;
use std::collections::VecDeque;
use std::fmt;

/// The only value type: a symbol or a quotation of further trees.
/// Trees serve as both code (program tokens) and data (stack values).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Tree {
    Symbol(String),       // e.g. cons, foo, 2.71
    Quotation(Vec<Tree>), // e.g. [a [b c]]
}

impl Tree {
    pub fn symbol(text: impl Into<String>) -> Self {
        Tree::Symbol(text.into())
    }

    pub fn quotation(items: Vec<Tree>) -> Self {
        Tree::Quotation(items)
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Tree::Symbol(s) => Some(s),
            Tree::Quotation(_) => None,
        }
    }

    /// True when this tree is the symbol `word`.
    pub fn is_word(&self, word: &str) -> bool {
        self.as_symbol() == Some(word)
    }

    /// Quotation nesting depth: 0 for a symbol, 1 for `[a b]`, 2 for `[[a]]`.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = vec![(self, 0)];
        while let Some((tree, level)) = pending.pop() {
            if let Tree::Quotation(items) = tree {
                deepest = deepest.max(level + 1);
                pending.extend(items.iter().map(|item| (item, level + 1)));
            }
        }
        deepest
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&printer::print(std::slice::from_ref(self)))
    }
}

/// The data stack. Stored bottom-first so pushes and pops happen at the end;
/// `iter` walks it top-first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stack {
    items: Vec<Tree>,
}

impl Stack {
    pub fn new() -> Self {
        Stack { items: Vec::new() }
    }

    pub fn push(&mut self, tree: Tree) {
        self.items.push(tree);
    }

    pub fn pop(&mut self) -> Option<Tree> {
        self.items.pop()
    }

    /// The value `depth` places below the top (0 is the top).
    pub fn peek(&self, depth: usize) -> Option<&Tree> {
        self.items.iter().rev().nth(depth)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Top-first iteration.
    pub fn iter(&self) -> impl Iterator<Item = &Tree> {
        self.items.iter().rev()
    }

    /// Push order: bottom first, top last.
    pub fn as_slice(&self) -> &[Tree] {
        &self.items
    }

    /// Removes the top `N` values, returned in push order (top last).
    /// Leaves the stack untouched when it holds fewer than `N`.
    pub fn take_top<const N: usize>(&mut self) -> Option<[Tree; N]> {
        let len = self.items.len();
        if len < N {
            return None;
        }
        match <[Tree; N]>::try_from(self.items.split_off(len - N)) {
            Ok(top) => Some(top),
            Err(top) => {
                self.items.extend(top);
                None
            }
        }
    }
}

impl Extend<Tree> for Stack {
    fn extend<I: IntoIterator<Item = Tree>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

/// Builds a stack from values in push order (the last one ends up on top).
impl FromIterator<Tree> for Stack {
    fn from_iter<I: IntoIterator<Item = Tree>>(iter: I) -> Self {
        Stack {
            items: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&printer::print(&self.items))
    }
}

/// Code not yet executed, consumed from the front.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    items: VecDeque<Tree>,
}

impl Program {
    pub fn new() -> Self {
        Program {
            items: VecDeque::new(),
        }
    }

    pub fn peek(&self, offset: usize) -> Option<&Tree> {
        self.items.get(offset)
    }

    pub fn pop_front(&mut self) -> Option<Tree> {
        self.items.pop_front()
    }

    /// Splices `trees` onto the front, keeping their order.
    pub fn prepend(&mut self, trees: Vec<Tree>) {
        for tree in trees.into_iter().rev() {
            self.items.push_front(tree);
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tree> {
        self.items.iter()
    }
}

impl From<Vec<Tree>> for Program {
    fn from(trees: Vec<Tree>) -> Self {
        Program {
            items: trees.into(),
        }
    }
}

impl FromIterator<Tree> for Program {
    fn from_iter<I: IntoIterator<Item = Tree>>(iter: I) -> Self {
        Program {
            items: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let trees: Vec<Tree> = self.items.iter().cloned().collect();
        f.write_str(&printer::print(&trees))
    }
}
