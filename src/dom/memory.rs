//! In-memory document used by unit tests.
//!
//! Nodes live in an arena in creation order, which doubles as document
//! order. The selector matcher understands what the page actually uses:
//! `tag`, `#id`, `.class`, `[attr]`, `[attr="v"]`, compounds of those,
//! descendant combinators and comma lists.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use super::Dom;

/// Handle to a node in a [`MemoryDom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Node(usize);

#[derive(Debug, Default)]
struct NodeData {
    tag: String,
    attrs: BTreeMap<String, String>,
    text: String,
    parent: Option<usize>,
}

#[derive(Debug, Default)]
struct Arena {
    nodes: Vec<NodeData>,
    focused: Option<usize>,
    scroll_locked: bool,
    scroll_offset: f64,
    scrolled_to_top: usize,
}

#[derive(Debug, Clone)]
pub struct MemoryDom {
    arena: Rc<RefCell<Arena>>,
    html: Node,
    body: Node,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    #[must_use]
    pub fn new() -> Self {
        let arena = Rc::new(RefCell::new(Arena::default()));
        let mut dom = Self { arena, html: Node(0), body: Node(0) };
        dom.html = dom.push(None, "html", &[]);
        dom.body = dom.push(Some(dom.html), "body", &[]);
        dom
    }

    pub fn body(&self) -> Node {
        self.body
    }

    /// Append an element under `parent` with the given attributes.
    pub fn append(&self, parent: Node, tag: &str, attrs: &[(&str, &str)]) -> Node {
        self.push(Some(parent), tag, attrs)
    }

    fn push(&self, parent: Option<Node>, tag: &str, attrs: &[(&str, &str)]) -> Node {
        let mut arena = self.arena.borrow_mut();
        arena.nodes.push(NodeData {
            tag: tag.to_ascii_uppercase(),
            attrs: attrs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect(),
            text: String::new(),
            parent: parent.map(|p| p.0),
        });
        Node(arena.nodes.len() - 1)
    }

    pub fn focused(&self) -> Option<Node> {
        self.arena.borrow().focused.map(Node)
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.arena.borrow().scroll_locked
    }

    pub fn set_scroll_offset(&self, offset: f64) {
        self.arena.borrow_mut().scroll_offset = offset;
    }

    pub fn scrolled_to_top_count(&self) -> usize {
        self.arena.borrow().scrolled_to_top
    }

    fn parent(&self, idx: usize) -> Option<usize> {
        self.arena.borrow().nodes[idx].parent
    }

    fn is_descendant(&self, outer: usize, inner: usize) -> bool {
        let mut cursor = Some(inner);
        while let Some(idx) = cursor {
            if idx == outer {
                return true;
            }
            cursor = self.parent(idx);
        }
        false
    }

    fn matches(&self, idx: usize, selector: &str) -> bool {
        selector.split(',').map(str::trim).filter(|s| !s.is_empty()).any(|sel| {
            let parts: Vec<Compound> = sel.split_whitespace().map(Compound::parse).collect();
            self.matches_chain(idx, &parts)
        })
    }

    fn matches_chain(&self, idx: usize, parts: &[Compound]) -> bool {
        let Some((last, rest)) = parts.split_last() else {
            return false;
        };
        if !self.matches_compound(idx, last) {
            return false;
        }
        let mut remaining = rest;
        let mut cursor = self.parent(idx);
        while let Some((want, before)) = remaining.split_last() {
            let Some(ancestor) = cursor else {
                return false;
            };
            if self.matches_compound(ancestor, want) {
                remaining = before;
            }
            cursor = self.parent(ancestor);
        }
        true
    }

    fn matches_compound(&self, idx: usize, compound: &Compound) -> bool {
        let arena = self.arena.borrow();
        let node = &arena.nodes[idx];
        if let Some(tag) = &compound.tag {
            if !node.tag.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &compound.id {
            if node.attrs.get("id") != Some(id) {
                return false;
            }
        }
        let classes = node.attrs.get("class").map(String::as_str).unwrap_or_default();
        if !compound.classes.iter().all(|c| classes.split_whitespace().any(|have| have == c)) {
            return false;
        }
        compound.attrs.iter().all(|(name, value)| match (node.attrs.get(name), value) {
            (Some(_), None) => true,
            (Some(have), Some(want)) => have == want,
            (None, _) => false,
        })
    }
}

/// One compound selector such as `img[loading="lazy"]` or `a.nav#home`.
#[derive(Debug, Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, Option<String>)>,
}

impl Compound {
    fn parse(raw: &str) -> Self {
        let mut out = Self::default();
        let mut rest = raw;

        let tag_end = rest.find(['#', '.', '[']).unwrap_or(rest.len());
        if tag_end > 0 {
            out.tag = Some(rest[..tag_end].to_owned());
        }
        rest = &rest[tag_end..];

        while let Some(first) = rest.chars().next() {
            match first {
                '[' => {
                    let close = rest.find(']').unwrap_or(rest.len());
                    let body = &rest[1..close];
                    match body.split_once('=') {
                        Some((name, value)) => {
                            let value = value.trim_matches(['"', '\'']);
                            out.attrs.push((name.to_owned(), Some(value.to_owned())));
                        }
                        None => out.attrs.push((body.to_owned(), None)),
                    }
                    rest = rest.get(close + 1..).unwrap_or_default();
                }
                '#' | '.' => {
                    let body = &rest[1..];
                    let end = body.find(['#', '.', '[']).unwrap_or(body.len());
                    let name = body[..end].to_owned();
                    if first == '#' {
                        out.id = Some(name);
                    } else {
                        out.classes.push(name);
                    }
                    rest = &body[end..];
                }
                _ => break,
            }
        }
        out
    }
}

impl Dom for MemoryDom {
    type Element = Node;

    fn element_by_id(&self, id: &str) -> Option<Node> {
        let arena = self.arena.borrow();
        arena
            .nodes
            .iter()
            .position(|n| n.attrs.get("id").is_some_and(|v| v == id))
            .map(Node)
    }

    fn query(&self, selector: &str) -> Option<Node> {
        self.query_all(selector).into_iter().next()
    }

    fn query_all(&self, selector: &str) -> Vec<Node> {
        let len = self.arena.borrow().nodes.len();
        (0..len).filter(|&idx| self.matches(idx, selector)).map(Node).collect()
    }

    fn query_within(&self, scope: &Node, selector: &str) -> Option<Node> {
        let len = self.arena.borrow().nodes.len();
        (0..len)
            .filter(|&idx| idx != scope.0 && self.is_descendant(scope.0, idx))
            .find(|&idx| self.matches(idx, selector))
            .map(Node)
    }

    fn closest(&self, el: &Node, selector: &str) -> Option<Node> {
        let mut cursor = Some(el.0);
        while let Some(idx) = cursor {
            if self.matches(idx, selector) {
                return Some(Node(idx));
            }
            cursor = self.parent(idx);
        }
        None
    }

    fn contains(&self, outer: &Node, inner: &Node) -> bool {
        self.is_descendant(outer.0, inner.0)
    }

    fn is_same(&self, a: &Node, b: &Node) -> bool {
        a == b
    }

    fn tag_name(&self, el: &Node) -> String {
        self.arena.borrow().nodes[el.0].tag.clone()
    }

    fn id_of(&self, el: &Node) -> String {
        self.attribute(el, "id").unwrap_or_default()
    }

    fn next_sibling(&self, el: &Node) -> Option<Node> {
        let arena = self.arena.borrow();
        let parent = arena.nodes[el.0].parent;
        arena
            .nodes
            .iter()
            .enumerate()
            .skip(el.0 + 1)
            .find(|(_, n)| n.parent == parent)
            .map(|(idx, _)| Node(idx))
    }

    fn root(&self) -> Option<Node> {
        Some(self.html)
    }

    fn attribute(&self, el: &Node, name: &str) -> Option<String> {
        self.arena.borrow().nodes[el.0].attrs.get(name).cloned()
    }

    fn set_attribute(&self, el: &Node, name: &str, value: &str) {
        self.arena.borrow_mut().nodes[el.0]
            .attrs
            .insert(name.to_owned(), value.to_owned());
    }

    fn remove_attribute(&self, el: &Node, name: &str) {
        self.arena.borrow_mut().nodes[el.0].attrs.remove(name);
    }

    fn has_class(&self, el: &Node, class: &str) -> bool {
        self.attribute(el, "class")
            .is_some_and(|list| list.split_whitespace().any(|c| c == class))
    }

    fn set_class(&self, el: &Node, class: &str, on: bool) {
        let current = self.attribute(el, "class").unwrap_or_default();
        let mut classes: Vec<&str> = current.split_whitespace().filter(|c| *c != class).collect();
        if on {
            classes.push(class);
        }
        self.set_attribute(el, "class", &classes.join(" "));
    }

    fn text(&self, el: &Node) -> String {
        self.arena.borrow().nodes[el.0].text.clone()
    }

    fn set_text(&self, el: &Node, text: &str) {
        self.arena.borrow_mut().nodes[el.0].text = text.to_owned();
    }

    fn focus(&self, el: &Node) {
        self.arena.borrow_mut().focused = Some(el.0);
    }

    fn set_scroll_locked(&self, locked: bool) {
        self.arena.borrow_mut().scroll_locked = locked;
    }

    fn scroll_offset(&self) -> f64 {
        self.arena.borrow().scroll_offset
    }

    fn scroll_to_top(&self) {
        let mut arena = self.arena.borrow_mut();
        arena.scroll_offset = 0.0;
        arena.scrolled_to_top += 1;
    }
}
