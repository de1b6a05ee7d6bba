//! Read-only element tree built from `quick-xml` events.
//!
//! Nodes live in one arena in document order, so the descendants of a node are
//! the contiguous run of nodes after it. The tree borrows the source text and
//! hands out inner markup as exact slices of it.

use std::ops::Range;

use ccda_core::CcdaError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Parsed XML document.
pub struct Document<'a> {
    source: &'a str,
    nodes: Vec<Node>,
    root: usize,
}

struct Node {
    kind: NodeKind,
    parent: Option<usize>,
    children: Vec<usize>,
    depth: usize,
    /// One past the index of the last descendant.
    subtree_end: usize,
}

enum NodeKind {
    Element(ElementData),
    Text(String),
}

struct ElementData {
    name: String,
    local_start: usize,
    attributes: Vec<(String, String)>,
    inner: Range<usize>,
}

impl<'a> Document<'a> {
    /// Parse `source`; any well-formedness problem fails the whole call.
    pub fn parse(source: &'a str) -> Result<Self, CcdaError> {
        let mut reader = Reader::from_str(source);
        let mut nodes: Vec<Node> = Vec::new();
        let mut open: Vec<usize> = Vec::new();
        let mut root = None;

        loop {
            let event = reader.read_event().map_err(|err| {
                CcdaError::Parse(format!("{err} (byte {})", reader.buffer_position()))
            })?;
            let position = reader.buffer_position() as usize;

            match event {
                Event::Start(start) => {
                    if open.is_empty() && root.is_some() {
                        return Err(second_root(&start));
                    }
                    let id = push_element(&mut nodes, open.last().copied(), &start, position)?;
                    if open.is_empty() {
                        root = Some(id);
                    }
                    open.push(id);
                }
                Event::Empty(start) => {
                    if open.is_empty() && root.is_some() {
                        return Err(second_root(&start));
                    }
                    let id = push_element(&mut nodes, open.last().copied(), &start, position)?;
                    if open.is_empty() {
                        root = Some(id);
                    }
                }
                Event::End(_) => {
                    let id = open
                        .pop()
                        .ok_or_else(|| CcdaError::Parse("unexpected closing tag".to_string()))?;
                    let inner_end = source[..position].rfind("</").unwrap_or(position);
                    let subtree_end = nodes.len();
                    let node = &mut nodes[id];
                    node.subtree_end = subtree_end;
                    if let NodeKind::Element(data) = &mut node.kind {
                        data.inner.end = inner_end.max(data.inner.start);
                    }
                }
                Event::Text(text) => {
                    let value = text
                        .unescape()
                        .map_err(|err| CcdaError::Parse(err.to_string()))?
                        .into_owned();
                    match open.last() {
                        Some(&parent) => push_text(&mut nodes, parent, value),
                        None => ensure_blank(&value)?,
                    }
                }
                Event::CData(data) => {
                    let Some(&parent) = open.last() else {
                        return Err(CcdaError::Parse(
                            "CDATA outside the root element".to_string(),
                        ));
                    };
                    let value = String::from_utf8_lossy(&data.into_inner()).into_owned();
                    push_text(&mut nodes, parent, value);
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(&unclosed) = open.last() {
            let name = match &nodes[unclosed].kind {
                NodeKind::Element(data) => data.name.clone(),
                NodeKind::Text(_) => String::new(),
            };
            return Err(CcdaError::Parse(format!(
                "element <{name}> is not closed before end of input"
            )));
        }

        let root = root.ok_or_else(|| CcdaError::Parse("document has no root element".to_string()))?;
        Ok(Self {
            source,
            nodes,
            root,
        })
    }

    pub fn root(&self) -> Element<'_> {
        Element {
            doc: self,
            index: self.root,
        }
    }

    /// Every element in document order, the root included.
    pub fn elements(&self) -> impl Iterator<Item = Element<'_>> + '_ {
        (0..self.nodes.len())
            .filter(|&index| matches!(self.nodes[index].kind, NodeKind::Element(_)))
            .map(|index| Element { doc: self, index })
    }
}

fn second_root(start: &BytesStart<'_>) -> CcdaError {
    CcdaError::Parse(format!(
        "element <{}> follows the root element",
        String::from_utf8_lossy(start.name().as_ref())
    ))
}

/// Only whitespace may appear outside the root element.
fn ensure_blank(text: &str) -> Result<(), CcdaError> {
    if text.trim().is_empty() {
        Ok(())
    } else {
        Err(CcdaError::Parse(format!(
            "text outside the root element: {:?}",
            text.trim()
        )))
    }
}

fn push_element(
    nodes: &mut Vec<Node>,
    parent: Option<usize>,
    start: &BytesStart<'_>,
    position: usize,
) -> Result<usize, CcdaError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let local_start = name.rfind(':').map_or(0, |colon| colon + 1);

    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|err| CcdaError::Parse(err.to_string()))?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute
            .unescape_value()
            .map_err(|err| CcdaError::Parse(err.to_string()))?
            .into_owned();
        attributes.push((key, value));
    }

    let id = nodes.len();
    let depth = parent.map_or(0, |p| nodes[p].depth + 1);
    nodes.push(Node {
        kind: NodeKind::Element(ElementData {
            name,
            local_start,
            attributes,
            inner: position..position,
        }),
        parent,
        children: Vec::new(),
        depth,
        subtree_end: id + 1,
    });
    if let Some(parent) = parent {
        nodes[parent].children.push(id);
    }
    Ok(id)
}

fn push_text(nodes: &mut Vec<Node>, parent: usize, value: String) {
    let id = nodes.len();
    nodes.push(Node {
        kind: NodeKind::Text(value),
        parent: Some(parent),
        children: Vec::new(),
        depth: nodes[parent].depth + 1,
        subtree_end: id + 1,
    });
    nodes[parent].children.push(id);
}

/// Handle to an element inside a [`Document`].
#[derive(Clone, Copy)]
pub struct Element<'d> {
    doc: &'d Document<'d>,
    index: usize,
}

impl PartialEq for Element<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.index == other.index
    }
}

impl Eq for Element<'_> {}

impl std::fmt::Debug for Element<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Element")
            .field("name", &self.qualified_name())
            .field("index", &self.index)
            .finish()
    }
}

impl<'d> Element<'d> {
    fn node(&self) -> &'d Node {
        &self.doc.nodes[self.index]
    }

    fn data(&self) -> &'d ElementData {
        match &self.node().kind {
            NodeKind::Element(data) => data,
            NodeKind::Text(_) => unreachable!("element handles only point at elements"),
        }
    }

    fn wrap(&self, index: usize) -> Option<Element<'d>> {
        match self.doc.nodes[index].kind {
            NodeKind::Element(_) => Some(Element {
                doc: self.doc,
                index,
            }),
            NodeKind::Text(_) => None,
        }
    }

    /// Tag name without namespace prefix.
    pub fn name(&self) -> &'d str {
        let data = self.data();
        &data.name[data.local_start..]
    }

    pub fn qualified_name(&self) -> &'d str {
        &self.data().name
    }

    pub fn is(&self, name: &str) -> bool {
        self.name() == name
    }

    /// Attribute value; `name` matches either the full key or its local part.
    pub fn attr(&self, name: &str) -> Option<&'d str> {
        self.data()
            .attributes
            .iter()
            .find(|(key, _)| key == name || key.rsplit(':').next() == Some(name))
            .map(|(_, value)| value.as_str())
    }

    /// Trimmed attribute value, empty when absent.
    pub fn attr_or_empty(&self, name: &str) -> String {
        self.attr(name).map(str::trim).unwrap_or_default().to_string()
    }

    pub fn children(&self) -> impl Iterator<Item = Element<'d>> + 'd {
        let this = *self;
        self.node()
            .children
            .iter()
            .filter_map(move |&index| this.wrap(index))
    }

    pub fn children_named<'n>(&self, name: &'n str) -> impl Iterator<Item = Element<'d>> + 'n
    where
        'd: 'n,
    {
        self.children().filter(move |child| child.is(name))
    }

    /// First direct child with the given tag name.
    pub fn child(&self, name: &str) -> Option<Element<'d>> {
        self.children().find(|child| child.is(name))
    }

    /// Element descendants in document order, excluding `self`.
    pub fn descendants(&self) -> impl Iterator<Item = Element<'d>> + 'd {
        let this = *self;
        (self.index + 1..self.node().subtree_end).filter_map(move |index| this.wrap(index))
    }

    /// First descendant with the given tag name.
    pub fn find(&self, name: &str) -> Option<Element<'d>> {
        self.descendants().find(|element| element.is(name))
    }

    pub fn find_all<'n>(&self, name: &'n str) -> impl Iterator<Item = Element<'d>> + 'n
    where
        'd: 'n,
    {
        self.descendants().filter(move |element| element.is(name))
    }

    pub fn parent(&self) -> Option<Element<'d>> {
        self.node().parent.and_then(|index| self.wrap(index))
    }

    /// Number of ancestors; the root element has depth 0.
    pub fn depth(&self) -> usize {
        self.node().depth
    }

    /// Concatenated text of every descendant text node.
    pub fn text(&self) -> String {
        (self.index + 1..self.node().subtree_end)
            .filter_map(|index| match &self.doc.nodes[index].kind {
                NodeKind::Text(text) => Some(text.as_str()),
                NodeKind::Element(_) => None,
            })
            .collect()
    }

    pub fn trimmed_text(&self) -> String {
        self.text().trim().to_string()
    }

    /// Source markup between the start and end tags, unmodified.
    pub fn inner_xml(&self) -> &'d str {
        let inner = &self.data().inner;
        &self.doc.source[inner.clone()]
    }

    /// Descendant carrying `ID="<id>"`, the anchor form used by narrative blocks.
    pub fn find_by_id(&self, id: &str) -> Option<Element<'d>> {
        self.descendants()
            .find(|element| element.attr("ID").or_else(|| element.attr("id")) == Some(id))
    }
}
