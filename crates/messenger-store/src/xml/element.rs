//! A minimal owned element tree on top of `quick-xml`'s event API.
//!
//! Whitespace-only text is dropped on read when it sits between child
//! elements, and kept as the value of a leaf. The writer re-indents on the
//! way out.

use std::io::{BufRead, Write};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::{Result, StoreError};
use crate::xml::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.set_text(text);
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    /// Concatenated direct text content.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Text(text) => Some(text.as_str()),
                Node::Element(_) => None,
            })
            .collect()
    }

    /// Replace every direct text node with `text`, keeping child elements.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.children.retain(|node| matches!(node, Node::Element(_)));
        let text = text.into();
        if !text.is_empty() {
            self.children.insert(0, Node::Text(text));
        }
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        })
    }

    fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        })
    }

    pub fn children_named<'a, 'n>(
        &'a self,
        name: &'n str,
    ) -> impl Iterator<Item = &'a Element> + 'n
    where
        'a: 'n,
    {
        self.elements().filter(move |el| el.name == name)
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|el| el.name == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.elements_mut().find(|el| el.name == name)
    }

    /// Text of the first child called `name`, if there is one.
    pub fn child_text(&self, name: &str) -> Option<String> {
        self.child(name).map(Element::text)
    }

    /// First child called `name`, appended empty if missing.
    pub fn ensure_child(&mut self, name: &str) -> &mut Element {
        let index = self
            .children
            .iter()
            .position(|node| matches!(node, Node::Element(el) if el.name == name));
        let index = match index {
            Some(index) => index,
            None => {
                self.children.push(Node::Element(Element::new(name)));
                self.children.len() - 1
            }
        };
        match &mut self.children[index] {
            Node::Element(el) => el,
            Node::Text(_) => unreachable!("index points at an element"),
        }
    }

    pub fn remove_children_named(&mut self, name: &str) {
        self.children
            .retain(|node| !matches!(node, Node::Element(el) if el.name == name));
    }

    pub fn clear_children(&mut self) {
        self.children.clear();
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    /// First descendant matching `path`, relative to this element.
    pub fn find(&self, path: &Path) -> Option<&Element> {
        path.steps().iter().try_fold(self, |current, step| {
            current.elements().find(|el| step.matches(el))
        })
    }

    pub fn find_mut(&mut self, path: &Path) -> Option<&mut Element> {
        path.steps().iter().try_fold(self, |current, step| {
            current.elements_mut().find(|el| step.matches(el))
        })
    }

    // ------------------------------------------------------------------
    // Reading
    // ------------------------------------------------------------------

    /// Parse a whole document and return its root element.
    pub fn parse<R: BufRead>(input: R) -> Result<Element> {
        let mut reader = Reader::from_reader(input);
        let mut buf = Vec::new();
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(start) => stack.push(Element::from_start(&start)?),
                Event::Empty(start) => {
                    let el = Element::from_start(&start)?;
                    attach(&mut stack, &mut root, el)?;
                }
                Event::End(_) => {
                    let mut el = stack
                        .pop()
                        .ok_or_else(|| StoreError::Malformed("unbalanced closing tag".into()))?;
                    el.drop_layout_text();
                    attach(&mut stack, &mut root, el)?;
                }
                Event::Text(text) => {
                    let text = text.unescape()?;
                    push_text(&mut stack, &text);
                }
                Event::CData(data) => {
                    let text = String::from_utf8_lossy(&data.into_inner()).into_owned();
                    push_text(&mut stack, &text);
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if !stack.is_empty() {
            return Err(StoreError::Malformed(format!(
                "unclosed element <{}>",
                stack.last().map(|el| el.name.as_str()).unwrap_or_default()
            )));
        }
        root.ok_or_else(|| StoreError::Malformed("document has no root element".into()))
    }

    /// Indentation between child elements is not content.
    fn drop_layout_text(&mut self) {
        if self.elements().next().is_some() {
            self.children.retain(|node| match node {
                Node::Text(text) => !text.trim().is_empty(),
                Node::Element(_) => true,
            });
        }
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Element> {
        let mut el = Element::new(String::from_utf8_lossy(start.name().as_ref()));
        for attr in start.attributes() {
            let attr = attr?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            el.attributes.push((key, value));
        }
        Ok(el)
    }

    // ------------------------------------------------------------------
    // Writing
    // ------------------------------------------------------------------

    /// Write this element as the root of an indented document.
    pub fn write_document<W: Write>(&self, out: W) -> Result<()> {
        let mut writer = Writer::new_with_indent(out, b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        self.write_into(&mut writer)?;
        writer.get_mut().write_all(b"\n")?;
        Ok(())
    }

    fn write_into<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if self.children.is_empty() {
            writer.write_event(Event::Empty(start))?;
            return Ok(());
        }

        writer.write_event(Event::Start(start))?;
        for child in &self.children {
            match child {
                Node::Element(el) => el.write_into(writer)?,
                Node::Text(text) => writer.write_event(Event::Text(BytesText::new(text)))?,
            }
        }
        writer.write_event(Event::End(BytesEnd::new(self.name.as_str())))?;
        Ok(())
    }
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, el: Element) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(Node::Element(el));
        return Ok(());
    }
    if root.is_some() {
        return Err(StoreError::Malformed("more than one root element".into()));
    }
    *root = Some(el);
    Ok(())
}

fn push_text(stack: &mut [Element], text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(parent) = stack.last_mut() {
        match parent.children.last_mut() {
            Some(Node::Text(existing)) => existing.push_str(text),
            _ => parent.children.push(Node::Text(text.to_string())),
        }
    }
}
