//! Minimal element tree the slideshow renders into.
//!
//! It carries just what the controller and the painter need from a DOM:
//! tags, class lists, string attributes, a `display: none` flag and
//! parent/child links. Elements are never removed, so an `ElementId` stays
//! valid for the lifetime of its page.

use std::collections::BTreeMap;

use crate::constants::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

#[derive(Debug, Clone)]
pub struct Element {
    tag: String,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    children: Vec<ElementId>,
    parent: Option<ElementId>,
    hidden: bool,
}

impl Element {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
            parent: None,
            hidden: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Page {
    elements: Vec<Element>,
    root: ElementId,
}

impl Page {
    /// An empty page holding only a `body` root.
    pub fn new() -> Self {
        Self {
            elements: vec![Element::new("body")],
            root: ElementId(0),
        }
    }

    /// The markup a slideshow page ships with: the container holding the
    /// slide wrapper, the dot strip, the loading indicator and both arrows.
    pub fn slideshow_markup() -> Self {
        let mut page = Self::new();
        let root = page.root();

        let container = page.create_element("div");
        page.add_class(container, CONTAINER_CLASS);
        page.append_child(root, container);

        for (tag, class) in [
            ("div", SLIDES_WRAPPER_CLASS),
            ("button", PREV_CLASS),
            ("button", NEXT_CLASS),
            ("div", DOTS_CLASS),
            ("div", LOADING_CLASS),
        ] {
            let el = page.create_element(tag);
            page.add_class(el, class);
            page.append_child(container, el);
        }

        page
    }

    pub fn root(&self) -> ElementId {
        self.root
    }

    pub fn create_element(&mut self, tag: &str) -> ElementId {
        self.elements.push(Element::new(tag));
        ElementId(self.elements.len() - 1)
    }

    /// Re-parents `child` under `parent`, appending it last.
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) {
        if let Some(old) = self.elements[child.0].parent.take() {
            self.elements[old.0].children.retain(|c| *c != child);
        }
        self.elements[child.0].parent = Some(parent);
        self.elements[parent.0].children.push(child);
    }

    pub fn children(&self, id: ElementId) -> &[ElementId] {
        &self.elements[id.0].children
    }

    #[cfg(test)]
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.elements[id.0].parent
    }

    pub fn tag(&self, id: ElementId) -> &str {
        &self.elements[id.0].tag
    }

    /// First element in document order carrying `class`.
    pub fn find_by_class(&self, class: &str) -> Option<ElementId> {
        self.descendants(self.root).find(|id| self.has_class(*id, class))
    }

    pub fn find_all_by_class(&self, class: &str) -> Vec<ElementId> {
        self.descendants(self.root).filter(|id| self.has_class(*id, class)).collect()
    }

    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.elements[id.0].classes.iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, id: ElementId, class: &str) {
        if !self.has_class(id, class) {
            self.elements[id.0].classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, id: ElementId, class: &str) {
        self.elements[id.0].classes.retain(|c| c != class);
    }

    pub fn set_attribute(&mut self, id: ElementId, name: &str, value: impl Into<String>) {
        self.elements[id.0].attributes.insert(name.to_string(), value.into());
    }

    pub fn attribute(&self, id: ElementId, name: &str) -> Option<&str> {
        self.elements[id.0].attributes.get(name).map(String::as_str)
    }

    pub fn set_hidden(&mut self, id: ElementId, hidden: bool) {
        self.elements[id.0].hidden = hidden;
    }

    pub fn is_hidden(&self, id: ElementId) -> bool {
        self.elements[id.0].hidden
    }

    /// Pre-order walk starting at (and including) `from`.
    fn descendants(&self, from: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        let mut stack = vec![from];
        std::iter::from_fn(move || {
            let id = stack.pop()?;
            stack.extend(self.elements[id.0].children.iter().rev());
            Some(id)
        })
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}
