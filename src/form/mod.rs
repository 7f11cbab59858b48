use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The UI-layer side of field binding. Elements are addressed by id;
/// both setters return `false` when no such element exists.
pub trait Form {
    fn set_value(&mut self, id: &str, value: &str) -> bool;
    fn set_checked(&mut self, id: &str, checked: bool) -> bool;
}

/// A single input element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Element {
    pub value: String,
    pub checked: bool,
}

/// In-memory form: the element tree of a page, keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    elements: BTreeMap<String, Element>,
}

impl Document {
    pub fn new() -> Self { Self::default() }

    /// Empty elements for each id.
    pub fn with_fields<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let elements = ids
            .into_iter()
            .map(|id| (id.into(), Element::default()))
            .collect();
        Self { elements }
    }

    /// A page carrying every element the default table targets.
    pub fn for_defaults() -> Self {
        Self::with_fields(crate::fields::default_ids())
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn insert(&mut self, id: impl Into<String>, element: Element) {
        self.elements.insert(id.into(), element);
    }

    pub fn remove(&mut self, id: &str) -> Option<Element> {
        self.elements.remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn value(&self, id: &str) -> Option<&str> {
        self.get(id).map(|e| e.value.as_str())
    }

    pub fn is_checked(&self, id: &str) -> Option<bool> {
        self.get(id).map(|e| e.checked)
    }

    pub fn len(&self) -> usize { self.elements.len() }

    pub fn is_empty(&self) -> bool { self.elements.is_empty() }
}

impl Form for Document {
    fn set_value(&mut self, id: &str, value: &str) -> bool {
        match self.elements.get_mut(id) {
            Some(el) => {
                el.value = value.to_string();
                true
            }
            None => false,
        }
    }

    fn set_checked(&mut self, id: &str, checked: bool) -> bool {
        match self.elements.get_mut(id) {
            Some(el) => {
                el.checked = checked;
                true
            }
            None => false,
        }
    }
}
