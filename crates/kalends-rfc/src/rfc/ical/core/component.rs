//! iCalendar component types (RFC 5545 §3.6).

use super::{Property, PropertyLookup};

/// Kind of calendar item that carries revisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// VEVENT component.
    Event,
    /// VTODO component.
    Todo,
}

/// A calendar item: a component with its properties.
///
/// Only what revision ordering needs is modelled; nested components and
/// serialization live elsewhere.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    /// Component type.
    pub kind: ComponentKind,
    /// Properties in order of appearance.
    pub properties: Vec<Property>,
}

impl Component {
    /// Creates a new component with the given kind.
    #[must_use]
    pub const fn new(kind: ComponentKind) -> Self {
        Self {
            kind,
            properties: Vec::new(),
        }
    }

    /// Creates a VEVENT component.
    #[must_use]
    pub const fn event() -> Self {
        Self::new(ComponentKind::Event)
    }

    /// Creates a VTODO component.
    #[must_use]
    pub const fn todo() -> Self {
        Self::new(ComponentKind::Todo)
    }

    /// Adds a property to this component.
    pub fn add_property(&mut self, prop: Property) {
        self.properties.push(prop);
    }

    /// Builder form of [`Component::add_property`].
    #[must_use]
    pub fn with_property(mut self, prop: Property) -> Self {
        self.add_property(prop);
        self
    }

    /// Returns the first property with the given name.
    #[must_use]
    pub fn get_property(&self, name: &str) -> Option<&Property> {
        self.properties
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }
}

impl PropertyLookup for Component {
    fn property(&self, name: &str) -> Option<&Property> {
        self.get_property(name)
    }
}
