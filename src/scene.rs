//! Retained model of the page the stage renders into.
//!
//! Elements are addressed by their stable id and carry text, attributes and
//! the handful of style properties the animations touch. Every mutation marks
//! the element dirty so hosts can sync only what changed.

use std::collections::BTreeMap;

use bitflags::bitflags;

use crate::transform::Transform;

/// Ids of the elements the stage reads and writes.
pub mod ids {
    pub const TEMP_RANGE: &str = "tempRange";
    pub const TEMP_VALUE: &str = "tempValue";
    pub const STATE_TITLE: &str = "stateTitle";
    pub const STATE_DESC: &str = "stateDesc";
    pub const STATE_CARD: &str = "stateCard";
    pub const SIM_STAGE: &str = "simStage";
    pub const DISC_SIM: &str = "discSim";
    pub const DISC_CIRCLE: &str = "discCircle";
    pub const DISC_SHADOW: &str = "discShadow";
    pub const LEVITATION_CARD: &str = "levitationCard";
    pub const PLAY_AUDIO: &str = "playAudio";
    pub const AMBIENT_AUDIO: &str = "ambientAudio";
}

bitflags! {
    /// Which parts of an element changed since the last sync
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Dirty: u8 {
        const TEXT       = 0b0000_0001;
        const TRANSFORM  = 0b0000_0010;
        /// `rx`, `ry` or `r` attributes
        const GEOMETRY   = 0b0000_0100;
        const OPACITY    = 0b0000_1000;
        const DISPLAY    = 0b0001_0000;
        const TRANSITION = 0b0010_0000;
        /// Any other attribute
        const ATTRIBUTE  = 0b0100_0000;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tag {
    Div,
    Span,
    Button,
    Input,
    Audio,
    /// SVG `<g>`
    Group,
    Circle,
    Ellipse,
}

fn is_geometry_attr(name: &str) -> bool {
    matches!(name, "rx" | "ry" | "r")
}

#[derive(Clone, Debug)]
pub struct Element {
    id: String,
    tag: Tag,
    text: String,
    attrs: BTreeMap<String, String>,
    transform: Transform,
    opacity: f64,
    transition: Option<String>,
    visible: bool,
    placeholder: bool,
    dirty: Dirty,
}

impl Element {
    pub fn new(id: impl Into<String>, tag: Tag) -> Self {
        Self {
            id: id.into(),
            tag,
            text: String::new(),
            attrs: BTreeMap::new(),
            transform: Transform::IDENTITY,
            opacity: 1.0,
            transition: None,
            visible: true,
            placeholder: false,
            dirty: Dirty::empty(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_attr(mut self, name: &str, value: impl ToString) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Whether the element was synthesized because the page lacked it
    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if self.text != text {
            self.text = text;
            self.dirty |= Dirty::TEXT;
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Numeric attribute value, `None` when absent or unparsable
    pub fn attr_f64(&self, name: &str) -> Option<f64> {
        self.attr(name)?.trim().parse().ok()
    }

    pub fn set_attr(&mut self, name: &str, value: impl ToString) {
        let value = value.to_string();
        if self.attrs.get(name) == Some(&value) {
            return;
        }
        self.attrs.insert(name.to_string(), value);
        self.dirty |= if is_geometry_attr(name) {
            Dirty::GEOMETRY
        } else {
            Dirty::ATTRIBUTE
        };
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn set_transform(&mut self, transform: Transform) {
        if self.transform != transform {
            self.transform = transform;
            self.dirty |= Dirty::TRANSFORM;
        }
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    pub fn set_opacity(&mut self, opacity: f64) {
        if self.opacity != opacity {
            self.opacity = opacity;
            self.dirty |= Dirty::OPACITY;
        }
    }

    /// CSS `transition` shorthand currently applied, if any
    pub fn transition(&self) -> Option<&str> {
        self.transition.as_deref()
    }

    pub fn set_transition(&mut self, transition: Option<String>) {
        if self.transition != transition {
            self.transition = transition;
            self.dirty |= Dirty::TRANSITION;
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        if self.visible != visible {
            self.visible = visible;
            self.dirty |= Dirty::DISPLAY;
        }
    }

    pub fn dirty(&self) -> Dirty {
        self.dirty
    }

    pub fn take_dirty(&mut self) -> Dirty {
        std::mem::replace(&mut self.dirty, Dirty::empty())
    }
}

/// The set of elements on the page, keyed by id.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    elements: BTreeMap<String, Element>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// The levitation page as it ships: slider, readouts, state card and the
    /// SVG disc stage. Audio controls and the levitation card are created on
    /// demand.
    pub fn page() -> Self {
        let mut scene = Self::new();
        scene.insert(
            Element::new(ids::TEMP_RANGE, Tag::Input)
                .with_attr("type", "range")
                .with_attr("min", -200)
                .with_attr("max", 25)
                .with_attr("step", 0.1)
                .with_attr("value", 25),
        );
        scene.insert(Element::new(ids::TEMP_VALUE, Tag::Span).with_text("25.0 °C"));
        scene.insert(Element::new(ids::STATE_TITLE, Tag::Div));
        scene.insert(Element::new(ids::STATE_DESC, Tag::Div));
        scene.insert(Element::new(ids::STATE_CARD, Tag::Div));
        scene.insert(Element::new(ids::SIM_STAGE, Tag::Div).with_opacity(0.0));
        scene.insert(
            Element::new(ids::DISC_SIM, Tag::Group)
                .with_transform(Transform::translate(210.0, 160.0)),
        );
        scene.insert(Element::new(ids::DISC_CIRCLE, Tag::Circle).with_attr("r", 40));
        scene.insert(
            Element::new(ids::DISC_SHADOW, Tag::Ellipse)
                .with_attr("rx", 50)
                .with_attr("ry", 12)
                .with_opacity(0.35),
        );
        scene
    }

    /// Insert an element, replacing and returning any element with the same id
    pub fn insert(&mut self, element: Element) -> Option<Element> {
        self.elements.insert(element.id.clone(), element)
    }

    pub fn get(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    pub fn remove(&mut self, id: &str) -> Option<Element> {
        self.elements.remove(id)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.elements.keys().map(String::as_str)
    }

    /// Get the element with `id`, creating a hidden placeholder if the page
    /// does not have one.
    pub fn ensure(&mut self, id: &str, tag: Tag) -> &mut Element {
        self.elements.entry(id.to_string()).or_insert_with(|| {
            log::warn!("Placeholder created for #{}", id);
            let mut element = Element::new(id, tag).hidden();
            element.placeholder = true;
            element
        })
    }

    /// Drain dirty flags from every element that changed
    pub fn take_dirty(&mut self) -> Vec<(String, Dirty)> {
        self.elements
            .values_mut()
            .filter(|element| !element.dirty.is_empty())
            .map(|element| (element.id.clone(), element.take_dirty()))
            .collect()
    }
}
