//! Element Model - descriptions of UI nodes, built before anything is rendered.
//!
//! An [`Element`] is plain data: a [`Kind`], its [`Props`], and (inside the
//! props) an ordered list of child elements. Nothing here touches a surface.
//!
//! # Example
//!
//! ```ignore
//! use spark_element::{Props, children, create_element};
//!
//! let list = create_element("ul", None, children![vec![
//!     create_element("li", None, children!["a"]),
//!     create_element("li", None, children!["b"]),
//! ]]);
//! assert_eq!(list.children().len(), 2);
//! ```

mod types;

use std::fmt;
use std::rc::Rc;

use crate::state::RenderContext;

pub use types::{CHILDREN, EventHandler, NODE_VALUE, PropValue, Props};

// =============================================================================
// Component
// =============================================================================

/// Reference to a component function.
///
/// A component maps props to an element. It receives the render context so
/// it can request state slots with [`RenderContext::use_state`].
#[derive(Clone)]
pub struct Component(Rc<dyn Fn(&Props, &mut RenderContext<'_>) -> Element>);

impl Component {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Props, &mut RenderContext<'_>) -> Element + 'static,
    {
        Self(Rc::new(f))
    }

    pub(crate) fn invoke(&self, props: &Props, cx: &mut RenderContext<'_>) -> Element {
        (self.0)(props, cx)
    }
}

impl PartialEq for Component {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Component({:p})", Rc::as_ptr(&self.0))
    }
}

// =============================================================================
// Kind
// =============================================================================

/// What an element is.
#[derive(Clone, Debug, PartialEq)]
pub enum Kind {
    /// Text node. Its content is the `nodeValue` property.
    Text,
    /// Tagged element understood by the output surface (`div`, `button`, ...).
    Tag(String),
    /// Function expanded during rendering. Produces no surface node itself.
    Component(Component),
}

impl From<&str> for Kind {
    fn from(value: &str) -> Self {
        Kind::Tag(value.to_string())
    }
}

impl From<String> for Kind {
    fn from(value: String) -> Self {
        Kind::Tag(value)
    }
}

impl From<Component> for Kind {
    fn from(value: Component) -> Self {
        Kind::Component(value)
    }
}

// =============================================================================
// Element
// =============================================================================

/// Immutable description of one node or component invocation.
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    kind: Kind,
    props: Props,
}

impl Element {
    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    pub fn props(&self) -> &Props {
        &self.props
    }

    pub fn children(&self) -> &[Element] {
        &self.props.children
    }

    /// `nodeValue` of a text element.
    pub fn node_value(&self) -> Option<&PropValue> {
        match self.kind {
            Kind::Text => self.props.get(NODE_VALUE),
            _ => None,
        }
    }
}

// =============================================================================
// Child
// =============================================================================

/// Anything accepted as a child by [`create_element`].
#[derive(Clone, Debug)]
pub enum Child {
    Element(Element),
    Text(String),
    Number(f64),
    /// Nested sequence, flattened into the parent's children.
    Many(Vec<Child>),
}

impl From<Element> for Child {
    fn from(value: Element) -> Self {
        Child::Element(value)
    }
}

impl From<&str> for Child {
    fn from(value: &str) -> Self {
        Child::Text(value.to_string())
    }
}

impl From<String> for Child {
    fn from(value: String) -> Self {
        Child::Text(value)
    }
}

impl From<&String> for Child {
    fn from(value: &String) -> Self {
        Child::Text(value.clone())
    }
}

impl From<f64> for Child {
    fn from(value: f64) -> Self {
        Child::Number(value)
    }
}

impl From<i32> for Child {
    fn from(value: i32) -> Self {
        Child::Number(f64::from(value))
    }
}

impl From<i64> for Child {
    fn from(value: i64) -> Self {
        Child::Number(value as f64)
    }
}

impl From<usize> for Child {
    fn from(value: usize) -> Self {
        Child::Number(value as f64)
    }
}

impl From<Vec<Element>> for Child {
    fn from(value: Vec<Element>) -> Self {
        Child::Many(value.into_iter().map(Child::Element).collect())
    }
}

impl From<Vec<Child>> for Child {
    fn from(value: Vec<Child>) -> Self {
        Child::Many(value)
    }
}

/// Build a `Vec<Child>` from values of mixed types.
///
/// ```ignore
/// let kids = children!["Count: ", 3, create_element("br", None, children![])];
/// ```
#[macro_export]
macro_rules! children {
    () => {
        ::std::vec::Vec::<$crate::Child>::new()
    };
    ($($child:expr),+ $(,)?) => {
        ::std::vec![$($crate::Child::from($child)),+]
    };
}

// =============================================================================
// Construction
// =============================================================================

/// Build an element.
///
/// Nested sequences in `children` are flattened and every text or number is
/// wrapped with [`create_text_element`]. `kind` and `props` are not
/// validated; a bad tag name only fails once a surface tries to create it.
pub fn create_element(
    kind: impl Into<Kind>,
    props: Option<Props>,
    children: Vec<Child>,
) -> Element {
    let mut props = props.unwrap_or_default();
    let mut flat = Vec::with_capacity(children.len());
    flatten_into(children, &mut flat);
    props.children = flat;

    Element {
        kind: kind.into(),
        props,
    }
}

/// Build a text element whose `nodeValue` is `value`.
pub fn create_text_element(value: impl Into<PropValue>) -> Element {
    Element {
        kind: Kind::Text,
        props: Props::new().with(NODE_VALUE, value),
    }
}

fn flatten_into(children: Vec<Child>, out: &mut Vec<Element>) {
    for child in children {
        match child {
            Child::Element(element) => out.push(element),
            Child::Text(text) => out.push(create_text_element(text)),
            Child::Number(n) => out.push(create_text_element(n)),
            Child::Many(nested) => flatten_into(nested, out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_children_become_text_elements() {
        let el = create_element("p", None, children!["hello", 42, 1.5]);

        let values: Vec<&PropValue> =
            el.children().iter().filter_map(Element::node_value).collect();
        assert_eq!(
            values,
            vec![&PropValue::from("hello"), &PropValue::from(42), &PropValue::from(1.5)]
        );
        assert!(el.children().iter().all(|c| c.kind() == &Kind::Text));
        assert!(el.children().iter().all(|c| c.children().is_empty()));
    }

    #[test]
    fn test_nested_sequence_is_flattened() {
        let list = create_element(
            "ul",
            None,
            children![vec![
                create_element("li", None, children!["a"]),
                create_element("li", None, children!["b"]),
            ]],
        );

        assert_eq!(list.children().len(), 2);
        for (li, text) in list.children().iter().zip(["a", "b"]) {
            assert_eq!(li.kind(), &Kind::from("li"));
            assert_eq!(li.children()[0].node_value(), Some(&PropValue::from(text)));
        }
    }

    #[test]
    fn test_mixed_nested_children_keep_order() {
        let el = create_element(
            "div",
            None,
            children!["x", children!["y", create_element("hr", None, children![])], 3],
        );

        let kinds: Vec<&Kind> = el.children().iter().map(Element::kind).collect();
        assert_eq!(kinds, vec![&Kind::Text, &Kind::Text, &Kind::from("hr"), &Kind::Text]);
    }

    #[test]
    fn test_element_children_used_as_is() {
        let child = create_element("span", Some(Props::new().with("id", "s")), children![]);
        let parent = create_element("div", None, children![child.clone()]);
        assert_eq!(parent.children(), &[child]);
    }

    #[test]
    fn test_null_props_and_no_children() {
        let el = create_element("br", None, children![]);
        assert!(el.props().is_empty());
        assert!(el.children().is_empty());
    }

    #[test]
    fn test_component_children_live_in_props() {
        let component = Component::new(|props, _cx| {
            create_element("section", None, children![props.children().to_vec()])
        });
        let el = create_element(component.clone(), None, children!["inner"]);

        assert_eq!(el.kind(), &Kind::Component(component));
        assert_eq!(el.props().children().len(), 1);
    }
}
