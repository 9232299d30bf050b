//! Property types - named values carried by an element.
//!
//! Properties are an insertion-ordered mapping. The reserved `children`
//! key never lives in the mapping; children are a separate sequence that
//! only [`create_element`](super::create_element) fills.

use std::fmt;
use std::rc::Rc;

use crate::error::RenderError;

use super::Element;

/// Name of the reserved property that carries an element's children.
pub const CHILDREN: &str = "children";

/// Name of the property holding a text element's content.
pub const NODE_VALUE: &str = "nodeValue";

// =============================================================================
// Event Handler
// =============================================================================

/// Callback stored as a property (e.g. `onclick`).
///
/// Cloning shares the same closure, so a handler keeps its identity on its
/// way from a component to the output surface. Handlers return a `Result`
/// because the usual thing they do is call a state setter.
#[derive(Clone)]
pub struct EventHandler(Rc<dyn Fn() -> Result<(), RenderError>>);

impl EventHandler {
    /// Wrap a closure.
    pub fn new(f: impl Fn() -> Result<(), RenderError> + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Invoke the handler.
    pub fn call(&self) -> Result<(), RenderError> {
        (self.0)()
    }

    /// True if both handlers share the same closure.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventHandler({:p})", Rc::as_ptr(&self.0))
    }
}

// =============================================================================
// Prop Value
// =============================================================================

/// A single property value.
#[derive(Clone, Debug)]
pub enum PropValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Handler(EventHandler),
}

impl PropValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            PropValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_handler(&self) -> Option<&EventHandler> {
        match self {
            PropValue::Handler(h) => Some(h),
            _ => None,
        }
    }
}

/// Handlers compare by identity, everything else by value.
impl PartialEq for PropValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PropValue::Text(a), PropValue::Text(b)) => a == b,
            (PropValue::Number(a), PropValue::Number(b)) => a == b,
            (PropValue::Bool(a), PropValue::Bool(b)) => a == b,
            (PropValue::Handler(a), PropValue::Handler(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Text(s) => f.write_str(s),
            PropValue::Number(n) => fmt_number(*n, f),
            PropValue::Bool(b) => write!(f, "{b}"),
            PropValue::Handler(_) => f.write_str("[handler]"),
        }
    }
}

/// Formats like `String(n)` on the web: integral values without a
/// fractional part, exponent form at or above 1e21 and below 1e-6.
fn fmt_number(n: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let magnitude = n.abs();
    if n.is_infinite() {
        f.write_str(if n > 0.0 { "Infinity" } else { "-Infinity" })
    } else if magnitude >= 1e21 {
        // `{:e}` omits the `+` on positive exponents.
        let exp = format!("{n:e}");
        f.write_str(&exp.replacen('e', "e+", 1))
    } else if magnitude != 0.0 && magnitude < 1e-6 {
        write!(f, "{n:e}")
    } else if n.fract() == 0.0 && magnitude < 1e15 {
        write!(f, "{}", n as i64)
    } else {
        write!(f, "{n}")
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::Text(value.to_string())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        PropValue::Text(value)
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        PropValue::Number(value)
    }
}

impl From<i32> for PropValue {
    fn from(value: i32) -> Self {
        PropValue::Number(f64::from(value))
    }
}

impl From<i64> for PropValue {
    fn from(value: i64) -> Self {
        PropValue::Number(value as f64)
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        PropValue::Bool(value)
    }
}

impl From<EventHandler> for PropValue {
    fn from(value: EventHandler) -> Self {
        PropValue::Handler(value)
    }
}

// =============================================================================
// Props
// =============================================================================

/// Named properties plus the element's children.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Props {
    entries: Vec<(String, PropValue)>,
    pub(crate) children: Vec<Element>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Props::set`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Set a property. An existing name keeps its position in the mapping.
    ///
    /// The reserved `children` name is ignored.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<PropValue>) {
        let name = name.into();
        if name == CHILDREN {
            tracing::debug!("ignoring reserved property `children`");
            return;
        }
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&PropValue> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Named properties in mapping order (never includes `children`).
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Children passed to the owning element. A component decides where to place them.
    pub fn children(&self) -> &[Element] {
        &self.children
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_keeps_mapping_order() {
        let props = Props::new()
            .with("id", "a")
            .with("title", "t")
            .with("id", "b");

        let names: Vec<&str> = props.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["id", "title"]);
        assert_eq!(props.get("id"), Some(&PropValue::from("b")));
    }

    #[test]
    fn test_children_name_is_reserved() {
        let props = Props::new().with(CHILDREN, "nope");
        assert!(props.is_empty());
        assert!(props.children().is_empty());
    }

    #[test]
    fn test_number_display() {
        assert_eq!(PropValue::from(1).to_string(), "1");
        assert_eq!(PropValue::from(-3.0).to_string(), "-3");
        assert_eq!(PropValue::from(2.5).to_string(), "2.5");
        assert_eq!(PropValue::from(f64::INFINITY).to_string(), "Infinity");
        assert_eq!(PropValue::from(1e20).to_string(), "100000000000000000000");
    }

    #[test]
    fn test_number_display_exponent_range() {
        assert_eq!(PropValue::from(1e21).to_string(), "1e+21");
        assert_eq!(PropValue::from(-1.5e22).to_string(), "-1.5e+22");
        assert_eq!(PropValue::from(1e-7).to_string(), "1e-7");
        assert_eq!(PropValue::from(0.000001).to_string(), "0.000001");
    }

    #[test]
    fn test_handler_identity() {
        let a = EventHandler::new(|| Ok(()));
        let b = a.clone();
        let c = EventHandler::new(|| Ok(()));

        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&c));
        assert_eq!(PropValue::from(a.clone()), PropValue::from(b));
        assert_ne!(PropValue::from(a), PropValue::from(c));
    }
}
