//! Materialization - turning an element tree into surface nodes.

use crate::element::{Element, Kind};
use crate::error::RenderError;
use crate::state::RenderContext;
use crate::surface::{NodeKind, Surface};

/// Convert one element into a surface node, recursively.
///
/// Components are invoked with their props (children included) and the
/// element they return is converted in their place; a component adds no
/// node of its own. Primitive kinds get one node, every named property in
/// mapping order, then their converted children in order.
pub(crate) fn create_node<S: Surface>(
    surface: &mut S,
    cx: &mut RenderContext<'_>,
    element: &Element,
) -> Result<S::Node, RenderError> {
    match element.kind() {
        Kind::Component(component) => {
            let rendered = component.invoke(element.props(), cx);
            create_node(surface, cx, &rendered)
        }
        Kind::Text => create_primitive(surface, cx, NodeKind::Text, element),
        Kind::Tag(tag) => create_primitive(surface, cx, NodeKind::Tag(tag), element),
    }
}

fn create_primitive<S: Surface>(
    surface: &mut S,
    cx: &mut RenderContext<'_>,
    kind: NodeKind<'_>,
    element: &Element,
) -> Result<S::Node, RenderError> {
    let node = surface.create_node(kind).map_err(RenderError::surface)?;
    tracing::trace!(?kind, ?node, "created node");

    for (name, value) in element.props().iter() {
        surface.set_property(&node, name, value).map_err(RenderError::surface)?;
    }

    for child in element.children() {
        let child_node = create_node(surface, cx, child)?;
        surface.append_child(&node, &child_node).map_err(RenderError::surface)?;
    }

    Ok(node)
}

#[cfg(test)]
mod tests {
    use std::any::Any;
    use std::cell::RefCell;
    use std::rc::{Rc, Weak};

    use super::*;
    use crate::children;
    use crate::element::{Component, Props, create_element};
    use crate::state::{StateHost, StateStore};
    use crate::surface::memory::{MemorySurface, NodeId};

    struct NoHost;

    impl StateHost for NoHost {
        fn set_slot(&self, _index: usize, _value: Box<dyn Any>) -> Result<(), RenderError> {
            Err(RenderError::NotMounted)
        }
    }

    fn convert(surface: &mut MemorySurface, element: &Element) -> Result<NodeId, RenderError> {
        let mut store = StateStore::new();
        convert_with(surface, &mut store, element)
    }

    fn convert_with(
        surface: &mut MemorySurface,
        store: &mut StateStore,
        element: &Element,
    ) -> Result<NodeId, RenderError> {
        let host: Weak<dyn StateHost> = Weak::<NoHost>::new();
        let mut cx = RenderContext::new(store, &host);
        create_node(surface, &mut cx, element)
    }

    #[test]
    fn test_primitive_tree() {
        let mut surface = MemorySurface::new();
        let tree = create_element(
            "div",
            Some(Props::new().with("id", "root").with("hidden", false)),
            children![create_element("h1", None, children!["Title"]), "tail"],
        );

        let node = convert(&mut surface, &tree).unwrap();

        assert_eq!(
            surface.markup(node),
            "<div id=\"root\" hidden=\"false\"><h1>Title</h1>tail</div>"
        );
        // Conversion alone never attaches the root.
        assert_eq!(surface.parent(node), None);
    }

    #[test]
    fn test_component_contributes_no_node() {
        let mut surface = MemorySurface::new();
        let frame = Component::new(|props, _cx| {
            let title = props.get("title").map(ToString::to_string).unwrap_or_default();
            create_element(
                "section",
                None,
                children![create_element("h2", None, children![title]), props.children().to_vec()],
            )
        });
        let tree = create_element(
            frame,
            Some(Props::new().with("title", "Box")),
            children![create_element("p", None, children!["body"])],
        );

        let node = convert(&mut surface, &tree).unwrap();

        assert_eq!(surface.markup(node), "<section><h2>Box</h2><p>body</p></section>");
    }

    #[test]
    fn test_nested_components_expand() {
        let mut surface = MemorySurface::new();
        let leaf = Component::new(|_props, _cx| create_element("b", None, children!["leaf"]));
        let outer =
            Component::new(move |_props, _cx| create_element(leaf.clone(), None, children![]));

        let node = convert(&mut surface, &create_element(outer, None, children![])).unwrap();

        assert_eq!(surface.markup(node), "<b>leaf</b>");
    }

    #[test]
    fn test_cursor_counts_slots_claimed_in_pass() {
        let mut surface = MemorySurface::new();
        let mut store = StateStore::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let log = seen.clone();
        let pair = Component::new(move |_props, cx| {
            log.borrow_mut().push(cx.cursor());
            let (a, _) = cx.use_state(1);
            log.borrow_mut().push(cx.cursor());
            let (b, _) = cx.use_state(2);
            log.borrow_mut().push(cx.cursor());
            create_element("i", None, children![a + b])
        });
        let log = seen.clone();
        let single = Component::new(move |_props, cx| {
            log.borrow_mut().push(cx.cursor());
            let (c, _) = cx.use_state("c");
            create_element("i", None, children![c])
        });
        let tree = create_element(
            "div",
            None,
            children![
                create_element(pair, None, children![]),
                create_element(single, None, children![]),
            ],
        );

        let node = convert_with(&mut surface, &mut store, &tree).unwrap();

        // The second component starts where the first one stopped.
        assert_eq!(*seen.borrow(), vec![0, 1, 2, 2]);
        assert_eq!(store.cursor(), 3);
        assert_eq!(surface.markup(node), "<div><i>3</i><i>c</i></div>");

        // A new pass rewinds to slot 0 and reads the same slots back.
        seen.borrow_mut().clear();
        store.begin_pass();
        convert_with(&mut surface, &mut store, &tree).unwrap();
        assert_eq!(*seen.borrow(), vec![0, 1, 2, 2]);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_bad_kind_fails_at_materialization() {
        let mut surface = MemorySurface::new();
        let bad = create_element("not a tag", None, children![]);
        let tree = create_element("div", None, children![bad]);

        let err = convert(&mut surface, &tree).unwrap_err();

        assert!(matches!(err, RenderError::Surface(_)));
        assert!(err.to_string().contains("invalid tag name `not a tag`"));
    }
}
