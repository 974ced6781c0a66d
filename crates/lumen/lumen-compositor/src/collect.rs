//! Per-frame traversal of the UI tree
//!
//! The tree is walked once per frame, depth first, skipping invisible
//! subtrees. Each visited node gets an effective draw-order key: its own key
//! if it is a [`PostScaleDrawable`], raised to at least its parent's effective
//! key so children of a floating window stay above the panels the window
//! covers. The flat list is then stable-sorted by key, which keeps tree order
//! for equal keys (parents before children, earlier siblings first).
//!
//! Membership is recomputed every frame; nothing is cached between frames.

use crate::element::{PostScaleDrawable, UiElement};
use crate::zorder::{DrawOrderKey, WindowZOrderManager};

/// One visible element in draw order
pub struct FrameEntry<'a> {
    /// The element
    pub element: &'a dyn UiElement,
    /// Effective draw-order key
    pub key: DrawOrderKey,
    /// Depth in the tree (roots are 0)
    pub depth: usize,
}

impl<'a> FrameEntry<'a> {
    /// Post-scale capability of the element
    pub fn post_scale(&self) -> Option<&'a dyn PostScaleDrawable> {
        self.element.as_post_scale()
    }
}

impl core::fmt::Debug for FrameEntry<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FrameEntry")
            .field("name", &self.element.name())
            .field("key", &self.key)
            .field("depth", &self.depth)
            .finish()
    }
}

/// Name and key of an element in the post-scale sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawnElement {
    /// Element name
    pub name: String,
    /// Effective draw-order key
    pub key: DrawOrderKey,
}

/// Draw-order key of a single element, ignoring its ancestors
pub fn own_key(element: &dyn UiElement, zorder: &WindowZOrderManager) -> DrawOrderKey {
    element
        .as_post_scale()
        .map_or(DrawOrderKey::BACKGROUND, |p| p.draw_order_key(zorder))
}

fn visit<'a>(
    element: &'a dyn UiElement,
    inherited: DrawOrderKey,
    depth: usize,
    zorder: &WindowZOrderManager,
    out: &mut Vec<FrameEntry<'a>>,
) {
    if !element.is_visible() {
        return;
    }
    let key = own_key(element, zorder).max(inherited);
    out.push(FrameEntry {
        element,
        key,
        depth,
    });
    for child in element.children() {
        visit(child.as_ref(), key, depth.saturating_add(1), zorder, out);
    }
}

/// Every visible element of the tree, sorted ascending by effective key
pub fn collect_frame<'a>(
    roots: &'a [Box<dyn UiElement>],
    zorder: &WindowZOrderManager,
) -> Vec<FrameEntry<'a>> {
    let mut entries = Vec::new();
    for root in roots {
        visit(root.as_ref(), DrawOrderKey::BACKGROUND, 0, zorder, &mut entries);
    }
    // sort_by_key is stable
    entries.sort_by_key(|entry| entry.key);
    entries
}

/// The post-scale pass: visible elements with the crisp-draw capability, in order
pub fn collect_post_scale<'a>(
    roots: &'a [Box<dyn UiElement>],
    zorder: &WindowZOrderManager,
) -> Vec<(DrawOrderKey, &'a dyn UiElement, &'a dyn PostScaleDrawable)> {
    collect_frame(roots, zorder)
        .into_iter()
        .filter_map(|entry| entry.post_scale().map(|p| (entry.key, entry.element, p)))
        .collect()
}

/// Names and keys of the post-scale pass, in draw order
pub fn draw_sequence(roots: &[Box<dyn UiElement>], zorder: &WindowZOrderManager) -> Vec<DrawnElement> {
    collect_post_scale(roots, zorder)
        .into_iter()
        .map(|(key, element, _)| DrawnElement {
            name: element.name().to_string(),
            key,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::DrawContext;
    use crate::framebuffer::Framebuffer;
    use crate::paint::DrawError;
    use embedded_graphics::prelude::{Point, Size};
    use embedded_graphics::primitives::Rectangle;
    use lumen_scale::ScaleTransform;

    struct Node {
        name: &'static str,
        key: Option<u64>,
        visible: bool,
        children: Vec<Box<dyn UiElement>>,
    }

    impl Node {
        fn new(name: &'static str, key: Option<u64>) -> Self {
            Self {
                name,
                key,
                visible: true,
                children: Vec::new(),
            }
        }

        fn with_child(mut self, child: Node) -> Self {
            self.children.push(Box::new(child));
            self
        }

        fn hidden(mut self) -> Self {
            self.visible = false;
            self
        }
    }

    impl UiElement for Node {
        fn name(&self) -> &str {
            self.name
        }

        fn bounds(&self) -> Rectangle {
            Rectangle::new(Point::zero(), Size::new(1, 1))
        }

        fn is_visible(&self) -> bool {
            self.visible
        }

        fn draw(&self, _: &mut Framebuffer, _: &DrawContext) -> Result<(), DrawError> {
            Ok(())
        }

        fn children(&self) -> &[Box<dyn UiElement>] {
            &self.children
        }

        fn as_post_scale(&self) -> Option<&dyn PostScaleDrawable> {
            self.key.map(|_| self as &dyn PostScaleDrawable)
        }
    }

    impl PostScaleDrawable for Node {
        fn draw_order_key(&self, _: &WindowZOrderManager) -> DrawOrderKey {
            DrawOrderKey(self.key.unwrap_or_default())
        }

        fn draw_fills(&self, _: &mut Framebuffer) -> Result<(), DrawError> {
            Ok(())
        }

        fn draw_borders_and_text(&self, _: &mut Framebuffer, _: &ScaleTransform) -> Result<(), DrawError> {
            Ok(())
        }
    }

    fn names(roots: &[Box<dyn UiElement>]) -> Vec<String> {
        draw_sequence(roots, &WindowZOrderManager::new())
            .into_iter()
            .map(|d| d.name)
            .collect()
    }

    #[test]
    fn test_sorted_by_key() {
        let roots: Vec<Box<dyn UiElement>> = vec![
            Box::new(Node::new("window-b", Some(106))),
            Box::new(Node::new("panel", Some(10))),
            Box::new(Node::new("window-a", Some(105))),
        ];
        assert_eq!(names(&roots), vec!["panel", "window-a", "window-b"]);
    }

    #[test]
    fn test_nested_children_collected_and_inherit_key() {
        let window = Node::new("window", Some(101))
            .with_child(Node::new("ok-button", Some(0)).with_child(Node::new("deep", Some(3))));
        let roots: Vec<Box<dyn UiElement>> = vec![
            Box::new(window),
            Box::new(Node::new("panel", Some(20))),
        ];
        let seq = draw_sequence(&roots, &WindowZOrderManager::new());
        let keys: Vec<(&str, u64)> = seq.iter().map(|d| (d.name.as_str(), d.key.0)).collect();
        assert_eq!(
            keys,
            vec![("panel", 20), ("window", 101), ("ok-button", 101), ("deep", 101)]
        );
    }

    #[test]
    fn test_invisible_subtree_skipped() {
        let roots: Vec<Box<dyn UiElement>> = vec![
            Box::new(Node::new("shown", Some(1))),
            Box::new(Node::new("hidden", Some(2)).with_child(Node::new("child", Some(3))).hidden()),
        ];
        assert_eq!(names(&roots), vec!["shown"]);
    }

    #[test]
    fn test_non_post_scale_elements_only_in_frame_list() {
        let roots: Vec<Box<dyn UiElement>> = vec![
            Box::new(Node::new("plain", None).with_child(Node::new("crisp", Some(5)))),
        ];
        let zorder = WindowZOrderManager::new();
        assert_eq!(collect_frame(&roots, &zorder).len(), 2);
        assert_eq!(names(&roots), vec!["crisp"]);
    }

    #[test]
    fn test_equal_keys_keep_tree_order() {
        let roots: Vec<Box<dyn UiElement>> = vec![
            Box::new(Node::new("first", Some(7))),
            Box::new(Node::new("second", Some(7))),
            Box::new(Node::new("third", Some(7))),
        ];
        assert_eq!(names(&roots), vec!["first", "second", "third"]);
    }
}
