use bevy_ecs::prelude::Resource;

/// RGBA color, components in 0.0..=1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    /// Lime 500 (#84cc16)
    pub const LIME: Self = Self::hex(0x84cc16);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from a 0xRRGGBB value
    pub const fn hex(rgb: u32) -> Self {
        let r = ((rgb >> 16) & 0xff) as f32 / 255.0;
        let g = ((rgb >> 8) & 0xff) as f32 / 255.0;
        let b = (rgb & 0xff) as f32 / 255.0;
        Self::rgb(r, g, b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    Start,
    #[default]
    Center,
    End,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContainerStyle {
    /// Share of the parent's free space this container takes.
    pub flex: f32,
    pub align_items: Align,
    pub justify_content: Align,
    pub background: Color,
}

impl Default for ContainerStyle {
    fn default() -> Self {
        Self {
            flex: 1.0,
            align_items: Align::Center,
            justify_content: Align::Center,
            background: Color::TRANSPARENT,
        }
    }
}

/// Weights of the single family the app ships, by their CSS values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontWeight {
    Regular,
    Medium,
    SemiBold,
    Bold,
}

impl FontWeight {
    pub fn to_cosmic(self) -> cosmic_text::Weight {
        match self {
            FontWeight::Regular => cosmic_text::Weight(400),
            FontWeight::Medium => cosmic_text::Weight(500),
            FontWeight::SemiBold => cosmic_text::Weight(600),
            FontWeight::Bold => cosmic_text::Weight(700),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub family: String,
    pub weight: FontWeight,
    /// Size in points
    pub size: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusBarStyle {
    /// Follow the system color scheme
    #[default]
    Auto,
    Light,
    Dark,
}

/// One node of the frame's output tree. The tree is the rendering
/// boundary: producing it is this crate's job, rasterizing it is not.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Container {
        style: ContainerStyle,
        children: Vec<Node>,
    },
    Text {
        content: String,
        style: TextStyle,
    },
    StatusBar {
        style: StatusBarStyle,
    },
}

/// The current frame's view output. Empty means nothing visible is drawn.
#[derive(Resource, Default, Debug)]
pub struct ViewTree {
    root: Option<Node>,
}

impl ViewTree {
    pub fn set_root(&mut self, node: Node) {
        self.root = Some(node);
    }

    pub fn clear(&mut self) {
        self.root = None;
    }

    pub fn root(&self) -> Option<&Node> {
        self.root.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// All text nodes of the tree in render order.
    pub fn text_nodes(&self) -> Vec<(&str, &TextStyle)> {
        let mut out = vec![];
        if let Some(root) = &self.root {
            collect_text(root, &mut out);
        }
        out
    }
}

fn collect_text<'a>(node: &'a Node, out: &mut Vec<(&'a str, &'a TextStyle)>) {
    match node {
        Node::Text { content, style } => out.push((content.as_str(), style)),
        Node::Container { children, .. } => {
            for child in children {
                collect_text(child, out);
            }
        }
        Node::StatusBar { .. } => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_expands_channels() {
        let lime = Color::hex(0x84cc16);
        assert!((lime.r - 132.0 / 255.0).abs() < f32::EPSILON);
        assert!((lime.g - 204.0 / 255.0).abs() < f32::EPSILON);
        assert!((lime.b - 22.0 / 255.0).abs() < f32::EPSILON);
        assert_eq!(lime.a, 1.0);
    }

    #[test]
    fn weights_map_to_css_values() {
        assert_eq!(FontWeight::Regular.to_cosmic().0, 400);
        assert_eq!(FontWeight::Medium.to_cosmic().0, 500);
        assert_eq!(FontWeight::SemiBold.to_cosmic().0, 600);
        assert_eq!(FontWeight::Bold.to_cosmic().0, 700);
    }

    #[test]
    fn empty_tree_has_no_text() {
        let tree = ViewTree::default();
        assert!(tree.is_empty());
        assert!(tree.text_nodes().is_empty());
    }

    #[test]
    fn text_nodes_walks_nested_containers() {
        let style = TextStyle {
            family: "Host Grotesk".to_string(),
            weight: FontWeight::Regular,
            size: 16.0,
        };

        let mut tree = ViewTree::default();
        tree.set_root(Node::Container {
            style: ContainerStyle::default(),
            children: vec![
                Node::StatusBar {
                    style: StatusBarStyle::Auto,
                },
                Node::Container {
                    style: ContainerStyle::default(),
                    children: vec![Node::Text {
                        content: "inner".to_string(),
                        style: style.clone(),
                    }],
                },
            ],
        });

        let texts = tree.text_nodes();
        assert_eq!(texts.len(), 1);
        assert_eq!(texts[0].0, "inner");
    }

    #[test]
    fn clear_empties_the_tree() {
        let mut tree = ViewTree::default();
        tree.set_root(Node::StatusBar {
            style: StatusBarStyle::Auto,
        });
        assert!(!tree.is_empty());

        tree.clear();
        assert!(tree.is_empty());
    }
}
