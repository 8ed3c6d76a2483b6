//! Renderer-agnostic display tree.
//!
//! The composer builds a [`Node`] tree; [`crate::render`] turns it into HTML.
//! Nodes are plain data: no styling, no markup, no references back into the
//! metadata. Styling is keyed by [`Role`] and [`LinkKind`] in the stylesheet.
//!
//! The tree serializes to JSON (`simple-folio tree`) for inspection.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum Node {
    Container {
        role: Role,
        children: Vec<Node>,
    },
    Text {
        text: String,
        style: TextStyle,
    },
    Link {
        kind: LinkKind,
        href: Href,
        /// Tooltip / accessible label. Never empty.
        title: String,
        children: Vec<Node>,
    },
    Image {
        /// Avatar path relative to the content root.
        src: String,
        alt: String,
        width: u32,
        height: u32,
    },
}

/// What a container represents on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Page,
    Sidebar,
    SidebarContent,
    Heading,
    Tagline,
    Content,
    Bio,
    Social,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextStyle {
    #[default]
    Plain,
    /// The highlighted middle character of the banner.
    MiddleInitial,
    Emphasis,
    Strong,
    Code,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    /// Avatar link to the homepage.
    Home,
    /// Author name inside the bio line.
    Author,
    Blog,
    Email,
    #[serde(rename = "github")]
    GitHub,
    Twitter,
    StackOverflow,
    /// Link written in the bio markdown.
    Inline,
}

impl LinkKind {
    /// Icon name for social links.
    pub fn icon(self) -> Option<&'static str> {
        match self {
            LinkKind::Blog => Some("book"),
            LinkKind::Email => Some("envelope"),
            LinkKind::GitHub => Some("github"),
            LinkKind::Twitter => Some("twitter"),
            LinkKind::StackOverflow => Some("stack-overflow"),
            LinkKind::Home | LinkKind::Author | LinkKind::Inline => None,
        }
    }
}

/// Link destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Href {
    /// Ordinary URL or path, escaped on output.
    Url(String),
    /// Character-reference encoded string, emitted as-is.
    Obfuscated(String),
}

impl Href {
    pub fn as_str(&self) -> &str {
        match self {
            Href::Url(s) | Href::Obfuscated(s) => s,
        }
    }
}

impl Node {
    pub fn container(role: Role, children: Vec<Node>) -> Self {
        Node::Container { role, children }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Node::Text {
            text: text.into(),
            style: TextStyle::Plain,
        }
    }

    pub fn styled(text: impl Into<String>, style: TextStyle) -> Self {
        Node::Text {
            text: text.into(),
            style,
        }
    }

    pub fn link(kind: LinkKind, href: Href, title: impl Into<String>, children: Vec<Node>) -> Self {
        Node::Link {
            kind,
            href,
            title: title.into(),
            children,
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Container { children, .. } | Node::Link { children, .. } => children,
            Node::Text { .. } | Node::Image { .. } => &[],
        }
    }

    /// Pre-order traversal, including `self`.
    pub fn descendants(&self) -> Vec<&Node> {
        fn collect<'a>(node: &'a Node, out: &mut Vec<&'a Node>) {
            out.push(node);
            for child in node.children() {
                collect(child, out);
            }
        }
        let mut out = Vec::new();
        collect(self, &mut out);
        out
    }

    /// Containers with the given role, in document order.
    pub fn find_role(&self, role: Role) -> Vec<&Node> {
        self.descendants()
            .into_iter()
            .filter(|n| matches!(n, Node::Container { role: r, .. } if *r == role))
            .collect()
    }

    /// Links of the given kind, in document order.
    pub fn find_links(&self, kind: LinkKind) -> Vec<&Node> {
        self.descendants()
            .into_iter()
            .filter(|n| matches!(n, Node::Link { kind: k, .. } if *k == kind))
            .collect()
    }

    pub fn images(&self) -> Vec<&Node> {
        self.descendants()
            .into_iter()
            .filter(|n| matches!(n, Node::Image { .. }))
            .collect()
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self) -> String {
        self.descendants()
            .into_iter()
            .filter_map(|n| match n {
                Node::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}
