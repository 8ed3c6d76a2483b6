//! Page composition: [`SiteMetadata`] → display tree.
//!
//! [`compose`] is a pure function. It never fails, never reads files, and
//! never re-validates its input; [`crate::metadata::resolve`] has already
//! guaranteed the required fields. Optional fields that are absent simply
//! leave their nodes out.
//!
//! ```text
//! Page
//! ├── Sidebar
//! │   └── SidebarContent
//! │       ├── Heading   jim [j] kelly
//! │       └── Tagline
//! └── Content
//!     ├── Bio       Written by <author>, <bio>
//!     └── Social    [avatar] blog email github twitter stack-overflow
//! ```

use crate::metadata::SiteMetadata;
use crate::tree::{Href, LinkKind, Node, Role, TextStyle};
use pulldown_cmark::{Event, Parser, Tag, TagEnd};

/// Build the landing page tree.
pub fn compose(meta: &SiteMetadata) -> Node {
    Node::container(Role::Page, vec![sidebar(meta), content(meta)])
}

fn sidebar(meta: &SiteMetadata) -> Node {
    let mut children = vec![heading(&meta.banner)];
    if let Some(tagline) = &meta.tagline {
        children.push(Node::container(Role::Tagline, vec![Node::text(tagline)]));
    }
    Node::container(
        Role::Sidebar,
        vec![Node::container(Role::SidebarContent, children)],
    )
}

/// Split a banner into `(before, middle, after)`.
///
/// Whitespace and punctuation are dropped and letters lowercased, then the
/// character at index `len / 2` is singled out:
/// `"Jim J Kelly"` → `("jim", Some('j'), "kelly")`.
pub fn split_banner(banner: &str) -> (String, Option<char>, String) {
    let squashed: Vec<char> = banner
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect();
    if squashed.is_empty() {
        return (String::new(), None, String::new());
    }
    let mid = squashed.len() / 2;
    (
        squashed[..mid].iter().collect(),
        Some(squashed[mid]),
        squashed[mid + 1..].iter().collect(),
    )
}

fn heading(banner: &str) -> Node {
    let children = match split_banner(banner) {
        (before, Some(middle), after) => {
            let mut parts = Vec::with_capacity(3);
            if !before.is_empty() {
                parts.push(Node::text(before));
            }
            parts.push(Node::styled(middle.to_string(), TextStyle::MiddleInitial));
            if !after.is_empty() {
                parts.push(Node::text(after));
            }
            parts
        }
        // Nothing alphanumeric to highlight; show the banner untouched.
        (_, None, _) => vec![Node::text(banner)],
    };
    Node::container(Role::Heading, children)
}

fn content(meta: &SiteMetadata) -> Node {
    Node::container(Role::Content, vec![bio(meta), social(meta)])
}

fn bio(meta: &SiteMetadata) -> Node {
    let mut children = vec![
        Node::text("Written by "),
        Node::link(
            LinkKind::Author,
            Href::Url(meta.homepage.clone()),
            meta.author.clone(),
            vec![Node::text(&meta.author)],
        ),
    ];
    match &meta.bio {
        Some(bio) => {
            children.push(Node::text(", "));
            append_inlines(&mut children, inline_markdown(bio));
        }
        None => children.push(Node::text(".")),
    }
    Node::container(Role::Bio, children)
}

fn social(meta: &SiteMetadata) -> Node {
    let avatar = Node::Image {
        src: meta.avatar.relative.clone(),
        alt: meta.author.clone(),
        width: meta.avatar.width,
        height: meta.avatar.height,
    };
    let mut links = vec![Node::link(
        LinkKind::Home,
        Href::Url(meta.homepage.clone()),
        meta.author.clone(),
        vec![avatar],
    )];

    if let Some(blog) = &meta.blog {
        links.push(icon_link(LinkKind::Blog, Href::Url(blog.clone()), "blog"));
    }
    if let Some(email) = &meta.social.email {
        links.push(icon_link(
            LinkKind::Email,
            Href::Obfuscated(email.clone()),
            "email",
        ));
    }
    if let Some(handle) = &meta.social.github {
        links.push(icon_link(
            LinkKind::GitHub,
            Href::Url(format!("https://github.com/{handle}/")),
            "github",
        ));
    }
    if let Some(handle) = &meta.social.twitter {
        links.push(icon_link(
            LinkKind::Twitter,
            Href::Url(format!("https://twitter.com/{handle}")),
            "twitter",
        ));
    }
    if let Some(handle) = &meta.social.stack_overflow {
        links.push(icon_link(
            LinkKind::StackOverflow,
            Href::Url(format!("http://stackoverflow.com/story/{handle}")),
            "stack overflow",
        ));
    }

    Node::container(Role::Social, links)
}

fn icon_link(kind: LinkKind, href: Href, title: &str) -> Node {
    Node::link(kind, href, title, Vec::new())
}

/// Parse inline markdown into text and link nodes.
///
/// Emphasis, strong, code spans, and links are kept; block structure, images,
/// and raw HTML are flattened or dropped. Adjacent text runs of the same style
/// are merged so the tree does not depend on how the parser splits text.
pub fn inline_markdown(source: &str) -> Vec<Node> {
    let mut out: Vec<Node> = Vec::new();
    let mut styles: Vec<TextStyle> = Vec::new();
    // (destination, title, children) of the link being built
    let mut open_link: Option<(String, String, Vec<Node>)> = None;
    let mut paragraphs = 0;

    for event in Parser::new(source) {
        let style = styles.last().copied().unwrap_or_default();
        let target = match open_link.as_mut() {
            Some((_, _, children)) => children,
            None => &mut out,
        };
        match event {
            Event::Text(text) => push_text(target, &text, style),
            Event::Code(code) => push_text(target, &code, TextStyle::Code),
            Event::SoftBreak | Event::HardBreak => push_text(target, " ", style),
            Event::Start(Tag::Paragraph) => {
                if paragraphs > 0 {
                    push_text(target, " ", TextStyle::Plain);
                }
                paragraphs += 1;
            }
            Event::Start(Tag::Emphasis) => styles.push(TextStyle::Emphasis),
            Event::Start(Tag::Strong) => styles.push(TextStyle::Strong),
            Event::End(TagEnd::Emphasis | TagEnd::Strong) => {
                styles.pop();
            }
            Event::Start(Tag::Link {
                dest_url, title, ..
            }) => {
                open_link = Some((dest_url.to_string(), title.to_string(), Vec::new()));
            }
            Event::End(TagEnd::Link) => {
                if let Some((dest, title, children)) = open_link.take() {
                    let title = if title.trim().is_empty() {
                        dest.clone()
                    } else {
                        title
                    };
                    out.push(Node::link(LinkKind::Inline, Href::Url(dest), title, children));
                }
            }
            _ => {}
        }
    }
    out
}

fn push_text(target: &mut Vec<Node>, text: &str, style: TextStyle) {
    if let Some(Node::Text {
        text: last,
        style: last_style,
    }) = target.last_mut()
        && *last_style == style
    {
        last.push_str(text);
        return;
    }
    target.push(Node::styled(text, style));
}

/// Append nodes, merging a leading text run into a trailing one.
fn append_inlines(target: &mut Vec<Node>, nodes: Vec<Node>) {
    for node in nodes {
        match node {
            Node::Text { text, style } => push_text(target, &text, style),
            other => target.push(other),
        }
    }
}
