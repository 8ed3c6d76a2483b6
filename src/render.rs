//! HTML rendering of the display tree.
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! All interpolated strings are escaped except the obfuscated mail
//! destination, which is already a sequence of character references and
//! would otherwise be double-encoded.
//!
//! | Node | HTML |
//! |---|---|
//! | `Container` (`Heading`) | `h1.heading` |
//! | `Container` (`Tagline`, `Bio`) | `p.tagline`, `p.bio` |
//! | `Container` (other roles) | `div.<role>` |
//! | `Text` (`MiddleInitial`) | `span.middle-initial` |
//! | `Link` with an icon | `a.social-link` + `i.icon.icon-<name>` + label |
//! | `Image` | `img.avatar` with a 1x/2x `srcset` |
//!
//! The stylesheet is inlined: color and theme variables generated from
//! config, followed by `static/style.css`.

use crate::avatar::{self, AvatarVariant};
use crate::config::{self, SiteConfig};
use crate::metadata::SiteMetadata;
use crate::tree::{Href, LinkKind, Node, Role, TextStyle};
use maud::{DOCTYPE, Markup, PreEscaped, html};

const CSS_STATIC: &str = include_str!("../static/style.css");

/// Full inline stylesheet for a config.
pub fn stylesheet(config: &SiteConfig) -> String {
    format!(
        "{}\n{}\n{}",
        config::generate_color_css(&config.colors),
        config::generate_theme_css(&config.theme),
        CSS_STATIC
    )
}

/// Render the landing page.
///
/// `variants` replaces the avatar's source path with the derived files; with
/// no variants the image points at the tree's `src` unchanged.
pub fn render_page(
    tree: &Node,
    meta: &SiteMetadata,
    variants: &[AvatarVariant],
    css: &str,
) -> Markup {
    let ctx = Context { variants };
    base_document(meta, css, render_node(tree, &ctx))
}

struct Context<'a> {
    variants: &'a [AvatarVariant],
}

fn base_document(site: &SiteMetadata, css: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                meta name="author" content=(site.author);
                @if let Some(tagline) = &site.tagline {
                    meta name="description" content=(tagline);
                }
                title { (site.banner) }
                link rel="canonical" href=(site.homepage);
                style { (PreEscaped(css)) }
            }
            body {
                (content)
            }
        }
    }
}

fn role_class(role: Role) -> &'static str {
    match role {
        Role::Page => "page",
        Role::Sidebar => "sidebar",
        Role::SidebarContent => "sidebar-content",
        Role::Heading => "heading",
        Role::Tagline => "tagline",
        Role::Content => "content",
        Role::Bio => "bio",
        Role::Social => "social",
    }
}

fn render_node(node: &Node, ctx: &Context) -> Markup {
    match node {
        Node::Container { role, children } => render_container(*role, children, ctx),
        Node::Text { text, style } => render_text(text, *style),
        Node::Link {
            kind,
            href,
            title,
            children,
        } => render_link(*kind, href, title, children, ctx),
        Node::Image {
            src,
            alt,
            width,
            height,
        } => render_avatar(src, alt, *width, *height, ctx),
    }
}

fn render_children(children: &[Node], ctx: &Context) -> Markup {
    html! {
        @for child in children {
            (render_node(child, ctx))
        }
    }
}

fn render_container(role: Role, children: &[Node], ctx: &Context) -> Markup {
    let class = role_class(role);
    let inner = render_children(children, ctx);
    match role {
        Role::Heading => html! { h1 class=(class) { (inner) } },
        Role::Tagline | Role::Bio => html! { p class=(class) { (inner) } },
        _ => html! { div class=(class) { (inner) } },
    }
}

fn render_text(text: &str, style: TextStyle) -> Markup {
    match style {
        TextStyle::Plain => html! { (text) },
        TextStyle::MiddleInitial => html! { span.middle-initial { (text) } },
        TextStyle::Emphasis => html! { em { (text) } },
        TextStyle::Strong => html! { strong { (text) } },
        TextStyle::Code => html! { code { (text) } },
    }
}

fn render_link(
    kind: LinkKind,
    href: &Href,
    title: &str,
    children: &[Node],
    ctx: &Context,
) -> Markup {
    let href = match href {
        Href::Url(url) => html! { (url) },
        Href::Obfuscated(encoded) => html! { (PreEscaped(encoded)) },
    };
    match kind.icon() {
        Some(icon) => html! {
            a.social-link href=(href) title=(title) {
                i class=(format!("icon icon-{icon}")) aria-hidden="true" {}
                span.label { (title) }
            }
        },
        None => {
            let class = match kind {
                LinkKind::Home => Some("home-link"),
                LinkKind::Author => Some("author-link"),
                _ => None,
            };
            html! {
                a class=[class] href=(href) title=(title) {
                    (render_children(children, ctx))
                }
            }
        }
    }
}

fn render_avatar(src: &str, alt: &str, width: u32, height: u32, ctx: &Context) -> Markup {
    let (src, srcset) = match ctx.variants.first() {
        Some(first) => (first.src.as_str(), Some(avatar::srcset(ctx.variants))),
        None => (src, None),
    };
    html! {
        img class="avatar" src=(src) srcset=[srcset] width=(width) height=(height) alt=(alt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::avatar::VariantStatus;
    use crate::compose::compose;
    use crate::test_helpers::sample_metadata;

    fn variants() -> Vec<AvatarVariant> {
        [(1, 50), (2, 100)]
            .into_iter()
            .map(|(scale, edge)| AvatarVariant {
                scale,
                src: avatar::variant_filename(edge),
                edge,
                status: VariantStatus::Encoded,
            })
            .collect()
    }

    fn render(meta: &SiteMetadata) -> String {
        render_page(&compose(meta), meta, &variants(), "").into_string()
    }

    #[test]
    fn base_document_includes_doctype() {
        let html = render(&sample_metadata());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Jane Doe</title>"));
        assert!(html.contains(r#"<meta name="description" content="Software, mostly.">"#));
    }

    #[test]
    fn heading_is_h1_with_middle_initial() {
        let html = render(&sample_metadata());
        assert!(html.contains(
            r#"<h1 class="heading">jan<span class="middle-initial">e</span>doe</h1>"#
        ));
    }

    #[test]
    fn tagline_and_bio_are_paragraphs() {
        let html = render(&sample_metadata());
        assert!(html.contains(r#"<p class="tagline">Software, mostly.</p>"#));
        assert!(html.contains(r#"<p class="bio">Written by <a class="author-link""#));
    }

    #[test]
    fn avatar_uses_derived_variants() {
        let html = render(&sample_metadata());
        assert!(html.contains(
            r#"<img class="avatar" src="avatar-50.avif" srcset="avatar-50.avif 1x, avatar-100.avif 2x" width="50" height="50" alt="Jane Doe">"#
        ));
    }

    #[test]
    fn avatar_without_variants_keeps_source_path() {
        let meta = sample_metadata();
        let html = render_page(&compose(&meta), &meta, &[], "").into_string();
        assert!(html.contains(r#"src="profile-pic.png""#));
        assert!(!html.contains("srcset"));
    }

    #[test]
    fn obfuscated_href_is_not_double_escaped() {
        let meta = sample_metadata();
        let encoded = meta.social.email.clone().unwrap();
        let html = render(&meta);
        assert!(html.contains(&format!(r#"href="{encoded}""#)));
        assert!(!html.contains("&amp;#"));
    }

    #[test]
    fn social_links_have_icons_and_labels() {
        let html = render(&sample_metadata());
        assert!(html.contains(r#"<i class="icon icon-github" aria-hidden="true"></i>"#));
        assert!(html.contains(r#"href="https://twitter.com/janedoe""#));
        assert!(html.contains(r#"<span class="label">stack overflow</span>"#));
    }

    #[test]
    fn absent_twitter_renders_no_twitter_link() {
        let mut meta = sample_metadata();
        meta.social.twitter = None;
        let html = render(&meta);
        assert!(!html.contains("twitter.com"));
        assert!(!html.contains("icon-twitter"));
    }

    #[test]
    fn inline_markdown_styles_render() {
        let mut meta = sample_metadata();
        meta.bio = Some("builds *fast* `code` at [Acme](https://acme.test)".into());
        let html = render(&meta);
        assert!(html.contains("<em>fast</em>"));
        assert!(html.contains("<code>code</code>"));
        assert!(html.contains(r#"<a href="https://acme.test" title="https://acme.test">Acme</a>"#));
    }

    #[test]
    fn html_escape_in_maud() {
        let mut meta = sample_metadata();
        meta.author = "<script>alert('xss')</script>".into();
        meta.tagline = Some("Tom & Jerry".into());
        let html = render(&meta);

        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("Tom &amp; Jerry"));
    }

    #[test]
    fn stylesheet_combines_variables_and_static_css() {
        let config = SiteConfig::default();
        let css = stylesheet(&config);
        assert!(css.contains("--color-bg"));
        assert!(css.contains("--sidebar-width"));
        assert!(css.contains(".middle-initial"));
    }
}
