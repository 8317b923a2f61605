use crate::{
    options::PageLinkOptions,
    urls::{join_url, normalize_path, JoinOptions},
};
use markdown_it::{MarkdownIt, Node, NodeValue, Renderer};

/// A resolved `[[target|label]]` wikilink. The label is either already
/// rendered inline markup or literal text, depending on configuration.
#[derive(Debug)]
pub struct PageLink {
    pub href: String,
    pub label: LinkLabel,
}

#[derive(Debug)]
pub enum LinkLabel {
    /// Rendered markup, embedded verbatim.
    Markup(String),
    /// Plain text, escaped on render.
    Text(String),
}

impl NodeValue for PageLink {
    fn render(&self, node: &Node, fmt: &mut dyn Renderer) {
        let mut attrs = node.attrs.clone();
        attrs.push(("href", self.href.clone()));

        fmt.open("a", &attrs);
        match &self.label {
            LinkLabel::Markup(markup) => fmt.text_raw(markup),
            LinkLabel::Text(text) => fmt.text(text),
        }
        fmt.close("a");
    }
}

/// Build the link node for a wikilink (or for an embed falling back to link
/// rendering). The label is all fields after the target rejoined on `|`, or
/// the raw target when no label was given.
pub(crate) fn build_page_link(
    md: &MarkdownIt,
    parts: &[&str],
    raw_target: &str,
    options: &PageLinkOptions,
) -> Node {
    let label = if parts.len() > 1 {
        parts[1..].join("|")
    } else {
        raw_target.to_owned()
    };

    let processed_target = normalize_path(&options.post_process_target.apply(raw_target));
    let processed_label = options.post_process_label.apply(&label);

    let base_url = if options.force_absolute {
        &options.absolute_base_url
    } else {
        &options.relative_base_url
    };
    let href = join_url(
        &[
            base_url.as_str(),
            processed_target.as_str(),
            options.uri_suffix.as_str(),
        ],
        &JoinOptions {
            leading_slash: options.force_absolute,
            trailing_slash: false,
        },
    );

    let label = if options.allow_label_formatting {
        LinkLabel::Markup(render_inline_markup(md, &processed_label))
    } else {
        LinkLabel::Text(processed_label)
    };

    Node::new(PageLink { href, label })
}

/// Render a label as inline markup with the host parser. A single-line label
/// parses to one paragraph; unwrapping it leaves just the inline markup.
fn render_inline_markup(md: &MarkdownIt, label: &str) -> String {
    let html = md.parse(label).render();
    let html = html.trim_end_matches('\n');
    html.strip_prefix("<p>")
        .and_then(|unwrapped| unwrapped.strip_suffix("</p>"))
        .unwrap_or(html)
        .to_owned()
}
