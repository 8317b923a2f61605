//! The inline rules that recognize `[[...]]` and `![[...]]`.
//!
//! markdown-it dispatches inline rules per marker character, so the embed
//! form (starting at `!`) and the link form (starting at `[`) register as
//! two scanners sharing one scan routine.

use crate::{
    embed::{classify_embed, EmbedKind},
    image_embed::build_image_embed,
    options::WikilinksOptions,
    page_link::build_page_link,
};
use markdown_it::{
    parser::inline::{InlineRule, InlineState},
    Node,
};

const LINK_OPENER: &str = "[[";
const EMBED_OPENER: &str = "![[";
const CLOSER: &str = "]]";

/// Scans `[[target|label]]` page links.
pub struct WikilinkScanner;

impl InlineRule for WikilinkScanner {
    const MARKER: char = '[';

    // Matching requires emitting nodes, which a probe forbids, so this
    // construct never matches in silent mode.
    fn check(_: &mut InlineState) -> Option<usize> {
        None
    }

    fn run(state: &mut InlineState) -> Option<(Node, usize)> {
        scan(state, false)
    }
}

/// Scans `![[target|label|WxH]]` embeds. Targets that do not classify as an
/// embeddable image fall back to link rendering, consuming the `!` as well.
pub struct EmbedScanner;

impl InlineRule for EmbedScanner {
    const MARKER: char = '!';

    fn check(_: &mut InlineState) -> Option<usize> {
        None
    }

    fn run(state: &mut InlineState) -> Option<(Node, usize)> {
        scan(state, true)
    }
}

/// Find the delimiter pair, split the interior on `|` and dispatch to link
/// or image handling. Declines (no node, cursor untouched) when the opener
/// is absent, the closer is missing within the inline run, or the interior
/// is empty after trimming.
fn scan(state: &mut InlineState, embed: bool) -> Option<(Node, usize)> {
    let opener = if embed { EMBED_OPENER } else { LINK_OPENER };
    let input = &state.src[state.pos..state.pos_max];
    if !input.starts_with(opener) {
        return None;
    }

    let inner_start = opener.len();
    let close = input[inner_start..].find(CLOSER)? + inner_start;
    let inner = input[inner_start..close].trim();
    if inner.is_empty() {
        return None;
    }
    let length = close + CLOSER.len();

    let md = state.md;
    let options = md.ext.get::<WikilinksOptions>()?;

    let parts: Vec<&str> = inner.split('|').collect();
    let raw_target = parts[0].trim();

    let kind = if embed {
        classify_embed(raw_target, &options.image_embed)
    } else {
        EmbedKind::Link
    };
    let node = match kind {
        EmbedKind::Image => build_image_embed(&parts, raw_target, &options.image_embed),
        EmbedKind::Link => build_page_link(md, &parts, raw_target, &options.page_link),
    };
    Some((node, length))
}
