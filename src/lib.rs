//! Wikilink and image embed plugin for [`markdown-it`](https://docs.rs/markdown-it).
//!
//! Adds two inline constructs on top of the host parser:
//!
//! - `[[target]]` / `[[target|label]]` page links,
//! - `![[target]]` / `![[target|alt]]` / `![[target|alt|WxH]]` image embeds.
//!
//! Embed targets are classified by file extension; anything outside the
//! image allow-list (say `![[notes.pdf]]`) renders as a plain wikilink.
//! Base URLs, URI suffixes, post-processing hooks and extra image
//! attributes are configurable per construct via [`WikilinksOptions`].
//!
//! ```
//! let md = &mut markdown_it::MarkdownIt::new();
//! markdown_it::plugins::cmark::add(md);
//! markdown_it_wikilinks::add(md);
//!
//! let html = md.parse("See [[getting-started|the guide]].").render();
//! assert_eq!(html, "<p>See <a href=\"./getting-started\">the guide</a>.</p>\n");
//! ```

use markdown_it::MarkdownIt;

mod diagnostics;
mod embed;
mod image_embed;
mod options;
mod page_link;
mod scanner;
mod urls;

pub use crate::{
    diagnostics::{Diagnostics, LogDiagnostics},
    embed::{Dimensions, EmbedKind},
    image_embed::ImageEmbed,
    options::{
        AttributeContext,
        AttributeHook,
        DefaultAltText,
        ExtraAttributes,
        ImageEmbedOptions,
        PageLinkOptions,
        PostProcess,
        WikilinksOptions,
    },
    page_link::{LinkLabel, PageLink},
    scanner::{EmbedScanner, WikilinkScanner},
};

/// Register the plugin with default options.
pub fn add(md: &mut MarkdownIt) {
    add_with_options(md, WikilinksOptions::default());
}

/// Register the plugin with the given options. Base URLs and the image
/// extension allow-list are normalized here, once; the options are then
/// stored read-only in the parser for the scanners to use.
pub fn add_with_options(md: &mut MarkdownIt, mut options: WikilinksOptions) {
    options.normalize();
    md.ext.insert(options);
    md.inline.add_rule::<WikilinkScanner>();
    md.inline.add_rule::<EmbedScanner>();
}
