use crate::{
    diagnostics::{Diagnostics, LogDiagnostics},
    embed::{Dimensions, EmbedKind},
    urls::{normalize_absolute_url, normalize_relative_url},
};
use markdown_it::parser::extset::MarkdownItExt;
use smart_default::SmartDefault;
use std::{fmt, mem, sync::Arc};

/// Rewrites a raw target, label or alt text before it is used.
#[derive(Clone)]
pub struct PostProcess(Arc<dyn Fn(&str) -> String + Send + Sync>);

impl PostProcess {
    pub fn new(hook: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        Self(Arc::new(hook))
    }

    /// Trims surrounding whitespace.
    pub fn trim() -> Self {
        Self::new(|input| input.trim().to_owned())
    }

    /// Returns the input unchanged.
    pub fn passthrough() -> Self {
        Self::new(str::to_owned)
    }

    pub(crate) fn apply(&self, input: &str) -> String {
        (self.0)(input)
    }
}

impl fmt::Debug for PostProcess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PostProcess(..)")
    }
}

/// Everything an attribute hook may look at when computing extra `<img>`
/// attributes for one embed.
#[derive(Debug)]
pub struct AttributeContext<'a> {
    /// The computed `src` URL.
    pub url: &'a str,
    /// The resolved alt text, if any.
    pub alt_text: Option<&'a str>,
    /// Display dimensions, if the embed carried a `WxH` field.
    pub dimensions: Option<&'a Dimensions>,
    pub kind: EmbedKind,
}

/// Computes extra `<img>` attributes from the embed context.
#[derive(Clone)]
pub struct AttributeHook(Arc<dyn Fn(&AttributeContext<'_>) -> Vec<(String, String)> + Send + Sync>);

impl AttributeHook {
    pub fn new(
        hook: impl Fn(&AttributeContext<'_>) -> Vec<(String, String)> + Send + Sync + 'static,
    ) -> Self {
        Self(Arc::new(hook))
    }

    pub(crate) fn apply(&self, context: &AttributeContext<'_>) -> Vec<(String, String)> {
        (self.0)(context)
    }
}

impl fmt::Debug for AttributeHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AttributeHook(..)")
    }
}

/// Extra attributes to add to every `<img>`, excluding computed `src`/`alt`
/// unless they are deliberately overridden.
#[derive(Debug, Clone)]
pub enum ExtraAttributes {
    /// A fixed attribute list.
    Static(Vec<(String, String)>),
    /// Computed per embed.
    Compute(AttributeHook),
}

impl Default for ExtraAttributes {
    fn default() -> Self {
        Self::Static(Vec::new())
    }
}

/// Alt text policy for image embeds whose markdown carries no alt text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DefaultAltText {
    /// Emit no alt attribute at all.
    #[default]
    Disabled,
    /// Use the image filename with its extension stripped.
    Filename,
    /// Use this fixed text; the empty string yields an explicit `alt=""`.
    Text(String),
}

/// Options for `[[some page]]` wikilinks.
#[derive(Debug, Clone, SmartDefault)]
pub struct PageLinkOptions {
    /// Base URL used when links are forced absolute.
    #[default("/")]
    pub absolute_base_url: String,
    /// Base URL used otherwise.
    #[default("./")]
    pub relative_base_url: String,
    /// Make every page link absolute.
    pub force_absolute: bool,
    /// Suffix appended to the link target, like `.html` or `?v=1`.
    pub uri_suffix: String,
    /// Rewrites the raw target (the part before the first pipe).
    #[default(PostProcess::trim())]
    pub post_process_target: PostProcess,
    /// Rewrites the label (the part after the first pipe).
    #[default(PostProcess::trim())]
    pub post_process_label: PostProcess,
    /// Allow markdown formatting like bold/italic in link labels.
    #[default(true)]
    pub allow_label_formatting: bool,
}

/// Options for `![[image.png]]` embeds.
#[derive(Debug, Clone, SmartDefault)]
pub struct ImageEmbedOptions {
    /// Base URL used when image URLs are forced absolute.
    #[default("/")]
    pub absolute_base_url: String,
    /// Base URL used otherwise.
    #[default("./")]
    pub relative_base_url: String,
    /// Make every image URL absolute.
    pub force_absolute: bool,
    /// Suffix appended to the image URL, like `?v=123`.
    pub uri_suffix: String,
    /// Rewrites the image target; the default trims it and makes each path
    /// segment filesystem-safe.
    #[default(default_image_target())]
    pub post_process_target: PostProcess,
    /// Rewrites resolved alt text. The default leaves it untouched.
    #[default(PostProcess::passthrough())]
    pub post_process_alt_text: PostProcess,
    /// File extensions treated as embeddable images. Entries are matched
    /// case-insensitively; anything else renders as a plain wikilink.
    #[default(default_image_file_ext())]
    pub image_file_ext: Vec<String>,
    /// What to use as alt text when the markdown has none.
    pub default_alt_text: DefaultAltText,
    /// Extra attributes for the `<img>` tag.
    pub extra_attributes: ExtraAttributes,
}

/// Plugin configuration: one profile per construct, plus the warning sink.
/// Normalized once at registration and read-only afterwards.
#[derive(Debug, Clone, SmartDefault)]
pub struct WikilinksOptions {
    pub page_link: PageLinkOptions,
    pub image_embed: ImageEmbedOptions,
    #[default(Arc::new(LogDiagnostics))]
    pub diagnostics: Arc<dyn Diagnostics>,
}

impl MarkdownItExt for WikilinksOptions {}

impl WikilinksOptions {
    /// Bring user-supplied base URLs and extension entries into canonical
    /// shape. Runs once, before the options are stored in the parser.
    pub(crate) fn normalize(&mut self) {
        self.page_link.absolute_base_url = normalize_absolute_url(&self.page_link.absolute_base_url);
        self.page_link.relative_base_url = normalize_relative_url(&self.page_link.relative_base_url);
        self.image_embed.absolute_base_url =
            normalize_absolute_url(&self.image_embed.absolute_base_url);
        self.image_embed.relative_base_url =
            normalize_relative_url(&self.image_embed.relative_base_url);

        let entries = mem::take(&mut self.image_embed.image_file_ext);
        self.image_embed.image_file_ext = entries
            .into_iter()
            .filter_map(|entry| {
                let lowered = entry.to_ascii_lowercase();
                let trimmed = lowered.trim();
                let normalized = trimmed.strip_prefix('.').unwrap_or(trimmed);
                if normalized.is_empty() {
                    self.diagnostics
                        .warn(&format!("ignoring unusable image file extension {entry:?}"));
                    None
                } else {
                    Some(normalized.to_owned())
                }
            })
            .collect();
    }
}

fn default_image_target() -> PostProcess {
    PostProcess::new(|target| {
        target
            .trim()
            .split('/')
            .map(sanitize_filename::sanitize)
            .collect::<Vec<_>>()
            .join("/")
    })
}

fn default_image_file_ext() -> Vec<String> {
    ["bmp", "gif", "jpeg", "jpg", "png", "svg", "webp"]
        .into_iter()
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::Mutex;

    /// Captures warnings for assertions instead of logging them.
    #[derive(Debug, Default)]
    struct CapturedWarnings(Mutex<Vec<String>>);

    impl Diagnostics for CapturedWarnings {
        fn warn(&self, message: &str) {
            if let Ok(mut messages) = self.0.lock() {
                messages.push(message.to_owned());
            }
        }
    }

    #[test]
    fn base_urls_are_normalized_once() {
        let mut options = WikilinksOptions {
            page_link: PageLinkOptions {
                absolute_base_url: "blog//posts/../".to_owned(),
                relative_base_url: "/notes".to_owned(),
                ..Default::default()
            },
            ..Default::default()
        };
        options.normalize();
        assert_eq!(options.page_link.absolute_base_url, "/blog/");
        assert_eq!(options.page_link.relative_base_url, "notes/");
        assert_eq!(options.image_embed.absolute_base_url, "/");
        assert_eq!(options.image_embed.relative_base_url, "./");
    }

    #[test]
    fn extension_entries_are_canonicalized() {
        let mut options = WikilinksOptions {
            image_embed: ImageEmbedOptions {
                image_file_ext: vec![" .PNG ".to_owned(), "Jpg".to_owned()],
                ..Default::default()
            },
            ..Default::default()
        };
        options.normalize();
        assert_eq!(
            options.image_embed.image_file_ext,
            vec!["png".to_owned(), "jpg".to_owned()]
        );
    }

    #[test]
    fn degenerate_extension_entries_warn_and_drop() {
        let warnings = Arc::new(CapturedWarnings::default());
        let mut options = WikilinksOptions {
            image_embed: ImageEmbedOptions {
                image_file_ext: vec![".".to_owned(), "png".to_owned(), "  ".to_owned()],
                ..Default::default()
            },
            diagnostics: warnings.clone(),
            ..Default::default()
        };
        options.normalize();
        assert_eq!(options.image_embed.image_file_ext, vec!["png".to_owned()]);
        let captured = warnings.0.lock().map(|m| m.len()).unwrap_or_default();
        assert_eq!(captured, 2);
    }

    #[test]
    fn default_image_target_sanitizes_each_segment() {
        let hook = default_image_target();
        assert_eq!(hook.apply("  pics/cat.png "), "pics/cat.png");
        assert_eq!(hook.apply("a:b/c.png"), "ab/c.png");
    }
}
