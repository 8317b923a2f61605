//! Embed classification and image-embed field resolution.

use crate::options::{DefaultAltText, ImageEmbedOptions};

/// What an embed target resolves to. Targets whose extension is not in the
/// image allow-list render as plain wikilinks even under `![[...]]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedKind {
    Image,
    Link,
}

/// Display dimensions from a trailing `WxH` field, both sides numeric.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimensions {
    pub width: String,
    pub height: String,
}

impl Dimensions {
    pub(crate) fn to_style(&self) -> String {
        format!("width: {}px; height: {}px;", self.width, self.height)
    }
}

/// Alt text and dimensions recovered from the pipe-split fields of an
/// image embed.
pub(crate) struct ImageFields {
    pub alt_text: Option<String>,
    pub dimensions: Option<Dimensions>,
}

/// Decide whether an embed target is an image by its file extension.
pub(crate) fn classify_embed(raw_target: &str, options: &ImageEmbedOptions) -> EmbedKind {
    match file_extension(raw_target) {
        Some(extension) if options.image_file_ext.contains(&extension) => EmbedKind::Image,
        _ => EmbedKind::Link,
    }
}

/// Lower-cased extension of the final path segment. Dotfiles and names with
/// a trailing dot carry no usable extension.
fn file_extension(target: &str) -> Option<String> {
    let file_name = target.rsplit('/').next().unwrap_or(target);
    match file_name.rsplit_once('.') {
        Some((stem, extension)) if !stem.is_empty() && !extension.is_empty() => {
            Some(extension.to_ascii_lowercase())
        }
        _ => None,
    }
}

/// Filename of the target with its extension stripped, for filename-derived
/// alt text.
fn file_stem(target: &str) -> String {
    let file_name = target.rsplit('/').next().unwrap_or(target);
    match file_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_owned(),
        _ => file_name.to_owned(),
    }
}

/// Parse a `WxH` field: a case-insensitive `x` separating exactly two sides
/// that both read as finite numbers.
pub(crate) fn parse_dimensions(field: &str) -> Option<Dimensions> {
    let lowered = field.to_ascii_lowercase();
    let (width, height) = lowered.split_once('x')?;
    if height.contains('x') {
        return None;
    }
    let width = width.trim();
    let height = height.trim();
    let numeric = |side: &str| matches!(side.parse::<f64>(), Ok(n) if n.is_finite());
    if numeric(width) && numeric(height) {
        Some(Dimensions {
            width: width.to_owned(),
            height: height.to_owned(),
        })
    } else {
        None
    }
}

/// Split the fields after the target into alt text and dimensions. Only the
/// last field can be dimensions; everything between it and the target is alt
/// text, rejoined on `|` so alt text may itself contain pipes.
pub(crate) fn resolve_image_fields(parts: &[&str]) -> ImageFields {
    if parts.len() < 2 {
        return ImageFields {
            alt_text: None,
            dimensions: None,
        };
    }
    let last = parts[parts.len() - 1];
    let (alt_fields, dimensions) = match parse_dimensions(last) {
        Some(dimensions) => (&parts[1..parts.len() - 1], Some(dimensions)),
        None => (&parts[1..], None),
    };
    let alt_text = alt_fields.join("|").trim().to_owned();
    ImageFields {
        alt_text: (!alt_text.is_empty()).then_some(alt_text),
        dimensions,
    }
}

/// Resolve the final alt text from the raw alt text and the configured
/// default-alt-text policy. `None` means the attribute is omitted entirely.
pub(crate) fn determine_alt_text(
    raw_alt_text: Option<&str>,
    image_target: &str,
    options: &ImageEmbedOptions,
) -> Option<String> {
    if let Some(raw) = raw_alt_text.filter(|raw| !raw.is_empty()) {
        return Some(options.post_process_alt_text.apply(raw));
    }
    match &options.default_alt_text {
        DefaultAltText::Disabled => None,
        DefaultAltText::Filename => Some(
            options
                .post_process_alt_text
                .apply(&file_stem(image_target)),
        ),
        DefaultAltText::Text(text) if text.is_empty() => Some(String::new()),
        DefaultAltText::Text(text) => Some(options.post_process_alt_text.apply(text)),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::options::PostProcess;

    #[test]
    fn classifies_by_extension_allow_list() {
        let options = ImageEmbedOptions::default();
        assert_eq!(classify_embed("photo.png", &options), EmbedKind::Image);
        assert_eq!(classify_embed("photo.PNG", &options), EmbedKind::Image);
        assert_eq!(classify_embed("pics/photo.webp", &options), EmbedKind::Image);
        assert_eq!(classify_embed("doc.pdf", &options), EmbedKind::Link);
        assert_eq!(classify_embed("no-extension", &options), EmbedKind::Link);
        assert_eq!(classify_embed(".png", &options), EmbedKind::Link);
        assert_eq!(classify_embed("name.", &options), EmbedKind::Link);
    }

    #[test]
    fn dimension_detection() {
        assert!(parse_dimensions("200x200").is_some());
        assert!(parse_dimensions("300X200").is_some());
        assert!(parse_dimensions("1.5x2").is_some());
        assert!(parse_dimensions("200x").is_none());
        assert!(parse_dimensions("x200").is_none());
        assert!(parse_dimensions("abc").is_none());
        assert!(parse_dimensions("1x2x3").is_none());
        assert!(parse_dimensions("").is_none());
    }

    #[test]
    fn dimensions_render_as_inline_style() {
        let dimensions = Dimensions {
            width: "300".to_owned(),
            height: "200".to_owned(),
        };
        assert_eq!(dimensions.to_style(), "width: 300px; height: 200px;");
    }

    #[test]
    fn trailing_dimensions_take_priority_over_alt_text() {
        let fields = resolve_image_fields(&["a.png", "A cat", "300x200"]);
        assert_eq!(fields.alt_text.as_deref(), Some("A cat"));
        assert!(fields.dimensions.is_some());

        let fields = resolve_image_fields(&["a.png", "300x200"]);
        assert_eq!(fields.alt_text, None);
        assert!(fields.dimensions.is_some());
    }

    #[test]
    fn non_dimension_tail_is_alt_text_with_pipes() {
        let fields = resolve_image_fields(&["a.png", "alt", "with", "pipes"]);
        assert_eq!(fields.alt_text.as_deref(), Some("alt|with|pipes"));
        assert!(fields.dimensions.is_none());

        let fields = resolve_image_fields(&["a.png", "one|two", "30x40"]);
        assert_eq!(fields.alt_text.as_deref(), Some("one|two"));
        assert!(fields.dimensions.is_some());
    }

    #[test]
    fn target_alone_has_no_alt_or_dimensions() {
        let fields = resolve_image_fields(&["a.png"]);
        assert_eq!(fields.alt_text, None);
        assert!(fields.dimensions.is_none());
    }

    #[test]
    fn alt_text_prefers_raw_over_policy() {
        let options = ImageEmbedOptions {
            default_alt_text: DefaultAltText::Text("fallback".to_owned()),
            ..Default::default()
        };
        assert_eq!(
            determine_alt_text(Some("A cat"), "photo.png", &options),
            Some("A cat".to_owned())
        );
    }

    #[test]
    fn alt_text_policy_disabled_omits_the_attribute() {
        let options = ImageEmbedOptions::default();
        assert_eq!(determine_alt_text(None, "photo.png", &options), None);
        assert_eq!(determine_alt_text(Some(""), "photo.png", &options), None);
    }

    #[test]
    fn alt_text_policy_filename_strips_the_extension() {
        let options = ImageEmbedOptions {
            default_alt_text: DefaultAltText::Filename,
            ..Default::default()
        };
        assert_eq!(
            determine_alt_text(None, "pics/photo.png", &options),
            Some("photo".to_owned())
        );
        assert_eq!(
            determine_alt_text(None, "archive.tar.gz", &options),
            Some("archive.tar".to_owned())
        );
    }

    #[test]
    fn alt_text_policy_fixed_text_may_be_empty() {
        let options = ImageEmbedOptions {
            default_alt_text: DefaultAltText::Text(String::new()),
            ..Default::default()
        };
        assert_eq!(
            determine_alt_text(None, "photo.png", &options),
            Some(String::new())
        );
    }

    #[test]
    fn alt_text_runs_through_the_post_processing_hook() {
        let options = ImageEmbedOptions {
            default_alt_text: DefaultAltText::Filename,
            post_process_alt_text: PostProcess::new(|alt| alt.to_ascii_uppercase()),
            ..Default::default()
        };
        assert_eq!(
            determine_alt_text(Some("a cat"), "photo.png", &options),
            Some("A CAT".to_owned())
        );
        assert_eq!(
            determine_alt_text(None, "photo.png", &options),
            Some("PHOTO".to_owned())
        );
    }
}
