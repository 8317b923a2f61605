use crate::{
    embed::{determine_alt_text, resolve_image_fields, EmbedKind},
    options::{AttributeContext, ExtraAttributes, ImageEmbedOptions},
    urls::{join_url, normalize_path, JoinOptions},
};
use markdown_it::{Node, NodeValue, Renderer};

/// A resolved `![[image.png|alt|WxH]]` embed, carrying the final ordered
/// attribute list for the `<img>` tag. An absent `alt` entry means the
/// attribute is omitted, not empty.
#[derive(Debug)]
pub struct ImageEmbed {
    pub attrs: Vec<(String, String)>,
}

impl NodeValue for ImageEmbed {
    fn render(&self, node: &Node, fmt: &mut dyn Renderer) {
        let mut attrs: Vec<(&str, String)> = node
            .attrs
            .iter()
            .map(|(name, value)| (*name, value.clone()))
            .collect();
        attrs.extend(
            self.attrs
                .iter()
                .map(|(name, value)| (name.as_str(), value.clone())),
        );
        fmt.self_close("img", &attrs);
    }
}

/// Build the image node: resolve alt text and dimensions from the fields,
/// construct the src URL, then merge extra attributes. Attributes supplied
/// via `extra_attributes` win over computed `src`/`alt`; the dimension style
/// wins over an extra `style`.
pub(crate) fn build_image_embed(
    parts: &[&str],
    raw_target: &str,
    options: &ImageEmbedOptions,
) -> Node {
    let fields = resolve_image_fields(parts);

    let mut image_target = options.post_process_target.apply(raw_target);
    image_target = image_target.replace('\\', "/");
    image_target = normalize_path(&image_target);

    let base_url = if options.force_absolute {
        &options.absolute_base_url
    } else {
        &options.relative_base_url
    };
    let src = join_url(
        &[
            base_url.as_str(),
            image_target.as_str(),
            options.uri_suffix.as_str(),
        ],
        &JoinOptions {
            leading_slash: options.force_absolute,
            trailing_slash: false,
        },
    );

    let alt_text = determine_alt_text(fields.alt_text.as_deref(), raw_target, options)
        .map(|alt| alt.trim().to_owned());

    let extra = match &options.extra_attributes {
        ExtraAttributes::Static(attrs) => attrs.clone(),
        ExtraAttributes::Compute(hook) => hook.apply(&AttributeContext {
            url: &src,
            alt_text: alt_text.as_deref(),
            dimensions: fields.dimensions.as_ref(),
            kind: EmbedKind::Image,
        }),
    };

    let mut attrs: Vec<(String, String)> = vec![("src".to_owned(), src)];
    for (name, value) in extra {
        set_attr(&mut attrs, name, value);
    }
    if let Some(alt) = alt_text {
        if !attrs.iter().any(|(name, _)| name == "alt") {
            attrs.push(("alt".to_owned(), alt));
        }
    }
    if let Some(dimensions) = &fields.dimensions {
        set_attr(&mut attrs, "style".to_owned(), dimensions.to_style());
    }

    Node::new(ImageEmbed { attrs })
}

/// Replace the value of an existing attribute in place, or append it.
fn set_attr(attrs: &mut Vec<(String, String)>, name: String, value: String) {
    match attrs.iter_mut().find(|(existing, _)| *existing == name) {
        Some(attr) => attr.1 = value,
        None => attrs.push((name, value)),
    }
}
