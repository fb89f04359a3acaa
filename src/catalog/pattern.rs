use std::sync::LazyLock;

use regex::Regex;

use super::job::{ImageJob, MediaKind};

/// Directory on the site under which every character's assets live
pub const ASSET_ROOT: &str = "/othermedia/web_other/official";

#[expect(clippy::expect_used, reason = "pattern is a literal")]
static ASSET_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/othermedia/web_other/official/([A-Za-z_0-9]+)/(.*)(\.[a-z]+)")
        .expect("asset path pattern is valid")
});

#[expect(clippy::expect_used, reason = "pattern is a literal")]
static IMG_SRC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<img\b[^>]*?\bsrc\s*=\s*["']([^"']+)["']"#).expect("img pattern is valid")
});

/// An image reference from a catalog page, split into its parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRef {
    /// Asset (character) name
    pub name: String,
    /// Path below the asset directory, without extension (e.g. `pixelart/front`)
    pub nested: String,
    /// Extension including the dot (e.g. `.gif`)
    pub extension: String,
}

impl CatalogRef {
    /// Local target: nested directories flattened with `_`, then `<name><ext>`
    pub fn target(&self) -> String {
        flatten_target(&self.nested, &self.name, &self.extension)
    }

    pub fn kind(&self) -> Option<MediaKind> {
        MediaKind::from_extension(&self.extension)
    }

    /// Build a download job if the extension is one we crop
    pub fn into_job(self, source: Option<String>) -> Option<ImageJob> {
        let kind = self.kind()?;
        let target = self.target();
        Some(ImageJob::new(kind, source, target))
    }
}

/// Match an image `src` against the asset path layout
pub fn parse_reference(src: &str) -> Option<CatalogRef> {
    let caps = ASSET_PATH.captures(src)?;
    Some(CatalogRef {
        name: caps[1].to_string(),
        nested: caps[2].to_string(),
        extension: caps[3].to_string(),
    })
}

/// `pixelart/front` + `alice` + `.gif` -> `pixelart_front/alice.gif`
pub fn flatten_target(nested: &str, name: &str, extension: &str) -> String {
    format!("{}/{}{}", nested.replace('/', "_"), name, extension)
}

/// All `src` attributes of `<img>` tags in an HTML document
pub fn image_sources(html: &str) -> impl Iterator<Item = &str> {
    IMG_SRC
        .captures_iter(html)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reference() {
        let r = parse_reference(
            "https://worldflipper.jp/othermedia/web_other/official/alice_01/pixelart/front.gif",
        )
        .unwrap();

        assert_eq!(r.name, "alice_01");
        assert_eq!(r.nested, "pixelart/front");
        assert_eq!(r.extension, ".gif");
        assert_eq!(r.target(), "pixelart_front/alice_01.gif");
        assert_eq!(r.kind(), Some(MediaKind::Animation));
    }

    #[test]
    fn test_parse_relative_reference() {
        let r = parse_reference("/othermedia/web_other/official/bob/square_0.png").unwrap();
        assert_eq!(r.target(), "square_0/bob.png");
        assert_eq!(r.kind(), Some(MediaKind::Static));
    }

    #[test]
    fn test_non_matching_references_are_skipped() {
        assert!(parse_reference("/img/logo.png").is_none());
        assert!(parse_reference("/othermedia/web_other/official/bad-name/x.png").is_none());
        assert!(parse_reference("/othermedia/web_other/official/bob/noext").is_none());
    }

    #[test]
    fn test_unsupported_extension_has_no_job() {
        let r = parse_reference("/othermedia/web_other/official/bob/thumb.jpeg").unwrap();
        assert_eq!(r.name, "bob");
        assert!(r.into_job(None).is_none());
    }

    #[test]
    fn test_image_sources() {
        let html = r#"
            <div><img class="icon" src="/othermedia/web_other/official/a/square_0.png" alt=""></div>
            <IMG SRC='/b.gif'>
            <a href="/not/an/image.png">link</a>
            <img alt="no source">
        "#;
        let sources: Vec<_> = image_sources(html).collect();
        assert_eq!(
            sources,
            vec!["/othermedia/web_other/official/a/square_0.png", "/b.gif"]
        );
    }
}
