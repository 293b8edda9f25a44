//! Upload inspection: what kind of image a byte stream holds.

use tracing::debug;

use crate::errors::ValidationErrors;

/// Image formats recognised from their leading bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
    Gif,
    Bmp,
    Webp,
}

/// Extensions accepted for product images, as shown to users.
pub const ACCEPTED_TYPES: &str = "jpeg, jpg, png";

impl ImageKind {
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        const PNG: &[u8] = b"\x89PNG\r\n\x1a\n";
        if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(Self::Jpeg)
        } else if bytes.starts_with(PNG) {
            Some(Self::Png)
        } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            Some(Self::Gif)
        } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
            Some(Self::Webp)
        } else if bytes.len() >= 14 && bytes.starts_with(b"BM") {
            Some(Self::Bmp)
        } else {
            None
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Gif => "gif",
            Self::Bmp => "bmp",
            Self::Webp => "webp",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
            Self::Webp => "image/webp",
        }
    }

    /// Product images are limited to jpeg and png.
    pub fn is_accepted(self) -> bool {
        matches!(self, Self::Jpeg | Self::Png)
    }
}

/// A file part taken from a multipart submission.
#[derive(Clone, Debug, Default)]
pub struct UploadedImage {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedImage {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self { bytes: bytes.into(), ..Self::default() }
    }

    /// Browsers send an empty part when no file was picked.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The client declared a media type that the bytes do not carry.
    pub fn declares_other_than(&self, kind: ImageKind) -> bool {
        match self.content_type.as_deref().map(str::to_ascii_lowercase) {
            None => false,
            Some(declared) if declared == "image/jpg" => kind != ImageKind::Jpeg,
            Some(declared) => declared != kind.mime(),
        }
    }
}

/// Check an upload against the image rules, collecting every failing rule.
///
/// Returns the sniffed kind when the upload is acceptable, `None` when no
/// upload was given and none is required.
pub fn check_image(
    image: Option<&UploadedImage>,
    required: bool,
    max_bytes: u64,
    errors: &mut ValidationErrors,
) -> Option<ImageKind> {
    let image = match image.filter(|i| !i.is_empty()) {
        Some(i) => i,
        None => {
            if required {
                errors.add("image", "The image field is required.");
            }
            return None;
        }
    };

    let before = errors.len();
    let kind = ImageKind::sniff(&image.bytes);
    // Content decides; the client's labels are only logged.
    if kind.map_or(true, |k| image.declares_other_than(k)) {
        debug!(
            file_name = image.file_name.as_deref().unwrap_or(""),
            declared = image.content_type.as_deref().unwrap_or(""),
            sniffed = kind.map(ImageKind::mime).unwrap_or("unknown"),
            "upload type differs from its declared type"
        );
    }
    match kind {
        None => {
            errors.add("image", "The image field must be an image.");
            errors.add("image", format!("The image field must be a file of type: {ACCEPTED_TYPES}."));
        }
        Some(k) if !k.is_accepted() => {
            errors.add("image", format!("The image field must be a file of type: {ACCEPTED_TYPES}."));
        }
        Some(_) => {}
    }
    if image.bytes.len() as u64 > max_bytes {
        errors.add(
            "image",
            format!("The image field must not be greater than {} kilobytes.", max_bytes / 1024),
        );
    }
    if errors.len() > before { None } else { kind }
}

#[cfg(test)]
pub(crate) mod fixtures {
    /// Smallest byte strings the sniffer recognises.
    pub fn png() -> Vec<u8> {
        let mut v = b"\x89PNG\r\n\x1a\n".to_vec();
        v.extend_from_slice(&[0, 0, 0, 13, b'I', b'H', b'D', b'R']);
        v
    }

    pub fn jpeg() -> Vec<u8> {
        vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00]
    }

    pub fn gif() -> Vec<u8> {
        b"GIF89a\x01\x00\x01\x00".to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    const MAX: u64 = 2048 * 1024;

    #[test]
    fn sniffs_known_signatures() {
        assert_eq!(ImageKind::sniff(&png()), Some(ImageKind::Png));
        assert_eq!(ImageKind::sniff(&jpeg()), Some(ImageKind::Jpeg));
        assert_eq!(ImageKind::sniff(&gif()), Some(ImageKind::Gif));
        assert_eq!(ImageKind::sniff(b"RIFF\x00\x00\x00\x00WEBPVP8 "), Some(ImageKind::Webp));
        assert_eq!(ImageKind::sniff(b"hello world"), None);
        assert_eq!(ImageKind::sniff(b""), None);
    }

    #[test]
    fn accepts_png_and_jpeg() {
        let mut errs = ValidationErrors::new();
        assert_eq!(check_image(Some(&UploadedImage::new(png())), true, MAX, &mut errs), Some(ImageKind::Png));
        assert_eq!(check_image(Some(&UploadedImage::new(jpeg())), true, MAX, &mut errs), Some(ImageKind::Jpeg));
        assert!(errs.is_empty());
    }

    #[test]
    fn declared_type_is_compared_with_content() {
        let labelled = |ct: Option<&str>| UploadedImage {
            file_name: Some("pic.png".into()),
            content_type: ct.map(str::to_owned),
            bytes: png(),
        };
        assert!(!labelled(None).declares_other_than(ImageKind::Png));
        assert!(!labelled(Some("image/png")).declares_other_than(ImageKind::Png));
        assert!(!labelled(Some("IMAGE/JPG")).declares_other_than(ImageKind::Jpeg));
        assert!(labelled(Some("image/gif")).declares_other_than(ImageKind::Png));

        // a mislabelled png is still accepted on its bytes
        let mut errs = ValidationErrors::new();
        assert_eq!(check_image(Some(&labelled(Some("image/gif"))), true, MAX, &mut errs), Some(ImageKind::Png));
        assert!(errs.is_empty());
    }

    #[test]
    fn missing_image_only_fails_when_required() {
        let mut errs = ValidationErrors::new();
        assert_eq!(check_image(None, false, MAX, &mut errs), None);
        assert_eq!(check_image(Some(&UploadedImage::default()), false, MAX, &mut errs), None);
        assert!(errs.is_empty());

        check_image(Some(&UploadedImage::default()), true, MAX, &mut errs);
        assert_eq!(errs.messages("image"), vec!["The image field is required."]);
    }

    #[test]
    fn rejects_non_images_and_other_formats() {
        let mut errs = ValidationErrors::new();
        assert!(check_image(Some(&UploadedImage::new(b"plain text".to_vec())), true, MAX, &mut errs).is_none());
        assert_eq!(errs.messages("image").len(), 2);

        let mut errs = ValidationErrors::new();
        assert!(check_image(Some(&UploadedImage::new(gif())), true, MAX, &mut errs).is_none());
        assert_eq!(errs.messages("image"), vec!["The image field must be a file of type: jpeg, jpg, png."]);
    }

    #[test]
    fn rejects_oversized_upload() {
        let mut big = png();
        big.resize(MAX as usize + 1, 0);
        let mut errs = ValidationErrors::new();
        assert!(check_image(Some(&UploadedImage::new(big.clone())), true, MAX, &mut errs).is_none());
        assert_eq!(errs.messages("image"), vec!["The image field must not be greater than 2048 kilobytes."]);

        // exactly at the limit is fine
        big.truncate(MAX as usize);
        let mut errs = ValidationErrors::new();
        assert!(check_image(Some(&UploadedImage::new(big)), true, MAX, &mut errs).is_some());
    }
}
