//! Naming convention for uploaded accommodation images.
//!
//! Convention: `accommodations/{accommodation_id}/images/{slug}-{hex8}{.ext}`
//!
//! - `slug` = slugified stem of the uploaded file name
//! - `hex8` = first 8 hex digits of a random UUID, so re-uploads never collide
//! - `.ext` = original extension, lowercased

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

/// Image extensions accepted for upload (lowercase, without the dot).
pub const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif"];

/// Stem used when the uploaded name has no slug-able characters.
const FALLBACK_SLUG: &str = "image";

/// Length of the random suffix.
pub const UNIQUE_SUFFIX_LEN: usize = 8;

static NON_SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("valid regex"));
static SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-\s]+").expect("valid regex"));

/// Lowercase ASCII slug: non-word characters removed, runs of spaces and
/// hyphens collapsed to one hyphen, leading/trailing `-` and `_` trimmed.
///
/// Non-ASCII characters are dropped.
///
/// ```
/// use lodging_core::image_naming::slugify;
///
/// assert_eq!(slugify("Pool View (1)"), "pool-view-1");
/// assert_eq!(slugify("  --Sunset__ "), "sunset");
/// ```
pub fn slugify(value: &str) -> String {
    let ascii: String = value.chars().filter(char::is_ascii).collect();
    let lowered = ascii.to_lowercase();
    let stripped = NON_SLUG_RE.replace_all(&lowered, "");
    let collapsed = SEPARATOR_RE.replace_all(&stripped, "-");
    collapsed.trim_matches(|c| c == '-' || c == '_').to_string()
}

/// Directory (relative to the media root) holding one accommodation's images.
pub fn image_directory(accommodation_id: &str) -> String {
    format!("accommodations/{accommodation_id}/images/")
}

/// Split an uploaded file name into its slug and lowercased extension.
///
/// The extension includes the leading dot and may be empty.
fn slug_and_extension(original_name: &str) -> (String, String) {
    let file_name = Path::new(original_name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(original_name);
    let path = Path::new(file_name);

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default();
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");

    let slug = slugify(stem);
    let slug = if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    };
    (slug, ext)
}

/// Stored file name for an upload, given an explicit unique suffix.
pub fn image_file_name(original_name: &str, unique: &str) -> String {
    let (slug, ext) = slug_and_extension(original_name);
    format!("{slug}-{unique}{ext}")
}

/// Random 8-hex-digit suffix.
pub fn unique_suffix() -> String {
    let mut hex = uuid::Uuid::new_v4().simple().to_string();
    hex.truncate(UNIQUE_SUFFIX_LEN);
    hex
}

/// Full relative storage path for a new upload.
pub fn image_upload_path(accommodation_id: &str, original_name: &str) -> String {
    format!(
        "{}{}",
        image_directory(accommodation_id),
        image_file_name(original_name, &unique_suffix())
    )
}

/// Reject uploads whose extension is not an accepted image type.
pub fn validate_image_extension(original_name: &str) -> Result<(), CoreError> {
    let (_, ext) = slug_and_extension(original_name);
    let bare = ext.trim_start_matches('.');
    if ALLOWED_IMAGE_EXTENSIONS.contains(&bare) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Unsupported image format '{ext}'. Supported: {}",
            ALLOWED_IMAGE_EXTENSIONS.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_basic() {
        assert_eq!(slugify("Hello World"), "hello-world");
    }

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("a  -- b"), "a-b");
    }

    #[test]
    fn slugify_keeps_underscores_inside() {
        assert_eq!(slugify("front_door"), "front_door");
    }

    #[test]
    fn slugify_drops_non_ascii() {
        assert_eq!(slugify("Café Olé"), "caf-ol");
    }

    #[test]
    fn file_name_lowercases_extension() {
        assert_eq!(
            image_file_name("Pool View.JPG", "1a2b3c4d"),
            "pool-view-1a2b3c4d.jpg"
        );
    }

    #[test]
    fn file_name_keeps_inner_dots_in_stem() {
        assert_eq!(
            image_file_name("photo.final.png", "00ff00ff"),
            "photofinal-00ff00ff.png"
        );
    }

    #[test]
    fn file_name_strips_client_directories() {
        assert_eq!(
            image_file_name("C:/Users/me/bedroom.webp", "deadbeef"),
            "bedroom-deadbeef.webp"
        );
    }

    #[test]
    fn file_name_falls_back_when_slug_is_empty() {
        assert_eq!(image_file_name("!!!.png", "deadbeef"), "image-deadbeef.png");
    }

    #[test]
    fn unique_suffix_is_eight_hex_digits() {
        let suffix = unique_suffix();
        assert_eq!(suffix.len(), UNIQUE_SUFFIX_LEN);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn upload_path_is_scoped_per_accommodation() {
        let path = image_upload_path("ACC001", "Living Room.jpeg");
        let name = path
            .strip_prefix("accommodations/ACC001/images/")
            .expect("scoped directory");
        let (stem, ext) = name.rsplit_once('.').unwrap();
        assert_eq!(ext, "jpeg");
        let (slug, hex) = stem.rsplit_once('-').unwrap();
        assert_eq!(slug, "living-room");
        assert_eq!(hex.len(), 8);
    }

    #[test]
    fn extension_allow_list() {
        assert!(validate_image_extension("a.JPG").is_ok());
        assert!(validate_image_extension("a.webp").is_ok());
        assert!(validate_image_extension("a.exe").is_err());
        assert!(validate_image_extension("noext").is_err());
    }
}
