//! Allow-list validation for user-supplied image URLs and upload names.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// Base name of a servable image: no dots, no separators.
static IMAGE_FILE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_-]+\.(?i:png|jpg|jpeg)$").expect("Invalid image file name regex")
});

static UPLOAD_FILE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.-]+$").expect("Invalid upload name regex"));

const UPLOAD_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Names of the shared placeholder images; no upload may borrow them.
const RESERVED_UPLOAD_STEMS: &[&str] = &["default_recipe", "default_user"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageUrlRejection {
    #[error("image url is empty")]
    Empty,

    #[error("scheme {0} is not allowed")]
    BlockedScheme(&'static str),

    #[error("event handler {0} is not allowed")]
    EventHandler(&'static str),

    #[error("image must live under an allowed static directory")]
    OutsideAllowedRoots,

    #[error("path traversal is not allowed")]
    PathTraversal,

    #[error("path is too deep")]
    TooDeep,

    #[error("file name must be letters, digits, '_' or '-' with a png, jpg or jpeg extension")]
    BadFileName,
}

/// Which image URLs a client may store.
///
/// Checks run in a fixed order and the first failure wins: empty, blocked
/// scheme, event-handler token, allowed root, `..`, depth, file name. Scheme
/// and handler matching is case-insensitive and looks anywhere in the URL.
#[derive(Debug, Clone)]
pub struct ImageUrlPolicy {
    blocked_schemes: Vec<&'static str>,
    blocked_handlers: Vec<&'static str>,
    allowed_roots: Vec<&'static str>,
    max_slashes: usize,
}

impl Default for ImageUrlPolicy {
    fn default() -> Self {
        Self {
            blocked_schemes: vec!["javascript:", "data:", "vbscript:", "file:"],
            blocked_handlers: vec!["onerror", "onload", "onclick", "onmouseover"],
            allowed_roots: vec!["/static/img/", "/static/uploads/"],
            max_slashes: 4,
        }
    }
}

impl ImageUrlPolicy {
    pub fn validate(&self, url: &str) -> Result<(), ImageUrlRejection> {
        if url.trim().is_empty() {
            return Err(ImageUrlRejection::Empty);
        }

        let lower = url.to_ascii_lowercase();
        if let Some(scheme) = self.blocked_schemes.iter().find(|s| lower.contains(**s)) {
            return Err(ImageUrlRejection::BlockedScheme(scheme));
        }
        if let Some(handler) = self.blocked_handlers.iter().find(|h| lower.contains(**h)) {
            return Err(ImageUrlRejection::EventHandler(handler));
        }

        let Some(file_name) = self
            .allowed_roots
            .iter()
            .find_map(|root| url.strip_prefix(root))
        else {
            return Err(ImageUrlRejection::OutsideAllowedRoots);
        };

        if url.contains("..") {
            return Err(ImageUrlRejection::PathTraversal);
        }
        if url.matches('/').count() > self.max_slashes {
            return Err(ImageUrlRejection::TooDeep);
        }
        if !IMAGE_FILE_NAME.is_match(file_name) {
            return Err(ImageUrlRejection::BadFileName);
        }

        Ok(())
    }

}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadNameRejection {
    #[error("Invalid filename")]
    InvalidName,

    #[error("Only .png, .jpg and .jpeg files are allowed")]
    UnsupportedExtension,

    #[error("That filename is reserved")]
    Reserved,
}

/// Check a client-supplied upload name and return its extension, lowercased.
/// The name itself is never used on disk.
pub fn validate_upload_filename(name: &str) -> Result<&'static str, UploadNameRejection> {
    if !UPLOAD_FILE_NAME.is_match(name) {
        return Err(UploadNameRejection::InvalidName);
    }
    let lower = name.to_ascii_lowercase();
    if RESERVED_UPLOAD_STEMS.iter().any(|stem| lower.contains(stem)) {
        return Err(UploadNameRejection::Reserved);
    }
    let extension = lower
        .rsplit_once('.')
        .and_then(|(_, ext)| UPLOAD_EXTENSIONS.iter().copied().find(|allowed| *allowed == ext))
        .ok_or(UploadNameRejection::UnsupportedExtension)?;
    Ok(extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(url: &str) -> Result<(), ImageUrlRejection> {
        ImageUrlPolicy::default().validate(url)
    }

    #[test]
    fn test_accepts_static_images() {
        assert_eq!(check("/static/img/default_user.png"), Ok(()));
        assert_eq!(check("/static/uploads/my-photo_2.jpeg"), Ok(()));
        assert_eq!(check("/static/uploads/a.JPG"), Ok(()));
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(check(""), Err(ImageUrlRejection::Empty));
        assert_eq!(check("   "), Err(ImageUrlRejection::Empty));
    }

    #[test]
    fn test_rejects_dangerous_schemes_in_any_case() {
        assert_eq!(
            check("javascript:alert('XSS')"),
            Err(ImageUrlRejection::BlockedScheme("javascript:"))
        );
        assert_eq!(
            check("JaVaScRiPt:alert(1)"),
            Err(ImageUrlRejection::BlockedScheme("javascript:"))
        );
        assert_eq!(
            check("data:text/html,<script>alert('XSS')</script>"),
            Err(ImageUrlRejection::BlockedScheme("data:"))
        );
        assert_eq!(
            check("vbscript:msgbox(1)"),
            Err(ImageUrlRejection::BlockedScheme("vbscript:"))
        );
        assert_eq!(
            check("file:///etc/passwd"),
            Err(ImageUrlRejection::BlockedScheme("file:"))
        );
    }

    #[test]
    fn test_scheme_wins_over_later_checks() {
        assert_eq!(
            check("/static/img/javascript:x.png"),
            Err(ImageUrlRejection::BlockedScheme("javascript:"))
        );
    }

    #[test]
    fn test_rejects_event_handlers() {
        assert_eq!(
            check("/static/img/x.png\" onerror=\"alert(1)"),
            Err(ImageUrlRejection::EventHandler("onerror"))
        );
        assert_eq!(
            check("/static/img/ONLOAD.png"),
            Err(ImageUrlRejection::EventHandler("onload"))
        );
    }

    #[test]
    fn test_rejects_foreign_locations() {
        assert_eq!(
            check("https://evil.example/x.png"),
            Err(ImageUrlRejection::OutsideAllowedRoots)
        );
        assert_eq!(
            check("/static/js/app.png"),
            Err(ImageUrlRejection::OutsideAllowedRoots)
        );
        assert_eq!(
            check("/static/../etc/passwd"),
            Err(ImageUrlRejection::OutsideAllowedRoots)
        );
    }

    #[test]
    fn test_rejects_traversal() {
        assert_eq!(
            check("/static/img/../../etc/passwd"),
            Err(ImageUrlRejection::PathTraversal)
        );
        assert_eq!(
            check("/static/uploads/..%2f..png"),
            Err(ImageUrlRejection::PathTraversal)
        );
    }

    #[test]
    fn test_rejects_deep_paths() {
        assert_eq!(
            check("/static/uploads/a/b/c.png"),
            Err(ImageUrlRejection::TooDeep)
        );
    }

    #[test]
    fn test_rejects_bad_file_names() {
        assert_eq!(
            check("/static/img/sub/x.png"),
            Err(ImageUrlRejection::BadFileName)
        );
        assert_eq!(check("/static/img/x.gif"), Err(ImageUrlRejection::BadFileName));
        assert_eq!(check("/static/img/x.png.js"), Err(ImageUrlRejection::BadFileName));
        assert_eq!(check("/static/img/.png"), Err(ImageUrlRejection::BadFileName));
    }

    #[test]
    fn test_upload_filename() {
        assert_eq!(validate_upload_filename("pie.v2.PNG"), Ok("png"));
        assert_eq!(validate_upload_filename("crumb.jpeg"), Ok("jpeg"));
        assert_eq!(
            validate_upload_filename("noext"),
            Err(UploadNameRejection::UnsupportedExtension)
        );
        assert_eq!(
            validate_upload_filename("../evil.png"),
            Err(UploadNameRejection::InvalidName)
        );
        assert_eq!(
            validate_upload_filename("shell.php"),
            Err(UploadNameRejection::UnsupportedExtension)
        );
        assert_eq!(validate_upload_filename(""), Err(UploadNameRejection::InvalidName));
    }

    #[test]
    fn test_upload_filename_cannot_borrow_placeholders() {
        for name in ["default_recipe.png", "evil_default_recipe.png", "Default_User.JPG"] {
            assert_eq!(
                validate_upload_filename(name),
                Err(UploadNameRejection::Reserved),
                "{name}"
            );
        }
    }
}
