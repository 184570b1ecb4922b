//! File name rules: upload allow-list, sanitizing, derived names and MIME
//! guessing.

/// Extensions accepted by upload (compared case-insensitively).
pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg"];

/// Whether `filename` has an extension in [`ALLOWED_EXTENSIONS`].
/// Only the last extension counts.
pub fn allowed_file(filename: &str) -> bool {
    match filename.rsplit_once('.') {
        Some((_, ext)) => {
            let ext = ext.to_ascii_lowercase();
            ALLOWED_EXTENSIONS.contains(&ext.as_str())
        }
        None => false,
    }
}

/// Reduce a client-supplied file name to something safe to store.
///
/// Path separators become whitespace, whitespace runs become a single `_`,
/// everything outside `[A-Za-z0-9_.-]` is dropped and leading/trailing
/// `.`/`_` are trimmed. May return an empty string.
pub fn secure_filename(filename: &str) -> String {
    let spaced = filename.replace(['/', '\\'], " ");
    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");
    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();
    kept.trim_matches(|c| c == '.' || c == '_').to_string()
}

/// Name of the file produced by an edit of `source`, labelled by `option`.
pub fn derived_filename(option: &str, source: &str) -> String {
    format!("edited_{option}_{source}")
}

/// The variant name delete also tries to remove.
///
/// Real derived names carry the option (`edited_<option>_<source>`), so this
/// guess only matches files produced some other way.
pub fn legacy_edited_filename(source: &str) -> String {
    format!("edited_{source}")
}

/// Guess MIME type from filename extension.
pub fn guess_mime_type(filename: &str) -> &'static str {
    let ext = filename.rsplit('.').next().unwrap_or("").to_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allow_list_is_case_insensitive_and_last_extension_only() {
        assert!(allowed_file("photo.jpg"));
        assert!(allowed_file("PHOTO.JPG"));
        assert!(allowed_file("archive.tar.jpg"));
        assert!(!allowed_file("photo.exe"));
        assert!(!allowed_file("photo.jpg.exe"));
        assert!(!allowed_file("photo.jpeg"));
        assert!(!allowed_file("jpg"));
        assert!(!allowed_file(""));
    }

    #[test]
    fn secure_filename_rules() {
        assert_eq!(secure_filename("photo.jpg"), "photo.jpg");
        assert_eq!(secure_filename("My cool movie.mov"), "My_cool_movie.mov");
        assert_eq!(secure_filename("../../../etc/passwd"), "etc_passwd");
        assert_eq!(secure_filename("C:\\Users\\me\\pic.jpg"), "C_Users_me_pic.jpg");
        assert_eq!(secure_filename("  spaced   out .jpg"), "spaced_out_.jpg");
        assert_eq!(secure_filename("<script>.jpg"), "script.jpg");
        assert_eq!(secure_filename("..."), "");
        assert_eq!(secure_filename("über.jpg"), "ber.jpg");
    }

    #[test]
    fn derived_names() {
        assert_eq!(derived_filename("blur", "photo.jpg"), "edited_blur_photo.jpg");
        assert_eq!(legacy_edited_filename("photo.jpg"), "edited_photo.jpg");
    }

    #[test]
    fn mime_types() {
        assert_eq!(guess_mime_type("a.JPG"), "image/jpeg");
        assert_eq!(guess_mime_type("edited_removeBackground_a.png"), "image/png");
        assert_eq!(guess_mime_type("noext"), "application/octet-stream");
    }
}
