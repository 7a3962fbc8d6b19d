//! Plain-text extraction from the source document.
//!
//! An EPUB is a ZIP container of XHTML chapter files; extraction walks the
//! archive in entry order, strips markup (including `<script>`/`<style>`
//! content), decodes the common HTML entities, and joins chapters with a
//! blank line. Plain-text and Markdown inputs skip straight to whitespace
//! normalization.

use std::io::Read;
use std::path::Path;

use tracing::{debug, info};

use crate::errors::IngestError;

/// Extracts normalized plain text from a document on disk.
///
/// Supported formats by extension: `.epub` (ZIP of XHTML chapters),
/// `.txt`/`.md` (verbatim text).
///
/// # Errors
/// Returns `IngestError::Document` for unsupported extensions or malformed
/// archives, `IngestError::Io` for filesystem failures.
pub fn extract_document(path: &Path) -> Result<String, IngestError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "epub" => extract_epub(path),
        "txt" | "md" => {
            let raw = std::fs::read_to_string(path)?;
            Ok(normalize_text(&raw))
        }
        other => Err(IngestError::Document(format!(
            "unsupported document format: `.{other}` (expected .epub, .txt or .md)"
        ))),
    }
}

/// Extracts normalized plain text from an EPUB file.
///
/// Chapter order follows the archive entry order, which matches how the
/// container lists its manifest documents.
///
/// # Errors
/// Returns `IngestError::Document` when the archive is unreadable or holds
/// no XHTML documents.
pub fn extract_epub(path: &Path) -> Result<String, IngestError> {
    info!("extracting text from {:?}", path);
    let file = std::fs::File::open(path)?;
    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| IngestError::Document(format!("not a readable EPUB archive: {e}")))?;

    let mut text = String::new();
    let mut chapters = 0usize;

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| IngestError::Document(format!("bad archive entry: {e}")))?;
        let name = entry.name().to_ascii_lowercase();
        if !(name.ends_with(".xhtml") || name.ends_with(".html") || name.ends_with(".htm")) {
            continue;
        }

        let mut raw = Vec::new();
        entry.read_to_end(&mut raw)?;
        let html = String::from_utf8_lossy(&raw);

        text.push_str(&strip_markup(&html));
        text.push_str("\n\n");
        chapters += 1;
    }

    if chapters == 0 {
        return Err(IngestError::Document(
            "archive contains no XHTML chapter documents".into(),
        ));
    }

    debug!("extracted {} chapter documents", chapters);
    Ok(normalize_text(&text))
}

/// Strips markup from an (X)HTML fragment.
///
/// - `<script>`/`<style>` elements are removed together with their content.
/// - Every other tag is replaced by a single space so adjacent text nodes do
///   not fuse into one word.
/// - Common named and decimal numeric entities are decoded.
pub fn strip_markup(html: &str) -> String {
    let chars: Vec<char> = html.chars().collect();
    let lower: Vec<char> = html.to_lowercase().chars().collect();

    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    let mut in_script = false;
    let mut in_style = false;

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];

        if !in_script && starts_with_at(&lower, i, "<script") {
            in_script = true;
        } else if !in_style && starts_with_at(&lower, i, "<style") {
            in_style = true;
        }

        if in_script && starts_with_at(&lower, i, "</script>") {
            in_script = false;
            in_tag = false;
            i += "</script>".len();
            continue;
        }
        if in_style && starts_with_at(&lower, i, "</style>") {
            in_style = false;
            in_tag = false;
            i += "</style>".len();
            continue;
        }

        if in_script || in_style {
            i += 1;
            continue;
        }

        if c == '<' {
            in_tag = true;
        } else if c == '>' && in_tag {
            in_tag = false;
            out.push(' ');
        } else if !in_tag {
            if c == '&' {
                let (decoded, consumed) = decode_entity(&chars[i..]);
                out.push_str(&decoded);
                i += consumed;
                continue;
            }
            out.push(c);
        }

        i += 1;
    }

    out
}

/// True when `chars[at..]` starts with the ASCII `needle`.
fn starts_with_at(chars: &[char], at: usize, needle: &str) -> bool {
    let n = needle.len();
    at + n <= chars.len() && chars[at..at + n].iter().collect::<String>() == needle
}

/// Decodes one HTML entity starting at `&`. Returns the replacement text and
/// the number of characters consumed; an unrecognized sequence is passed
/// through as a literal `&`.
fn decode_entity(chars: &[char]) -> (String, usize) {
    let end = chars
        .iter()
        .take(10)
        .position(|&c| c == ';')
        .map(|p| p + 1);
    let Some(end) = end else {
        return ("&".to_string(), 1);
    };

    let entity: String = chars[..end].iter().collect();
    let decoded = match entity.as_str() {
        "&amp;" => Some("&".to_string()),
        "&lt;" => Some("<".to_string()),
        "&gt;" => Some(">".to_string()),
        "&quot;" => Some("\"".to_string()),
        "&apos;" | "&#39;" => Some("'".to_string()),
        "&nbsp;" | "&#160;" => Some(" ".to_string()),
        _ => entity
            .strip_prefix("&#")
            .and_then(|rest| rest.strip_suffix(';'))
            .and_then(|num| num.parse::<u32>().ok())
            .and_then(char::from_u32)
            .map(String::from),
    };

    match decoded {
        Some(s) => (s, end),
        None => ("&".to_string(), 1),
    }
}

/// Normalizes extracted whitespace.
///
/// - Runs of spaces/tabs inside a line collapse to a single space.
/// - Lines are trimmed.
/// - Runs of blank lines collapse to one (keeping paragraph breaks as
///   `\n\n` for the chunker's separator preference).
pub fn normalize_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut blank_run = 0usize;

    for line in s.lines() {
        let mut compact = String::with_capacity(line.len());
        let mut pending_space = false;
        for c in line.chars() {
            if c.is_whitespace() {
                pending_space = true;
            } else {
                if pending_space && !compact.is_empty() {
                    compact.push(' ');
                }
                pending_space = false;
                compact.push(c);
            }
        }

        if compact.is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }

        out.push_str(&compact);
        out.push('\n');
    }

    out.trim_matches('\n').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn strips_tags_and_decodes_entities() {
        let html = "<p>Tom &amp; Jerry</p><p>5 &lt; 7</p>";
        let text = normalize_text(&strip_markup(html));
        assert_eq!(text, "Tom & Jerry 5 < 7");
    }

    #[test]
    fn removes_script_and_style_content() {
        let html = "<html><style>p { color: red; }</style>\
                    <body><p>visible</p><script>var hidden = 1;</script></body></html>";
        let text = normalize_text(&strip_markup(html));
        assert_eq!(text, "visible");
    }

    #[test]
    fn numeric_entities_decode() {
        let text = strip_markup("a&#233;b");
        assert_eq!(text, "a\u{e9}b");
    }

    #[test]
    fn lone_ampersand_passes_through() {
        assert_eq!(strip_markup("fish & chips"), "fish & chips");
    }

    #[test]
    fn normalize_collapses_inner_whitespace_and_blank_runs() {
        let raw = "first   line\t here\n\n\n\nsecond  line\n";
        assert_eq!(normalize_text(raw), "first line here\n\nsecond line");
    }

    #[test]
    fn epub_extraction_walks_xhtml_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.epub");

        let file = std::fs::File::create(&path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let opts = zip::write::SimpleFileOptions::default();

        zip.start_file("mimetype", opts).unwrap();
        zip.write_all(b"application/epub+zip").unwrap();
        zip.start_file("OEBPS/ch1.xhtml", opts).unwrap();
        zip.write_all(b"<html><body><p>Chapter one text.</p></body></html>")
            .unwrap();
        zip.start_file("OEBPS/ch2.xhtml", opts).unwrap();
        zip.write_all(b"<html><body><p>Chapter two text.</p></body></html>")
            .unwrap();
        zip.finish().unwrap();

        let text = extract_epub(&path).unwrap();
        assert_eq!(text, "Chapter one text.\n\nChapter two text.");
    }

    #[test]
    fn epub_without_chapters_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.epub");

        let file = std::fs::File::create(&path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let opts = zip::write::SimpleFileOptions::default();
        zip.start_file("mimetype", opts).unwrap();
        zip.write_all(b"application/epub+zip").unwrap();
        zip.finish().unwrap();

        assert!(matches!(
            extract_epub(&path),
            Err(IngestError::Document(_))
        ));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        assert!(matches!(
            extract_document(Path::new("book.pdf")),
            Err(IngestError::Document(_))
        ));
    }
}
