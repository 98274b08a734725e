//! Product codes, sequence labels and output names

use std::path::Path;

/// Characters not allowed in output file names
const UNSAFE_CHARS: &[char] = &['/', '\\', '?', '%', '*', ':', '|', '"', '<', '>'];

/// Product code from an image file name.
///
/// `AK0535_020_02 (1).png` becomes `AK0535`. Copy markers (` (N)`, ` - Copy`)
/// are stripped before splitting on the first underscore.
pub fn extract_product_code(file_name: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string());

    let mut name = stem.trim_end().to_string();
    loop {
        let before = name.len();
        name = strip_copy_counter(&name).to_string();
        if let Some(rest) = name.strip_suffix(" - Copy") {
            name = rest.trim_end().to_string();
        }
        if name.len() == before {
            break;
        }
    }

    name.split('_').next().unwrap_or("").trim().to_string()
}

/// Strip a trailing " (N)"
fn strip_copy_counter(name: &str) -> &str {
    let Some(inner) = name.strip_suffix(')') else {
        return name;
    };
    let Some(open) = inner.rfind(" (") else {
        return name;
    };
    let digits = &inner[open + 2..];
    if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
        inner[..open].trim_end()
    } else {
        name
    }
}

/// Label for sequence value `n`, e.g. "Set 3"
pub fn sequence_label(prefix: &str, n: u32) -> String {
    let prefix = prefix.trim();
    if prefix.is_empty() {
        n.to_string()
    } else {
        format!("{prefix} {n}")
    }
}

/// Output base name `{code}_{label}` with whitespace removed from the label
pub fn output_name(product_code: &str, label: &str) -> String {
    let compact: String = label.chars().filter(|c| !c.is_whitespace()).collect();
    safe_filename(&format!("{product_code}_{compact}"))
}

/// Replace characters that are unsafe in file names with '-'
pub fn safe_filename(name: &str) -> String {
    name.chars()
        .map(|c| if UNSAFE_CHARS.contains(&c) { '-' } else { c })
        .collect()
}

/// ASCII alphanumerics of a label ("Set 12" -> "Set12")
pub fn alphanumeric(label: &str) -> String {
    label.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}
