//! Consolidated caption text
//!
//! Layout of one caption:
//!
//! ```text
//! [title]
//! [blank]
//! hook
//!
//! ------------------
//! Product codes:
//! CODE_Set1
//! CODE_Set2
//!
//! #hashtags
//! ```

use super::types::{CaptionSettings, CAPTION_SEPARATOR, CODES_HEADER};

/// Hook for chunk `chunk_index`, cycling through `hooks`
pub fn select_hook(hooks: &[String], chunk_index: usize, settings: &CaptionSettings) -> String {
    if hooks.is_empty() {
        return fallback_hook(settings);
    }
    hooks[chunk_index % hooks.len()].clone()
}

/// Deterministic sentence used when no hooks were generated
pub fn fallback_hook(settings: &CaptionSettings) -> String {
    let product = non_empty(&settings.product_type).unwrap_or("New outfit");
    let occasion = non_empty(&settings.occasion).unwrap_or("just dropped");
    format!("{product} {occasion}, so cute!")
}

/// Build the consolidated caption
pub fn build_caption(settings: &CaptionSettings, hook: &str, codes: &[String]) -> String {
    let mut text = String::new();
    if let Some(title) = settings.title.as_deref().and_then(non_empty) {
        text.push_str(title);
        text.push_str("\n\n");
    }
    text.push_str(hook);
    text.push_str("\n\n");
    text.push_str(CAPTION_SEPARATOR);
    text.push('\n');
    text.push_str(CODES_HEADER);
    text.push('\n');
    text.push_str(&codes.join("\n"));
    text.push_str("\n\n");
    text.push_str(&settings.hashtags);
    text
}

fn non_empty(s: &str) -> Option<&str> {
    let s = s.trim();
    (!s.is_empty()).then_some(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hooks(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("hook {i}")).collect()
    }

    #[test]
    fn test_hooks_cycle_by_chunk_index() {
        let settings = CaptionSettings::default();
        let hooks = hooks(3);
        let picked: Vec<_> = (0..5).map(|i| select_hook(&hooks, i, &settings)).collect();
        assert_eq!(picked, vec!["hook 0", "hook 1", "hook 2", "hook 0", "hook 1"]);
    }

    #[test]
    fn test_fallback_without_hooks() {
        let settings = CaptionSettings {
            product_type: "Linen dress".into(),
            occasion: "for summer".into(),
            ..CaptionSettings::default()
        };
        assert_eq!(select_hook(&[], 2, &settings), "Linen dress for summer, so cute!");
        assert_eq!(
            fallback_hook(&CaptionSettings::default()),
            "New outfit just dropped, so cute!"
        );
    }

    #[test]
    fn test_caption_layout_with_title() {
        let settings = CaptionSettings {
            title: Some("Weekend drop".into()),
            ..CaptionSettings::default()
        };
        let caption = build_caption(&settings, "Hook!", &["A_Set1".into(), "B_Set2".into()]);
        assert_eq!(
            caption,
            "Weekend drop\n\nHook!\n\n------------------\nProduct codes:\nA_Set1\nB_Set2\n\n#fashion #trending #ootd"
        );
    }

    #[test]
    fn test_caption_without_title() {
        let settings = CaptionSettings {
            title: Some("   ".into()),
            hashtags: "#x".into(),
            ..CaptionSettings::default()
        };
        let caption = build_caption(&settings, "Hook", &["C_Set3".into()]);
        assert!(caption.starts_with("Hook\n\n"));
        assert!(caption.ends_with("C_Set3\n\n#x"));
    }
}
