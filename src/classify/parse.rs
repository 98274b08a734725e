//! Response parsing and normalization
//!
//! Service output is untrusted JSON. Missing fields take safe defaults and
//! out-of-range numbers are clamped rather than rejected.

use serde::Deserialize;

use super::types::{Classification, ClassifyError, Result};
use crate::heal::{DefectBox, PERMILLE};

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawClassification {
    #[serde(alias = "hasSubject", alias = "has_subject")]
    is_model: Option<bool>,
    #[serde(alias = "subjectCount", alias = "subject_count")]
    person_count: Option<i64>,
    #[serde(alias = "isMultiPanel", alias = "is_multi_panel")]
    is_collage: Option<bool>,
    #[serde(alias = "defect")]
    logo: Option<RawDefect>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawDefect {
    #[serde(alias = "hasLogo", alias = "present")]
    has_logo: bool,
    xmin: i64,
    ymin: i64,
    xmax: i64,
    ymax: i64,
}

impl RawDefect {
    fn into_box(self) -> DefectBox {
        let clamp = |v: i64| v.clamp(0, PERMILLE as i64) as u16;
        DefectBox {
            present: self.has_logo,
            xmin: clamp(self.xmin),
            ymin: clamp(self.ymin),
            xmax: clamp(self.xmax),
            ymax: clamp(self.ymax),
        }
    }
}

/// Parse a classification JSON object
pub fn parse_classification(text: &str) -> Result<Classification> {
    let body = strip_code_fences(text);
    let body = if body.is_empty() { "{}" } else { body };
    let raw: RawClassification = serde_json::from_str(body)
        .map_err(|e| ClassifyError::InvalidResponse(format!("classification JSON: {e}")))?;

    let has_subject = raw.is_model.unwrap_or(false);
    let subject_count = match raw.person_count {
        Some(n) => n.clamp(0, u32::MAX as i64) as u32,
        None if has_subject => 1,
        None => 0,
    };

    Ok(Classification {
        has_subject,
        subject_count,
        is_multi_panel: raw.is_collage.unwrap_or(false),
        defect: raw.logo.map(RawDefect::into_box).unwrap_or_default(),
    }
    .normalized())
}

/// Parse a JSON array of hook strings. Blank entries are dropped.
pub fn parse_hooks(text: &str) -> Result<Vec<String>> {
    let body = strip_code_fences(text);
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| ClassifyError::InvalidResponse(format!("hook JSON: {e}")))?;
    let items = value
        .as_array()
        .ok_or_else(|| ClassifyError::InvalidResponse("hooks are not a JSON array".into()))?;

    Ok(items
        .iter()
        .filter_map(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect())
}

/// Remove a surrounding markdown code fence, if any
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. "json") on the opening line
    let rest = match rest.find('\n') {
        Some(i) => &rest[i + 1..],
        None => rest,
    };
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_response() {
        let c = parse_classification(
            r#"{"isModel": true, "personCount": 2, "isCollage": false,
                "logo": {"hasLogo": true, "xmin": 800, "ymin": 900, "xmax": 950, "ymax": 980}}"#,
        )
        .unwrap();
        assert!(c.has_subject);
        assert_eq!(c.subject_count, 2);
        assert!(!c.is_multi_panel);
        assert_eq!(c.defect, DefectBox::new(800, 900, 950, 980));
    }

    #[test]
    fn test_missing_count_defaults_from_subject() {
        let c = parse_classification(r#"{"isModel": true}"#).unwrap();
        assert_eq!(c.subject_count, 1);
        let c = parse_classification(r#"{"isModel": false}"#).unwrap();
        assert_eq!(c.subject_count, 0);
    }

    #[test]
    fn test_count_ignored_without_subject() {
        let c = parse_classification(r#"{"isModel": false, "personCount": 3}"#).unwrap();
        assert_eq!(c.subject_count, 0);
    }

    #[test]
    fn test_missing_defect_means_none() {
        let c = parse_classification(r#"{"isModel": true, "personCount": 1}"#).unwrap();
        assert!(!c.defect.present);
    }

    #[test]
    fn test_out_of_range_values_clamped() {
        let c = parse_classification(
            r#"{"isModel": true, "personCount": -4,
                "logo": {"hasLogo": true, "xmin": -20, "ymin": 10, "xmax": 5000, "ymax": 20}}"#,
        )
        .unwrap();
        assert_eq!(c.subject_count, 0);
        assert_eq!(c.defect.xmin, 0);
        assert_eq!(c.defect.xmax, 1000);
    }

    #[test]
    fn test_empty_body_is_no_subject() {
        let c = parse_classification("").unwrap();
        assert_eq!(c, Classification::no_subject());
    }

    #[test]
    fn test_malformed_classification() {
        assert!(matches!(
            parse_classification("not json"),
            Err(ClassifyError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_snake_case_aliases() {
        let c = parse_classification(
            r#"{"has_subject": true, "subject_count": 2, "is_multi_panel": true}"#,
        )
        .unwrap();
        assert!(c.has_subject);
        assert_eq!(c.subject_count, 2);
        assert!(c.is_multi_panel);
    }

    #[test]
    fn test_hooks_plain_array() {
        let hooks = parse_hooks(r#"["First hook", "  ", "Second hook"]"#).unwrap();
        assert_eq!(hooks, vec!["First hook", "Second hook"]);
    }

    #[test]
    fn test_hooks_in_code_fence() {
        let hooks = parse_hooks("```json\n[\"A\", \"B\"]\n```").unwrap();
        assert_eq!(hooks, vec!["A", "B"]);
    }

    #[test]
    fn test_hooks_not_array() {
        assert!(parse_hooks(r#"{"hooks": []}"#).is_err());
        assert!(parse_hooks("nope").is_err());
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("  [1] "), "[1]");
        assert_eq!(strip_code_fences("```\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fences("```json\n{}\n```"), "{}");
    }
}
