//! Candidate tiering and layout selection
//!
//! Multi-panel images are discarded. The rest split into the Single tier
//! (exactly one subject) and the Dual tier (exactly two). The first matching
//! rule wins:
//!
//! 1. 4+ Single: 2x2 of the first four
//! 2. 2+ Single: 2x1 of the first two
//! 3. Dual fallback allowed and 1+ Dual: 1x1 of the first Dual
//! 4. Otherwise the folder is skipped

use super::types::FilterMode;
use crate::candidate::CandidateImage;
use crate::layout::LayoutKind;

/// Tier of a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Single,
    Dual,
}

/// Tier for a candidate, or `None` if unusable
pub fn tier_of(candidate: &CandidateImage) -> Option<Tier> {
    if candidate.is_multi_panel || !candidate.has_subject {
        return None;
    }
    match candidate.subject_count {
        1 => Some(Tier::Single),
        2 => Some(Tier::Dual),
        _ => None,
    }
}

/// Outcome of selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Compose `layout` from the candidates at `indices`, in order
    Compose {
        layout: LayoutKind,
        indices: Vec<usize>,
        single: usize,
        dual: usize,
    },
    /// Not enough qualifying candidates
    Insufficient { single: usize, dual: usize },
}

impl Selection {
    /// Diagnostic for a skipped folder
    pub fn describe(&self) -> String {
        match self {
            Selection::Compose { layout, indices, .. } => {
                format!("Layout {layout} from {} images", indices.len())
            }
            Selection::Insufficient { single, dual } => {
                format!("Not enough images (single: {single}, dual: {dual})")
            }
        }
    }
}

/// Choose a layout and images for one folder
pub fn select(candidates: &[CandidateImage], mode: FilterMode) -> Selection {
    let mut singles = Vec::new();
    let mut duals = Vec::new();
    for (i, c) in candidates.iter().enumerate() {
        match tier_of(c) {
            Some(Tier::Single) => singles.push(i),
            Some(Tier::Dual) => duals.push(i),
            None => {}
        }
    }
    let (single, dual) = (singles.len(), duals.len());

    let (layout, indices) = if single >= 4 {
        (LayoutKind::TwoByTwo, singles[..4].to_vec())
    } else if single >= 2 {
        (LayoutKind::TwoByOne, singles[..2].to_vec())
    } else if mode.allows_dual_fallback() && dual >= 1 {
        (LayoutKind::OneByOne, vec![duals[0]])
    } else {
        return Selection::Insufficient { single, dual };
    };

    Selection::Compose {
        layout,
        indices,
        single,
        dual,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::SourceImage;
    use crate::classify::Classification;
    use crate::heal::DefectBox;
    use image::RgbaImage;

    fn candidates(tuples: &[(u32, bool)]) -> Vec<CandidateImage> {
        tuples.iter()
            .enumerate()
            .map(|(i, &(count, multi))| {
                CandidateImage::new(
                    SourceImage::from_bitmap(format!("{i}.png"), RgbaImage::new(1, 1)),
                    Classification {
                        has_subject: count > 0,
                        subject_count: count,
                        is_multi_panel: multi,
                        defect: DefectBox::absent(),
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_five_singles_take_first_four() {
        let c = candidates(&[(1, false); 5]);
        assert_eq!(
            select(&c, FilterMode::Smart),
            Selection::Compose {
                layout: LayoutKind::TwoByTwo,
                indices: vec![0, 1, 2, 3],
                single: 5,
                dual: 0
            }
        );
    }

    #[test]
    fn test_three_singles_give_two_by_one() {
        let c = candidates(&[(0, false), (1, false), (2, false), (1, false), (1, false)]);
        match select(&c, FilterMode::Smart) {
            Selection::Compose {
                layout, indices, ..
            } => {
                assert_eq!(layout, LayoutKind::TwoByOne);
                assert_eq!(indices, vec![1, 3]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_single_plus_dual_falls_back_in_smart_mode() {
        let c = candidates(&[(1, false), (2, false)]);
        match select(&c, FilterMode::Smart) {
            Selection::Compose {
                layout, indices, ..
            } => {
                assert_eq!(layout, LayoutKind::OneByOne);
                assert_eq!(indices, vec![1]);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(
            select(&c, FilterMode::Strict),
            Selection::Insufficient { single: 1, dual: 1 }
        );
    }

    #[test]
    fn test_lone_single_is_skipped() {
        let c = candidates(&[(1, false)]);
        let selection = select(&c, FilterMode::Smart);
        assert_eq!(selection, Selection::Insufficient { single: 1, dual: 0 });
        assert!(selection.describe().contains("single: 1"));
    }

    #[test]
    fn test_multi_panel_and_crowds_discarded() {
        let c = candidates(&[(1, true), (1, true), (3, false), (2, true), (0, false)]);
        assert_eq!(
            select(&c, FilterMode::Smart),
            Selection::Insufficient { single: 0, dual: 0 }
        );
    }

    #[test]
    fn test_selection_is_deterministic() {
        let c = candidates(&[(2, false), (1, false), (1, true), (1, false), (2, false)]);
        let first = select(&c, FilterMode::Smart);
        for _ in 0..10 {
            assert_eq!(select(&c, FilterMode::Smart), first);
        }
    }

    #[test]
    fn test_empty_folder() {
        assert_eq!(
            select(&[], FilterMode::Smart),
            Selection::Insufficient { single: 0, dual: 0 }
        );
    }
}
