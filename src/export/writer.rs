//! Export directory writer
//!
//! Layout on disk:
//!
//! ```text
//! Batch_Export_2026-10-19/
//! ├── Group_1_Sets_Set1_to_Set4/
//! │   ├── caption.txt
//! │   ├── AK0535_Set1.png
//! │   ├── AK0535_Set1_cover.png
//! │   └── ...
//! └── export_summary.txt
//! ```

use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::types::{
    summary_text, ExportBundle, ExportError, ExportGroup, Result, SummaryRecord, CAPTION_FILE,
    SUMMARY_FILE,
};

/// Name of the dated export root
pub fn export_dir_name(date: NaiveDate) -> String {
    format!("Batch_Export_{}", date.format("%Y-%m-%d"))
}

/// Writes one export root group by group
#[derive(Debug)]
pub struct ExportWriter {
    root: PathBuf,
    groups: usize,
    items: usize,
}

impl ExportWriter {
    /// Create the dated export root under `out_dir`.
    ///
    /// Refuses to reuse an existing export root for the same date.
    pub fn create(out_dir: &Path, date: NaiveDate) -> Result<Self> {
        let root = out_dir.join(export_dir_name(date));
        if root.exists() {
            return Err(ExportError::OutputExists(root));
        }
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            groups: 0,
            items: 0,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn groups_written(&self) -> usize {
        self.groups
    }

    pub fn items_written(&self) -> usize {
        self.items
    }

    /// Write a group's caption and images into its own folder
    pub fn write_group(&mut self, group: &ExportGroup) -> Result<()> {
        let dir = self.root.join(&group.folder_name);
        fs::create_dir_all(&dir)?;
        fs::write(dir.join(CAPTION_FILE), &group.caption)?;

        for artifact in &group.artifacts {
            fs::write(dir.join(format!("{}.png", artifact.name)), &artifact.image_png)?;
            if let Some(cover) = &artifact.cover_png {
                fs::write(dir.join(format!("{}_cover.png", artifact.name)), cover)?;
            }
        }
        self.groups += 1;
        self.items += group.artifacts.len();
        debug!(dir = %dir.display(), files = group.artifacts.len(), "Wrote group");
        Ok(())
    }

    /// Write the summary file and return the export root
    pub fn finish(self, summary: &[SummaryRecord]) -> Result<PathBuf> {
        fs::write(self.root.join(SUMMARY_FILE), summary_text(summary))?;
        info!(root = %self.root.display(), items = self.items, "Export written");
        Ok(self.root)
    }
}

/// Write an in-memory `bundle` under `out_dir`, returning the created export root
pub fn write_bundle(bundle: &ExportBundle, out_dir: &Path, date: NaiveDate) -> Result<PathBuf> {
    if bundle.item_count() == 0 {
        return Err(ExportError::NothingToExport);
    }

    let mut writer = ExportWriter::create(out_dir, date)?;
    for group in &bundle.groups {
        writer.write_group(group)?;
    }
    writer.finish(&bundle.summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::types::ItemArtifact;
    use crate::layout::LayoutKind;
    use tempfile::tempdir;

    fn bundle() -> ExportBundle {
        ExportBundle {
            groups: vec![ExportGroup {
                index: 1,
                folder_name: "Group_1_Sets_Set1_to_Set1".into(),
                caption: "hook\n\n#x".into(),
                artifacts: vec![ItemArtifact {
                    name: "AK1_Set1".into(),
                    image_png: vec![1, 2, 3],
                    cover_png: Some(vec![4, 5]),
                }],
            }],
            summary: vec![SummaryRecord {
                folder: "a".into(),
                label: "Set 1".into(),
                layout: LayoutKind::TwoByOne,
                output: "AK1_Set1".into(),
            }],
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn test_dir_name() {
        assert_eq!(export_dir_name(date()), "Batch_Export_2026-10-19");
    }

    #[test]
    fn test_write_layout() {
        let tmp = tempdir().unwrap();
        let root = write_bundle(&bundle(), tmp.path(), date()).unwrap();
        assert_eq!(root, tmp.path().join("Batch_Export_2026-10-19"));

        let group = root.join("Group_1_Sets_Set1_to_Set1");
        assert_eq!(fs::read_to_string(group.join("caption.txt")).unwrap(), "hook\n\n#x");
        assert_eq!(fs::read(group.join("AK1_Set1.png")).unwrap(), vec![1, 2, 3]);
        assert_eq!(fs::read(group.join("AK1_Set1_cover.png")).unwrap(), vec![4, 5]);

        let summary = fs::read_to_string(root.join("export_summary.txt")).unwrap();
        assert!(summary.starts_with("[SUCCESS] Folder: a | Set: Set 1"));
    }

    #[test]
    fn test_existing_root_rejected() {
        let tmp = tempdir().unwrap();
        write_bundle(&bundle(), tmp.path(), date()).unwrap();
        assert!(matches!(
            write_bundle(&bundle(), tmp.path(), date()),
            Err(ExportError::OutputExists(_))
        ));
    }

    #[test]
    fn test_empty_bundle_rejected() {
        let tmp = tempdir().unwrap();
        assert!(matches!(
            write_bundle(&ExportBundle::default(), tmp.path(), date()),
            Err(ExportError::NothingToExport)
        ));
    }

    #[test]
    fn test_writer_streams_groups() {
        let tmp = tempdir().unwrap();
        let b = bundle();
        let mut writer = ExportWriter::create(tmp.path(), date()).unwrap();
        let root = writer.root().to_path_buf();
        writer.write_group(&b.groups[0]).unwrap();
        assert!(root.join("Group_1_Sets_Set1_to_Set1/AK1_Set1.png").is_file());
        assert!(!root.join("export_summary.txt").exists());
        assert_eq!(writer.groups_written(), 1);
        assert_eq!(writer.items_written(), 1);

        assert_eq!(writer.finish(&b.summary).unwrap(), root);
        assert!(root.join("export_summary.txt").is_file());
    }
}
