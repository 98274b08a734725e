//! Export Assembler
//!
//! Groups Done items into chunks of one sequence cycle, builds a caption per
//! chunk, and encodes each item's collage plus a cover from its first chosen
//! image. Encoding runs in parallel across the items of a chunk.

use rayon::prelude::*;
use tracing::{info, warn};

use super::caption::{build_caption, select_hook};
use super::types::{
    CaptionSettings, ExportBundle, ExportError, ExportGroup, ItemArtifact, Result, SummaryRecord,
};
use crate::batch::{alphanumeric, output_name, safe_filename, sequence_label, FolderBatchItem};
use crate::cover::CoverGenerator;
use crate::layout::encode_png;

/// Split `len` items into consecutive chunks of `chunk_size` (last may be shorter)
pub fn chunk_sizes(len: usize, chunk_size: usize) -> Vec<usize> {
    let size = chunk_size.max(1);
    (0..len)
        .step_by(size)
        .map(|start| size.min(len - start))
        .collect()
}

/// Whether `item` has a finished collage to export
pub fn is_exportable(item: &FolderBatchItem) -> bool {
    item.is_done() && item.result.is_some()
}

/// Export assembler
#[derive(Debug, Clone, Default)]
pub struct ExportAssembler {
    captions: CaptionSettings,
    cover: CoverGenerator,
}

impl ExportAssembler {
    pub fn new(captions: CaptionSettings, cover: CoverGenerator) -> Self {
        Self { captions, cover }
    }

    pub fn captions(&self) -> &CaptionSettings {
        &self.captions
    }

    /// Assemble every Done item of `items` in memory.
    ///
    /// `chunk_size` is the sequence cycle length; `start`/`end` and
    /// `label_prefix` name groups whose labels are missing.
    pub fn assemble(
        &self,
        items: &[FolderBatchItem],
        hooks: &[String],
        chunk_size: usize,
        sequence: (u32, u32),
        label_prefix: &str,
    ) -> Result<ExportBundle> {
        let mut groups = Vec::new();
        let summary =
            self.assemble_each(items, hooks, chunk_size, sequence, label_prefix, |group| {
                groups.push(group);
                Ok(())
            })?;
        Ok(ExportBundle { groups, summary })
    }

    /// Assemble group by group, handing each finished group to `on_group`.
    ///
    /// Only one group's encoded images are held at a time. Returns the
    /// summary records of every exported item.
    pub fn assemble_each<F>(
        &self,
        items: &[FolderBatchItem],
        hooks: &[String],
        chunk_size: usize,
        (start, end): (u32, u32),
        label_prefix: &str,
        mut on_group: F,
    ) -> Result<Vec<SummaryRecord>>
    where
        F: FnMut(ExportGroup) -> Result<()>,
    {
        let done: Vec<&FolderBatchItem> = items.iter().filter(|i| is_exportable(i)).collect();
        if done.is_empty() {
            return Err(ExportError::NothingToExport);
        }

        let mut summary = Vec::with_capacity(done.len());
        let mut offset = 0;
        for (g, size) in chunk_sizes(done.len(), chunk_size).into_iter().enumerate() {
            let group = &done[offset..offset + size];
            offset += size;

            let first_label = group[0]
                .label
                .clone()
                .unwrap_or_else(|| sequence_label(label_prefix, start));
            let last_label = group[size - 1]
                .label
                .clone()
                .unwrap_or_else(|| sequence_label(label_prefix, end));
            let folder_name = format!(
                "Group_{}_Sets_{}_to_{}",
                g + 1,
                alphanumeric(&first_label),
                alphanumeric(&last_label)
            );

            let codes: Vec<String> = group.iter().map(|item| item_code(item)).collect();
            let hook = select_hook(hooks, g, &self.captions);
            let caption = build_caption(&self.captions, &hook, &codes);

            let encoded: Vec<(usize, Result<ItemArtifact>)> = group
                .par_iter()
                .enumerate()
                .map(|(i, item)| (i, self.encode_item(item)))
                .collect();

            let mut artifacts = Vec::with_capacity(size);
            for (i, result) in encoded {
                let item = group[i];
                match result {
                    Ok(artifact) => {
                        summary.push(SummaryRecord {
                            folder: item.folder.clone(),
                            label: item.label.clone().unwrap_or_default(),
                            layout: item.layout.unwrap_or_default(),
                            output: artifact.name.clone(),
                        });
                        artifacts.push(artifact);
                    }
                    Err(e) => warn!(folder = %item.folder, error = %e, "Skipping item in export"),
                }
            }

            info!(group = %folder_name, items = artifacts.len(), "Assembled group");
            on_group(ExportGroup {
                index: g + 1,
                folder_name,
                caption,
                artifacts,
            })?;
        }

        Ok(summary)
    }

    fn encode_item(&self, item: &FolderBatchItem) -> Result<ItemArtifact> {
        let result = item.result.as_ref().ok_or(ExportError::NothingToExport)?;
        let name = item
            .output_name
            .clone()
            .unwrap_or_else(|| format!("{}_processed", item.folder));
        let name = safe_filename(&name).trim().to_string();

        let image_png = encode_png(result)?;
        let cover_png = match item.chosen.first() {
            Some(best) => Some(self.cover.generate_png(best.bitmap())?),
            None => None,
        };

        Ok(ItemArtifact {
            name,
            image_png,
            cover_png,
        })
    }
}

/// Code line for the caption: `{productCode}_{label without spaces}`
fn item_code(item: &FolderBatchItem) -> String {
    let code = item
        .product_code
        .clone()
        .unwrap_or_else(|| item.folder.clone());
    match item.label.as_deref() {
        Some(label) => output_name(&code, label),
        None => code,
    }
}
