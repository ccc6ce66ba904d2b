use crate::document::{copy_page, finish_output_document, new_output_document, page_object_ids, save_pdf};
use crate::ranges::PageRange;
use crate::types::{AssemblyError, Result};
use lopdf::{Document, Object};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Split a document into one output per range, in range order.
///
/// The batch is all-or-nothing: every range is bounds-checked against the
/// source before any output is built, and the error names the first
/// offending 1-based page number. Overlapping ranges are honored as given,
/// so the same source page may appear in several outputs.
pub fn split_document(source: &Document, ranges: &[PageRange]) -> Result<Vec<Document>> {
    let page_ids = page_object_ids(source);
    let page_count = page_ids.len();

    for range in ranges {
        if range.end as usize > page_count {
            let page = if range.start as usize > page_count {
                range.start as usize
            } else {
                page_count + 1
            };
            return Err(AssemblyError::PageOutOfBounds { page });
        }
    }

    let mut outputs = Vec::with_capacity(ranges.len());
    for range in ranges {
        let (mut output, pages_id) = new_output_document();
        let mut cache = HashMap::new();
        let mut kids = Vec::with_capacity(range.page_count());
        for index in range.indices() {
            let copied = copy_page(&mut output, source, page_ids[index], pages_id, &mut cache)?;
            kids.push(Object::Reference(copied));
        }
        finish_output_document(&mut output, pages_id, kids);
        outputs.push(output);
    }
    Ok(outputs)
}

/// Split and write one file per range, named `{stem}-{start}-{end}.pdf`
/// (`{stem}-{page}.pdf` for single-page ranges). Returns the written paths
/// in range order.
pub async fn split_to_files(
    source: &Document,
    ranges: &[PageRange],
    stem: impl AsRef<Path>,
) -> Result<Vec<PathBuf>> {
    let cloned = source.clone();
    let owned_ranges = ranges.to_vec();
    let outputs =
        tokio::task::spawn_blocking(move || split_document(&cloned, &owned_ranges)).await??;

    let stem = stem.as_ref();
    let mut written = Vec::with_capacity(outputs.len());
    for (output, range) in outputs.into_iter().zip(ranges) {
        let path = range_file_name(stem, range);
        save_pdf(output, &path).await?;
        written.push(path);
    }
    Ok(written)
}

fn range_file_name(stem: &Path, range: &PageRange) -> PathBuf {
    let name = if range.start == range.end {
        format!("{}-{}.pdf", stem.display(), range.start)
    } else {
        format!("{}-{}-{}.pdf", stem.display(), range.start, range.end)
    };
    PathBuf::from(name)
}
