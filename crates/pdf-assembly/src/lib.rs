mod assembly;
mod document;
mod ranges;
mod split;
mod types;

pub use assembly::AssemblyState;
pub use document::{build_document, load_multiple_pdfs, load_pdf, page_object_ids, save_pdf};
pub use ranges::{PageRange, parse_ranges};
pub use split::{split_document, split_to_files};
pub use types::*;
