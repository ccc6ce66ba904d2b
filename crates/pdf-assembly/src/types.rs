use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssemblyError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("invalid page range token {0:?}")]
    InvalidRange(String),
    #[error("position {index} is out of range for a sequence of {len} entries")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("no pages selected")]
    NoSelection,
    #[error("no document has been opened")]
    EmptyDocument,
    #[error("page {page} is out of bounds")]
    PageOutOfBounds { page: usize },
    #[error("source {0:?} is not open")]
    UnknownSource(SourceId),
    #[error("source {0:?} is already open")]
    DuplicateSource(SourceId),
}

pub type Result<T> = std::result::Result<T, AssemblyError>;

/// Identifier of an open source document. The session that owns the actual
/// `lopdf::Document` values keeps them indexed by this id; the assembly model
/// itself never holds page bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(pub u32);

/// Stable opaque identifier assigned to a page entry at creation. Reordering
/// and deletion are tracked through these (or through sequence positions),
/// never by re-parsing display labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageStatus {
    #[default]
    Active,
    /// Kept in the sequence so displayed positions stay stable, but excluded
    /// from every output-producing operation.
    Deleted,
}

/// One page destined for an output document: a non-owning reference into a
/// source document plus inclusion status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageEntry {
    pub id: EntryId,
    pub source: SourceId,
    /// Zero-based index into the source's page sequence.
    pub page_index: usize,
    pub status: PageStatus,
}

impl PageEntry {
    pub fn is_active(&self) -> bool {
        self.status == PageStatus::Active
    }
}
