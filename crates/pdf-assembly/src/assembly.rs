use crate::types::*;

/// The ordered, multi-source page collection behind an editing session.
///
/// Entries reference pages of externally owned source documents by
/// `(SourceId, page index)`; nothing here touches page bytes, so reorder and
/// delete cost nothing regardless of document size. The sequence order is the
/// authoritative output order. Every mutating call validates its arguments
/// before touching state, so a rejected call leaves the model exactly as it
/// was.
#[derive(Debug, Clone, Default)]
pub struct AssemblyState {
    entries: Vec<PageEntry>,
    /// Open sources in the order they were loaded, each with its page count.
    sources: Vec<(SourceId, usize)>,
    next_entry: u64,
}

impl AssemblyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the sequence to exactly the pages of `source`, in natural order,
    /// all active. Any previously loaded additional sources are dropped.
    pub fn open(&mut self, source: SourceId, page_count: usize) {
        self.entries.clear();
        self.sources.clear();
        self.sources.push((source, page_count));
        self.push_entries(source, page_count);
    }

    /// Append all pages of an additional source at the end of the sequence,
    /// preserving natural page order within the source.
    pub fn append_source(&mut self, source: SourceId, page_count: usize) -> Result<()> {
        if self.sources.is_empty() {
            return Err(AssemblyError::EmptyDocument);
        }
        if self.sources.iter().any(|(open, _)| *open == source) {
            return Err(AssemblyError::DuplicateSource(source));
        }
        self.sources.push((source, page_count));
        self.push_entries(source, page_count);
        Ok(())
    }

    fn push_entries(&mut self, source: SourceId, page_count: usize) {
        for page_index in 0..page_count {
            let id = EntryId(self.next_entry);
            self.next_entry += 1;
            self.entries.push(PageEntry {
                id,
                source,
                page_index,
                status: PageStatus::Active,
            });
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[PageEntry] {
        &self.entries
    }

    pub fn page_count(&self, source: SourceId) -> Option<usize> {
        self.sources
            .iter()
            .find(|(open, _)| *open == source)
            .map(|(_, count)| *count)
    }

    /// Mark the entries at the given current sequence positions as deleted.
    /// Deleted entries stay in the sequence but are excluded from every
    /// output-producing operation.
    pub fn mark_deleted(&mut self, positions: &[usize]) -> Result<()> {
        self.check_positions(positions)?;
        for &position in positions {
            self.entries[position].status = PageStatus::Deleted;
        }
        Ok(())
    }

    /// Move the entry at `from` to `to`, shifting the entries in between.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<()> {
        let len = self.entries.len();
        for index in [from, to] {
            if index >= len {
                return Err(AssemblyError::IndexOutOfRange { index, len });
            }
        }
        let entry = self.entries.remove(from);
        self.entries.insert(to, entry);
        Ok(())
    }

    /// The authoritative output page list: all active entries in sequence
    /// order, as `(source, page index)` references for the codec to resolve.
    pub fn materialize(&self) -> Result<Vec<(SourceId, usize)>> {
        if self.sources.is_empty() {
            return Err(AssemblyError::EmptyDocument);
        }
        Ok(self
            .entries
            .iter()
            .filter(|entry| entry.is_active())
            .map(|entry| (entry.source, entry.page_index))
            .collect())
    }

    /// Like [`materialize`](Self::materialize) restricted to the given
    /// sequence positions. Output order follows sequence order, not selection
    /// order; deleted entries among the selection are skipped.
    pub fn extract(&self, positions: &[usize]) -> Result<Vec<(SourceId, usize)>> {
        self.check_positions(positions)?;
        let mut wanted = positions.to_vec();
        wanted.sort_unstable();
        wanted.dedup();
        Ok(wanted
            .into_iter()
            .map(|position| &self.entries[position])
            .filter(|entry| entry.is_active())
            .map(|entry| (entry.source, entry.page_index))
            .collect())
    }

    fn check_positions(&self, positions: &[usize]) -> Result<()> {
        if positions.is_empty() {
            return Err(AssemblyError::NoSelection);
        }
        let len = self.entries.len();
        for &index in positions {
            if index >= len {
                return Err(AssemblyError::IndexOutOfRange { index, len });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: SourceId = SourceId(0);
    const B: SourceId = SourceId(1);

    fn state_with(primary_pages: usize) -> AssemblyState {
        let mut state = AssemblyState::new();
        state.open(A, primary_pages);
        state
    }

    #[test]
    fn open_resets_to_source_pages() {
        let mut state = state_with(5);
        state.append_source(B, 2).unwrap();
        assert_eq!(state.len(), 7);

        state.open(B, 3);
        assert_eq!(state.len(), 3);
        assert_eq!(state.page_count(A), None);
        let pages = state.materialize().unwrap();
        assert_eq!(pages, vec![(B, 0), (B, 1), (B, 2)]);
    }

    #[test]
    fn append_source_extends_in_order() {
        let mut state = state_with(5);
        state.append_source(B, 2).unwrap();

        let pages = state.materialize().unwrap();
        assert_eq!(
            pages,
            vec![(A, 0), (A, 1), (A, 2), (A, 3), (A, 4), (B, 0), (B, 1)]
        );
    }

    #[test]
    fn append_requires_open_document() {
        let mut state = AssemblyState::new();
        assert!(matches!(
            state.append_source(B, 2),
            Err(AssemblyError::EmptyDocument)
        ));
    }

    #[test]
    fn append_rejects_duplicate_source() {
        let mut state = state_with(2);
        assert!(matches!(
            state.append_source(A, 2),
            Err(AssemblyError::DuplicateSource(A))
        ));
    }

    #[test]
    fn deleted_entries_stay_but_drop_out_of_output() {
        let mut state = state_with(5);
        state.mark_deleted(&[1, 3]).unwrap();

        // Positions stay stable for the rest of the session.
        assert_eq!(state.len(), 5);
        assert_eq!(state.materialize().unwrap(), vec![(A, 0), (A, 2), (A, 4)]);
    }

    #[test]
    fn mark_deleted_rejects_empty_selection() {
        let mut state = state_with(5);
        assert!(matches!(
            state.mark_deleted(&[]),
            Err(AssemblyError::NoSelection)
        ));
    }

    #[test]
    fn mark_deleted_validates_before_mutating() {
        let mut state = state_with(5);
        assert!(matches!(
            state.mark_deleted(&[1, 9]),
            Err(AssemblyError::IndexOutOfRange { index: 9, len: 5 })
        ));
        // The in-bounds position must not have been flipped.
        assert_eq!(state.materialize().unwrap().len(), 5);
    }

    #[test]
    fn reorder_moves_entry_and_shifts_rest() {
        let mut state = state_with(5);
        state.reorder(0, 4).unwrap();
        assert_eq!(
            state.materialize().unwrap(),
            vec![(A, 1), (A, 2), (A, 3), (A, 4), (A, 0)]
        );
    }

    #[test]
    fn reorder_rejects_out_of_range() {
        let mut state = state_with(3);
        assert!(matches!(
            state.reorder(0, 3),
            Err(AssemblyError::IndexOutOfRange { index: 3, len: 3 })
        ));
        assert!(matches!(
            state.reorder(5, 0),
            Err(AssemblyError::IndexOutOfRange { index: 5, len: 3 })
        ));
    }

    #[test]
    fn entry_ids_survive_reorder() {
        let mut state = state_with(3);
        let moved = state.entries()[0].id;
        state.reorder(0, 2).unwrap();
        assert_eq!(state.entries()[2].id, moved);
    }

    #[test]
    fn materialize_requires_open_document() {
        let state = AssemblyState::new();
        assert!(matches!(
            state.materialize(),
            Err(AssemblyError::EmptyDocument)
        ));
    }

    #[test]
    fn extract_follows_sequence_order() {
        let mut state = state_with(5);
        // Selection order must not leak into the output.
        let pages = state.extract(&[4, 0, 2]).unwrap();
        assert_eq!(pages, vec![(A, 0), (A, 2), (A, 4)]);

        state.mark_deleted(&[2]).unwrap();
        let pages = state.extract(&[4, 0, 2]).unwrap();
        assert_eq!(pages, vec![(A, 0), (A, 4)]);
    }

    #[test]
    fn extract_rejects_empty_selection() {
        let state = state_with(5);
        assert!(matches!(state.extract(&[]), Err(AssemblyError::NoSelection)));
    }
}
