use crate::models::Pagination;

impl Pagination {
    #[must_use]
    pub const fn new(start_row: u64, end_row: u64) -> Self {
        Self { start_row, end_row }
    }

    /// Rows skipped before the window: `start_row - 1`, floored at zero.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.start_row.saturating_sub(1)
    }

    /// Rows taken: `end_row - start_row`, floored at zero.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.end_row.saturating_sub(self.start_row)
    }

    /// Apply the window to an in-memory sequence.
    pub fn window<I: Iterator>(&self, items: I) -> std::iter::Take<std::iter::Skip<I>> {
        items
            .skip(usize::try_from(self.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(self.limit()).unwrap_or(usize::MAX))
    }
}
