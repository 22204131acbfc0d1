//! Offset pagination schedule.

use herald_error::ConfigError;

/// Offsets to visit during one pagination run.
///
/// Offsets start at `offset` and advance by `page_size` while they stay below
/// `max_offset`. They are strictly increasing, so a run never revisits one.
///
/// # Examples
///
/// ```
/// use herald_core::FetchWindow;
///
/// let window = FetchWindow::new(100, 300).unwrap();
/// assert_eq!(window.offsets().collect::<Vec<_>>(), vec![0, 100, 200]);
///
/// assert!(FetchWindow::new(0, 300).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchWindow {
    offset: u32,
    page_size: u32,
    max_offset: u32,
}

impl FetchWindow {
    /// Window starting at offset zero.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when `page_size` is zero, which would never
    /// advance the offset.
    #[track_caller]
    pub fn new(page_size: u32, max_offset: u32) -> Result<Self, ConfigError> {
        if page_size == 0 {
            return Err(ConfigError::new("page_size must be greater than zero"));
        }
        Ok(Self {
            offset: 0,
            page_size,
            max_offset,
        })
    }

    /// Same window starting at `offset` instead of zero.
    pub fn starting_at(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    /// First offset of the run.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Number of messages requested per page.
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Exclusive upper bound on offsets.
    pub fn max_offset(&self) -> u32 {
        self.max_offset
    }

    /// Offsets in visiting order.
    pub fn offsets(&self) -> impl Iterator<Item = u32> + use<> {
        (self.offset..self.max_offset).step_by(self.page_size as usize)
    }

    /// Number of pages the window schedules.
    pub fn page_count(&self) -> usize {
        self.offsets().count()
    }
}
