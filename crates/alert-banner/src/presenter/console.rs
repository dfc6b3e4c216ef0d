//! Terminal presenter - prints banners as text lines.

use std::io::Write;

use chrono::FixedOffset;

use super::{Dismissal, Presentation, Presenter, PresenterError};
use crate::format::banner_text;

/// A presenter that writes banners to a terminal or any other writer.
pub struct ConsolePresenter<W: Write + Send> {
    out: W,
    offset: Option<FixedOffset>,
}

impl ConsolePresenter<std::io::Stdout> {
    /// Create a presenter that writes to stdout.
    pub fn stdout(offset: Option<FixedOffset>) -> Self {
        Self::new(std::io::stdout(), offset)
    }
}

impl<W: Write + Send> ConsolePresenter<W> {
    /// Create a presenter writing to `out`, rendering times in `offset` when set.
    pub fn new(out: W, offset: Option<FixedOffset>) -> Self {
        Self { out, offset }
    }

    /// Get the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> Presenter for ConsolePresenter<W> {
    fn show(&mut self, presentation: &Presentation) -> Result<(), PresenterError> {
        let window = presentation
            .deadline
            .saturating_duration_since(presentation.shown_at);
        writeln!(
            self.out,
            "[{}] {}  (Enter to acknowledge, clears in {}s)",
            presentation.id,
            banner_text(&presentation.alert, self.offset),
            window.as_secs()
        )?;
        self.out.flush()?;
        Ok(())
    }

    fn clear(
        &mut self,
        presentation: &Presentation,
        dismissal: Dismissal,
    ) -> Result<(), PresenterError> {
        writeln!(self.out, "[{}] cleared: {}", presentation.id, dismissal)?;
        self.out.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "ConsolePresenter"
    }
}
