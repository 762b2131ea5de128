//! Output formatting utilities for CLI operations.

use std::io::{self, Write};

use beam_site::{ListingPage, SiteError, write_page};

/// Writes a rendered listing page to stdout.
///
/// # Errors
///
/// Returns [`SiteError::Render`] when the template fails and
/// [`SiteError::Io`] when stdout cannot be written.
pub fn write_listing(page: &ListingPage, template: Option<&str>) -> Result<(), SiteError> {
    let mut stdout = io::stdout().lock();
    write_listing_to(&mut stdout, page, template)
}

/// Writes a rendered listing page followed by a newline to `writer`.
///
/// # Errors
///
/// Returns [`SiteError::Render`] when the template fails and
/// [`SiteError::Io`] when writing fails.
pub fn write_listing_to<W: Write>(
    writer: &mut W,
    page: &ListingPage,
    template: Option<&str>,
) -> Result<(), SiteError> {
    write_page(writer, page, template)?;
    writeln!(writer).map_err(|error| io_error(&error))?;
    writer.flush().map_err(|error| io_error(&error))
}

/// Writes the divider printed between successive watch-mode pages.
///
/// # Errors
///
/// Returns [`SiteError::Io`] when writing fails.
pub fn write_divider<W: Write>(writer: &mut W, generation: u64) -> Result<(), SiteError> {
    writeln!(writer, "---- update {generation} ----").map_err(|error| io_error(&error))
}

fn io_error(error: &io::Error) -> SiteError {
    SiteError::Io {
        message: error.to_string(),
    }
}
