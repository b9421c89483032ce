use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::error::IndeterminateOffset;
use time::{OffsetDateTime, UtcOffset};
use tracing::{trace, warn};

const DATE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[month padding:none]/[day padding:none]/[year]");
const TIME_FORMAT: &[BorrowedFormatItem] = format_description!(
    "[hour repr:12 padding:none]:[minute padding:zero]:[second padding:zero] [period case:upper]"
);

/// Offset of the reader's local timezone, or UTC when it could not be determined.
///
/// `UtcOffset::current_local_offset` only succeeds while the process is single-threaded, so
/// callers look it up first and hand the result in here once logging is available.
#[tracing::instrument(level = "trace")]
pub fn offset_or_utc(local: Result<UtcOffset, IndeterminateOffset>) -> UtcOffset {
    match local {
        Ok(offset) => offset,
        Err(e) => {
            warn!("Unable to determine the local offset, using UTC: {}", e);
            UtcOffset::UTC
        }
    }
}

/// Short calendar date in the viewer's offset, e.g. `1/2/2024`.
#[tracing::instrument(level = "trace")]
pub fn display_date(dt: &OffsetDateTime, offset: UtcOffset) -> String {
    let local = dt.to_offset(offset);
    let out = local
        .format(DATE_FORMAT)
        .unwrap_or_else(|_| local.date().to_string());
    trace!("Formatted date {} as {}", dt, out);
    out
}

/// Wall-clock time in the viewer's offset, e.g. `10:00:00 AM`.
#[tracing::instrument(level = "trace")]
pub fn display_time(dt: &OffsetDateTime, offset: UtcOffset) -> String {
    let local = dt.to_offset(offset);
    let out = local
        .format(TIME_FORMAT)
        .unwrap_or_else(|_| local.time().to_string());
    trace!("Formatted time {} as {}", dt, out);
    out
}
