use crate::engine::{JobAggregator, RecordOutcome};
use crate::errors::PreparerError;
use crate::models::{AccountingRecord, FIELD_COUNT};

/// Counts of what happened to the input lines of one run.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct ProcessingSummary {
    pub accepted: usize,
    pub merged: usize,
    pub discarded: usize,
    pub skipped: usize,
}

/// Parses one `sacct --parsable2` line. `line_no` is 1-based and only used
/// for error reporting.
pub fn parse_line(line: &str, line_no: usize) -> Result<AccountingRecord, PreparerError> {
    let fields = csv::StringRecord::from(line.split('|').collect::<Vec<_>>());
    if fields.len() != FIELD_COUNT {
        return Err(PreparerError::MalformedRecord {
            line: line_no,
            fields: fields.len(),
        });
    }
    Ok(fields.deserialize(None)?)
}

/// Feeds raw sacct lines through the aggregator.
///
/// Lines with the wrong number of fields are dropped (traced at debug level
/// and counted); the rest of the day is still reported.
pub fn process_lines<I, S>(lines: I, engine: &mut JobAggregator) -> ProcessingSummary
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut summary = ProcessingSummary::default();

    for (i, line) in lines.into_iter().enumerate() {
        let record = match parse_line(line.as_ref(), i + 1) {
            Ok(rec) => rec,
            Err(e) => {
                log::debug!("Skipping bad record: {}", e);
                summary.skipped += 1;
                continue;
            }
        };

        match engine.process(record) {
            RecordOutcome::Accepted => summary.accepted += 1,
            RecordOutcome::Merged => summary.merged += 1,
            RecordOutcome::Discarded => summary.discarded += 1,
        }
    }
    summary
}

/// Renders aggregated jobs as `|`-separated lines joined by `\n`, without a
/// trailing newline.
pub fn render_jobs(engine: &JobAggregator) -> Result<Vec<u8>, PreparerError> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b'|')
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    for job in engine.jobs() {
        wtr.serialize(job)?;
    }

    let mut buf = wtr.into_inner().map_err(|e| e.into_error())?;
    if buf.last() == Some(&b'\n') {
        buf.pop();
    }
    Ok(buf)
}
