use crate::error::{ConvertError, PuzzleError};
use crate::expand::{expand_record, CandidateRow};
use crate::puzzle::{advance, Advanced};
use crate::rules::Rules;
use crate::sink::{CleanedWriter, Column, RowWriter};
use crate::source::{PuzzleReader, PuzzleRecord, Step};
use clap::{Args, ValueEnum};
use indicatif::ProgressBar;
use log::{debug, info, warn};
use rayon::prelude::*;
use std::io::{Read, Write};

/// What happens when a single record can't be converted
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnError {
    /// Log it, leave it out of the output and report it in the summary
    #[default]
    Skip,
    /// Stop the whole run
    Abort,
}

#[derive(Args, Debug, Clone)]
pub struct ConvertConfig {
    /// Number of puzzles held in memory and processed together
    #[arg(long, default_value = "100")]
    pub batch_size: usize,

    /// Policy for puzzles that can't be converted
    #[arg(long, value_enum, default_value = "skip")]
    pub on_error: OnError,

    /// Columns to write, in order
    #[arg(long, value_enum, value_delimiter = ',', default_values = ["position", "target"])]
    pub columns: Vec<Column>,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        ConvertConfig {
            batch_size: 100,
            on_error: OnError::Skip,
            columns: vec![Column::Position, Column::Target],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    pub line: u64,
    pub id: Option<String>,
    pub error: PuzzleError,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertSummary {
    /// Records read from the source
    pub records: u64,
    /// Records that made it to the output
    pub converted: u64,
    /// Data rows written, header excluded
    pub rows: u64,
    /// Converted records where no row is labeled as the solution
    pub without_solution: u64,
    pub skipped: Vec<SkippedRecord>,
}

impl ConvertSummary {
    fn fail(
        &mut self,
        record: &PuzzleRecord,
        error: PuzzleError,
        on_error: OnError,
    ) -> Result<(), ConvertError> {
        match on_error {
            OnError::Abort => Err(ConvertError::Record {
                line: record.line,
                source: error,
            }),
            OnError::Skip => {
                warn!(
                    "Skipping puzzle {} at line {}: {}",
                    record.id.as_deref().unwrap_or("-"),
                    record.line,
                    error
                );
                self.skipped.push(SkippedRecord {
                    line: record.line,
                    id: record.id.clone(),
                    error,
                });
                Ok(())
            }
        }
    }
}

/// Feeds the source to `f` in batches of at most `batch_size` records
fn for_each_batch<S, F>(
    reader: &mut PuzzleReader<S>,
    batch_size: usize,
    bar: &ProgressBar,
    mut f: F,
) -> Result<(), ConvertError>
where
    S: Read,
    F: FnMut(Vec<PuzzleRecord>) -> Result<(), ConvertError>,
{
    if batch_size == 0 {
        return Err(ConvertError::InvalidBatchSize);
    }

    loop {
        let batch = reader.read_batch(batch_size)?;
        if batch.is_empty() {
            return Ok(());
        }

        debug!(
            "Batch of {} puzzles up to line {}",
            batch.len(),
            batch.last().map_or(0, |r| r.line)
        );
        bar.inc(batch.len() as u64);

        f(batch)?;
    }
}

/// Turns puzzle records into encoded candidate rows.
///
/// Batches are read one at a time; the records of a batch are expanded in
/// parallel and written back in source order, so the output does not depend
/// on scheduling.
pub fn convert<R, S, W>(
    rules: &R,
    source: S,
    sink: W,
    config: &ConvertConfig,
    bar: &ProgressBar,
) -> Result<ConvertSummary, ConvertError>
where
    R: Rules,
    S: Read,
    W: Write,
{
    let mut reader = PuzzleReader::new(source)?;
    let mut writer = RowWriter::new(sink, config.columns.clone());
    let mut summary = ConvertSummary::default();

    info!(
        "Converting in batches of {} puzzles, columns {:?}",
        config.batch_size, config.columns
    );

    for_each_batch(&mut reader, config.batch_size, bar, |batch| {
        let results: Vec<Result<Vec<CandidateRow>, PuzzleError>> = batch
            .par_iter()
            .map(|record| expand_record(rules, record))
            .collect();

        let mut rows = Vec::new();
        for (record, result) in batch.iter().zip(results) {
            summary.records += 1;

            match result {
                Ok(candidates) => {
                    summary.converted += 1;
                    if !candidates.iter().any(CandidateRow::is_solution) {
                        summary.without_solution += 1;
                    }
                    rows.extend(candidates);
                }
                Err(error) => summary.fail(record, error, config.on_error)?,
            }
        }

        writer.write_rows(&rows).map_err(ConvertError::SinkWrite)
    })?;

    summary.rows = writer.rows_written();
    writer.finish().map_err(ConvertError::SinkWrite)?;

    info!(
        "Converted {} of {} puzzles into {} rows ({} skipped, {} without solution)",
        summary.converted,
        summary.records,
        summary.rows,
        summary.skipped.len(),
        summary.without_solution
    );

    Ok(summary)
}

/// Plays the setup move of every puzzle and writes `[PuzzleId,]FEN,target_move`.
///
/// Records that are already advanced are copied through.
pub fn clean<R, S, W>(
    rules: &R,
    source: S,
    sink: W,
    config: &ConvertConfig,
    bar: &ProgressBar,
) -> Result<ConvertSummary, ConvertError>
where
    R: Rules,
    S: Read,
    W: Write,
{
    let mut reader = PuzzleReader::new(source)?;
    let mut writer = CleanedWriter::new(sink, reader.has_ids()).map_err(ConvertError::SinkWrite)?;
    let mut summary = ConvertSummary::default();

    for_each_batch(&mut reader, config.batch_size, bar, |batch| {
        let results: Vec<Result<Advanced, PuzzleError>> = batch
            .par_iter()
            .map(|record| match &record.step {
                Step::Moves(moves) => advance(rules, &record.fen, moves),
                Step::Target(target_move) => Ok(Advanced {
                    fen: record.fen.clone(),
                    target_move: target_move.clone(),
                }),
                Step::Malformed(reason) => Err(PuzzleError::MalformedRow(reason.clone())),
            })
            .collect();

        for (record, result) in batch.iter().zip(results) {
            summary.records += 1;

            match result {
                Ok(advanced) => {
                    summary.converted += 1;
                    writer
                        .write_puzzle(record.id.as_deref(), &advanced)
                        .map_err(ConvertError::SinkWrite)?;
                }
                Err(error) => summary.fail(record, error, config.on_error)?,
            }
        }

        Ok(())
    })?;

    summary.rows = writer.rows_written();
    writer.finish().map_err(ConvertError::SinkWrite)?;

    info!(
        "Cleaned {} of {} puzzles ({} skipped)",
        summary.converted,
        summary.records,
        summary.skipped.len()
    );

    Ok(summary)
}
