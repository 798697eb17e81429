use crate::error::ConvertError;
use crate::puzzle::split_moves;
use csv::{ErrorKind, ReaderBuilder, StringRecord, Trim};
use std::io::Read;

/// What a record holds besides its position
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Raw puzzle: setup move, solution move and the rest of the line
    Moves(Vec<String>),
    /// Cleaned puzzle: the position is already advanced, only the solution remains
    Target(String),
    /// The line could not be read into the fields it needs
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleRecord {
    /// Line in the source, 1 is the header
    pub line: u64,
    pub id: Option<String>,
    pub fen: String,
    pub step: Step,
}

#[derive(Debug, Clone, Copy)]
enum StepColumn {
    Moves(usize),
    Target(usize),
}

#[derive(Debug, Clone, Copy)]
struct Columns {
    id: Option<usize>,
    fen: usize,
    step: StepColumn,
}

impl Columns {
    fn from_header(header: &StringRecord) -> Result<Columns, ConvertError> {
        let find = |name: &str| {
            header
                .iter()
                .position(|n| n.trim_start_matches('\u{feff}').eq_ignore_ascii_case(name))
        };

        let fen = find("FEN").ok_or(ConvertError::MissingColumn("FEN"))?;

        // cleaned files take precedence, their FEN is already advanced
        let step = match (find("target_move"), find("Moves")) {
            (Some(i), _) => StepColumn::Target(i),
            (None, Some(i)) => StepColumn::Moves(i),
            (None, None) => return Err(ConvertError::MissingColumn("Moves")),
        };

        Ok(Columns {
            id: find("PuzzleId"),
            fen,
            step,
        })
    }

    fn required(&self) -> usize {
        let step = match self.step {
            StepColumn::Moves(i) | StepColumn::Target(i) => i,
        };
        self.fen.max(step) + 1
    }
}

/// Reads puzzle records from comma-separated text with a header row.
///
/// Accepts the Lichess puzzle database layout (`PuzzleId,FEN,Moves,...`) and
/// cleaned files (`FEN,target_move`). A line that lacks fields still comes out
/// as a record, with [`Step::Malformed`], so the caller decides what to do
/// with it.
pub struct PuzzleReader<R: Read> {
    reader: csv::Reader<R>,
    columns: Columns,
    record: StringRecord,
}

impl<R: Read> PuzzleReader<R> {
    pub fn new(reader: R) -> Result<PuzzleReader<R>, ConvertError> {
        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let columns = Columns::from_header(reader.headers().map_err(ConvertError::SourceRead)?)?;

        Ok(PuzzleReader {
            reader,
            columns,
            record: StringRecord::new(),
        })
    }

    /// Whether records carry a puzzle id
    pub fn has_ids(&self) -> bool {
        self.columns.id.is_some()
    }

    /// Reads the next record, `None` at the end of the source.
    /// Blank lines are skipped
    pub fn read_record(&mut self) -> Result<Option<PuzzleRecord>, ConvertError> {
        match self.reader.read_record(&mut self.record) {
            Ok(false) => Ok(None),
            Ok(true) => Ok(Some(self.current())),
            // the reader is already past the offending record
            Err(e) if matches!(e.kind(), ErrorKind::Utf8 { .. }) => Ok(Some(PuzzleRecord {
                line: e.position().map_or(0, |p| p.line()),
                id: None,
                fen: String::new(),
                step: Step::Malformed(e.to_string()),
            })),
            Err(e) => Err(ConvertError::SourceRead(e)),
        }
    }

    fn current(&self) -> PuzzleRecord {
        let record = &self.record;
        let field = |i: usize| record.get(i).unwrap_or_default().to_string();

        let step = if record.len() < self.columns.required() {
            Step::Malformed(format!(
                "expected at least {} fields, found {}",
                self.columns.required(),
                record.len()
            ))
        } else {
            match self.columns.step {
                StepColumn::Moves(i) => Step::Moves(split_moves(&field(i))),
                StepColumn::Target(i) => Step::Target(field(i)),
            }
        };

        PuzzleRecord {
            line: record.position().map_or(0, |p| p.line()),
            id: self.columns.id.and_then(|i| record.get(i)).map(str::to_string),
            fen: field(self.columns.fen),
            step,
        }
    }

    /// Reads up to `size` records. An empty batch means the source is exhausted
    pub fn read_batch(&mut self, size: usize) -> Result<Vec<PuzzleRecord>, ConvertError> {
        let mut batch = Vec::with_capacity(size);

        while batch.len() < size {
            match self.read_record()? {
                Some(record) => batch.push(record),
                None => break,
            }
        }

        Ok(batch)
    }
}
