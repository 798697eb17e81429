use crate::expand::CandidateRow;
use crate::puzzle::Advanced;
use clap::ValueEnum;
use std::io::Write;

/// Output column of the training rows
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    /// Encoded position, 832 space-delimited 0/1 values
    Position,
    /// Label, 1.0 for the solution and 0.0 otherwise
    Target,
    /// FEN after the reply
    Fen,
    /// The reply in UCI notation
    Move,
}

impl Column {
    pub fn header(self) -> &'static str {
        match self {
            Column::Position => "Position",
            Column::Target => "Target",
            Column::Fen => "FEN",
            Column::Move => "Move",
        }
    }
}

/// Writes candidate rows as comma-separated text.
///
/// The header goes out exactly once, in front of the first rows, so the
/// destination can be append-only.
pub struct RowWriter<W: Write> {
    writer: csv::Writer<W>,
    columns: Vec<Column>,
    header_written: bool,
    rows_written: u64,
}

impl<W: Write> RowWriter<W> {
    pub fn new(writer: W, columns: Vec<Column>) -> RowWriter<W> {
        RowWriter {
            writer: csv::Writer::from_writer(writer),
            columns,
            header_written: false,
            rows_written: 0,
        }
    }

    fn write_header(&mut self) -> csv::Result<()> {
        if self.header_written {
            return Ok(());
        }

        self.writer
            .write_record(self.columns.iter().map(|c| c.header()))?;
        self.header_written = true;

        Ok(())
    }

    pub fn write_rows(&mut self, rows: &[CandidateRow]) -> csv::Result<()> {
        self.write_header()?;

        for row in rows {
            let fields = self.columns.iter().map(|column| match column {
                Column::Position => row.position.to_string(),
                Column::Target => format!("{:.1}", row.target),
                Column::Fen => row.fen.clone(),
                Column::Move => row.mov.clone(),
            });
            self.writer.write_record(fields)?;
            self.rows_written += 1;
        }

        Ok(())
    }

    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    /// Makes sure the header is present even without rows, and flushes
    pub fn finish(mut self) -> csv::Result<W> {
        self.write_header()?;
        self.writer.flush()?;
        self.writer
            .into_inner()
            .map_err(|e| csv::Error::from(e.into_error()))
    }
}

/// Writes advanced puzzles: `[PuzzleId,]FEN,target_move`
pub struct CleanedWriter<W: Write> {
    writer: csv::Writer<W>,
    with_ids: bool,
    rows_written: u64,
}

impl<W: Write> CleanedWriter<W> {
    pub fn new(writer: W, with_ids: bool) -> csv::Result<CleanedWriter<W>> {
        let mut writer = csv::Writer::from_writer(writer);
        if with_ids {
            writer.write_record(["PuzzleId", "FEN", "target_move"])?;
        } else {
            writer.write_record(["FEN", "target_move"])?;
        }

        Ok(CleanedWriter {
            writer,
            with_ids,
            rows_written: 0,
        })
    }

    pub fn write_puzzle(&mut self, id: Option<&str>, advanced: &Advanced) -> csv::Result<()> {
        let mut fields: Vec<&str> = Vec::with_capacity(3);
        if self.with_ids {
            fields.push(id.unwrap_or(""));
        }
        fields.push(advanced.fen.as_str());
        fields.push(advanced.target_move.as_str());

        self.writer.write_record(&fields)?;
        self.rows_written += 1;

        Ok(())
    }

    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    pub fn finish(mut self) -> csv::Result<W> {
        self.writer.flush()?;
        self.writer
            .into_inner()
            .map_err(|e| csv::Error::from(e.into_error()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nn::encoding::encode;

    fn row(fen: &str, mov: &str, target: f32) -> CandidateRow {
        CandidateRow {
            position: encode(fen).unwrap(),
            target,
            fen: fen.to_string(),
            mov: mov.to_string(),
        }
    }

    #[test]
    fn test_header_once() {
        let mut buffer = Vec::new();
        let mut writer = RowWriter::new(&mut buffer, vec![Column::Target, Column::Move]);

        writer
            .write_rows(&[row("4k3/8/8/8/8/8/8/4K3 b - - 1 1", "e1d1", 0.0)])
            .unwrap();
        writer.write_rows(&[]).unwrap();
        writer
            .write_rows(&[row("4k3/8/8/8/8/8/8/5K2 b - - 1 1", "e1f1", 1.0)])
            .unwrap();
        assert_eq!(writer.rows_written(), 2);
        writer.finish().unwrap();

        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "Target,Move\n0.0,e1d1\n1.0,e1f1\n"
        );
    }

    #[test]
    fn test_header_without_rows() {
        let mut buffer = Vec::new();
        RowWriter::new(&mut buffer, vec![Column::Position, Column::Target])
            .finish()
            .unwrap();

        assert_eq!(String::from_utf8(buffer).unwrap(), "Position,Target\n");
    }

    #[test]
    fn test_position_column() {
        let mut buffer = Vec::new();
        let mut writer = RowWriter::new(&mut buffer, vec![Column::Position, Column::Target]);
        writer
            .write_rows(&[row("4k3/8/8/8/8/8/8/4K3 b - - 1 1", "e1d1", 1.0)])
            .unwrap();
        writer.finish().unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let data = text.lines().nth(1).unwrap();
        let (position, target) = data.split_once(',').unwrap();

        assert_eq!(position.split(' ').count(), 832);
        assert_eq!(target, "1.0");
    }

    #[test]
    fn test_cleaned() {
        let mut buffer = Vec::new();
        let mut writer = CleanedWriter::new(&mut buffer, true).unwrap();
        writer
            .write_puzzle(
                Some("00008"),
                &Advanced {
                    fen: "4k3/8/8/8/8/8/8/4K3 b - - 1 1".to_string(),
                    target_move: "e8d8".to_string(),
                },
            )
            .unwrap();
        writer.finish().unwrap();

        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "PuzzleId,FEN,target_move\n00008,4k3/8/8/8/8/8/8/4K3 b - - 1 1,e8d8\n"
        );
    }
}
