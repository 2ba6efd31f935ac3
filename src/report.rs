use crate::error::PredictError;
use crate::types::PredictionResult;
use std::fmt::Display;
use std::io::{self, Write};

pub const PROGRESS_PREFIX: &str = ">>> ";
pub const ERROR_MARKER: &str = ">>> ERROR:";
pub const RESULT_MARKER: &str = ">>> Final result:";

/// Line-oriented writer for the calling process.
///
/// Every line carries the `>>> ` prefix. The caller finds the result by
/// [`RESULT_MARKER`] and parses the JSON after it. Each line is flushed as written.
pub struct Reporter<W: Write> {
    out: W,
}

impl Reporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn progress(&mut self, message: impl Display) -> io::Result<()> {
        writeln!(self.out, "{}{}", PROGRESS_PREFIX, message)?;
        self.out.flush()
    }

    pub fn result(&mut self, result: &PredictionResult) -> Result<(), PredictError> {
        let line = serde_json::to_string(result)?;
        writeln!(self.out, "{} {}", RESULT_MARKER, line)?;
        self.out.flush()?;
        Ok(())
    }

    pub fn error(&mut self, err: &PredictError) -> io::Result<()> {
        writeln!(self.out, "{} {}", ERROR_MARKER, err)?;
        self.out.flush()
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}
