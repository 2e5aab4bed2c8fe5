use std::io::{self, Write};
use std::path::PathBuf;

use super::{Analysis, ReportError, Reporter};

/// Serializes the analysis as pretty-printed JSON.
#[derive(Debug, Clone, Default)]
pub struct JsonReporter {
    /// Output file; stdout when `None`.
    path: Option<PathBuf>,
}

impl JsonReporter {
    pub fn stdout() -> Self {
        Self { path: None }
    }

    pub fn to_file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn write_to(&self, writer: &mut impl Write, analysis: &Analysis) -> Result<(), ReportError> {
        serde_json::to_writer_pretty(&mut *writer, analysis)?;
        writeln!(writer)?;
        Ok(())
    }
}

impl Reporter for JsonReporter {
    fn report(&self, analysis: &Analysis) -> Result<(), ReportError> {
        match &self.path {
            Some(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)?;
                }
                let mut file = io::BufWriter::new(std::fs::File::create(path)?);
                self.write_to(&mut file, analysis)?;
                file.flush()?;
            }
            None => {
                let stdout = io::stdout();
                let mut writer = stdout.lock();
                self.write_to(&mut writer, analysis)?;
            }
        }
        Ok(())
    }
}
