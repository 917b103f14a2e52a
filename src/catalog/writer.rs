use super::{DatasetError, UTF8_BOM};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Output table held open for a whole pass.
///
/// Every appended row is flushed and synced to disk before `append`
/// returns, so an interrupted run leaves a complete prefix of rows behind.
pub struct DatasetWriter {
    path: PathBuf,
    writer: csv::Writer<File>,
    width: usize,
    written: usize,
}

fn csv_writer(file: File) -> csv::Writer<File> {
    csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::CRLF)
        .from_writer(file)
}

impl DatasetWriter {
    /// Creates (or truncates) `path` and writes the BOM and header row.
    pub fn create(path: &Path, headers: &[String]) -> Result<Self, DatasetError> {
        let mut file = File::create(path).map_err(|e| DatasetError::io(path, e))?;
        file.write_all(UTF8_BOM)
            .map_err(|e| DatasetError::io(path, e))?;

        let mut writer = Self {
            path: path.to_path_buf(),
            writer: csv_writer(file),
            width: headers.len(),
            written: 0,
        };
        writer.write_and_sync(headers)?;
        debug!("Created output {:?} with header {:?}", path, headers);
        Ok(writer)
    }

    /// Opens an existing output for appending.
    ///
    /// The header must match `headers` exactly. Returns the writer and the
    /// number of complete records already present. A missing file is
    /// created from scratch and reports zero existing records.
    pub fn resume(path: &Path, headers: &[String]) -> Result<(Self, usize), DatasetError> {
        if !path.exists() {
            return Ok((Self::create(path, headers)?, 0));
        }

        let bytes = std::fs::read(path).map_err(|e| DatasetError::io(path, e))?;
        let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes);
        if body.is_empty() {
            return Ok((Self::create(path, headers)?, 0));
        }
        // Every quote this writer emits is paired, so an odd count means the
        // last record stopped inside a quoted field.
        let quotes = body.iter().filter(|&&b| b == b'"').count();
        if !body.ends_with(b"\n") || quotes % 2 != 0 {
            return Err(DatasetError::TruncatedOutput(path.to_path_buf()));
        }

        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(body);
        let found: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if found != headers {
            return Err(DatasetError::HeaderMismatch {
                expected: headers.to_vec(),
                found,
            });
        }
        let mut existing = 0;
        let mut last_width = headers.len();
        for record in reader.records() {
            last_width = record?.len();
            existing += 1;
        }
        if last_width != headers.len() {
            return Err(DatasetError::TruncatedOutput(path.to_path_buf()));
        }

        let file = OpenOptions::new()
            .append(true)
            .open(path)
            .map_err(|e| DatasetError::io(path, e))?;
        debug!("Resuming output {:?} after {} records", path, existing);

        Ok((
            Self {
                path: path.to_path_buf(),
                writer: csv_writer(file),
                width: headers.len(),
                written: 0,
            },
            existing,
        ))
    }

    /// Appends one record and makes it durable.
    pub fn append<S: AsRef<str>>(&mut self, row: &[S]) -> Result<(), DatasetError> {
        debug_assert_eq!(row.len(), self.width);
        self.write_and_sync(row)?;
        self.written += 1;
        Ok(())
    }

    fn write_and_sync<S: AsRef<str>>(&mut self, row: &[S]) -> Result<(), DatasetError> {
        self.writer
            .write_record(row.iter().map(|c| c.as_ref()))?;
        self.writer
            .flush()
            .map_err(|e| DatasetError::io(&self.path, e))?;
        self.writer
            .get_ref()
            .sync_data()
            .map_err(|e| DatasetError::io(&self.path, e))
    }

    /// Records appended through this writer (the header is not counted).
    pub fn written(&self) -> usize {
        self.written
    }
}
