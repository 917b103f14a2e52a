use super::{ColumnMapping, DatasetError, SongRecord, UTF8_BOM};
use std::path::Path;
use tracing::debug;

/// A fully loaded song table.
#[derive(Debug, Clone)]
pub struct Dataset {
    headers: Vec<String>,
    records: Vec<SongRecord>,
}

impl Dataset {
    /// Reads the CSV file at `path`.
    ///
    /// Fails when the file can't be parsed, lacks the title or artist
    /// column, or holds no records: the output schema is derived from the
    /// input, so there's nothing to run on. A row wider than the header is
    /// also an error, since its extra cells would have no column to go to.
    pub fn read(path: &Path, columns: &ColumnMapping) -> Result<Self, DatasetError> {
        let bytes = std::fs::read(path).map_err(|e| DatasetError::io(path, e))?;
        let dataset = Self::from_bytes(&bytes, columns)?;
        debug!(
            "Loaded {} records with columns {:?} from {:?}",
            dataset.len(),
            dataset.headers,
            path
        );
        Ok(dataset)
    }

    pub fn from_bytes(bytes: &[u8], columns: &ColumnMapping) -> Result<Self, DatasetError> {
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(bytes);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            return Err(DatasetError::Empty);
        }

        let index_of = |name: &str| headers.iter().position(|h| h == name);
        let title_idx =
            index_of(&columns.title).ok_or_else(|| DatasetError::MissingColumn(columns.title.clone()))?;
        let artist_idx = index_of(&columns.artist)
            .ok_or_else(|| DatasetError::MissingColumn(columns.artist.clone()))?;
        let album_idx = index_of(&columns.album);

        let mut records = Vec::new();
        for (n, row) in reader.records().enumerate() {
            let row = row?;
            if row.len() > headers.len() {
                return Err(DatasetError::ExtraFields {
                    record: n + 1,
                    expected: headers.len(),
                    found: row.len(),
                });
            }
            let mut cells: Vec<Option<String>> = row.iter().map(|c| Some(c.to_string())).collect();
            cells.resize(headers.len(), None);

            let get = |idx: usize| cells[idx].clone().unwrap_or_default();
            let title = get(title_idx);
            let artist = get(artist_idx);
            let album = album_idx.map(get).unwrap_or_default();

            records.push(SongRecord::new(title, artist, album, cells));
        }

        if records.is_empty() {
            return Err(DatasetError::Empty);
        }

        Ok(Self { headers, records })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn records(&self) -> &[SongRecord] {
        &self.records
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> ColumnMapping {
        ColumnMapping::default()
    }

    #[test]
    fn test_reads_with_bom() {
        let data = "\u{feff}title,artist,album,song_id\nTime,Pink Floyd,The Dark Side of the Moon,001\n";
        let dataset = Dataset::from_bytes(data.as_bytes(), &columns()).unwrap();

        assert_eq!(dataset.headers(), ["title", "artist", "album", "song_id"]);
        assert_eq!(dataset.len(), 1);
        let song = &dataset.records()[0];
        assert_eq!(song.title, "Time");
        assert_eq!(song.artist, "Pink Floyd");
        assert_eq!(song.album, "The Dark Side of the Moon");
        assert_eq!(song.cell(3), Some("001"));
    }

    #[test]
    fn test_reads_without_bom() {
        let data = "title,artist\nTime,Pink Floyd\n";
        let dataset = Dataset::from_bytes(data.as_bytes(), &columns()).unwrap();
        assert_eq!(dataset.headers(), ["title", "artist"]);
        assert_eq!(dataset.records()[0].album, "");
    }

    #[test]
    fn test_custom_column_names() {
        let mapping = ColumnMapping {
            title: "歌名".into(),
            artist: "歌手".into(),
            album: "专辑".into(),
            track_id: "歌曲ID".into(),
        };
        let data = "\u{feff}歌名,歌手,专辑,歌曲ID\n晴天,周杰伦,叶惠美,0039MnYb0qxYhV\n";
        let dataset = Dataset::from_bytes(data.as_bytes(), &mapping).unwrap();
        let song = &dataset.records()[0];
        assert_eq!(song.title, "晴天");
        assert_eq!(song.artist, "周杰伦");
        assert_eq!(song.album, "叶惠美");
        assert_eq!(dataset.column_index("歌曲ID"), Some(3));
    }

    #[test]
    fn test_short_rows_keep_absent_cells() {
        let data = "title,artist,album,language,emotion\nTime,Pink Floyd,,EN\n";
        let dataset = Dataset::from_bytes(data.as_bytes(), &columns()).unwrap();
        let song = &dataset.records()[0];
        assert_eq!(song.cell(2), Some(""));
        assert_eq!(song.cell(3), Some("EN"));
        assert_eq!(song.cell(4), None);
    }

    #[test]
    fn test_rows_wider_than_header_are_rejected() {
        let data = "title,artist\nYesterday,The Beatles\nTime,Pink Floyd,EXTRA\n";
        match Dataset::from_bytes(data.as_bytes(), &columns()) {
            Err(DatasetError::ExtraFields {
                record,
                expected,
                found,
            }) => {
                assert_eq!(record, 2);
                assert_eq!(expected, 2);
                assert_eq!(found, 3);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_quoted_fields() {
        let data = "title,artist\n\"Hello, World\",\"Some \"\"Band\"\"\"\n";
        let dataset = Dataset::from_bytes(data.as_bytes(), &columns()).unwrap();
        assert_eq!(dataset.records()[0].title, "Hello, World");
        assert_eq!(dataset.records()[0].artist, "Some \"Band\"");
    }

    #[test]
    fn test_empty_input_is_fatal() {
        assert!(matches!(
            Dataset::from_bytes(b"", &columns()),
            Err(DatasetError::Empty)
        ));
        assert!(matches!(
            Dataset::from_bytes("\u{feff}".as_bytes(), &columns()),
            Err(DatasetError::Empty)
        ));
        assert!(matches!(
            Dataset::from_bytes(b"title,artist\n", &columns()),
            Err(DatasetError::Empty)
        ));
    }

    #[test]
    fn test_missing_required_column() {
        let result = Dataset::from_bytes(b"name,artist\nTime,Pink Floyd\n", &columns());
        match result {
            Err(DatasetError::MissingColumn(name)) => assert_eq!(name, "title"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_read_missing_file() {
        let result = Dataset::read(Path::new("/nonexistent/songs.csv"), &columns());
        assert!(matches!(result, Err(DatasetError::Io { .. })));
    }
}
