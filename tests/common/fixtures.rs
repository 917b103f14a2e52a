use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const LIBRARY_CSV: &str = "\
title,artist,album,song_id
Plastic Love,Mariya Takeuchi,Variety,1001
晴天,周杰伦,叶惠美,1002
Clair de Lune,Claude Debussy,Suite bergamasque,1003
Bohemian Rhapsody,Queen,A Night at the Opera,1004
";

pub const LIBRARY_TITLES: [&str; 4] = [
    "Plastic Love",
    "晴天",
    "Clair de Lune",
    "Bohemian Rhapsody",
];

/// A scratch directory holding an input file.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, contents).unwrap();
        path
    }
}

/// Reads a written table back as rows of strings, header included.
pub fn read_rows(path: &Path) -> Vec<Vec<String>> {
    let bytes = std::fs::read(path).unwrap();
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(&bytes);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);
    reader
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect()
}
