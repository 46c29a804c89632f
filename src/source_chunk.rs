/// Chunk of source code along with information pointing back at the origin
#[derive(PartialEq, Eq, Debug)]
pub struct SourceChunk {
    /// Source text; always a whole number of lines
    pub source: String,

    /// Resolved path of the file the code came from
    pub file: String,

    /// Line in the `file` at which this snippet starts
    pub line_offset: usize,
}

impl SourceChunk {
    /// Lines of the chunk along with their 1-based line numbers in `file`.
    pub fn numbered_lines(&self) -> impl Iterator<Item = (usize, &str)> {
        let first = self.line_offset + 1;
        self.source
            .lines()
            .enumerate()
            .map(move |(i, line)| (first + i, line))
    }
}
