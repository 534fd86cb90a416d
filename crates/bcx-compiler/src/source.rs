//! Input sources of a translation unit.
//!
//! All inputs of one invocation live in a `SourceMap`, in command-line
//! order. Each source keeps its text together with a line-start index, so
//! diagnostics can turn any byte offset into a 1-based line/column pair
//! without rescanning the file per message.

use std::fmt;

/// Handle to one source of the current translation unit.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default, PartialOrd, Ord)]
pub struct SourceId(u32);

impl SourceId {
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

/// Where a source came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceName {
    /// Inline text (tests, one-liner input).
    Inline,
    Stdin,
    File(String),
}

impl SourceName {
    /// Name shown in diagnostics.
    pub fn display(&self) -> &str {
        match self {
            SourceName::Inline => "<source>",
            SourceName::Stdin => "<stdin>",
            SourceName::File(path) => path,
        }
    }
}

impl fmt::Display for SourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display())
    }
}

/// A borrowed view of one source.
#[derive(Copy, Clone, Debug)]
pub struct Source<'a> {
    pub id: SourceId,
    pub name: &'a SourceName,
    pub text: &'a str,
}

#[derive(Debug)]
struct SourceFile {
    name: SourceName,
    text: String,
    /// Byte offset of the first character of every line.
    line_starts: Vec<u32>,
}

impl SourceFile {
    fn new(name: SourceName, text: String) -> Self {
        let mut line_starts = vec![0u32];
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i as u32 + 1);
            }
        }
        Self {
            name,
            text,
            line_starts,
        }
    }

    /// The line whose start is nearest at or before `offset`.
    fn line_col(&self, offset: u32) -> (u32, u32) {
        let offset = offset.min(self.text.len() as u32);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        (line as u32 + 1, offset - self.line_starts[line] + 1)
    }
}

/// All inputs of one compiler invocation, in the order they were added.
#[derive(Debug, Default)]
pub struct SourceMap {
    files: Vec<SourceFile>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, path: &str, text: &str) -> SourceId {
        self.push(SourceName::File(path.to_owned()), text)
    }

    pub fn add_stdin(&mut self, text: &str) -> SourceId {
        self.push(SourceName::Stdin, text)
    }

    pub fn add_inline(&mut self, text: &str) -> SourceId {
        self.push(SourceName::Inline, text)
    }

    /// Map holding a single inline source. Convenience for tests.
    pub fn inline(text: &str) -> Self {
        let mut map = Self::new();
        map.add_inline(text);
        map
    }

    pub fn text(&self, id: SourceId) -> &str {
        &self.file(id).text
    }

    pub fn name(&self, id: SourceId) -> &SourceName {
        &self.file(id).name
    }

    /// 1-based line and column of a byte offset. Offsets past the end
    /// report the position just after the last character, where
    /// end-of-input diagnostics anchor.
    pub fn line_col(&self, id: SourceId, offset: u32) -> (u32, u32) {
        self.file(id).line_col(offset)
    }

    pub fn get(&self, id: SourceId) -> Source<'_> {
        let file = self.file(id);
        Source {
            id,
            name: &file.name,
            text: &file.text,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Source<'_>> {
        self.files.iter().enumerate().map(|(i, file)| Source {
            id: SourceId(i as u32),
            name: &file.name,
            text: &file.text,
        })
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    fn push(&mut self, name: SourceName, text: &str) -> SourceId {
        let id = SourceId(self.files.len() as u32);
        self.files.push(SourceFile::new(name, text.to_owned()));
        id
    }

    fn file(&self, id: SourceId) -> &SourceFile {
        self.files.get(id.0 as usize).expect("no such source")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sources_keep_addition_order() {
        let mut map = SourceMap::new();
        let a = map.add_file("lib.b", "x 1;");
        let b = map.add_stdin("y 2;");
        let c = map.add_inline("main(){}");

        assert_eq!(map.len(), 3);
        assert!(a < b && b < c);

        let names: Vec<String> = map.iter().map(|s| s.name.to_string()).collect();
        assert_eq!(names, vec!["lib.b", "<stdin>", "<source>"]);
        assert_eq!(map.text(c), "main(){}");
    }

    #[test]
    fn view_matches_accessors() {
        let map = SourceMap::inline("return;");
        let source = map.iter().next().unwrap();
        assert_eq!(source.text, map.text(source.id));
        assert_eq!(source.name, map.name(source.id));
        assert_eq!(*source.name, SourceName::Inline);
    }

    #[test]
    fn line_index_walks_line_starts() {
        let map = SourceMap::inline("main(){\n  x;\n}\n");
        let id = map.iter().next().unwrap().id;

        assert_eq!(map.line_col(id, 0), (1, 1)); // 'm'
        assert_eq!(map.line_col(id, 7), (1, 8)); // the newline itself
        assert_eq!(map.line_col(id, 8), (2, 1)); // first char of line 2
        assert_eq!(map.line_col(id, 10), (2, 3)); // 'x'
        assert_eq!(map.line_col(id, 13), (3, 1)); // '}'
    }

    #[test]
    fn offsets_past_the_end_anchor_after_last_char() {
        let map = SourceMap::inline("ab");
        let id = map.iter().next().unwrap().id;
        assert_eq!(map.line_col(id, 2), (1, 3));
        assert_eq!(map.line_col(id, 999), (1, 3));

        // A trailing newline opens one more (empty) line.
        let map = SourceMap::inline("ab\n");
        let id = map.iter().next().unwrap().id;
        assert_eq!(map.line_col(id, 3), (2, 1));
    }

    #[test]
    fn empty_source_still_has_a_position() {
        let map = SourceMap::inline("");
        let id = map.iter().next().unwrap().id;
        assert_eq!(map.line_col(id, 0), (1, 1));
        assert!(!map.is_empty());
    }

    #[test]
    #[should_panic(expected = "no such source")]
    fn foreign_id_panics() {
        let map = SourceMap::new();
        let other = SourceMap::inline("x;");
        let id = other.iter().next().unwrap().id;
        let _ = map.text(id);
    }
}
