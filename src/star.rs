//! STAR text reading and writing.
//!
//! This is the block/table collaborator of the mapping engine: it turns
//! NMR-STAR text into [`Block`]s of raw [`Table`]s and back, without any
//! knowledge of dictionaries or record families.
//!
//! Inside a save frame, consecutive free tags are grouped into one free
//! table and every `loop_` becomes one loop table. Values are kept as raw
//! wire text; `?` and `.` are passed through for the codec to interpret.
//!
//! # Examples
//!
//! ```
//! use nmrstar::star::{parse, render};
//! use nmrstar::table::{Block, Table};
//!
//! let mut table = Table::new(true);
//! table.push_column("_Entity.Name".into(), vec!["ubiquitin".into()]);
//! let mut block = Block::new("entity_1");
//! block.tables.push(table);
//!
//! let text = render("demo", &[block.clone()]);
//! let document = parse(&text).unwrap();
//! assert_eq!(document.title.as_deref(), Some("demo"));
//! assert_eq!(document.blocks, vec![block]);
//! ```

use crate::error::{Result, StarError};
use crate::table::{Block, Table};
use memchr::{memchr, memmem};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// The file collaborator consumed by the dictionary layer.
pub trait StarFile {
    /// Read every save frame of a file.
    ///
    /// # Errors
    ///
    /// Returns an I/O or [`StarError::Parse`] error.
    fn read(&self, path: &Path) -> Result<Vec<Block>>;

    /// Write blocks to a file, replacing its contents.
    ///
    /// # Errors
    ///
    /// Returns an I/O error.
    fn write(&self, path: &Path, blocks: &[Block]) -> Result<()>;
}

/// STAR text files holding a single `data_` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarText {
    /// Data block title written as `data_<title>`.
    pub title: String,
}

impl StarText {
    /// Create a text file handler with the given data block title.
    pub fn new(title: impl Into<String>) -> Self {
        StarText {
            title: title.into(),
        }
    }
}

impl StarFile for StarText {
    fn read(&self, path: &Path) -> Result<Vec<Block>> {
        read(path).map(|document| document.blocks)
    }

    fn write(&self, path: &Path, blocks: &[Block]) -> Result<()> {
        write(path, &self.title, blocks)
    }
}

/// A parsed STAR document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    /// Title of the first `data_` block, if any.
    pub title: Option<String>,
    /// Save frames in file order.
    pub blocks: Vec<Block>,
}

/// Read and parse a STAR file.
///
/// # Errors
///
/// Returns an I/O error or [`StarError::Parse`].
pub fn read(path: &Path) -> Result<Document> {
    let mut reader = StarReader::new(BufReader::new(File::open(path)?));
    let document = reader.read_document()?;
    tracing::info!(
        path = %path.display(),
        blocks = document.blocks.len(),
        "read NMR-STAR file"
    );
    Ok(document)
}

/// Render blocks and write them to a file.
///
/// # Errors
///
/// Returns an I/O error.
pub fn write(path: &Path, title: &str, blocks: &[Block]) -> Result<()> {
    let mut writer = StarWriter::new(BufWriter::new(File::create(path)?), title);
    writer.write_blocks(blocks)?;
    writer.finish()?;
    tracing::info!(
        path = %path.display(),
        blocks = blocks.len(),
        "wrote NMR-STAR file"
    );
    Ok(())
}

/// Render blocks as STAR text.
#[must_use]
pub fn render(title: &str, blocks: &[Block]) -> String {
    let mut out = format!("data_{title}\n");
    for block in blocks {
        render_block(&mut out, block);
    }
    out
}

/// Reader for STAR text from any [`std::io::Read`] source.
#[derive(Debug)]
pub struct StarReader<R: Read> {
    reader: R,
}

impl<R: Read> StarReader<R> {
    /// Create a new reader.
    pub fn new(reader: R) -> Self {
        StarReader { reader }
    }

    /// Read the whole source and parse it.
    ///
    /// # Errors
    ///
    /// Returns an I/O error (including invalid UTF-8) or [`StarError::Parse`].
    pub fn read_document(&mut self) -> Result<Document> {
        let mut text = String::new();
        self.reader.read_to_string(&mut text)?;
        parse(&text)
    }
}

/// Writer for STAR text to any [`std::io::Write`] destination.
#[derive(Debug)]
pub struct StarWriter<W: Write> {
    writer: W,
    title: String,
    header_written: bool,
    blocks_written: usize,
}

impl<W: Write> StarWriter<W> {
    /// Create a new writer. The `data_` header is written with the first block.
    pub fn new(writer: W, title: impl Into<String>) -> Self {
        StarWriter {
            writer,
            title: title.into(),
            header_written: false,
            blocks_written: 0,
        }
    }

    /// Write one save frame.
    ///
    /// # Errors
    ///
    /// Returns an I/O error.
    pub fn write_block(&mut self, block: &Block) -> Result<()> {
        self.write_header()?;
        let mut out = String::new();
        render_block(&mut out, block);
        self.writer.write_all(out.as_bytes())?;
        self.blocks_written += 1;
        Ok(())
    }

    /// Write several save frames.
    ///
    /// # Errors
    ///
    /// Returns an I/O error.
    pub fn write_blocks(&mut self, blocks: &[Block]) -> Result<()> {
        blocks.iter().try_for_each(|block| self.write_block(block))
    }

    /// Number of save frames written so far.
    #[must_use]
    pub fn blocks_written(&self) -> usize {
        self.blocks_written
    }

    /// Write the header if nothing was written yet, then flush.
    ///
    /// # Errors
    ///
    /// Returns an I/O error.
    pub fn finish(&mut self) -> Result<()> {
        self.write_header()?;
        self.writer.flush()?;
        Ok(())
    }

    fn write_header(&mut self) -> Result<()> {
        if !self.header_written {
            writeln!(self.writer, "data_{}", self.title)?;
            self.header_written = true;
        }
        Ok(())
    }
}

const INDENT: &str = "   ";

fn render_block(out: &mut String, block: &Block) {
    out.push_str("\nsave_");
    out.push_str(&block.name);
    out.push('\n');

    for table in &block.tables {
        if table.free {
            render_free(out, table);
        } else {
            render_loop(out, table);
        }
    }

    out.push_str("\nsave_\n");
}

fn render_free(out: &mut String, table: &Table) {
    let width = table.column_names.iter().map(String::len).max().unwrap_or(0);
    for (name, column) in table.column_names.iter().zip(&table.columns) {
        let value = column.first().map_or("?", String::as_str);
        out.push_str(INDENT);
        match quote(value) {
            Quoted::Text(text) => {
                out.push_str(name);
                push_text_field(out, text);
            },
            quoted => {
                out.push_str(&format!("{name:<width$}  "));
                push_quoted(out, &quoted);
                out.push('\n');
            },
        }
    }
}

fn render_loop(out: &mut String, table: &Table) {
    out.push('\n');
    out.push_str(INDENT);
    out.push_str("loop_\n");
    for name in &table.column_names {
        out.push_str(INDENT);
        out.push_str(INDENT);
        out.push_str(name);
        out.push('\n');
    }
    out.push('\n');

    for row in 0..table.nrows() {
        out.push_str(INDENT);
        out.push_str(INDENT);
        for (i, column) in table.columns.iter().enumerate() {
            let value = column.get(row).map_or("?", String::as_str);
            match quote(value) {
                Quoted::Text(text) => push_text_field(out, text),
                quoted => {
                    if i > 0 {
                        out.push(' ');
                    }
                    push_quoted(out, &quoted);
                },
            }
        }
        out.push('\n');
    }

    out.push('\n');
    out.push_str(INDENT);
    out.push_str("stop_\n");
}

enum Quoted<'a> {
    Bare(&'a str),
    Single(&'a str),
    Double(&'a str),
    Text(&'a str),
}

fn quote(value: &str) -> Quoted<'_> {
    if value.contains('\n') {
        return Quoted::Text(value);
    }
    if !needs_quotes(value) {
        return Quoted::Bare(value);
    }
    if !value.contains('\'') {
        Quoted::Single(value)
    } else if !value.contains('"') {
        Quoted::Double(value)
    } else {
        Quoted::Text(value)
    }
}

fn needs_quotes(value: &str) -> bool {
    let Some(first) = value.chars().next() else {
        return true;
    };
    if matches!(first, '_' | '#' | '\'' | '"' | ';' | '[' | ']') {
        return true;
    }
    if value.chars().any(char::is_whitespace) {
        return true;
    }
    let lower = value.to_ascii_lowercase();
    ["data_", "save_", "loop_", "stop_", "global_"]
        .iter()
        .any(|reserved| lower.starts_with(reserved))
}

fn push_quoted(out: &mut String, quoted: &Quoted<'_>) {
    match quoted {
        Quoted::Bare(v) => out.push_str(v),
        Quoted::Single(v) => {
            out.push('\'');
            out.push_str(v);
            out.push('\'');
        },
        Quoted::Double(v) => {
            out.push('"');
            out.push_str(v);
            out.push('"');
        },
        Quoted::Text(v) => push_text_field(out, v),
    }
}

/// Line prefix used when a text field value would otherwise close early.
const TEXT_PREFIX: &str = "> ";

fn push_text_field(out: &mut String, text: &str) {
    out.push_str("\n;");
    if text.contains("\n;") || strip_text_prefix(text).is_some() {
        out.push_str(TEXT_PREFIX);
        out.push_str("\\\n");
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(TEXT_PREFIX);
            out.push_str(line);
        }
    } else {
        out.push_str(text);
    }
    out.push_str("\n;\n");
}

/// Undo the CIF 2.0 text prefix protocol: a first line of `<prefix>\` means
/// every following line starts with `<prefix>`, which is removed.
fn strip_text_prefix(content: &str) -> Option<String> {
    let (header, body) = content.split_once('\n')?;
    let prefix = header.strip_suffix('\\').filter(|p| !p.is_empty())?;
    let lines = body
        .split('\n')
        .map(|line| line.strip_prefix(prefix))
        .collect::<Option<Vec<_>>>()?;
    Some(lines.join("\n"))
}

/// Parse STAR text into a [`Document`].
///
/// Tags and loops outside save frames are skipped.
///
/// # Errors
///
/// Returns [`StarError::Parse`] with the byte offset of the offending token.
pub fn parse(input: &str) -> Result<Document> {
    Parser::new(input).parse_document()
}

#[derive(Debug)]
enum Token {
    DataBlock(String),
    SaveStart(String),
    SaveEnd,
    LoopStart,
    Stop,
    Tag(String),
    Val(String),
    Eof,
}

struct Parser<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
    token_start: usize,
    at_line_start: bool,
    pending: Option<(usize, Token)>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Parser {
            input,
            bytes: input.as_bytes(),
            pos: 0,
            token_start: 0,
            at_line_start: true,
            pending: None,
        }
    }

    fn next(&mut self) -> Result<Token> {
        if let Some((start, token)) = self.pending.take() {
            self.token_start = start;
            return Ok(token);
        }
        self.scan_token()
    }

    fn push_back(&mut self, token: Token) {
        self.pending = Some((self.token_start, token));
    }

    fn error(&self, message: impl Into<String>) -> StarError {
        StarError::Parse {
            offset: self.token_start,
            message: message.into(),
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                b' ' | b'\t' | b'\r' => self.pos += 1,
                b'\n' => {
                    self.pos += 1;
                    self.at_line_start = true;
                },
                b'#' => {
                    self.pos = memchr(b'\n', &self.bytes[self.pos..])
                        .map_or(self.bytes.len(), |i| self.pos + i);
                },
                _ => break,
            }
        }
    }

    fn scan_token(&mut self) -> Result<Token> {
        self.skip_whitespace_and_comments();
        self.token_start = self.pos;
        if self.pos >= self.bytes.len() {
            return Ok(Token::Eof);
        }

        let b = self.bytes[self.pos];
        if b == b';' && self.at_line_start {
            return self.scan_text_field();
        }
        self.at_line_start = false;

        if b == b'\'' || b == b'"' {
            return self.scan_quoted(b);
        }

        let start = self.pos;
        while self.pos < self.bytes.len() && !self.bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
        Ok(classify(&self.input[start..self.pos]))
    }

    fn scan_quoted(&mut self, quote: u8) -> Result<Token> {
        let content_start = self.pos + 1;
        let mut search = content_start;
        loop {
            let Some(offset) = memchr(quote, &self.bytes[search..]) else {
                return Err(self.error("unterminated quoted string"));
            };
            let end = search + offset;
            // A closing quote must be followed by whitespace or end of input.
            let next = self.bytes.get(end + 1);
            if next.map_or(true, u8::is_ascii_whitespace) {
                self.pos = end + 1;
                return Ok(Token::Val(self.input[content_start..end].to_string()));
            }
            search = end + 1;
        }
    }

    fn scan_text_field(&mut self) -> Result<Token> {
        let content_start = self.pos + 1;
        let Some(offset) = memmem::find(&self.bytes[content_start..], b"\n;") else {
            return Err(self.error("unterminated semicolon text field"));
        };
        let content_end = content_start + offset;
        self.pos = content_end + 2;
        self.at_line_start = false;
        let text = self.input[content_start..content_end].trim_end_matches('\r');
        Ok(Token::Val(strip_text_prefix(text).unwrap_or_else(|| text.to_string())))
    }

    fn parse_document(&mut self) -> Result<Document> {
        let mut document = Document::default();
        loop {
            match self.next()? {
                Token::Eof => break,
                Token::DataBlock(name) => {
                    document.title.get_or_insert(name);
                },
                Token::SaveStart(name) => {
                    let block = self.parse_save_frame(name)?;
                    document.blocks.push(block);
                },
                Token::LoopStart => {
                    self.parse_loop()?;
                },
                Token::Tag(_) => {
                    if let token @ (Token::Tag(_) | Token::LoopStart | Token::SaveStart(_)) =
                        self.next()?
                    {
                        self.push_back(token);
                    }
                },
                Token::SaveEnd => return Err(self.error("save_ without an open save frame")),
                Token::Stop | Token::Val(_) => {},
            }
        }
        Ok(document)
    }

    fn parse_save_frame(&mut self, name: String) -> Result<Block> {
        let mut block = Block::new(name);
        let mut free: Option<Table> = None;

        loop {
            match self.next()? {
                Token::SaveEnd => break,
                Token::Tag(tag) => match self.next()? {
                    Token::Val(value) => {
                        free.get_or_insert_with(|| Table::new(true))
                            .push_column(tag, vec![value]);
                    },
                    _ => return Err(self.error(format!("tag '{tag}' has no value"))),
                },
                Token::LoopStart => {
                    block.tables.extend(free.take());
                    block.tables.push(self.parse_loop()?);
                },
                Token::Eof | Token::DataBlock(_) | Token::SaveStart(_) => {
                    return Err(self.error(format!("save frame '{}' is not terminated", block.name)));
                },
                Token::Val(value) => {
                    return Err(self.error(format!("value '{value}' without a tag")));
                },
                Token::Stop => return Err(self.error("stop_ outside a loop")),
            }
        }

        block.tables.extend(free);
        Ok(block)
    }

    fn parse_loop(&mut self) -> Result<Table> {
        let loop_start = self.token_start;
        let mut table = Table::new(false);

        loop {
            match self.next()? {
                Token::Tag(tag) => table.column_names.push(tag),
                other => {
                    self.push_back(other);
                    break;
                },
            }
        }
        if table.column_names.is_empty() {
            return Err(StarError::Parse {
                offset: loop_start,
                message: "loop_ without tags".to_string(),
            });
        }

        let ncols = table.column_names.len();
        table.columns = vec![Vec::new(); ncols];
        let mut count = 0usize;
        loop {
            match self.next()? {
                Token::Val(value) => {
                    table.columns[count % ncols].push(value);
                    count += 1;
                },
                Token::Stop => break,
                other => {
                    self.push_back(other);
                    break;
                },
            }
        }

        if count % ncols != 0 {
            return Err(StarError::Parse {
                offset: loop_start,
                message: format!("loop has {count} values for {ncols} tags"),
            });
        }
        Ok(table)
    }
}

fn classify(word: &str) -> Token {
    let lower = word.to_ascii_lowercase();
    if let Some(name) = lower.strip_prefix("data_").map(|_| &word[5..]) {
        Token::DataBlock(name.to_string())
    } else if lower == "loop_" {
        Token::LoopStart
    } else if lower == "stop_" {
        Token::Stop
    } else if lower == "save_" {
        Token::SaveEnd
    } else if lower.starts_with("save_") {
        Token::SaveStart(word[5..].to_string())
    } else if word.starts_with('_') {
        Token::Tag(word.to_string())
    } else {
        Token::Val(word.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
data_relax_results

save_600.0_MHz_heteronuclear_R1_1
   _Heteronucl_T1_list.Sf_category                heteronucl_T1_relaxation
   _Heteronucl_T1_list.Sample_condition_list_label $conditions_1
   _Heteronucl_T1_list.Spectrometer_frequency_1H   600.0
   _Heteronucl_T1_list.Details
;
Measured at 298 K.
;

   loop_
      _T1.ID
      _T1.Comp_ID
      _T1.Val

      1 ALA 1.2
      2 GLY ?   # missing value
   stop_

save_
";

    #[test]
    fn test_parse_save_frame() {
        let document = parse(SAMPLE).unwrap();
        assert_eq!(document.title.as_deref(), Some("relax_results"));
        assert_eq!(document.blocks.len(), 1);

        let block = &document.blocks[0];
        assert_eq!(block.name, "600.0_MHz_heteronuclear_R1_1");
        assert_eq!(block.tables.len(), 2);

        let free = &block.tables[0];
        assert!(free.free);
        assert_eq!(free.column_names.len(), 4);
        assert_eq!(
            free.first_value("_Heteronucl_T1_list.Details"),
            Some("\nMeasured at 298 K.")
        );

        let data = &block.tables[1];
        assert!(!data.free);
        assert_eq!(data.column("_T1.Comp_ID").unwrap(), ["ALA", "GLY"]);
        assert_eq!(data.column("_T1.Val").unwrap(), ["1.2", "?"]);
    }

    #[test]
    fn test_render_round_trip_with_quoting() {
        let mut free = Table::new(true);
        free.push_column("_Citation.Title".into(), vec!["NMR relaxation of 'ubiquitin'".into()]);
        free.push_column("_Citation.Journal_abbrev".into(), vec!["J. Mol. Biol.".into()]);
        free.push_column("_Citation.Details".into(), vec!["line one\nline two".into()]);
        free.push_column("_Citation.Status".into(), vec!["_underscore".into()]);

        let mut authors = Table::new(false);
        authors.push_column(
            "_Citation_author.Given_name".into(),
            vec!["Edward".into(), "Mary Ann".into()],
        );
        authors.push_column(
            "_Citation_author.Family_name".into(),
            vec!["d'Auvergne".into(), "?".into()],
        );

        let mut block = Block::new("citation_1");
        block.tables = vec![free, authors];

        let text = render("test", &[block.clone()]);
        let document = parse(&text).unwrap();
        assert_eq!(document.blocks, vec![block]);
    }

    #[test]
    fn test_text_field_with_semicolon_lines() {
        let script = "x = 1\n; note\ny = 2\n;";
        let mut free = Table::new(true);
        free.push_column("_Method_file.Text".into(), vec![script.into()]);
        free.push_column("_Method_file.Name".into(), vec!["run.py".into()]);
        let mut block = Block::new("method_1");
        block.tables.push(free);

        let text = render("t", &[block.clone()]);
        assert!(text.contains("\n;> \\\n> x = 1\n> ; note\n"));
        assert_eq!(parse(&text).unwrap().blocks, vec![block]);
    }

    #[test]
    fn test_text_resembling_prefix_header_is_kept() {
        let value = "a\\\nab";
        let mut looped = Table::new(false);
        looped.push_column("_Method_param.Text".into(), vec![value.into(), "plain\ntext".into()]);
        let mut block = Block::new("method_1");
        block.tables.push(looped);

        let document = parse(&render("t", &[block.clone()])).unwrap();
        assert_eq!(document.blocks, vec![block]);

        let unfolded = parse("data_x\nsave_a\n   _A.b\n;#\\\n# line\n#\n;\nsave_\n").unwrap();
        assert_eq!(unfolded.blocks[0].tables[0].first_value("_A.b"), Some(" line\n"));
    }

    #[test]
    fn test_empty_loop() {
        let mut table = Table::new(false);
        table.push_column("_Software_citation.Citation_ID".into(), Vec::new());
        table.push_column("_Software_citation.Software_ID".into(), Vec::new());
        let mut block = Block::new("software_1");
        block.tables.push(table);

        let document = parse(&render("t", &[block.clone()])).unwrap();
        assert_eq!(document.blocks[0], block);
        assert_eq!(document.blocks[0].tables[0].nrows(), 0);
    }

    #[test]
    fn test_parse_errors() {
        let err = parse("data_x\nsave_a\n   _A.b 'open\nsave_\n").unwrap_err();
        assert!(matches!(err, StarError::Parse { .. }));

        let err = parse("data_x\nsave_a\n   loop_\n      _A.b\n      _A.c\n      1 2 3\n   stop_\nsave_\n")
            .unwrap_err();
        assert!(matches!(err, StarError::Parse { ref message, .. } if message.contains("3 values")));

        let err = parse("data_x\nsave_a\n   _A.b 1\n").unwrap_err();
        assert!(matches!(err, StarError::Parse { ref message, .. } if message.contains("not terminated")));
    }

    #[test]
    fn test_writer_counts_blocks() {
        let mut buffer = Vec::new();
        {
            let mut writer = StarWriter::new(&mut buffer, "empty");
            writer.write_blocks(&[Block::new("a"), Block::new("b")]).unwrap();
            assert_eq!(writer.blocks_written(), 2);
            writer.finish().unwrap();
        }
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.starts_with("data_empty\n"));
        assert_eq!(parse(&text).unwrap().blocks.len(), 2);
    }
}
