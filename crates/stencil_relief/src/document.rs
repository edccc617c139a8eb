//! Document model and the text source/sink seams.
//!
//! Binary document containers are parsed elsewhere. What reaches Stencil is
//! either a [`DocumentTextSource`] implementation supplied by the caller, or the
//! serde model in this module: paragraphs made of styled runs, plus tables of
//! rows of cells of paragraphs. Formatting lives in opaque `properties` maps and
//! is never touched when text is rewritten.

use crate::errors::{SinkError, SourceError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Opaque formatting metadata
pub type Properties = Map<String, Value>;

/// Position of a paragraph-equivalent text unit within a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "in", rename_all = "lowercase")]
pub enum FragmentId {
    /// A top-level paragraph
    Body { paragraph: usize },
    /// A paragraph inside a table cell
    Cell {
        table: usize,
        row: usize,
        cell: usize,
        paragraph: usize,
    },
}

impl fmt::Display for FragmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Body { paragraph } => write!(f, "paragraph {paragraph}"),
            Self::Cell {
                table,
                row,
                cell,
                paragraph,
            } => write!(
                f,
                "table {table}, row {row}, cell {cell}, paragraph {paragraph}"
            ),
        }
    }
}

/// Text of one fragment, tagged with where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFragment {
    pub id: FragmentId,
    pub text: String,
}

impl TextFragment {
    #[inline]
    pub fn new(id: FragmentId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
        }
    }
}

/// Yields the ordered text fragments of a document.
///
/// Order must be stable: body paragraphs in document order, then tables
/// row-major with cell paragraphs in order. First-seen offsets of variables
/// depend on it.
pub trait DocumentTextSource {
    fn fragments(&self) -> Result<Vec<TextFragment>, SourceError>;
}

/// Replaces the text of a fragment in place, keeping its formatting.
pub trait DocumentTextSink {
    fn replace_text(&mut self, id: FragmentId, text: &str) -> Result<(), SinkError>;
}

/// A run of uniformly formatted text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Run {
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub properties: Properties,
}

impl Run {
    #[inline]
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            properties: Properties::new(),
        }
    }
}

/// A paragraph: an ordered list of runs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    #[serde(default)]
    pub runs: Vec<Run>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub properties: Properties,
}

impl Paragraph {
    /// Paragraph with a single unformatted run
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            runs: vec![Run::plain(text)],
            properties: Properties::new(),
        }
    }

    /// Concatenated text of all runs
    pub fn text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }

    /// Replace the paragraph text.
    ///
    /// The whole text goes into the first run and the remaining runs are
    /// emptied; every run keeps its properties. A paragraph without runs gets
    /// one plain run.
    pub fn set_text(&mut self, text: &str) {
        match self.runs.split_first_mut() {
            Some((first, rest)) => {
                first.text.clear();
                first.text.push_str(text);
                for run in rest {
                    run.text.clear();
                }
            }
            None => self.runs.push(Run::plain(text)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    #[serde(default)]
    pub paragraphs: Vec<Paragraph>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    #[serde(default)]
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    #[serde(default)]
    pub rows: Vec<Row>,
}

/// In-memory rich document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub paragraphs: Vec<Paragraph>,
    #[serde(default)]
    pub tables: Vec<Table>,
}

impl Document {
    /// Document made of unformatted body paragraphs
    pub fn from_paragraphs<I, S>(paragraphs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paragraphs: paragraphs.into_iter().map(Paragraph::plain).collect(),
            tables: Vec::new(),
        }
    }

    /// Parse the JSON form of a document
    pub fn from_json(source: &str) -> Result<Self, SourceError> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn paragraph(&self, id: FragmentId) -> Option<&Paragraph> {
        match id {
            FragmentId::Body { paragraph } => self.paragraphs.get(paragraph),
            FragmentId::Cell {
                table,
                row,
                cell,
                paragraph,
            } => self
                .tables
                .get(table)?
                .rows
                .get(row)?
                .cells
                .get(cell)?
                .paragraphs
                .get(paragraph),
        }
    }

    pub fn paragraph_mut(&mut self, id: FragmentId) -> Option<&mut Paragraph> {
        match id {
            FragmentId::Body { paragraph } => self.paragraphs.get_mut(paragraph),
            FragmentId::Cell {
                table,
                row,
                cell,
                paragraph,
            } => self
                .tables
                .get_mut(table)?
                .rows
                .get_mut(row)?
                .cells
                .get_mut(cell)?
                .paragraphs
                .get_mut(paragraph),
        }
    }
}

impl DocumentTextSource for Document {
    fn fragments(&self) -> Result<Vec<TextFragment>, SourceError> {
        let mut fragments = Vec::with_capacity(self.paragraphs.len());

        for (index, paragraph) in self.paragraphs.iter().enumerate() {
            fragments.push(TextFragment::new(
                FragmentId::Body { paragraph: index },
                paragraph.text(),
            ));
        }

        for (table_index, table) in self.tables.iter().enumerate() {
            for (row_index, row) in table.rows.iter().enumerate() {
                for (cell_index, cell) in row.cells.iter().enumerate() {
                    for (paragraph_index, paragraph) in cell.paragraphs.iter().enumerate() {
                        let id = FragmentId::Cell {
                            table: table_index,
                            row: row_index,
                            cell: cell_index,
                            paragraph: paragraph_index,
                        };
                        fragments.push(TextFragment::new(id, paragraph.text()));
                    }
                }
            }
        }

        Ok(fragments)
    }
}

impl DocumentTextSink for Document {
    fn replace_text(&mut self, id: FragmentId, text: &str) -> Result<(), SinkError> {
        let paragraph = self
            .paragraph_mut(id)
            .ok_or(SinkError::FragmentNotFound(id))?;
        paragraph.set_text(text);
        Ok(())
    }
}

/// Plain text where every line is a body paragraph
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlainText {
    lines: Vec<String>,
}

impl PlainText {
    pub fn new(source: &str) -> Self {
        Self {
            lines: source.split('\n').map(str::to_string).collect(),
        }
    }

    /// Reassemble the text; inverse of [`PlainText::new`].
    pub fn to_text(&self) -> String {
        self.lines.join("\n")
    }
}

impl DocumentTextSource for PlainText {
    fn fragments(&self) -> Result<Vec<TextFragment>, SourceError> {
        Ok(self
            .lines
            .iter()
            .enumerate()
            .map(|(index, line)| TextFragment::new(FragmentId::Body { paragraph: index }, line.as_str()))
            .collect())
    }
}

impl DocumentTextSink for PlainText {
    fn replace_text(&mut self, id: FragmentId, text: &str) -> Result<(), SinkError> {
        match id {
            FragmentId::Body { paragraph } => {
                let line = self
                    .lines
                    .get_mut(paragraph)
                    .ok_or(SinkError::FragmentNotFound(id))?;
                line.clear();
                line.push_str(text);
                Ok(())
            }
            FragmentId::Cell { .. } => Err(SinkError::FragmentNotFound(id)),
        }
    }
}
