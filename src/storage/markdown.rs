//! Structural parsing of markdown specification documents.
//!
//! A document is turned into a tree of [`Section`]s plus the set of
//! [`Identifier`] tokens appearing anywhere in its text. Parsing never fails:
//! malformed input simply yields fewer sections or identifiers.

use std::{collections::HashMap, ops::Range};

use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};
use tracing::{debug, instrument};

use crate::domain::{DocumentKind, Identifier, ParsedDocument, Section};

/// Parses one document.
///
/// Every heading, at any depth, opens a section. A heading closes all open
/// sections at its own level or deeper and becomes a child of the nearest
/// remaining one. Body text is taken only from outermost paragraphs, lists
/// and code blocks, as the full source lines they span; anything else
/// (block quotes, HTML, rules, text before the first heading) is dropped. A
/// heading nested inside a list cuts the list's lines off at that heading.
#[must_use]
#[instrument(level = "debug", skip(text), fields(bytes = text.len()))]
pub fn parse(text: &str, kind: DocumentKind) -> ParsedDocument {
    let mut builder = Builder::new(text);
    let mut depth = 0usize;
    let mut heading: Option<(u8, String)> = None;
    // The outermost body block still being read.
    let mut block: Option<Range<usize>> = None;

    for (event, range) in Parser::new(text).into_offset_iter() {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                // A heading nested in a list ends that list's contribution.
                if let Some(open) = block.take() {
                    builder.push_body_before(open.start, range.start);
                }
                builder.close_body();
                heading = Some((heading_level(level), String::new()));
                depth += 1;
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, title)) = heading.take() {
                    builder.open(title.trim().to_string(), level);
                }
                depth = depth.saturating_sub(1);
            }
            Event::Start(tag) => {
                if depth == 0 && is_body_block(&tag) {
                    block = Some(range);
                }
                depth += 1;
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    if let Some(done) = block.take() {
                        builder.push_body(done);
                    }
                }
            }
            Event::Text(fragment) | Event::Code(fragment) => {
                if let Some((_, title)) = heading.as_mut() {
                    title.push_str(&fragment);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some((_, title)) = heading.as_mut() {
                    title.push(' ');
                }
            }
            _ => {}
        }
    }

    let (sections, index) = builder.finish();
    let identifiers = Identifier::extract(text);

    debug!(
        sections = index.len(),
        identifiers = identifiers.len(),
        "parsed {}",
        kind.file_name()
    );

    ParsedDocument::new(kind, text.to_string(), sections, index, identifiers)
}

const fn is_body_block(tag: &Tag<'_>) -> bool {
    matches!(tag, Tag::Paragraph | Tag::List(_) | Tag::CodeBlock(_))
}

const fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// A section that has been opened but not yet attached to its parent.
struct Open {
    section: Section,
    /// Child indices from the roots down to this section.
    path: Vec<usize>,
}

/// Rebuilds the section tree from the flat stream of headings.
struct Builder<'a> {
    lines: Vec<&'a str>,
    line_starts: Vec<usize>,
    roots: Vec<Section>,
    stack: Vec<Open>,
    index: HashMap<String, Vec<usize>>,
    body: Vec<&'a str>,
}

impl<'a> Builder<'a> {
    fn new(text: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();

        Self {
            lines: text.lines().collect(),
            line_starts,
            roots: Vec::new(),
            stack: Vec::new(),
            index: HashMap::new(),
            body: Vec::new(),
        }
    }

    fn line_at(&self, offset: usize) -> usize {
        self.line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1)
    }

    /// Appends the source lines spanned by `range` to the open section.
    fn push_body(&mut self, range: Range<usize>) {
        if self.stack.is_empty() || range.is_empty() {
            return;
        }
        let first = self.line_at(range.start);
        let last = self.line_at(range.end - 1);
        if let Some(lines) = self.lines.get(first..=last.min(self.lines.len().saturating_sub(1))) {
            self.body.extend_from_slice(lines);
        }
    }

    /// Appends the source lines from the one holding `start` up to, but not
    /// including, the one holding `end`.
    fn push_body_before(&mut self, start: usize, end: usize) {
        if self.stack.is_empty() {
            return;
        }
        let first = self.line_at(start);
        let last = self.line_at(end).min(self.lines.len());
        if let Some(lines) = self.lines.get(first..last) {
            self.body.extend_from_slice(lines);
        }
    }

    /// Moves the accumulated body into the most recently opened section.
    fn close_body(&mut self) {
        let body = std::mem::take(&mut self.body);
        if let Some(open) = self.stack.last_mut() {
            open.section.content = body.join("\n").trim().to_string();
        }
    }

    fn open(&mut self, title: String, level: u8) {
        while self
            .stack
            .last()
            .is_some_and(|open| open.section.level >= level)
        {
            self.attach_top();
        }

        let path = match self.stack.last() {
            Some(parent) => {
                let mut path = parent.path.clone();
                path.push(parent.section.children.len());
                path
            }
            None => vec![self.roots.len()],
        };

        // Later titles win in the flat index.
        self.index.insert(title.clone(), path.clone());

        self.stack.push(Open {
            section: Section {
                title,
                content: String::new(),
                level,
                children: Vec::new(),
            },
            path,
        });
    }

    fn attach_top(&mut self) {
        if let Some(Open { section, .. }) = self.stack.pop() {
            match self.stack.last_mut() {
                Some(parent) => parent.section.children.push(section),
                None => self.roots.push(section),
            }
        }
    }

    fn finish(mut self) -> (Vec<Section>, HashMap<String, Vec<usize>>) {
        self.close_body();
        while !self.stack.is_empty() {
            self.attach_top();
        }
        (self.roots, self.index)
    }
}
