use log::trace;

use crate::models::{ClassSpan, SpanId};
use crate::parser::{class_header, is_identifier_char, HeaderTail};

const CLASS_KEYWORD: &str = "class";

/// A span whose body the scanner is currently inside
#[derive(Debug, Clone, Copy)]
struct OpenSpan {
    id: SpanId,
    body_end: usize,
    extent_end: usize,
}

/// Lazy, depth-first scanner over brace-delimited class definitions.
///
/// Spans come out in header order: a class, then everything nested in it,
/// then the classes after it. Each span is delimited by counting braces from
/// its opening brace, so nesting depth is only bounded by the document.
/// Braces inside strings and comments are counted like any other.
#[derive(Debug, Clone)]
pub struct ClassScanner<'a> {
    document: &'a str,
    cursor: usize,
    open: Vec<OpenSpan>,
    next_id: usize,
    finished: bool,
}

/// Scan `document` for class spans starting at byte offset `from`
pub fn scan(document: &str, from: usize) -> ClassScanner<'_> {
    let mut cursor = from.min(document.len());
    while !document.is_char_boundary(cursor) {
        cursor += 1;
    }
    ClassScanner {
        document,
        cursor,
        open: Vec::new(),
        next_id: 0,
        finished: false,
    }
}

impl<'a> ClassScanner<'a> {
    fn limit(&self) -> usize {
        self.open.last().map_or(self.document.len(), |open| open.body_end)
    }
}

impl<'a> Iterator for ClassScanner<'a> {
    type Item = ClassSpan;

    fn next(&mut self) -> Option<ClassSpan> {
        loop {
            if self.finished {
                return None;
            }

            let limit = self.limit();
            if self.cursor >= limit {
                match self.open.pop() {
                    Some(open) => {
                        self.cursor = open.extent_end;
                        continue;
                    }
                    None => {
                        self.finished = true;
                        return None;
                    }
                }
            }

            let Some(start) = find_class_keyword(self.document, self.cursor, limit) else {
                self.cursor = limit;
                continue;
            };

            let Some(header) = class_header(&self.document[start..limit]) else {
                self.cursor = start + CLASS_KEYWORD.len();
                continue;
            };

            match header.tail {
                HeaderTail::Declaration => {
                    trace!("Skipping forward declaration of {} at {}", header.name, start);
                    self.cursor = start + header.len + 1;
                }
                HeaderTail::EndOfInput => {
                    trace!("Header of {} at {} has no body", header.name, start);
                    self.cursor = limit;
                }
                HeaderTail::Body => {
                    let body_start = start + header.len + 1;
                    let closing = find_matching_brace(self.document, body_start, limit);
                    let (body_end, terminated) = match closing {
                        Some(close) => (close, true),
                        None => {
                            trace!(
                                "Body of {} at {} is not closed, truncating",
                                header.name,
                                start
                            );
                            (limit, false)
                        }
                    };

                    let span = ClassSpan {
                        id: SpanId(self.next_id),
                        name: header.name.to_string(),
                        parent_name: header.parent.map(str::to_string),
                        header_start: start,
                        body_start,
                        body_end,
                        parent: self.open.last().map(|open| open.id),
                        depth: self.open.len(),
                        terminated,
                    };
                    self.next_id += 1;

                    self.open.push(OpenSpan {
                        id: span.id,
                        body_end,
                        extent_end: span.extent_end(),
                    });
                    self.cursor = body_start;
                    return Some(span);
                }
            }
        }
    }
}

/// Offset of the next `class` keyword in `document[from..limit]` that is not
/// the tail of a longer identifier
fn find_class_keyword(document: &str, from: usize, limit: usize) -> Option<usize> {
    let bytes = document.as_bytes();
    let mut from = from;
    while from < limit {
        let found = from + document[from..limit].find(CLASS_KEYWORD)?;
        let preceded_by_identifier = found > 0 && is_identifier_char(bytes[found - 1] as char);
        if !preceded_by_identifier {
            return Some(found);
        }
        from = found + CLASS_KEYWORD.len();
    }
    None
}

/// Offset of the `}` closing a body that starts at `body_start`, searching no
/// further than `limit`
pub fn find_matching_brace(document: &str, body_start: usize, limit: usize) -> Option<usize> {
    let mut depth = 1usize;
    for (offset, byte) in document.as_bytes()[body_start..limit].iter().enumerate() {
        match byte {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(body_start + offset);
                }
            }
            _ => {}
        }
    }
    None
}
