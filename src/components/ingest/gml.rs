//! GML reader.
//!
//! The text is split into brackets and atoms, then walked with a stack of open
//! lists. `node [` / `edge [` open a record; only `key value` pairs directly
//! inside a record are read. Nested lists such as `graphics [ ... ]` are
//! skipped.

use super::RawGraph;
use super::raw::{RawEdge, RawNode};
use crate::components::model::SourceFormat;
use crate::error::{GraphError, Result};

enum Record {
	Node(RawNode),
	Edge(RawEdge),
}

impl Record {
	fn apply(&mut self, key: &str, value: String) {
		match self {
			Record::Node(node) => match key {
				"group" | "type" => node.group = Some(value),
				other => node.set(other, value),
			},
			Record::Edge(edge) => match key {
				"source" => edge.from = Some(value),
				"target" => edge.to = Some(value),
				other => edge.set(other, value),
			},
		}
	}

	fn kind(&self) -> &'static str {
		match self {
			Record::Node(_) => "node",
			Record::Edge(_) => "edge",
		}
	}
}

/// Strip surrounding quotes and undo backslash escapes.
fn unquote(value: &str) -> String {
	let Some(inner) = value
		.strip_prefix('"')
		.and_then(|v| v.strip_suffix('"'))
	else {
		return value.to_string();
	};
	let mut out = String::with_capacity(inner.len());
	let mut chars = inner.chars();
	while let Some(c) = chars.next() {
		if c != '\\' {
			out.push(c);
			continue;
		}
		match chars.next() {
			Some('n') => out.push('\n'),
			Some('r') => out.push('\r'),
			Some('t') => out.push('\t'),
			Some(other) => out.push(other),
			None => out.push('\\'),
		}
	}
	out
}

/// One lexical unit with the line it starts on.
#[derive(Debug, PartialEq)]
enum Token<'a> {
	Open(usize),
	Close(usize),
	Atom(&'a str, usize),
}

/// Split GML into brackets and atoms. Quoted strings (with backslash escapes)
/// are kept whole, quotes included, and may contain brackets or whitespace.
fn tokenize(content: &str) -> Result<Vec<Token<'_>>> {
	let mut tokens = Vec::new();
	let mut chars = content.char_indices().peekable();
	let mut line = 1;

	while let Some((start, c)) = chars.next() {
		match c {
			'\n' => line += 1,
			c if c.is_whitespace() => {}
			'[' => tokens.push(Token::Open(line)),
			']' => tokens.push(Token::Close(line)),
			'"' => {
				let first_line = line;
				let mut escaped = false;
				let mut end = None;
				for (i, c) in chars.by_ref() {
					if c == '\n' {
						line += 1;
					}
					match c {
						_ if escaped => escaped = false,
						'\\' => escaped = true,
						'"' => {
							end = Some(i + 1);
							break;
						}
						_ => {}
					}
				}
				let end = end.ok_or_else(|| {
					GraphError::InvalidGml(format!("unterminated string starting at line {first_line}"))
				})?;
				tokens.push(Token::Atom(&content[start..end], first_line));
			}
			_ => {
				let mut end = content.len();
				while let Some(&(i, next)) = chars.peek() {
					if next.is_whitespace() || matches!(next, '[' | ']' | '"') {
						end = i;
						break;
					}
					chars.next();
				}
				tokens.push(Token::Atom(&content[start..end], line));
			}
		}
	}
	Ok(tokens)
}

/// An open `[` ... `]` list.
enum Frame {
	/// A top-level `node` or `edge` record and the line it opened on.
	Record(Record, usize),
	/// Any other list: the `graph` wrapper or a sub-block inside a record.
	Other,
}

fn push(graph: &mut RawGraph, record: Record) {
	match record {
		Record::Node(node) => graph.nodes.push(node),
		Record::Edge(edge) => graph.edges.push(edge),
	}
}

/// Parse GML text into raw records.
///
/// `key value` pairs directly inside a `node [` or `edge [` list are read,
/// wherever the brackets fall on a line. Lists nested inside a record are
/// skipped. A stray `]`, a key without a value or a record that never closes
/// is an error.
pub fn parse(content: &str) -> Result<RawGraph> {
	let mut graph = RawGraph::new(SourceFormat::Gml);
	let mut stack: Vec<Frame> = Vec::new();
	let mut tokens = tokenize(content)?.into_iter();

	while let Some(token) = tokens.next() {
		let (key, line) = match token {
			Token::Atom(key, line) => (key, line),
			Token::Close(line) => match stack.pop() {
				Some(Frame::Record(record, _)) => {
					push(&mut graph, record);
					continue;
				}
				Some(Frame::Other) => continue,
				None => return Err(GraphError::InvalidGml(format!("unbalanced `]` at line {line}"))),
			},
			Token::Open(line) => {
				return Err(GraphError::InvalidGml(format!("`[` without a key at line {line}")));
			}
		};

		let in_record = stack.iter().any(|frame| matches!(frame, Frame::Record(..)));
		match tokens.next() {
			Some(Token::Open(_)) => {
				let record = match key {
					_ if in_record => None,
					"node" => Some(Record::Node(RawNode::default())),
					"edge" => Some(Record::Edge(RawEdge::default())),
					_ => None,
				};
				stack.push(match record {
					Some(record) => Frame::Record(record, line),
					None => Frame::Other,
				});
			}
			Some(Token::Atom(value, _)) => {
				if let Some(Frame::Record(record, _)) = stack.last_mut() {
					record.apply(key, unquote(value));
				}
			}
			Some(Token::Close(_)) | None => {
				return Err(GraphError::InvalidGml(format!("key `{key}` at line {line} has no value")));
			}
		}
	}

	while let Some(frame) = stack.pop() {
		if let Frame::Record(record, line) = frame {
			return Err(GraphError::InvalidGml(format!(
				"unterminated {} block starting at line {line}",
				record.kind()
			)));
		}
	}
	Ok(graph)
}
