// Output: the filtered cluster file, terminal display, and markdown reports.

pub mod markdown;
pub mod terminal;

use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter};

use crate::clusters::ClusterSet;
use crate::scoring::classifier::{ClusterScore, Verdict};

/// Pretty JSON (2-space indent) with every non-ASCII character written as a
/// `\uXXXX` escape, so files match what the upstream Python tooling
/// (`json.dump(..., indent=2)`) produces byte for byte.
struct AsciiPrettyFormatter<'a> {
    inner: PrettyFormatter<'a>,
}

impl AsciiPrettyFormatter<'_> {
    fn new() -> Self {
        Self {
            inner: PrettyFormatter::with_indent(b"  "),
        }
    }
}

impl Formatter for AsciiPrettyFormatter<'_> {
    fn write_string_fragment<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        for ch in fragment.chars() {
            if ch.is_ascii() {
                writer.write_all(&[ch as u8])?;
            } else {
                let mut units = [0u16; 2];
                for unit in ch.encode_utf16(&mut units) {
                    write!(writer, "\\u{unit:04x}")?;
                }
            }
        }
        Ok(())
    }

    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_array(writer)
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.inner.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object(writer)
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.inner.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object_value(writer)
    }
}

/// Serialize as ASCII-only pretty JSON.
pub fn to_ascii_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, AsciiPrettyFormatter::new());
    value.serialize(&mut ser)?;
    // Only ASCII bytes are ever written
    Ok(String::from_utf8(buf)?)
}

/// Write a cluster set as ASCII-escaped pretty JSON, creating parent
/// directories as needed. Same shape as the clusters input file.
pub fn write_clusters(clusters: &ClusterSet, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let json = to_ascii_json(clusters)?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write clusters to {}", path.display()))?;

    Ok(())
}

/// Format an optional mean for display: fixed 3 decimals, or "-" when absent.
pub fn format_mean(mean: Option<f64>) -> String {
    match mean {
        Some(m) => format!("{m:.3}"),
        None => "-".to_string(),
    }
}

/// Truncate to at most `max_chars` characters, appending "..." if cut.
/// Counts chars, not bytes, so multi-byte tokens never split mid-character.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{truncated}...")
    }
}

/// How many clusters landed in each verdict, in `Verdict::ALL` order.
pub fn verdict_counts(scores: &[ClusterScore]) -> Vec<(Verdict, usize)> {
    Verdict::ALL
        .iter()
        .map(|&v| (v, scores.iter().filter(|s| s.verdict == v).count()))
        .collect()
}

/// One-line run summary, printed after `filter`.
pub fn summary_line(selected: usize) -> String {
    format!("Filtering completed. {selected} clusters selected as economics-related.")
}
