//! Reads emitted G-code back into words for assertions.

#![allow(dead_code)]

use gmcode_machine::Machine;

/// One address letter and its value, e.g. `X1.5`
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    pub letter: char,
    pub value: f64,
}

/// Emitted program split into lines of words
pub struct GcodeFile {
    lines: Vec<String>,
}

impl GcodeFile {
    pub fn from_machine(m: Machine<Vec<u8>>) -> Self {
        let bytes = m.close().unwrap();
        Self::parse(&String::from_utf8(bytes).unwrap())
    }

    pub fn parse(text: &str) -> Self {
        Self {
            lines: text.lines().map(str::to_string).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, idx: usize) -> &str {
        &self.lines[idx]
    }

    pub fn last(&self) -> &str {
        self.lines.last().unwrap()
    }

    /// Words of line `idx`, ignoring comments and `;` trailers.
    pub fn words(&self, idx: usize) -> Vec<Word> {
        parse_words(&self.lines[idx])
    }

    pub fn value(&self, idx: usize, letter: char) -> Option<f64> {
        self.words(idx)
            .into_iter()
            .find(|w| w.letter == letter)
            .map(|w| w.value)
    }

    /// Whether line `idx` carries the exact word, e.g. `"G2"` or `"P3"`.
    pub fn line_contains_word(&self, idx: usize, word: &str) -> bool {
        let wanted = parse_words(word);
        self.words(idx).iter().any(|w| wanted.contains(w))
    }

    /// Indices of lines whose command is `gcode`.
    pub fn lines_with(&self, gcode: &str) -> Vec<usize> {
        (0..self.len())
            .filter(|&idx| self.line_contains_word(idx, gcode))
            .collect()
    }

    pub fn count_gcode(&self, gcode: &str) -> usize {
        self.lines_with(gcode).len()
    }

    pub fn comments(&self) -> Vec<&str> {
        self.lines
            .iter()
            .filter_map(|l| l.strip_prefix('(').and_then(|l| l.strip_suffix(')')))
            .collect()
    }
}

fn parse_words(line: &str) -> Vec<Word> {
    if line.starts_with('(') {
        return Vec::new();
    }
    let code = line.split(';').next().unwrap_or("");
    code.split_whitespace()
        .filter_map(|token| {
            let mut chars = token.chars();
            let letter = chars.next()?.to_ascii_uppercase();
            let value = chars.as_str().parse().ok()?;
            Some(Word { letter, value })
        })
        .collect()
}
