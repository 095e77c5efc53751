//! Reader for fragment scripts.
//!
//! The reader does not evaluate JavaScript. It finds the `var <binding> = {}`
//! declaration and then every `<binding>["group"] = [ ... ];` assignment after
//! it, in source order. Any other statement is skipped. A group assigned twice
//! keeps its first position and the entries of its last assignment, as the
//! object would after the script runs.

use fragment::{Fragment, FragmentBatch, GroupName};
use tracing::debug;

use crate::config::{is_ident_continue, ScriptConfig};
use crate::error::{CodecError, CodecResult};

/// Parses a fragment script into the batch it registers.
pub fn parse_script(source: &str, config: &ScriptConfig) -> CodecResult<FragmentBatch> {
    config.validate()?;
    let binding = config.binding.as_str();

    let mut cursor = Cursor::new(source);
    if !cursor.seek_declaration(binding) {
        return Err(CodecError::MissingBinding {
            binding: binding.to_string(),
        });
    }

    let mut batch = FragmentBatch::new();
    while cursor.seek_assignment(binding) {
        let fragment = cursor.assignment()?;
        batch.replace_or_push(fragment);
    }

    debug!(
        groups = batch.len(),
        entries = batch.entry_count(),
        "parsed fragment script"
    );
    Ok(batch)
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn skip_ws(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn eat(&mut self, c: char) -> bool {
        self.skip_ws();
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char, expected: &'static str) -> CodecResult<()> {
        if self.eat(c) {
            Ok(())
        } else {
            Err(CodecError::unexpected(self.pos, expected))
        }
    }

    /// Consumes `word` if it appears next as a whole identifier.
    fn eat_word(&mut self, word: &str) -> bool {
        self.skip_ws();
        let rest = self.rest();
        if rest.starts_with(word) && !rest[word.len()..].starts_with(is_ident_continue) {
            self.pos += word.len();
            true
        } else {
            false
        }
    }

    /// Finds `word` as a standalone identifier (not a property access) at or
    /// after the cursor, leaving the cursor just past it.
    fn seek_word(&mut self, word: &str) -> bool {
        while let Some(found) = self.rest().find(word) {
            let start = self.pos + found;
            let end = start + word.len();
            let before_ok = !self.src[..start].ends_with(is_ident_continue)
                && !self.src[..start].ends_with('.');
            let after_ok = !self.src[end..].starts_with(is_ident_continue);
            self.pos = end;
            if before_ok && after_ok {
                return true;
            }
        }
        self.pos = self.src.len();
        false
    }

    fn seek_declaration(&mut self, binding: &str) -> bool {
        while self.seek_word("var") {
            let mark = self.pos;
            if self.eat_word(binding) && self.eat('=') && self.eat('{') && self.eat('}') {
                return true;
            }
            self.pos = mark;
        }
        false
    }

    fn seek_assignment(&mut self, binding: &str) -> bool {
        while self.seek_word(binding) {
            let mark = self.pos;
            self.skip_ws();
            if self.peek() == Some('[') {
                return true;
            }
            self.pos = mark;
        }
        false
    }

    /// Parses `["group"] = [ "entry", ... ];` with the cursor on `[`.
    fn assignment(&mut self) -> CodecResult<Fragment> {
        self.expect('[', "`[`")?;
        let group = GroupName::new(self.string_literal()?)?;
        self.expect(']', "`]`")?;
        self.expect('=', "`=`")?;
        self.expect('[', "`[`")?;

        let mut entries = Vec::new();
        loop {
            if self.eat(']') {
                break;
            }
            entries.push(self.string_literal()?);
            if self.eat(',') {
                continue;
            }
            self.expect(']', "`,` or `]`")?;
            break;
        }
        self.eat(';');

        Ok(Fragment::new(group, entries))
    }

    /// Reads a double-quoted string literal, skipping leading whitespace.
    ///
    /// Escapes are JSON escapes plus `\'`, which JavaScript allows inside
    /// double-quoted strings. The literal is normalised to JSON and decoded
    /// with `serde_json`.
    fn string_literal(&mut self) -> CodecResult<String> {
        self.skip_ws();
        let start = self.pos;
        if self.peek() != Some('"') {
            return Err(CodecError::unexpected(start, "string literal"));
        }

        let mut json = String::from('"');
        let mut chars = self.rest().char_indices().skip(1);
        while let Some((idx, c)) = chars.next() {
            match c {
                '"' => {
                    json.push('"');
                    self.pos = start + idx + 1;
                    return serde_json::from_str(&json)
                        .map_err(|_| CodecError::InvalidString { offset: start });
                }
                '\\' => match chars.next() {
                    Some((_, '\'')) => json.push('\''),
                    Some((_, escaped)) => {
                        json.push('\\');
                        json.push(escaped);
                    }
                    None => break,
                },
                other => json.push(other),
            }
        }

        Err(CodecError::UnterminatedString { offset: start })
    }
}
