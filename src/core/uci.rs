//! The slice of the UCI protocol the prober speaks: the startup handshake and
//! the `id` / `option` declarations an engine lists before `uciok`.
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const HANDSHAKE: &str = "uci";
pub const SENTINEL: &str = "uciok";
pub const QUIT: &str = "quit";

const EMPTY_MARKER: &str = "<empty>";
const OPTION_KEYWORDS: [&str; 5] = ["type", "default", "min", "max", "var"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineId {
    pub name: Option<String>,
    pub author: Option<String>,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum IdField {
    Name,
    Author,
}

impl EngineId {
    /// Absorbs an `id name ...` or `id author ...` line; returns false for anything else.
    pub fn absorb(&mut self, line: &str) -> bool {
        match parse_id(line) {
            Some((IdField::Name, value)) => self.name = Some(value),
            Some((IdField::Author, value)) => self.author = Some(value),
            None => return false,
        }
        true
    }
}

pub fn parse_id(line: &str) -> Option<(IdField, String)> {
    let rest = line.trim().strip_prefix("id")?;
    let rest = rest.strip_prefix(char::is_whitespace)?.trim_start();
    let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    let field = match field {
        "name" => IdField::Name,
        "author" => IdField::Author,
        _ => return None,
    };
    Some((field, value.trim().to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum UciOptionKind {
    Check { default: bool },
    Spin { default: i64, min: i64, max: i64 },
    Combo { default: String, vars: Vec<String> },
    Button,
    String { default: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UciOption {
    pub name: String,
    #[serde(flatten)]
    pub kind: UciOptionKind,
}

pub fn is_option_line(line: &str) -> bool {
    line.trim_start()
        .split_whitespace()
        .next()
        .is_some_and(|first| first == "option")
}

impl UciOption {
    /// Parses `option name <id> type <t> [default <x>] [min <x>] [max <x>] [var <x>]*`.
    ///
    /// The name may contain spaces and runs up to the first `type` token.
    pub fn parse(line: &str) -> Result<Self> {
        let mut tokens = line.split_whitespace();
        if tokens.next() != Some("option") {
            return Err(Error::uci(line, "not an option declaration"));
        }
        if tokens.next() != Some("name") {
            return Err(Error::uci(line, "missing `name`"));
        }

        let mut name_parts = Vec::new();
        let mut saw_type = false;
        for token in tokens.by_ref() {
            if token == "type" {
                saw_type = true;
                break;
            }
            name_parts.push(token);
        }
        if name_parts.is_empty() {
            return Err(Error::uci(line, "empty option name"));
        }
        if !saw_type {
            return Err(Error::uci(line, "missing `type`"));
        }
        let name = name_parts.join(" ");

        let kind_token = tokens
            .next()
            .ok_or_else(|| Error::uci(line, "missing option type"))?;

        let mut default: Option<String> = None;
        let mut min: Option<String> = None;
        let mut max: Option<String> = None;
        let mut vars: Vec<String> = Vec::new();

        let mut current: Option<&str> = None;
        let mut value: Vec<&str> = Vec::new();
        let mut flush = |key: Option<&str>, value: &mut Vec<&str>| {
            let joined = value.join(" ");
            value.clear();
            match key {
                Some("default") => default = Some(joined),
                Some("min") => min = Some(joined),
                Some("max") => max = Some(joined),
                Some("var") => vars.push(joined),
                _ => {}
            }
        };
        for token in tokens {
            if OPTION_KEYWORDS.contains(&token) {
                flush(current, &mut value);
                current = Some(token);
            } else {
                value.push(token);
            }
        }
        flush(current, &mut value);

        let kind = match kind_token {
            "check" => {
                let default = match default.as_deref() {
                    Some("true") => true,
                    Some("false") => false,
                    Some(other) => {
                        return Err(Error::uci(line, format!("bad check default {other:?}")));
                    }
                    None => return Err(Error::uci(line, "check option without default")),
                };
                UciOptionKind::Check { default }
            }
            "spin" => UciOptionKind::Spin {
                default: parse_int(line, "default", default)?,
                min: parse_int(line, "min", min)?,
                max: parse_int(line, "max", max)?,
            },
            "combo" => UciOptionKind::Combo {
                default: unmark_empty(default.unwrap_or_default()),
                vars,
            },
            "button" => UciOptionKind::Button,
            "string" => UciOptionKind::String {
                default: unmark_empty(default.unwrap_or_default()),
            },
            other => return Err(Error::uci(line, format!("unknown option type {other:?}"))),
        };

        Ok(UciOption { name, kind })
    }
}

fn parse_int(line: &str, field: &str, value: Option<String>) -> Result<i64> {
    let value = value.ok_or_else(|| Error::uci(line, format!("spin option without {field}")))?;
    value
        .parse()
        .map_err(|_| Error::uci(line, format!("{field} {value:?} is not an integer")))
}

fn unmark_empty(value: String) -> String {
    if value == EMPTY_MARKER {
        String::new()
    } else {
        value
    }
}
