use std::fmt;

use anyhow::{Result, anyhow};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

pub mod codes;

/// Deepest indent level a command can carry; larger values are clamped.
pub const MAX_LEVEL: u32 = 255;

/// The `indent` field of a command record.
///
/// Loaded pages always carry a numeric level (stored as a string by the
/// exporter). Quick-insert rows put a display label in the same field, so
/// anything that does not parse as an integer becomes a `Placeholder`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Indent {
    Level(u32),
    Placeholder(String),
}

impl Indent {
    /// Numeric level used for display; placeholders sit at level 0.
    pub fn level(&self) -> u32 {
        match self {
            Indent::Level(n) => *n,
            Indent::Placeholder(_) => 0,
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Indent::Level(_) => None,
            Indent::Placeholder(s) => Some(s),
        }
    }

    /// Blank strings read as level 0; they are not usable as a label.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Indent::default();
        }
        match trimmed.parse::<i64>() {
            Ok(n) => Self::from_i64(n),
            Err(_) => Indent::Placeholder(raw.to_string()),
        }
    }

    fn from_i64(n: i64) -> Self {
        Indent::Level(n.clamp(0, MAX_LEVEL as i64) as u32)
    }
}

impl Default for Indent {
    fn default() -> Self {
        Indent::Level(0)
    }
}

impl fmt::Display for Indent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Indent::Level(n) => write!(f, "{n}"),
            Indent::Placeholder(s) => f.write_str(s),
        }
    }
}

impl Serialize for Indent {
    fn serialize<S: Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

struct IndentVisitor;

impl Visitor<'_> for IndentVisitor {
    type Value = Indent;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an indent level (string or integer) or a placeholder label")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Indent, E> {
        Ok(Indent::parse(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Indent, E> {
        Ok(Indent::from_i64(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Indent, E> {
        Ok(Indent::Level(v.min(MAX_LEVEL as u64) as u32))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Indent, E> {
        Ok(Indent::from_i64(v as i64))
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Indent, E> {
        Ok(Indent::default())
    }
}

impl<'de> Deserialize<'de> for Indent {
    fn deserialize<D: Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        d.deserialize_any(IndentVisitor)
    }
}

/// One row of an event page script, 1-to-1 with the JSON record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub code: i64,
    #[serde(default)]
    pub indent: Indent,
    #[serde(default)]
    pub parameters: Vec<Value>,
}

impl Command {
    pub fn new(code: i64, indent: u32, parameters: Vec<Value>) -> Self {
        Self {
            code,
            indent: Indent::Level(indent.min(MAX_LEVEL)),
            parameters,
        }
    }

    /// Row with a label in place of the indent level and no parameters.
    pub fn placeholder(code: i64, label: impl Into<String>) -> Self {
        Self {
            code,
            indent: Indent::Placeholder(label.into()),
            parameters: Vec::new(),
        }
    }

    #[inline]
    pub fn base_indent(&self) -> u32 {
        self.indent.level()
    }
}

/// A single step of a move route: `{code, parameters}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveCommand {
    pub code: i64,
    #[serde(default)]
    pub parameters: Vec<Value>,
}

/// One page's flattened script.
///
/// Positions are the only identity a command has, so every edit is
/// expressed in indices and checked against the current length.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandList {
    commands: Vec<Command>,
}

impl CommandList {
    pub fn new(commands: Vec<Command>) -> Self {
        Self { commands }
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Command> {
        self.commands.get(index)
    }

    pub fn as_slice(&self) -> &[Command] {
        &self.commands
    }

    /// Insert before `index`; `index == len()` appends.
    pub fn insert(&mut self, index: usize, cmd: Command) -> Result<()> {
        if index > self.commands.len() {
            return Err(anyhow!(
                "insert position {} out of range (len {})",
                index,
                self.commands.len()
            ));
        }
        self.commands.insert(index, cmd);
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<Command> {
        self.check(index)?;
        Ok(self.commands.remove(index))
    }

    pub fn replace(&mut self, index: usize, cmd: Command) -> Result<Command> {
        self.check(index)?;
        Ok(std::mem::replace(&mut self.commands[index], cmd))
    }

    /// Move the command at `from` so that it ends up at position `to`.
    pub fn move_to(&mut self, from: usize, to: usize) -> Result<()> {
        self.check(from)?;
        self.check(to)?;
        let cmd = self.commands.remove(from);
        self.commands.insert(to, cmd);
        Ok(())
    }

    fn check(&self, index: usize) -> Result<()> {
        if index >= self.commands.len() {
            return Err(anyhow!(
                "command index {} out of range (len {})",
                index,
                self.commands.len()
            ));
        }
        Ok(())
    }
}

/// ─────────────────────────────────────────────────────
/// Map / event layer
/// ─────────────────────────────────────────────────────
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventPage {
    #[serde(default)]
    pub list: CommandList,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
    #[serde(default)]
    pub pages: Vec<EventPage>,
}

/// Events of one map, sorted by id.
#[derive(Debug, Clone, Default)]
pub struct MapEvents {
    pub events: Vec<Event>,
}

/// A page rendered to display rows, handed to `writer`.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub event_id: u32,
    pub event_name: String,
    /// 1-based, as shown in the editor's page tabs.
    pub page: usize,
    pub rows: Vec<String>,
    pub list: CommandList,
}

impl RenderedPage {
    pub fn header(&self) -> String {
        format!("EV{:03} {} page {}", self.event_id, self.event_name, self.page)
    }
}

/// Fully processed output handed to `writer`.
#[derive(Debug)]
pub struct ProcessedProject {
    pub pages: Vec<RenderedPage>,
}
