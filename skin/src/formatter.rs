//! Date/time formatter producing token lines
//!
//! A format string is compiled once into a list of items per line and then
//! evaluated against every timestamp. Evaluation is a pure function of the
//! compiled format and the timestamp.
//!
//! Unknown letters are kept as literal text. A line break is either a real
//! newline or the two characters `\n`.

use chrono::{NaiveDateTime, Timelike};

use crate::error::{SkinError, SkinResult};

/// Characters rendered through the separator path (blink, custom glyph)
pub const SEPARATOR_CHARS: &[char] = &[':'];

/// A date/time field directive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Directive {
    Hour12,
    Hour12Padded,
    Hour24,
    Hour24Padded,
    Minute,
    MinutePadded,
    Second,
    SecondPadded,
    AmPmLower,
    AmPmUpper,
    Day,
    DayPadded,
    WeekdayShort,
    WeekdayLong,
    Month,
    MonthPadded,
    MonthShort,
    MonthLong,
    Year2,
    Year4,
}

impl Directive {
    /// The directive as written in a format string
    pub fn name(self) -> &'static str {
        match self {
            Directive::Hour12 => "h",
            Directive::Hour12Padded => "hh",
            Directive::Hour24 => "H",
            Directive::Hour24Padded => "HH",
            Directive::Minute => "m",
            Directive::MinutePadded => "mm",
            Directive::Second => "s",
            Directive::SecondPadded => "ss",
            Directive::AmPmLower => "a",
            Directive::AmPmUpper => "A",
            Directive::Day => "d",
            Directive::DayPadded => "dd",
            Directive::WeekdayShort => "ddd",
            Directive::WeekdayLong => "dddd",
            Directive::Month => "M",
            Directive::MonthPadded => "MM",
            Directive::MonthShort => "MMM",
            Directive::MonthLong => "MMMM",
            Directive::Year2 => "yy",
            Directive::Year4 => "yyyy",
        }
    }

    fn render(self, dt: &NaiveDateTime) -> String {
        let hour12 = match dt.hour() % 12 {
            0 => 12,
            h => h,
        };
        let is_pm = dt.hour() >= 12;
        match self {
            Directive::Hour12 => hour12.to_string(),
            Directive::Hour12Padded => format!("{:02}", hour12),
            Directive::Hour24 => dt.hour().to_string(),
            Directive::Hour24Padded => format!("{:02}", dt.hour()),
            Directive::Minute => dt.minute().to_string(),
            Directive::MinutePadded => format!("{:02}", dt.minute()),
            Directive::Second => dt.second().to_string(),
            Directive::SecondPadded => format!("{:02}", dt.second()),
            Directive::AmPmLower => if is_pm { "pm" } else { "am" }.to_string(),
            Directive::AmPmUpper => if is_pm { "PM" } else { "AM" }.to_string(),
            Directive::Day => dt.format("%-d").to_string(),
            Directive::DayPadded => dt.format("%d").to_string(),
            Directive::WeekdayShort => dt.format("%a").to_string(),
            Directive::WeekdayLong => dt.format("%A").to_string(),
            Directive::Month => dt.format("%-m").to_string(),
            Directive::MonthPadded => dt.format("%m").to_string(),
            Directive::MonthShort => dt.format("%b").to_string(),
            Directive::MonthLong => dt.format("%B").to_string(),
            Directive::Year2 => dt.format("%y").to_string(),
            Directive::Year4 => dt.format("%Y").to_string(),
        }
    }

    /// Longest directive for `letter` that fits in a run of `run` letters.
    /// Returns the directive and how many letters it consumes.
    fn longest(letter: char, run: usize) -> Option<(Directive, usize)> {
        let pick = |options: &[(usize, Directive)]| {
            options
                .iter()
                .find(|(len, _)| run >= *len)
                .map(|(len, d)| (*d, *len))
        };
        match letter {
            'h' => pick(&[(2, Directive::Hour12Padded), (1, Directive::Hour12)]),
            'H' => pick(&[(2, Directive::Hour24Padded), (1, Directive::Hour24)]),
            'm' => pick(&[(2, Directive::MinutePadded), (1, Directive::Minute)]),
            's' => pick(&[(2, Directive::SecondPadded), (1, Directive::Second)]),
            'a' => Some((Directive::AmPmLower, 1)),
            'A' => Some((Directive::AmPmUpper, 1)),
            'd' => pick(&[
                (4, Directive::WeekdayLong),
                (3, Directive::WeekdayShort),
                (2, Directive::DayPadded),
                (1, Directive::Day),
            ]),
            'M' => pick(&[
                (4, Directive::MonthLong),
                (3, Directive::MonthShort),
                (2, Directive::MonthPadded),
                (1, Directive::Month),
            ]),
            'y' => pick(&[(4, Directive::Year4), (2, Directive::Year2)]),
            _ => None,
        }
    }
}

/// What a token stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Literal,
    Separator,
    Field(Directive),
}

/// One unit of formatted output
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn literal(text: impl Into<String>) -> Self {
        Self {
            kind: TokenKind::Literal,
            text: text.into(),
        }
    }

    pub fn separator(ch: char) -> Self {
        Self {
            kind: TokenKind::Separator,
            text: ch.to_string(),
        }
    }

    pub fn field(directive: Directive, text: impl Into<String>) -> Self {
        Self {
            kind: TokenKind::Field(directive),
            text: text.into(),
        }
    }

    pub fn is_separator(&self) -> bool {
        self.kind == TokenKind::Separator
    }

    /// Directive name for field tokens, used to look up token transforms
    pub fn directive_name(&self) -> Option<&'static str> {
        match self.kind {
            TokenKind::Field(d) => Some(d.name()),
            _ => None,
        }
    }
}

/// Compiled format element
#[derive(Debug, Clone, PartialEq, Eq)]
enum Item {
    Literal(String),
    Separator(char),
    Field(Directive),
}

/// Turns timestamps into token lines for a fixed format string
#[derive(Debug, Clone, PartialEq)]
pub struct DateTimeFormatter {
    format: String,
    lines: Vec<Vec<Item>>,
}

impl DateTimeFormatter {
    /// Compile `format`, rejecting empty formats and unterminated quotes
    pub fn new(format: &str) -> SkinResult<Self> {
        if format.is_empty() {
            return Err(SkinError::parse("time format", "format is empty"));
        }
        let lines = compile(format, true)?;
        Ok(Self {
            format: format.to_string(),
            lines,
        })
    }

    /// Compile `format`, treating anything malformed as literal text
    pub fn lenient(format: &str) -> Self {
        let lines = match compile(format, false) {
            Ok(lines) => lines,
            // non-strict compilation does not fail; keep a literal copy regardless
            Err(_) => vec![vec![Item::Literal(format.to_string())]],
        };
        Self {
            format: format.to_string(),
            lines,
        }
    }

    /// Check a format string without keeping the result
    pub fn validate(format: &str) -> SkinResult<()> {
        Self::new(format).map(|_| ())
    }

    pub fn format_string(&self) -> &str {
        &self.format
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_multiline(&self) -> bool {
        self.lines.len() > 1
    }

    /// Whether the format uses a directive with the given name (e.g. "ss")
    pub fn uses_directive(&self, name: &str) -> bool {
        self.lines
            .iter()
            .flatten()
            .any(|item| matches!(item, Item::Field(d) if d.name() == name))
    }

    pub fn has_separators(&self) -> bool {
        self.lines
            .iter()
            .flatten()
            .any(|item| matches!(item, Item::Separator(_)))
    }

    /// Evaluate the format: one token vector per line
    pub fn format(&self, dt: &NaiveDateTime) -> Vec<Vec<Token>> {
        self.lines
            .iter()
            .map(|line| {
                line.iter()
                    .map(|item| match item {
                        Item::Literal(text) => Token::literal(text.clone()),
                        Item::Separator(ch) => Token::separator(*ch),
                        Item::Field(d) => Token::field(*d, d.render(dt)),
                    })
                    .collect()
            })
            .collect()
    }
}

impl Default for DateTimeFormatter {
    fn default() -> Self {
        Self::lenient(digiclock_types::DEFAULT_TIME_FORMAT)
    }
}

fn compile(format: &str, strict: bool) -> SkinResult<Vec<Vec<Item>>> {
    let chars: Vec<char> = format.chars().collect();
    let mut lines = Vec::new();
    let mut line = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '\n' => {
                lines.push(std::mem::take(&mut line));
                i += 1;
            }
            '\\' => match chars.get(i + 1) {
                Some('n') => {
                    lines.push(std::mem::take(&mut line));
                    i += 2;
                }
                Some(&escaped) => {
                    line.push(Item::Literal(escaped.to_string()));
                    i += 2;
                }
                None => {
                    line.push(Item::Literal("\\".to_string()));
                    i += 1;
                }
            },
            '\'' => {
                if chars.get(i + 1) == Some(&'\'') {
                    line.push(Item::Literal("'".to_string()));
                    i += 2;
                    continue;
                }
                let (text, next, terminated) = read_quoted(&chars, i + 1);
                if !terminated && strict {
                    return Err(SkinError::parse(
                        "time format",
                        format!("unterminated quote at position {}", i),
                    ));
                }
                if !text.is_empty() {
                    line.push(Item::Literal(text));
                }
                i = next;
            }
            c if SEPARATOR_CHARS.contains(&c) => {
                line.push(Item::Separator(c));
                i += 1;
            }
            c => {
                let run = chars[i..].iter().take_while(|&&x| x == c).count();
                match Directive::longest(c, run) {
                    Some((directive, used)) => {
                        line.push(Item::Field(directive));
                        i += used;
                    }
                    None => {
                        line.push(Item::Literal(c.to_string()));
                        i += 1;
                    }
                }
            }
        }
    }

    lines.push(line);
    Ok(lines)
}

/// Read a quoted literal starting after the opening quote.
/// Returns (text, index after closing quote, terminated).
fn read_quoted(chars: &[char], start: usize) -> (String, usize, bool) {
    let mut text = String::new();
    let mut i = start;
    while i < chars.len() {
        if chars[i] == '\'' {
            if chars.get(i + 1) == Some(&'\'') {
                text.push('\'');
                i += 2;
                continue;
            }
            return (text, i + 1, true);
        }
        text.push(chars[i]);
        i += 1;
    }
    (text, i, false)
}
