//! Situation analysis for PromQL queries being typed
//!
//! This module classifies the cursor position of a (usually incomplete)
//! query into a [`Situation`]. It tokenizes the text before the cursor and
//! walks the tokens with a small bracket stack. It never fails: malformed
//! input degrades to the most specific situation still recognisable, or to
//! [`Situation::AtRoot`].

use crate::situation::{Label, Situation};

/// Keywords that open a grouping label list when followed by `(`
const GROUPING_KEYWORDS: &[&str] = &[
    "by",
    "without",
    "on",
    "ignoring",
    "group_left",
    "group_right",
];

/// Identifiers that are never metric names
const KEYWORDS: &[&str] = &[
    "by",
    "without",
    "on",
    "ignoring",
    "group_left",
    "group_right",
    "offset",
    "bool",
    "and",
    "or",
    "unless",
    "atan2",
    "inf",
    "nan",
];

/// Classify the cursor position in a query
///
/// `offset` is a byte offset into `text`. Offsets past the end clamp to the
/// end, offsets inside a multi-byte character floor to its start. Callers
/// with an active selection pass the offset of the selection start.
///
/// # Example
///
/// ```
/// use promql_language_tools::{analyze, Situation};
///
/// let situation = analyze("up{", 3);
/// assert_eq!(
///     situation,
///     Situation::InLabelSelectorNoLabelName {
///         metric_name: Some("up".to_string()),
///         other_labels: Vec::new(),
///     }
/// );
/// ```
#[must_use]
pub fn analyze(text: &str, offset: usize) -> Situation {
    if text.trim().is_empty() {
        return Situation::Empty;
    }

    let offset = char_boundary_at_or_before(text, offset);
    let tokens = tokenize(&text[..offset]);
    log::trace!("Tokens before offset {offset}: {tokens:?}");

    let mut scanner = Scanner::default();
    for (i, token) in tokens.iter().enumerate() {
        let prev = i.checked_sub(1).map(|p| &tokens[p]);
        scanner.step(token, prev, tokens.get(i + 1));
    }

    let situation = scanner.finish(&tokens);
    log::trace!("Situation at offset {offset}: {situation:?}");
    situation
}

fn char_boundary_at_or_before(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    /// Numeric literal or duration (`5`, `1.5`, `5m`, `1h30m`)
    Number,
    Str {
        value: String,
        closed: bool,
    },
    Open(char),
    Close(char),
    Comma,
    Colon,
    /// Label matcher operator: `=`, `!=`, `=~`, `!~`
    MatchOp(&'static str),
    /// Any other binary or modifier operator
    Operator,
}

impl Token {
    fn is_ident(&self, name: &str) -> bool {
        matches!(self, Self::Ident(ident) if ident == name)
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == ':'
}

fn tokenize(src: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = src.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => {}
            '#' => {
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        break;
                    }
                }
            }
            '"' | '\'' | '`' => {
                let mut value = String::new();
                let mut closed = false;
                while let Some(ch) = chars.next() {
                    if ch == c {
                        closed = true;
                        break;
                    }
                    if ch == '\\' && c != '`' {
                        if let Some(escaped) = chars.next() {
                            value.push(escaped);
                        }
                        continue;
                    }
                    value.push(ch);
                }
                tokens.push(Token::Str { value, closed });
            }
            c if is_ident_start(c)
                || (c == ':' && chars.peek().is_some_and(|n| is_ident_start(*n))) =>
            {
                let mut ident = String::from(c);
                while let Some(&next) = chars.peek() {
                    if !is_ident_continue(next) {
                        break;
                    }
                    ident.push(next);
                    chars.next();
                }
                tokens.push(Token::Ident(ident));
            }
            c if c.is_ascii_digit()
                || (c == '.' && chars.peek().is_some_and(char::is_ascii_digit)) =>
            {
                while chars
                    .peek()
                    .is_some_and(|n| n.is_ascii_alphanumeric() || *n == '.' || *n == '_')
                {
                    chars.next();
                }
                tokens.push(Token::Number);
            }
            '(' | '{' | '[' => tokens.push(Token::Open(c)),
            ')' | '}' | ']' => tokens.push(Token::Close(c)),
            ',' => tokens.push(Token::Comma),
            ':' => tokens.push(Token::Colon),
            '=' => match chars.peek() {
                Some('~') => {
                    chars.next();
                    tokens.push(Token::MatchOp("=~"));
                }
                Some('=') => {
                    chars.next();
                    tokens.push(Token::Operator);
                }
                _ => tokens.push(Token::MatchOp("=")),
            },
            '!' => match chars.peek() {
                Some('=') => {
                    chars.next();
                    tokens.push(Token::MatchOp("!="));
                }
                Some('~') => {
                    chars.next();
                    tokens.push(Token::MatchOp("!~"));
                }
                _ => tokens.push(Token::Operator),
            },
            '<' | '>' => {
                if chars.peek() == Some(&'=') {
                    chars.next();
                }
                tokens.push(Token::Operator);
            }
            '+' | '-' | '*' | '/' | '%' | '^' | '@' => tokens.push(Token::Operator),
            _ => {}
        }
    }

    tokens
}

/// The most recent vector selector seen in an expression scope
#[derive(Debug, Clone, Default)]
struct Subject {
    metric: Option<String>,
    labels: Vec<Label>,
}

impl Subject {
    fn is_set(&self) -> bool {
        self.metric.is_some() || !self.labels.is_empty()
    }
}

/// Progress of the matcher under construction inside `{...}`
#[derive(Debug, Clone)]
enum Matcher {
    ExpectingName,
    Name(String),
    Operator { name: String, op: &'static str },
    Quoted { name: String },
    Complete,
}

#[derive(Debug)]
enum Frame {
    Root(Subject),
    Call(Subject),
    Paren(Subject),
    Grouping(Subject),
    Range,
    Selector {
        metric: Option<String>,
        labels: Vec<Label>,
        matcher: Matcher,
    },
}

impl Frame {
    fn opener(&self) -> Option<char> {
        match self {
            Self::Root(_) => None,
            Self::Call(_) | Self::Paren(_) | Self::Grouping(_) => Some('('),
            Self::Range => Some('['),
            Self::Selector { .. } => Some('{'),
        }
    }

    fn subject_mut(&mut self) -> Option<&mut Subject> {
        match self {
            Self::Root(subject) | Self::Call(subject) | Self::Paren(subject) => Some(subject),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct Scanner {
    frames: Vec<Frame>,
}

impl Default for Scanner {
    fn default() -> Self {
        Self {
            frames: vec![Frame::Root(Subject::default())],
        }
    }
}

impl Scanner {
    fn top(&mut self) -> &mut Frame {
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }

    fn step(&mut self, token: &Token, prev: Option<&Token>, next: Option<&Token>) {
        if let Token::Close(c) = token {
            self.close(*c);
            return;
        }

        if let Frame::Selector {
            labels, matcher, ..
        } = self.top()
        {
            step_matcher(token, labels, matcher);
        } else if self.top().subject_mut().is_some() {
            self.step_expression(token, prev, next);
        }
    }

    fn step_expression(&mut self, token: &Token, prev: Option<&Token>, next: Option<&Token>) {
        let prev_ident = match prev {
            Some(Token::Ident(name)) => Some(name.as_str()),
            _ => None,
        };

        match token {
            Token::Ident(name) => {
                let is_call = matches!(next, Some(Token::Open('(' | '{')));
                let before_grouping =
                    next.is_some_and(|n| n.is_ident("by") || n.is_ident("without"));
                if !is_call && !before_grouping && !KEYWORDS.contains(&name.as_str()) {
                    if let Some(subject) = self.top().subject_mut() {
                        *subject = Subject {
                            metric: Some(name.clone()),
                            labels: Vec::new(),
                        };
                    }
                }
            }
            Token::Open('{') => {
                let metric = prev_ident
                    .filter(|name| !KEYWORDS.contains(name))
                    .map(str::to_string);
                self.frames.push(Frame::Selector {
                    metric,
                    labels: Vec::new(),
                    matcher: Matcher::ExpectingName,
                });
            }
            Token::Open('(') => {
                let frame = match prev_ident {
                    Some(name) if GROUPING_KEYWORDS.contains(&name) => {
                        let subject = self.top().subject_mut().cloned().unwrap_or_default();
                        Frame::Grouping(subject)
                    }
                    Some(name) if !KEYWORDS.contains(&name) => Frame::Call(Subject::default()),
                    _ => Frame::Paren(Subject::default()),
                };
                self.frames.push(frame);
            }
            Token::Open('[') => self.frames.push(Frame::Range),
            _ => {}
        }
    }

    /// Pop frames up to the one opened by the matching bracket
    ///
    /// A closer without a matching opener is ignored.
    fn close(&mut self, closer: char) {
        let opener = match closer {
            ')' => '(',
            '}' => '{',
            _ => '[',
        };
        let Some(index) = self
            .frames
            .iter()
            .rposition(|frame| frame.opener() == Some(opener))
        else {
            return;
        };

        while self.frames.len() > index {
            let Some(frame) = self.frames.pop() else {
                break;
            };
            let finished = match frame {
                Frame::Selector { metric, labels, .. } => Subject { metric, labels },
                Frame::Call(subject) | Frame::Paren(subject) if subject.is_set() => subject,
                _ => continue,
            };
            if let Some(parent) = self.top().subject_mut() {
                *parent = finished;
            }
        }
    }

    fn finish(mut self, tokens: &[Token]) -> Situation {
        if let Some(Token::Str { closed: false, .. }) = tokens.last() {
            if !matches!(self.top(), Frame::Selector { .. }) {
                return Situation::AtRoot;
            }
        }

        match self.frames.pop() {
            Some(Frame::Selector {
                metric,
                labels,
                matcher,
            }) => match matcher {
                Matcher::ExpectingName | Matcher::Name(_) | Matcher::Complete => {
                    Situation::InLabelSelectorNoLabelName {
                        metric_name: metric,
                        other_labels: labels,
                    }
                }
                Matcher::Operator { name, .. } => Situation::InLabelSelectorWithLabelName {
                    metric_name: metric,
                    label_name: name,
                    between_quotes: false,
                    other_labels: labels,
                },
                Matcher::Quoted { name } => Situation::InLabelSelectorWithLabelName {
                    metric_name: metric,
                    label_name: name,
                    between_quotes: true,
                    other_labels: labels,
                },
            },
            Some(Frame::Grouping(subject)) => Situation::InGrouping {
                metric_name: subject.metric,
                other_labels: subject.labels,
            },
            Some(Frame::Range) => Situation::InDuration,
            _ if after_offset_keyword(tokens) => Situation::InDuration,
            Some(Frame::Call(_)) => Situation::InFunction,
            Some(Frame::Root(_) | Frame::Paren(_)) | None => Situation::AtRoot,
        }
    }
}

fn step_matcher(token: &Token, labels: &mut Vec<Label>, matcher: &mut Matcher) {
    let state = std::mem::replace(matcher, Matcher::Complete);
    *matcher = match (state, token) {
        (_, Token::Comma) => Matcher::ExpectingName,
        (Matcher::ExpectingName | Matcher::Name(_), Token::Ident(name)) => {
            Matcher::Name(name.clone())
        }
        // Quoted label names: {"service.name"="api"}
        (Matcher::ExpectingName, Token::Str {
            value,
            closed: true,
        }) => Matcher::Name(value.clone()),
        (Matcher::Name(name), Token::MatchOp(op)) => Matcher::Operator { name, op: *op },
        (Matcher::Operator { name, op }, Token::Str {
            value,
            closed: true,
        }) => {
            labels.push(Label::new(name, op, value.clone()));
            Matcher::Complete
        }
        (Matcher::Operator { name, .. }, Token::Str { closed: false, .. }) => {
            Matcher::Quoted { name }
        }
        (state, _) => state,
    };
}

/// `offset` modifier followed by nothing or a partial duration
fn after_offset_keyword(tokens: &[Token]) -> bool {
    match tokens {
        [.., last] if last.is_ident("offset") => true,
        [.., keyword, Token::Number] => keyword.is_ident("offset"),
        _ => false,
    }
}
