//! The Abstract Line Descriptor and the per-line parser that produces it
//! (spec.md §3, §4.2).

use crate::lexicon::{self, Opcode};
use crate::parser::operand::{classify_operand, Operand, ScalarValue};
use crate::parser::{parse_signed_int, validate_identifier_shape, validate_new_identifier, NameRegistry};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectiveKind {
    Data(Vec<ScalarValue>),
    StringLit(String),
    Entry(String),
    Extern(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub opcode: Opcode,
    pub source: Option<Operand>,
    pub target: Option<Operand>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AldKind {
    Empty,
    Comment,
    Directive(DirectiveKind),
    Command(CommandLine),
    ConstantDef { name: String, value: i32 },
}

/// One line of expanded source, reduced to its syntactic/semantic essence.
/// `error` carries the first violation found on the line, if any; when it
/// is `Some`, `kind`/`label` are not meaningful and must not be consumed by
/// later stages beyond reporting the error.
#[derive(Debug, Clone)]
pub struct Ald {
    pub label: Option<String>,
    pub kind: AldKind,
    pub line_number: usize,
    pub error: Option<String>,
    /// Non-fatal: set when a label on `.entry`/`.extern` was dropped
    /// (spec.md §9 "Label-on-entry/extern is silently dropped").
    pub warning: Option<String>,
}

impl Ald {
    fn plain(kind: AldKind, line_number: usize) -> Ald {
        Ald {
            label: None,
            kind,
            line_number,
            error: None,
            warning: None,
        }
    }

    fn err(line_number: usize, message: impl Into<String>) -> Ald {
        Ald {
            label: None,
            kind: AldKind::Empty,
            line_number,
            error: Some(message.into()),
            warning: None,
        }
    }
}

/// Parse one line. Never panics; any violation is encoded as `ald.error`.
pub fn parse_line(line_number: usize, raw_line: &str, registry: &NameRegistry) -> Ald {
    let trimmed = raw_line.trim();

    if trimmed.is_empty() {
        return Ald::plain(AldKind::Empty, line_number);
    }
    if trimmed.starts_with(';') {
        return Ald::plain(AldKind::Comment, line_number);
    }

    let mut top = trimmed.splitn(2, char::is_whitespace);
    let first = top.next().unwrap_or("");
    let after_first = top.next().unwrap_or("").trim();

    if first == ".define" {
        return parse_constant_def(line_number, after_first, registry);
    }

    let (label_raw, content) = match first.strip_suffix(':') {
        Some(name) => (Some(name.to_string()), after_first.to_string()),
        None => (None, trimmed.to_string()),
    };

    if content.is_empty() {
        return Ald::err(line_number, "Invalid Line Format::Missing directive or instruction after label");
    }

    let mut head_tail = content.splitn(2, char::is_whitespace);
    let head = head_tail.next().unwrap_or("");
    let tail = head_tail.next().unwrap_or("").trim();

    let is_entry_or_extern = head == ".entry" || head == ".extern";

    if let Some(name) = &label_raw {
        if !is_entry_or_extern {
            if let Err(reason) = validate_new_identifier(name, registry) {
                return Ald::err(line_number, format!("Invalid Label::{reason}"));
            }
        }
    }

    let mut ald = if lexicon::is_directive(head) {
        parse_directive(line_number, head, tail)
    } else {
        parse_command(line_number, head, tail)
    };

    if ald.error.is_none() {
        if is_entry_or_extern {
            if let Some(name) = label_raw {
                ald.warning = Some(format!(
                    "label '{name}' on .entry/.extern is silently dropped"
                ));
            }
        } else {
            ald.label = label_raw;
        }
    }
    ald.line_number = line_number;
    ald
}

fn parse_constant_def(line_number: usize, rest: &str, registry: &NameRegistry) -> Ald {
    if rest.matches('=').count() != 1 {
        return Ald::err(line_number, "Invalid Constant Definition::Exactly one '=' required");
    }
    let mut parts = rest.splitn(2, '=');
    let name = parts.next().unwrap_or("").trim();
    let value_part = parts.next().unwrap_or("").trim();

    if name.is_empty() {
        return Ald::err(line_number, "Invalid Constant Definition::Missing name");
    }

    let mut value_tokens = value_part.split_whitespace();
    let literal = value_tokens.next().unwrap_or("");
    if literal.is_empty() {
        return Ald::err(line_number, "Invalid Constant Definition::Missing value");
    }
    if value_tokens.next().is_some() {
        return Ald::err(line_number, "Invalid Constant Definition::Redundant trailing characters");
    }

    if let Err(reason) = validate_new_identifier(name, registry) {
        return Ald::err(line_number, format!("Invalid Constant Definition::{reason}"));
    }

    match parse_signed_int(literal) {
        Some(value) => Ald::plain(
            AldKind::ConstantDef {
                name: name.to_string(),
                value,
            },
            line_number,
        ),
        None => Ald::err(line_number, "Invalid Constant Definition::Invalid integer literal"),
    }
}

fn parse_directive(line_number: usize, head: &str, tail: &str) -> Ald {
    match head {
        ".data" => parse_data(line_number, tail),
        ".string" => parse_string(line_number, tail),
        ".entry" => parse_entry_or_extern(line_number, tail, true),
        ".extern" => parse_entry_or_extern(line_number, tail, false),
        _ => unreachable!("caller only dispatches here for known directive names"),
    }
}

fn parse_data(line_number: usize, tail: &str) -> Ald {
    let trimmed = tail.trim();
    if trimmed.is_empty() {
        return Ald::err(line_number, "Invalid Data Directive::Empty operand list");
    }
    if trimmed.starts_with(',') || trimmed.ends_with(',') {
        return Ald::err(line_number, "Invalid Data Directive::Misplaced comma");
    }

    let mut elements = Vec::new();
    for part in trimmed.split(',') {
        let part = part.trim();
        if part.is_empty() {
            return Ald::err(line_number, "Invalid Data Directive::Empty element between commas");
        }
        if let Some(value) = parse_signed_int(part) {
            elements.push(ScalarValue::Int(value));
        } else if validate_identifier_shape(part).is_ok() {
            elements.push(ScalarValue::Constant(part.to_string()));
        } else {
            return Ald::err(line_number, "Invalid Data Directive::Invalid element");
        }
    }

    Ald::plain(AldKind::Directive(DirectiveKind::Data(elements)), line_number)
}

fn parse_string(line_number: usize, tail: &str) -> Ald {
    let trimmed = tail.trim();
    if !trimmed.starts_with('"') {
        return Ald::err(line_number, "Invalid String Directive::Missing opening quote");
    }
    let rest = &trimmed[1..];
    let Some(close) = rest.find('"') else {
        return Ald::err(line_number, "Invalid String Directive::Missing closing quote");
    };
    if close != rest.len() - 1 {
        return Ald::err(line_number, "Invalid String Directive::Trailing characters after string literal");
    }
    let content = rest[..close].to_string();
    Ald::plain(AldKind::Directive(DirectiveKind::StringLit(content)), line_number)
}

fn parse_entry_or_extern(line_number: usize, tail: &str, is_entry: bool) -> Ald {
    let mut tokens = tail.split_whitespace();
    let Some(name) = tokens.next() else {
        let kind = if is_entry { ".entry" } else { ".extern" };
        return Ald::err(line_number, format!("Invalid {kind} Directive::Missing symbol name"));
    };
    if tokens.next().is_some() {
        let kind = if is_entry { ".entry" } else { ".extern" };
        return Ald::err(line_number, format!("Invalid {kind} Directive::Trailing content"));
    }
    if let Err(reason) = validate_identifier_shape(name) {
        let kind = if is_entry { ".entry" } else { ".extern" };
        return Ald::err(line_number, format!("Invalid {kind} Directive::{reason}"));
    }
    let directive = if is_entry {
        DirectiveKind::Entry(name.to_string())
    } else {
        DirectiveKind::Extern(name.to_string())
    };
    Ald::plain(AldKind::Directive(directive), line_number)
}

fn parse_command(line_number: usize, head: &str, tail: &str) -> Ald {
    let Some(opcode) = Opcode::from_mnemonic(head) else {
        return Ald::err(line_number, format!("Unknown Instruction::{head}"));
    };

    let tail = tail.trim();
    let tokens: Vec<String> = match opcode.operand_count() {
        0 => {
            if !tail.is_empty() {
                return Ald::err(line_number, "Invalid Command Instruction Format::Unexpected operand");
            }
            Vec::new()
        }
        1 => {
            if tail.is_empty() {
                return Ald::err(line_number, "Invalid Command Instruction Format::Missing operand");
            }
            if tail.contains(',') {
                return Ald::err(line_number, "Invalid Command Instruction Format::Unexpected comma");
            }
            vec![tail.to_string()]
        }
        2 => {
            if tail.is_empty() {
                return Ald::err(line_number, "Invalid Command Instruction Format::Missing operands");
            }
            let comma_count = tail.matches(',').count();
            if comma_count == 0 {
                return Ald::err(line_number, "Invalid Command Instruction Format::Missing comma");
            }
            if comma_count > 1 {
                return Ald::err(line_number, "Invalid Command Instruction Format::Too many commas");
            }
            let parts: Vec<&str> = tail.splitn(2, ',').map(str::trim).collect();
            if parts[0].is_empty() || parts[1].is_empty() {
                return Ald::err(line_number, "Invalid Command Instruction Format::Misplaced comma");
            }
            vec![parts[0].to_string(), parts[1].to_string()]
        }
        _ => unreachable!("no opcode takes more than two operands"),
    };

    let mut operands = Vec::with_capacity(tokens.len());
    for token in &tokens {
        match classify_operand(token) {
            Ok(operand) => operands.push(operand),
            Err(message) => return Ald::err(line_number, message),
        }
    }

    let (source, target) = match operands.len() {
        0 => (None, None),
        1 => (None, operands.into_iter().next()),
        2 => {
            let mut it = operands.into_iter();
            let source = it.next();
            let target = it.next();
            (source, target)
        }
        _ => unreachable!(),
    };

    Ald::plain(
        AldKind::Command(CommandLine {
            opcode,
            source,
            target,
        }),
        line_number,
    )
}
