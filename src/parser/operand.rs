//! Operand addressing-mode classification (spec.md §4.2's classifier table).

use crate::parser::{parse_signed_int, validate_identifier_shape};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressingMode {
    Immediate = 0,
    Direct = 1,
    FixedIndex = 2,
    DirectRegister = 3,
}

/// The value carried by an immediate or a fixed-index index: either a
/// literal integer or the name of a `.define`d constant, resolved later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScalarValue {
    Int(i32),
    Constant(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Immediate(ScalarValue),
    Direct(String),
    FixedIndex { label: String, index: ScalarValue },
    DirectRegister(u8),
}

impl Operand {
    pub fn mode(&self) -> AddressingMode {
        match self {
            Operand::Immediate(_) => AddressingMode::Immediate,
            Operand::Direct(_) => AddressingMode::Direct,
            Operand::FixedIndex { .. } => AddressingMode::FixedIndex,
            Operand::DirectRegister(_) => AddressingMode::DirectRegister,
        }
    }
}

/// Classify one operand token, in the order given by spec.md §4.2: leading
/// `#` → immediate, a `[` → fixed-index, an exact `r0`..`r7` → register,
/// otherwise a direct label reference.
pub fn classify_operand(token: &str) -> Result<Operand, String> {
    if let Some(rest) = token.strip_prefix('#') {
        return classify_immediate(rest);
    }
    if let Some(bracket) = token.find('[') {
        return classify_fixed_index(token, bracket);
    }
    if let Some(register) = crate::lexicon::is_register(token) {
        return Ok(Operand::DirectRegister(register));
    }
    validate_identifier_shape(token)
        .map(|()| Operand::Direct(token.to_string()))
        .map_err(|e| format!("Invalid Operand Format::{e}"))
}

fn classify_immediate(rest: &str) -> Result<Operand, String> {
    if rest.is_empty() {
        return Err("Invalid Operand Format::Empty immediate operand".to_string());
    }
    if let Some(value) = parse_signed_int(rest) {
        return Ok(Operand::Immediate(ScalarValue::Int(value)));
    }
    validate_identifier_shape(rest)
        .map(|()| Operand::Immediate(ScalarValue::Constant(rest.to_string())))
        .map_err(|e| format!("Invalid Operand Format::{e}"))
}

fn classify_fixed_index(token: &str, bracket: usize) -> Result<Operand, String> {
    let label = &token[..bracket];
    let rest = &token[bracket + 1..];
    let Some(close) = rest.find(']') else {
        return Err("Invalid Operand Format::Missing closing bracket".to_string());
    };
    if close != rest.len() - 1 {
        return Err("Invalid Operand Format::Trailing characters after index".to_string());
    }
    let inner = &rest[..close];
    if inner.is_empty() || !inner.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '+') {
        return Err("Invalid Operand Format::Non-alphanumeric index".to_string());
    }
    validate_identifier_shape(label).map_err(|e| format!("Invalid Operand Format::{e}"))?;
    let index = if let Some(value) = parse_signed_int(inner) {
        ScalarValue::Int(value)
    } else {
        validate_identifier_shape(inner).map_err(|e| format!("Invalid Operand Format::{e}"))?;
        ScalarValue::Constant(inner.to_string())
    };
    Ok(Operand::FixedIndex {
        label: label.to_string(),
        index,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_immediate_int() {
        assert_eq!(classify_operand("#5").unwrap(), Operand::Immediate(ScalarValue::Int(5)));
        assert_eq!(classify_operand("#-3").unwrap(), Operand::Immediate(ScalarValue::Int(-3)));
    }

    #[test]
    fn classifies_immediate_constant() {
        assert_eq!(
            classify_operand("#sz").unwrap(),
            Operand::Immediate(ScalarValue::Constant("sz".to_string()))
        );
    }

    #[test]
    fn classifies_register() {
        assert_eq!(classify_operand("r3").unwrap(), Operand::DirectRegister(3));
    }

    #[test]
    fn classifies_direct() {
        assert_eq!(classify_operand("LOOP").unwrap(), Operand::Direct("LOOP".to_string()));
    }

    #[test]
    fn classifies_fixed_index_with_int() {
        assert_eq!(
            classify_operand("ARR[3]").unwrap(),
            Operand::FixedIndex {
                label: "ARR".to_string(),
                index: ScalarValue::Int(3)
            }
        );
    }

    #[test]
    fn classifies_fixed_index_with_constant() {
        assert_eq!(
            classify_operand("ARR[sz]").unwrap(),
            Operand::FixedIndex {
                label: "ARR".to_string(),
                index: ScalarValue::Constant("sz".to_string())
            }
        );
    }

    #[test]
    fn rejects_malformed_bracket() {
        assert!(classify_operand("ARR[3").is_err());
        assert!(classify_operand("ARR[3]x").is_err());
    }

    #[test]
    fn register_like_token_must_match_exactly() {
        assert!(matches!(classify_operand("r8"), Ok(Operand::Direct(_))));
    }
}
