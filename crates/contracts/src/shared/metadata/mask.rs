//! Digit masks for document and phone inputs
//!
//! A `0` in the mask is a digit slot; every other character is a literal
//! written once the next digit arrives. A literal digit (the `1` of a CNPJ
//! branch) also swallows a typed digit equal to it, so masking an already
//! masked value changes nothing.

pub const CPF_MASK: &str = "000.000.000-00";
pub const PHONE_MASK: &str = "(00) 00000-0000";
pub const CNPJ_MASK: &str = "00.000.000/0001-00";

const DIGIT_SLOT: char = '0';

/// Format raw input through a mask, dropping non-digits and overflow
pub fn apply_mask(mask: &str, input: &str) -> String {
    let mut digits = input.chars().filter(|c| c.is_ascii_digit()).peekable();
    let mut out = String::with_capacity(mask.len());
    let mut literals = String::new();

    for slot in mask.chars() {
        if slot == DIGIT_SLOT {
            match digits.next() {
                Some(d) => {
                    out.push_str(&literals);
                    literals.clear();
                    out.push(d);
                }
                None => break,
            }
            continue;
        }

        literals.push(slot);
        if slot.is_ascii_digit() && digits.peek() == Some(&slot) {
            digits.next();
            out.push_str(&literals);
            literals.clear();
        }
    }
    out
}

/// Placeholder text for an empty masked input
pub fn placeholder(mask: &'static str) -> &'static str {
    mask
}
