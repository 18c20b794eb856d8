//! Primitive scalar targets: integers, floats, booleans and characters.

use super::expect_scalar;
use crate::{
    document::NodeRef,
    error::{Error, Result},
    path::LogicalPath,
    traits::FromNode,
};


/// Sign and magnitude of an integer literal, before it is narrowed to a target type.
struct IntegerLiteral {
    negative: bool,
    magnitude: u128,
}

impl IntegerLiteral {
    /// Accepts an optional sign followed by decimal digits, `0x` hex or `0o` octal digits.
    fn parse(text: &str) -> Option<Self> {
        let (negative, unsigned) = match text.as_bytes().first()? {
            b'-' => (true, &text[1..]),
            b'+' => (false, &text[1..]),
            _ => (false, text),
        };

        let (digits, radix) = if let Some(hex) = unsigned
            .strip_prefix("0x")
            .or_else(|| unsigned.strip_prefix("0X"))
        {
            (hex, 16)
        } else if let Some(octal) = unsigned.strip_prefix("0o") {
            (octal, 8)
        } else {
            (unsigned, 10)
        };

        // `from_str_radix` would accept a second sign.
        if digits.is_empty() || !digits.chars().all(|digit| digit.is_digit(radix)) {
            return None;
        }

        let magnitude = u128::from_str_radix(digits, radix).ok()?;

        Some(Self {
            negative,
            magnitude,
        })
    }

    fn narrow<T>(self) -> Option<T>
    where
        T: TryFrom<u128> + TryFrom<i128>,
    {
        if self.negative {
            let value = 0i128.checked_sub_unsigned(self.magnitude)?;
            <T as TryFrom<i128>>::try_from(value).ok()
        } else {
            <T as TryFrom<u128>>::try_from(self.magnitude).ok()
        }
    }
}


macro_rules! integer_from_node {
    ($($integer:ty),+) => {
        $(
            impl FromNode for $integer {
                fn from_node(node: NodeRef<'_>, path: &LogicalPath) -> Result<Self> {
                    let text = expect_scalar(node, path, "basic type")?;

                    IntegerLiteral::parse(text)
                        .and_then(IntegerLiteral::narrow::<$integer>)
                        .ok_or_else(|| Error::bad_conversion::<$integer>(text, path, node.mark()))
                }
            }
        )+
    };
}

integer_from_node!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);



fn special_float(text: &str) -> Option<f64> {
    match text {
        ".inf" | ".Inf" | ".INF" | "+.inf" | "+.Inf" | "+.INF" => Some(f64::INFINITY),
        "-.inf" | "-.Inf" | "-.INF" => Some(f64::NEG_INFINITY),
        ".nan" | ".NaN" | ".NAN" => Some(f64::NAN),
        _ => None,
    }
}

/// Rust's float parser also takes words like `inf` or `NaN`; YAML spells those differently.
fn looks_numeric(text: &str) -> bool {
    text.chars().any(|character| character.is_ascii_digit())
        && text
            .chars()
            .all(|character| character.is_ascii_digit() || "+-.eE".contains(character))
}

macro_rules! float_from_node {
    ($($float:ty),+) => {
        $(
            impl FromNode for $float {
                fn from_node(node: NodeRef<'_>, path: &LogicalPath) -> Result<Self> {
                    let text = expect_scalar(node, path, "basic type")?;

                    if let Some(special) = special_float(text) {
                        return Ok(special as $float);
                    }

                    if !looks_numeric(text) {
                        return Err(Error::bad_conversion::<$float>(text, path, node.mark()));
                    }

                    text.parse::<$float>()
                        .map_err(|_| Error::bad_conversion::<$float>(text, path, node.mark()))
                }
            }
        )+
    };
}

float_from_node!(f32, f64);



impl FromNode for bool {
    fn from_node(node: NodeRef<'_>, path: &LogicalPath) -> Result<Self> {
        let text = expect_scalar(node, path, "basic type")?;

        match text {
            "true" | "True" | "TRUE" | "yes" | "Yes" | "YES" | "on" | "On" | "ON" | "y" | "Y" => {
                Ok(true)
            }
            "false" | "False" | "FALSE" | "no" | "No" | "NO" | "off" | "Off" | "OFF" | "n"
            | "N" => Ok(false),
            _ => Err(Error::bad_conversion::<bool>(text, path, node.mark())),
        }
    }
}

impl FromNode for char {
    fn from_node(node: NodeRef<'_>, path: &LogicalPath) -> Result<Self> {
        let text = expect_scalar(node, path, "basic type")?;

        let mut characters = text.chars();
        match (characters.next(), characters.next()) {
            (Some(character), None) => Ok(character),
            _ => Err(Error::bad_conversion::<char>(text, path, node.mark())),
        }
    }
}
