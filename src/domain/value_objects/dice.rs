//! Dice notation (`NdS+M`) used by weapons and damage rolls

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Largest number of dice a single expression may roll
pub const MAX_DICE_COUNT: u32 = 100;
/// Largest die size accepted in an expression
pub const MAX_DIE_SIDES: u32 = 1000;

/// Errors produced when parsing dice notation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiceError {
    #[error("Empty dice expression")]
    Empty,

    #[error("Invalid dice expression: {0}")]
    Malformed(String),

    #[error("Dice count must be between 1 and 100, got {0}")]
    InvalidCount(u32),

    #[error("Die sides must be between 1 and 1000, got {0}")]
    InvalidSides(u32),
}

/// A parsed dice expression such as `1d8`, `2d6+3` or `d20-1`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DiceExpression {
    pub count: u32,
    pub sides: u32,
    /// Flat modifier added once after the dice are summed
    pub modifier: i32,
}

impl DiceExpression {
    pub fn new(count: u32, sides: u32, modifier: i32) -> Result<Self, DiceError> {
        if count == 0 || count > MAX_DICE_COUNT {
            return Err(DiceError::InvalidCount(count));
        }
        if sides == 0 || sides > MAX_DIE_SIDES {
            return Err(DiceError::InvalidSides(sides));
        }
        Ok(Self {
            count,
            sides,
            modifier,
        })
    }

    /// A single die with no modifier (`1dS`)
    pub fn single(sides: u32) -> Result<Self, DiceError> {
        Self::new(1, sides, 0)
    }

    /// Same expression with twice as many dice; the modifier is untouched.
    ///
    /// `1d8+3` becomes `2d8+3`.
    pub fn with_doubled_dice(&self) -> Self {
        Self {
            count: self.count.saturating_mul(2),
            ..*self
        }
    }

    pub fn with_modifier(&self, modifier: i32) -> Self {
        Self { modifier, ..*self }
    }

    pub fn min_total(&self) -> i32 {
        (self.count as i32).saturating_add(self.modifier)
    }

    pub fn max_total(&self) -> i32 {
        ((self.count * self.sides) as i32).saturating_add(self.modifier)
    }
}

impl fmt::Display for DiceExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)?;
        match self.modifier {
            0 => Ok(()),
            m if m > 0 => write!(f, "+{}", m),
            m => write!(f, "{}", m),
        }
    }
}

impl FromStr for DiceExpression {
    type Err = DiceError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let compact: String = input
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        if compact.is_empty() {
            return Err(DiceError::Empty);
        }

        let (count_part, rest) = compact
            .split_once('d')
            .ok_or_else(|| DiceError::Malformed(input.to_string()))?;

        let count = if count_part.is_empty() {
            1
        } else {
            count_part
                .parse::<u32>()
                .map_err(|_| DiceError::Malformed(input.to_string()))?
        };

        let (sides_part, modifier) = match rest.find(['+', '-']) {
            Some(pos) => {
                let (sides, modifier) = rest.split_at(pos);
                let modifier = modifier
                    .parse::<i32>()
                    .map_err(|_| DiceError::Malformed(input.to_string()))?;
                (sides, modifier)
            }
            None => (rest, 0),
        };

        let sides = sides_part
            .parse::<u32>()
            .map_err(|_| DiceError::Malformed(input.to_string()))?;

        Self::new(count, sides, modifier)
    }
}

impl TryFrom<String> for DiceExpression {
    type Error = DiceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DiceExpression> for String {
    fn from(expr: DiceExpression) -> String {
        expr.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_common_notation() {
        assert_eq!("1d8".parse(), DiceExpression::new(1, 8, 0));
        assert_eq!("2d6+3".parse(), DiceExpression::new(2, 6, 3));
        assert_eq!("d20".parse(), DiceExpression::new(1, 20, 0));
        assert_eq!("1d4-1".parse(), DiceExpression::new(1, 4, -1));
        assert_eq!(" 3D10 + 2 ".parse(), DiceExpression::new(3, 10, 2));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!("".parse::<DiceExpression>(), Err(DiceError::Empty));
        assert!(matches!(
            "3".parse::<DiceExpression>(),
            Err(DiceError::Malformed(_))
        ));
        assert!(matches!(
            "xd6".parse::<DiceExpression>(),
            Err(DiceError::Malformed(_))
        ));
        assert!(matches!(
            "1d6+x".parse::<DiceExpression>(),
            Err(DiceError::Malformed(_))
        ));
        assert_eq!("0d6".parse::<DiceExpression>(), Err(DiceError::InvalidCount(0)));
        assert_eq!("1d0".parse::<DiceExpression>(), Err(DiceError::InvalidSides(0)));
    }

    #[test]
    fn test_doubling_keeps_modifier() {
        let expr: DiceExpression = "1d8+3".parse().unwrap();
        let doubled = expr.with_doubled_dice();
        assert_eq!(doubled.count, 2);
        assert_eq!(doubled.sides, 8);
        assert_eq!(doubled.modifier, 3);
        assert_eq!(doubled.to_string(), "2d8+3");
    }

    #[test]
    fn test_display_and_serde_use_notation() {
        let expr = DiceExpression::new(1, 4, -1).unwrap();
        assert_eq!(expr.to_string(), "1d4-1");

        let json = serde_json::to_string(&expr).unwrap();
        assert_eq!(json, "\"1d4-1\"");
        let back: DiceExpression = serde_json::from_str("\"2d6+1\"").unwrap();
        assert_eq!(back, DiceExpression::new(2, 6, 1).unwrap());
        assert!(serde_json::from_str::<DiceExpression>("\"banana\"").is_err());
    }

    #[test]
    fn test_bounds() {
        let expr = DiceExpression::new(2, 6, 3).unwrap();
        assert_eq!(expr.min_total(), 5);
        assert_eq!(expr.max_total(), 15);

        let huge = DiceExpression::new(2, 6, i32::MAX).unwrap();
        assert_eq!(huge.min_total(), i32::MAX);
        assert_eq!(huge.max_total(), i32::MAX);
    }
}
