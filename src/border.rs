//! Cell borders – either nothing, everything, the inherited border or an
//! explicit set of sides.

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// The four sides of a rectangle.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Sides: u8 {
        const LEFT = 1 << 0;
        const TOP = 1 << 1;
        const RIGHT = 1 << 2;
        const BOTTOM = 1 << 3;
    }
}

/// How a rectangle is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RectangleStyle {
    /// Stroke the outline only.
    #[default]
    Draw,
    /// Fill the interior only.
    Fill,
    /// Fill then stroke.
    Both,
}

impl RectangleStyle {
    pub fn is_fill(self) -> bool {
        matches!(self, RectangleStyle::Fill | RectangleStyle::Both)
    }

    pub fn is_draw(self) -> bool {
        matches!(self, RectangleStyle::Draw | RectangleStyle::Both)
    }
}

/// A cell border.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Border {
    /// No border at all.
    None,
    /// All four sides.
    #[default]
    All,
    /// Use the border of the enclosing style.
    Inherited,
    /// An explicit combination of sides.
    Sides(Sides),
}

impl Border {
    pub fn left() -> Self {
        Border::Sides(Sides::LEFT)
    }

    pub fn top() -> Self {
        Border::Sides(Sides::TOP)
    }

    pub fn right() -> Self {
        Border::Sides(Sides::RIGHT)
    }

    pub fn bottom() -> Self {
        Border::Sides(Sides::BOTTOM)
    }

    pub fn left_right() -> Self {
        Border::Sides(Sides::LEFT | Sides::RIGHT)
    }

    pub fn top_bottom() -> Self {
        Border::Sides(Sides::TOP | Sides::BOTTOM)
    }

    /// Legacy integer encoding: `1` = all, `0` = none, `-1` = inherited.
    pub fn from_int(value: i32) -> Self {
        match value {
            1 => Border::All,
            -1 => Border::Inherited,
            _ => Border::None,
        }
    }

    /// The set of sides actually drawn.
    pub fn sides(&self) -> Sides {
        match self {
            Border::All => Sides::all(),
            Border::Sides(sides) => *sides,
            Border::None | Border::Inherited => Sides::empty(),
        }
    }

    pub fn is_left(&self) -> bool {
        self.sides().contains(Sides::LEFT)
    }

    pub fn is_top(&self) -> bool {
        self.sides().contains(Sides::TOP)
    }

    pub fn is_right(&self) -> bool {
        self.sides().contains(Sides::RIGHT)
    }

    pub fn is_bottom(&self) -> bool {
        self.sides().contains(Sides::BOTTOM)
    }

    pub fn is_none(&self) -> bool {
        self.sides().is_empty() && !self.is_inherited()
    }

    pub fn is_inherited(&self) -> bool {
        matches!(self, Border::Inherited)
    }

    /// True when the border can be drawn as a single rectangle.
    pub fn is_rectangle_style(&self) -> bool {
        self.sides() == Sides::all()
    }

    /// Rectangle painting mode for this border, combined with a fill flag.
    pub fn rectangle_style(&self, fill: bool) -> Option<RectangleStyle> {
        match (self.is_rectangle_style(), fill) {
            (true, true) => Some(RectangleStyle::Both),
            (true, false) => Some(RectangleStyle::Draw),
            (false, true) => Some(RectangleStyle::Fill),
            (false, false) => None,
        }
    }

    /// Resolves an inherited border against its parent.
    pub fn resolve(self, parent: Border) -> Border {
        match self {
            Border::Inherited => match parent {
                Border::Inherited => Border::All,
                other => other,
            },
            other => other,
        }
    }

    /// Replaces the sides with the given legacy string (`"LTRB"` letters,
    /// case-insensitive, duplicates ignored).
    pub fn set_value(&mut self, value: &str) {
        *self = value.parse().unwrap_or(Border::None);
    }
}

/// Error returned when a border string contains an unknown side letter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseBorderError(pub char);

impl fmt::Display for ParseBorderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid border side '{}'", self.0)
    }
}

impl std::error::Error for ParseBorderError {}

impl FromStr for Border {
    type Err = ParseBorderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "0" => return Ok(Border::None),
            "1" => return Ok(Border::All),
            "-1" => return Ok(Border::Inherited),
            _ => {}
        }
        let mut sides = Sides::empty();
        for ch in s.trim().chars() {
            sides |= match ch.to_ascii_uppercase() {
                'L' => Sides::LEFT,
                'T' => Sides::TOP,
                'R' => Sides::RIGHT,
                'B' => Sides::BOTTOM,
                other => return Err(ParseBorderError(other)),
            };
        }
        Ok(Border::Sides(sides))
    }
}

impl fmt::Display for Border {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Border::None => f.write_str("0"),
            Border::All => f.write_str("1"),
            Border::Inherited => f.write_str("-1"),
            Border::Sides(sides) => {
                for (flag, letter) in [
                    (Sides::LEFT, 'L'),
                    (Sides::TOP, 'T'),
                    (Sides::RIGHT, 'R'),
                    (Sides::BOTTOM, 'B'),
                ] {
                    if sides.contains(flag) {
                        write!(f, "{letter}")?;
                    }
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_value_deduplicates_sides() {
        let mut border = Border::None;
        border.set_value("lrlr");
        assert_eq!(border.sides().bits().count_ones(), 2);
        assert!(border.is_left() && border.is_right());
        assert!(!border.is_top() && !border.is_bottom());
        assert_eq!(border.to_string(), "LR");
    }

    #[test]
    fn rectangle_style_detection() {
        assert!(Border::All.is_rectangle_style());
        assert!(!Border::left().is_rectangle_style());
        assert!("LTRB".parse::<Border>().unwrap().is_rectangle_style());
        assert_eq!(Border::All.rectangle_style(true), Some(RectangleStyle::Both));
        assert_eq!(Border::None.rectangle_style(false), None);
    }

    #[test]
    fn legacy_encodings() {
        assert_eq!(Border::from_int(1), Border::All);
        assert_eq!(Border::from_int(0), Border::None);
        assert_eq!(Border::from_int(-1), Border::Inherited);
        assert_eq!("-1".parse::<Border>().unwrap(), Border::Inherited);
        assert!("LX".parse::<Border>().is_err());
    }

    #[test]
    fn inherited_resolution() {
        assert_eq!(Border::Inherited.resolve(Border::left()), Border::left());
        assert_eq!(Border::Inherited.resolve(Border::Inherited), Border::All);
        assert_eq!(Border::None.resolve(Border::All), Border::None);
    }
}
