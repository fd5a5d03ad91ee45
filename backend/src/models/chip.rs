//! Chip catalogue
//!
//! The five physical chip colours (smallest denomination first), the
//! standard chip-set presets a host picks inventory from, and the per-player
//! `ChipType` rows handed back to the caller.

use serde::{Deserialize, Serialize};

/// Number of chip denominations in a set
pub const DENOMINATIONS: usize = 5;

/// Chip colour, ordered from smallest to largest denomination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChipColor {
    White,
    Red,
    Blue,
    Green,
    Black,
}

impl ChipColor {
    pub const ALL: [ChipColor; DENOMINATIONS] = [
        ChipColor::White,
        ChipColor::Red,
        ChipColor::Blue,
        ChipColor::Green,
        ChipColor::Black,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            ChipColor::White => "white",
            ChipColor::Red => "red",
            ChipColor::Blue => "blue",
            ChipColor::Green => "green",
            ChipColor::Black => "black",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ChipColor::White => "White",
            ChipColor::Red => "Red",
            ChipColor::Blue => "Blue",
            ChipColor::Green => "Green",
            ChipColor::Black => "Black",
        }
    }

    /// Face value printed on a typical home set
    pub fn face_value(&self) -> f64 {
        match self {
            ChipColor::White => 1.0,
            ChipColor::Red => 5.0,
            ChipColor::Blue => 10.0,
            ChipColor::Green => 25.0,
            ChipColor::Black => 100.0,
        }
    }
}

/// One denomination's assigned dollar value and chip count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChipType {
    pub id: String,
    pub color: ChipColor,
    pub display_name: String,

    /// Dollar value of one chip
    pub value: f64,

    /// Chips of this colour (per player or in total, depending on the caller)
    pub quantity: u32,
}

impl ChipType {
    pub fn new(color: ChipColor, value: f64, quantity: u32) -> Self {
        Self {
            id: color.id().to_string(),
            color,
            display_name: color.display_name().to_string(),
            value,
            quantity,
        }
    }

    /// Dollar value of the whole stack of this colour
    pub fn stack_value(&self) -> f64 {
        self.value * f64::from(self.quantity)
    }

    /// The default set: face values, no chips assigned
    pub fn default_set() -> [ChipType; DENOMINATIONS] {
        ChipColor::ALL.map(|c| ChipType::new(c, c.face_value(), 0))
    }
}

/// Physical chip inventory available to the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChipSet {
    /// 20 of each colour
    Standard100,

    /// 100 white, 50 of each other colour
    #[default]
    Standard300,

    /// 150 white, 150 red, 100 blue, 50 green, 50 black
    Standard500,

    /// Host-entered counts, smallest denomination first
    Custom([u32; DENOMINATIONS]),
}

impl ChipSet {
    pub const PRESETS: [ChipSet; 3] = [
        ChipSet::Standard300,
        ChipSet::Standard500,
        ChipSet::Standard100,
    ];

    /// Chips of each colour, smallest denomination first
    pub fn quantities(&self) -> [u32; DENOMINATIONS] {
        match self {
            ChipSet::Standard100 => [20, 20, 20, 20, 20],
            ChipSet::Standard300 => [100, 50, 50, 50, 50],
            ChipSet::Standard500 => [150, 150, 100, 50, 50],
            ChipSet::Custom(quantities) => *quantities,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ChipSet::Standard100 => "100pc Standard Set",
            ChipSet::Standard300 => "300pc Standard Set",
            ChipSet::Standard500 => "500pc Standard Set",
            ChipSet::Custom(_) => "Custom Set",
        }
    }

    pub fn total_chips(&self) -> u32 {
        self.quantities().iter().sum()
    }

    /// Inventory as `ChipType` rows (face values)
    pub fn chip_types(&self) -> [ChipType; DENOMINATIONS] {
        let quantities = self.quantities();
        std::array::from_fn(|i| {
            let color = ChipColor::ALL[i];
            ChipType::new(color, color.face_value(), quantities[i])
        })
    }
}

/// Suggested big blind for a buy-in
///
/// 2% of the buy-in, rounded up to 0.25, 0.50, 1, 2, 5, then to the next
/// multiple of 5.
pub fn recommended_big_blind(buy_in: f64) -> f64 {
    let raw = buy_in * 0.02;
    if raw <= 0.25 {
        0.25
    } else if raw <= 0.5 {
        0.5
    } else if raw <= 1.0 {
        1.0
    } else if raw <= 2.0 {
        2.0
    } else if raw <= 5.0 {
        5.0
    } else {
        (raw / 5.0).ceil() * 5.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_totals_match_labels() {
        assert_eq!(ChipSet::Standard100.total_chips(), 100);
        assert_eq!(ChipSet::Standard300.total_chips(), 300);
        assert_eq!(ChipSet::Standard500.total_chips(), 500);
    }

    #[test]
    fn test_chip_types_follow_colour_order() {
        let chips = ChipSet::Standard500.chip_types();
        assert_eq!(chips[0].color, ChipColor::White);
        assert_eq!(chips[0].quantity, 150);
        assert_eq!(chips[4].id, "black");
        assert_eq!(chips[4].quantity, 50);
    }

    #[test]
    fn test_recommended_big_blind_steps() {
        assert_eq!(recommended_big_blind(10.0), 0.25);
        assert_eq!(recommended_big_blind(20.0), 0.5);
        assert_eq!(recommended_big_blind(50.0), 1.0);
        assert_eq!(recommended_big_blind(100.0), 2.0);
        assert_eq!(recommended_big_blind(200.0), 5.0);
        assert_eq!(recommended_big_blind(300.0), 10.0);
        assert_eq!(recommended_big_blind(1000.0), 20.0);
    }
}
