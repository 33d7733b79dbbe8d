//! Dice roller collaborator
//!
//! All randomness in combat resolution flows through [`DiceRoller`] so that an
//! encounter is fully reproducible given a deterministic roller.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{DiceError, DiceExpression};

/// Individual dice and total of one expression roll
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRoll {
    pub rolls: Vec<u32>,
    pub modifier: i32,
    pub total: i32,
}

impl DiceRoll {
    /// Sum of the dice without the modifier
    pub fn dice_sum(&self) -> u32 {
        self.rolls.iter().sum()
    }
}

/// Source of die results
pub trait DiceRoller: Send {
    /// Roll one die, returning a value in `[1, sides]`
    fn roll(&mut self, sides: u32) -> u32;

    /// Roll every die in the expression and add its modifier once
    fn roll_dice(&mut self, expr: &DiceExpression) -> DiceRoll {
        let rolls: Vec<u32> = (0..expr.count).map(|_| self.roll(expr.sides)).collect();
        let sum: u32 = rolls.iter().sum();
        DiceRoll {
            total: (sum as i32).saturating_add(expr.modifier),
            modifier: expr.modifier,
            rolls,
        }
    }

    /// Parse and roll a notation string such as `"2d8+3"`
    fn roll_expression(&mut self, expr: &str) -> Result<DiceRoll, DiceError> {
        let parsed: DiceExpression = expr.parse()?;
        Ok(self.roll_dice(&parsed))
    }
}

impl<R: DiceRoller + ?Sized> DiceRoller for Box<R> {
    fn roll(&mut self, sides: u32) -> u32 {
        (**self).roll(sides)
    }
}

/// Replays a scripted sequence of die results, cycling when exhausted.
///
/// Values are clamped into `[1, sides]` for the die being rolled, so a
/// script of `[20]` used for a d8 yields 8.
#[derive(Debug, Clone)]
pub struct SequenceDiceRoller {
    script: Vec<u32>,
    pending: VecDeque<u32>,
    consumed: usize,
}

impl SequenceDiceRoller {
    pub fn new(script: impl IntoIterator<Item = u32>) -> Self {
        let script: Vec<u32> = script.into_iter().collect();
        Self {
            pending: script.iter().copied().collect(),
            script,
            consumed: 0,
        }
    }

    /// Every die shows the same face
    pub fn fixed(value: u32) -> Self {
        Self::new([value])
    }

    /// Number of dice rolled so far
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Results not yet used in the current pass over the script
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl DiceRoller for SequenceDiceRoller {
    fn roll(&mut self, sides: u32) -> u32 {
        if self.pending.is_empty() {
            self.pending.extend(self.script.iter().copied());
        }
        self.consumed += 1;
        let value = self.pending.pop_front().unwrap_or(1);
        value.clamp(1, sides.max(1))
    }
}
