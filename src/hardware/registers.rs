/// Default entry address when no loaded image relocates the program counter.
pub const DEFAULT_PC_START: u16 = 0x3000;

/// The LC-3 register file: eight general purpose registers, the program
/// counter and the condition flag. R7 doubles as the link register for
/// subroutine calls and traps.
pub struct Registers {
    general_purpose: [u16; 8],
    pc: u16,
    cond: ConditionFlag,
}

impl Registers {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            general_purpose: [0u16; 8],
            pc: DEFAULT_PC_START,
            cond: ConditionFlag::Zero,
        }
    }

    /// # Panics
    /// - `r` is not a valid register number
    #[must_use]
    pub fn get(&self, r: u8) -> u16 {
        assert!(r <= 7, "Invalid general purpose register get");
        self.general_purpose[usize::from(r)]
    }
    /// # Panics
    /// - `r` is not a valid register number
    pub fn set(&mut self, r: u8, value: u16) {
        assert!(r <= 7, "Invalid general purpose register set");
        self.general_purpose[usize::from(r)] = value;
    }

    #[must_use]
    pub const fn pc(&self) -> u16 {
        self.pc
    }
    pub const fn set_pc(&mut self, pc: u16) {
        self.pc = pc;
    }
    /// Moves the program counter past the word just fetched. 0xFFFF wraps to 0x0000.
    pub const fn advance_pc(&mut self) {
        self.pc = self.pc.wrapping_add(1);
    }

    #[must_use]
    pub const fn get_conditional_register(&self) -> ConditionFlag {
        self.cond
    }
    /// Flag-update rule shared by every DR-writing instruction.
    pub fn update_conditional_register(&mut self, r: u8) {
        self.cond = ConditionFlag::from(self.get(r));
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

/// Sign of the value most recently written to a general purpose register.
/// Exactly one flag is set at any time. The discriminants are the distinct
/// bits the BR instruction masks against (bits 9, 10, 11 of its encoding).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ConditionFlag {
    Pos = 1 << 0,
    Zero = 1 << 1,
    Neg = 1 << 2,
}

impl ConditionFlag {
    #[must_use]
    pub const fn mask(self) -> u16 {
        self as u16
    }
}

impl From<u16> for ConditionFlag {
    fn from(value: u16) -> Self {
        if value == 0 {
            Self::Zero
        } else if value >> 15 == 1 {
            // leftmost bit is 1 for negative numbers
            Self::Neg
        } else {
            Self::Pos
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use googletest::prelude::*;
    use yare::parameterized;

    #[parameterized(
        zero = { 0, ConditionFlag::Zero },
        one = { 1, ConditionFlag::Pos },
        max_positive = { 0x7FFF, ConditionFlag::Pos },
        smallest_negative = { 0x8000, ConditionFlag::Neg },
        minus_one = { 0xFFFF, ConditionFlag::Neg },
    )]
    fn condition_flag_from_value(value: u16, expected: ConditionFlag) {
        assert_that!(ConditionFlag::from(value), eq(expected));
    }

    #[gtest]
    pub fn test_update_conditional_register_tracks_written_value() {
        let mut regs = Registers::new();
        regs.set(3, 0x8001);
        regs.update_conditional_register(3);
        expect_that!(regs.get_conditional_register(), eq(ConditionFlag::Neg));
        regs.set(3, 0);
        regs.update_conditional_register(3);
        expect_that!(regs.get_conditional_register(), eq(ConditionFlag::Zero));
    }
    #[gtest]
    pub fn test_advance_pc_wraps_at_address_ceiling() {
        let mut regs = Registers::new();
        regs.set_pc(0xFFFF);
        regs.advance_pc();
        expect_that!(regs.pc(), eq(0x0000));
    }
    #[gtest]
    #[should_panic(expected = "Invalid general purpose register get")]
    pub fn test_get_rejects_out_of_range_register() {
        let regs = Registers::new();
        let _ = regs.get(8);
    }
}
