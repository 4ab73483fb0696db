use crate::numbers;
use std::fmt::{Debug, Formatter};

/// Wrapper for one fetched LC-3 instruction word.
/// The opcode sits in bits 15-12, the remaining fields are opcode-specific.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct Instruction(u16);

impl Instruction {
    /// Gives the value of only the specified bit range.
    ///
    /// # Parameters
    /// - `from`: starting index
    /// - `to`: end index (inclusive), must be greater or equal to `from`
    ///
    /// # Panics
    /// - asserts that to is greater or equal from and both are valid indexes
    #[must_use]
    pub fn get_bit_range(self, from: u8, to: u8) -> u16 {
        debug_assert!(
            to >= from,
            "wrong direction of from: {from:?} and to: {to:?}"
        );
        debug_assert!(
            (0..u16::BITS).contains(&u32::from(to)),
            "index: {to:?} to u16 is greater than maximum value {:?}",
            u16::BITS - 1
        );
        (self.0 >> from) & ((0b1 << (to - from + 1)) - 1)
    }
    /// Gives the value of only the specified bit range and converts that to u8.
    /// See [`Instruction::get_bit_range()`]
    /// # Panics
    /// - value does not fit into u8 with message from `expect`
    #[must_use]
    pub fn get_bit_range_u8(self, from: u8, to: u8, expect: &str) -> u8 {
        u8::try_from(self.get_bit_range(from, to)).expect(expect)
    }
    #[must_use]
    pub fn get_bit(self, index: u8) -> bool {
        self.get_bit_range(index, index) & 1 != 0
    }
    #[must_use]
    pub fn op_code(self) -> u8 {
        self.get_bit_range_u8(12, 15, "Error parsing op_code")
    }
    #[must_use]
    pub fn dr_number(self) -> u8 {
        self.get_bit_range_u8(9, 11, "Error parsing dr")
    }
    /// Store instructions keep their source register in the DR field.
    #[must_use]
    pub fn sr_number(self) -> u8 {
        self.dr_number()
    }
    #[must_use]
    pub fn sr1_number(self) -> u8 {
        self.get_bit_range_u8(6, 8, "Error parsing sr1")
    }
    #[must_use]
    pub fn sr2_number(self) -> u8 {
        self.get_bit_range_u8(0, 2, "Error parsing sr2")
    }
    #[must_use]
    pub fn base_r_number(self) -> u8 {
        self.get_bit_range_u8(6, 8, "Error parsing base register")
    }
    #[must_use]
    pub fn is_immediate(self) -> bool {
        self.get_bit(5)
    }
    /// The imm5 field, sign extended to a full word.
    #[must_use]
    pub fn get_immediate(self) -> u16 {
        Self::sign_extend(self.get_bit_range(0, 4), 5)
    }
    /// BR's condition mask, bits 11 (n), 10 (z) and 9 (p).
    #[must_use]
    pub fn condition_mask(self) -> u16 {
        self.get_bit_range(9, 11)
    }
    /// TRAP's 8-bit system routine selector.
    #[must_use]
    pub fn trap_vector(self) -> u8 {
        self.get_bit_range_u8(0, 7, "Error parsing trap vector")
    }
    /// Offset added to the program counter or a base register, sign extended
    /// to a full word so that `wrapping_add` performs the modulo-65536
    /// address arithmetic of the architecture.
    #[must_use]
    pub fn pc_offset(self, len: u8) -> u16 {
        Self::sign_extend(self.get_bit_range(0, len - 1), len)
    }
    /// Implements sign extension as described at [Sign extension](https://en.wikipedia.org/wiki/Sign_extension).
    #[must_use]
    const fn sign_extend(bits: u16, valid_bits: u8) -> u16 {
        let most_significant_bit = bits >> (valid_bits - 1);
        if most_significant_bit == 1 {
            // negative: 1-extend
            bits | (0xFFFF << valid_bits)
        } else {
            // positive, already 0-extended
            bits
        }
    }
}

impl Debug for Instruction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Op: {:04b}, DR: {:03b}, PC_Off: {}",
            self.op_code(),
            self.dr_number(),
            numbers::twos_complement_to_decimal(self.pc_offset(9))
        )
    }
}

impl From<u16> for Instruction {
    fn from(bits: u16) -> Self {
        Self(bits)
    }
}
