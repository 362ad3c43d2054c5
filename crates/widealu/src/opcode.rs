//! Opcode space and the static opcode → category table.
//!
//! Opcodes are 8-bit. Each 16-code range belongs to one category; codes
//! inside a range that name no operation, and every range past 0xAF, map to
//! [`Category::Unsupported`].
//!
//! | Range | Category |
//! |-------|----------|
//! | 0x00–0x0F | Arithmetic |
//! | 0x10–0x1F | Logical |
//! | 0x20–0x2F | Shift / rotate |
//! | 0x30–0x3F | Bit manipulation |
//! | 0x40–0x4F | Comparison |
//! | 0x50–0x5F | Data movement |
//! | 0x60–0x6F | Advanced arithmetic |
//! | 0x70–0x7F | SIMD |
//! | 0x80–0x8F | Vector |
//! | 0x90–0x9F | Float (opaque) |
//! | 0xA0–0xAF | Crypto (opaque) |
//!
//! # Example
//!
//! ```
//! use widealu::opcode::{category_of, op, Category};
//!
//! assert_eq!(category_of(op::ADD), Category::Arithmetic);
//! assert_eq!(category_of(0x0F), Category::Unsupported);
//! assert_eq!(category_of(0xFF), Category::Unsupported);
//! ```

use serde::{Deserialize, Serialize};

/// Operation category an opcode belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// ADD, SUB, MUL, DIV, MOD.
    Arithmetic,
    /// Bitwise Boolean operators.
    Logical,
    /// Barrel shifts and rotations.
    ShiftRotate,
    /// Single-bit and whole-word bit queries.
    BitManipulation,
    /// Signed / unsigned comparisons.
    Comparison,
    /// Register-style moves.
    DataMovement,
    /// INC, DEC, NEG, ABS, MIN, MAX, SQRT, POW, GCD, LCM.
    Advanced,
    /// Lane-wise add / sub / mul.
    Simd,
    /// Two-component vector operations.
    Vector,
    /// Floating-point extension slots.
    Float,
    /// Cryptographic extension slots.
    Crypto,
    /// Not assigned to any kernel.
    Unsupported,
}

/// Opcode values.
pub mod op {
    /// Wrapping addition.
    pub const ADD: u8 = 0x00;
    /// Wrapping subtraction.
    pub const SUB: u8 = 0x01;
    /// Low half of the full product.
    pub const MUL: u8 = 0x02;
    /// Unsigned division.
    pub const DIV: u8 = 0x03;
    /// Unsigned remainder.
    pub const MOD: u8 = 0x04;

    /// Bitwise AND.
    pub const AND: u8 = 0x10;
    /// Bitwise OR.
    pub const OR: u8 = 0x11;
    /// Bitwise XOR.
    pub const XOR: u8 = 0x12;
    /// Bitwise NOT of `a`.
    pub const NOT: u8 = 0x13;
    /// Bitwise NAND.
    pub const NAND: u8 = 0x14;
    /// Bitwise NOR.
    pub const NOR: u8 = 0x15;
    /// Bitwise XNOR.
    pub const XNOR: u8 = 0x16;

    /// Logical shift left.
    pub const SLL: u8 = 0x20;
    /// Logical shift right.
    pub const SRL: u8 = 0x21;
    /// Arithmetic shift right.
    pub const SRA: u8 = 0x22;
    /// Rotate left.
    pub const ROL: u8 = 0x23;
    /// Rotate right.
    pub const ROR: u8 = 0x24;

    /// Set bit `b` of `a`.
    pub const SETB: u8 = 0x30;
    /// Clear bit `b` of `a`.
    pub const CLRB: u8 = 0x31;
    /// Toggle bit `b` of `a`.
    pub const TGLB: u8 = 0x32;
    /// Test bit `b` of `a`.
    pub const TSTB: u8 = 0x33;
    /// Population count.
    pub const POPCNT: u8 = 0x34;
    /// Zero count.
    pub const ZEROCNT: u8 = 0x35;
    /// Index of the lowest one bit.
    pub const FFO: u8 = 0x36;
    /// Index of the lowest zero bit.
    pub const FFZ: u8 = 0x37;
    /// Bit reversal.
    pub const BREV: u8 = 0x38;
    /// Byte swap.
    pub const BSWAP: u8 = 0x39;
    /// Whole-word parity (flag only).
    pub const PARITY: u8 = 0x3A;

    /// Compare: `a - b`, flags as SUB.
    pub const CMP: u8 = 0x40;
    /// `a == b`.
    pub const EQ: u8 = 0x41;
    /// `a != b`.
    pub const NE: u8 = 0x42;
    /// Signed `a < b`.
    pub const LT: u8 = 0x43;
    /// Signed `a <= b`.
    pub const LE: u8 = 0x44;
    /// Signed `a > b`.
    pub const GT: u8 = 0x45;
    /// Signed `a >= b`.
    pub const GE: u8 = 0x46;
    /// Unsigned `a < b`.
    pub const LTU: u8 = 0x47;
    /// Unsigned `a <= b`.
    pub const LEU: u8 = 0x48;
    /// Unsigned `a > b`.
    pub const GTU: u8 = 0x49;
    /// Unsigned `a >= b`.
    pub const GEU: u8 = 0x4A;

    /// Copy `a`.
    pub const MOV: u8 = 0x50;
    /// Copy `b`.
    pub const MOVB: u8 = 0x51;
    /// All zeros.
    pub const CLR: u8 = 0x52;
    /// All ones.
    pub const FILL: u8 = 0x53;
    /// Exchange the halves of `a`.
    pub const SWAPH: u8 = 0x54;

    /// Increment.
    pub const INC: u8 = 0x60;
    /// Decrement.
    pub const DEC: u8 = 0x61;
    /// Two's-complement negation.
    pub const NEG: u8 = 0x62;
    /// Signed absolute value.
    pub const ABS: u8 = 0x63;
    /// Signed minimum.
    pub const MIN: u8 = 0x64;
    /// Signed maximum.
    pub const MAX: u8 = 0x65;
    /// Integer square root.
    pub const SQRT: u8 = 0x66;
    /// Modular power.
    pub const POW: u8 = 0x67;
    /// Greatest common divisor.
    pub const GCD: u8 = 0x68;
    /// Least common multiple.
    pub const LCM: u8 = 0x69;

    /// Lane-wise add.
    pub const VADD: u8 = 0x70;
    /// Lane-wise subtract.
    pub const VSUB: u8 = 0x71;
    /// Lane-wise multiply.
    pub const VMUL: u8 = 0x72;

    /// Two-component dot product.
    pub const DOT: u8 = 0x80;
    /// Cross product (opaque slot).
    pub const CROSS: u8 = 0x81;
    /// Magnitude.
    pub const MAG: u8 = 0x82;

    /// Float add (opaque slot).
    pub const FADD: u8 = 0x90;
    /// Float subtract (opaque slot).
    pub const FSUB: u8 = 0x91;
    /// Float multiply (opaque slot).
    pub const FMUL: u8 = 0x92;
    /// Float divide (opaque slot).
    pub const FDIV: u8 = 0x93;
    /// Float square root (opaque slot).
    pub const FSQRT: u8 = 0x94;

    /// AES encrypt round (opaque slot).
    pub const AESENC: u8 = 0xA0;
    /// AES decrypt round (opaque slot).
    pub const AESDEC: u8 = 0xA1;
    /// SHA compression (opaque slot).
    pub const SHA: u8 = 0xA2;
    /// RSA modular exponentiation (opaque slot).
    pub const RSA: u8 = 0xA3;
    /// ECC point operation (opaque slot).
    pub const ECC: u8 = 0xA4;
    /// Random number generation (opaque slot).
    pub const RNG: u8 = 0xA5;
}

/// Mnemonic for every assigned opcode.
pub static MNEMONICS: [(u8, &str); 71] = [
    (op::ADD, "ADD"),
    (op::SUB, "SUB"),
    (op::MUL, "MUL"),
    (op::DIV, "DIV"),
    (op::MOD, "MOD"),
    (op::AND, "AND"),
    (op::OR, "OR"),
    (op::XOR, "XOR"),
    (op::NOT, "NOT"),
    (op::NAND, "NAND"),
    (op::NOR, "NOR"),
    (op::XNOR, "XNOR"),
    (op::SLL, "SLL"),
    (op::SRL, "SRL"),
    (op::SRA, "SRA"),
    (op::ROL, "ROL"),
    (op::ROR, "ROR"),
    (op::SETB, "SETB"),
    (op::CLRB, "CLRB"),
    (op::TGLB, "TGLB"),
    (op::TSTB, "TSTB"),
    (op::POPCNT, "POPCNT"),
    (op::ZEROCNT, "ZEROCNT"),
    (op::FFO, "FFO"),
    (op::FFZ, "FFZ"),
    (op::BREV, "BREV"),
    (op::BSWAP, "BSWAP"),
    (op::PARITY, "PARITY"),
    (op::CMP, "CMP"),
    (op::EQ, "EQ"),
    (op::NE, "NE"),
    (op::LT, "LT"),
    (op::LE, "LE"),
    (op::GT, "GT"),
    (op::GE, "GE"),
    (op::LTU, "LTU"),
    (op::LEU, "LEU"),
    (op::GTU, "GTU"),
    (op::GEU, "GEU"),
    (op::MOV, "MOV"),
    (op::MOVB, "MOVB"),
    (op::CLR, "CLR"),
    (op::FILL, "FILL"),
    (op::SWAPH, "SWAPH"),
    (op::INC, "INC"),
    (op::DEC, "DEC"),
    (op::NEG, "NEG"),
    (op::ABS, "ABS"),
    (op::MIN, "MIN"),
    (op::MAX, "MAX"),
    (op::SQRT, "SQRT"),
    (op::POW, "POW"),
    (op::GCD, "GCD"),
    (op::LCM, "LCM"),
    (op::VADD, "VADD"),
    (op::VSUB, "VSUB"),
    (op::VMUL, "VMUL"),
    (op::DOT, "DOT"),
    (op::CROSS, "CROSS"),
    (op::MAG, "MAG"),
    (op::FADD, "FADD"),
    (op::FSUB, "FSUB"),
    (op::FMUL, "FMUL"),
    (op::FDIV, "FDIV"),
    (op::FSQRT, "FSQRT"),
    (op::AESENC, "AESENC"),
    (op::AESDEC, "AESDEC"),
    (op::SHA, "SHA"),
    (op::RSA, "RSA"),
    (op::ECC, "ECC"),
    (op::RNG, "RNG"),
];

/// Number of assigned codes per range, indexed by `opcode >> 4`.
const RANGE_SIZES: [u8; 11] = [5, 7, 5, 11, 11, 5, 10, 3, 3, 5, 6];

/// Categories of the assigned ranges, indexed by `opcode >> 4`.
const RANGE_CATEGORIES: [Category; 11] = [
    Category::Arithmetic,
    Category::Logical,
    Category::ShiftRotate,
    Category::BitManipulation,
    Category::Comparison,
    Category::DataMovement,
    Category::Advanced,
    Category::Simd,
    Category::Vector,
    Category::Float,
    Category::Crypto,
];

/// Opcode → category for all 256 codes.
///
/// Computed at compile time; read-only for the life of the process.
pub static OPCODE_TABLE: [Category; 256] = {
    let mut table = [Category::Unsupported; 256];
    let mut i = 0usize;
    while i < 256 {
        let range = i >> 4;
        if range < RANGE_SIZES.len() && (i & 0x0F) < RANGE_SIZES[range] as usize {
            table[i] = RANGE_CATEGORIES[range];
        }
        i += 1;
    }
    table
};

/// Category of `opcode`. Total over the 8-bit space.
#[inline]
pub fn category_of(opcode: u8) -> Category {
    OPCODE_TABLE[opcode as usize]
}

/// Mnemonic of `opcode`, if assigned.
pub fn mnemonic(opcode: u8) -> Option<&'static str> {
    MNEMONICS
        .iter()
        .find(|(code, _)| *code == opcode)
        .map(|(_, name)| *name)
}

/// Opcode for a mnemonic (case-insensitive).
pub fn from_mnemonic(name: &str) -> Option<u8> {
    MNEMONICS
        .iter()
        .find(|(_, n)| n.eq_ignore_ascii_case(name))
        .map(|(code, _)| *code)
}
