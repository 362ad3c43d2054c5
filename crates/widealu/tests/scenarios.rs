//! Concrete evaluation scenarios, run at both unit widths.

use widealu::kernel::{Kernel, Operands, ShiftOp, ShiftRotate};
use widealu::mode::code;
use widealu::opcode::op;
use widealu::{Alu, Exception, WideWord};

fn all_ones_plus_one<const L: usize>() {
    let alu = Alu::<L>::new();
    let out = alu.evaluate(&WideWord::MAX, &WideWord::ONE, op::ADD, code::NORMAL, 0);
    assert!(out.result.is_zero());
    assert!(out.flags.carry);
    assert!(out.flags.zero);
    assert!(!out.flags.overflow);
    assert_eq!(out.exception, Exception::None);
}

fn most_negative_minus_one<const L: usize>() {
    let alu = Alu::<L>::new();
    let min = WideWord::<L>::ONE.shift_left(WideWord::<L>::BITS - 1);
    let out = alu.evaluate(&min, &WideWord::ONE, op::SUB, code::NORMAL, 0);
    assert!(out.flags.overflow);
    assert!(!out.flags.negative);
    assert_eq!(out.result, WideWord::MAX.shift_right(1));
}

fn divide_by_zero<const L: usize>() {
    let alu = Alu::<L>::new();
    let a = WideWord::<L>::from_u64(12345);
    let out = alu.evaluate(&a, &WideWord::ZERO, op::DIV, code::NORMAL, 0);
    assert_eq!(out.exception, Exception::DivideByZero);
    assert_eq!(out.result, WideWord::MAX);
}

fn rotate_by_full_width<const L: usize>() {
    let a = WideWord::<L>::from_u64(0xDEAD_BEEF).shift_left(17);
    let bits = WideWord::<L>::BITS;
    let ops = Operands::with_shift(a, WideWord::ZERO, bits);
    assert_eq!(ShiftRotate.execute(ShiftOp::Rol, &ops), a);
    assert_eq!(ShiftRotate.execute(ShiftOp::Ror, &ops), a);

    // Through the dispatcher the amount N is reduced to the shift field,
    // which for both units wraps it to zero.
    let alu = Alu::<L>::new();
    let b = WideWord::<L>::from_u64(u64::from(bits));
    let out = alu.evaluate(&a, &b, op::ROL, code::NORMAL, bits as u16);
    assert_eq!(out.result, a);
}

fn shifts_past_width<const L: usize>() {
    let bits = WideWord::<L>::BITS;
    let negative = WideWord::<L>::MAX.shift_left(4);
    for amount in [bits, bits + 1, 5 * bits] {
        let ops = Operands::with_shift(negative, WideWord::ZERO, amount);
        assert!(ShiftRotate.execute(ShiftOp::Sll, &ops).is_zero());
        assert!(ShiftRotate.execute(ShiftOp::Srl, &ops).is_zero());
        assert_eq!(ShiftRotate.execute(ShiftOp::Sra, &ops), WideWord::MAX);
    }
}

fn unsupported_paths<const L: usize>() {
    let alu = Alu::<L>::new();
    let one = WideWord::<L>::ONE;
    let out = alu.evaluate(&one, &one, op::XOR, code::BCD, 0);
    assert_eq!(out.exception, Exception::UnsupportedOperation);
    assert!(out.result.is_zero() && out.flags.trap);

    let out = alu.evaluate(&one, &one, op::ADD, 0x06, 0);
    assert_eq!(out.exception, Exception::UnsupportedMode);
    assert!(out.result.is_zero() && out.flags.trap);
}

macro_rules! at_both_widths {
    ($($name:ident => $scenario:ident),* $(,)?) => {
        mod narrow {
            $(#[test] fn $name() { super::$scenario::<8>(); })*
        }
        mod wide {
            $(#[test] fn $name() { super::$scenario::<32>(); })*
        }
    };
}

at_both_widths! {
    add_all_ones_plus_one_carries_to_zero => all_ones_plus_one,
    sub_from_most_negative_overflows => most_negative_minus_one,
    div_by_zero_returns_all_ones => divide_by_zero,
    rol_by_full_width_is_identity => rotate_by_full_width,
    shifts_past_width_saturate => shifts_past_width,
    unsupported_mode_and_operation_trap => unsupported_paths,
}

// =============================================================================
// Mode-specific scenarios
// =============================================================================

#[test]
fn bcd_add_and_sub() {
    let alu = widealu::Alu512::new();
    let a = widealu::Word512::from_u64(0x0458);
    let b = widealu::Word512::from_u64(0x0279);
    let sum = alu.evaluate(&a, &b, op::ADD, code::BCD, 0);
    assert_eq!(sum.result, widealu::Word512::from_u64(0x0737));
    assert!(!sum.flags.carry);
    let diff = alu.evaluate(&a, &b, op::SUB, code::BCD, 0);
    assert_eq!(diff.result, widealu::Word512::from_u64(0x0179));
}

#[test]
fn bcd_add_out_of_top_digit_sets_carry() {
    use widealu::Word512;
    let alu = widealu::Alu512::new();
    let all_nines = Word512::from_le_bytes(&[0x99u8; 64]);
    let out = alu.evaluate(&all_nines, &Word512::ONE, op::ADD, code::BCD, 0);
    assert!(out.result.is_zero());
    assert!(out.flags.carry && out.flags.zero);
    assert_eq!(out.exception, Exception::None);

    let out = alu.evaluate(&Word512::ZERO, &Word512::ZERO, op::ADD, code::BCD, 0);
    assert!(out.flags.zero && !out.flags.carry);

    let out = alu.evaluate(&Word512::ZERO, &Word512::ONE, op::SUB, code::BCD, 0);
    assert_eq!(out.result, all_nines);
    assert!(out.flags.carry);
}

#[test]
fn vector_dot_and_magnitude() {
    use widealu::Word2048;
    let alu = widealu::Alu2048::new();
    let v = Word2048::from_halves(&Word2048::from_u64(6), &Word2048::from_u64(8));
    let dot = alu.evaluate(&v, &v, op::DOT, code::VECTOR, 0);
    assert_eq!(dot.result, Word2048::from_u64(100));
    let mag = alu.evaluate(&v, &Word2048::ZERO, op::MAG, code::VECTOR, 0);
    assert_eq!(mag.result, Word2048::from_u64(10));
    let cross = alu.evaluate(&v, &v, op::CROSS, code::VECTOR, 0);
    assert!(cross.result.is_zero());
}

#[test]
fn crypto_stand_in_and_replacement() {
    use widealu::Word512;
    let mut alu = widealu::Alu512::new();
    let a = Word512::from_u64(0xF0);
    let b = Word512::from_u64(0x3C);
    let out = alu.evaluate(&a, &b, op::AESENC, code::CRYPTO, 0);
    assert_eq!(out.result, Word512::from_u64(0xCC));

    alu.register_opaque(op::AESENC, |a: &Word512, b: &Word512| *a & *b)
        .unwrap();
    let out = alu.evaluate(&a, &b, op::AESENC, code::CRYPTO, 0);
    assert_eq!(out.result, Word512::from_u64(0x30));
}

#[test]
fn simd_flags_mirror_aggregate() {
    use widealu::Word512;
    let alu = widealu::Alu512::new();
    let a = Word512::from_u64(0xFF);
    let out = alu.evaluate(&a, &Word512::ONE, op::VADD, code::SIMD8, 0);
    assert!(out.result.is_zero());
    assert!(out.flags.zero && out.flags.simd_zero);
    assert!(!out.flags.carry);
    assert!(!out.flags.simd_underflow);
}
