//! `widealu-eval` evaluates a single instruction and prints the outcome as JSON.
//!
//! **Usage:**
//! ```
//! widealu-eval [--width 512|2048] --op <name|code> [--mode <name|code>] [--shift <n>] <A> <B>
//! ```
//!
//! Operands are hex with a `0x` prefix or decimal. Opcodes and modes accept
//! either a mnemonic (`add`, `simd16`) or a numeric code (`0x01`, `6`).
//! The exit status is zero even when the outcome carries an exception; the
//! exception is part of the printed record.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use log::debug;
use serde::Serialize;
use widealu::opcode;
use widealu::{Alu, Exception, Mode, WideWord};

/// Evaluate one wide-ALU instruction.
#[derive(Parser)]
#[command(name = "widealu-eval", about = "Evaluate one wide-ALU instruction")]
struct Args {
    /// Unit width in bits: 512 or 2048.
    #[arg(long, default_value_t = 2048)]
    width: u32,

    /// Opcode mnemonic or numeric code.
    #[arg(long)]
    op: String,

    /// Mode name or numeric code.
    #[arg(long, default_value = "normal")]
    mode: String,

    /// Shift argument (used by the 2048-bit unit).
    #[arg(long, default_value_t = 0)]
    shift: u16,

    /// First operand.
    a: String,

    /// Second operand.
    #[arg(default_value = "0")]
    b: String,
}

/// Printed evaluation record.
#[derive(Serialize)]
struct Report {
    width: u32,
    opcode: u8,
    mode: u8,
    result: String,
    flags: u32,
    flag_names: Vec<&'static str>,
    exception: Exception,
}

/// Parse a byte given as `0x..` hex or decimal.
fn parse_code(text: &str) -> Option<u8> {
    match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16).ok(),
        None => text.parse().ok(),
    }
}

fn resolve_opcode(text: &str) -> Result<u8> {
    opcode::from_mnemonic(text)
        .or_else(|| parse_code(text))
        .ok_or_else(|| anyhow!("unknown opcode `{text}`"))
}

fn resolve_mode(text: &str) -> Result<u8> {
    Mode::code_from_name(text)
        .or_else(|| parse_code(text))
        .ok_or_else(|| anyhow!("unknown mode `{text}`"))
}

fn parse_operand<const L: usize>(text: &str, name: &str) -> Result<WideWord<L>> {
    let context = || format!("operand {name} `{text}`");
    text.parse().with_context(context)
}

fn evaluate<const L: usize>(args: &Args, opcode: u8, mode: u8) -> Result<Report> {
    let a = parse_operand::<L>(&args.a, "A")?;
    let b = parse_operand::<L>(&args.b, "B")?;
    let out = Alu::<L>::new().evaluate(&a, &b, opcode, mode, args.shift);
    Ok(Report {
        width: Alu::<L>::BITS,
        opcode,
        mode,
        result: out.result.to_hex(),
        flags: out.flags.bits(),
        flag_names: out.flags.names(),
        exception: out.exception,
    })
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let opcode = resolve_opcode(&args.op)?;
    let mode = resolve_mode(&args.mode)?;
    debug!("opcode {opcode:#04x} mode {mode:#04x} width {}", args.width);

    let report = match args.width {
        512 => evaluate::<8>(&args, opcode, mode)?,
        2048 => evaluate::<32>(&args, opcode, mode)?,
        other => bail!("unsupported width {other} (expected 512 or 2048)"),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
