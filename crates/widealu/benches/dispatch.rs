//! Dispatcher benchmarks.
//!
//! Full `evaluate` calls (decode, kernel, divide rule, flag derivation) at
//! both unit widths, plus pipeline throughput.
//!
//! ```bash
//! cargo bench -p widealu --bench dispatch
//! ```

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use widealu::mode::code;
use widealu::opcode::op;
use widealu::{Alu, Alu512, Pipeline, Request, WideWord};

/// Deterministic operand: limb i = (i + seed) * golden-ratio constant.
fn operand<const L: usize>(seed: u64) -> WideWord<L> {
    let mut limbs = [0u64; L];
    for (i, limb) in limbs.iter_mut().enumerate() {
        *limb = (i as u64 + seed).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    }
    WideWord::from_limbs(limbs)
}

const CASES: [(&str, u8, u8); 10] = [
    ("add", op::ADD, code::NORMAL),
    ("mul", op::MUL, code::NORMAL),
    ("div", op::DIV, code::NORMAL),
    ("xor", op::XOR, code::NORMAL),
    ("rol", op::ROL, code::NORMAL),
    ("popcnt", op::POPCNT, code::NORMAL),
    ("sat_mul", op::MUL, code::SATURATE),
    ("bcd_add", op::ADD, code::BCD),
    ("simd8_add", op::VADD, code::SIMD8),
    ("dot", op::DOT, code::VECTOR),
];

fn bench_width<const L: usize>(c: &mut Criterion, group: &str) {
    let alu = Alu::<L>::new();
    let a = operand::<L>(1);
    let b = operand::<L>(7);
    let mut g = c.benchmark_group(group);
    g.throughput(Throughput::Bytes(u64::from(WideWord::<L>::BITS / 8)));
    for (name, opcode, mode) in CASES {
        g.bench_function(name, |bench| {
            bench.iter(|| alu.evaluate(black_box(&a), black_box(&b), opcode, mode, 13))
        });
    }
    g.finish();
}

fn bench_evaluate_512(c: &mut Criterion) {
    bench_width::<8>(c, "evaluate/512");
}

fn bench_evaluate_2048(c: &mut Criterion) {
    bench_width::<32>(c, "evaluate/2048");
}

fn bench_pipeline(c: &mut Criterion) {
    let requests: Vec<Request<8>> = (0..256)
        .map(|i| Request::new(operand(i), operand(i + 1), op::ADD, code::NORMAL))
        .collect();
    let mut g = c.benchmark_group("pipeline/512");
    g.throughput(Throughput::Elements(requests.len() as u64));
    g.bench_function("run_256", |bench| {
        bench.iter(|| {
            let mut pipe = Pipeline::new(Alu512::new());
            black_box(pipe.run(requests.iter().copied()))
        })
    });
    g.finish();
}

criterion_group!(
    benches,
    bench_evaluate_512,
    bench_evaluate_2048,
    bench_pipeline,
);
criterion_main!(benches);
