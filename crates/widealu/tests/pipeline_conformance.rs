//! Pipeline latency, ordering and throughput conformance.

use proptest::prelude::*;
use widealu::conformance::{validate_trace, Criterion};
use widealu::mode::code;
use widealu::opcode::op;
use widealu::{Alu2048, Alu512, Pipeline, Request, Retired, Word2048, Word512};

fn request(i: u64) -> Request<8> {
    let operand = Word512::from_u64(i);
    Request::new(operand, operand, op::MUL, code::NORMAL)
}

#[test]
fn default_latency_trace_conforms() {
    let mut pipe = Pipeline::new(Alu512::new());
    let trace = pipe.run((0..64).map(request));
    let report = validate_trace(3, &trace);
    assert!(report.is_conformant(), "{report}");
    assert_eq!(report.retired, 64);
    for (i, r) in trace.iter().enumerate() {
        let i = i as u64;
        assert_eq!(r.outcome.result, Word512::from_u64(i * i));
    }
}

#[test]
fn checking_against_wrong_latency_fails() {
    let mut pipe = Pipeline::with_latency(Alu512::new(), 2);
    let trace = pipe.run((0..4).map(request));
    let report = validate_trace(3, &trace);
    assert_eq!(report.violations_of(Criterion::Latency).count(), 4);
}

#[test]
fn retirements_equal_direct_evaluation() {
    let alu = Alu2048::new();
    let mut pipe = Pipeline::with_latency(alu.clone(), 5);
    let requests: Vec<Request<32>> = (0..16u64)
        .map(|i| {
            Request::new(Word2048::MAX, Word2048::from_u64(i), op::SRA, code::NORMAL)
                .with_shift(i as u16 * 100)
        })
        .collect();
    let trace = pipe.run(requests.iter().copied());
    for (req, r) in requests.iter().zip(&trace) {
        let direct = alu.evaluate(&req.a, &req.b, req.opcode, req.mode, req.shift);
        assert_eq!(r.outcome, direct);
    }
}

#[test]
fn trace_serializes_to_json() {
    let mut pipe = Pipeline::with_latency(Alu512::new(), 1);
    let trace = pipe.run([request(3)]);
    let json = serde_json::to_string(&trace).unwrap();
    let back: Vec<Retired<8>> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, trace);
    assert!(json.contains("\"visible_at\":1"));
}

proptest! {
    /// Any admission pattern (requests and bubbles) with any latency keeps
    /// the contract.
    #[test]
    fn prop_any_admission_pattern_conforms(
        latency in 0usize..8,
        pattern in prop::collection::vec(any::<bool>(), 0..64),
    ) {
        let mut pipe = Pipeline::with_latency(Alu512::new(), latency);
        let mut trace = Vec::new();
        let mut admitted = 0u64;
        for (i, admit) in pattern.iter().enumerate() {
            let req = admit.then(|| request(i as u64));
            admitted += u64::from(*admit);
            trace.extend(pipe.cycle(req));
        }
        trace.extend(pipe.drain());
        prop_assert_eq!(trace.len() as u64, admitted);
        let report = validate_trace(latency, &trace);
        prop_assert!(report.is_conformant(), "{}", report);
    }
}
