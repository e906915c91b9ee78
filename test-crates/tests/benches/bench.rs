use criterion::BenchmarkId;
use criterion::Throughput;
use criterion::{criterion_group, criterion_main, Criterion};
use rand::prelude::*;
use test_common::ALICE;
use test_common::BOB;
use wes_abi_common::base64;
use wes_abi_common::draft::Draft;
use wes_abi_common::draft::IntentDraft;
use wes_abi_common::draft::OutputDraft;
use wes_abi_common::hash::compute_hash;
use wes_abi_common::json::find_json_field;
use wes_abi_common::receipt::find_json_end;
use wes_abi_guest::sys;
use wes_abi_guest::TransactionBuilder;

const SIZES: [usize; 4] = [16, 256, 4096, 65536];

fn random_bytes(n: usize) -> Vec<u8> {
    let mut rng = thread_rng();
    let mut bytes = vec![0; n];
    rng.fill_bytes(&mut bytes);
    bytes
}

/// encode and decode random payloads
pub fn base64_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("base64_codec");

    for n in SIZES {
        let bytes = random_bytes(n);
        let encoded = base64::encode(&bytes);
        group.throughput(Throughput::Bytes(n as _));
        group.bench_with_input(BenchmarkId::new("encode", n), &bytes, |b, bytes| {
            b.iter(|| base64::encode(bytes));
        });
        group.bench_with_input(BenchmarkId::new("decode", n), &encoded, |b, encoded| {
            b.iter(|| base64::decode(encoded).unwrap());
        });
    }

    group.finish();
}

/// stretch random payloads to 32 bytes
pub fn hash_stretch(c: &mut Criterion) {
    let mut group = c.benchmark_group("hash_stretch");

    for n in SIZES {
        let bytes = random_bytes(n);
        group.throughput(Throughput::Bytes(n as _));
        group.bench_with_input(BenchmarkId::new("compute_hash", n), &bytes, |b, bytes| {
            b.iter(|| compute_hash(bytes));
        });
    }

    group.finish();
}

/// scan for a field that sits behind `n` bytes of other content
pub fn json_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("json_scan");

    for n in SIZES {
        let json = format!(r#"{{"pad":"{}","amount":"12345"}}"#, "x".repeat(n));
        group.throughput(Throughput::Bytes(json.len() as _));
        group.bench_with_input(BenchmarkId::new("find_json_field", n), &json, |b, json| {
            b.iter(|| find_json_field(json, "amount"));
        });

        let mut receipt = json.clone().into_bytes();
        receipt.resize(receipt.len() + n, 0);
        group.bench_with_input(BenchmarkId::new("find_json_end", n), &receipt, |b, receipt| {
            b.iter(|| find_json_end(receipt));
        });
    }

    group.finish();
}

/// serialize drafts with a growing number of outputs and intents
pub fn draft_to_json(c: &mut Criterion) {
    let mut group = c.benchmark_group("draft_to_json");

    for n in [1, 10, 100] {
        let draft = Draft {
            outputs: (0..n)
                .map(|i| OutputDraft::Asset {
                    owner: BOB,
                    amount: i,
                    token_id: Some("gold".into()),
                })
                .collect(),
            intents: (0..n)
                .map(|i| IntentDraft::Transfer {
                    from: ALICE,
                    to: BOB,
                    amount: i,
                    token_id: None,
                })
                .collect(),
            ..Default::default()
        };
        group.bench_with_input(BenchmarkId::new("to_json", n), &draft, |b, draft| {
            b.iter(|| draft.to_json());
        });
    }

    group.finish();
}

/// full finalize round trip against the mock host
pub fn finalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("finalize");

    group.bench_function("finalize", |b| {
        b.iter(|| {
            sys::reset();
            TransactionBuilder::begin()
                .transfer(ALICE, BOB, 100, None)
                .finalize()
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    base64_codec,
    hash_stretch,
    json_scan,
    draft_to_json,
    finalize,
);

criterion_main!(benches);
