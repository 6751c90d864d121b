//! Criterion benchmarks for the per-event hot path of the core tables.
//!
//! Every drained libinput event goes through at least one of these lookups
//! (fixed-point truncation, button/key mapping, touch-id lookup), so they
//! must stay in the nanosecond range.
//!
//! Run with:
//! ```bash
//! cargo bench --package xlibinput-core --bench translate_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use xlibinput_core::codes::{button_ordinal, x_keycode, BTN_LEFT, BTN_MIDDLE, BTN_RIGHT, BTN_SIDE};
use xlibinput_core::touch::TOUCH_MAX_SLOTS;
use xlibinput_core::{Fixed, TouchSlotTable};

/// Raw 24.8 values covering positive, negative and sub-unit deltas.
const BENCH_FIXED_RAW: &[i32] = &[0, 1, 255, 256, 384, -384, -1, 65_535 * 256, i32::MIN];

const BENCH_BUTTONS: &[u32] = &[BTN_LEFT, BTN_MIDDLE, BTN_RIGHT, BTN_SIDE, 0];

fn bench_fixed_conversions(c: &mut Criterion) {
    c.bench_function("fixed_to_int", |b| {
        b.iter(|| {
            for &raw in BENCH_FIXED_RAW {
                black_box(Fixed::from_raw(black_box(raw)).to_int());
            }
        })
    });

    c.bench_function("fixed_to_f64", |b| {
        b.iter(|| {
            for &raw in BENCH_FIXED_RAW {
                black_box(Fixed::from_raw(black_box(raw)).to_f64());
            }
        })
    });
}

fn bench_code_tables(c: &mut Criterion) {
    c.bench_function("button_ordinal", |b| {
        b.iter(|| {
            for &code in BENCH_BUTTONS {
                black_box(button_ordinal(black_box(code)));
            }
        })
    });

    c.bench_function("x_keycode", |b| {
        b.iter(|| {
            for code in 0..256u32 {
                black_box(x_keycode(black_box(code)));
            }
        })
    });
}

fn bench_touch_table(c: &mut Criterion) {
    c.bench_function("touch_begin_lookup_all_slots", |b| {
        let mut table = TouchSlotTable::new();
        b.iter(|| {
            for slot in 0..TOUCH_MAX_SLOTS as u32 {
                black_box(table.begin(black_box(slot)));
                black_box(table.lookup(black_box(slot)));
            }
        })
    });
}

criterion_group!(benches, bench_fixed_conversions, bench_code_tables, bench_touch_table);
criterion_main!(benches);
