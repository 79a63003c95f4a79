//! Building and inspecting Value trees by hand.
//!
//! Run with: cargo run --example dynamic_values

use serde_safenum::{normalize, value, BigInt, Value};

fn main() {
    let snapshot = value!({
        "service": "ledger",
        "shard": 3,
        "high_water_mark": 18_446_744_073_709_551_615_u128,
        "recent": [9_007_199_254_740_991_i128, 9_007_199_254_740_993_i128],
        "paused": false
    });

    println!("Input:      {}", snapshot);
    println!("Has bigint: {}\n", snapshot.contains_bigint());

    if let Some(Value::BigInt(mark)) = snapshot.get("high_water_mark") {
        println!("Exact mark: {}", mark);
    }

    let normalized = normalize(&snapshot);
    println!("Normalized: {}", normalized);

    if let Some(recent) = normalized.get("recent").and_then(Value::as_array) {
        for (i, id) in recent.iter().enumerate() {
            println!("  recent[{}] = {}", i, id);
        }
    }

    // The input is untouched
    assert_eq!(
        snapshot.get("high_water_mark"),
        Some(&Value::BigInt(BigInt::from(u64::MAX)))
    );
}
