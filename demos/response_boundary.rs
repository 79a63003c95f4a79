//! Normalizing a response body right before it is encoded as JSON.
//!
//! Run with: cargo run --example response_boundary

use serde::Serialize;
use serde_safenum::{to_json_string, to_json_string_with_options, NormalizeOptions};
use std::error::Error;

#[derive(Serialize)]
struct Transfer {
    id: u128,
    amount_minor: i64,
    memo: Option<String>,
}

#[derive(Serialize)]
struct Response {
    transfers: Vec<Transfer>,
    total: u64,
}

fn main() -> Result<(), Box<dyn Error>> {
    let body = Response {
        transfers: vec![
            Transfer {
                id: 42,
                amount_minor: 1_500,
                memo: Some("rent".to_string()),
            },
            Transfer {
                id: 9_007_199_254_740_993,
                amount_minor: -250,
                memo: None,
            },
        ],
        total: u64::MAX,
    };

    println!("Lossy (default):\n{}\n", to_json_string(&body)?);

    println!(
        "Stringify:\n{}\n",
        to_json_string_with_options(&body, &NormalizeOptions::stringify())?
    );

    match to_json_string_with_options(&body, &NormalizeOptions::strict()) {
        Ok(json) => println!("Strict:\n{}", json),
        Err(e) => println!("Strict refused: {}", e),
    }

    Ok(())
}
