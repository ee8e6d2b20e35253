//! Print the JSON schemas of the session wire messages.
//!
//! Run with: cargo run -p formcheck-models --example wire_schema

use formcheck_models::{ClientMessage, ServerMessage};
use schemars::schema_for;

fn main() {
    let client = schema_for!(ClientMessage);
    let server = schema_for!(ServerMessage);

    println!("=== ClientMessage ===");
    println!("{}", serde_json::to_string_pretty(&client).unwrap());
    println!();
    println!("=== ServerMessage ===");
    println!("{}", serde_json::to_string_pretty(&server).unwrap());
}
