#![allow(dead_code)]

use streamstore_macros::Partitioned;

#[derive(Partitioned)]
enum LedgerEvent {
    Open { #[key] account: u32 },
    Rename { #[key] account: String },
}

fn main() {}
