#![allow(dead_code)]

use streamstore_macros::Partitioned;

#[derive(Partitioned)]
enum LedgerEvent {
    Open { #[key] account: u32 },
    Transfer { #[key] from: u32, #[key] to: u32 },
}

fn main() {}
