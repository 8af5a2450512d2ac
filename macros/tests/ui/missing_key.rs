#![allow(dead_code)]

use streamstore_macros::Partitioned;

#[derive(Partitioned)]
enum LedgerEvent {
    Open { #[key] account: u32 },
    Deposit { account: u32, amount: u64 },
}

fn main() {}
