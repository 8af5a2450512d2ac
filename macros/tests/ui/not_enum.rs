#![allow(dead_code)]

use streamstore_macros::Partitioned;

#[derive(Partitioned)]
struct Account { id: u32 }

fn main() {}
