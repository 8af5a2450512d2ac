#![allow(dead_code)]

use streamstore_macros::Partitioned;

#[derive(Partitioned)]
enum Nothing {}

fn main() {}
