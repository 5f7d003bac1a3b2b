//! `cutoff` subcommand: query the chi-square critical-value table.

use noisegauge_core::chi_square_cutoff;

pub fn run(df: usize) {
    println!("{:.3}", chi_square_cutoff(df));
}
