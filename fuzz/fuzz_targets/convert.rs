//! Conversion fuzzer.
//!
//! Feeds arbitrary text through the converter. Besides never panicking, every
//! located statement must come back as a table or a skipped-statement issue,
//! and every rendered table must carry its provenance header.

use db2_snowflake_ddl::testing::check_conversion;
use honggfuzz::fuzz;

fn main() {
    loop {
        fuzz!(|input: String| {
            check_conversion(&input);
        });
    }
}
