//! Type mapping fuzzer.
//!
//! Generates arbitrary type descriptors and checks that mapping is idempotent
//! and that `FOR BIT DATA` never survives a mapping.

use db2_snowflake_ddl::model::TypeDescriptor;
use db2_snowflake_ddl::testing::check_type_mapping;
use honggfuzz::fuzz;

fn main() {
    loop {
        fuzz!(|ty: TypeDescriptor| {
            check_type_mapping(&ty);
        });
    }
}
