//! Hand-written inputs replayed through the checks the fuzz targets run.
#![cfg(feature = "testing")]

use db2_snowflake_ddl::model::{SizeUnit, TypeDescriptor};
use db2_snowflake_ddl::testing::{check_conversion, check_type_mapping};

#[test]
fn test_conversion_checks_hold_on_awkward_inputs() {
    for input in [
        "",
        ";;;",
        "CREATE TABLE",
        "CREATE TABLE T",
        "CREATE TABLE T (",
        "CREATE TABLE T ())",
        "CREATE TABLE T (A INT) IN",
        "CREATE TABLE T (A INT, PRIMARY KEY (A), PRIMARY KEY (A));",
        "CREATE TABLE T (A INT PRIMARY KEY PRIMARY KEY);",
        "CREATE TABLE T (A DECIMAL(99999999999999999999));",
        "CREATE TABLE T (A VARCHAR(10) WITH DEFAULT 'unterminated);",
        "CREATE TABLE T (A INT /* open comment",
        "create table \"T\" (\"A\" int, \"a\" int, A INT);",
        "CREATE TABLE T (A INT); CREATE TABLE T (A INT);",
        "CREATE TABLE ü.ß (Ä VARCHAR(1) WITH DEFAULT 'é');",
    ] {
        check_conversion(input);
    }
}

#[test]
fn test_type_mapping_checks_hold_on_builtin_types() {
    for ty in [
        TypeDescriptor::new("CLOB").with_precision(2).with_unit(SizeUnit::G),
        TypeDescriptor::new("DECIMAL").with_precision(31).with_scale(0),
        TypeDescriptor::new("CHAR").with_precision(8).with_bit_data(),
        TypeDescriptor::new("LONG VARGRAPHIC"),
        TypeDescriptor::new("TIMESTAMP WITH TIME ZONE").with_precision(12),
        TypeDescriptor::new("DECFLOAT").with_precision(16),
        TypeDescriptor::new("GEOMETRY"),
        TypeDescriptor::new("xml"),
    ] {
        check_type_mapping(&ty);
    }
}
