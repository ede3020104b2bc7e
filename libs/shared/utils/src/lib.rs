// libs/shared/utils/src/lib.rs
pub mod geo;
pub mod test_utils;
