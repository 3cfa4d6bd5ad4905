pub mod display;
pub mod test_utils;
