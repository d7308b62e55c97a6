//! Integration tests for trellis.

mod util;

mod description_tests;
mod focus_tests;
mod layout_tests;
