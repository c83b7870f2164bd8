/// Unit tests of the public domain types
mod basic_tests;
