pub mod cascade_tests;
