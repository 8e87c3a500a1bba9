//! Test modules for history reading and restart-branch pruning

pub mod pruning_tests;
