mod domain_decomposer;

pub use domain_decomposer::*;

#[cfg(test)]
mod domain_decomposer_tests;
