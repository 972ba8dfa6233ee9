//! Storage implementations for the data service

pub mod in_memory;

pub use in_memory::InMemoryDataService;
