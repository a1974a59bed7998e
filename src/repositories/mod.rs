//! Repositorios del backend de referencia

pub mod memory_repository;

pub use memory_repository::MemoryRepository;
