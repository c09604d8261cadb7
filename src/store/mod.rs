pub mod memory;

pub use memory::PortfolioStore;
