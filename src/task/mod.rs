pub mod ids;
pub mod manager;
pub mod scheduler;
pub mod suggestions;
pub mod templates;
pub mod types;


pub use ids::*;
pub use manager::*;
pub use scheduler::*;
pub use suggestions::*;
pub use templates::*;
pub use types::*;
