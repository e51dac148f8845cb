pub mod allocator;
pub mod lifecycle;
pub mod memory_store;
pub mod router;
pub mod store;

pub use allocator::{Clock, FixedClock, SystemClock, VersionAllocator};
pub use lifecycle::VersionService;
pub use memory_store::MemoryVersionStore;
pub use router::{TypeRouter, TypeRouterBuilder};
pub use store::{Mutation, VersionStore};
