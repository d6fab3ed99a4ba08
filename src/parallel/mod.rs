pub mod monte_carlo;
pub mod pool;

pub use monte_carlo::{run_battles, run_battles_parallel, BattleSummary};
pub use pool::WorkerPool;
