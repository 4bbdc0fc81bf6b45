pub mod invocation;
pub mod process;
pub mod summarize;
