pub mod llm_executor;

pub use llm_executor::LlmExecutor;
