pub mod frame_orchestrator;
pub mod frame_rate;
pub mod session;
pub mod session_config;
pub mod session_error;
pub mod session_logger;
