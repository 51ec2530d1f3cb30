pub mod channel_control_input;
pub mod stdin_control_input;
