pub mod chat;
pub mod recommend;
pub mod status;

/// Sampling temperature for every completion request the relay sends.
pub const SAMPLING_TEMPERATURE: f32 = 0.7;
