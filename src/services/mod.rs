// pwgen-client services
// Services implement the client pipeline: persistence, generation, reveal, clipboard.

pub mod clipboard_transfer;
pub mod display;
pub mod generation_client;
pub mod reveal_animator;
pub mod settings_store;
