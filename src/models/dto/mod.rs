pub mod event;
pub mod request;
pub mod response;

pub use event::GenerationEvent;
