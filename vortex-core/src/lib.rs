pub mod constants;
pub mod errors;
pub mod frame_slot;
pub mod framing;
pub mod point;
pub mod rasterizer;
pub mod settings;
pub mod shared_frame;

pub use frame_slot::FrameSlot;
pub use rasterizer::Rasterizer;
pub use settings::Settings;
pub use shared_frame::SharedFrame;
