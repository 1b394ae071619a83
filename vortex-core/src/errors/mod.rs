mod payload;
mod protocol;
mod settings;
mod startup;

pub use payload::PayloadError;
pub use protocol::ProtocolError;
pub use settings::SettingsError;
pub use startup::StartupError;
