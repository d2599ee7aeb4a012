//! The dashboard's panels.
//!
//! Each panel owns its mock records, the walk rules that move them, and the
//! presentation mappings for its categorical fields.

pub mod ai_center;
pub mod climate;
pub mod header;
pub mod immersive;
pub mod passengers;
pub mod security;
pub mod trains;
pub mod transport;

pub use ai_center::AiCenterPanel;
pub use climate::ClimatePanel;
pub use header::HeaderPanel;
pub use immersive::ImmersivePanel;
pub use passengers::PassengerPanel;
pub use security::SecurityPanel;
pub use trains::TrainPanel;
pub use transport::TransportPanel;
