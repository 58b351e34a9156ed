//! CLI command implementations

pub mod campaign_total;
pub mod error;
pub mod serve;

pub use campaign_total::CampaignTotalArgs;
pub use error::CliError;
pub use serve::{Cli, Commands, ServeArgs};
