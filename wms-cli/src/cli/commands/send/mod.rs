//! `send` command: convert a sheet and submit it for bulk import

mod handler;

use clap::Args;

use super::SheetArgs;

pub use handler::handle_send_command;

#[derive(Debug, Clone, Args)]
pub struct SendArgs {
    #[command(flatten)]
    pub sheet: SheetArgs,

    /// Print the request body instead of sending it
    #[arg(long)]
    pub dry: bool,

    /// Override the configured API base URL
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    /// Do not retry failed requests
    #[arg(long)]
    pub no_retry: bool,
}
