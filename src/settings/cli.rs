use super::Parser;

#[derive(Parser, Debug)]
pub struct Cli {
    /// Settings file to load instead of the profile default.
    #[arg(long)]
    pub settings: Option<String>,

    /// Bind address, overriding the one from settings.
    #[arg(long)]
    pub address: Option<String>,
}
