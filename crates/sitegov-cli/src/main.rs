//! sitegov CLI: the `sitegov` command.

mod cli;
mod commands;
mod support;

use clap::Parser;
use cli::{Cli, Commands, SitemapCommands};

fn main() {
    let cli = Cli::parse();
    support::init_tracing(&cli.log_level);

    match cli.command {
        Commands::Classify { path, json } => commands::classify::run(&cli.config, path, json),

        Commands::Decide(args) => commands::decide::run(&cli.config, args),

        Commands::HubCanonical {
            city,
            industry,
            downstream,
            json,
        } => commands::hub_canonical::run(&cli.config, city, industry, downstream, json),

        Commands::Sitemap { command } => match command {
            SitemapCommands::Build { out, now, json } => {
                commands::sitemap_build::run(&cli.config, out, now, json)
            }
            SitemapCommands::Validate { now, json } => {
                commands::sitemap_validate::run(&cli.config, now, json)
            }
        },

        Commands::Audit {
            severity,
            kind,
            now,
            json,
        } => commands::audit::run(&cli.config, severity, kind, now, json),
    }
}
