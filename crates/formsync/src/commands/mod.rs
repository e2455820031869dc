use clap::ArgMatches;
use tracing::error;

use formsync_core::events;

pub mod helpers;

mod add_form;
mod cancel;
mod completions;
mod config;
mod create;
mod list;
mod respond;
mod show;
mod validate;
mod watch;

pub fn run_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    events::log_app_startup();

    match matches.subcommand() {
        Some(("list", sub_matches)) => list::handle_list_command(sub_matches),
        Some(("show", sub_matches)) => show::handle_show_command(sub_matches),
        Some(("watch", sub_matches)) => watch::handle_watch_command(sub_matches),
        Some(("validate", sub_matches)) => validate::handle_validate_command(sub_matches),
        Some(("cancel", sub_matches)) => cancel::handle_cancel_command(sub_matches),
        Some(("create", sub_matches)) => create::handle_create_command(sub_matches),
        Some(("add-form", sub_matches)) => add_form::handle_add_form_command(sub_matches),
        Some(("respond", sub_matches)) => respond::handle_respond_command(sub_matches),
        Some(("config", sub_matches)) => config::handle_config_command(sub_matches),
        Some(("completions", sub_matches)) => {
            completions::handle_completions_command(sub_matches)
        }
        _ => {
            error!(event = "cli.command_unknown");
            Err("Unknown command".into())
        }
    }
}
