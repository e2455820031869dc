use clap::ArgMatches;
use tracing::{error, info};

use formsync_core::{FormApi, Mutation};

use super::helpers;

/// The server refuses shorter cancellation comments.
const MIN_COMMENT_CHARS: usize = 4;

pub(crate) fn handle_cancel_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let container_id = *matches
        .get_one::<u64>("container_id")
        .ok_or("Container id is required")?;
    let form_id = *matches
        .get_one::<u64>("form_id")
        .ok_or("Form id is required")?;
    let comment = matches
        .get_one::<String>("comment")
        .ok_or("Comment is required")?
        .trim()
        .to_string();

    if comment.chars().count() < MIN_COMMENT_CHARS {
        eprintln!(
            "❌ Cancellation comment must be at least {} characters",
            MIN_COMMENT_CHARS
        );
        error!(event = "cli.cancel_rejected", reason = "comment_too_short");
        return Err("Cancellation comment too short".into());
    }

    info!(event = "cli.cancel_started", container_id = container_id, form_id = form_id);

    let config = helpers::load_config(matches)?;
    let api = helpers::build_api(&config)?;
    helpers::runtime()?
        .block_on(api.mutate(Mutation::Cancel {
            container_id,
            form_id,
            comment,
        }))
        .map_err(|e| helpers::fail("cancel", e))?;

    println!("✅ Form {} of container {} cancelled", form_id, container_id);
    info!(event = "cli.cancel_completed", container_id = container_id, form_id = form_id);
    Ok(())
}
