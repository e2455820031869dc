use clap::ArgMatches;
use tracing::info;

use formsync_core::api::Answer;
use formsync_core::{FormApi, Mutation};

use super::helpers;

pub(crate) fn handle_respond_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let access_token = matches
        .get_one::<String>("access_token")
        .ok_or("Access token is required")?
        .clone();
    let form_id = *matches
        .get_one::<u64>("form_id")
        .ok_or("Form id is required")?;
    let app_id = matches
        .get_one::<String>("app-id")
        .ok_or("--app-id is required")?
        .clone();
    let answers: Vec<Answer> = matches
        .get_many::<Answer>("answer")
        .map(|answers| answers.cloned().collect())
        .unwrap_or_default();

    info!(
        event = "cli.respond_started",
        form_id = form_id,
        answers = answers.len(),
    );

    let config = helpers::load_config(matches)?;
    let api = helpers::build_api(&config)?;
    helpers::runtime()?
        .block_on(api.mutate(Mutation::SubmitResponse {
            access_token,
            app_id,
            form_id,
            answers,
        }))
        .map_err(|e| helpers::fail("respond", e))?;

    println!("✅ Answers to form {} submitted", form_id);
    info!(event = "cli.respond_completed", form_id = form_id);
    Ok(())
}
