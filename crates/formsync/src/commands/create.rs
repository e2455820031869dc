use clap::ArgMatches;
use tracing::info;

use formsync_core::api::NewQuestion;
use formsync_core::{FormApi, NewContainer};

use super::helpers;

pub(crate) fn handle_create_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let container = new_container(matches)?;
    let json_output = matches.get_flag("json");

    info!(
        event = "cli.create_started",
        app_id = %container.app_id,
        questions = container.questions.len(),
    );

    let config = helpers::load_config(matches)?;
    let api = helpers::build_api(&config)?;
    let created = helpers::runtime()?
        .block_on(api.create_container(&container))
        .map_err(|e| helpers::fail("create", e))?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&created)?);
    } else {
        println!(
            "✅ Container {} created with form {}",
            created.container_id, created.form_id
        );
        println!("   Access token: {}", created.access_token);
    }

    info!(
        event = "cli.create_completed",
        container_id = created.container_id,
        form_id = created.form_id,
    );
    Ok(())
}

fn new_container(matches: &ArgMatches) -> Result<NewContainer, Box<dyn std::error::Error>> {
    let required = |name: &str| -> Result<String, Box<dyn std::error::Error>> {
        matches
            .get_one::<String>(name)
            .map(|v| v.trim().to_string())
            .ok_or_else(|| format!("--{} is required", name).into())
    };

    Ok(NewContainer {
        app_id: required("app-id")?,
        title: required("title")?,
        description: required("description")?,
        user_email: required("email")?,
        reference: matches
            .get_one::<String>("reference")
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty()),
        escalate: matches.get_flag("escalate"),
        campaign_id: matches.get_one::<u64>("campaign-id").copied(),
        questions: questions(matches),
    })
}

/// Questions given with `--question`, in command-line order.
pub(crate) fn questions(matches: &ArgMatches) -> Vec<NewQuestion> {
    matches
        .get_many::<NewQuestion>("question")
        .map(|qs| qs.cloned().collect())
        .unwrap_or_default()
}
