use clap::ArgMatches;
use serde_json::json;
use tracing::{info, warn};

use formsync_core::{ContainerDetail, FormApi, TimelineEntry};

use super::helpers;

pub(crate) fn handle_show_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let access_token = matches
        .get_one::<String>("access_token")
        .ok_or("Access token is required")?;
    let json_output = matches.get_flag("json");

    info!(event = "cli.show_started", access_token = access_token);

    let config = helpers::load_config(matches)?;
    let api = helpers::build_api(&config)?;
    let (detail, timeline) = helpers::runtime()?.block_on(async {
        let detail = api
            .fetch_detail(access_token)
            .await
            .map_err(|e| helpers::fail("show", e))?;
        // A missing timeline does not fail the command
        let timeline = api.fetch_timeline(detail.id).await.unwrap_or_else(|e| {
            warn!(event = "cli.timeline_load_failed", error = %e);
            Vec::new()
        });
        Ok::<_, Box<dyn std::error::Error>>((detail, timeline))
    })?;

    if json_output {
        let out = json!({ "container": detail, "timeline": timeline });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print!("{}", render_detail(&detail));
        print!("{}", render_timeline(&timeline));
    }

    info!(
        event = "cli.show_completed",
        forms = detail.forms.len(),
        timeline_entries = timeline.len(),
    );
    Ok(())
}

/// Plain-text rendering of one container, shared with `watch`.
pub(crate) fn render_detail(detail: &ContainerDetail) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} (#{})\n", detail.title, detail.id));
    if let Some(description) = &detail.description {
        out.push_str(&format!("  {}\n", description));
    }
    if let Some(email) = &detail.user_email {
        out.push_str(&format!("  Recipient: {}\n", email));
    }
    if let Some(reference) = &detail.reference {
        out.push_str(&format!("  Reference: {}\n", reference));
    }
    out.push_str(&format!(
        "  Validated: {}\n",
        if detail.validated { "yes" } else { "no" }
    ));

    for form in &detail.forms {
        out.push_str(&format!("\n  Form {} [{}]\n", form.form_id, form.status));
        if let Some(comment) = &form.cancel_comment {
            out.push_str(&format!("    Cancelled: {}\n", comment));
        }
        for question in &form.questions {
            let marker = if question.is_required { "*" } else { "" };
            out.push_str(&format!("    - {}{}\n", question.label, marker));
            if let Some(answer) = &question.response {
                out.push_str(&format!("      > {}\n", render_answer(answer)));
            }
        }
    }
    out
}

/// Plain-text rendering of a container's history, shared with `watch`.
pub(crate) fn render_timeline(entries: &[TimelineEntry]) -> String {
    if entries.is_empty() {
        return String::new();
    }

    let mut out = String::from("\n  Timeline\n");
    for entry in entries {
        let when = entry
            .timestamp
            .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".repeat(16));
        out.push_str(&format!(
            "    {}  {} (form {})\n",
            when, entry.event, entry.form_id
        ));
        if let Some(details) = entry.details.as_deref().filter(|d| !d.is_empty()) {
            out.push_str(&format!("                      {}\n", details));
        }
    }
    out
}

fn render_answer(answer: &serde_json::Value) -> String {
    match answer {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Array(items) => items
            .iter()
            .map(render_answer)
            .collect::<Vec<_>>()
            .join(", "),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formsync_core::FormStatus;
    use formsync_core::snapshots::{FormDetail, Question};

    #[test]
    fn test_render_detail() {
        let detail = ContainerDetail {
            id: 7,
            access_token: "tok123".to_string(),
            title: "Laptop request".to_string(),
            description: None,
            user_email: Some("someone@example.com".to_string()),
            reference: None,
            validated: false,
            created_at: None,
            updated_at: None,
            forms: vec![FormDetail {
                form_id: 1,
                status: FormStatus::Answered,
                cancel_comment: None,
                questions: vec![Question {
                    label: "Which model?".to_string(),
                    kind: "checkbox".to_string(),
                    options: vec!["13\"".to_string(), "15\"".to_string()],
                    is_required: true,
                    response: Some(serde_json::json!(["13\"", "15\""])),
                }],
            }],
        };

        let text = render_detail(&detail);
        assert!(text.starts_with("Laptop request (#7)\n"));
        assert!(text.contains("Recipient: someone@example.com"));
        assert!(text.contains("Validated: no"));
        assert!(text.contains("Form 1 [answered]"));
        assert!(text.contains("- Which model?*"));
        assert!(text.contains("> 13\", 15\""));
    }

    #[test]
    fn test_render_timeline() {
        assert_eq!(render_timeline(&[]), "");

        let entries: Vec<TimelineEntry> = serde_json::from_value(json!([
            {
                "form_container_id": 7,
                "form_id": 1,
                "event": "FormContainer created",
                "details": "created by jdoe",
                "timestamp": "2024-03-01T09:30:00"
            },
            {"form_container_id": 7, "form_id": 1, "event": "Reminder sent"}
        ]))
        .unwrap();

        let text = render_timeline(&entries);
        assert!(text.contains("Timeline"));
        assert!(text.contains("2024-03-01 09:30  FormContainer created (form 1)"));
        assert!(text.contains("created by jdoe"));
        assert!(text.contains("----------------  Reminder sent (form 1)"));
    }
}
