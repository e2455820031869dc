//! Command-line notation for questions and answers.
//!
//! A question is `LABEL[:KIND[:OPT1|OPT2|...]]`. A leading `~` on the label
//! makes it optional; `KIND` defaults to `text`. An answer is
//! `QUESTION_ID=VALUE`, where `|` splits a multi-choice value.

use formsync_core::api::{Answer, NewQuestion};

const CHOICE_KINDS: [&str; 3] = ["radioButton", "checkbox", "dropdown"];

pub fn parse_question(spec: &str) -> Result<NewQuestion, String> {
    let mut parts = spec.splitn(3, ':');
    let raw_label = parts.next().unwrap_or_default().trim();
    let kind = parts.next().map(str::trim).unwrap_or("text");
    let options: Vec<String> = parts
        .next()
        .map(|opts| {
            opts.split('|')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let (label, is_required) = match raw_label.strip_prefix('~') {
        Some(label) => (label.trim(), false),
        None => (raw_label, true),
    };
    if label.is_empty() {
        return Err(format!("question '{}' has no label", spec));
    }

    match kind {
        "text" if !options.is_empty() => {
            return Err(format!("text question '{}' cannot have options", label));
        }
        "text" => {}
        k if CHOICE_KINDS.contains(&k) => {
            if options.is_empty() {
                return Err(format!("{} question '{}' needs options", k, label));
            }
        }
        other => {
            return Err(format!(
                "unknown question kind '{}' (expected text, {})",
                other,
                CHOICE_KINDS.join(", ")
            ));
        }
    }

    Ok(NewQuestion {
        label: label.to_string(),
        kind: kind.to_string(),
        options,
        is_required,
    })
}

pub fn parse_answer(spec: &str) -> Result<Answer, String> {
    let (id, value) = spec
        .split_once('=')
        .ok_or_else(|| format!("answer '{}' is not QUESTION_ID=VALUE", spec))?;
    let question_id = id
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a question id", id.trim()))?;

    let response = if value.contains('|') {
        serde_json::Value::from(
            value
                .split('|')
                .map(|v| v.trim().to_string())
                .collect::<Vec<_>>(),
        )
    } else {
        serde_json::Value::from(value.trim())
    };

    Ok(Answer {
        question_id,
        response,
    })
}
