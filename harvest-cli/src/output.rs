//! Output writers: flat records JSON, sessions JSON, and one markdown
//! document per session. All writers overwrite existing files and are
//! deterministic for a given recovery result.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use harvest_core::{ChatSession, ChatTurn, HarvestConfig};
use harvest_engine::RecoveryResult;

pub fn write_outputs(out_dir: &Path, config: &HarvestConfig, result: &RecoveryResult) -> Result<()> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;

    write_records_json(&out_dir.join(&config.output.records_json), &result.records)?;
    write_sessions_json(&out_dir.join(&config.output.sessions_json), &result.sessions)?;
    write_session_markdown(&out_dir.join(&config.output.markdown_dir), &result.sessions)?;

    Ok(())
}

fn write_records_json(path: &Path, records: &[ChatTurn]) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    tracing::info!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

fn write_sessions_json(path: &Path, sessions: &[ChatSession]) -> Result<()> {
    let json = serde_json::to_string_pretty(sessions)?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    tracing::info!("Wrote {} sessions to {}", sessions.len(), path.display());
    Ok(())
}

fn write_session_markdown(dir: &Path, sessions: &[ChatSession]) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("creating session directory {}", dir.display()))?;

    for (index, session) in sessions.iter().enumerate() {
        let path = dir.join(format!("{}.md", session.session_id));
        let doc = render_session_markdown(session, index + 1);
        fs::write(&path, doc).with_context(|| format!("writing {}", path.display()))?;
    }
    tracing::info!("Wrote {} session documents to {}", sessions.len(), dir.display());
    Ok(())
}

/// One human-readable document per session: a header with the session
/// ordinal, start date and message count, then per message a timestamped
/// heading, the prompt as a quote block (internal line breaks kept), and
/// the rendered response when present. Messages are separated by a rule.
fn render_session_markdown(session: &ChatSession, ordinal: usize) -> String {
    let mut doc = format!(
        "# Session {} - {} ({} messages)\n\n",
        ordinal,
        session.start_time.format("%Y-%m-%d"),
        session.message_count
    );

    for (index, message) in session.messages.iter().enumerate() {
        if index > 0 {
            doc.push_str("---\n\n");
        }
        doc.push_str(&format!(
            "### [{}]\n\n",
            message.timestamp.format("%Y-%m-%d %H:%M")
        ));
        for line in message.prompt.lines() {
            doc.push_str("> ");
            doc.push_str(line);
            doc.push('\n');
        }
        doc.push('\n');
        if let Some(response) = &message.response {
            doc.push_str(response);
            doc.push_str("\n\n");
        }
    }
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use harvest_engine::{RecoveryReport, RecoveryResult};

    fn turn(epoch_secs: i64, prompt: &str, response: Option<&str>) -> ChatTurn {
        ChatTurn {
            timestamp: DateTime::from_timestamp(epoch_secs, 0).unwrap().naive_utc(),
            prompt: prompt.to_string(),
            response: response.map(str::to_string),
            trace_ids: vec![],
            source_entry: 0,
            session_hint: None,
        }
    }

    fn session(messages: Vec<ChatTurn>) -> ChatSession {
        ChatSession {
            session_id: "session-001".to_string(),
            start_time: messages[0].timestamp,
            message_count: messages.len(),
            messages,
        }
    }

    #[test]
    fn test_markdown_layout() {
        let s = session(vec![
            turn(1_700_000_000, "first question\nwith a second line", None),
            turn(1_700_000_300, "second question", Some("the **answer**")),
        ]);

        let doc = render_session_markdown(&s, 1);

        assert!(doc.starts_with("# Session 1 - 2023-11-14 (2 messages)\n"));
        assert!(doc.contains("### [2023-11-14 22:13]\n"));
        // Internal line breaks survive as separate quote lines
        assert!(doc.contains("> first question\n> with a second line\n"));
        assert!(doc.contains("the **answer**\n"));
        // One rule between the two messages
        assert_eq!(doc.matches("---\n").count(), 1);
    }

    #[test]
    fn test_write_outputs_creates_all_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let config = HarvestConfig::default();
        let records = vec![turn(1_700_000_000, "q", None)];
        let sessions = vec![session(records.clone())];
        let result = RecoveryResult {
            records,
            sessions,
            report: RecoveryReport::default(),
        };

        write_outputs(dir.path(), &config, &result).unwrap();

        let records_path = dir.path().join(&config.output.records_json);
        let sessions_path = dir.path().join(&config.output.sessions_json);
        let markdown_path = dir
            .path()
            .join(&config.output.markdown_dir)
            .join("session-001.md");
        assert!(records_path.exists());
        assert!(sessions_path.exists());
        assert!(markdown_path.exists());

        // The dumps parse back and carry the contract field names.
        let records: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&records_path).unwrap()).unwrap();
        assert_eq!(records[0]["date"], "2023-11-14T22:13:20");
        assert_eq!(records[0]["prompt"], "q");

        let sessions: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&sessions_path).unwrap()).unwrap();
        assert_eq!(sessions[0]["session_id"], "session-001");
        assert_eq!(sessions[0]["message_count"], 1);
        assert!(sessions[0]["messages"].is_array());
    }

    #[test]
    fn test_rewrites_are_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let config = HarvestConfig::default();
        let records = vec![turn(1_700_000_000, "q", Some("a"))];
        let sessions = vec![session(records.clone())];
        let result = RecoveryResult {
            records,
            sessions,
            report: RecoveryReport::default(),
        };

        write_outputs(dir.path(), &config, &result).unwrap();
        let first = fs::read(dir.path().join(&config.output.records_json)).unwrap();
        write_outputs(dir.path(), &config, &result).unwrap();
        let second = fs::read(dir.path().join(&config.output.records_json)).unwrap();
        assert_eq!(first, second);
    }
}
