#![allow(dead_code)]

use chrono::{DateTime, Utc};
use claude_usage_meter::timestamp_parser::TimestampParser;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A throwaway `~/.claude` tree
pub struct ClaudeHome {
    dir: TempDir,
}

impl ClaudeHome {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("projects")).unwrap();
        Self { dir }
    }

    /// A home without a `projects` directory
    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn projects_dir(&self) -> PathBuf {
        self.dir.path().join("projects")
    }

    pub fn write_shard(&self, project: &str, name: &str, lines: &[String]) -> PathBuf {
        let project_dir = self.projects_dir().join(project);
        fs::create_dir_all(&project_dir).unwrap();
        let path = project_dir.join(name);
        let mut content = lines.join("\n");
        content.push('\n');
        fs::write(&path, content).unwrap();
        path
    }

    pub fn write_credentials(&self, tier: &str, token: &str) {
        fs::write(
            self.dir.path().join(".credentials.json"),
            format!(
                r#"{{"claudeAiOauth":{{"accessToken":"{}","rateLimitTier":"{}"}}}}"#,
                token, tier
            ),
        )
        .unwrap();
    }

    pub fn write_overrides(&self, json: &str) {
        fs::write(self.dir.path().join("usage-meter-config.json"), json).unwrap();
    }
}

/// One assistant journal record
pub fn assistant_line(
    model: &str,
    timestamp: DateTime<Utc>,
    input: u64,
    output: u64,
    cache_read: u64,
    cache_create: u64,
) -> String {
    format!(
        r#"{{"type":"assistant","timestamp":"{}","message":{{"model":"{}","usage":{{"input_tokens":{},"output_tokens":{},"cache_read_input_tokens":{},"cache_creation_input_tokens":{}}}}}}}"#,
        TimestampParser::format(&timestamp),
        model,
        input,
        output,
        cache_read,
        cache_create
    )
}

pub fn user_line(timestamp: DateTime<Utc>) -> String {
    format!(
        r#"{{"type":"user","timestamp":"{}","message":{{"role":"user","content":"hello"}}}}"#,
        TimestampParser::format(&timestamp)
    )
}

/// Drop sub-second precision so a timestamp compares equal after a trip through a journal
pub fn whole_seconds(timestamp: DateTime<Utc>) -> DateTime<Utc> {
    TimestampParser::parse(&TimestampParser::format(&timestamp)).unwrap()
}
