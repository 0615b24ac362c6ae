use std::path::PathBuf;

use thiserror::Error;

use crate::domain::DirectiveError;

#[derive(Debug, Error)]
pub enum HudError {
    #[error("directive source not found: {}", .0.display())]
    SourceMissing(PathBuf),

    #[error("io error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Directive(#[from] DirectiveError),

    #[error("render failed: {0}")]
    Render(#[source] std::io::Error),
}

impl HudError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// 診断行用にメッセージを `max_chars` 文字で切り詰める（char 境界を守る）
pub fn truncate_diagnostic(message: &str, max_chars: usize) -> String {
    message.chars().take(max_chars).collect()
}
