//! Operator fallback when the index cannot be reached.

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

/// Source of a manually supplied account id.
#[async_trait]
pub trait AccountPrompt: Send + Sync {
    /// Ask for the account controlled by `public_key`; `None` to skip.
    async fn ask_account_id(&self, public_key: &str) -> Option<String>;
}

/// Never answers. Used for unattended runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPrompt;

#[async_trait]
impl AccountPrompt for NoPrompt {
    async fn ask_account_id(&self, _public_key: &str) -> Option<String> {
        None
    }
}

/// Asks on stdout and reads one line from stdin. An empty line skips.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdinPrompt;

#[async_trait]
impl AccountPrompt for StdinPrompt {
    async fn ask_account_id(&self, public_key: &str) -> Option<String> {
        let mut stdout = tokio::io::stdout();
        let question = format!(
            "Account index unavailable. Account id for {} (empty to skip): ",
            public_key
        );
        stdout.write_all(question.as_bytes()).await.ok()?;
        stdout.flush().await.ok()?;

        let mut line = String::new();
        BufReader::new(tokio::io::stdin())
            .read_line(&mut line)
            .await
            .ok()?;
        let answer = line.trim();
        (!answer.is_empty()).then(|| answer.to_string())
    }
}
