//! Clipboard backends for copying share links.
//!
//! Writing is the one asynchronous, fallible step in the engine. Every
//! write is bounded by a timeout and reported as a plain result; nothing
//! retries.

use std::process::Stdio;
use std::sync::Mutex;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::info;

use crate::error::ClipboardError;

/// Something a share link can be written to.
#[allow(async_fn_in_trait)]
pub trait Clipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Write with an upper bound on how long the backend may take.
pub async fn write_with_timeout<C: Clipboard + ?Sized>(
    clipboard: &C,
    text: &str,
    timeout: Duration,
) -> Result<(), ClipboardError> {
    match tokio::time::timeout(timeout, clipboard.write_text(text)).await {
        Ok(result) => result,
        Err(_) => Err(ClipboardError::Timeout(timeout)),
    }
}

/// In-process clipboard, for headless use and tests.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.lock().ok().and_then(|c| c.clone())
    }
}

impl Clipboard for MemoryClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut contents = self
            .contents
            .lock()
            .map_err(|e| ClipboardError::Rejected(e.to_string()))?;
        *contents = Some(text.to_string());
        Ok(())
    }
}

/// A platform clipboard tool that reads the text on stdin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardTool {
    pub program: String,
    pub args: Vec<String>,
}

impl ClipboardTool {
    fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// The system clipboard, reached through the platform's copy tool.
///
/// Priority:
/// 1. `pbcopy` on macOS, `clip` on Windows
/// 2. `wl-copy` when a Wayland session is active
/// 3. `xclip`, then `xsel`
#[derive(Debug, Clone)]
pub struct SystemClipboard {
    tool: Option<ClipboardTool>,
}

impl SystemClipboard {
    /// Detect the first copy tool available on `PATH`.
    pub fn detect() -> Self {
        let tool = candidate_tools()
            .into_iter()
            .find(|tool| on_path(&tool.program));
        match &tool {
            Some(tool) => info!("Using clipboard tool: {}", tool.program),
            None => info!("No clipboard tool found on PATH"),
        }
        Self { tool }
    }

    pub fn with_tool(tool: ClipboardTool) -> Self {
        Self { tool: Some(tool) }
    }

    pub fn tool(&self) -> Option<&ClipboardTool> {
        self.tool.as_ref()
    }
}

impl Clipboard for SystemClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let tool = self.tool.as_ref().ok_or(ClipboardError::Unavailable)?;

        let mut child = Command::new(&tool.program)
            .args(&tool.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes()).await?;
            stdin.shutdown().await?;
        }

        let status = child.wait().await?;
        if status.success() {
            Ok(())
        } else {
            Err(ClipboardError::ToolFailed {
                tool: tool.program.clone(),
                status: status.to_string(),
            })
        }
    }
}

fn candidate_tools() -> Vec<ClipboardTool> {
    if cfg!(target_os = "macos") {
        return vec![ClipboardTool::new("pbcopy", &[])];
    }
    if cfg!(target_os = "windows") {
        return vec![ClipboardTool::new("clip", &[])];
    }

    let mut tools = Vec::new();
    if std::env::var_os("WAYLAND_DISPLAY").is_some() {
        tools.push(ClipboardTool::new("wl-copy", &[]));
    }
    tools.push(ClipboardTool::new("xclip", &["-selection", "clipboard"]));
    tools.push(ClipboardTool::new("xsel", &["--clipboard", "--input"]));
    tools
}

fn on_path(program: &str) -> bool {
    which::which(program).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SlowClipboard;

    impl Clipboard for SlowClipboard {
        async fn write_text(&self, _text: &str) -> Result<(), ClipboardError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_memory_clipboard_stores_text() {
        let clipboard = MemoryClipboard::new();
        write_with_timeout(&clipboard, "https://shop.test/r?metal=Platinum", Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(
            clipboard.contents().as_deref(),
            Some("https://shop.test/r?metal=Platinum")
        );
    }

    #[tokio::test]
    async fn test_timeout_is_reported() {
        let err = write_with_timeout(&SlowClipboard, "x", Duration::from_millis(10))
            .await
            .unwrap_err();
        assert!(matches!(err, ClipboardError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_missing_tool_is_unavailable() {
        let clipboard = SystemClipboard { tool: None };
        let err = clipboard.write_text("x").await.unwrap_err();
        assert!(matches!(err, ClipboardError::Unavailable));
    }

    #[cfg(unix)]
    #[test]
    fn test_on_path_resolves_installed_tools() {
        assert!(on_path("sh"));
        assert!(!on_path("ringbuilder-no-such-clipboard-tool"));
    }

    #[test]
    fn test_detect_only_picks_tools_on_path() {
        if let Some(tool) = SystemClipboard::detect().tool() {
            assert!(on_path(&tool.program));
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_tool_exit_status_is_checked() {
        let ok = SystemClipboard::with_tool(ClipboardTool::new("cat", &[]));
        ok.write_text("hello").await.unwrap();

        let failing = SystemClipboard::with_tool(ClipboardTool::new("false", &[]));
        let err = failing.write_text("hello").await.unwrap_err();
        assert!(matches!(
            err,
            ClipboardError::ToolFailed { .. } | ClipboardError::Io(_)
        ));
    }
}
