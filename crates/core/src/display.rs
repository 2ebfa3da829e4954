use std::path::Path;

use tokio::process::Command;

use crate::error::{ReplaymapError, Result};

/// Platform command used to open files with the default viewer.
pub fn viewer_command() -> (&'static str, &'static [&'static str]) {
    if cfg!(target_os = "macos") {
        ("open", &[])
    } else if cfg!(target_os = "windows") {
        ("cmd", &["/C", "start", ""])
    } else {
        ("xdg-open", &[])
    }
}

/// Hand a saved image to the desktop viewer. The viewer is not awaited.
pub async fn show_image(path: &Path) -> Result<()> {
    let (program, args) = viewer_command();
    tracing::debug!(program, path = %path.display(), "opening viewer");

    Command::new(program)
        .args(args)
        .arg(path)
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn()
        .map_err(|e| ReplaymapError::DisplayFailed {
            path: path.to_path_buf(),
            reason: format!("{program}: {e}"),
        })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewer_matches_host_platform() {
        let (program, args) = viewer_command();
        if cfg!(target_os = "macos") {
            assert_eq!(program, "open");
            assert!(args.is_empty());
        } else if cfg!(target_os = "windows") {
            assert_eq!(program, "cmd");
            assert_eq!(args, &["/C", "start", ""]);
        } else {
            assert_eq!(program, "xdg-open");
            assert!(args.is_empty());
        }
    }

    #[tokio::test]
    async fn missing_viewer_is_a_display_error() {
        // Spawn failures surface as DisplayFailed; a present viewer may succeed.
        match show_image(Path::new("/nonexistent/replaymap.png")).await {
            Ok(()) => {}
            Err(e) => assert!(matches!(e, ReplaymapError::DisplayFailed { .. })),
        }
    }
}
