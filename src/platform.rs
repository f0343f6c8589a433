//! OS-specific commands for opening a PDF at a given page.
//!
//! Composing a "jump to page N" command differs per operating system, and
//! Windows and macOS need the helper scripts shipped alongside the tool
//! (`pass_url2edge.bat`, `openPage.scpt`). The platform is detected once
//! at startup and each variant carries its own formatter.

use std::path::Path;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

/// Characters escaped when embedding a filesystem path in a file:// URL.
const PATH_ESCAPES: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'#')
    .add(b'?');

/// The operating systems the tool can generate open-at-page commands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Linux,
    MacOs,
    Windows,
    Unknown,
}

impl Platform {
    /// Detect the platform the tool is running on.
    pub fn detect() -> Self {
        match std::env::consts::OS {
            "linux" => Self::Linux,
            "macos" => Self::MacOs,
            "windows" => Self::Windows,
            _ => Self::Unknown,
        }
    }

    /// Compose a copy-paste command that opens `path` at `page`.
    ///
    /// Returns `None` on unrecognized platforms.
    pub fn open_command(&self, path: &Path, page: u32) -> Option<String> {
        match self {
            Self::Linux => {
                Some(format!("firefox {}#page={page}", path.display()))
            }
            Self::MacOs => Some(format!(
                "osascript openPage.scpt {} {page}",
                path.display()
            )),
            Self::Windows => {
                Some(format!("start pass_url2edge.bat {}", file_url(path, page)))
            }
            Self::Unknown => None,
        }
    }
}

/// Build a `file:///` URL with forward slashes and a `#page=` fragment.
fn file_url(path: &Path, page: u32) -> String {
    let forward = path.to_string_lossy().replace('\\', "/");
    let escaped = utf8_percent_encode(&forward, PATH_ESCAPES);
    format!("file:///{escaped}#page={page}")
}
