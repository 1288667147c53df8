//! Persisting programs that compiled.
//!
//! Files are named `{pid}_{token}.c` where `token` is the first eight hex
//! digits of a v4 UUID. Files are opened with `create_new`, so a token
//! collision draws a new token instead of overwriting an earlier save.

use std::io;
use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;

/// Default directory for saved programs.
pub const DEFAULT_OUTPUT_DIR: &str = "successful_codes";

const TOKEN_LEN: usize = 8;
const SAVE_ATTEMPTS_MAX: u32 = 16;

/// Directory receiving successful programs.
#[derive(Debug, Clone)]
pub struct OutputDir {
    path: PathBuf,
    pid: u32,
}

impl OutputDir {
    /// Create the directory (and parents) if needed.
    pub fn create(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        std::fs::create_dir_all(&path)?;
        Ok(Self {
            path,
            pid: std::process::id(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `source` to a fresh uniquely named file and return its path.
    pub async fn save(&self, source: &str) -> io::Result<PathBuf> {
        for _ in 0..SAVE_ATTEMPTS_MAX {
            let path = self.path.join(file_name(self.pid, &unique_token()));

            let mut file = match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    tracing::debug!(path = %path.display(), "output name taken, drawing another");
                    continue;
                }
                Err(e) => return Err(e),
            };

            file.write_all(source.as_bytes()).await?;
            file.flush().await?;
            return Ok(path);
        }

        Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!(
                "no free file name in {} after {} attempts",
                self.path.display(),
                SAVE_ATTEMPTS_MAX
            ),
        ))
    }
}

fn file_name(pid: u32, token: &str) -> String {
    format!("{}_{}.c", pid, token)
}

fn unique_token() -> String {
    let mut token = uuid::Uuid::new_v4().simple().to_string();
    token.truncate(TOKEN_LEN);
    token
}
