//! Single-stream executable downloader.
//!
//! Streams the response body of one GET straight into the destination file
//! (no temp file, no rename) in chunks of at most [`CHUNK_SIZE`] bytes,
//! reporting integer percentages when the server declares a length.
//! A failure partway leaves a truncated file behind; nothing is cleaned up.

mod progress;

pub use progress::ProgressTracker;

use crate::config::LauncherConfig;
use crate::error::LaunchError;
use crate::http::{self, ResponseHeaders};
use std::cell::RefCell;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// Receive buffer size handed to libcurl; the write callback never sees more per call.
pub const CHUNK_SIZE: usize = 8192;

/// Downloads the configured executable URL.
#[derive(Debug, Clone)]
pub struct Downloader {
    url: String,
    user_agent: String,
}

impl Downloader {
    pub fn new(cfg: &LauncherConfig) -> Self {
        Self {
            url: cfg.download_url.clone(),
            user_agent: cfg.user_agent.clone(),
        }
    }

    /// GET the download URL and write the body to `destination`, truncating it.
    /// `on_progress` receives deduplicated percentages; it is never called when
    /// the response has no `Content-Length`. Returns the number of bytes written.
    pub fn download(
        &self,
        destination: &Path,
        on_progress: Option<&mut dyn FnMut(u32)>,
    ) -> Result<u64, LaunchError> {
        let sink = RefCell::new(Sink::new(&self.url, destination, on_progress));

        let mut easy = http::get_handle(&self.url, &self.user_agent)?;
        easy.buffer_size(CHUNK_SIZE)
            .map_err(|e| LaunchError::transport("set buffer size", e))?;

        let performed = {
            let mut transfer = easy.transfer();
            transfer
                .header_function(|data| {
                    sink.borrow_mut().headers.push_line(data);
                    true
                })
                .map_err(|e| LaunchError::transport("install header handler", e))?;
            transfer
                .write_function(|data| {
                    if sink.borrow_mut().write_chunk(data) {
                        Ok(data.len())
                    } else {
                        Ok(0) // abort transfer
                    }
                })
                .map_err(|e| LaunchError::transport("install body handler", e))?;
            transfer.perform()
        };

        let mut sink = sink.into_inner();
        if let Some(err) = sink.aborted.take() {
            return Err(err);
        }
        performed.map_err(|e| LaunchError::transport(format!("GET {} failed", self.url), e))?;

        let code = easy
            .response_code()
            .map_err(|e| LaunchError::transport("no response code", e))?;
        if !http::is_success(code) {
            return Err(LaunchError::HttpStatus {
                url: self.url.clone(),
                code,
            });
        }

        sink.finish()
    }
}

/// Per-transfer state shared by the header and body callbacks.
struct Sink<'a, 'p> {
    url: &'a str,
    destination: &'a Path,
    file: Option<File>,
    headers: ResponseHeaders,
    tracker: ProgressTracker,
    on_progress: Option<&'p mut dyn FnMut(u32)>,
    /// Set when the body callback refuses a chunk; takes precedence over curl's write error.
    aborted: Option<LaunchError>,
}

impl<'a, 'p> Sink<'a, 'p> {
    fn new(
        url: &'a str,
        destination: &'a Path,
        on_progress: Option<&'p mut dyn FnMut(u32)>,
    ) -> Self {
        Self {
            url,
            destination,
            file: None,
            headers: ResponseHeaders::default(),
            tracker: ProgressTracker::new(0),
            on_progress,
            aborted: None,
        }
    }

    /// Returns false to abort the transfer.
    fn write_chunk(&mut self, data: &[u8]) -> bool {
        match self.try_write_chunk(data) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!("download aborted: {}", err);
                self.aborted = Some(err);
                false
            }
        }
    }

    fn try_write_chunk(&mut self, data: &[u8]) -> Result<(), LaunchError> {
        if self.file.is_none() {
            // First body byte: headers of the final response are complete.
            if let Some(code) = self.headers.status.filter(|c| !http::is_success(*c)) {
                return Err(LaunchError::HttpStatus {
                    url: self.url.to_string(),
                    code,
                });
            }
            self.file = Some(create_destination(self.destination)?);
            self.tracker = ProgressTracker::new(self.headers.total_size());
            tracing::debug!(
                path = %self.destination.display(),
                total_bytes = self.tracker.total_bytes(),
                "download started"
            );
        }

        if let Some(file) = self.file.as_mut() {
            file.write_all(data)
                .map_err(|e| LaunchError::io("write", self.destination, e))?;
        }

        if let Some(pct) = self.tracker.advance(data.len() as u64) {
            if let Some(report) = self.on_progress.as_deref_mut() {
                report(pct);
            }
        }
        Ok(())
    }

    /// Flush the written file, creating it if the body was empty.
    fn finish(self) -> Result<u64, LaunchError> {
        let file = match self.file {
            Some(file) => file,
            None => create_destination(self.destination)?,
        };
        file.sync_all()
            .map_err(|e| LaunchError::io("sync", self.destination, e))?;
        let written = self.tracker.bytes_done();
        tracing::info!(
            path = %self.destination.display(),
            bytes = written,
            "download complete"
        );
        Ok(written)
    }
}

/// Create or truncate the destination. On Unix the file is made executable.
fn create_destination(path: &Path) -> Result<File, LaunchError> {
    let mut options = File::options();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o755);
    }
    options
        .open(path)
        .map_err(|e: io::Error| LaunchError::io("create", path, e))
}
