//! Streaming `multipart/form-data` parsing.
//!
//! [`MultipartParser`] is a push state machine: feed it byte chunks of any
//! size as they arrive and call [`finish`](MultipartParser::finish) at the end
//! of the body. Plain fields are collected as scalars; file parts are written
//! to sinks from a caller-supplied [`SinkFactory`] while they stream, so only
//! a lookback of one delimiter length is ever held for them. Every completed
//! part is inserted into the parameter tree with the same key-path rules as
//! query strings.
//!
//! ```
//! use paramtree::multipart::{MemorySinks, parse_multipart_chunks};
//! use paramtree::{ParseOptions, Value};
//!
//! let body = b"--XyZ\r\n\
//!     Content-Disposition: form-data; name=\"user[name]\"\r\n\r\n\
//!     ross\r\n\
//!     --XyZ\r\n\
//!     Content-Disposition: form-data; name=\"avatar\"; filename=\"a.txt\"\r\n\
//!     Content-Type: text/plain\r\n\r\n\
//!     hello\r\n\
//!     --XyZ--\r\n";
//!
//! let mut sinks = MemorySinks::new();
//! let params = parse_multipart_chunks(
//!     body.chunks(7),
//!     "XyZ",
//!     &ParseOptions::default(),
//!     &mut sinks,
//! )
//! .unwrap();
//!
//! assert_eq!(params["user"].get("name"), Some(&Value::from("ross")));
//! let avatar = params["avatar"].as_file().unwrap();
//! assert_eq!(sinks.get(avatar.handle), Some(&b"hello"[..]));
//! ```

mod headers;
mod sink;

pub use headers::{PartHeaders, boundary_from_content_type, parse_part_headers};
pub use sink::{MemorySinks, SinkFactory, TempFileSinks};

use std::io::{ErrorKind as IoErrorKind, Read, Write};

use memchr::memmem::Finder;

use crate::error::ParamsError;
use crate::lexer::tokenize_key;
use crate::options::ParseOptions;
use crate::path::KeyPath;
use crate::tree;
use crate::value::{FileHandle, FileRef, Map, Value};

/// Spaces and tabs tolerated between a delimiter and its line break.
const MAX_DELIMITER_PADDING: usize = 64;

/// Where the scanner is inside the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Discarding bytes until the first `--boundary`
    Preamble,
    /// Just past a delimiter; `--` ends the body, a line break starts a part
    Delimiter,
    /// Collecting a part's header block up to the blank line
    Headers,
    /// Forwarding part content until the next delimiter
    Body,
    /// Closing delimiter seen; anything further is epilogue
    Done,
    /// An error was raised; the parser accepts no more input
    Failed,
}

enum Target<S> {
    Field(Vec<u8>),
    File { sink: S, size: u64 },
}

struct OpenPart<S> {
    path: KeyPath,
    headers: PartHeaders,
    target: Target<S>,
}

impl<S: Write> OpenPart<S> {
    fn write(&mut self, data: &[u8]) -> Result<(), ParamsError> {
        if data.is_empty() {
            return Ok(());
        }
        match &mut self.target {
            Target::Field(bytes) => bytes.extend_from_slice(data),
            Target::File { sink, size } => {
                sink.write_all(data)?;
                *size += data.len() as u64;
            }
        }
        Ok(())
    }
}

/// Incremental `multipart/form-data` parser.
///
/// A parse that fails, or is dropped before [`finish`](Self::finish)
/// succeeds, leaves nothing behind: the open sink goes to
/// [`SinkFactory::discard_sink`] and every upload already closed by this
/// parser goes to [`SinkFactory::remove`].
pub struct MultipartParser<'s, F: SinkFactory> {
    sinks: &'s mut F,
    options: ParseOptions,
    /// `--boundary`, which opens the body
    dash_boundary: Finder<'static>,
    /// `\r\n--boundary`, which ends every part
    delimiter: Finder<'static>,
    buffer: Vec<u8>,
    state: State,
    part: Option<OpenPart<F::Sink>>,
    params: Map,
    /// Uploads closed by this parser; released unless the parse succeeds
    stored: Vec<FileHandle>,
    parts: usize,
}

impl<'s, F: SinkFactory> MultipartParser<'s, F> {
    pub fn new(boundary: &str, options: ParseOptions, sinks: &'s mut F) -> Result<Self, ParamsError> {
        headers::validate_boundary(boundary)?;
        let dash_boundary = format!("--{}", boundary);
        let delimiter = format!("\r\n--{}", boundary);

        Ok(MultipartParser {
            sinks,
            options,
            dash_boundary: Finder::new(dash_boundary.as_bytes()).into_owned(),
            delimiter: Finder::new(delimiter.as_bytes()).into_owned(),
            buffer: Vec::new(),
            state: State::Preamble,
            part: None,
            params: Map::new(),
            stored: Vec::new(),
            parts: 0,
        })
    }

    /// True once the closing delimiter has been read.
    pub fn is_done(&self) -> bool {
        self.state == State::Done
    }

    /// Consume the next chunk of the body.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<(), ParamsError> {
        match self.state {
            State::Failed => {
                return Err(ParamsError::malformed("parser already failed"));
            }
            State::Done => return Ok(()),
            _ => {}
        }

        log::trace!("multipart chunk of {} bytes in {:?}", chunk.len(), self.state);
        self.buffer.extend_from_slice(chunk);
        self.drain().inspect_err(|e| {
            log::warn!("multipart parse aborted: {}", e);
            self.abort();
        })
    }

    /// Finish the body and return the parameter tree.
    pub fn finish(mut self) -> Result<Map, ParamsError> {
        let error = match self.state {
            State::Done => {
                log::debug!("multipart body complete: {} parts", self.parts);
                self.stored.clear();
                return Ok(std::mem::take(&mut self.params));
            }
            State::Failed => ParamsError::malformed("parser already failed"),
            State::Preamble => ParamsError::malformed("no boundary found in body"),
            State::Delimiter | State::Headers | State::Body => {
                ParamsError::malformed("body ended before the closing boundary")
            }
        };
        self.abort();
        Err(error)
    }

    fn drain(&mut self) -> Result<(), ParamsError> {
        loop {
            let progressed = match self.state {
                State::Preamble => self.scan_preamble(),
                State::Delimiter => self.after_delimiter()?,
                State::Headers => self.read_headers()?,
                State::Body => self.stream_body()?,
                State::Done | State::Failed => {
                    self.buffer.clear();
                    false
                }
            };
            if !progressed {
                return Ok(());
            }
        }
    }

    fn scan_preamble(&mut self) -> bool {
        let needle = self.dash_boundary.needle().len();
        match self.dash_boundary.find(&self.buffer) {
            Some(at) => {
                self.buffer.drain(..at + needle);
                self.state = State::Delimiter;
                true
            }
            None => {
                let keep = needle - 1;
                if self.buffer.len() > keep {
                    let discard = self.buffer.len() - keep;
                    self.buffer.drain(..discard);
                }
                false
            }
        }
    }

    fn after_delimiter(&mut self) -> Result<bool, ParamsError> {
        if self.buffer.len() < 2 {
            return Ok(false);
        }
        if self.buffer.starts_with(b"--") {
            log::debug!("closing boundary after {} parts", self.parts);
            self.buffer.clear();
            self.state = State::Done;
            return Ok(true);
        }

        let padding = self
            .buffer
            .iter()
            .take_while(|&&b| b == b' ' || b == b'\t')
            .count();
        if padding > MAX_DELIMITER_PADDING {
            return Err(ParamsError::malformed("too much padding after boundary"));
        }

        // CRLF only, like the part delimiter and the header terminator
        let rest = &self.buffer[padding..];
        if !rest.starts_with(b"\r\n") {
            if rest.is_empty() || rest == b"\r" {
                return Ok(false);
            }
            return Err(ParamsError::malformed("unexpected bytes after boundary"));
        }

        self.buffer.drain(..padding + 2);
        self.state = State::Headers;
        Ok(true)
    }

    fn read_headers(&mut self) -> Result<bool, ParamsError> {
        let (block_len, consumed) = if self.buffer.starts_with(b"\r\n") {
            (0, 2)
        } else {
            match memchr::memmem::find(&self.buffer, b"\r\n\r\n") {
                Some(at) => (at, at + 4),
                None => {
                    if self.buffer.len() > self.options.max_header_bytes {
                        return Err(ParamsError::malformed("part headers too large"));
                    }
                    return Ok(false);
                }
            }
        };
        if block_len > self.options.max_header_bytes {
            return Err(ParamsError::malformed("part headers too large"));
        }

        let headers = parse_part_headers(&self.buffer[..block_len])?;
        self.buffer.drain(..consumed);
        self.open_part(headers)?;
        self.state = State::Body;
        Ok(true)
    }

    fn open_part(&mut self, headers: PartHeaders) -> Result<(), ParamsError> {
        let path = tokenize_key(&headers.name, self.options.max_depth)?;
        log::debug!(
            "part {}: {} {:?}",
            self.parts + 1,
            if headers.is_file() { "file" } else { "field" },
            headers.name
        );

        let target = if headers.is_file() {
            Target::File {
                sink: self.sinks.open_sink(&headers)?,
                size: 0,
            }
        } else {
            Target::Field(Vec::new())
        };

        self.part = Some(OpenPart {
            path,
            headers,
            target,
        });
        Ok(())
    }

    fn stream_body(&mut self) -> Result<bool, ParamsError> {
        let Some(part) = self.part.as_mut() else {
            return Err(ParamsError::malformed("part body without headers"));
        };

        let needle = self.delimiter.needle().len();
        match self.delimiter.find(&self.buffer) {
            Some(at) => {
                part.write(&self.buffer[..at])?;
                self.buffer.drain(..at + needle);
                self.complete_part()?;
                self.state = State::Delimiter;
                Ok(true)
            }
            None => {
                // the tail may be the start of a delimiter split across chunks
                let keep = needle - 1;
                if self.buffer.len() > keep {
                    let ready = self.buffer.len() - keep;
                    part.write(&self.buffer[..ready])?;
                    self.buffer.drain(..ready);
                }
                Ok(false)
            }
        }
    }

    fn complete_part(&mut self) -> Result<(), ParamsError> {
        let Some(OpenPart {
            path,
            headers,
            target,
        }) = self.part.take()
        else {
            return Err(ParamsError::malformed("part ended without headers"));
        };

        let value = match target {
            Target::Field(bytes) => Value::Scalar(
                String::from_utf8(bytes)
                    .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned()),
            ),
            Target::File { sink, size } => {
                let handle = self.sinks.close_sink(sink)?;
                self.stored.push(handle);
                Value::File(FileRef {
                    filename: headers.filename.unwrap_or_default(),
                    content_type: headers.content_type,
                    size,
                    handle,
                })
            }
        };

        tree::insert(&mut self.params, &path, value)?;
        self.parts += 1;
        Ok(())
    }

    /// Drop everything parsed so far.
    fn abort(&mut self) {
        self.release_uploads();
        self.buffer.clear();
        self.params.clear();
        self.state = State::Failed;
    }

    /// Hand the open sink and every upload stored so far back to the factory.
    fn release_uploads(&mut self) {
        if let Some(OpenPart {
            target: Target::File { sink, .. },
            ..
        }) = self.part.take()
        {
            self.sinks.discard_sink(sink);
        }
        for handle in self.stored.drain(..) {
            if let Err(e) = self.sinks.remove(handle) {
                log::warn!("failed to remove upload {}: {}", handle.0, e);
            }
        }
    }
}

impl<F: SinkFactory> Drop for MultipartParser<'_, F> {
    fn drop(&mut self) {
        self.release_uploads();
    }
}

/// Parse a multipart body pulled from `reader` in `options.chunk_size` reads.
pub fn parse_multipart<R: Read, F: SinkFactory>(
    mut reader: R,
    boundary: &str,
    options: &ParseOptions,
    sinks: &mut F,
) -> Result<Map, ParamsError> {
    let mut parser = MultipartParser::new(boundary, options.clone(), sinks)?;
    let mut chunk = vec![0u8; options.chunk_size.max(1)];

    while !parser.is_done() {
        let read = match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(read) => read,
            Err(e) if e.kind() == IoErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        parser.feed(&chunk[..read])?;
    }

    parser.finish()
}

/// Parse a multipart body delivered as a sequence of byte chunks.
pub fn parse_multipart_chunks<I, C, F>(
    chunks: I,
    boundary: &str,
    options: &ParseOptions,
    sinks: &mut F,
) -> Result<Map, ParamsError>
where
    I: IntoIterator<Item = C>,
    C: AsRef<[u8]>,
    F: SinkFactory,
{
    let mut parser = MultipartParser::new(boundary, options.clone(), sinks)?;
    for chunk in chunks {
        parser.feed(chunk.as_ref())?;
        if parser.is_done() {
            break;
        }
    }
    parser.finish()
}
