//! Resynchronizing frame parser.
//!
//! The parser pulls bytes from a reader on demand and alternates between two
//! states. Unsynced, it discards bytes until a [PREAMBLE](crate::frame::PREAMBLE)
//! is at the front of its window. Synced, it waits for the header and then the whole
//! frame, checks the CRC and hands the payload to the [Registry].
//!
//! A CRC mismatch drops only the preamble byte, so a frame starting inside the
//! rejected bytes is still found. A frame with a valid CRC that fails to decode is
//! skipped whole.
use std::collections::{BTreeMap, HashMap, HashSet};
use std::io;
use std::sync::Arc;

use tracing::{debug, trace};
use typed_builder::TypedBuilder;

use crate::bytes::Window;
use crate::error::{Error, Result};
use crate::frame::{self, FrameHeader, CRC_LEN, HEADER_LEN, PREAMBLE};
use crate::messages::{Message, MessageType};
use crate::registry::Registry;

type Callback = Box<dyn FnMut(&Message) + Send>;
type ErrorCallback = Box<dyn FnMut(&Error) + Send>;

/// Parser configuration.
///
/// ```
/// use rtcm3::{MessageType, ParserOptions};
///
/// let options = ParserOptions::builder()
///     .read_size(4096)
///     .stop_types([MessageType::REFERENCE_STATION_ANTENNA].into())
///     .build();
/// assert_eq!(options.read_size, 4096);
/// ```
#[derive(Debug, Clone, TypedBuilder)]
pub struct ParserOptions {
    /// Number of bytes requested from the reader per read.
    #[builder(default = ParserOptions::DEFAULT_READ_SIZE)]
    pub read_size: usize,
    /// Parsing halts right after a message of one of these types is delivered.
    #[builder(default)]
    pub stop_types: HashSet<MessageType>,
}

impl ParserOptions {
    pub const DEFAULT_READ_SIZE: usize = 1024;
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Outcome of a single [Parser::step].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A message of this type was decoded and delivered.
    Message(MessageType),
    /// A frame candidate was rejected, see [Parser::last_error].
    Rejected,
}

/// Extracts [Message]s from an RTCM3 byte stream.
///
/// Messages are delivered to per-type callbacks registered with
/// [Parser::add_callback], and are also available by iterating. Frame-level
/// failures never stop parsing; they are counted in [Parser::error_count]. Only
/// errors from the reader itself are returned.
pub struct Parser<R>
where
    R: io::Read + Send,
{
    window: Window<R>,
    registry: Arc<Registry>,
    options: ParserOptions,
    synced: bool,
    stopped: bool,
    error_count: u64,
    counts: BTreeMap<&'static str, u64>,
    last_message: Option<Message>,
    last_error: Option<Error>,
    callbacks: HashMap<MessageType, Vec<Callback>>,
    error_callback: Option<ErrorCallback>,
}

impl<R> Parser<R>
where
    R: io::Read + Send,
{
    /// Parser using the standard [Registry] and default options.
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, ParserOptions::default())
    }

    pub fn with_options(reader: R, options: ParserOptions) -> Self {
        Self::with_registry(reader, Arc::new(Registry::default()), options)
    }

    /// Parser using a shared, possibly customized, registry.
    pub fn with_registry(reader: R, registry: Arc<Registry>, options: ParserOptions) -> Self {
        Parser {
            window: Window::new(reader, options.read_size),
            registry,
            options,
            synced: false,
            stopped: false,
            error_count: 0,
            counts: BTreeMap::default(),
            last_message: None,
            last_error: None,
            callbacks: HashMap::default(),
            error_callback: None,
        }
    }

    /// Call `callback` with every message of `message_type`. Callbacks for the same
    /// type are called in the order they were added.
    pub fn add_callback<F>(&mut self, message_type: MessageType, callback: F)
    where
        F: FnMut(&Message) + Send + 'static,
    {
        self.callbacks
            .entry(message_type)
            .or_default()
            .push(Box::new(callback));
    }

    /// Call `callback` with every counted frame error. Replaces any previous error
    /// callback.
    pub fn on_error<F>(&mut self, callback: F)
    where
        F: FnMut(&Error) + Send + 'static,
    {
        self.error_callback = Some(Box::new(callback));
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// The most recently delivered message.
    #[must_use]
    pub fn last_message(&self) -> Option<&Message> {
        self.last_message.as_ref()
    }

    /// The most recent CRC or decode failure.
    #[must_use]
    pub fn last_error(&self) -> Option<&Error> {
        self.last_error.as_ref()
    }

    /// Delivered message counts, keyed by registered message name.
    #[must_use]
    pub fn counts(&self) -> &BTreeMap<&'static str, u64> {
        &self.counts
    }

    /// Number of frames rejected, for a bad CRC or a failed decode.
    #[must_use]
    pub fn error_count(&self) -> u64 {
        self.error_count
    }

    #[must_use]
    pub fn is_synced(&self) -> bool {
        self.synced
    }

    /// True once a stop type has been delivered, until [Parser::resume].
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Continue parsing after a stop.
    pub fn resume(&mut self) {
        self.stopped = false;
    }

    /// Stream offset of the next byte to be examined.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.window.offset()
    }

    /// Parse until the reader is exhausted or a stop type is delivered.
    ///
    /// # Errors
    /// [Error::Io] if the reader fails.
    pub fn parse(&mut self) -> Result<()> {
        while self.step()?.is_some() {}
        Ok(())
    }

    /// Advance to the next delivered message or rejected frame.
    ///
    /// Returns `Ok(None)` when the reader is exhausted, any partial frame then
    /// buffered being discarded, or when the parser is stopped.
    ///
    /// # Errors
    /// [Error::Io] if the reader fails. Parsing may be continued afterwards.
    pub fn step(&mut self) -> Result<Option<Step>> {
        if self.stopped {
            return Ok(None);
        }
        loop {
            if !self.synced {
                match self.window.available().iter().position(|b| *b == PREAMBLE) {
                    Some(idx) => {
                        self.window.consume(idx);
                        self.synced = true;
                        trace!(offset = self.window.offset(), skipped = idx, "synced");
                    }
                    None => {
                        self.window.clear();
                        if !self.fill()? {
                            return Ok(None);
                        }
                        continue;
                    }
                }
            }

            let Some(header) = FrameHeader::decode(self.window.available()) else {
                if !self.fill()? {
                    return Ok(self.exhausted());
                }
                continue;
            };
            let frame_len = header.frame_len();
            if self.window.len() < frame_len {
                if !self.fill()? {
                    return Ok(self.exhausted());
                }
                continue;
            }

            let offset = self.window.offset();
            let dat = &self.window.available()[..frame_len];
            if let Err(err) = frame::verify(dat) {
                debug!(offset, length = header.length, error = %err, "dropping frame");
                self.window.consume(1);
                self.synced = false;
                self.reject(err);
                return Ok(Some(Step::Rejected));
            }

            let payload = &dat[HEADER_LEN..frame_len - CRC_LEN];
            let zult = self.registry.decode_named(payload);
            let message_type = frame::message_type(payload);
            self.window.consume(frame_len);
            self.synced = false;

            return match zult {
                Ok((name, message)) => {
                    let message_type = message.message_type();
                    self.deliver(name, message);
                    Ok(Some(Step::Message(message_type)))
                }
                Err(err) => {
                    debug!(
                        offset,
                        message_type = ?message_type.map(MessageType::number),
                        length = header.length,
                        error = %err,
                        "failed to decode frame"
                    );
                    self.reject(Error::Decode(err));
                    Ok(Some(Step::Rejected))
                }
            };
        }
    }

    /// Borrowing iterator over every delivered message.
    pub fn messages(&mut self) -> Messages<'_, R> {
        Messages {
            parser: self,
            message_type: None,
            done: false,
        }
    }

    /// Borrowing iterator over delivered messages of one type. Callbacks still fire
    /// and counts are still kept for all types.
    pub fn messages_of(&mut self, message_type: MessageType) -> Messages<'_, R> {
        Messages {
            parser: self,
            message_type: Some(message_type),
            done: false,
        }
    }

    fn fill(&mut self) -> Result<bool> {
        let more = self.window.fill()?;
        trace!(available = self.window.len(), more, "filled");
        Ok(more)
    }

    fn exhausted(&mut self) -> Option<Step> {
        if self.window.len() > 0 {
            trace!(
                offset = self.window.offset(),
                discarded = self.window.len(),
                "partial frame at end of data"
            );
        }
        self.window.clear();
        self.synced = false;
        None
    }

    fn deliver(&mut self, name: &'static str, message: Message) {
        let message_type = message.message_type();
        *self.counts.entry(name).or_default() += 1;

        if let Some(callbacks) = self.callbacks.get_mut(&message_type) {
            for callback in callbacks.iter_mut() {
                callback(&message);
            }
        }
        if self.options.stop_types.contains(&message_type) {
            debug!(%message_type, "stop type delivered");
            self.stopped = true;
        }
        self.last_message = Some(message);
    }

    fn reject(&mut self, err: Error) {
        self.error_count += 1;
        if let Some(callback) = self.error_callback.as_mut() {
            callback(&err);
        }
        self.last_error = Some(err);
    }

    /// Step until a message passing `message_type` is delivered.
    fn next_message(&mut self, message_type: Option<MessageType>) -> Option<Result<Message>> {
        loop {
            match self.step() {
                Ok(Some(Step::Message(t))) if message_type.map_or(true, |want| want == t) => {
                    return self.last_message.clone().map(Ok);
                }
                Ok(Some(_)) => continue,
                Ok(None) => return None,
                Err(err) => return Some(Err(err)),
            }
        }
    }
}

impl<R> IntoIterator for Parser<R>
where
    R: io::Read + Send,
{
    type Item = Result<Message>;
    type IntoIter = IntoMessages<R>;

    fn into_iter(self) -> Self::IntoIter {
        IntoMessages {
            parser: self,
            done: false,
        }
    }
}

/// Iterator returned by [Parser::messages] and [Parser::messages_of].
///
/// Ends when the reader is exhausted or a stop type is delivered. A reader error
/// is produced once and ends iteration.
pub struct Messages<'a, R>
where
    R: io::Read + Send,
{
    parser: &'a mut Parser<R>,
    message_type: Option<MessageType>,
    done: bool,
}

impl<R> Iterator for Messages<'_, R>
where
    R: io::Read + Send,
{
    type Item = Result<Message>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let zult = self.parser.next_message(self.message_type);
        self.done = !matches!(zult, Some(Ok(_)));
        zult
    }
}

/// Owning iterator over every delivered message.
pub struct IntoMessages<R>
where
    R: io::Read + Send,
{
    parser: Parser<R>,
    done: bool,
}

impl<R> IntoMessages<R>
where
    R: io::Read + Send,
{
    /// The parser, e.g., to inspect counts once iteration ends.
    #[must_use]
    pub fn parser(&self) -> &Parser<R> {
        &self.parser
    }
}

impl<R> Iterator for IntoMessages<R>
where
    R: io::Read + Send,
{
    type Item = Result<Message>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let zult = self.parser.next_message(None);
        self.done = !matches!(zult, Some(Ok(_)));
        zult
    }
}
