//! The separator frame and the reading-side split.
//!
//! A harness writes `--<token>-- SEP` to every sink before each unit of execution. Reading a sink history back is
//! therefore a plain split on the frame: the first segment is whatever the before-code produced, every following
//! segment belongs to exactly one unit.
//!
//! ## Examples
//! ```rust
//! use framejudge_core::framing::{frame, split_frames};
//!
//! let history = format!("boot{sep}{sep}42", sep = frame("abcdEFGH1"));
//! assert_eq!(split_frames(&history, "abcdEFGH1"), vec!["boot", "", "42"]);
//! ```

/// Text between the closing dashes of the frame and the end of the frame.
pub const FRAME_SUFFIX: &str = " SEP";

/// Suffix of the durable value sink's file name (`<token>_values.txt`).
pub const VALUE_FILE_SUFFIX: &str = "_values.txt";

/// Suffix of the durable exception sink's file name (`<token>_exceptions.txt`).
pub const EXCEPTION_FILE_SUFFIX: &str = "_exceptions.txt";

/// Build the frame literal for a token.
pub fn frame(token: &str) -> String {
    format!("--{token}--{FRAME_SUFFIX}")
}

/// Default file name of the value sink.
pub fn value_file_name(token: &str) -> String {
    format!("{token}{VALUE_FILE_SUFFIX}")
}

/// Default file name of the exception sink.
pub fn exception_file_name(token: &str) -> String {
    format!("{token}{EXCEPTION_FILE_SUFFIX}")
}

/// Split a sink history on the frame of `token`.
///
/// ## Returns
/// - One more segment than there are frames in `history`. Segment `0` precedes the first frame.
///
/// ## Notes
/// - Empty segments are kept: an empty segment is how a unit says "nothing was written".
pub fn split_frames<'a>(history: &'a str, token: &str) -> Vec<&'a str> {
    history.split(frame(token).as_str()).collect()
}

/// Count the frames of `token` in a sink history.
pub fn count_frames(history: &str, token: &str) -> usize {
    history.matches(frame(token).as_str()).count()
}

/// Check whether `text` contains the frame of `token` anywhere.
///
/// Generators use this to refuse descriptors whose own data would be mistaken for a separator.
pub fn contains_frame(text: &str, token: &str) -> bool {
    text.contains(frame(token).as_str())
}
