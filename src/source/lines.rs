//! Splitting a stream of byte chunks into lines
//!
//! HTTP bodies arrive in arbitrary chunks; a record may straddle any number
//! of chunk boundaries.

use std::collections::VecDeque;
use std::pin::Pin;

use futures::stream::{self, BoxStream, Stream, StreamExt};

use crate::error::SourceError;

struct LineSplitter<S> {
    chunks: Pin<Box<S>>,
    buffer: Vec<u8>,
    /// Bytes of `buffer` already known to hold no newline
    scanned: usize,
    ready: VecDeque<String>,
    finished: bool,
}

impl<S> LineSplitter<S> {
    fn push(&mut self, chunk: &[u8]) {
        self.buffer.extend_from_slice(chunk);
        while let Some(pos) = self.buffer[self.scanned..].iter().position(|b| *b == b'\n') {
            let end = self.scanned + pos;
            let line: Vec<u8> = self.buffer.drain(..=end).collect();
            self.ready.push_back(decode(&line));
            self.scanned = 0;
        }
        self.scanned = self.buffer.len();
    }

    fn flush(&mut self) {
        if !self.buffer.is_empty() {
            let rest = std::mem::take(&mut self.buffer);
            self.ready.push_back(decode(&rest));
        }
        self.scanned = 0;
    }
}

fn decode(line: &[u8]) -> String {
    String::from_utf8_lossy(line)
        .trim_end_matches(['\n', '\r'])
        .to_string()
}

/// Turn a stream of byte chunks into a stream of lines.
///
/// The first chunk error ends the stream after being yielded. A trailing
/// line without a final newline is still emitted.
pub fn split_lines<S, B, E>(chunks: S) -> BoxStream<'static, Result<String, SourceError>>
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Into<SourceError> + Send + 'static,
{
    let splitter = LineSplitter {
        chunks: Box::pin(chunks),
        buffer: Vec::new(),
        scanned: 0,
        ready: VecDeque::new(),
        finished: false,
    };

    stream::unfold(splitter, |mut st| async move {
        loop {
            if let Some(line) = st.ready.pop_front() {
                return Some((Ok(line), st));
            }
            if st.finished {
                return None;
            }
            match st.chunks.next().await {
                Some(Ok(chunk)) => st.push(chunk.as_ref()),
                Some(Err(e)) => {
                    st.finished = true;
                    return Some((Err(e.into()), st));
                }
                None => {
                    st.finished = true;
                    st.flush();
                }
            }
        }
    })
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn collect(chunks: &[&str]) -> Vec<String> {
        let chunks: Vec<Result<Vec<u8>, SourceError>> =
            chunks.iter().map(|c| Ok(c.as_bytes().to_vec())).collect();
        let chunks = stream::iter(chunks);
        split_lines(chunks)
            .map(|line| line.unwrap())
            .collect()
            .await
    }

    #[tokio::test]
    async fn test_lines_across_chunks() {
        let lines = collect(&["{\"id\":", " 1}\n{\"id\"", ": 2}\n"]).await;
        assert_eq!(lines, vec!["{\"id\": 1}", "{\"id\": 2}"]);
    }

    #[tokio::test]
    async fn test_trailing_line_without_newline() {
        let lines = collect(&["a\nb", "c"]).await;
        assert_eq!(lines, vec!["a", "bc"]);
    }

    #[tokio::test]
    async fn test_crlf_and_blank_lines() {
        let lines = collect(&["a\r\n\r\nb\r\n"]).await;
        assert_eq!(lines, vec!["a", "", "b"]);
    }

    #[tokio::test]
    async fn test_many_lines_in_one_chunk() {
        let lines = collect(&["1\n2\n3\n"]).await;
        assert_eq!(lines, vec!["1", "2", "3"]);
    }

    #[tokio::test]
    async fn test_error_ends_stream() {
        let chunks = stream::iter(vec![
            Ok(b"a\n".to_vec()),
            Err(SourceError::Io(std::io::Error::other("connection reset"))),
            Ok(b"b\n".to_vec()),
        ]);
        let items: Vec<_> = split_lines(chunks).collect().await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_ref().unwrap(), "a");
        assert!(matches!(items[1], Err(SourceError::Io(_))));
    }
}
