// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `tracing-subscriber` writer adapter for a shared sink.

use std::io;
use std::sync::Arc;

use tracing_subscriber::fmt::MakeWriter;

use crate::sink::RotatingFileSink;

/// Cheap, cloneable writer handle onto a [`RotatingFileSink`].
///
/// Usable anywhere `tracing-subscriber` expects a [`MakeWriter`], and as a
/// plain [`io::Write`].
#[derive(Debug, Clone)]
pub struct SinkWriter {
    sink: Arc<RotatingFileSink>,
}

impl SinkWriter {
    pub fn new(sink: Arc<RotatingFileSink>) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &Arc<RotatingFileSink> {
        &self.sink
    }
}

impl io::Write for SinkWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.sink.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.sink.flush()
    }
}

impl<'a> MakeWriter<'a> for SinkWriter {
    type Writer = SinkWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[cfg(test)]
#[path = "writer_tests.rs"]
mod tests;
