// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! User facing output. Diagnostics go through `tracing`, everything the user is meant to read
//! goes through a [`Console`] so commands can be run against captured writers.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

type Writer = Arc<Mutex<Box<dyn Write + Send>>>;

#[derive(Clone)]
pub struct Console {
    stdout: Writer,
    stderr: Writer,
}

impl Console {
    pub fn new(stdout: impl Write + Send + 'static, stderr: impl Write + Send + 'static) -> Self {
        Console {
            stdout: Arc::new(Mutex::new(Box::new(stdout))),
            stderr: Arc::new(Mutex::new(Box::new(stderr))),
        }
    }

    pub fn stdio() -> Self {
        Console::new(io::stdout(), io::stderr())
    }

    /// Plain output, such as log lines
    pub fn print(&self, line: &str) {
        write_line(&self.stdout, line);
    }

    pub fn info(&self, line: &str) {
        write_line(&self.stdout, line);
    }

    pub fn success(&self, line: &str) {
        write_line(&self.stdout, line);
    }

    pub fn error(&self, line: &str) {
        write_line(&self.stderr, line);
    }
}

fn write_line(writer: &Writer, line: &str) {
    // a poisoned lock only means another writer panicked mid-line
    let mut writer = match writer.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    // nothing sensible to do when the terminal is gone
    let _ = writeln!(writer, "{}", line);
    let _ = writer.flush();
}
