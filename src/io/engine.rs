//! Child-process plumbing for UCI engines.
//!
//! [`EngineProcess`] owns the child for its whole life: stdout is pumped line by
//! line into a channel so reads can honour a deadline, stderr is drained into
//! the debug log, and shutdown (`quit`, bounded wait, kill, reap) runs on every
//! exit path through `Drop`.
//!
//! The reader threads are joined after the reap once their pipes report EOF.
//! An engine that hands its stdout or stderr to a grandchild outliving the kill
//! keeps that pipe open; its reader is then detached (counted in
//! [`ShutdownReport::detached_readers`]) and blocks until the grandchild exits.
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use wait_timeout::ChildExt;

use crate::core::uci::QUIT;
use crate::error::{Error, Result};

const JAVA: &str = "java";
const JAVA_ARGS: [&str; 2] = ["--add-modules=jdk.incubator.vector", "-jar"];
const READER_JOIN_WAIT: Duration = Duration::from_millis(250);

/// Program and fixed arguments used to launch an engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl EngineCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// JARs run through `java` with the vector incubator module; anything else runs directly.
    pub fn for_engine(path: &Path) -> Self {
        let is_jar = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("jar"));
        let path = path.to_string_lossy().into_owned();
        if is_jar {
            JAVA_ARGS
                .iter()
                .fold(Self::new(JAVA), |cmd, arg| cmd.arg(*arg))
                .arg(path)
        } else {
            Self::new(path)
        }
    }
}

impl std::fmt::Display for EngineCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEvent {
    Line(String),
    /// stdout reached end of stream
    Closed,
    TimedOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShutdownReport {
    /// The engine exited on its own within the grace period
    pub exited: bool,
    pub exit_code: Option<i32>,
    pub killed: bool,
    /// Reader threads still blocked on a pipe held open by a surviving descendant
    pub detached_readers: usize,
}

pub struct EngineProcess {
    program: String,
    child: Child,
    stdin: Option<ChildStdin>,
    lines: Receiver<io::Result<String>>,
    readers: Vec<JoinHandle<()>>,
    grace: Duration,
    shutdown: Option<ShutdownReport>,
}

impl EngineProcess {
    pub fn spawn(command: &EngineCommand, grace: Duration) -> Result<Self> {
        let program = command.to_string();
        let mut child = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| Error::EngineSpawn {
                program: program.clone(),
                source,
            })?;
        debug!("Launched engine (pid {}): {}", child.id(), program);

        let stdin = child.stdin.take();
        let pumps = attach_pumps(&mut child);
        let (lines, readers) = match pumps {
            Ok(pumps) => pumps,
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(e);
            }
        };

        Ok(Self {
            program,
            child,
            stdin,
            lines,
            readers,
            grace,
            shutdown: None,
        })
    }

    /// OS process id of the engine.
    pub fn id(&self) -> u32 {
        self.child.id()
    }

    /// Writes one protocol line and flushes it.
    pub fn send(&mut self, line: &str) -> Result<()> {
        let stdin = self.stdin.as_mut().ok_or_else(|| {
            io::Error::new(io::ErrorKind::BrokenPipe, "engine stdin already closed")
        })?;
        stdin.write_all(line.as_bytes())?;
        stdin.write_all(b"\n")?;
        stdin.flush()?;
        debug!("> {}", line);
        Ok(())
    }

    /// Waits for the next stdout line, but never past `deadline`.
    pub fn next_line(&self, deadline: Instant) -> Result<LineEvent> {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Ok(LineEvent::TimedOut);
        }
        match self.lines.recv_timeout(remaining) {
            Ok(Ok(line)) => Ok(LineEvent::Line(line)),
            Ok(Err(e)) => Err(e.into()),
            Err(RecvTimeoutError::Timeout) => Ok(LineEvent::TimedOut),
            Err(RecvTimeoutError::Disconnected) => Ok(LineEvent::Closed),
        }
    }

    pub fn shutdown(mut self) -> ShutdownReport {
        self.finish()
    }

    fn finish(&mut self) -> ShutdownReport {
        if let Some(report) = self.shutdown {
            return report;
        }

        // The engine may already be gone, in which case the pipe is broken.
        if let Err(e) = self.send(QUIT) {
            debug!("Could not send {} to {}: {}", QUIT, self.program, e);
        }
        drop(self.stdin.take());

        let pid = self.id();
        let mut report = match self.child.wait_timeout(self.grace) {
            Ok(Some(status)) => ShutdownReport {
                exited: true,
                exit_code: status.code(),
                killed: false,
                detached_readers: 0,
            },
            Ok(None) => {
                warn!(
                    "Engine {} still running {:?} after {}; killing it",
                    self.program, self.grace, QUIT
                );
                self.kill_and_reap()
            }
            Err(e) => {
                warn!("Waiting for engine {} failed: {}", self.program, e);
                self.kill_and_reap()
            }
        };
        report.detached_readers = self.join_readers();
        debug!("Engine {} (pid {}) shut down: {:?}", self.program, pid, report);

        self.shutdown = Some(report);
        report
    }

    fn kill_and_reap(&mut self) -> ShutdownReport {
        if let Err(e) = self.child.kill() {
            debug!("Kill of engine {} failed: {}", self.program, e);
        }
        let exit_code = match self.child.wait() {
            Ok(status) => status.code(),
            Err(e) => {
                warn!("Could not reap engine {}: {}", self.program, e);
                None
            }
        };
        ShutdownReport {
            exited: false,
            exit_code,
            killed: true,
            detached_readers: 0,
        }
    }

    /// Joins reader threads that reach EOF within a short wait; returns how many were left running.
    fn join_readers(&mut self) -> usize {
        let wait_until = Instant::now() + READER_JOIN_WAIT;
        let mut detached = 0;
        for handle in self.readers.drain(..) {
            while !handle.is_finished() && Instant::now() < wait_until {
                thread::sleep(Duration::from_millis(5));
            }
            if handle.is_finished() {
                if handle.join().is_err() {
                    warn!("Reader thread for engine {} panicked", self.program);
                }
            } else {
                debug!(
                    "Engine {} left a pipe open in a descendant; detaching its reader",
                    self.program
                );
                detached += 1;
            }
        }
        detached
    }
}

impl Drop for EngineProcess {
    fn drop(&mut self) {
        self.finish();
    }
}

type LineReceiver = Receiver<io::Result<String>>;

fn attach_pumps(child: &mut Child) -> Result<(LineReceiver, Vec<JoinHandle<()>>)> {
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| Error::Processing("engine stdout was not captured".to_string()))?;
    let (tx, rx) = mpsc::channel();
    let mut readers = vec![spawn_line_reader(stdout, move |line| tx.send(line).is_ok())];

    if let Some(stderr) = child.stderr.take() {
        readers.push(spawn_line_reader(stderr, |line| match line {
            Ok(line) => {
                debug!("engine stderr: {}", line);
                true
            }
            Err(_) => false,
        }));
    }

    Ok((rx, readers))
}

/// Reads `stream` on its own thread, handing each line (without its terminator)
/// to `on_line` until EOF, a read error, or `on_line` returns false.
fn spawn_line_reader<R, F>(stream: R, mut on_line: F) -> JoinHandle<()>
where
    R: Read + Send + 'static,
    F: FnMut(io::Result<String>) -> bool + Send + 'static,
{
    thread::spawn(move || {
        let mut reader = BufReader::new(stream);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => break,
                Ok(_) => {
                    let line = String::from_utf8_lossy(&buf)
                        .trim_end_matches(|c: char| c == '\n' || c == '\r')
                        .to_string();
                    if !on_line(Ok(line)) {
                        break;
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    on_line(Err(e));
                    break;
                }
            }
        }
    })
}
