//! Child-process runner with a hard deadline.
//!
//! OCR and rasterization backends are external programs. Their output pipes
//! are drained on reader threads so a chatty process cannot block on a full
//! pipe while we wait for it.

use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::RecvTimeoutError;

use crate::error::ProcessError;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Captured output of a successful run.
#[derive(Debug, Default)]
pub(crate) struct ProcessOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

enum Stream {
    Stdout,
    Stderr,
}

/// Run a command to completion, killing it once `timeout` elapses.
pub(crate) fn run(mut command: Command, timeout: Duration) -> Result<ProcessOutput, ProcessError> {
    let program = command.get_program().to_string_lossy().into_owned();
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| ProcessError::Spawn {
            program: program.clone(),
            source,
        })?;

    let (tx, rx) = crossbeam_channel::bounded(2);
    let mut readers = 0;
    if let Some(stdout) = child.stdout.take() {
        spawn_reader(Stream::Stdout, stdout, tx.clone());
        readers += 1;
    }
    if let Some(stderr) = child.stderr.take() {
        spawn_reader(Stream::Stderr, stderr, tx.clone());
        readers += 1;
    }
    drop(tx);

    let deadline = Instant::now() + timeout;
    let mut output = ProcessOutput::default();

    for _ in 0..readers {
        match rx.recv_deadline(deadline) {
            Ok((stream, Ok(buf))) => match stream {
                Stream::Stdout => output.stdout = buf,
                Stream::Stderr => output.stderr = buf,
            },
            Ok((_, Err(e))) => {
                kill(&mut child);
                return Err(ProcessError::Io(e));
            }
            Err(RecvTimeoutError::Timeout) => {
                kill(&mut child);
                return Err(timed_out(program, timeout));
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    // Pipes are closed; the process is exiting but may not have been reaped yet.
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if Instant::now() >= deadline {
            kill(&mut child);
            return Err(timed_out(program, timeout));
        }
        thread::sleep(POLL_INTERVAL);
    };

    if !status.success() {
        return Err(ProcessError::Failed {
            program,
            status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(output)
}

/// Check whether a program can be executed at all.
pub(crate) fn probe(program: &std::path::Path, arg: &str, timeout: Duration) -> bool {
    let mut command = Command::new(program);
    command.arg(arg);
    match run(command, timeout) {
        Ok(_) => true,
        Err(e) => {
            log::debug!("Probe of {} failed: {}", program.display(), e);
            false
        }
    }
}

fn spawn_reader<R>(
    stream: Stream,
    mut pipe: R,
    tx: crossbeam_channel::Sender<(Stream, std::io::Result<Vec<u8>>)>,
) where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut buf = Vec::new();
        let result = pipe.read_to_end(&mut buf).map(|_| buf);
        // Receiver may be gone after a timeout.
        let _ = tx.send((stream, result));
    });
}

fn kill(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

fn timed_out(program: String, timeout: Duration) -> ProcessError {
    ProcessError::TimedOut {
        program,
        secs: timeout.as_secs(),
    }
}
