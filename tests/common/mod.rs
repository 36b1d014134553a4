//! Shared helpers: a server on an ephemeral port and a capturing console
//! and spinner terminal.

#![allow(dead_code)]

use std::io::{self, Write};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use blockbench::harness::{Caller, Comparator, Console, HarnessConfig};
use blockbench::{Router, Server};
use indicatif::{ProgressDrawTarget, TermLike};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub struct TestServer {
    pub addr: SocketAddr,
    shutdown: CancellationToken,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start(router: Router) -> Self {
        let server = Server::bind("127.0.0.1:0").await.expect("bind");
        let addr = server.local_addr().expect("local addr");
        let shutdown = CancellationToken::new();
        let signal = shutdown.clone();
        let handle = tokio::spawn(async move {
            server
                .serve_with_shutdown(router, async move { signal.cancelled().await })
                .await
                .expect("serve");
        });
        Self { addr, shutdown, handle }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    pub async fn stop(self) {
        self.shutdown.cancel();
        self.handle.await.expect("server task");
    }
}

/// A base URL nothing listens on.
pub async fn refused_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub fn harness_config(base_url: &str, requests: usize, concurrency: usize) -> HarnessConfig {
    HarnessConfig {
        base_url: base_url.to_owned(),
        requests,
        concurrency,
        timeout_secs: 10.0,
        endpoints: Vec::new(),
    }
}

/// What the harness drew or printed, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Spinner text written to the indicator terminal.
    Frame(String),
    /// The indicator cleared its line.
    Clear,
    /// Report text written to the console, with what the spinner line showed
    /// at that moment.
    Report { text: String, spinner_line: String },
}

#[derive(Debug, Default)]
struct Tape {
    events: Vec<Event>,
    line: String,
    stdout: Vec<u8>,
}

/// Records both the report console and the spinner's terminal into one
/// ordered tape.
#[derive(Debug, Clone, Default)]
pub struct Captured(Arc<Mutex<Tape>>);

impl Captured {
    pub fn console(&self) -> Console {
        Console::new(self.clone())
    }

    pub fn indicator(&self) -> ProgressDrawTarget {
        ProgressDrawTarget::term_like(Box::new(self.clone()))
    }

    /// A comparator whose report and spinner both land on this tape.
    pub fn comparator(&self, caller: Caller) -> Comparator {
        let tape = self.clone();
        Comparator::new(caller, self.console()).indicator(move || tape.indicator())
    }

    /// Everything written to the console.
    pub fn stdout(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().stdout.clone()).unwrap()
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.lock().unwrap().events.clone()
    }

    /// What the spinner's line currently shows.
    pub fn spinner_line(&self) -> String {
        self.0.lock().unwrap().line.trim().to_owned()
    }
}

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut tape = self.0.lock().unwrap();
        tape.stdout.extend_from_slice(buf);
        let spinner_line = tape.line.trim().to_owned();
        tape.events.push(Event::Report { text: String::from_utf8_lossy(buf).into_owned(), spinner_line });
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl TermLike for Captured {
    fn width(&self) -> u16 { 80 }
    fn move_cursor_up(&self, _: usize) -> io::Result<()> { Ok(()) }
    fn move_cursor_down(&self, _: usize) -> io::Result<()> { Ok(()) }
    fn move_cursor_right(&self, _: usize) -> io::Result<()> { Ok(()) }
    fn move_cursor_left(&self, _: usize) -> io::Result<()> { Ok(()) }

    fn write_line(&self, s: &str) -> io::Result<()> {
        self.write_str(s)
    }

    fn write_str(&self, s: &str) -> io::Result<()> {
        let mut tape = self.0.lock().unwrap();
        match s.rsplit_once('\r') {
            Some((_, tail)) => tape.line = tail.to_owned(),
            None => tape.line.push_str(s),
        }
        let text = s.replace('\r', "");
        if !text.trim().is_empty() {
            tape.events.push(Event::Frame(text));
        }
        Ok(())
    }

    fn clear_line(&self) -> io::Result<()> {
        let mut tape = self.0.lock().unwrap();
        tape.line.clear();
        tape.events.push(Event::Clear);
        Ok(())
    }

    fn flush(&self) -> io::Result<()> {
        Ok(())
    }
}
