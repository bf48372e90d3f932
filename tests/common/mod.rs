//! Shared helpers for integration tests: a viewer harness on a virtual
//! terminal and a canned parser service.

#![allow(dead_code)]

use std::io::{self, Read};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use parsescope::app::{App, ViewState};
use parsescope::config::Config;
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::Terminal;

pub fn test_config(server_url: &str) -> Config {
    Config {
        server_url: server_url.to_string(),
        request_timeout_ms: 2_000,
        tick_ms: 10,
    }
}

/// What one request to the mock service looked like on the wire.
#[derive(Debug, Clone)]
pub struct ReceivedRequest {
    pub method: String,
    pub path: String,
    pub body: String,
    pub content_type: Option<String>,
    pub cache_control: Option<String>,
}

/// Serves one canned reply to every request, optionally after a delay,
/// and records what each request contained.
pub struct MockParserServer {
    pub url: String,
    stop_tx: mpsc::Sender<()>,
    requests: Arc<Mutex<Vec<ReceivedRequest>>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl MockParserServer {
    pub fn start(status: u16, reply: &str, delay: Duration) -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("failed to bind mock server");
        let port = server
            .server_addr()
            .to_ip()
            .expect("mock server has an IP address")
            .port();
        let url = format!("http://127.0.0.1:{port}");
        let reply = reply.to_string();
        let (stop_tx, stop_rx) = mpsc::channel();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);

        let handle = thread::spawn(move || loop {
            if stop_rx.try_recv().is_ok() {
                break;
            }
            match server.recv_timeout(Duration::from_millis(20)) {
                Ok(Some(mut request)) => {
                    let mut body = String::new();
                    let _ = request.as_reader().read_to_string(&mut body);
                    let header = |name: &'static str| {
                        request
                            .headers()
                            .iter()
                            .find(|h| h.field.equiv(name))
                            .map(|h| h.value.as_str().to_string())
                    };
                    seen.lock().unwrap().push(ReceivedRequest {
                        method: request.method().to_string(),
                        path: request.url().to_string(),
                        content_type: header("Content-Type"),
                        cache_control: header("Cache-Control"),
                        body,
                    });
                    if !delay.is_zero() {
                        thread::sleep(delay);
                    }
                    let response =
                        tiny_http::Response::from_string(reply.clone()).with_status_code(status);
                    let _ = request.respond(response);
                }
                Ok(None) | Err(_) => {}
            }
        });

        MockParserServer {
            url,
            stop_tx,
            requests,
            handle: Some(handle),
        }
    }

    pub fn requests(&self) -> Vec<ReceivedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for MockParserServer {
    fn drop(&mut self) {
        let _ = self.stop_tx.send(());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Drives the whole viewer against a virtual terminal.
pub struct ViewerTestHarness {
    pub app: App,
    terminal: Terminal<TestBackend>,
}

impl ViewerTestHarness {
    pub fn new(
        width: u16,
        height: u16,
        config: Config,
        initial_text: Option<&str>,
    ) -> io::Result<Self> {
        let backend = TestBackend::new(width, height);
        let terminal = Terminal::new(backend)?;
        let app = App::new(config, initial_text.map(|text| text.to_string()));
        Ok(ViewerTestHarness { app, terminal })
    }

    pub fn render(&mut self) -> io::Result<()> {
        self.terminal.draw(|frame| self.app.draw(frame))?;
        Ok(())
    }

    pub fn send_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> io::Result<()> {
        self.app.handle_key(KeyEvent::new(code, modifiers));
        self.app.drain_messages();
        self.render()
    }

    pub fn type_text(&mut self, text: &str) -> io::Result<()> {
        for ch in text.chars() {
            self.app
                .handle_key(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE));
        }
        self.app.drain_messages();
        self.render()
    }

    /// Drains worker results until the app leaves the pending state.
    /// Returns false if it is still pending at the deadline.
    pub fn wait_until_settled(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            self.app.drain_messages();
            if *self.app.view_state() != ViewState::Pending {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            thread::sleep(Duration::from_millis(5));
        }
    }

    pub fn buffer(&self) -> &Buffer {
        self.terminal.backend().buffer()
    }

    pub fn screen_to_string(&self) -> String {
        let buffer = self.buffer();
        let (width, height) = (buffer.area.width, buffer.area.height);
        let mut result = String::new();
        for y in 0..height {
            for x in 0..width {
                let index = buffer.index_of(x, y);
                result.push_str(buffer.content[index].symbol());
            }
            if y < height - 1 {
                result.push('\n');
            }
        }
        result
    }

    pub fn assert_screen_contains(&self, text: &str) {
        let screen = self.screen_to_string();
        assert!(
            screen.contains(text),
            "Expected screen to contain '{text}'\nScreen content:\n{screen}"
        );
    }

    pub fn assert_screen_not_contains(&self, text: &str) {
        let screen = self.screen_to_string();
        assert!(
            !screen.contains(text),
            "Expected screen to not contain '{text}'\nScreen content:\n{screen}"
        );
    }

    /// Screen coordinates of every occurrence of `needle`, compared cell
    /// by cell so wide border glyphs cannot shift the column numbers.
    pub fn find_on_screen(&self, needle: &str) -> Vec<(u16, u16)> {
        let buffer = self.buffer();
        let chars: Vec<String> = needle.chars().map(|c| c.to_string()).collect();
        let mut hits = Vec::new();
        if chars.is_empty() || chars.len() as u16 > buffer.area.width {
            return hits;
        }
        for y in 0..buffer.area.height {
            'column: for x in 0..=buffer.area.width - chars.len() as u16 {
                for (i, expected) in chars.iter().enumerate() {
                    let index = buffer.index_of(x + i as u16, y);
                    if buffer.content[index].symbol() != expected {
                        continue 'column;
                    }
                }
                hits.push((x, y));
            }
        }
        hits
    }
}
