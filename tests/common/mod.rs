#![allow(dead_code)]

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use rox::error::RunError;
use rox::Lox;

/// In‑memory `print` sink that tests can read back after a run.
#[derive(Clone, Default)]
pub struct SharedBuf(Rc<RefCell<Vec<u8>>>);

impl SharedBuf {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).expect("output is UTF-8")
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A session with captured output.
pub fn session() -> (Lox, SharedBuf) {
    let out = SharedBuf::default();
    (Lox::with_output(Box::new(out.clone())), out)
}

/// Run one program in a fresh session.
pub fn run(source: &str) -> (String, Result<(), RunError>) {
    let (mut lox, out) = session();
    let result = lox.run(source);
    (out.contents(), result)
}

/// Run a program that must succeed and return what it printed.
pub fn run_ok(source: &str) -> String {
    let (output, result) = run(source);
    if let Err(e) = result {
        panic!("program failed: {:?}\noutput so far:\n{}", e, output);
    }
    output
}

/// Rendered diagnostics of a failed run.
pub fn messages(result: &Result<(), RunError>) -> Vec<String> {
    match result {
        Ok(()) => Vec::new(),
        Err(e) => e.diagnostics().iter().map(|d| d.to_string()).collect(),
    }
}
