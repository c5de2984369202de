use std::io;

use tracing_subscriber::EnvFilter;
use wasm_bindgen::JsValue;

/// Buffers one formatted event and hands it to `console.log` on drop.
#[derive(Default)]
struct ConsoleWriter {
    buf: Vec<u8>,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        if self.buf.is_empty() {
            return;
        }
        let line = String::from_utf8_lossy(&self.buf);
        web_sys::console::log_1(&JsValue::from(line.trim_end()));
    }
}

/// Install the global subscriber. Level filter comes from `QUILLPOST_LOG`
/// at build time, default `info`. No timestamps: wasm has no system clock.
pub fn init() {
    let directives = option_env!("QUILLPOST_LOG").unwrap_or("info");
    let filter = EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(ConsoleWriter::default)
        .with_ansi(false)
        .without_time()
        .try_init();
}
