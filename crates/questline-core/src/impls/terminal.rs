//! 端末アダプタ: フレームのテキスト描画と、行入力のチャネル転送

use std::io::{BufRead, ErrorKind, Write};
use std::thread::JoinHandle;

use tokio::sync::mpsc;

use crate::app::status::HudFrame;
use crate::error::HudError;
use crate::ports::Renderer;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Writes each frame as plain text, optionally clearing the screen first.
pub struct TextRenderer<W> {
    out: W,
    clear_screen: bool,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W, clear_screen: bool) -> Self {
        Self { out, clear_screen }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render(&mut self, frame: &HudFrame) -> Result<(), HudError> {
        if self.clear_screen {
            self.out
                .write_all(CLEAR_SCREEN.as_bytes())
                .map_err(HudError::Render)?;
        }
        writeln!(self.out, "{frame}").map_err(HudError::Render)?;
        self.out.flush().map_err(HudError::Render)
    }
}

/// Forward lines from a blocking reader (stdin) into the scheduler's input
/// channel on a dedicated thread.
///
/// tokio の stdin は読み込みをキャンセルできないため、専用スレッドで読む。
/// 不正な UTF-8 の行は警告を出して捨て、読み込みは続ける。
/// The channel closes when the reader hits EOF or the receiver is dropped.
pub fn spawn_line_reader<R>(mut reader: R, tx: mpsc::Sender<String>) -> JoinHandle<()>
where
    R: BufRead + Send + 'static,
{
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => break,
                Ok(_) => {}
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => {
                    tracing::warn!(error = %err, "input read failed; closing input");
                    break;
                }
            }

            let Some(line) = decode_line(&buf) else {
                tracing::warn!(bytes = buf.len(), "input line is not valid UTF-8; ignored");
                continue;
            };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    })
}

// 末尾の `\n` / `\r\n` を落とす（`BufRead::lines` と同じ）
fn decode_line(raw: &[u8]) -> Option<String> {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    std::str::from_utf8(raw).ok().map(str::to_string)
}
