use std::future::Future;
use std::io::Write;
use std::time::Duration;

use crossterm::cursor::MoveToColumn;
use crossterm::queue;
use crossterm::terminal::{Clear, ClearType};
use crossterm::tty::IsTty;

pub const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const FRAME_INTERVAL: Duration = Duration::from_millis(80);

pub fn spinner_frame(tick: u64) -> &'static str {
    SPINNER_FRAMES[(tick % SPINNER_FRAMES.len() as u64) as usize]
}

/// Drives `fut` to completion while animating a spinner on stderr. Purely
/// cosmetic: it is skipped when stderr is not a terminal and write errors are
/// ignored.
pub async fn with_spinner<F: Future>(label: &str, fut: F) -> F::Output {
    let mut stderr = std::io::stderr();
    if !stderr.is_tty() {
        return fut.await;
    }
    tokio::pin!(fut);
    let mut ticker = tokio::time::interval(FRAME_INTERVAL);
    let mut tick = 0u64;
    loop {
        tokio::select! {
            out = &mut fut => {
                let _ = queue!(stderr, MoveToColumn(0), Clear(ClearType::CurrentLine));
                let _ = stderr.flush();
                return out;
            }
            _ = ticker.tick() => {
                let _ = queue!(stderr, MoveToColumn(0));
                let _ = write!(stderr, "{} {label}", spinner_frame(tick));
                let _ = stderr.flush();
                tick = tick.wrapping_add(1);
            }
        }
    }
}
