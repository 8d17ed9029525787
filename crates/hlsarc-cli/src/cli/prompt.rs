//! Interactive variant choice for master playlists.

use hlsarc_core::m3u8::Line;
use hlsarc_core::playlist::Playlist;
use hlsarc_core::session::VariantSelector;
use std::io::{BufRead, BufReader, Stderr, Stdin, Write};
use url::Url;

/// Shows the master's stream descriptions and asks for an index.
/// End of input declines the choice.
pub struct PromptSelector<R, W> {
    input: R,
    output: W,
}

impl PromptSelector<BufReader<Stdin>, Stderr> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(std::io::stdin()), std::io::stderr())
    }
}

impl<R: BufRead, W: Write> PromptSelector<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn show(&mut self, master: &Playlist) -> std::io::Result<()> {
        writeln!(self.output, "{} is a master playlist:", master.url())?;
        let mut index = 0;
        for line in master.lines() {
            match line {
                Line::Uri(uri) => {
                    writeln!(self.output, "  [{}] {}", index, uri)?;
                    index += 1;
                }
                Line::Blank => {}
                other => writeln!(self.output, "  {}", other.text())?,
            }
        }
        Ok(())
    }

    fn ask(&mut self, count: usize) -> Option<usize> {
        loop {
            let _ = write!(self.output, "variant [0-{}]: ", count.saturating_sub(1));
            let _ = self.output.flush();
            let mut answer = String::new();
            match self.input.read_line(&mut answer) {
                Ok(0) | Err(_) => return None,
                Ok(_) => {}
            }
            match answer.trim().parse::<usize>() {
                Ok(i) if i < count => return Some(i),
                _ => {
                    let _ = writeln!(self.output, "enter a number below {}", count);
                }
            }
        }
    }
}

impl<R: BufRead, W: Write> VariantSelector for PromptSelector<R, W> {
    fn select(&mut self, master: &Playlist, candidates: &[Url]) -> Option<usize> {
        if candidates.is_empty() {
            return None;
        }
        if let Err(e) = self.show(master) {
            tracing::warn!("cannot print variant list: {}", e);
        }
        self.ask(candidates.len())
    }
}
