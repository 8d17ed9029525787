//! `hlsarc completions <shell>` and `hlsarc man`.

use anyhow::Result;
use clap::CommandFactory;
use clap_complete::Shell;
use std::io::Write;

use crate::cli::Cli;

pub fn run_completions(shell: Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "hlsarc", &mut std::io::stdout());
}

fn render_man(out: &mut dyn Write) -> Result<()> {
    clap_mangen::Man::new(Cli::command()).render(out)?;
    Ok(())
}

pub fn run_man() -> Result<()> {
    render_man(&mut std::io::stdout())
}
