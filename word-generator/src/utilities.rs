use std::io::{self, Write};

use tokio::io::{AsyncBufRead, Lines};

/// Prints `prompt` and waits for the next line. `None` means input ended.
pub async fn input<R>(lines: &mut Lines<R>, prompt: &str) -> io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut stdout = io::stdout();
    write!(stdout, "{prompt}")?;
    stdout.flush()?;
    lines.next_line().await
}

#[derive(Debug, PartialEq, Eq)]
pub enum LineAction<'a> {
    Exit,
    Blank,
    Language(&'a str),
}

pub fn read_line_action(line: &str) -> LineAction<'_> {
    let line = line.trim();
    if line.is_empty() {
        return LineAction::Blank;
    }
    match &line.to_lowercase()[..] {
        "quit" | "exit" | "q" => LineAction::Exit,
        _ => LineAction::Language(line),
    }
}
